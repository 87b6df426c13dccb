//! PDF encoding of a laid-out [`ReportDocument`].
//!
//! Uses the standard Helvetica faces with `WinAnsiEncoding`, so no font
//! program is embedded and every `DisplayText` maps byte-for-byte.
//! The writer adds no random file identifiers; the only time-dependent
//! bytes come from the document's injected timestamp.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::error::ReportError;
use crate::layout::{
    text_x, DrawOp, Font, FontStyle, Page, ReportDocument, Rgb, TableRow, TextLine,
    MM_PER_PT, PAGE_HEIGHT, PAGE_WIDTH,
};
use crate::text::DisplayText;

const BORDER_WIDTH_MM: f32 = 0.2;

fn pt(mm: f32) -> f32 {
    mm / MM_PER_PT
}

fn real(v: f32) -> Object {
    Object::Real((v * 100.0).round() / 100.0)
}

fn font_resource(style: FontStyle) -> &'static str {
    match style {
        FontStyle::Regular => "F1",
        FontStyle::Bold => "F2",
        FontStyle::Italic => "F3",
    }
}

/// Encode the document as PDF 1.4 bytes.
pub fn encode(report: &ReportDocument) -> Result<Vec<u8>, ReportError> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for (name, base) in [
        ("F1", "Helvetica"),
        ("F2", "Helvetica-Bold"),
        ("F3", "Helvetica-Oblique"),
    ] {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base,
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(name, font_id);
    }
    let resources_id = doc.add_object(dictionary! { "Font" => fonts });

    let mut kids: Vec<Object> = Vec::with_capacity(report.pages.len());
    for page in &report.pages {
        let page_id = add_page(&mut doc, pages_id, page)?;
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => report.pages.len() as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![real(0.0), real(0.0), real(pt(PAGE_WIDTH)), real(pt(PAGE_HEIGHT))],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(report.title.as_str()),
        "Producer" => Object::string_literal("harare_report"),
        "CreationDate" => Object::string_literal(
            report.generated_at.format("D:%Y%m%d%H%M%S").to_string()
        ),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf)?;
    Ok(buf)
}

fn add_page(doc: &mut Document, pages_id: ObjectId, page: &Page) -> Result<ObjectId, ReportError> {
    let mut ops = Vec::new();
    for op in &page.ops {
        match op {
            DrawOp::Text(line) => text_line(&mut ops, line),
            DrawOp::TableHeader(row) | DrawOp::TableRow(row) => table_row(&mut ops, row),
        }
    }
    let content = Content { operations: ops };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    }))
}

fn color_operands(c: Rgb) -> Vec<Object> {
    [c.0, c.1, c.2]
        .iter()
        .map(|&v| real(v as f32 / 255.0))
        .collect()
}

fn show_text(
    ops: &mut Vec<Operation>,
    x: f32,
    y: f32,
    h: f32,
    text: &DisplayText,
    font: &Font,
    color: Rgb,
) {
    // Vertically centred baseline inside the box.
    let baseline = y + h / 2.0 + 0.3 * font.size * MM_PER_PT;
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![font_resource(font.style).into(), real(font.size)],
    ));
    ops.push(Operation::new("rg", color_operands(color)));
    ops.push(Operation::new(
        "Td",
        vec![real(pt(x)), real(pt(PAGE_HEIGHT - baseline))],
    ));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(text.to_latin1(), StringFormat::Literal)],
    ));
    ops.push(Operation::new("ET", vec![]));
}

fn rect(x: f32, y: f32, w: f32, h: f32) -> Vec<Object> {
    vec![
        real(pt(x)),
        real(pt(PAGE_HEIGHT - y - h)),
        real(pt(w)),
        real(pt(h)),
    ]
}

fn text_line(ops: &mut Vec<Operation>, line: &TextLine) {
    if line.text.is_empty() {
        return;
    }
    let x = text_x(line.x, line.w, &line.text, &line.font, line.align);
    show_text(ops, x, line.y, line.h, &line.text, &line.font, line.color);
}

fn table_row(ops: &mut Vec<Operation>, row: &TableRow) {
    for cell in &row.cells {
        ops.push(Operation::new("q", vec![]));
        if let Some(fill) = row.fill {
            ops.push(Operation::new("rg", color_operands(fill)));
        }
        ops.push(Operation::new("w", vec![real(pt(BORDER_WIDTH_MM))]));
        ops.push(Operation::new("re", rect(cell.x, row.y, cell.w, row.h)));
        let paint = if row.fill.is_some() { "B" } else { "S" };
        ops.push(Operation::new(paint, vec![]));

        // Clip to the cell so long text cannot bleed into its neighbour.
        ops.push(Operation::new("re", rect(cell.x, row.y, cell.w, row.h)));
        ops.push(Operation::new("W", vec![]));
        ops.push(Operation::new("n", vec![]));
        if !cell.text.is_empty() {
            let x = text_x(cell.x, cell.w, &cell.text, &row.font, cell.align);
            show_text(ops, x, row.y, row.h, &cell.text, &row.font, Rgb(0, 0, 0));
        }
        ops.push(Operation::new("Q", vec![]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout_report;
    use crate::types::{MetricsSnapshot, Portfolio};
    use chrono::NaiveDate;

    #[test]
    fn encodes_a_pdf_header_and_trailer() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 2)
            .and_then(|d| d.and_hms_opt(3, 4, 5))
            .expect("valid timestamp");
        let doc = layout_report(&Portfolio::Development(&[]), &MetricsSnapshot::new(), at);
        let bytes = encode(&doc).expect("encodes");
        assert!(bytes.starts_with(b"%PDF-1.4"));
        let tail = String::from_utf8_lossy(&bytes[bytes.len().saturating_sub(32)..]).to_string();
        assert!(tail.contains("%%EOF"));

        let parsed = Document::load_mem(&bytes).expect("re-parses");
        assert_eq!(parsed.get_pages().len(), 1);
    }
}
