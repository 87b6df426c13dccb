//! Page layout for the board report.
//!
//! Layout is computed in millimetres on an A4 portrait page with a
//! top-left origin and a moving vertical cursor. The result is a plain
//! [`ReportDocument`] that `pdf` encodes; keeping the two apart lets tests
//! inspect pagination without parsing PDF bytes.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::recommend::recommend;
use crate::text::{sanitize, sanitize_all, text_width_mm, wrap, DisplayText};
use crate::types::{MetricsSnapshot, PipelineRow, Portfolio, TenantRow};
use crate::util::{format_currency, format_number};

pub const MM_PER_PT: f32 = 25.4 / 72.0;

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 10.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
/// Blocks that would cross this line move to a new page.
const AUTO_BREAK_Y: f32 = PAGE_HEIGHT - 20.0;
/// Table rows are not started below this line.
pub const TABLE_BREAK_Y: f32 = 250.0;
const FOOTER_Y: f32 = PAGE_HEIGHT - 15.0;

pub const BANNER: &str = "Harare Asset Intelligence | Automated Board Report";

const TENANT_BUDGET: usize = 25;
const ASSET_BUDGET: usize = 25;
const STATUS_BUDGET: usize = 20;

const ROW_HEIGHT: f32 = 10.0;
const METRIC_HEIGHT: f32 = 8.0;
const HEADING_HEIGHT: f32 = 10.0;
const SECTION_GAP: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const ACCENT: Rgb = Rgb(0, 50, 100);
pub const RISK_FILL: Rgb = Rgb(255, 200, 200);
pub const NORMAL_FILL: Rgb = Rgb(200, 220, 255);
pub const PIPELINE_FILL: Rgb = Rgb(220, 255, 220);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub style: FontStyle,
    pub size: f32,
}

impl Font {
    const fn new(style: FontStyle, size: f32) -> Self {
        Self { style, size }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// One line of free text occupying the box `(x, y, w, h)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub text: DisplayText,
    pub font: Font,
    pub color: Rgb,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub x: f32,
    pub w: f32,
    pub text: DisplayText,
    pub align: Align,
}

/// A bordered row of cells. Text never leaves its cell rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub y: f32,
    pub h: f32,
    pub cells: Vec<TableCell>,
    pub font: Font,
    pub fill: Option<Rgb>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text(TextLine),
    TableHeader(TableRow),
    TableRow(TableRow),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: usize,
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn header_rows(&self) -> impl Iterator<Item = &TableRow> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::TableHeader(row) => Some(row),
            _ => None,
        })
    }

    pub fn body_rows(&self) -> impl Iterator<Item = &TableRow> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::TableRow(row) => Some(row),
            _ => None,
        })
    }

    pub fn text_lines(&self) -> impl Iterator<Item = &TextLine> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(line) => Some(line),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub title: String,
    pub generated_at: NaiveDateTime,
    pub pages: Vec<Page>,
}

impl ReportDocument {
    pub fn body_rows(&self) -> impl Iterator<Item = &TableRow> {
        self.pages.iter().flat_map(|p| p.body_rows())
    }
}

struct Column {
    title: &'static str,
    width: f32,
}

static OPERATIONAL_COLUMNS: [Column; 4] = [
    Column { title: "Tenant", width: 60.0 },
    Column { title: "Asset", width: 40.0 },
    Column { title: "GLA (m2)", width: 30.0 },
    Column { title: "Status / Risk", width: 40.0 },
];

static DEVELOPMENT_COLUMNS: [Column; 3] = [
    Column { title: "Tenant", width: 60.0 },
    Column { title: "Status", width: 50.0 },
    Column { title: "Fit-Out Budget ($)", width: 40.0 },
];

/// Column set and header styling for one table.
struct TableSchema {
    columns: &'static [Column],
    header_fill: Rgb,
}

impl TableSchema {
    fn for_portfolio(portfolio: &Portfolio<'_>) -> Self {
        match portfolio {
            Portfolio::Operational(_) => TableSchema {
                columns: &OPERATIONAL_COLUMNS,
                header_fill: if portfolio.is_risk_only() {
                    RISK_FILL
                } else {
                    NORMAL_FILL
                },
            },
            Portfolio::Development(_) => TableSchema {
                columns: &DEVELOPMENT_COLUMNS,
                header_fill: PIPELINE_FILL,
            },
        }
    }

    fn cells(&self, values: Vec<DisplayText>, align: Align) -> Vec<TableCell> {
        let mut x = MARGIN;
        self.columns
            .iter()
            .zip(values)
            .map(|(col, text)| {
                let cell = TableCell { x, w: col.width, text, align };
                x += col.width;
                cell
            })
            .collect()
    }
}

/// Report title: a risk-only operational view becomes a watchlist.
pub fn report_title(portfolio: &Portfolio<'_>) -> &'static str {
    match portfolio {
        Portfolio::Operational(_) if portfolio.is_risk_only() => "CRITICAL RISK WATCHLIST",
        Portfolio::Operational(_) => "ASSET PERFORMANCE REPORT",
        Portfolio::Development(_) => "DEVELOPMENT FEASIBILITY REPORT",
    }
}

/// Cursor-driven page builder. Every new page starts with the banner and
/// footer already placed.
struct PageWriter {
    pages: Vec<Page>,
    y: f32,
}

impl PageWriter {
    fn new() -> Self {
        let mut writer = PageWriter { pages: Vec::new(), y: MARGIN };
        writer.add_page();
        writer
    }

    fn add_page(&mut self) {
        let number = self.pages.len() + 1;
        let mut ops = Vec::new();
        ops.push(DrawOp::Text(TextLine {
            x: MARGIN,
            y: MARGIN,
            w: CONTENT_WIDTH,
            h: 10.0,
            text: sanitize_all(BANNER),
            font: Font::new(FontStyle::Bold, 12.0),
            color: BLACK,
            align: Align::Center,
        }));
        ops.push(DrawOp::Text(TextLine {
            x: MARGIN,
            y: FOOTER_Y,
            w: CONTENT_WIDTH,
            h: 10.0,
            text: sanitize_all(&format!("Page {}", number)),
            font: Font::new(FontStyle::Italic, 8.0),
            color: BLACK,
            align: Align::Center,
        }));
        self.pages.push(Page { number, ops });
        self.y = MARGIN + 10.0 + SECTION_GAP;
    }

    fn current(&mut self) -> &mut Page {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn ensure_room(&mut self, h: f32) {
        if self.y + h > AUTO_BREAK_Y {
            self.add_page();
        }
    }

    fn gap(&mut self, h: f32) {
        self.y += h;
    }

    fn line(&mut self, text: DisplayText, font: Font, color: Rgb, h: f32) {
        self.ensure_room(h);
        let y = self.y;
        self.current().ops.push(DrawOp::Text(TextLine {
            x: MARGIN,
            y,
            w: CONTENT_WIDTH,
            h,
            text,
            font,
            color,
            align: Align::Left,
        }));
        self.y += h;
    }

    fn table_header(&mut self, schema: &TableSchema) {
        self.ensure_room(ROW_HEIGHT);
        let titles = schema.columns.iter().map(|c| sanitize_all(c.title)).collect();
        let row = TableRow {
            y: self.y,
            h: ROW_HEIGHT,
            cells: schema.cells(titles, Align::Center),
            font: Font::new(FontStyle::Bold, 10.0),
            fill: Some(schema.header_fill),
        };
        self.current().ops.push(DrawOp::TableHeader(row));
        self.y += ROW_HEIGHT;
    }

    /// Heading plus column header. Both move to a fresh page when the
    /// first body row would otherwise land below the table break line.
    fn start_table(&mut self, heading: DisplayText, schema: &TableSchema) {
        if self.y + HEADING_HEIGHT + ROW_HEIGHT > TABLE_BREAK_Y {
            self.add_page();
        }
        self.line(heading, Font::new(FontStyle::Bold, 14.0), BLACK, HEADING_HEIGHT);
        self.table_header(schema);
    }

    fn table_row(&mut self, schema: &TableSchema, values: Vec<DisplayText>) {
        if self.y > TABLE_BREAK_Y {
            self.add_page();
            self.table_header(schema);
        }
        let row = TableRow {
            y: self.y,
            h: ROW_HEIGHT,
            cells: schema.cells(values, Align::Left),
            font: Font::new(FontStyle::Regular, 10.0),
            fill: None,
        };
        self.current().ops.push(DrawOp::TableRow(row));
        self.y += ROW_HEIGHT;
    }
}

fn tenant_cells(row: &TenantRow) -> Vec<DisplayText> {
    vec![
        sanitize(&row.tenant_name, TENANT_BUDGET),
        sanitize(&row.asset_name, ASSET_BUDGET),
        sanitize_all(&format_number(row.occupied_area, 0)),
        sanitize_all(row.status_label()),
    ]
}

fn pipeline_cells(row: &PipelineRow) -> Vec<DisplayText> {
    vec![
        sanitize(&row.tenant_name, TENANT_BUDGET),
        sanitize(&row.pre_let_status, STATUS_BUDGET),
        sanitize_all(&format_currency(row.fit_out_budget, 0)),
    ]
}

fn by_area_desc<T>(rows: &[T], area: impl Fn(&T) -> f64) -> Vec<&T> {
    let mut sorted: Vec<&T> = rows.iter().collect();
    sorted.sort_by(|a, b| area(b).total_cmp(&area(a)));
    sorted
}

/// Lay out the full board report. Never fails: any input yields a
/// well-formed document.
pub fn layout_report(
    portfolio: &Portfolio<'_>,
    metrics: &MetricsSnapshot,
    generated_at: NaiveDateTime,
) -> ReportDocument {
    let title = report_title(portfolio);
    let mut w = PageWriter::new();

    w.line(sanitize_all(title), Font::new(FontStyle::Bold, 16.0), BLACK, 10.0);
    w.line(
        sanitize_all(&format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M"))),
        Font::new(FontStyle::Regular, 10.0),
        BLACK,
        10.0,
    );
    w.gap(SECTION_GAP);

    w.line(
        sanitize_all("Key Performance Indicators"),
        Font::new(FontStyle::Bold, 14.0),
        BLACK,
        10.0,
    );
    let metric_font = Font::new(FontStyle::Regular, 11.0);
    for (label, value) in metrics.iter() {
        let entry = sanitize_all(&format!("{}: {}", label, value));
        for part in wrap(&entry, CONTENT_WIDTH - 2.0, metric_font.size) {
            w.line(part, metric_font, BLACK, METRIC_HEIGHT);
        }
    }
    w.gap(SECTION_GAP);

    w.line(
        sanitize_all("Strategic Recommendations / Executive Note"),
        Font::new(FontStyle::Bold, 14.0),
        ACCENT,
        10.0,
    );
    let advice_font = Font::new(FontStyle::Italic, 11.0);
    for rec in recommend(portfolio, metrics) {
        let bullet = sanitize_all(&format!("- {}", rec));
        for part in wrap(&bullet, CONTENT_WIDTH - 2.0, advice_font.size) {
            w.line(part, advice_font, ACCENT, METRIC_HEIGHT);
        }
    }
    w.gap(SECTION_GAP);

    let schema = TableSchema::for_portfolio(portfolio);
    let heading = match portfolio {
        Portfolio::Operational(_) => "Tenant Portfolio Snapshot",
        Portfolio::Development(_) => "Leasing Pipeline Snapshot",
    };
    w.start_table(sanitize_all(heading), &schema);

    match portfolio {
        Portfolio::Operational(rows) => {
            for row in by_area_desc(rows, |r| r.occupied_area) {
                w.table_row(&schema, tenant_cells(row));
            }
        }
        Portfolio::Development(rows) => {
            for row in by_area_desc(rows, |r| r.occupied_area) {
                w.table_row(&schema, pipeline_cells(row));
            }
        }
    }

    debug!(
        mode = portfolio.mode_name(),
        rows = portfolio.row_count(),
        pages = w.pages.len(),
        "report laid out"
    );

    ReportDocument {
        title: title.to_string(),
        generated_at,
        pages: w.pages,
    }
}

/// Horizontal text start inside a box, following the cell padding of 1 mm.
pub fn text_x(x: f32, w: f32, text: &DisplayText, font: &Font, align: Align) -> f32 {
    match align {
        Align::Left => x + 1.0,
        Align::Center => {
            let tw = text_width_mm(text, font.size, font.style == FontStyle::Bold);
            x + ((w - tw) / 2.0).max(0.0)
        }
    }
}
