//! Text that is safe to place in the report.
//!
//! The report uses the PDF base-14 Helvetica family with `WinAnsiEncoding`,
//! so anything outside printable Latin-1 is substituted before it reaches a
//! page. `sanitize` is the only way to obtain a [`DisplayText`].

use std::fmt;

/// Character substituted for anything the report font cannot encode.
pub const REPLACEMENT: char = '?';

/// A string containing only printable Latin-1 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DisplayText(String);

impl DisplayText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    /// Single-byte encoding for a PDF string literal. Every char is
    /// `<= U+00FF`, which is how the constructor is restricted.
    pub fn to_latin1(&self) -> Vec<u8> {
        self.0.chars().map(|c| c as u32 as u8).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DisplayText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_encodable(c: char) -> bool {
    matches!(c as u32, 0x20..=0x7E | 0xA0..=0xFF)
}

/// Substitute unencodable characters, then clip to `max_len` characters.
///
/// Substitution happens first so that one emoji costs exactly one column,
/// matching what the reader sees.
pub fn sanitize(text: &str, max_len: usize) -> DisplayText {
    let out: String = text
        .chars()
        .map(|c| match c {
            '\t' | '\n' | '\r' => ' ',
            c if is_encodable(c) => c,
            _ => REPLACEMENT,
        })
        .take(max_len)
        .collect();
    DisplayText(out)
}

/// Sanitize without a length budget.
pub fn sanitize_all(text: &str) -> DisplayText {
    sanitize(text, usize::MAX)
}

// Helvetica advance widths (1/1000 em) for U+0020..=U+007E.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // {..~
];

const DEFAULT_WIDTH: u16 = 556;

fn glyph_width(c: char) -> u16 {
    match c as u32 {
        code @ 0x20..=0x7E => HELVETICA_ASCII[(code - 0x20) as usize],
        _ => DEFAULT_WIDTH,
    }
}

/// Rendered width in millimetres at `size_pt`.
pub fn text_width_mm(text: &DisplayText, size_pt: f32, bold: bool) -> f32 {
    let units: u32 = text.as_str().chars().map(|c| glyph_width(c) as u32).sum();
    // Bold glyphs run roughly 6% wider than regular ones.
    let scale = if bold { 1.06 } else { 1.0 };
    units as f32 / 1000.0 * size_pt * scale * crate::layout::MM_PER_PT
}

/// Greedy word wrap to `width_mm`. Words wider than a line are hard-split.
pub fn wrap(text: &DisplayText, width_mm: f32, size_pt: f32) -> Vec<DisplayText> {
    let fits = |s: &str| text_width_mm(&DisplayText(s.to_string()), size_pt, false) <= width_mm;
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.as_str().split(' ').filter(|w| !w.is_empty()) {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if fits(&candidate) {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(DisplayText(std::mem::take(&mut current)));
        }
        for c in word.chars() {
            current.push(c);
            if !fits(&current) && current.chars().count() > 1 {
                current.pop();
                lines.push(DisplayText(std::mem::take(&mut current)));
                current.push(c);
            }
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(DisplayText(current));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn substitutes_instead_of_dropping() {
        assert_eq!(sanitize("Café 🍕 Hub", 50).as_str(), "Café ? Hub");
        assert_eq!(sanitize("Харарe", 50).as_str(), "?????e");
        assert_eq!(sanitize("a\tb\nc", 50).as_str(), "a b c");
    }

    #[test]
    fn clips_after_substitution() {
        let name = "Pick n Pay Hypermarket Borrowdale West";
        assert_eq!(name.chars().count(), 38);
        let clipped = sanitize(name, 25);
        assert_eq!(clipped.as_str(), "Pick n Pay Hypermarket Bo");
        assert_eq!(sanitize("🍕🍕🍕", 2).as_str(), "??");
    }

    #[test]
    fn latin1_bytes_are_single_byte() {
        let text = sanitize("Café m²", 20);
        assert_eq!(text.to_latin1(), b"Caf\xe9 m\xb2".to_vec());
    }

    #[test]
    fn wraps_long_sentences_within_width() {
        let text = sanitize_all(
            "Growth Phase: accelerate broker incentives to cross the 60% threshold for bank funding.",
        );
        let lines = wrap(&text, 60.0, 11.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width_mm(line, 11.0, false) <= 60.0);
        }
        let rejoined: Vec<&str> = lines.iter().map(|l| l.as_str()).collect();
        assert_eq!(rejoined.join(" "), text.as_str());
    }

    #[test]
    fn wrap_of_empty_text_yields_one_empty_line() {
        assert_eq!(wrap(&sanitize_all(""), 100.0, 11.0), vec![DisplayText::default()]);
    }

    proptest! {
        #[test]
        fn sanitized_text_is_bounded_and_encodable(s in "\\PC*", max in 0usize..40) {
            let out = sanitize(&s, max);
            prop_assert!(out.char_count() <= max);
            prop_assert!(out.char_count() == s.chars().count().min(max));
            prop_assert!(out.as_str().chars().all(is_encodable));
            prop_assert_eq!(out.to_latin1().len(), out.char_count());
        }
    }
}
