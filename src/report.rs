use chrono::NaiveDateTime;
use tracing::info;

use crate::error::ReportError;
use crate::layout::{layout_report, report_title};
use crate::pdf;
use crate::recommend::recommend;
use crate::types::{MetricLine, MetricsSnapshot, Portfolio, ReportSummary};

/// Render the board report for a filtered portfolio as PDF bytes.
///
/// `generated_at` is stamped into the header; with a fixed value the output
/// is byte-identical across calls.
pub fn render(
    portfolio: &Portfolio<'_>,
    metrics: &MetricsSnapshot,
    generated_at: NaiveDateTime,
) -> Result<Vec<u8>, ReportError> {
    let document = layout_report(portfolio, metrics, generated_at);
    let bytes = pdf::encode(&document)?;
    info!(
        mode = portfolio.mode_name(),
        rows = portfolio.row_count(),
        pages = document.pages.len(),
        bytes = bytes.len(),
        "board report rendered"
    );
    Ok(bytes)
}

/// JSON-friendly view of the same report content.
pub fn summarize(
    portfolio: &Portfolio<'_>,
    metrics: &MetricsSnapshot,
    generated_at: NaiveDateTime,
) -> ReportSummary {
    ReportSummary {
        mode: portfolio.mode_name().to_string(),
        title: report_title(portfolio).to_string(),
        generated_at: generated_at.format("%Y-%m-%d %H:%M").to_string(),
        rows_in_view: portfolio.row_count(),
        metrics: metrics
            .iter()
            .map(|(label, value)| MetricLine {
                label: label.to_string(),
                value: value.to_string(),
            })
            .collect(),
        recommendations: recommend(portfolio, metrics),
    }
}
