//! Board-report engine for the Harare retail portfolios.
//!
//! Loads the operational tenant roster and the development leasing
//! pipeline, filters them, derives the dashboard metrics and rule-based
//! recommendations, and renders a paginated PDF board report.

pub mod config;
pub mod error;
pub mod filters;
pub mod layout;
pub mod loader;
pub mod metrics;
pub mod output;
pub mod pdf;
pub mod recommend;
pub mod report;
pub mod text;
pub mod types;
pub mod util;

pub use error::{ConfigError, LoadError, ReportError};
pub use recommend::recommend;
pub use report::{render, summarize};
pub use text::{sanitize, DisplayText};
pub use types::{MetricsSnapshot, PipelineRow, Portfolio, TenantRow};
