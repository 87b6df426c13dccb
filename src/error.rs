use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading one of the source datasets.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open dataset {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("dataset {path} has no usable rows ({parse_errors} rows rejected)")]
    Empty { path: PathBuf, parse_errors: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Failure to serialize a laid-out report. Layout itself never fails.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("pdf encoding failed: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("pdf write failed: {0}")]
    Io(#[from] std::io::Error),
}
