use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::filters::DEFAULT_EXPIRY_RANGE;

/// Environment variable naming a config file when `--config` is absent.
pub const CONFIG_ENV: &str = "HARARE_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub tenants_csv: PathBuf,
    pub pipeline_csv: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            tenants_csv: PathBuf::from("terrace_africa_v2.csv"),
            pipeline_csv: PathBuf::from("westprop_v2.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub operational_file: String,
    pub development_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            operational_file: "Terrace_Report.pdf".to_string(),
            development_file: "WestProp_Report.pdf".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OperationalConfig {
    pub default_expiry: (u32, u32),
}

impl Default for OperationalConfig {
    fn default() -> Self {
        Self { default_expiry: DEFAULT_EXPIRY_RANGE }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DevelopmentConfig {
    pub master_plan_gla: f64,
}

impl Default for DevelopmentConfig {
    fn default() -> Self {
        Self { master_plan_gla: 90_000.0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub output: OutputConfig,
    pub operational: OperationalConfig,
    pub development: DevelopmentConfig,
}

impl AppConfig {
    pub fn from_toml_str(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw, path)
    }

    /// Resolve the config source: explicit path, then `HARARE_CONFIG`,
    /// then built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (lo, hi) = self.operational.default_expiry;
        if lo > hi {
            return Err(ConfigError::Invalid(format!(
                "operational.default_expiry [{lo}, {hi}] is reversed"
            )));
        }
        if !(self.development.master_plan_gla.is_finite() && self.development.master_plan_gla > 0.0)
        {
            return Err(ConfigError::Invalid(
                "development.master_plan_gla must be a positive number".to_string(),
            ));
        }
        Ok(())
    }

    pub fn operational_report_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.operational_file)
    }

    pub fn development_report_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.development_file)
    }
}
