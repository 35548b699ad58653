// Engine settings, loaded from a JSON file named on the command line or in the
// DASHBOARD_CONFIG environment variable.
use crate::data::normalizer::HoursEncoding;
use crate::data::table::NormalizeOptions;
use crate::error::EngineError;
use crate::metrics::project::HOURS_OVERRUN_TOLERANCE;
use crate::metrics::ADMIN_PREFIXES;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub const CONFIG_ENV: &str = "DASHBOARD_CONFIG";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    pub table_path: PathBuf,
    /// Sheet to read when `table_path` is a workbook; first sheet when unset.
    pub table_sheet: Option<String>,
    pub csv_delimiter: char,
    pub goals_path: PathBuf,
    pub goals_sheet: Option<String>,
    pub table_ttl_secs: u64,
    pub goals_ttl_secs: u64,
    pub admin_prefixes: Vec<String>,
    pub hours_encoding: HoursEncoding,
    pub hours_columns_swapped: bool,
    pub hours_overrun_tolerance: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            table_path: PathBuf::from("dados_obras.csv"),
            table_sheet: None,
            csv_delimiter: ';',
            goals_path: PathBuf::from("config.json"),
            goals_sheet: None,
            table_ttl_secs: 60,
            goals_ttl_secs: 30,
            admin_prefixes: ADMIN_PREFIXES.iter().map(|p| p.to_string()).collect(),
            hours_encoding: HoursEncoding::DayFraction,
            hours_columns_swapped: false,
            hours_overrun_tolerance: HOURS_OVERRUN_TOLERANCE,
        }
    }
}

impl EngineSettings {
    pub fn from_file(path: &Path) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| EngineError::ConfigError(format!("cannot read {}: {}", path.display(), e)))?;
        let settings: EngineSettings = serde_json::from_str(&content)
            .map_err(|e| EngineError::ConfigError(format!("invalid settings in {}: {}", path.display(), e)))?;
        settings.validate()?;
        info!(path = %path.display(), "Loaded engine settings");
        Ok(settings)
    }

    /// An explicit path wins over `DASHBOARD_CONFIG`; with neither, defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, EngineError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match std::env::var_os(CONFIG_ENV) {
                Some(path) => Self::from_file(Path::new(&path)),
                None => Ok(Self::default()),
            },
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.csv_delimiter.is_ascii() {
            return Err(EngineError::ConfigError(format!(
                "csv_delimiter must be a single ASCII character, got {:?}",
                self.csv_delimiter
            )));
        }
        if self.admin_prefixes.iter().any(|p| p.trim().is_empty()) {
            return Err(EngineError::ConfigError("admin_prefixes may not contain blank entries".into()));
        }
        if !self.hours_overrun_tolerance.is_finite() || self.hours_overrun_tolerance < 0.0 {
            return Err(EngineError::ConfigError(format!(
                "hours_overrun_tolerance must be a non-negative number, got {}",
                self.hours_overrun_tolerance
            )));
        }
        Ok(())
    }

    pub fn delimiter_byte(&self) -> u8 {
        // validate() rejects non-ASCII delimiters
        self.csv_delimiter as u8
    }

    pub fn table_ttl(&self) -> Duration {
        Duration::from_secs(self.table_ttl_secs)
    }

    pub fn goals_ttl(&self) -> Duration {
        Duration::from_secs(self.goals_ttl_secs)
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            hours_encoding: self.hours_encoding,
            hours_columns_swapped: self.hours_columns_swapped,
        }
    }
}
