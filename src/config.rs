//! Dashboard configuration, read from YAML. Every field has a default, so an
//! empty file (or no file at all) is a valid configuration.

use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    env, fs,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::error::{DashboardError, Result};
use crate::process::DateParser;
use crate::schema::{CanonicalColumn, Normalizer, SynonymTable};

/// Environment variable naming a YAML config file.
pub const CONFIG_ENV: &str = "SALES_DASHBOARD_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Parquet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Header spelling → canonical column, added on top of the built-in table.
    pub synonyms: BTreeMap<String, CanonicalColumn>,
    /// Use only `synonyms`, ignoring the built-in table.
    pub replace_default_synonyms: bool,
    /// chrono formats for Order Date; empty means the built-in list.
    pub date_formats: Vec<String>,
    /// Rows in the preview table.
    pub preview_rows: usize,
    pub output_dir: PathBuf,
    pub export_format: ExportFormat,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            synonyms: BTreeMap::new(),
            replace_default_synonyms: false,
            date_formats: Vec::new(),
            preview_rows: 5,
            output_dir: PathBuf::from("exports"),
            export_format: ExportFormat::Csv,
        }
    }
}

impl DashboardConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| DashboardError::Config(e.to_string()))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| DashboardError::Config(format!("reading {}: {}", path.display(), e)))?;
        let cfg = Self::from_yaml_str(&text)?;
        info!(path = %path.display(), "loaded configuration");
        Ok(cfg)
    }

    /// `explicit` if given, else the file named by `SALES_DASHBOARD_CONFIG`,
    /// else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_path(path),
            None => match env::var_os(CONFIG_ENV) {
                Some(path) => Self::from_path(Path::new(&path)),
                None => Ok(Self::default()),
            },
        }
    }

    pub fn synonym_table(&self) -> SynonymTable {
        let base = if self.replace_default_synonyms {
            SynonymTable::empty()
        } else {
            SynonymTable::default()
        };
        base.with_entries(self.synonyms.iter().map(|(k, v)| (k.as_str(), *v)))
    }

    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.synonym_table())
    }

    pub fn date_parser(&self) -> DateParser {
        if self.date_formats.is_empty() {
            DateParser::default()
        } else {
            DateParser::with_formats(self.date_formats.iter().cloned())
        }
    }
}
