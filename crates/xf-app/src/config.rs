//! Application configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use xf_data::{CsvLoader, DatasetConfig};
use xf_templates::Template;

/// What to load and which dashboard to drive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Built-in template id; picked from the CSV headers when omitted
    #[serde(default)]
    pub template: Option<String>,

    /// CSV source file
    pub data: PathBuf,

    /// Load configuration (JSON) replacing the template's own
    #[serde(default)]
    pub dataset: Option<PathBuf>,

    /// Optional selection script to replay after the initial render
    #[serde(default)]
    pub events: Option<PathBuf>,

    /// Overrides the row limit; `0` keeps every row
    #[serde(default)]
    pub max_rows: Option<usize>,
}

impl AppConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let mut config: AppConfig =
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;

        // Relative paths are taken from the config file's directory
        if let Some(base) = path.parent() {
            config.data = base.join(&config.data);
            config.dataset = config.dataset.map(|dataset| base.join(dataset));
            config.events = config.events.map(|events| base.join(events));
        }
        Ok(config)
    }

    /// Template to drive and the load configuration to read the source with
    pub fn resolve(&self) -> Result<(Template, DatasetConfig)> {
        let custom = match &self.dataset {
            Some(path) => Some(
                DatasetConfig::from_path(path).with_context(|| format!("loading dataset config {}", path.display()))?,
            ),
            None => None,
        };

        let template = match &self.template {
            Some(id) => xf_templates::by_id(id)?,
            None => {
                let sniffer = CsvLoader::new(custom.clone().unwrap_or_else(|| DatasetConfig::new(Vec::new())));
                let schema = sniffer.header_schema_path(&self.data)?;
                xf_templates::select(None, &schema)?
            }
        };

        let mut dataset = custom.unwrap_or_else(|| template.dataset.clone());
        match self.max_rows {
            Some(0) => dataset.max_rows = None,
            Some(max) => dataset.max_rows = Some(max),
            None => {}
        }
        Ok((template, dataset))
    }
}
