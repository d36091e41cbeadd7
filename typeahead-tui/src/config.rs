use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use typeahead::TypeaheadConfig;

const APP_DIR: &str = "sp-typeahead";
const ENV_PREFIX: &str = "SP_TYPEAHEAD";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SharePoint site searched for suggestions, e.g. "https://contoso.sharepoint.com/sites/finance"
    pub site_url: String,
    /// Bearer token sent to both SharePoint and Graph. Usually set through the environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    pub sharepoint: SharePointSettings,
    pub graph: GraphSettings,
    pub typeahead: TypeaheadConfig,
    /// Log request URLs and row counts from the pipeline crates.
    pub debug_suggestions: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharePointSettings {
    pub enabled: bool,
    pub surface_errors: bool,
    /// Managed properties requested per row. Empty keeps the client defaults.
    pub select_properties: Vec<String>,
}

impl Default for SharePointSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            surface_errors: false,
            select_properties: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    pub enabled: bool,
    pub base_url: String,
    pub entity_types: Vec<String>,
    pub surface_errors: bool,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: graph_search::DEFAULT_BASE_URL.to_string(),
            entity_types: vec![],
            surface_errors: false,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            site_url: String::new(),
            access_token: None,
            sharepoint: SharePointSettings::default(),
            graph: GraphSettings::default(),
            typeahead: TypeaheadConfig::default(),
            debug_suggestions: false,
            log_file: None,
        }
    }
}

impl AppConfig {
    pub fn config_dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Cannot determine config directory")?
            .join(APP_DIR))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load the config file (if any) with `SP_TYPEAHEAD_*` environment overrides on top.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("graph.entity_types")
                    .with_list_parse_key("sharepoint.select_properties"),
            )
            .build()
            .with_context(|| format!("Failed to read config at {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    /// Write a default config file unless one already exists. Returns the path.
    pub fn write_default_if_missing() -> Result<PathBuf> {
        let path = Self::config_path()?;
        Self::default().write_if_missing(&path)?;
        Ok(path)
    }

    fn write_if_missing(&self, path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(path, raw)
            .with_context(|| format!("Failed to write config at {}", path.display()))?;
        Ok(true)
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("sp-typeahead.log")),
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}
