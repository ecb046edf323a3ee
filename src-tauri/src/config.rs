use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/analyze";
pub const ENDPOINT_ENV: &str = "PHOTO_VERDICT_ENDPOINT";
pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Full URL of the analysis endpoint.
    pub endpoint: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl WidgetConfig {
    /// Reads `config.json` from `dir`, then applies the environment override.
    pub fn load(dir: &Path) -> Result<Self, AppError> {
        let config = Self::read(dir)?;
        Ok(config.with_endpoint_override(std::env::var(ENDPOINT_ENV).ok()))
    }

    /// A missing file yields defaults; a malformed one is an error.
    pub fn read(dir: &Path) -> Result<Self, AppError> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)?;
        serde_json::from_str(&raw).map_err(|e| AppError {
            message: format!("Invalid config {}: {}", path.display(), e),
        })
    }

    pub fn save(&self, dir: &Path) -> Result<(), AppError> {
        std::fs::create_dir_all(dir)?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(dir.join(CONFIG_FILE), json)?;
        Ok(())
    }

    pub fn with_endpoint_override(mut self, endpoint: Option<String>) -> Self {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            self.endpoint = endpoint.trim().to_string();
        }
        self
    }
}
