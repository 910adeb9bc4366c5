use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Business identity printed on receipts and used in the insight prompt.
/// Loaded from an optional TOML file next to the data file; every field
/// has a default so a missing file just means the stock profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessProfile {
    pub name: String,
    pub tagline: String,
    pub owner: String,
    pub phone: String,
    pub document_title: String,
}

impl Default for BusinessProfile {
    fn default() -> Self {
        Self {
            name: "Electrical Services".to_string(),
            tagline: String::new(),
            owner: String::new(),
            phone: String::new(),
            document_title: "Service Note".to_string(),
        }
    }
}

impl BusinessProfile {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}
