// src/config.rs
// =============================================================================
// Checker configuration.
//
// Every field has a default matching the behavior the tool ships with
// (Google France, 20 s timeout, 1 s between queries). A JSON file can
// override any subset of fields; CLI flags are applied on top of that.
//
// Example config file:
//   {
//     "locale": "en",
//     "country": null,
//     "delay_ms": 2000,
//     "rules": [
//       { "phrase": "unusual traffic", "outcome": "blocked" },
//       { "phrase": "did not match any documents", "outcome": "not_found" }
//     ]
//   }
// =============================================================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::checker::{default_rules, PhraseRule};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Search endpoint the queries are sent to
    pub endpoint: String,
    /// Interface language hint (`hl` parameter)
    pub locale: String,
    /// Country restriction (`cr` parameter), omitted when None
    pub country: Option<String>,
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Pause after every query
    pub delay_ms: u64,
    /// Status code the engine uses for rate limiting
    pub rate_limit_status: u16,
    /// Phrase rules, see checker::classify
    pub rules: Vec<PhraseRule>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://www.google.com/search".to_string(),
            locale: "fr".to_string(),
            country: Some("countryFR".to_string()),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .to_string(),
            accept_language: "fr-FR,fr;q=0.9,en-US;q=0.8,en;q=0.7".to_string(),
            timeout_secs: 20,
            delay_ms: 1000,
            rate_limit_status: 429,
            rules: default_rules(),
        }
    }
}

impl CheckerConfig {
    // Loads a JSON config file; missing fields keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}
