use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

const DEFAULT_DOC_URL: &str = "https://core.telegram.org/bots/api";
const DEFAULT_CACHE_PATH: &str = "build/source/schema.html";
const DEFAULT_SCHEMA_PATH: &str = "build/source/schema.json";
const DEFAULT_TABLE_SELECTOR: &str = "table.table";
const DEFAULT_HEADING_LEVEL: u8 = 4;

/// Run configuration: built-in defaults, then `schema.toml`, then `SCHEMA_*` env vars.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub doc_url: String,
    pub cache_path: PathBuf,
    pub schema_path: PathBuf,
    /// Selects the field/parameter tables.
    pub table_selector: String,
    /// `h4` on the Bot API page.
    pub heading_level: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            doc_url: DEFAULT_DOC_URL.to_string(),
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            schema_path: PathBuf::from(DEFAULT_SCHEMA_PATH),
            table_selector: DEFAULT_TABLE_SELECTOR.to_string(),
            heading_level: DEFAULT_HEADING_LEVEL,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let defaults = Settings::default();
        Config::builder()
            .set_default("doc_url", defaults.doc_url)?
            .set_default("cache_path", defaults.cache_path.to_string_lossy().into_owned())?
            .set_default("schema_path", defaults.schema_path.to_string_lossy().into_owned())?
            .set_default("table_selector", defaults.table_selector)?
            .set_default("heading_level", i64::from(defaults.heading_level))?
            .add_source(File::with_name("schema").required(false))
            .add_source(Environment::with_prefix("SCHEMA"))
            .build()
            .context("Failed to load settings")?
            .try_deserialize()
            .context("Invalid settings")
    }

    /// Absolute documentation link for a heading anchor such as `#message`.
    pub fn link_for(&self, anchor: Option<&str>) -> String {
        match anchor {
            Some(a) if a.starts_with('#') => format!("{}{}", self.doc_url, a),
            Some(a) => a.to_string(),
            None => self.doc_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_bot_api() {
        let s = Settings::default();
        assert_eq!(s.doc_url, "https://core.telegram.org/bots/api");
        assert_eq!(s.heading_level, 4);
        assert_eq!(s.table_selector, "table.table");
    }

    #[test]
    fn anchors_become_absolute_links() {
        let s = Settings::default();
        assert_eq!(s.link_for(Some("#message")), "https://core.telegram.org/bots/api#message");
        assert_eq!(s.link_for(Some("https://example.org/x")), "https://example.org/x");
        assert_eq!(s.link_for(None), "https://core.telegram.org/bots/api");
    }
}
