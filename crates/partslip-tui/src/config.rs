//! Application configuration management.
//!
//! Holds the last used sheet URL and how sheets are interpreted (slot range,
//! cross-month date style, message templates).
//!
//! Configuration is stored at `~/.config/partslip/config.json`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use partslip_core::client::DEFAULT_TIMEOUT_SECS;
use partslip_core::{CrossMonthStyle, LoadOptions, MessageRenderer, SlotFilter, Templates};
use serde::{Deserialize, Serialize};

/// Application name used for config/log directory paths
const APP_NAME: &str = "partslip";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable that overrides the stored sheet URL
pub const SHEET_URL_ENV: &str = "PARTSLIP_SHEET_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sheet_url: Option<String>,
    pub accept_all_slots: bool,
    pub slot_min: u32,
    pub slot_max: u32,
    pub cross_month_style: CrossMonthStyle,
    pub request_timeout_secs: u64,
    pub templates: Option<Templates>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sheet_url: None,
            accept_all_slots: false,
            slot_min: 3,
            slot_max: 7,
            cross_month_style: CrossMonthStyle::default(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            templates: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn log_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Sheet URL to use at startup: the environment wins over the config file.
    pub fn initial_sheet_url(&self) -> Option<String> {
        std::env::var(SHEET_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.sheet_url.clone())
    }

    pub fn slot_filter(&self) -> SlotFilter {
        if self.accept_all_slots {
            SlotFilter::All
        } else {
            SlotFilter::Range {
                min: self.slot_min.min(self.slot_max),
                max: self.slot_min.max(self.slot_max),
            }
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            slot_filter: self.slot_filter(),
            cross_month: self.cross_month_style,
        }
    }

    pub fn renderer(&self) -> MessageRenderer {
        MessageRenderer::new(self.templates.clone().unwrap_or_default())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_slot_filter_is_three_to_seven() {
        let config = Config::default();
        assert_eq!(config.slot_filter(), SlotFilter::Range { min: 3, max: 7 });
        assert_eq!(config.load_options(), LoadOptions::default());
    }

    #[test]
    fn test_slot_filter_options() {
        let all = Config {
            accept_all_slots: true,
            ..Config::default()
        };
        assert_eq!(all.slot_filter(), SlotFilter::All);

        let swapped = Config {
            slot_min: 9,
            slot_max: 2,
            ..Config::default()
        };
        assert_eq!(swapped.slot_filter(), SlotFilter::Range { min: 2, max: 9 });
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(
            r#"{"sheet_url": "https://example.com/exec", "cross_month_style": "suffix_both"}"#,
        )
        .expect("parses");
        assert_eq!(config.sheet_url.as_deref(), Some("https://example.com/exec"));
        assert_eq!(config.cross_month_style, CrossMonthStyle::SuffixBoth);
        assert_eq!(config.slot_min, 3);
        assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_custom_templates_reach_renderer() {
        let config: Config =
            serde_json::from_str(r#"{"templates": {"single_marker": "Bro."}}"#).expect("parses");
        let renderer = config.renderer();
        assert_eq!(renderer.templates().single_marker, "Bro.");
        assert_eq!(renderer.templates().paired_marker, "姊妹");
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir()
            .join(format!("partslip-config-{}", std::process::id()))
            .join(CONFIG_FILE);
        assert_eq!(Config::load_from(&path).expect("missing file"), Config::default());

        let config = Config {
            sheet_url: Some("https://example.com/exec".to_string()),
            slot_max: 9,
            ..Config::default()
        };
        config.save_to(&path).expect("saves");
        assert_eq!(Config::load_from(&path).expect("loads"), config);

        let _ = std::fs::remove_dir_all(path.parent().expect("has parent"));
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = Config {
            sheet_url: Some("https://docs.google.com/spreadsheets/d/abc/edit".to_string()),
            ..Config::default()
        };
        let json = serde_json::to_string_pretty(&config).expect("serializes");
        let parsed: Config = serde_json::from_str(&json).expect("parses");
        assert_eq!(parsed, config);
    }
}
