//! Application settings loading from config.toml
//!
//! Every key is optional. A missing file yields [`Settings::default`]; a file that
//! exists but cannot be parsed, or holds out-of-range values, is a configuration
//! error.
//!
//! ```toml
//! [dashboard]
//! recent_activity_limit = 15
//!
//! [display]
//! currency_symbol = "$"
//! separator_label = "Installments from previous months"
//! utc_offset_minutes = 0
//! ```

use crate::{
    core::activity::{ActivityOptions, DEFAULT_RECENT_LIMIT, DEFAULT_SEPARATOR_LABEL},
    errors::{Error, Result},
};
use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// Largest accepted `recent_activity_limit`.
pub const MAX_RECENT_ACTIVITY_LIMIT: u64 = 100;

/// Largest accepted `utc_offset_minutes` either side of UTC (14 hours).
pub const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Dashboard behaviour
    pub dashboard: DashboardSettings,
    /// Text rendering
    pub display: DisplaySettings,
}

/// `[dashboard]` table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardSettings {
    /// How many recent transactions the dashboard and `/recent` show
    pub recent_activity_limit: u64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            recent_activity_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

/// `[display]` table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplaySettings {
    /// Prefix for every amount
    pub currency_symbol: String,
    /// Text of the carry-over separator row
    pub separator_label: String,
    /// Offset from UTC, in minutes, used to decide the current day and month
    pub utc_offset_minutes: i32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            separator_label: DEFAULT_SEPARATOR_LABEL.to_string(),
            utc_offset_minutes: 0,
        }
    }
}

impl Settings {
    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        let limit = self.dashboard.recent_activity_limit;
        if !(1..=MAX_RECENT_ACTIVITY_LIMIT).contains(&limit) {
            return Err(Error::Config {
                message: format!(
                    "dashboard.recent_activity_limit must be between 1 and \
                     {MAX_RECENT_ACTIVITY_LIMIT}, got {limit}"
                ),
            });
        }
        let offset = self.display.utc_offset_minutes;
        if !(-MAX_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&offset) {
            return Err(Error::Config {
                message: format!(
                    "display.utc_offset_minutes must be within ±{MAX_UTC_OFFSET_MINUTES}, \
                     got {offset}"
                ),
            });
        }
        if self.display.separator_label.trim().is_empty() {
            return Err(Error::Config {
                message: "display.separator_label must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Fixed offset for the configured `utc_offset_minutes`.
    #[must_use]
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.display.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    /// Recent-activity options derived from these settings.
    #[must_use]
    pub fn activity_options(&self) -> ActivityOptions {
        ActivityOptions {
            limit: self.dashboard.recent_activity_limit,
            separator_label: self.display.separator_label.clone(),
        }
    }
}

/// Parses and validates settings from TOML text.
pub fn parse_config(contents: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    settings.validate()?;
    Ok(settings)
}

/// Loads settings from a TOML file
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid or contains unknown keys
/// - A value is out of range
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;
    parse_config(&contents)
}

/// Loads settings from the default location (./config.toml), falling back to
/// defaults when the file does not exist.
pub fn load_default_config() -> Result<Settings> {
    let path = Path::new("config.toml");
    if !path.exists() {
        warn!("config.toml not found, using default settings");
        return Ok(Settings::default());
    }
    let settings = load_config(path)?;
    info!(
        recent_activity_limit = settings.dashboard.recent_activity_limit,
        "Loaded settings from config.toml"
    );
    Ok(settings)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let settings = parse_config(
            r#"
            [dashboard]
            recent_activity_limit = 25

            [display]
            currency_symbol = "R$"
            separator_label = "Parcelas anteriores"
            utc_offset_minutes = -180
            "#,
        )
        .unwrap();

        assert_eq!(settings.dashboard.recent_activity_limit, 25);
        assert_eq!(settings.display.currency_symbol, "R$");
        assert_eq!(settings.utc_offset(), FixedOffset::west_opt(3 * 3600).unwrap());
        assert_eq!(
            settings.activity_options(),
            ActivityOptions {
                limit: 25,
                separator_label: "Parcelas anteriores".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let settings = parse_config("[display]\ncurrency_symbol = \"€\"\n").unwrap();
        assert_eq!(settings.dashboard.recent_activity_limit, DEFAULT_RECENT_LIMIT);
        assert_eq!(settings.display.separator_label, DEFAULT_SEPARATOR_LABEL);
        assert_eq!(parse_config("").unwrap(), Settings::default());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = parse_config("[dashboard]\nrecent_activity_limit = 0\n");
        assert!(matches!(result, Err(Error::Config { .. })));

        let result = parse_config("[dashboard]\nrecent_activity_limit = 101\n");
        assert!(matches!(result, Err(Error::Config { .. })));

        let result = parse_config("[dashboard\n");
        assert!(matches!(result, Err(Error::Config { .. })));

        let result = parse_config("[display]\nseparator_label = \"  \"\n");
        assert!(matches!(result, Err(Error::Config { .. })));

        let result = parse_config("[display]\nutc_offset_minutes = 900\n");
        assert!(matches!(result, Err(Error::Config { .. })));

        let result = parse_config("[dashboard]\nunknown = 1\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_load_config_from_file() {
        let path = std::env::temp_dir().join(format!(
            "finance_buddy_settings_{}.toml",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[dashboard]\nrecent_activity_limit = 5").unwrap();
        drop(file);

        let settings = load_config(&path).unwrap();
        assert_eq!(settings.dashboard.recent_activity_limit, 5);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(load_config(&path), Err(Error::Config { .. })));
    }
}
