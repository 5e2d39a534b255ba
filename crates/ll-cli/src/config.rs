//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use ll_core::{DEFAULT_FILE_PREFIX, LedgerConfig, ParseRules};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the agent's daily log files.
    pub log_dir: PathBuf,
    /// Path to the database of committed days.
    pub database_path: PathBuf,
    /// Log file name prefix, before the `YYYYMMDD` date.
    pub file_prefix: String,
    /// Idle gap in seconds that ends an activity segment.
    pub gap_threshold_secs: f64,
    /// Item names never reported. Entries mentioning them do not count as activity.
    pub forbidden_items: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        let rules = ParseRules::default();
        Self {
            log_dir: PathBuf::from("log"),
            database_path: data_dir.join("ledger.db"),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            gap_threshold_secs: rules.gap_threshold_secs,
            forbidden_items: rules.forbidden_items,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (LL_*)
        figment = figment.merge(Env::prefixed("LL_"));

        let config: Self = figment.extract()?;
        config
            .parse_rules()
            .validate()
            .map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    fn parse_rules(&self) -> ParseRules {
        ParseRules {
            gap_threshold_secs: self.gap_threshold_secs,
            forbidden_keywords: self.forbidden_items.clone(),
            forbidden_items: self.forbidden_items.clone(),
        }
    }

    /// Ledger settings derived from this configuration.
    pub fn ledger_config(&self) -> LedgerConfig {
        let mut ledger = LedgerConfig::new(&self.log_dir);
        ledger.file_prefix.clone_from(&self.file_prefix);
        ledger.rules = self.parse_rules();
        ledger
    }
}

/// Returns the platform-specific config directory for loot-ledger.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("loot-ledger"))
}

/// Returns the platform-specific data directory for loot-ledger.
///
/// On Linux: `~/.local/share/loot-ledger`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("loot-ledger"))
}
