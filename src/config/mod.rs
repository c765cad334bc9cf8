//! Configuration management for SkillRelay
//!
//! Configuration is loaded from `~/.skillrelay/config.json` with environment
//! variable overrides of the form `SKILLRELAY_SECTION_KEY`.

mod types;
pub mod validate;

pub use types::*;

use crate::error::Result;
use std::path::{Path, PathBuf};

impl Config {
    /// Returns the SkillRelay configuration directory path (~/.skillrelay)
    pub fn dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".skillrelay")
    }

    /// Returns the path to the config file (~/.skillrelay/config.json)
    pub fn path() -> PathBuf {
        Self::dir().join("config.json")
    }

    /// Load configuration from the default path with environment overrides.
    ///
    /// If the config file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::path())
    }

    /// Load configuration from a specific path with environment overrides.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply process environment overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Unparseable numeric or enum values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Provider
        if let Some(val) = lookup("SKILLRELAY_PROVIDER_API_KEY") {
            self.provider.api_key = Some(val);
        }
        if self.provider.api_key().is_none() {
            if let Some(val) = lookup("OPENAI_API_KEY") {
                self.provider.api_key = Some(val);
            }
        }
        if let Some(val) = lookup("SKILLRELAY_PROVIDER_API_BASE") {
            self.provider.api_base = val;
        }
        if let Some(val) = lookup("SKILLRELAY_PROVIDER_MODEL") {
            self.provider.model = val;
        }

        // Summarizer
        if let Some(val) = lookup("SKILLRELAY_SUMMARIZER_MAX_CHARS") {
            if let Ok(v) = val.parse() {
                self.summarizer.max_chars = v;
            }
        }

        // Dispatch
        if let Some(val) = lookup("SKILLRELAY_DISPATCH_MODE") {
            if let Ok(mode) = val.parse() {
                self.dispatch.mode = mode;
            }
        }

        // Logging
        if let Some(val) = lookup("SKILLRELAY_LOG_LEVEL") {
            self.logging.level = val;
        }
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
