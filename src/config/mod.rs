//! Application configuration loaded from `config.toml`.
//!
//! Every field has a default, so a missing file or a partial file is fine.
//! The config is built once at startup and passed down explicitly.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::{Error, Result};

const MAX_DECIMALS: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file; defaults to the platform data directory.
    pub database_path: Option<PathBuf>,
    /// User id the CLI acts as.
    pub user: String,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
    pub display: DisplayConfig,
}

/// How amounts are rendered for people.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub decimals: u32,
    pub currency_symbol: String,
    pub thousands_separator: String,
    pub decimal_separator: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            user: "local".into(),
            log_filter: "warn".into(),
            display: DisplayConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            decimals: 2,
            currency_symbol: "$".into(),
            thousands_separator: ",".into(),
            decimal_separator: ".".into(),
        }
    }
}

impl AppConfig {
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))?;
        config.check()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::parse(&contents)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!(path = %path.display(), "loading config");
            Self::load(path)
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Resolved database location. Creates the default data directory if needed.
    pub fn database_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }
        let proj_dirs = project_dirs()?;
        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;
        Ok(data_dir.join("budgetrule.db"))
    }

    fn check(&self) -> Result<()> {
        if self.user.trim().is_empty() {
            return Err(Error::Config("user must not be empty".into()));
        }
        if self.display.decimals > MAX_DECIMALS {
            return Err(Error::Config(format!(
                "display.decimals must be at most {MAX_DECIMALS}, got {}",
                self.display.decimals
            )));
        }
        Ok(())
    }
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "budgetrule", "BudgetRule")
        .ok_or_else(|| Error::Config("Could not determine data directory".into()))
}

#[cfg(test)]
mod tests;
