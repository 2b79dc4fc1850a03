//! Application configuration - explicit paths, no ambient state
//!
//! The store takes its database path from here (or from the CLI flag);
//! the core never consults environment variables or the working
//! directory on its own.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub database: Option<String>,
    pub backup_dir: Option<String>,
}

impl AppConfig {
    /// Resolve the database path: config value, else the default
    pub fn database_path(&self) -> PathBuf {
        self.database
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path)
    }

    /// Resolve the backup directory: config value, else `backups/`
    pub fn backup_dir(&self) -> PathBuf {
        self.backup_dir
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("backups"))
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("insurdesk.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("data").join("crm.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<AppConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: AppConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &AppConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Create the database file's parent directory when missing
pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
