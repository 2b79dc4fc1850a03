//! Database backup and restore - plain file copies
//!
//! Backups are timestamped copies in a backup directory. Restore keeps a
//! `.before_restore` safety copy of the live file next to it before
//! overwriting, and removes it once the copy succeeds.

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::{Error, Result};

/// Copy the database file into `backup_dir`, returning the backup path.
/// The directory is created if missing.
pub fn backup_database(db_path: &Path, backup_dir: &Path) -> Result<PathBuf> {
    if !db_path.exists() {
        return Err(Error::Validation(
            "데이터베이스 파일을 찾을 수 없습니다".to_string(),
        ));
    }

    std::fs::create_dir_all(backup_dir)?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let backup_path = backup_dir.join(format!("crm_backup_{}.db", timestamp));
    std::fs::copy(db_path, &backup_path)?;

    tracing::info!("database backed up to {}", backup_path.display());
    Ok(backup_path)
}

/// Overwrite the live database with a backup file.
///
/// A pre-restore copy of the current file is kept alongside it until the
/// overwrite succeeds, so a failed copy never loses the previous state.
pub fn restore_database(backup_path: &Path, db_path: &Path) -> Result<()> {
    if !backup_path.exists() {
        return Err(Error::Validation("백업 파일을 찾을 수 없습니다".to_string()));
    }

    let safety_copy = if db_path.exists() {
        let candidate = db_path.with_file_name(format!(
            "{}.before_restore",
            db_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "crm.db".to_string())
        ));
        std::fs::copy(db_path, &candidate)?;
        Some(candidate)
    } else {
        None
    };

    std::fs::copy(backup_path, db_path)?;

    if let Some(safety) = safety_copy {
        if safety.exists() {
            std::fs::remove_file(&safety)?;
        }
    }

    tracing::info!("database restored from {}", backup_path.display());
    Ok(())
}

/// Metadata about a backup file
#[derive(Debug, Clone)]
pub struct BackupInfo {
    pub filename: String,
    pub size: u64,
    pub modified: String,
}

/// Look up backup file metadata, `None` if the file doesn't exist
pub fn backup_info(backup_path: &Path) -> Result<Option<BackupInfo>> {
    if !backup_path.exists() {
        return Ok(None);
    }

    let metadata = std::fs::metadata(backup_path)?;
    let modified = metadata
        .modified()
        .map(|t| {
            chrono::DateTime::<Local>::from(t)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_default();

    Ok(Some(BackupInfo {
        filename: backup_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        size: metadata.len(),
        modified,
    }))
}
