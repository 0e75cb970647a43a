use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use chrono::Utc;
use zip::CompressionMethod;
use zip::write::{FileOptions, ZipWriter};

use crate::config::Config;
use crate::db::{Db, migrations};
use crate::error::{AppError, Result};
use crate::services::run_blocking;

const BACKUP_PREFIX: &str = "MetalInspect_backup_";

/// Packages the database file plus the photo and signature trees into one
/// zip archive, and restores from such an archive. All connections are
/// closed around file access; callers serialize through the backup
/// service's operation lock.
pub struct BackupManager {
    db: Arc<Db>,
    config: Arc<Config>,
}

impl BackupManager {
    pub fn new(db: Arc<Db>, config: Arc<Config>) -> Self {
        Self { db, config }
    }

    /// Write `MetalInspect_backup_<timestamp>.zip` into the backup
    /// directory. The archive is assembled in a temporary file and renamed
    /// on success, so a failed run leaves nothing behind.
    pub async fn create_backup(&self) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.config.backups_dir).await?;

        let file_name = format!("{BACKUP_PREFIX}{}.zip", Utc::now().format("%Y%m%d_%H%M%S"));
        let final_path = self.config.backups_dir.join(&file_name);
        let tmp_path = final_path.with_extension("zip.tmp");

        let metadata = backup_metadata();
        let database_path = self.db.path().to_path_buf();
        let photos_dir = self.config.photos_dir.clone();
        let signatures_dir = self.config.signatures_dir.clone();
        let archive_path = tmp_path.clone();

        self.db.close().await;
        let archived = run_blocking(move || {
            write_archive(&archive_path, &database_path, &photos_dir, &signatures_dir, &metadata)
        })
        .await;
        let reopened = self.db.reopen().await;

        if archived.is_err() {
            let _ = tokio::fs::remove_file(&tmp_path).await;
        }
        archived?;
        reopened?;

        tokio::fs::rename(&tmp_path, &final_path).await?;
        tracing::info!(path = %final_path.display(), "created backup");
        Ok(final_path)
    }

    /// Restore from an archive. The archive is validated before the live
    /// database is touched; a missing archive or a bundle without a
    /// database file fails cleanly with the live data intact.
    pub async fn restore_backup(&self, backup_file: &Path) -> Result<()> {
        if !backup_file.exists() {
            return Err(AppError::Backup("Backup file does not exist".into()));
        }

        let staging = tempfile::tempdir()?;
        let staging_path = staging.path().to_path_buf();
        let archive = backup_file.to_path_buf();
        run_blocking(move || extract_archive(&archive, &staging_path)).await?;

        let extracted_db = staging.path().join("database.db");
        if !extracted_db.exists() {
            return Err(AppError::Backup(
                "Backup does not contain a database file".into(),
            ));
        }

        let live_db = self.db.path().to_path_buf();
        let photos_dir = self.config.photos_dir.clone();
        let signatures_dir = self.config.signatures_dir.clone();
        let staged_photos = staging.path().join("photos");
        let staged_signatures = staging.path().join("signatures");

        self.db.close().await;
        let swapped = run_blocking(move || {
            // Stage next to the live file, then rename: the swap itself is
            // atomic and a half-copied database can never go live.
            let incoming = live_db.with_extension("db.restore");
            std::fs::copy(&extracted_db, &incoming)?;
            std::fs::rename(&incoming, &live_db)?;

            copy_tree(&staged_photos, &photos_dir)?;
            copy_tree(&staged_signatures, &signatures_dir)?;
            Ok(())
        })
        .await;
        let reopened = self.db.reopen().await;

        swapped?;
        reopened?;

        tracing::info!(archive = %backup_file.display(), "restored backup");
        Ok(())
    }

    /// Existing backup archives, newest first.
    pub async fn list_backups(&self) -> Result<Vec<PathBuf>> {
        let backups_dir = self.config.backups_dir.clone();
        run_blocking(move || {
            let entries = match std::fs::read_dir(&backups_dir) {
                Ok(entries) => entries,
                Err(_) => return Ok(Vec::new()),
            };

            let mut backups: Vec<(PathBuf, SystemTime)> = Vec::new();
            for entry in entries {
                let entry = entry?;
                let name = entry.file_name().to_string_lossy().into_owned();
                if name.starts_with(BACKUP_PREFIX) && name.ends_with(".zip") {
                    let modified = entry
                        .metadata()?
                        .modified()
                        .unwrap_or(SystemTime::UNIX_EPOCH);
                    backups.push((entry.path(), modified));
                }
            }
            backups.sort_by(|a, b| b.1.cmp(&a.1));
            Ok(backups.into_iter().map(|(path, _)| path).collect())
        })
        .await
    }

    /// Prune archives older than `max_age`; returns how many were removed.
    pub async fn delete_old_backups(&self, max_age: Duration) -> Result<usize> {
        let cutoff = SystemTime::now() - max_age;
        let backups = self.list_backups().await?;

        let mut removed = 0;
        for backup in backups {
            let modified = tokio::fs::metadata(&backup)
                .await?
                .modified()
                .unwrap_or(SystemTime::UNIX_EPOCH);
            if modified < cutoff {
                tokio::fs::remove_file(&backup).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

fn backup_metadata() -> String {
    format!(
        "MetalInspect Backup\nCreated: {}\nVersion: {}\nSchema Version: {}\nHost: {}\n",
        Utc::now().to_rfc3339(),
        env!("CARGO_PKG_VERSION"),
        migrations::SCHEMA_VERSION,
        std::env::consts::OS,
    )
}

fn write_archive(
    archive_path: &Path,
    database_path: &Path,
    photos_dir: &Path,
    signatures_dir: &Path,
    metadata: &str,
) -> Result<()> {
    let file = File::create(archive_path)?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("backup_info.txt", options)
        .map_err(|error| AppError::Backup(error.to_string()))?;
    zip.write_all(metadata.as_bytes())?;

    if database_path.exists() {
        zip.start_file("database.db", options)
            .map_err(|error| AppError::Backup(error.to_string()))?;
        let mut database = File::open(database_path)?;
        std::io::copy(&mut database, &mut zip)?;
    }

    add_directory(&mut zip, photos_dir, "photos/", options)?;
    add_directory(&mut zip, signatures_dir, "signatures/", options)?;

    zip.finish()
        .map_err(|error| AppError::Backup(error.to_string()))?;
    Ok(())
}

fn add_directory(
    zip: &mut ZipWriter<File>,
    dir: &Path,
    base: &str,
    options: FileOptions,
) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = format!("{base}{}", entry.file_name().to_string_lossy());

        if path.is_dir() {
            zip.add_directory(format!("{name}/"), options)
                .map_err(|error| AppError::Backup(error.to_string()))?;
            add_directory(zip, &path, &format!("{name}/"), options)?;
        } else {
            zip.start_file(name, options)
                .map_err(|error| AppError::Backup(error.to_string()))?;
            let mut file = File::open(&path)?;
            std::io::copy(&mut file, zip)?;
        }
    }
    Ok(())
}

fn extract_archive(archive_path: &Path, target: &Path) -> Result<()> {
    let file = File::open(archive_path)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|error| AppError::Backup(error.to_string()))?;
    archive
        .extract(target)
        .map_err(|error| AppError::Backup(error.to_string()))?;
    Ok(())
}

/// Recursive overwrite-on-conflict merge of one directory tree into
/// another. A missing source is a no-op.
fn copy_tree(source: &Path, target: &Path) -> Result<()> {
    if !source.exists() {
        return Ok(());
    }
    std::fs::create_dir_all(target)?;

    for entry in std::fs::read_dir(source)? {
        let entry = entry?;
        let from = entry.path();
        let to = target.join(entry.file_name());
        if from.is_dir() {
            copy_tree(&from, &to)?;
        } else {
            std::fs::copy(&from, &to)?;
        }
    }
    Ok(())
}
