use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::backup::BackupManager;
use crate::error::Result;

/// Serializes backup and restore behind a single operation lock: the
/// persistence layer must not be used concurrently while its file is being
/// swapped, and two archive operations must never interleave.
#[derive(Clone)]
pub struct BackupService {
    manager: Arc<BackupManager>,
    lock: Arc<Mutex<()>>,
}

impl BackupService {
    pub fn new(manager: BackupManager) -> Self {
        Self {
            manager: Arc::new(manager),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn create_backup(&self) -> Result<PathBuf> {
        let _guard = self.lock.lock().await;
        self.manager.create_backup().await
    }

    pub async fn restore_backup(&self, backup_file: &Path) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.manager.restore_backup(backup_file).await
    }

    pub async fn list_backups(&self) -> Result<Vec<PathBuf>> {
        self.manager.list_backups().await
    }

    pub async fn delete_old_backups(&self, max_age: Duration) -> Result<usize> {
        let _guard = self.lock.lock().await;
        self.manager.delete_old_backups(max_age).await
    }
}
