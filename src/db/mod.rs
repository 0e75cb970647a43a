use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tokio::sync::RwLock;

use crate::config::Config;
use crate::error::{AppError, Result};

pub mod migrations;
pub mod tables;

pub type DbPool = Pool<Sqlite>;

/// Supplies the symmetric key protecting the database file. The store only
/// needs "a passphrase or none"; how the key is derived (platform keystore,
/// environment, hardware token) is the implementation's concern.
#[async_trait]
pub trait KeyProvider: Send + Sync {
    async fn database_key(&self) -> Result<Option<String>>;
}

/// No at-rest encryption.
pub struct NoEncryption;

#[async_trait]
impl KeyProvider for NoEncryption {
    async fn database_key(&self) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Reads the passphrase from an environment variable.
pub struct EnvKeyProvider {
    var: String,
}

impl EnvKeyProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait]
impl KeyProvider for EnvKeyProvider {
    async fn database_key(&self) -> Result<Option<String>> {
        Ok(std::env::var(&self.var).ok().filter(|key| !key.is_empty()))
    }
}

/// Handle to the SQLite database file. Owns the connection pool so that
/// backup/restore can close every connection, swap the underlying file and
/// reopen, while stores keep holding the same `Arc<Db>`.
pub struct Db {
    path: PathBuf,
    key: Option<String>,
    max_pool_size: u32,
    pool: RwLock<Option<DbPool>>,
}

impl Db {
    /// Open (creating if missing) the database and bring the schema up to
    /// the current version.
    pub async fn open(config: &Config, keys: &dyn KeyProvider) -> Result<Arc<Self>> {
        if let Some(dir) = config.database_path.parent() {
            fs::create_dir_all(dir)?;
        }

        let key = keys.database_key().await?;
        let pool = connect_pool(&config.database_path, key.as_deref(), config.max_pool_size).await?;
        migrations::run(&pool).await?;

        Ok(Arc::new(Db {
            path: config.database_path.clone(),
            key,
            max_pool_size: config.max_pool_size,
            pool: RwLock::new(Some(pool)),
        }))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current connection pool; fails while the pool is closed for
    /// backup/restore.
    pub async fn pool(&self) -> Result<DbPool> {
        self.pool
            .read()
            .await
            .clone()
            .ok_or(AppError::Database(sqlx::Error::PoolClosed))
    }

    /// Close every live connection. Used by backup/restore before touching
    /// the database file.
    pub(crate) async fn close(&self) {
        if let Some(pool) = self.pool.write().await.take() {
            pool.close().await;
        }
    }

    /// Reconnect after the file has been replaced or released, re-running
    /// migrations in case the restored file is older than the schema.
    pub(crate) async fn reopen(&self) -> Result<()> {
        let pool = connect_pool(&self.path, self.key.as_deref(), self.max_pool_size).await?;
        migrations::run(&pool).await?;
        *self.pool.write().await = Some(pool);
        Ok(())
    }
}

async fn connect_pool(path: &Path, key: Option<&str>, max_pool_size: u32) -> Result<DbPool> {
    let mut options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true);

    if let Some(key) = key {
        // SQLCipher-style keying; applied before any other statement on
        // each new connection. A stock SQLite build ignores the pragma.
        let escaped = key.replace('\'', "''");
        options = options.pragma("key", format!("'{escaped}'"));
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(max_pool_size)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await?;

    Ok(pool)
}
