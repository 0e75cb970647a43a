use std::env;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct Config {
    pub database_path: PathBuf,
    pub photos_dir: PathBuf,
    pub signatures_dir: PathBuf,
    pub reports_dir: PathBuf,
    pub backups_dir: PathBuf,
    pub max_pool_size: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let data_dir = PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()));

        let max_pool_size = env::var("MAX_POOL_SIZE")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPoolSize)?;

        Ok(Self::with_data_dir(&data_dir).max_pool_size(max_pool_size))
    }

    /// Lay out all storage locations under a single data directory.
    pub fn with_data_dir(data_dir: &Path) -> Self {
        Self {
            database_path: data_dir.join("metal_inspect.db"),
            photos_dir: data_dir.join("inspection_photos"),
            signatures_dir: data_dir.join("signatures"),
            reports_dir: data_dir.join("reports"),
            backups_dir: data_dir.join("backups"),
            max_pool_size: 5,
        }
    }

    pub fn max_pool_size(mut self, size: u32) -> Self {
        self.max_pool_size = size;
        self
    }

    /// Photos of one inspection live in their own subdirectory.
    pub fn inspection_photo_dir(&self, inspection_id: &str) -> PathBuf {
        self.photos_dir.join(inspection_id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid pool size")]
    InvalidPoolSize,
}
