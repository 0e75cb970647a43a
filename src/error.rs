use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    BusinessRule(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Backup error: {0}")]
    Backup(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Validation, business-rule and not-found failures are expected
    /// outcomes; everything else is a fault worth logging.
    pub fn is_fault(&self) -> bool {
        !matches!(
            self,
            AppError::Validation(_) | AppError::BusinessRule(_) | AppError::NotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
