pub mod backup_service;
pub mod checklist_service;
pub mod defect_service;
pub mod inspection_service;
pub mod inspector_service;
pub mod photo_service;
pub mod product_type_service;
pub mod report_service;

pub use backup_service::BackupService;
pub use checklist_service::ChecklistService;
pub use defect_service::DefectService;
pub use inspection_service::InspectionService;
pub use inspector_service::InspectorService;
pub use photo_service::PhotoService;
pub use product_type_service::ProductTypeService;
pub use report_service::ReportService;

use crate::error::{AppError, Result};

/// Run file-heavy work off the async runtime.
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|error| AppError::Io(std::io::Error::other(error)))?
}
