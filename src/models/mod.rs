pub mod checklist;
pub mod defect;
pub mod details;
pub mod inspection;
pub mod inspector;
pub mod photo;
pub mod product_type;

pub use checklist::{ChecklistCategory, ChecklistInputType, ChecklistItem, ChecklistResponse};
pub use defect::{DefectCategory, DefectRecord, DefectSeverity, NewDefect};
pub use details::{DefectCounts, InspectionExportRow, InspectionWithDetails};
pub use inspection::{Inspection, InspectionStatistics, InspectionStatus, NewInspection};
pub use inspector::Inspector;
pub use photo::InspectionPhoto;
pub use product_type::ProductType;
