pub mod checklist_tables;
pub mod defect_tables;
pub mod inspection_tables;
pub mod inspector_tables;
pub mod photo_tables;
pub mod product_type_tables;
pub mod settings_tables;

pub use checklist_tables::{ChecklistItemTable, ChecklistResponseTable};
pub use defect_tables::DefectRecordTable;
pub use inspection_tables::InspectionTable;
pub use inspector_tables::InspectorTable;
pub use photo_tables::PhotoTable;
pub use product_type_tables::ProductTypeTable;
pub use settings_tables::SettingsTable;
