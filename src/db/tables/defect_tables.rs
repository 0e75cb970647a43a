/// Provides constants and utilities for working with
/// the "defect_records" database table.
pub struct DefectRecordTable;

impl DefectRecordTable {
    /// The name of the database table
    pub const TABLE_NAME: &'static str = "defect_records";

    /// The column name for the primary key identifier of a defect record.
    pub const COLUMN_ID: &'static str = "id";

    /// The column name for the owning inspection id.
    pub const COLUMN_INSPECTION_ID: &'static str = "inspection_id";

    /// The column name for the defect severity.
    pub const COLUMN_SEVERITY: &'static str = "severity";

    /// SQL statement for creating the defect_records table. Rows are
    /// cascade-deleted with their owning inspection.
    pub fn create_table() -> &'static str {
        "CREATE TABLE IF NOT EXISTS defect_records (
            id TEXT PRIMARY KEY NOT NULL,
            inspection_id TEXT NOT NULL,
            defect_type TEXT NOT NULL,
            defect_category TEXT NOT NULL,
            severity TEXT NOT NULL,
            count INTEGER NOT NULL,
            description TEXT NOT NULL,
            location_notes TEXT,
            affected_quantity REAL,
            affected_percentage REAL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (inspection_id) REFERENCES inspections(id) ON DELETE CASCADE
        )"
    }

    pub fn create_indexes() -> Vec<&'static str> {
        vec![
            "CREATE INDEX IF NOT EXISTS idx_defect_records_inspection_id ON defect_records(inspection_id)",
            "CREATE INDEX IF NOT EXISTS idx_defect_records_defect_type ON defect_records(defect_type)",
            "CREATE INDEX IF NOT EXISTS idx_defect_records_severity ON defect_records(severity)",
        ]
    }
}
