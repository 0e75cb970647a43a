/// Provides constants and utilities for working with
/// the "inspectors" database table.
pub struct InspectorTable;

impl InspectorTable {
    /// The name of the database table
    pub const TABLE_NAME: &'static str = "inspectors";

    pub fn create_table() -> &'static str {
        "CREATE TABLE IF NOT EXISTS inspectors (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            company TEXT NOT NULL,
            role TEXT NOT NULL,
            signature_image_path TEXT,
            is_active INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )"
    }

    pub fn create_indexes() -> Vec<&'static str> {
        vec!["CREATE INDEX IF NOT EXISTS idx_inspectors_company_name ON inspectors(company, name)"]
    }
}
