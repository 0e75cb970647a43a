/// Provides constants and utilities for working with
/// the "product_types" database table.
pub struct ProductTypeTable;

impl ProductTypeTable {
    /// The name of the database table
    pub const TABLE_NAME: &'static str = "product_types";

    pub fn create_table() -> &'static str {
        "CREATE TABLE IF NOT EXISTS product_types (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            standard_dimensions TEXT,
            standard_grades TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        )"
    }

    pub fn create_indexes() -> Vec<&'static str> {
        vec!["CREATE UNIQUE INDEX IF NOT EXISTS idx_product_types_name ON product_types(name)"]
    }
}
