/// Provides constants and utilities for working with
/// the "inspections" database table.
pub struct InspectionTable;

impl InspectionTable {
    /// The name of the database table
    pub const TABLE_NAME: &'static str = "inspections";

    /// The column name for the primary key identifier of an inspection.
    pub const COLUMN_ID: &'static str = "id";

    /// The column name for storing the cargo lot number.
    pub const COLUMN_LOT_NUMBER: &'static str = "lot_number";

    /// The column name for storing the lifecycle status.
    pub const COLUMN_STATUS: &'static str = "status";

    /// The column name for the creation timestamp.
    pub const COLUMN_CREATED_AT: &'static str = "created_at";

    /// SQL statement for creating the inspections table with the initial
    /// schema. GPS coordinates are added by a later migration.
    pub fn create_table() -> &'static str {
        "CREATE TABLE IF NOT EXISTS inspections (
            id TEXT PRIMARY KEY NOT NULL,
            lot_number TEXT NOT NULL,
            container_number TEXT,
            product_type_id TEXT NOT NULL,
            quantity REAL NOT NULL,
            weight REAL NOT NULL,
            unit TEXT NOT NULL,
            port_location TEXT NOT NULL,
            weather_conditions TEXT NOT NULL,
            inspector_id TEXT NOT NULL,
            status TEXT NOT NULL,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            completed_at TEXT
        )"
    }

    pub fn create_indexes() -> Vec<&'static str> {
        vec![
            "CREATE INDEX IF NOT EXISTS idx_inspections_lot_number ON inspections(lot_number)",
            "CREATE INDEX IF NOT EXISTS idx_inspections_status ON inspections(status)",
            "CREATE INDEX IF NOT EXISTS idx_inspections_inspector_id ON inspections(inspector_id)",
            "CREATE INDEX IF NOT EXISTS idx_inspections_created_at ON inspections(created_at)",
            "CREATE INDEX IF NOT EXISTS idx_inspections_product_type_id ON inspections(product_type_id)",
        ]
    }
}
