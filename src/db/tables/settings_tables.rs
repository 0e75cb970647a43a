/// Provides constants and utilities for working with the single-row
/// "settings" table. Global selections (the active inspector) live here so
/// they survive restarts and are queryable like any other entity.
pub struct SettingsTable;

impl SettingsTable {
    /// The name of the database table
    pub const TABLE_NAME: &'static str = "settings";

    pub fn create_table() -> &'static str {
        "CREATE TABLE IF NOT EXISTS settings (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            active_inspector_id TEXT
        )"
    }

    /// The settings row always exists; writers only ever UPDATE it.
    pub fn seed_row() -> &'static str {
        "INSERT OR IGNORE INTO settings (id, active_inspector_id) VALUES (1, NULL)"
    }
}
