/// Provides constants and utilities for working with
/// the "checklist_items" database table.
pub struct ChecklistItemTable;

impl ChecklistItemTable {
    /// The name of the database table
    pub const TABLE_NAME: &'static str = "checklist_items";

    pub fn create_table() -> &'static str {
        "CREATE TABLE IF NOT EXISTS checklist_items (
            id TEXT PRIMARY KEY NOT NULL,
            category TEXT NOT NULL,
            question TEXT NOT NULL,
            input_type TEXT NOT NULL,
            options TEXT,
            is_required INTEGER NOT NULL DEFAULT 0,
            sequence_order INTEGER NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1
        )"
    }

    pub fn create_indexes() -> Vec<&'static str> {
        vec![
            "CREATE INDEX IF NOT EXISTS idx_checklist_items_category_active ON checklist_items(category, is_active)",
        ]
    }
}

/// Provides constants and utilities for working with
/// the "checklist_responses" database table.
pub struct ChecklistResponseTable;

impl ChecklistResponseTable {
    /// The name of the database table
    pub const TABLE_NAME: &'static str = "checklist_responses";

    pub fn create_table() -> &'static str {
        "CREATE TABLE IF NOT EXISTS checklist_responses (
            id TEXT PRIMARY KEY NOT NULL,
            inspection_id TEXT NOT NULL,
            checklist_item_id TEXT NOT NULL,
            response_value TEXT NOT NULL,
            response_notes TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY (inspection_id) REFERENCES inspections(id) ON DELETE CASCADE,
            FOREIGN KEY (checklist_item_id) REFERENCES checklist_items(id) ON DELETE CASCADE
        )"
    }

    pub fn create_indexes() -> Vec<&'static str> {
        vec![
            "CREATE INDEX IF NOT EXISTS idx_checklist_responses_inspection_id ON checklist_responses(inspection_id)",
            "CREATE INDEX IF NOT EXISTS idx_checklist_responses_item_id ON checklist_responses(checklist_item_id)",
        ]
    }
}
