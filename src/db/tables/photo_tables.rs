/// Provides constants and utilities for working with
/// the "inspection_photos" database table.
pub struct PhotoTable;

impl PhotoTable {
    /// The name of the database table
    pub const TABLE_NAME: &'static str = "inspection_photos";

    /// SQL statement for creating the inspection_photos table. A photo may
    /// be tagged to a defect record; both links cascade on delete.
    pub fn create_table() -> &'static str {
        "CREATE TABLE IF NOT EXISTS inspection_photos (
            id TEXT PRIMARY KEY NOT NULL,
            inspection_id TEXT NOT NULL,
            defect_record_id TEXT,
            file_path TEXT NOT NULL,
            caption TEXT,
            sequence_index INTEGER NOT NULL,
            file_size INTEGER NOT NULL,
            image_width INTEGER NOT NULL,
            image_height INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (inspection_id) REFERENCES inspections(id) ON DELETE CASCADE,
            FOREIGN KEY (defect_record_id) REFERENCES defect_records(id) ON DELETE CASCADE
        )"
    }

    pub fn create_indexes() -> Vec<&'static str> {
        vec![
            "CREATE INDEX IF NOT EXISTS idx_inspection_photos_inspection_id ON inspection_photos(inspection_id)",
            "CREATE INDEX IF NOT EXISTS idx_inspection_photos_defect_record_id ON inspection_photos(defect_record_id)",
            "CREATE INDEX IF NOT EXISTS idx_inspection_photos_created_at ON inspection_photos(created_at)",
        ]
    }
}
