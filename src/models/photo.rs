use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An image captured during an inspection, optionally tagged to a defect.
/// Sequence indices within one inspection form a contiguous range starting
/// at 0 and are compacted after deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct InspectionPhoto {
    pub id: String,
    pub inspection_id: String,
    pub defect_record_id: Option<String>,
    pub file_path: String,
    pub caption: Option<String>,
    pub sequence_index: i64,
    pub file_size: i64,
    pub image_width: i64,
    pub image_height: i64,
    pub created_at: DateTime<Utc>,
}
