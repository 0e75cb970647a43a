use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DefectCategory {
    Surface,
    Dimensional,
    Material,
    Packaging,
    Documentation,
}

impl DefectCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefectCategory::Surface => "SURFACE",
            DefectCategory::Dimensional => "DIMENSIONAL",
            DefectCategory::Material => "MATERIAL",
            DefectCategory::Packaging => "PACKAGING",
            DefectCategory::Documentation => "DOCUMENTATION",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DefectSeverity {
    Critical,
    Major,
    Minor,
    Cosmetic,
}

impl DefectSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefectSeverity::Critical => "CRITICAL",
            DefectSeverity::Major => "MAJOR",
            DefectSeverity::Minor => "MINOR",
            DefectSeverity::Cosmetic => "COSMETIC",
        }
    }
}

/// One observed nonconformity tied to an inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DefectRecord {
    pub id: String,
    pub inspection_id: String,
    pub defect_type: String,
    pub defect_category: DefectCategory,
    pub severity: DefectSeverity,
    pub count: i64,
    pub description: String,
    pub location_notes: Option<String>,
    pub affected_quantity: Option<f64>,
    pub affected_percentage: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a defect; id and timestamp are assigned on add.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDefect {
    pub inspection_id: String,
    pub defect_type: String,
    pub defect_category: DefectCategory,
    pub severity: DefectSeverity,
    pub count: i64,
    pub description: String,
    pub location_notes: Option<String>,
    pub affected_quantity: Option<f64>,
    pub affected_percentage: Option<f64>,
}

impl DefectRecord {
    pub fn new(input: NewDefect) -> Self {
        DefectRecord {
            id: Uuid::new_v4().to_string(),
            inspection_id: input.inspection_id,
            defect_type: input.defect_type,
            defect_category: input.defect_category,
            severity: input.severity,
            count: input.count,
            description: input.description,
            location_notes: input.location_notes,
            affected_quantity: input.affected_quantity,
            affected_percentage: input.affected_percentage,
            created_at: Utc::now(),
        }
    }
}
