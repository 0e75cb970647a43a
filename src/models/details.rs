use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::defect::{DefectRecord, DefectSeverity};
use crate::models::inspection::{Inspection, InspectionStatus};
use crate::models::inspector::Inspector;
use crate::models::photo::InspectionPhoto;
use crate::models::product_type::ProductType;

/// An inspection joined with everything a report needs.
#[derive(Debug, Clone, Serialize)]
pub struct InspectionWithDetails {
    pub inspection: Inspection,
    pub inspector: Inspector,
    pub product_type: ProductType,
    pub defects: Vec<DefectRecord>,
    pub photos: Vec<InspectionPhoto>,
}

impl InspectionWithDetails {
    pub fn has_defects(&self) -> bool {
        !self.defects.is_empty()
    }

    pub fn critical_defects(&self) -> usize {
        self.defects
            .iter()
            .filter(|d| d.severity == DefectSeverity::Critical)
            .count()
    }
}

/// Per-severity defect counts for one inspection, computed in SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, FromRow)]
pub struct DefectCounts {
    pub total: i64,
    pub critical: i64,
    pub major: i64,
    pub minor: i64,
    pub cosmetic: i64,
}

/// One row of the inspections CSV export: inspection columns joined with
/// inspector and product-type names plus aggregated child counts.
#[derive(Debug, Clone, FromRow)]
pub struct InspectionExportRow {
    pub id: String,
    pub lot_number: String,
    pub container_number: Option<String>,
    pub product_type_name: String,
    pub quantity: f64,
    pub weight: f64,
    pub unit: String,
    pub port_location: String,
    pub weather_conditions: String,
    pub inspector_name: String,
    pub inspector_company: String,
    pub status: InspectionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub total_defects: i64,
    pub critical_defects: i64,
    pub major_defects: i64,
    pub minor_defects: i64,
    pub photo_count: i64,
    pub notes: Option<String>,
}
