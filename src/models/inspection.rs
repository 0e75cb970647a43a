use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle state of an inspection. Transitions are monotonic
/// (Draft -> InProgress -> Completed) except cancellation, which is
/// allowed from any non-completed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InspectionStatus {
    Draft,
    InProgress,
    Completed,
    Cancelled,
}

impl InspectionStatus {
    /// Stable name used in reports and CSV exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionStatus::Draft => "DRAFT",
            InspectionStatus::InProgress => "IN_PROGRESS",
            InspectionStatus::Completed => "COMPLETED",
            InspectionStatus::Cancelled => "CANCELLED",
        }
    }
}

/// One cargo inspection event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Inspection {
    pub id: String,
    pub lot_number: String,
    pub container_number: Option<String>,
    pub product_type_id: String,
    pub quantity: f64,
    pub weight: f64,
    pub unit: String,
    pub port_location: String,
    pub weather_conditions: String,
    pub inspector_id: String,
    pub status: InspectionStatus,
    pub notes: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Input for creating an inspection. Identifier, status and timestamps
/// are assigned by the create use case, never by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInspection {
    pub lot_number: String,
    pub container_number: Option<String>,
    pub product_type_id: String,
    pub quantity: f64,
    pub weight: f64,
    pub unit: String,
    pub port_location: String,
    pub weather_conditions: String,
    pub inspector_id: String,
    pub notes: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Inspection {
    /// Build a fresh draft from caller input.
    pub fn new(input: NewInspection) -> Self {
        let now = Utc::now();
        Inspection {
            id: Uuid::new_v4().to_string(),
            lot_number: input.lot_number,
            container_number: input.container_number,
            product_type_id: input.product_type_id,
            quantity: input.quantity,
            weight: input.weight,
            unit: input.unit,
            port_location: input.port_location,
            weather_conditions: input.weather_conditions,
            inspector_id: input.inspector_id,
            status: InspectionStatus::Draft,
            notes: input.notes,
            latitude: input.latitude,
            longitude: input.longitude,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }
}

/// Aggregate counts computed by the store in SQL, not in memory.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct InspectionStatistics {
    pub total: i64,
    pub draft: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub cancelled: i64,
    pub total_quantity: f64,
    pub total_weight: f64,
}

impl InspectionStatistics {
    pub fn completion_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}
