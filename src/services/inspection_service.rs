use chrono::{DateTime, Utc};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::error::{AppError, Result};
use crate::models::{Inspection, InspectionStatistics, InspectionStatus, NewInspection};
use crate::store::InspectionStore;
use crate::validation::InspectionValidator;

/// Use cases for the inspection lifecycle: create, update, the status
/// transitions and deletion, each validating before it touches the store.
#[derive(Clone)]
pub struct InspectionService {
    inspections: InspectionStore,
    validator: InspectionValidator,
}

impl InspectionService {
    pub fn new(inspections: InspectionStore) -> Self {
        Self {
            inspections,
            validator: InspectionValidator::new(),
        }
    }

    /// Create a fresh draft. Identifier and timestamps are generated here;
    /// `created_at == updated_at` on the returned inspection.
    pub async fn create(&self, input: NewInspection) -> Result<Inspection> {
        let inspection = Inspection::new(input);
        self.validator.check(&inspection)?;

        self.inspections.insert(&inspection).await?;
        tracing::info!(id = %inspection.id, lot_number = %inspection.lot_number, "created inspection");
        Ok(inspection)
    }

    /// Persist caller-side edits; `updated_at` is refreshed on every
    /// mutation.
    pub async fn update(&self, mut inspection: Inspection) -> Result<Inspection> {
        self.validator.check(&inspection)?;

        inspection.updated_at = Utc::now();
        self.inspections.update(&inspection).await?;
        Ok(inspection)
    }

    pub async fn start(&self, id: &str) -> Result<()> {
        let inspection = self.get_required(id).await?;

        if !self.validator.can_start_inspection(&inspection) {
            return Err(AppError::Validation(
                "Inspection cannot be started - missing required fields".into(),
            ));
        }
        self.validator.guard_start(inspection.status)?;

        self.inspections
            .update_status(id, InspectionStatus::InProgress, None)
            .await
    }

    pub async fn complete(&self, id: &str) -> Result<()> {
        let inspection = self.get_required(id).await?;

        self.validator
            .validate_for_completion(&inspection)
            .into_result()?;
        self.validator.guard_complete(inspection.status)?;

        self.inspections
            .update_status(id, InspectionStatus::Completed, Some(Utc::now()))
            .await
    }

    pub async fn cancel(&self, id: &str) -> Result<()> {
        let inspection = self.get_required(id).await?;
        self.validator.guard_cancel(inspection.status)?;

        self.inspections
            .update_status(id, InspectionStatus::Cancelled, None)
            .await
    }

    /// Completed inspections are immutable for deletion purposes.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let inspection = self.get_required(id).await?;
        self.validator.guard_delete(inspection.status)?;

        self.inspections.delete(id).await?;
        tracing::info!(%id, "deleted inspection");
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Inspection>> {
        self.inspections.get_by_id(id).await
    }

    pub async fn list(&self) -> Result<Vec<Inspection>> {
        self.inspections.all().await
    }

    pub async fn list_by_status(&self, status: InspectionStatus) -> Result<Vec<Inspection>> {
        self.inspections.by_status(status).await
    }

    pub async fn list_by_inspector(&self, inspector_id: &str) -> Result<Vec<Inspection>> {
        self.inspections.by_inspector(inspector_id).await
    }

    pub async fn list_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Inspection>> {
        self.inspections.by_date_range(start, end).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Inspection>> {
        self.inspections.search(query).await
    }

    pub async fn statistics(&self) -> Result<InspectionStatistics> {
        self.inspections.statistics().await
    }

    pub fn watch_all(&self) -> UnboundedReceiver<Vec<Inspection>> {
        self.inspections.watch_all()
    }

    pub fn watch_by_status(&self, status: InspectionStatus) -> UnboundedReceiver<Vec<Inspection>> {
        self.inspections.watch_by_status(status)
    }

    async fn get_required(&self, id: &str) -> Result<Inspection> {
        self.inspections
            .get_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Inspection"))
    }
}
