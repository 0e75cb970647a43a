use tokio::sync::mpsc::UnboundedReceiver;

use crate::error::{AppError, Result};
use crate::models::{DefectCategory, DefectCounts, DefectRecord, DefectSeverity, NewDefect};
use crate::store::DefectStore;
use crate::validation::{validate_defect_count, validate_defect_description};

/// Use cases for recording and maintaining defects on an inspection.
#[derive(Clone)]
pub struct DefectService {
    defects: DefectStore,
}

impl DefectService {
    pub fn new(defects: DefectStore) -> Self {
        Self { defects }
    }

    pub async fn add(&self, input: NewDefect) -> Result<DefectRecord> {
        Self::validate(&input.defect_type, &input.description, input.count)?;

        let defect = DefectRecord::new(input);
        self.defects.insert(&defect).await?;
        tracing::info!(id = %defect.id, inspection_id = %defect.inspection_id, "recorded defect");
        Ok(defect)
    }

    pub async fn update(&self, defect: DefectRecord) -> Result<DefectRecord> {
        Self::validate(&defect.defect_type, &defect.description, defect.count)?;

        self.defects.update(&defect).await?;
        Ok(defect)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.defects.delete(id).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<DefectRecord>> {
        self.defects.get_by_id(id).await
    }

    pub async fn list_by_inspection(&self, inspection_id: &str) -> Result<Vec<DefectRecord>> {
        self.defects.by_inspection(inspection_id).await
    }

    pub async fn list_by_category(
        &self,
        inspection_id: &str,
        category: DefectCategory,
    ) -> Result<Vec<DefectRecord>> {
        self.defects.by_category(inspection_id, category).await
    }

    pub async fn list_by_severity(
        &self,
        inspection_id: &str,
        severity: DefectSeverity,
    ) -> Result<Vec<DefectRecord>> {
        self.defects.by_severity(inspection_id, severity).await
    }

    pub async fn severity_counts(&self, inspection_id: &str) -> Result<DefectCounts> {
        self.defects.severity_counts(inspection_id).await
    }

    pub async fn known_types(&self, category: DefectCategory) -> Result<Vec<String>> {
        self.defects.distinct_types_by_category(category).await
    }

    pub fn watch_by_inspection(&self, inspection_id: String) -> UnboundedReceiver<Vec<DefectRecord>> {
        self.defects.watch_by_inspection(inspection_id)
    }

    fn validate(defect_type: &str, description: &str, count: i64) -> Result<()> {
        if defect_type.trim().is_empty() {
            return Err(AppError::Validation("Defect type is required".into()));
        }
        validate_defect_description(description).into_result()?;
        validate_defect_count(count).into_result()?;
        Ok(())
    }
}
