use chrono::Utc;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::error::{AppError, Result};
use crate::models::Inspector;
use crate::store::InspectorStore;
use crate::validation::{validate_company_name, validate_inspector_name, validate_role};

/// Use cases for maintaining inspectors and the global active selection.
#[derive(Clone)]
pub struct InspectorService {
    inspectors: InspectorStore,
}

impl InspectorService {
    pub fn new(inspectors: InspectorStore) -> Self {
        Self { inspectors }
    }

    pub async fn create(&self, name: String, company: String, role: String) -> Result<Inspector> {
        validate_inspector_name(&name).into_result()?;
        validate_company_name(&company).into_result()?;
        validate_role(&role).into_result()?;

        let inspector = Inspector::new(name, company, role);
        self.inspectors.insert(&inspector).await?;
        Ok(inspector)
    }

    pub async fn update(&self, mut inspector: Inspector) -> Result<Inspector> {
        validate_inspector_name(&inspector.name).into_result()?;
        validate_company_name(&inspector.company).into_result()?;
        validate_role(&inspector.role).into_result()?;

        inspector.updated_at = Utc::now();
        self.inspectors.update(&inspector).await?;
        Ok(inspector)
    }

    /// Record the signature image captured for an inspector.
    pub async fn set_signature(&self, id: &str, signature_image_path: String) -> Result<Inspector> {
        let mut inspector = self
            .inspectors
            .get_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Inspector"))?;

        inspector.signature_image_path = Some(signature_image_path);
        inspector.updated_at = Utc::now();
        self.inspectors.update(&inspector).await?;
        Ok(inspector)
    }

    /// Make this inspector the single active one.
    pub async fn set_active(&self, id: &str) -> Result<()> {
        self.inspectors.set_active(id).await
    }

    pub async fn active(&self) -> Result<Option<Inspector>> {
        self.inspectors.active().await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.inspectors.delete(id).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Inspector>> {
        self.inspectors.get_by_id(id).await
    }

    pub async fn list(&self) -> Result<Vec<Inspector>> {
        self.inspectors.all().await
    }

    pub async fn list_by_company(&self, company: &str) -> Result<Vec<Inspector>> {
        self.inspectors.by_company(company).await
    }

    pub fn watch_all(&self) -> UnboundedReceiver<Vec<Inspector>> {
        self.inspectors.watch_all()
    }
}
