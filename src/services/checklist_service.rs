use chrono::NaiveDate;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::error::{AppError, Result};
use crate::models::{
    ChecklistCategory, ChecklistInputType, ChecklistItem, ChecklistResponse,
};
use crate::store::ChecklistStore;

/// Use cases for the structured inspection checklist: defining questions
/// and recording answers with per-input-type validation.
#[derive(Clone)]
pub struct ChecklistService {
    checklists: ChecklistStore,
}

impl ChecklistService {
    pub fn new(checklists: ChecklistStore) -> Self {
        Self { checklists }
    }

    pub async fn add_item(&self, item: ChecklistItem) -> Result<ChecklistItem> {
        if item.question.trim().is_empty() {
            return Err(AppError::Validation("Question is required".into()));
        }

        self.checklists.insert_item(&item).await?;
        Ok(item)
    }

    pub async fn update_item(&self, item: ChecklistItem) -> Result<ChecklistItem> {
        if item.question.trim().is_empty() {
            return Err(AppError::Validation("Question is required".into()));
        }

        self.checklists.update_item(&item).await?;
        Ok(item)
    }

    pub async fn list_active_items(&self) -> Result<Vec<ChecklistItem>> {
        self.checklists.active_items().await
    }

    pub async fn list_items_by_category(
        &self,
        category: ChecklistCategory,
    ) -> Result<Vec<ChecklistItem>> {
        self.checklists.items_by_category(category).await
    }

    /// Record an answer for one checklist item, validating the value
    /// against the item's input type.
    pub async fn record_response(
        &self,
        inspection_id: String,
        checklist_item_id: String,
        response_value: String,
        response_notes: Option<String>,
    ) -> Result<ChecklistResponse> {
        let item = self
            .checklists
            .get_item(&checklist_item_id)
            .await?
            .ok_or(AppError::NotFound("Checklist item"))?;

        Self::validate_value(&item, &response_value)?;

        let mut response =
            ChecklistResponse::new(inspection_id, checklist_item_id, response_value);
        response.response_notes = response_notes;
        self.checklists.insert_response(&response).await?;
        Ok(response)
    }

    pub async fn responses_for(&self, inspection_id: &str) -> Result<Vec<ChecklistResponse>> {
        self.checklists.responses_by_inspection(inspection_id).await
    }

    pub fn watch_responses(
        &self,
        inspection_id: String,
    ) -> UnboundedReceiver<Vec<ChecklistResponse>> {
        self.checklists.watch_responses(inspection_id)
    }

    fn validate_value(item: &ChecklistItem, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            if item.is_required {
                return Err(AppError::Validation(
                    "A response is required for this item".into(),
                ));
            }
            return Ok(());
        }

        match item.input_type {
            ChecklistInputType::Text => {}
            ChecklistInputType::Number => {
                if value.trim().parse::<f64>().is_err() {
                    return Err(AppError::Validation(
                        "Response must be a valid number".into(),
                    ));
                }
            }
            ChecklistInputType::Boolean => {
                if !matches!(value.trim(), "true" | "false") {
                    return Err(AppError::Validation(
                        "Response must be true or false".into(),
                    ));
                }
            }
            ChecklistInputType::Date => {
                if NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").is_err() {
                    return Err(AppError::Validation(
                        "Response must be a date in YYYY-MM-DD format".into(),
                    ));
                }
            }
            ChecklistInputType::Radio => {
                if !item.option_values().iter().any(|option| option == value) {
                    return Err(AppError::Validation(
                        "Response must be one of the configured options".into(),
                    ));
                }
            }
            ChecklistInputType::MultiSelect => {
                let options = item.option_values();
                let all_known = value
                    .split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .all(|part| options.iter().any(|option| option == part));
                if !all_known {
                    return Err(AppError::Validation(
                        "Response must be one of the configured options".into(),
                    ));
                }
            }
        }

        Ok(())
    }
}
