use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::{ChecklistCategory, ChecklistItem, ChecklistResponse};
use crate::store::{ChangeNotifier, Table, spawn_watch};

/// Checklist item and response store for database operations
#[derive(Clone)]
pub struct ChecklistStore {
    db: Arc<Db>,
    notifier: Arc<ChangeNotifier>,
}

impl ChecklistStore {
    pub fn new(db: Arc<Db>, notifier: Arc<ChangeNotifier>) -> Self {
        Self { db, notifier }
    }

    pub async fn insert_item(&self, item: &ChecklistItem) -> Result<()> {
        let pool = self.db.pool().await?;
        sqlx::query(
            r#"
            INSERT INTO checklist_items (
                id, category, question, input_type, options, is_required,
                sequence_order, is_active
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&item.id)
        .bind(item.category)
        .bind(&item.question)
        .bind(item.input_type)
        .bind(&item.options)
        .bind(item.is_required)
        .bind(item.sequence_order)
        .bind(item.is_active)
        .execute(&pool)
        .await?;

        self.notifier.notify(Table::ChecklistItems);
        Ok(())
    }

    pub async fn update_item(&self, item: &ChecklistItem) -> Result<()> {
        let pool = self.db.pool().await?;
        let result = sqlx::query(
            r#"
            UPDATE checklist_items
            SET category = ?, question = ?, input_type = ?, options = ?,
                is_required = ?, sequence_order = ?, is_active = ?
            WHERE id = ?
            "#,
        )
        .bind(item.category)
        .bind(&item.question)
        .bind(item.input_type)
        .bind(&item.options)
        .bind(item.is_required)
        .bind(item.sequence_order)
        .bind(item.is_active)
        .bind(&item.id)
        .execute(&pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Checklist item"));
        }

        self.notifier.notify(Table::ChecklistItems);
        Ok(())
    }

    pub async fn get_item(&self, id: &str) -> Result<Option<ChecklistItem>> {
        let pool = self.db.pool().await?;
        let item =
            sqlx::query_as::<_, ChecklistItem>("SELECT * FROM checklist_items WHERE id = ?")
                .bind(id)
                .fetch_optional(&pool)
                .await?;
        Ok(item)
    }

    pub async fn active_items(&self) -> Result<Vec<ChecklistItem>> {
        let pool = self.db.pool().await?;
        let items = sqlx::query_as::<_, ChecklistItem>(
            r#"
            SELECT * FROM checklist_items
            WHERE is_active = 1
            ORDER BY category ASC, sequence_order ASC
            "#,
        )
        .fetch_all(&pool)
        .await?;
        Ok(items)
    }

    pub async fn items_by_category(&self, category: ChecklistCategory) -> Result<Vec<ChecklistItem>> {
        let pool = self.db.pool().await?;
        let items = sqlx::query_as::<_, ChecklistItem>(
            r#"
            SELECT * FROM checklist_items
            WHERE category = ? AND is_active = 1
            ORDER BY sequence_order ASC
            "#,
        )
        .bind(category)
        .fetch_all(&pool)
        .await?;
        Ok(items)
    }

    pub async fn insert_response(&self, response: &ChecklistResponse) -> Result<()> {
        let pool = self.db.pool().await?;
        sqlx::query(
            r#"
            INSERT INTO checklist_responses (
                id, inspection_id, checklist_item_id, response_value,
                response_notes, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&response.id)
        .bind(&response.inspection_id)
        .bind(&response.checklist_item_id)
        .bind(&response.response_value)
        .bind(&response.response_notes)
        .bind(response.created_at)
        .execute(&pool)
        .await?;

        self.notifier.notify(Table::ChecklistResponses);
        Ok(())
    }

    pub async fn responses_by_inspection(
        &self,
        inspection_id: &str,
    ) -> Result<Vec<ChecklistResponse>> {
        let pool = self.db.pool().await?;
        let responses = sqlx::query_as::<_, ChecklistResponse>(
            r#"
            SELECT * FROM checklist_responses
            WHERE inspection_id = ?
            ORDER BY created_at ASC
            "#,
        )
        .bind(inspection_id)
        .fetch_all(&pool)
        .await?;
        Ok(responses)
    }

    pub async fn count_responses_by_inspection(&self, inspection_id: &str) -> Result<i64> {
        let pool = self.db.pool().await?;
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM checklist_responses WHERE inspection_id = ?")
                .bind(inspection_id)
                .fetch_one(&pool)
                .await?;
        Ok(count)
    }

    pub async fn delete_responses_by_inspection(&self, inspection_id: &str) -> Result<()> {
        let pool = self.db.pool().await?;
        sqlx::query("DELETE FROM checklist_responses WHERE inspection_id = ?")
            .bind(inspection_id)
            .execute(&pool)
            .await?;

        self.notifier.notify(Table::ChecklistResponses);
        Ok(())
    }

    pub fn watch_responses(
        &self,
        inspection_id: String,
    ) -> UnboundedReceiver<Vec<ChecklistResponse>> {
        let store = self.clone();
        spawn_watch(&self.notifier, &[Table::ChecklistResponses], move || {
            let store = store.clone();
            let inspection_id = inspection_id.clone();
            async move { store.responses_by_inspection(&inspection_id).await }
        })
    }
}
