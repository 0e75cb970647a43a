use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::{DefectCategory, DefectCounts, DefectRecord, DefectSeverity};
use crate::store::{ChangeNotifier, Table, spawn_watch};

/// Defect record store for database operations
#[derive(Clone)]
pub struct DefectStore {
    db: Arc<Db>,
    notifier: Arc<ChangeNotifier>,
}

impl DefectStore {
    pub fn new(db: Arc<Db>, notifier: Arc<ChangeNotifier>) -> Self {
        Self { db, notifier }
    }

    pub async fn insert(&self, defect: &DefectRecord) -> Result<()> {
        let pool = self.db.pool().await?;
        sqlx::query(
            r#"
            INSERT INTO defect_records (
                id, inspection_id, defect_type, defect_category, severity, count,
                description, location_notes, affected_quantity, affected_percentage, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&defect.id)
        .bind(&defect.inspection_id)
        .bind(&defect.defect_type)
        .bind(defect.defect_category)
        .bind(defect.severity)
        .bind(defect.count)
        .bind(&defect.description)
        .bind(&defect.location_notes)
        .bind(defect.affected_quantity)
        .bind(defect.affected_percentage)
        .bind(defect.created_at)
        .execute(&pool)
        .await?;

        self.notifier.notify(Table::DefectRecords);
        Ok(())
    }

    pub async fn update(&self, defect: &DefectRecord) -> Result<()> {
        let pool = self.db.pool().await?;
        let result = sqlx::query(
            r#"
            UPDATE defect_records
            SET defect_type = ?, defect_category = ?, severity = ?, count = ?,
                description = ?, location_notes = ?, affected_quantity = ?,
                affected_percentage = ?
            WHERE id = ?
            "#,
        )
        .bind(&defect.defect_type)
        .bind(defect.defect_category)
        .bind(defect.severity)
        .bind(defect.count)
        .bind(&defect.description)
        .bind(&defect.location_notes)
        .bind(defect.affected_quantity)
        .bind(defect.affected_percentage)
        .bind(&defect.id)
        .execute(&pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Defect"));
        }

        self.notifier.notify(Table::DefectRecords);
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let pool = self.db.pool().await?;
        let result = sqlx::query("DELETE FROM defect_records WHERE id = ?")
            .bind(id)
            .execute(&pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Defect"));
        }

        self.notifier.notify(Table::DefectRecords);
        self.notifier.notify(Table::InspectionPhotos);
        Ok(())
    }

    pub async fn delete_by_inspection(&self, inspection_id: &str) -> Result<()> {
        let pool = self.db.pool().await?;
        sqlx::query("DELETE FROM defect_records WHERE inspection_id = ?")
            .bind(inspection_id)
            .execute(&pool)
            .await?;

        self.notifier.notify(Table::DefectRecords);
        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<DefectRecord>> {
        let pool = self.db.pool().await?;
        let defect =
            sqlx::query_as::<_, DefectRecord>("SELECT * FROM defect_records WHERE id = ?")
                .bind(id)
                .fetch_optional(&pool)
                .await?;
        Ok(defect)
    }

    pub async fn by_inspection(&self, inspection_id: &str) -> Result<Vec<DefectRecord>> {
        let pool = self.db.pool().await?;
        let defects = sqlx::query_as::<_, DefectRecord>(
            "SELECT * FROM defect_records WHERE inspection_id = ? ORDER BY created_at ASC",
        )
        .bind(inspection_id)
        .fetch_all(&pool)
        .await?;
        Ok(defects)
    }

    pub async fn by_category(
        &self,
        inspection_id: &str,
        category: DefectCategory,
    ) -> Result<Vec<DefectRecord>> {
        let pool = self.db.pool().await?;
        let defects = sqlx::query_as::<_, DefectRecord>(
            r#"
            SELECT * FROM defect_records
            WHERE inspection_id = ? AND defect_category = ?
            ORDER BY created_at ASC
            "#,
        )
        .bind(inspection_id)
        .bind(category)
        .fetch_all(&pool)
        .await?;
        Ok(defects)
    }

    pub async fn by_severity(
        &self,
        inspection_id: &str,
        severity: DefectSeverity,
    ) -> Result<Vec<DefectRecord>> {
        let pool = self.db.pool().await?;
        let defects = sqlx::query_as::<_, DefectRecord>(
            r#"
            SELECT * FROM defect_records
            WHERE inspection_id = ? AND severity = ?
            ORDER BY created_at ASC
            "#,
        )
        .bind(inspection_id)
        .bind(severity)
        .fetch_all(&pool)
        .await?;
        Ok(defects)
    }

    pub async fn all(&self) -> Result<Vec<DefectRecord>> {
        let pool = self.db.pool().await?;
        let defects = sqlx::query_as::<_, DefectRecord>(
            "SELECT * FROM defect_records ORDER BY created_at DESC",
        )
        .fetch_all(&pool)
        .await?;
        Ok(defects)
    }

    /// All critical defects across every inspection.
    pub async fn critical(&self) -> Result<Vec<DefectRecord>> {
        let pool = self.db.pool().await?;
        let defects = sqlx::query_as::<_, DefectRecord>(
            "SELECT * FROM defect_records WHERE severity = 'critical' ORDER BY created_at DESC",
        )
        .fetch_all(&pool)
        .await?;
        Ok(defects)
    }

    pub async fn distinct_types_by_category(&self, category: DefectCategory) -> Result<Vec<String>> {
        let pool = self.db.pool().await?;
        let types: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT defect_type FROM defect_records
            WHERE defect_category = ?
            ORDER BY defect_type ASC
            "#,
        )
        .bind(category)
        .fetch_all(&pool)
        .await?;
        Ok(types.into_iter().map(|(t,)| t).collect())
    }

    pub async fn count_by_inspection(&self, inspection_id: &str) -> Result<i64> {
        let pool = self.db.pool().await?;
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM defect_records WHERE inspection_id = ?")
                .bind(inspection_id)
                .fetch_one(&pool)
                .await?;
        Ok(count)
    }

    /// Per-severity counts for one inspection, computed in SQL.
    pub async fn severity_counts(&self, inspection_id: &str) -> Result<DefectCounts> {
        let pool = self.db.pool().await?;
        let counts = sqlx::query_as::<_, DefectCounts>(
            r#"
            SELECT COUNT(*) AS total,
                   COALESCE(SUM(CASE WHEN severity = 'critical' THEN 1 ELSE 0 END), 0) AS critical,
                   COALESCE(SUM(CASE WHEN severity = 'major' THEN 1 ELSE 0 END), 0) AS major,
                   COALESCE(SUM(CASE WHEN severity = 'minor' THEN 1 ELSE 0 END), 0) AS minor,
                   COALESCE(SUM(CASE WHEN severity = 'cosmetic' THEN 1 ELSE 0 END), 0) AS cosmetic
            FROM defect_records
            WHERE inspection_id = ?
            "#,
        )
        .bind(inspection_id)
        .fetch_one(&pool)
        .await?;
        Ok(counts)
    }

    pub fn watch_by_inspection(&self, inspection_id: String) -> UnboundedReceiver<Vec<DefectRecord>> {
        let store = self.clone();
        spawn_watch(&self.notifier, &[Table::DefectRecords], move || {
            let store = store.clone();
            let inspection_id = inspection_id.clone();
            async move { store.by_inspection(&inspection_id).await }
        })
    }
}
