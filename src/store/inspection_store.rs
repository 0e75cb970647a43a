use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::{Inspection, InspectionExportRow, InspectionStatistics, InspectionStatus};
use crate::store::{ChangeNotifier, Table, spawn_watch};

/// Inspection store for database operations
#[derive(Clone)]
pub struct InspectionStore {
    db: Arc<Db>,
    notifier: Arc<ChangeNotifier>,
}

impl InspectionStore {
    pub fn new(db: Arc<Db>, notifier: Arc<ChangeNotifier>) -> Self {
        Self { db, notifier }
    }

    pub async fn insert(&self, inspection: &Inspection) -> Result<()> {
        let pool = self.db.pool().await?;
        sqlx::query(
            r#"
            INSERT INTO inspections (
                id, lot_number, container_number, product_type_id, quantity, weight,
                unit, port_location, weather_conditions, inspector_id, status, notes,
                latitude, longitude, created_at, updated_at, completed_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&inspection.id)
        .bind(&inspection.lot_number)
        .bind(&inspection.container_number)
        .bind(&inspection.product_type_id)
        .bind(inspection.quantity)
        .bind(inspection.weight)
        .bind(&inspection.unit)
        .bind(&inspection.port_location)
        .bind(&inspection.weather_conditions)
        .bind(&inspection.inspector_id)
        .bind(inspection.status)
        .bind(&inspection.notes)
        .bind(inspection.latitude)
        .bind(inspection.longitude)
        .bind(inspection.created_at)
        .bind(inspection.updated_at)
        .bind(inspection.completed_at)
        .execute(&pool)
        .await?;

        self.notifier.notify(Table::Inspections);
        Ok(())
    }

    pub async fn update(&self, inspection: &Inspection) -> Result<()> {
        let pool = self.db.pool().await?;
        let result = sqlx::query(
            r#"
            UPDATE inspections
            SET lot_number = ?, container_number = ?, product_type_id = ?, quantity = ?,
                weight = ?, unit = ?, port_location = ?, weather_conditions = ?,
                inspector_id = ?, status = ?, notes = ?, latitude = ?, longitude = ?,
                updated_at = ?, completed_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&inspection.lot_number)
        .bind(&inspection.container_number)
        .bind(&inspection.product_type_id)
        .bind(inspection.quantity)
        .bind(inspection.weight)
        .bind(&inspection.unit)
        .bind(&inspection.port_location)
        .bind(&inspection.weather_conditions)
        .bind(&inspection.inspector_id)
        .bind(inspection.status)
        .bind(&inspection.notes)
        .bind(inspection.latitude)
        .bind(inspection.longitude)
        .bind(inspection.updated_at)
        .bind(inspection.completed_at)
        .bind(&inspection.id)
        .execute(&pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Inspection"));
        }

        self.notifier.notify(Table::Inspections);
        Ok(())
    }

    pub async fn update_status(
        &self,
        id: &str,
        status: InspectionStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let pool = self.db.pool().await?;
        let result = sqlx::query(
            "UPDATE inspections SET status = ?, updated_at = ?, completed_at = ? WHERE id = ?",
        )
        .bind(status)
        .bind(Utc::now())
        .bind(completed_at)
        .bind(id)
        .execute(&pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Inspection"));
        }

        self.notifier.notify(Table::Inspections);
        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Inspection>> {
        let pool = self.db.pool().await?;
        let inspection = sqlx::query_as::<_, Inspection>("SELECT * FROM inspections WHERE id = ?")
            .bind(id)
            .fetch_optional(&pool)
            .await?;
        Ok(inspection)
    }

    pub async fn all(&self) -> Result<Vec<Inspection>> {
        let pool = self.db.pool().await?;
        let inspections =
            sqlx::query_as::<_, Inspection>("SELECT * FROM inspections ORDER BY created_at DESC")
                .fetch_all(&pool)
                .await?;
        Ok(inspections)
    }

    pub async fn by_status(&self, status: InspectionStatus) -> Result<Vec<Inspection>> {
        let pool = self.db.pool().await?;
        let inspections = sqlx::query_as::<_, Inspection>(
            "SELECT * FROM inspections WHERE status = ? ORDER BY created_at DESC",
        )
        .bind(status)
        .fetch_all(&pool)
        .await?;
        Ok(inspections)
    }

    pub async fn by_inspector(&self, inspector_id: &str) -> Result<Vec<Inspection>> {
        let pool = self.db.pool().await?;
        let inspections = sqlx::query_as::<_, Inspection>(
            "SELECT * FROM inspections WHERE inspector_id = ? ORDER BY created_at DESC",
        )
        .bind(inspector_id)
        .fetch_all(&pool)
        .await?;
        Ok(inspections)
    }

    pub async fn by_product_type(&self, product_type_id: &str) -> Result<Vec<Inspection>> {
        let pool = self.db.pool().await?;
        let inspections = sqlx::query_as::<_, Inspection>(
            "SELECT * FROM inspections WHERE product_type_id = ? ORDER BY created_at DESC",
        )
        .bind(product_type_id)
        .fetch_all(&pool)
        .await?;
        Ok(inspections)
    }

    pub async fn by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Inspection>> {
        let pool = self.db.pool().await?;
        let inspections = sqlx::query_as::<_, Inspection>(
            "SELECT * FROM inspections WHERE created_at BETWEEN ? AND ? ORDER BY created_at DESC",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&pool)
        .await?;
        Ok(inspections)
    }

    /// Substring search across lot number, container number and port
    /// location.
    pub async fn search(&self, query: &str) -> Result<Vec<Inspection>> {
        let pool = self.db.pool().await?;
        let inspections = sqlx::query_as::<_, Inspection>(
            r#"
            SELECT * FROM inspections
            WHERE lot_number LIKE '%' || ? || '%'
               OR container_number LIKE '%' || ? || '%'
               OR port_location LIKE '%' || ? || '%'
            ORDER BY created_at DESC
            "#,
        )
        .bind(query)
        .bind(query)
        .bind(query)
        .fetch_all(&pool)
        .await?;
        Ok(inspections)
    }

    pub async fn count(&self) -> Result<i64> {
        let pool = self.db.pool().await?;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inspections")
            .fetch_one(&pool)
            .await?;
        Ok(count)
    }

    pub async fn count_by_status(&self, status: InspectionStatus) -> Result<i64> {
        let pool = self.db.pool().await?;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inspections WHERE status = ?")
            .bind(status)
            .fetch_one(&pool)
            .await?;
        Ok(count)
    }

    /// Aggregate statistics computed in SQL so they stay correct on large
    /// datasets.
    pub async fn statistics(&self) -> Result<InspectionStatistics> {
        let pool = self.db.pool().await?;
        let statistics = sqlx::query_as::<_, InspectionStatistics>(
            r#"
            SELECT COUNT(*) AS total,
                   COALESCE(SUM(CASE WHEN status = 'draft' THEN 1 ELSE 0 END), 0) AS draft,
                   COALESCE(SUM(CASE WHEN status = 'in_progress' THEN 1 ELSE 0 END), 0) AS in_progress,
                   COALESCE(SUM(CASE WHEN status = 'completed' THEN 1 ELSE 0 END), 0) AS completed,
                   COALESCE(SUM(CASE WHEN status = 'cancelled' THEN 1 ELSE 0 END), 0) AS cancelled,
                   COALESCE(SUM(quantity), 0.0) AS total_quantity,
                   COALESCE(SUM(weight), 0.0) AS total_weight
            FROM inspections
            "#,
        )
        .fetch_one(&pool)
        .await?;
        Ok(statistics)
    }

    /// Rows for the inspections CSV export: joined inspector and product
    /// type names plus per-severity defect counts and the photo count.
    pub async fn export_rows(&self) -> Result<Vec<InspectionExportRow>> {
        let pool = self.db.pool().await?;
        let rows = sqlx::query_as::<_, InspectionExportRow>(
            r#"
            SELECT i.id, i.lot_number, i.container_number,
                   COALESCE(p.name, '') AS product_type_name,
                   i.quantity, i.weight, i.unit, i.port_location, i.weather_conditions,
                   COALESCE(ins.name, '') AS inspector_name,
                   COALESCE(ins.company, '') AS inspector_company,
                   i.status, i.created_at, i.updated_at, i.completed_at,
                   (SELECT COUNT(*) FROM defect_records d
                     WHERE d.inspection_id = i.id) AS total_defects,
                   (SELECT COUNT(*) FROM defect_records d
                     WHERE d.inspection_id = i.id AND d.severity = 'critical') AS critical_defects,
                   (SELECT COUNT(*) FROM defect_records d
                     WHERE d.inspection_id = i.id AND d.severity = 'major') AS major_defects,
                   (SELECT COUNT(*) FROM defect_records d
                     WHERE d.inspection_id = i.id AND d.severity = 'minor') AS minor_defects,
                   (SELECT COUNT(*) FROM inspection_photos ph
                     WHERE ph.inspection_id = i.id) AS photo_count,
                   i.notes
            FROM inspections i
            LEFT JOIN inspectors ins ON ins.id = i.inspector_id
            LEFT JOIN product_types p ON p.id = i.product_type_id
            ORDER BY i.created_at DESC
            "#,
        )
        .fetch_all(&pool)
        .await?;
        Ok(rows)
    }

    /// Delete an inspection and everything it owns in one transaction, so
    /// either all child rows and the parent go, or none do. Backing photo
    /// files are removed after the transaction commits.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let pool = self.db.pool().await?;

        let photo_paths: Vec<(String,)> =
            sqlx::query_as("SELECT file_path FROM inspection_photos WHERE inspection_id = ?")
                .bind(id)
                .fetch_all(&pool)
                .await?;

        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM inspection_photos WHERE inspection_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM defect_records WHERE inspection_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM checklist_responses WHERE inspection_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM inspections WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(AppError::NotFound("Inspection"));
        }
        tx.commit().await?;

        for (path,) in photo_paths {
            if let Err(error) = tokio::fs::remove_file(&path).await {
                tracing::warn!(%path, %error, "failed to remove photo file");
            }
        }

        self.notifier.notify(Table::Inspections);
        self.notifier.notify(Table::DefectRecords);
        self.notifier.notify(Table::InspectionPhotos);
        self.notifier.notify(Table::ChecklistResponses);
        Ok(())
    }

    pub fn watch_all(&self) -> UnboundedReceiver<Vec<Inspection>> {
        let store = self.clone();
        spawn_watch(&self.notifier, &[Table::Inspections], move || {
            let store = store.clone();
            async move { store.all().await }
        })
    }

    pub fn watch_by_status(&self, status: InspectionStatus) -> UnboundedReceiver<Vec<Inspection>> {
        let store = self.clone();
        spawn_watch(&self.notifier, &[Table::Inspections], move || {
            let store = store.clone();
            async move { store.by_status(status).await }
        })
    }

    pub fn watch_search(&self, query: String) -> UnboundedReceiver<Vec<Inspection>> {
        let store = self.clone();
        spawn_watch(&self.notifier, &[Table::Inspections], move || {
            let store = store.clone();
            let query = query.clone();
            async move { store.search(&query).await }
        })
    }
}
