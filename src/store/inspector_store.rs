use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::Inspector;
use crate::store::{ChangeNotifier, Table, spawn_watch};

/// Inspector store for database operations
#[derive(Clone)]
pub struct InspectorStore {
    db: Arc<Db>,
    notifier: Arc<ChangeNotifier>,
}

impl InspectorStore {
    pub fn new(db: Arc<Db>, notifier: Arc<ChangeNotifier>) -> Self {
        Self { db, notifier }
    }

    pub async fn insert(&self, inspector: &Inspector) -> Result<()> {
        let pool = self.db.pool().await?;
        sqlx::query(
            r#"
            INSERT INTO inspectors (
                id, name, company, role, signature_image_path, is_active,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&inspector.id)
        .bind(&inspector.name)
        .bind(&inspector.company)
        .bind(&inspector.role)
        .bind(&inspector.signature_image_path)
        .bind(inspector.is_active)
        .bind(inspector.created_at)
        .bind(inspector.updated_at)
        .execute(&pool)
        .await?;

        self.notifier.notify(Table::Inspectors);
        Ok(())
    }

    pub async fn update(&self, inspector: &Inspector) -> Result<()> {
        let pool = self.db.pool().await?;
        let result = sqlx::query(
            r#"
            UPDATE inspectors
            SET name = ?, company = ?, role = ?, signature_image_path = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&inspector.name)
        .bind(&inspector.company)
        .bind(&inspector.role)
        .bind(&inspector.signature_image_path)
        .bind(inspector.updated_at)
        .bind(&inspector.id)
        .execute(&pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Inspector"));
        }

        self.notifier.notify(Table::Inspectors);
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let pool = self.db.pool().await?;
        let mut tx = pool.begin().await?;

        let result = sqlx::query("DELETE FROM inspectors WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(AppError::NotFound("Inspector"));
        }

        // A deleted inspector cannot stay selected.
        sqlx::query("UPDATE settings SET active_inspector_id = NULL WHERE active_inspector_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        self.notifier.notify(Table::Inspectors);
        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Inspector>> {
        let pool = self.db.pool().await?;
        let inspector = sqlx::query_as::<_, Inspector>("SELECT * FROM inspectors WHERE id = ?")
            .bind(id)
            .fetch_optional(&pool)
            .await?;
        Ok(inspector)
    }

    pub async fn all(&self) -> Result<Vec<Inspector>> {
        let pool = self.db.pool().await?;
        let inspectors =
            sqlx::query_as::<_, Inspector>("SELECT * FROM inspectors ORDER BY name ASC")
                .fetch_all(&pool)
                .await?;
        Ok(inspectors)
    }

    pub async fn by_company(&self, company: &str) -> Result<Vec<Inspector>> {
        let pool = self.db.pool().await?;
        let inspectors = sqlx::query_as::<_, Inspector>(
            "SELECT * FROM inspectors WHERE company = ? ORDER BY name ASC",
        )
        .bind(company)
        .fetch_all(&pool)
        .await?;
        Ok(inspectors)
    }

    /// The globally selected inspector, if any.
    pub async fn active(&self) -> Result<Option<Inspector>> {
        let pool = self.db.pool().await?;
        let inspector = sqlx::query_as::<_, Inspector>(
            r#"
            SELECT i.* FROM inspectors i
            JOIN settings s ON s.active_inspector_id = i.id
            "#,
        )
        .fetch_optional(&pool)
        .await?;
        Ok(inspector)
    }

    /// Select one inspector globally: deactivates all others and records
    /// the selection in the settings row, atomically.
    pub async fn set_active(&self, id: &str) -> Result<()> {
        let pool = self.db.pool().await?;
        let mut tx = pool.begin().await?;

        sqlx::query("UPDATE inspectors SET is_active = 0")
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("UPDATE inspectors SET is_active = 1 WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(AppError::NotFound("Inspector"));
        }
        sqlx::query("UPDATE settings SET active_inspector_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        self.notifier.notify(Table::Inspectors);
        Ok(())
    }

    pub async fn count(&self) -> Result<i64> {
        let pool = self.db.pool().await?;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inspectors")
            .fetch_one(&pool)
            .await?;
        Ok(count)
    }

    pub fn watch_all(&self) -> UnboundedReceiver<Vec<Inspector>> {
        let store = self.clone();
        spawn_watch(&self.notifier, &[Table::Inspectors], move || {
            let store = store.clone();
            async move { store.all().await }
        })
    }
}
