use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::ProductType;
use crate::store::{ChangeNotifier, Table, spawn_watch};

/// Product type store for database operations
#[derive(Clone)]
pub struct ProductTypeStore {
    db: Arc<Db>,
    notifier: Arc<ChangeNotifier>,
}

impl ProductTypeStore {
    pub fn new(db: Arc<Db>, notifier: Arc<ChangeNotifier>) -> Self {
        Self { db, notifier }
    }

    pub async fn insert(&self, product_type: &ProductType) -> Result<()> {
        let pool = self.db.pool().await?;
        sqlx::query(
            r#"
            INSERT INTO product_types (
                id, name, description, standard_dimensions, standard_grades,
                is_active, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product_type.id)
        .bind(&product_type.name)
        .bind(&product_type.description)
        .bind(&product_type.standard_dimensions)
        .bind(&product_type.standard_grades)
        .bind(product_type.is_active)
        .bind(product_type.created_at)
        .execute(&pool)
        .await?;

        self.notifier.notify(Table::ProductTypes);
        Ok(())
    }

    pub async fn update(&self, product_type: &ProductType) -> Result<()> {
        let pool = self.db.pool().await?;
        let result = sqlx::query(
            r#"
            UPDATE product_types
            SET name = ?, description = ?, standard_dimensions = ?, standard_grades = ?,
                is_active = ?
            WHERE id = ?
            "#,
        )
        .bind(&product_type.name)
        .bind(&product_type.description)
        .bind(&product_type.standard_dimensions)
        .bind(&product_type.standard_grades)
        .bind(product_type.is_active)
        .bind(&product_type.id)
        .execute(&pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product type"));
        }

        self.notifier.notify(Table::ProductTypes);
        Ok(())
    }

    pub async fn set_active(&self, id: &str, is_active: bool) -> Result<()> {
        let pool = self.db.pool().await?;
        let result = sqlx::query("UPDATE product_types SET is_active = ? WHERE id = ?")
            .bind(is_active)
            .bind(id)
            .execute(&pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product type"));
        }

        self.notifier.notify(Table::ProductTypes);
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let pool = self.db.pool().await?;
        let result = sqlx::query("DELETE FROM product_types WHERE id = ?")
            .bind(id)
            .execute(&pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product type"));
        }

        self.notifier.notify(Table::ProductTypes);
        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<ProductType>> {
        let pool = self.db.pool().await?;
        let product_type =
            sqlx::query_as::<_, ProductType>("SELECT * FROM product_types WHERE id = ?")
                .bind(id)
                .fetch_optional(&pool)
                .await?;
        Ok(product_type)
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<ProductType>> {
        let pool = self.db.pool().await?;
        let product_type =
            sqlx::query_as::<_, ProductType>("SELECT * FROM product_types WHERE name = ?")
                .bind(name)
                .fetch_optional(&pool)
                .await?;
        Ok(product_type)
    }

    pub async fn all(&self) -> Result<Vec<ProductType>> {
        let pool = self.db.pool().await?;
        let product_types =
            sqlx::query_as::<_, ProductType>("SELECT * FROM product_types ORDER BY name ASC")
                .fetch_all(&pool)
                .await?;
        Ok(product_types)
    }

    pub async fn active(&self) -> Result<Vec<ProductType>> {
        let pool = self.db.pool().await?;
        let product_types = sqlx::query_as::<_, ProductType>(
            "SELECT * FROM product_types WHERE is_active = 1 ORDER BY name ASC",
        )
        .fetch_all(&pool)
        .await?;
        Ok(product_types)
    }

    pub async fn count(&self) -> Result<i64> {
        let pool = self.db.pool().await?;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product_types")
            .fetch_one(&pool)
            .await?;
        Ok(count)
    }

    pub fn watch_active(&self) -> UnboundedReceiver<Vec<ProductType>> {
        let store = self.clone();
        spawn_watch(&self.notifier, &[Table::ProductTypes], move || {
            let store = store.clone();
            async move { store.active().await }
        })
    }
}
