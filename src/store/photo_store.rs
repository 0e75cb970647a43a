use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::InspectionPhoto;
use crate::store::{ChangeNotifier, Table, spawn_watch};

/// Photo store for database operations. Owns the invariant that sequence
/// indices within one inspection stay contiguous from 0.
#[derive(Clone)]
pub struct PhotoStore {
    db: Arc<Db>,
    notifier: Arc<ChangeNotifier>,
}

impl PhotoStore {
    pub fn new(db: Arc<Db>, notifier: Arc<ChangeNotifier>) -> Self {
        Self { db, notifier }
    }

    pub async fn insert(&self, photo: &InspectionPhoto) -> Result<()> {
        let pool = self.db.pool().await?;
        sqlx::query(
            r#"
            INSERT INTO inspection_photos (
                id, inspection_id, defect_record_id, file_path, caption,
                sequence_index, file_size, image_width, image_height, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&photo.id)
        .bind(&photo.inspection_id)
        .bind(&photo.defect_record_id)
        .bind(&photo.file_path)
        .bind(&photo.caption)
        .bind(photo.sequence_index)
        .bind(photo.file_size)
        .bind(photo.image_width)
        .bind(photo.image_height)
        .bind(photo.created_at)
        .execute(&pool)
        .await?;

        self.notifier.notify(Table::InspectionPhotos);
        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<InspectionPhoto>> {
        let pool = self.db.pool().await?;
        let photo =
            sqlx::query_as::<_, InspectionPhoto>("SELECT * FROM inspection_photos WHERE id = ?")
                .bind(id)
                .fetch_optional(&pool)
                .await?;
        Ok(photo)
    }

    pub async fn all(&self) -> Result<Vec<InspectionPhoto>> {
        let pool = self.db.pool().await?;
        let photos = sqlx::query_as::<_, InspectionPhoto>(
            "SELECT * FROM inspection_photos ORDER BY inspection_id ASC, sequence_index ASC",
        )
        .fetch_all(&pool)
        .await?;
        Ok(photos)
    }

    pub async fn by_inspection(&self, inspection_id: &str) -> Result<Vec<InspectionPhoto>> {
        let pool = self.db.pool().await?;
        let photos = sqlx::query_as::<_, InspectionPhoto>(
            r#"
            SELECT * FROM inspection_photos
            WHERE inspection_id = ?
            ORDER BY sequence_index ASC
            "#,
        )
        .bind(inspection_id)
        .fetch_all(&pool)
        .await?;
        Ok(photos)
    }

    pub async fn by_defect(&self, defect_record_id: &str) -> Result<Vec<InspectionPhoto>> {
        let pool = self.db.pool().await?;
        let photos = sqlx::query_as::<_, InspectionPhoto>(
            r#"
            SELECT * FROM inspection_photos
            WHERE defect_record_id = ?
            ORDER BY sequence_index ASC
            "#,
        )
        .bind(defect_record_id)
        .fetch_all(&pool)
        .await?;
        Ok(photos)
    }

    pub async fn count_by_inspection(&self, inspection_id: &str) -> Result<i64> {
        let pool = self.db.pool().await?;
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM inspection_photos WHERE inspection_id = ?")
                .bind(inspection_id)
                .fetch_one(&pool)
                .await?;
        Ok(count)
    }

    /// Index for the next photo of an inspection.
    pub async fn next_sequence_index(&self, inspection_id: &str) -> Result<i64> {
        let pool = self.db.pool().await?;
        let next: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(sequence_index) + 1, 0) FROM inspection_photos WHERE inspection_id = ?",
        )
        .bind(inspection_id)
        .fetch_one(&pool)
        .await?;
        Ok(next)
    }

    pub async fn update_caption(&self, id: &str, caption: Option<&str>) -> Result<()> {
        let pool = self.db.pool().await?;
        let result = sqlx::query("UPDATE inspection_photos SET caption = ? WHERE id = ?")
            .bind(caption)
            .bind(id)
            .execute(&pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Photo"));
        }

        self.notifier.notify(Table::InspectionPhotos);
        Ok(())
    }

    /// Delete one photo: the row goes first together with the re-indexing
    /// of the remaining photos, then the backing file. A file that cannot
    /// be removed does not undo the row deletion.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let pool = self.db.pool().await?;
        let photo = self
            .get_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Photo"))?;

        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM inspection_photos WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            r#"
            UPDATE inspection_photos
            SET sequence_index = sequence_index - 1
            WHERE inspection_id = ? AND sequence_index > ?
            "#,
        )
        .bind(&photo.inspection_id)
        .bind(photo.sequence_index)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        if let Err(error) = tokio::fs::remove_file(&photo.file_path).await {
            tracing::warn!(path = %photo.file_path, %error, "failed to remove photo file");
        }

        self.notifier.notify(Table::InspectionPhotos);
        Ok(())
    }

    /// Remove every photo of an inspection, rows first, then files.
    pub async fn delete_by_inspection(&self, inspection_id: &str) -> Result<()> {
        let pool = self.db.pool().await?;
        let paths: Vec<(String,)> =
            sqlx::query_as("SELECT file_path FROM inspection_photos WHERE inspection_id = ?")
                .bind(inspection_id)
                .fetch_all(&pool)
                .await?;

        sqlx::query("DELETE FROM inspection_photos WHERE inspection_id = ?")
            .bind(inspection_id)
            .execute(&pool)
            .await?;

        for (path,) in paths {
            if let Err(error) = tokio::fs::remove_file(&path).await {
                tracing::warn!(%path, %error, "failed to remove photo file");
            }
        }

        self.notifier.notify(Table::InspectionPhotos);
        Ok(())
    }

    pub fn watch_by_inspection(
        &self,
        inspection_id: String,
    ) -> UnboundedReceiver<Vec<InspectionPhoto>> {
        let store = self.clone();
        spawn_watch(&self.notifier, &[Table::InspectionPhotos], move || {
            let store = store.clone();
            let inspection_id = inspection_id.clone();
            async move { store.by_inspection(&inspection_id).await }
        })
    }
}
