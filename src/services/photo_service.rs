use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc::UnboundedReceiver;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::InspectionPhoto;
use crate::services::run_blocking;
use crate::store::PhotoStore;
use crate::validation::validate_photo_caption;

/// Use cases around captured photos: moving the camera output into managed
/// storage, recording metadata, captions and deletion.
#[derive(Clone)]
pub struct PhotoService {
    photos: PhotoStore,
    config: Arc<Config>,
}

impl PhotoService {
    pub fn new(photos: PhotoStore, config: Arc<Config>) -> Self {
        Self { photos, config }
    }

    /// Persist a captured image: the file is moved into the inspection's
    /// photo directory, probed for size and dimensions, and recorded with
    /// the next free sequence index.
    pub async fn save_captured(
        &self,
        inspection_id: &str,
        image_file: &Path,
        caption: Option<String>,
        defect_record_id: Option<String>,
    ) -> Result<InspectionPhoto> {
        if inspection_id.trim().is_empty() {
            return Err(AppError::Validation("Inspection ID is required".into()));
        }
        if !image_file.exists() {
            return Err(AppError::Validation("Image file does not exist".into()));
        }
        validate_photo_caption(caption.as_deref()).into_result()?;

        let sequence_index = self.photos.next_sequence_index(inspection_id).await?;
        let photo_id = Uuid::new_v4().to_string();
        let extension = image_file
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_else(|| "jpg".to_string());
        let final_path = self
            .config
            .inspection_photo_dir(inspection_id)
            .join(format!("{photo_id}.{extension}"));

        let source = image_file.to_path_buf();
        let destination = final_path.clone();
        let (file_size, image_width, image_height) =
            run_blocking(move || store_photo_file(&source, &destination)).await?;

        let photo = InspectionPhoto {
            id: photo_id,
            inspection_id: inspection_id.to_string(),
            defect_record_id,
            file_path: final_path.to_string_lossy().into_owned(),
            caption,
            sequence_index,
            file_size,
            image_width,
            image_height,
            created_at: Utc::now(),
        };
        self.photos.insert(&photo).await?;

        tracing::info!(id = %photo.id, %inspection_id, sequence_index, "saved photo");
        Ok(photo)
    }

    pub async fn update_caption(&self, photo_id: &str, caption: Option<String>) -> Result<()> {
        validate_photo_caption(caption.as_deref()).into_result()?;
        self.photos.update_caption(photo_id, caption.as_deref()).await
    }

    /// Removes the database row and the backing file, and compacts the
    /// sequence indices of the remaining photos.
    pub async fn delete(&self, photo_id: &str) -> Result<()> {
        self.photos.delete(photo_id).await
    }

    pub async fn get(&self, photo_id: &str) -> Result<Option<InspectionPhoto>> {
        self.photos.get_by_id(photo_id).await
    }

    pub async fn list_by_inspection(&self, inspection_id: &str) -> Result<Vec<InspectionPhoto>> {
        self.photos.by_inspection(inspection_id).await
    }

    pub async fn list_by_defect(&self, defect_record_id: &str) -> Result<Vec<InspectionPhoto>> {
        self.photos.by_defect(defect_record_id).await
    }

    pub async fn count_by_inspection(&self, inspection_id: &str) -> Result<i64> {
        self.photos.count_by_inspection(inspection_id).await
    }

    pub fn watch_by_inspection(
        &self,
        inspection_id: String,
    ) -> UnboundedReceiver<Vec<InspectionPhoto>> {
        self.photos.watch_by_inspection(inspection_id)
    }
}

/// Copy the capture into managed storage and probe it. A file that does not
/// decode as an image is removed again and rejected.
fn store_photo_file(source: &Path, destination: &Path) -> Result<(i64, i64, i64)> {
    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(source, destination)?;

    // Probe by content rather than extension; camera collaborators are not
    // trusted to name files correctly.
    let dimensions = image::io::Reader::open(destination)?
        .with_guessed_format()?
        .into_dimensions();
    let (width, height) = match dimensions {
        Ok(dimensions) => dimensions,
        Err(_) => {
            let _ = std::fs::remove_file(destination);
            return Err(AppError::Validation("Image file is not a valid image".into()));
        }
    };
    let file_size = std::fs::metadata(destination)?.len() as i64;

    if source != destination {
        let _ = std::fs::remove_file(source);
    }

    Ok((file_size, width as i64, height as i64))
}
