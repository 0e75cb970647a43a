use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::export::{CsvExporter, PdfReportGenerator};
use crate::models::InspectionWithDetails;
use crate::services::run_blocking;
use crate::store::{DefectStore, InspectionStore, InspectorStore, PhotoStore, ProductTypeStore};

/// Use cases for generating reports and exports. Loads the full aggregate
/// and hands it to the PDF/CSV generators on the blocking pool.
#[derive(Clone)]
pub struct ReportService {
    inspections: InspectionStore,
    defects: DefectStore,
    photos: PhotoStore,
    inspectors: InspectorStore,
    product_types: ProductTypeStore,
    pdf: PdfReportGenerator,
    csv: CsvExporter,
}

impl ReportService {
    pub fn new(
        inspections: InspectionStore,
        defects: DefectStore,
        photos: PhotoStore,
        inspectors: InspectorStore,
        product_types: ProductTypeStore,
        pdf: PdfReportGenerator,
        csv: CsvExporter,
    ) -> Self {
        Self {
            inspections,
            defects,
            photos,
            inspectors,
            product_types,
            pdf,
            csv,
        }
    }

    /// Everything the report needs for one inspection. Missing referenced
    /// entities are reported as not-found failures.
    pub async fn inspection_details(&self, inspection_id: &str) -> Result<InspectionWithDetails> {
        let inspection = self
            .inspections
            .get_by_id(inspection_id)
            .await?
            .ok_or(AppError::NotFound("Inspection"))?;
        let inspector = self
            .inspectors
            .get_by_id(&inspection.inspector_id)
            .await?
            .ok_or(AppError::NotFound("Inspector"))?;
        let product_type = self
            .product_types
            .get_by_id(&inspection.product_type_id)
            .await?
            .ok_or(AppError::NotFound("Product type"))?;
        let defects = self.defects.by_inspection(inspection_id).await?;
        let photos = self.photos.by_inspection(inspection_id).await?;

        Ok(InspectionWithDetails {
            inspection,
            inspector,
            product_type,
            defects,
            photos,
        })
    }

    pub async fn generate_pdf(&self, inspection_id: &str) -> Result<PathBuf> {
        let details = self.inspection_details(inspection_id).await?;
        let generator = self.pdf.clone();
        run_blocking(move || generator.generate(&details)).await
    }

    pub async fn export_inspections_csv(&self) -> Result<PathBuf> {
        let rows = self.inspections.export_rows().await?;
        let exporter = self.csv.clone();
        run_blocking(move || exporter.export_inspections(&rows)).await
    }

    pub async fn export_defects_csv(&self) -> Result<PathBuf> {
        let defects = self.defects.all().await?;
        let exporter = self.csv.clone();
        run_blocking(move || exporter.export_defects(&defects)).await
    }

    pub async fn export_photos_csv(&self) -> Result<PathBuf> {
        let photos = self.photos.all().await?;
        let exporter = self.csv.clone();
        run_blocking(move || exporter.export_photos(&photos)).await
    }
}
