use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::export::EXPORT_DATE_FORMAT;
use crate::models::{DefectRecord, InspectionExportRow, InspectionPhoto};

const INSPECTION_HEADERS: &[&str] = &[
    "Inspection ID",
    "Lot Number",
    "Container Number",
    "Product Type",
    "Quantity",
    "Weight (kg)",
    "Unit",
    "Port Location",
    "Weather Conditions",
    "Inspector Name",
    "Inspector Company",
    "Status",
    "Created Date",
    "Updated Date",
    "Completed Date",
    "Total Defects",
    "Critical Defects",
    "Major Defects",
    "Minor Defects",
    "Photo Count",
    "Notes",
];

const DEFECT_HEADERS: &[&str] = &[
    "Defect ID",
    "Inspection ID",
    "Defect Type",
    "Category",
    "Severity",
    "Count",
    "Description",
    "Location Notes",
    "Created Date",
];

const PHOTO_HEADERS: &[&str] = &[
    "Photo ID",
    "Inspection ID",
    "Defect Record ID",
    "File Path",
    "Caption",
    "Sequence Index",
    "File Size (bytes)",
    "Image Width",
    "Image Height",
    "Created Date",
];

/// Writes flat CSV dumps of inspections, defects and photos. Output is
/// UTF-8, comma separated, header row first, one record type per file.
#[derive(Clone)]
pub struct CsvExporter {
    output_dir: PathBuf,
}

impl CsvExporter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn export_inspections(&self, rows: &[InspectionExportRow]) -> Result<PathBuf> {
        let records = rows.iter().map(|row| {
            vec![
                row.id.clone(),
                row.lot_number.clone(),
                row.container_number.clone().unwrap_or_default(),
                row.product_type_name.clone(),
                row.quantity.to_string(),
                row.weight.to_string(),
                row.unit.clone(),
                row.port_location.clone(),
                row.weather_conditions.clone(),
                row.inspector_name.clone(),
                row.inspector_company.clone(),
                row.status.as_str().to_string(),
                format_date(row.created_at),
                format_date(row.updated_at),
                row.completed_at.map(format_date).unwrap_or_default(),
                row.total_defects.to_string(),
                row.critical_defects.to_string(),
                row.major_defects.to_string(),
                row.minor_defects.to_string(),
                row.photo_count.to_string(),
                row.notes.clone().unwrap_or_default(),
            ]
        });
        self.write_file("inspections", INSPECTION_HEADERS, records)
    }

    pub fn export_defects(&self, defects: &[DefectRecord]) -> Result<PathBuf> {
        let records = defects.iter().map(|defect| {
            vec![
                defect.id.clone(),
                defect.inspection_id.clone(),
                defect.defect_type.clone(),
                defect.defect_category.as_str().to_string(),
                defect.severity.as_str().to_string(),
                defect.count.to_string(),
                defect.description.clone(),
                defect.location_notes.clone().unwrap_or_default(),
                format_date(defect.created_at),
            ]
        });
        self.write_file("defects", DEFECT_HEADERS, records)
    }

    pub fn export_photos(&self, photos: &[InspectionPhoto]) -> Result<PathBuf> {
        let records = photos.iter().map(|photo| {
            vec![
                photo.id.clone(),
                photo.inspection_id.clone(),
                photo.defect_record_id.clone().unwrap_or_default(),
                photo.file_path.clone(),
                photo.caption.clone().unwrap_or_default(),
                photo.sequence_index.to_string(),
                photo.file_size.to_string(),
                photo.image_width.to_string(),
                photo.image_height.to_string(),
                format_date(photo.created_at),
            ]
        });
        self.write_file("photos", PHOTO_HEADERS, records)
    }

    /// Write through a temporary file and rename on success, so a failed or
    /// cancelled export never leaves a partial file behind.
    fn write_file(
        &self,
        kind: &str,
        headers: &[&str],
        records: impl Iterator<Item = Vec<String>>,
    ) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;

        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        let final_path = self
            .output_dir
            .join(format!("MetalInspect_{kind}_{timestamp}.csv"));
        let tmp_path = final_path.with_extension("csv.tmp");

        let mut writer = csv::Writer::from_path(&tmp_path)
            .map_err(|error| AppError::Export(error.to_string()))?;
        writer
            .write_record(headers)
            .map_err(|error| AppError::Export(error.to_string()))?;
        for record in records {
            writer
                .write_record(&record)
                .map_err(|error| AppError::Export(error.to_string()))?;
        }
        writer.flush()?;
        drop(writer);

        std::fs::rename(&tmp_path, &final_path)?;
        tracing::info!(path = %final_path.display(), "wrote CSV export");
        Ok(final_path)
    }
}

fn format_date(value: DateTime<Utc>) -> String {
    value.format(EXPORT_DATE_FORMAT).to_string()
}
