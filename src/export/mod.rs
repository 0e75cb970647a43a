pub mod csv_exporter;
pub mod pdf_report;

pub use csv_exporter::CsvExporter;
pub use pdf_report::PdfReportGenerator;

/// Timestamp format used in exported files.
pub(crate) const EXPORT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
