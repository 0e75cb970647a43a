use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::Utc;
use image::GenericImageView;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Rgb,
};

use crate::error::{AppError, Result};
use crate::export::EXPORT_DATE_FORMAT;
use crate::models::{DefectSeverity, InspectionWithDetails};

const PAGE_WIDTH: f64 = 210.0;
const PAGE_HEIGHT: f64 = 297.0;
const MARGIN: f64 = 18.0;
const LINE_HEIGHT: f64 = 6.0;

const COMPANY_NAME: &str = "MetalInspect Solutions";
const REPORT_TITLE: &str = "METAL CARGO INSPECTION REPORT";

/// Photos are downscaled to this width before embedding to keep the
/// output size bounded.
const MAX_PHOTO_WIDTH_PX: u32 = 480;
const PHOTO_DPI: f64 = 150.0;

/// Renders the inspection report: header, details table, defects table,
/// photo grid, signature block and footer, in that order.
#[derive(Clone)]
pub struct PdfReportGenerator {
    output_dir: PathBuf,
}

struct Layout {
    layer: PdfLayerReference,
    y: f64,
}

impl Layout {
    /// Move to a new page when fewer than `needed` millimeters remain.
    fn ensure_space(&mut self, doc: &PdfDocumentReference, needed: f64) {
        if self.y - needed < MARGIN {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH as f32), Mm(PAGE_HEIGHT as f32), "Layer 1");
            self.layer = doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
        }
    }

    fn text(&self, text: &str, size: f64, x: f64, font: &IndirectFontRef) {
        self.layer.use_text(text, size as f32, Mm(x as f32), Mm(self.y as f32), font);
    }

    fn advance(&mut self, amount: f64) {
        self.y -= amount;
    }

    fn set_color(&self, color: (f64, f64, f64)) {
        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(
                color.0 as f32,
                color.1 as f32,
                color.2 as f32,
                None,
            )));
    }

    fn reset_color(&self) {
        self.set_color((0.0, 0.0, 0.0));
    }
}

impl PdfReportGenerator {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn generate(&self, details: &InspectionWithDetails) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;

        let file_name = format!(
            "MetalInspect_{}_{}.pdf",
            details.inspection.lot_number,
            details.inspection.created_at.format("%Y%m%d")
        );
        let final_path = self.output_dir.join(&file_name);
        let tmp_path = final_path.with_extension("pdf.tmp");

        let (doc, page, layer) = PdfDocument::new(
            format!("Inspection Report {}", details.inspection.lot_number),
            Mm(PAGE_WIDTH as f32),
            Mm(PAGE_HEIGHT as f32),
            "Layer 1",
        );
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|error| AppError::Export(error.to_string()))?;
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|error| AppError::Export(error.to_string()))?;

        let mut layout = Layout {
            layer: doc.get_page(page).get_layer(layer),
            y: PAGE_HEIGHT - MARGIN,
        };

        add_header(&mut layout, &bold);
        add_details(&mut layout, &doc, details, &bold, &regular);
        add_defects(&mut layout, &doc, details, &bold, &regular);
        add_photos(&mut layout, &doc, details, &bold, &regular);
        add_signature(&mut layout, &doc, details, &bold, &regular);
        add_footer(&mut layout, &regular);

        doc.save(&mut BufWriter::new(File::create(&tmp_path)?))
            .map_err(|error| {
                let _ = std::fs::remove_file(&tmp_path);
                AppError::Export(error.to_string())
            })?;
        std::fs::rename(&tmp_path, &final_path)?;

        tracing::info!(path = %final_path.display(), "wrote PDF report");
        Ok(final_path)
    }
}

fn add_header(layout: &mut Layout, bold: &IndirectFontRef) {
    layout.text(COMPANY_NAME, 18.0, centered_x(COMPANY_NAME, 18.0), bold);
    layout.advance(2.0 * LINE_HEIGHT);
    layout.text(REPORT_TITLE, 16.0, centered_x(REPORT_TITLE, 16.0), bold);
    layout.advance(2.0 * LINE_HEIGHT);
}

fn add_details(
    layout: &mut Layout,
    doc: &PdfDocumentReference,
    details: &InspectionWithDetails,
    bold: &IndirectFontRef,
    regular: &IndirectFontRef,
) {
    let inspection = &details.inspection;

    let mut rows: Vec<(&str, String)> = vec![("Lot Number:", inspection.lot_number.clone())];
    if let Some(container) = &inspection.container_number {
        rows.push(("Container Number:", container.clone()));
    }
    rows.push(("Product Type:", details.product_type.name.clone()));
    rows.push((
        "Quantity:",
        format!("{} {}", inspection.quantity, inspection.unit),
    ));
    rows.push(("Weight:", format!("{} kg", inspection.weight)));
    rows.push(("Port Location:", inspection.port_location.clone()));
    rows.push(("Weather Conditions:", inspection.weather_conditions.clone()));
    rows.push((
        "Inspector:",
        format!("{} ({})", details.inspector.name, details.inspector.company),
    ));
    rows.push((
        "Inspection Date:",
        inspection.created_at.format(EXPORT_DATE_FORMAT).to_string(),
    ));
    rows.push(("Status:", inspection.status.as_str().to_string()));
    if let Some(notes) = &inspection.notes {
        rows.push(("Notes:", notes.clone()));
    }

    for (label, value) in rows {
        layout.ensure_space(doc, LINE_HEIGHT);
        layout.text(label, 11.0, MARGIN, bold);
        for line in wrap_text(&value, 70) {
            layout.text(&line, 11.0, MARGIN + 52.0, regular);
            layout.advance(LINE_HEIGHT);
            layout.ensure_space(doc, LINE_HEIGHT);
        }
    }
    layout.advance(LINE_HEIGHT);
}

fn add_defects(
    layout: &mut Layout,
    doc: &PdfDocumentReference,
    details: &InspectionWithDetails,
    bold: &IndirectFontRef,
    regular: &IndirectFontRef,
) {
    layout.ensure_space(doc, 3.0 * LINE_HEIGHT);
    layout.text("DEFECT SUMMARY", 14.0, MARGIN, bold);
    layout.advance(1.5 * LINE_HEIGHT);

    if details.defects.is_empty() {
        layout.text("No defects recorded during inspection.", 11.0, MARGIN, regular);
        layout.advance(2.0 * LINE_HEIGHT);
        return;
    }

    let columns = [
        ("Type", MARGIN),
        ("Category", MARGIN + 42.0),
        ("Severity", MARGIN + 76.0),
        ("Count", MARGIN + 102.0),
        ("Description", MARGIN + 120.0),
    ];
    for (header, x) in columns {
        layout.text(header, 10.0, x, bold);
    }
    layout.advance(LINE_HEIGHT);

    for defect in &details.defects {
        let description_lines = wrap_text(&defect.description, 34);
        let row_height = LINE_HEIGHT * description_lines.len().max(1) as f64;
        layout.ensure_space(doc, row_height);

        layout.text(&defect.defect_type, 10.0, MARGIN, regular);
        layout.text(defect.defect_category.as_str(), 10.0, MARGIN + 42.0, regular);

        layout.set_color(severity_color(defect.severity));
        layout.text(defect.severity.as_str(), 10.0, MARGIN + 76.0, bold);
        layout.reset_color();

        layout.text(&defect.count.to_string(), 10.0, MARGIN + 102.0, regular);
        for (index, line) in description_lines.iter().enumerate() {
            if index > 0 {
                layout.advance(LINE_HEIGHT);
            }
            layout.text(line, 10.0, MARGIN + 120.0, regular);
        }
        layout.advance(LINE_HEIGHT);
    }
    layout.advance(LINE_HEIGHT);
}

fn add_photos(
    layout: &mut Layout,
    doc: &PdfDocumentReference,
    details: &InspectionWithDetails,
    bold: &IndirectFontRef,
    regular: &IndirectFontRef,
) {
    // The whole section is omitted when no photos were taken.
    if details.photos.is_empty() {
        return;
    }

    layout.ensure_space(doc, 3.0 * LINE_HEIGHT);
    layout.text("PHOTOS", 14.0, MARGIN, bold);
    layout.advance(1.5 * LINE_HEIGHT);

    let cell_width = (PAGE_WIDTH - 2.0 * MARGIN - 10.0) / 2.0;
    let mut column = 0usize;
    let mut row_height: f64 = 0.0;

    for photo in &details.photos {
        let x = MARGIN + column as f64 * (cell_width + 10.0);
        let label = match &photo.caption {
            Some(caption) => format!("Photo {}: {}", photo.sequence_index + 1, caption),
            None => format!("Photo {}", photo.sequence_index + 1),
        };

        match load_scaled_photo(Path::new(&photo.file_path)) {
            Some(scaled) => {
                let height_mm = scaled.height() as f64 * 25.4 / PHOTO_DPI;
                if column == 0 {
                    layout.ensure_space(doc, height_mm + 2.0 * LINE_HEIGHT);
                }

                Image::from_dynamic_image(&scaled).add_to_layer(
                    layout.layer.clone(),
                    ImageTransform {
                        translate_x: Some(Mm(x as f32)),
                        translate_y: Some(Mm((layout.y - height_mm) as f32)),
                        dpi: Some(PHOTO_DPI as f32),
                        ..Default::default()
                    },
                );
                row_height = row_height.max(height_mm + 2.0 * LINE_HEIGHT);

                layout.layer.use_text(
                    label,
                    9.0,
                    Mm(x as f32),
                    Mm((layout.y - height_mm - LINE_HEIGHT) as f32),
                    regular,
                );
            }
            None => {
                if column == 0 {
                    layout.ensure_space(doc, 2.0 * LINE_HEIGHT);
                }
                layout
                    .layer
                    .use_text(format!("{label} (image unavailable)"), 9.0, Mm(x as f32), Mm(layout.y as f32), regular);
                row_height = row_height.max(2.0 * LINE_HEIGHT);
            }
        }

        column += 1;
        if column == 2 {
            layout.advance(row_height + LINE_HEIGHT);
            column = 0;
            row_height = 0.0;
        }
    }
    if column != 0 {
        layout.advance(row_height + LINE_HEIGHT);
    }
    layout.advance(LINE_HEIGHT);
}

fn add_signature(
    layout: &mut Layout,
    doc: &PdfDocumentReference,
    details: &InspectionWithDetails,
    bold: &IndirectFontRef,
    regular: &IndirectFontRef,
) {
    layout.ensure_space(doc, 7.0 * LINE_HEIGHT);
    layout.text("INSPECTOR SIGNATURE", 14.0, MARGIN, bold);
    layout.advance(1.5 * LINE_HEIGHT);

    if let Some(path) = &details.inspector.signature_image_path {
        if let Some(signature) = load_scaled_photo(Path::new(path)) {
            let height_mm = signature.height() as f64 * 25.4 / PHOTO_DPI;
            layout.ensure_space(doc, height_mm + LINE_HEIGHT);
            Image::from_dynamic_image(&signature).add_to_layer(
                layout.layer.clone(),
                ImageTransform {
                    translate_x: Some(Mm(MARGIN as f32)),
                    translate_y: Some(Mm((layout.y - height_mm) as f32)),
                    dpi: Some(PHOTO_DPI as f32),
                    ..Default::default()
                },
            );
            layout.advance(height_mm + LINE_HEIGHT);
        }
    }

    layout.text(&details.inspector.name, 11.0, MARGIN, regular);
    layout.advance(LINE_HEIGHT);
    layout.text(&details.inspector.company, 11.0, MARGIN, regular);
    layout.advance(LINE_HEIGHT);
    layout.text(
        &Utc::now().format(EXPORT_DATE_FORMAT).to_string(),
        11.0,
        MARGIN,
        regular,
    );
    layout.advance(2.0 * LINE_HEIGHT);
}

fn add_footer(layout: &mut Layout, regular: &IndirectFontRef) {
    let footer = format!(
        "Generated by MetalInspect on {}",
        Utc::now().format(EXPORT_DATE_FORMAT)
    );
    layout.set_color((0.45, 0.45, 0.45));
    layout
        .layer
        .use_text(footer, 8.0, Mm(MARGIN as f32), Mm((MARGIN / 2.0) as f32), regular);
    layout.reset_color();
}

/// Decode and downscale a photo for embedding; None when the file is
/// missing or not a decodable image, which degrades to a caption-only
/// entry instead of failing the report.
fn load_scaled_photo(path: &Path) -> Option<image::DynamicImage> {
    let decoded = image::io::Reader::open(path)
        .ok()?
        .with_guessed_format()
        .ok()?
        .decode()
        .ok()?;
    Some(decoded.thumbnail(MAX_PHOTO_WIDTH_PX, MAX_PHOTO_WIDTH_PX))
}

fn severity_color(severity: DefectSeverity) -> (f64, f64, f64) {
    match severity {
        DefectSeverity::Critical => (0.80, 0.15, 0.15),
        DefectSeverity::Major => (0.90, 0.55, 0.10),
        DefectSeverity::Minor => (0.72, 0.66, 0.10),
        DefectSeverity::Cosmetic => (0.50, 0.50, 0.50),
    }
}

/// Rough center position for the builtin Helvetica face.
fn centered_x(text: &str, font_size: f64) -> f64 {
    let approx_width = text.chars().count() as f64 * font_size * 0.5 * 0.3528;
    ((PAGE_WIDTH - approx_width) / 2.0).max(MARGIN)
}

/// Whitespace wrap to a fixed column; long words are hard-broken.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if word.chars().count() > max_chars {
            for chunk in word
                .chars()
                .collect::<Vec<_>>()
                .chunks(max_chars)
                .map(|chunk| chunk.iter().collect::<String>())
            {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                current = chunk;
            }
            continue;
        }
        if current.is_empty() {
            current = word.to_string();
        } else {
            current.push(' ');
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
