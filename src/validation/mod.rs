pub mod inspection;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AppError, Result};

pub use inspection::InspectionValidator;

pub const MAX_LOT_NUMBER_LENGTH: usize = 50;
pub const MIN_LOT_NUMBER_LENGTH: usize = 3;
pub const MAX_CONTAINER_NUMBER_LENGTH: usize = 50;
pub const MAX_QUANTITY: f64 = 1_000_000.0;
pub const MAX_WEIGHT_KG: f64 = 100_000.0;
pub const MIN_DEFECT_DESCRIPTION_LENGTH: usize = 10;
pub const MAX_DEFECT_DESCRIPTION_LENGTH: usize = 500;
pub const MAX_PHOTO_CAPTION_LENGTH: usize = 200;
pub const MAX_NOTES_LENGTH: usize = 1000;
pub const MAX_DEFECT_COUNT: i64 = 1000;

static LOT_NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());
static PERSON_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z\s.-]+$").unwrap());

/// Outcome of a single field validation. Failure carries a stable,
/// user-facing message; validators never panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(String),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(message) => Some(message),
        }
    }

    /// Lift into the crate result type for use-case composition.
    pub fn into_result(self) -> Result<()> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(message) => Err(AppError::Validation(message)),
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        ValidationResult::Invalid(message.into())
    }
}

pub fn validate_lot_number(lot_number: &str) -> ValidationResult {
    let len = lot_number.chars().count();
    if lot_number.trim().is_empty() {
        ValidationResult::invalid("Lot number is required")
    } else if len < MIN_LOT_NUMBER_LENGTH {
        ValidationResult::invalid("Lot number must be at least 3 characters")
    } else if len > MAX_LOT_NUMBER_LENGTH {
        ValidationResult::invalid("Lot number cannot exceed 50 characters")
    } else if !LOT_NUMBER_PATTERN.is_match(lot_number) {
        ValidationResult::invalid("Lot number can only contain letters, numbers, hyphens and underscores")
    } else {
        ValidationResult::Valid
    }
}

pub fn validate_container_number(container_number: Option<&str>) -> ValidationResult {
    let container_number = match container_number {
        // Optional field
        None => return ValidationResult::Valid,
        Some(value) if value.trim().is_empty() => return ValidationResult::Valid,
        Some(value) => value,
    };
    if container_number.chars().count() > MAX_CONTAINER_NUMBER_LENGTH {
        ValidationResult::invalid("Container number cannot exceed 50 characters")
    } else if !LOT_NUMBER_PATTERN.is_match(container_number) {
        ValidationResult::invalid("Container number can only contain letters, numbers, hyphens and underscores")
    } else {
        ValidationResult::Valid
    }
}

/// Form-level quantity check on the raw input string.
pub fn validate_quantity(quantity: &str) -> ValidationResult {
    if quantity.trim().is_empty() {
        return ValidationResult::invalid("Quantity is required");
    }
    match quantity.trim().parse::<f64>() {
        Ok(value) => validate_quantity_value(value),
        Err(_) => ValidationResult::invalid("Please enter a valid number"),
    }
}

pub fn validate_quantity_value(quantity: f64) -> ValidationResult {
    if !(quantity > 0.0) {
        ValidationResult::invalid("Quantity must be greater than zero")
    } else if quantity > MAX_QUANTITY {
        ValidationResult::invalid("Quantity cannot exceed 1,000,000")
    } else {
        ValidationResult::Valid
    }
}

/// Form-level weight check on the raw input string.
pub fn validate_weight(weight: &str) -> ValidationResult {
    if weight.trim().is_empty() {
        return ValidationResult::invalid("Weight is required");
    }
    match weight.trim().parse::<f64>() {
        Ok(value) => validate_weight_value(value),
        Err(_) => ValidationResult::invalid("Please enter a valid number"),
    }
}

pub fn validate_weight_value(weight: f64) -> ValidationResult {
    if !(weight > 0.0) {
        ValidationResult::invalid("Weight must be greater than zero")
    } else if weight > MAX_WEIGHT_KG {
        ValidationResult::invalid("Weight cannot exceed 100,000")
    } else {
        ValidationResult::Valid
    }
}

pub fn validate_port_location(location: &str) -> ValidationResult {
    let len = location.chars().count();
    if location.trim().is_empty() {
        ValidationResult::invalid("Port location is required")
    } else if len < 3 {
        ValidationResult::invalid("Port location must be at least 3 characters")
    } else if len > 100 {
        ValidationResult::invalid("Port location cannot exceed 100 characters")
    } else {
        ValidationResult::Valid
    }
}

pub fn validate_weather_conditions(weather: &str) -> ValidationResult {
    let len = weather.chars().count();
    if weather.trim().is_empty() {
        ValidationResult::invalid("Weather conditions are required")
    } else if len < 3 {
        ValidationResult::invalid("Weather description must be at least 3 characters")
    } else if len > 100 {
        ValidationResult::invalid("Weather description cannot exceed 100 characters")
    } else {
        ValidationResult::Valid
    }
}

pub fn validate_inspector_name(name: &str) -> ValidationResult {
    let len = name.chars().count();
    if name.trim().is_empty() {
        ValidationResult::invalid("Inspector name is required")
    } else if len < 2 {
        ValidationResult::invalid("Name must be at least 2 characters")
    } else if len > 100 {
        ValidationResult::invalid("Name cannot exceed 100 characters")
    } else if !PERSON_NAME_PATTERN.is_match(name) {
        ValidationResult::invalid("Name can only contain letters, spaces, periods and hyphens")
    } else {
        ValidationResult::Valid
    }
}

pub fn validate_company_name(company: &str) -> ValidationResult {
    let len = company.chars().count();
    if company.trim().is_empty() {
        ValidationResult::invalid("Company name is required")
    } else if len < 2 {
        ValidationResult::invalid("Company name must be at least 2 characters")
    } else if len > 100 {
        ValidationResult::invalid("Company name cannot exceed 100 characters")
    } else {
        ValidationResult::Valid
    }
}

pub fn validate_role(role: &str) -> ValidationResult {
    let len = role.chars().count();
    if role.trim().is_empty() {
        ValidationResult::invalid("Role is required")
    } else if len < 2 {
        ValidationResult::invalid("Role must be at least 2 characters")
    } else if len > 50 {
        ValidationResult::invalid("Role cannot exceed 50 characters")
    } else {
        ValidationResult::Valid
    }
}

pub fn validate_notes(notes: Option<&str>) -> ValidationResult {
    match notes {
        // Optional field
        None => ValidationResult::Valid,
        Some(notes) if notes.chars().count() > MAX_NOTES_LENGTH => {
            ValidationResult::invalid("Notes cannot exceed 1000 characters")
        }
        Some(_) => ValidationResult::Valid,
    }
}

pub fn validate_defect_description(description: &str) -> ValidationResult {
    let len = description.chars().count();
    if description.trim().is_empty() {
        ValidationResult::invalid("Defect description is required")
    } else if len < MIN_DEFECT_DESCRIPTION_LENGTH {
        ValidationResult::invalid("Description must be at least 10 characters")
    } else if len > MAX_DEFECT_DESCRIPTION_LENGTH {
        ValidationResult::invalid("Description cannot exceed 500 characters")
    } else {
        ValidationResult::Valid
    }
}

pub fn validate_defect_count(count: i64) -> ValidationResult {
    if count <= 0 {
        ValidationResult::invalid("Count must be greater than zero")
    } else if count > MAX_DEFECT_COUNT {
        ValidationResult::invalid("Count cannot exceed 1000")
    } else {
        ValidationResult::Valid
    }
}

pub fn validate_photo_caption(caption: Option<&str>) -> ValidationResult {
    match caption {
        // Optional field
        None => ValidationResult::Valid,
        Some(caption) if caption.chars().count() > MAX_PHOTO_CAPTION_LENGTH => {
            ValidationResult::invalid("Caption cannot exceed 200 characters")
        }
        Some(_) => ValidationResult::Valid,
    }
}
