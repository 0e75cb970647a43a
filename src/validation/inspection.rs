use crate::error::{AppError, Result};
use crate::models::{Inspection, InspectionStatus};
use crate::validation::{
    ValidationResult, validate_container_number, validate_lot_number, validate_notes,
    validate_port_location, validate_quantity_value, validate_weather_conditions,
    validate_weight_value,
};

/// Whole-entity validation and status-transition guards for inspections.
#[derive(Debug, Clone, Copy, Default)]
pub struct InspectionValidator;

impl InspectionValidator {
    pub fn new() -> Self {
        InspectionValidator
    }

    /// Run every field rule plus the cross-field business rules; returns
    /// all outcomes in a fixed order.
    pub fn validate(&self, inspection: &Inspection) -> Vec<ValidationResult> {
        let mut results = vec![
            validate_lot_number(&inspection.lot_number),
            validate_container_number(inspection.container_number.as_deref()),
            validate_quantity_value(inspection.quantity),
            validate_weight_value(inspection.weight),
            validate_port_location(&inspection.port_location),
            validate_weather_conditions(&inspection.weather_conditions),
            validate_notes(inspection.notes.as_deref()),
        ];

        if inspection.inspector_id.trim().is_empty() {
            results.push(ValidationResult::Invalid("Inspector must be selected".into()));
        }
        if inspection.product_type_id.trim().is_empty() {
            results.push(ValidationResult::Invalid("Product type must be selected".into()));
        }

        results
    }

    /// First failing rule, or Ok.
    pub fn check(&self, inspection: &Inspection) -> Result<()> {
        for result in self.validate(inspection) {
            result.into_result()?;
        }
        Ok(())
    }

    pub fn validate_for_completion(&self, inspection: &Inspection) -> ValidationResult {
        let first_error = self
            .validate(inspection)
            .into_iter()
            .find(|result| !result.is_valid());

        match first_error {
            Some(ValidationResult::Invalid(message)) => {
                ValidationResult::Invalid(format!("Cannot complete inspection: {message}"))
            }
            _ => ValidationResult::Valid,
        }
    }

    pub fn can_start_inspection(&self, inspection: &Inspection) -> bool {
        validate_lot_number(&inspection.lot_number).is_valid()
            && validate_port_location(&inspection.port_location).is_valid()
            && !inspection.inspector_id.trim().is_empty()
            && !inspection.product_type_id.trim().is_empty()
    }

    pub fn guard_start(&self, status: InspectionStatus) -> Result<()> {
        if status == InspectionStatus::Draft {
            Ok(())
        } else {
            Err(AppError::BusinessRule(
                "Only draft inspections can be started".into(),
            ))
        }
    }

    pub fn guard_complete(&self, status: InspectionStatus) -> Result<()> {
        if status == InspectionStatus::InProgress {
            Ok(())
        } else {
            Err(AppError::BusinessRule(
                "Only in-progress inspections can be completed".into(),
            ))
        }
    }

    pub fn guard_cancel(&self, status: InspectionStatus) -> Result<()> {
        if status == InspectionStatus::Completed {
            Err(AppError::BusinessRule(
                "Completed inspections cannot be cancelled".into(),
            ))
        } else {
            Ok(())
        }
    }

    pub fn guard_delete(&self, status: InspectionStatus) -> Result<()> {
        if status == InspectionStatus::Completed {
            Err(AppError::BusinessRule(
                "Cannot delete completed inspections".into(),
            ))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewInspection;

    fn sample_inspection() -> Inspection {
        Inspection::new(NewInspection {
            lot_number: "LOT-2025-001".into(),
            container_number: None,
            product_type_id: "sheet".into(),
            quantity: 100.5,
            weight: 2500.0,
            unit: "tons".into(),
            port_location: "Rotterdam Berth 12".into(),
            weather_conditions: "Clear, 18C".into(),
            inspector_id: "inspector-1".into(),
            notes: None,
            latitude: None,
            longitude: None,
        })
    }

    #[test]
    fn valid_inspection_passes_all_rules() {
        let validator = InspectionValidator::new();
        assert!(validator.check(&sample_inspection()).is_ok());
        assert!(validator.validate_for_completion(&sample_inspection()).is_valid());
    }

    #[test]
    fn completion_failure_wraps_first_message() {
        let validator = InspectionValidator::new();
        let mut inspection = sample_inspection();
        inspection.quantity = 0.0;

        let result = validator.validate_for_completion(&inspection);
        assert_eq!(
            result.error_message(),
            Some("Cannot complete inspection: Quantity must be greater than zero")
        );
    }

    #[test]
    fn nonpositive_quantity_and_weight_are_rejected() {
        let validator = InspectionValidator::new();

        let mut inspection = sample_inspection();
        inspection.quantity = -1.0;
        assert!(validator.check(&inspection).is_err());

        let mut inspection = sample_inspection();
        inspection.weight = 0.0;
        assert!(validator.check(&inspection).is_err());
    }

    #[test]
    fn missing_references_are_rejected() {
        let validator = InspectionValidator::new();

        let mut inspection = sample_inspection();
        inspection.inspector_id = "  ".into();
        let messages: Vec<_> = validator
            .validate(&inspection)
            .into_iter()
            .filter_map(|r| r.error_message().map(str::to_string))
            .collect();
        assert_eq!(messages, vec!["Inspector must be selected".to_string()]);
    }

    // Exhaustive table over the four sub-conditions of can_start_inspection.
    #[test]
    fn can_start_requires_all_four_conditions() {
        let validator = InspectionValidator::new();

        for bits in 0u8..16 {
            let lot_ok = bits & 0b0001 != 0;
            let port_ok = bits & 0b0010 != 0;
            let inspector_ok = bits & 0b0100 != 0;
            let product_ok = bits & 0b1000 != 0;

            let mut inspection = sample_inspection();
            if !lot_ok {
                inspection.lot_number = "LOT@2025".into();
            }
            if !port_ok {
                inspection.port_location = "".into();
            }
            if !inspector_ok {
                inspection.inspector_id = "".into();
            }
            if !product_ok {
                inspection.product_type_id = "".into();
            }

            let expected = lot_ok && port_ok && inspector_ok && product_ok;
            assert_eq!(
                validator.can_start_inspection(&inspection),
                expected,
                "bits {bits:04b}"
            );
        }
    }

    #[test]
    fn transition_guards() {
        let validator = InspectionValidator::new();

        assert!(validator.guard_start(InspectionStatus::Draft).is_ok());
        assert!(validator.guard_start(InspectionStatus::InProgress).is_err());
        assert!(validator.guard_start(InspectionStatus::Completed).is_err());
        assert!(validator.guard_start(InspectionStatus::Cancelled).is_err());

        assert!(validator.guard_complete(InspectionStatus::InProgress).is_ok());
        assert!(validator.guard_complete(InspectionStatus::Draft).is_err());

        assert!(validator.guard_cancel(InspectionStatus::Draft).is_ok());
        assert!(validator.guard_cancel(InspectionStatus::InProgress).is_ok());
        assert!(validator.guard_cancel(InspectionStatus::Cancelled).is_ok());
        assert!(validator.guard_cancel(InspectionStatus::Completed).is_err());

        assert!(validator.guard_delete(InspectionStatus::Draft).is_ok());
        assert!(validator.guard_delete(InspectionStatus::Completed).is_err());
    }
}
