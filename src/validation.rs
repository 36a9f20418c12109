use std::collections::HashMap;

use crate::error::ApiError;

/// Collects every problem with a request body so the client sees them all at once.
#[derive(Debug, Default)]
pub struct FieldErrors {
    missing: Vec<String>,
    invalid: Vec<(String, String)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// The field must be present.
    pub fn require<T>(&mut self, field: &str, value: &Option<T>) -> &mut Self {
        if value.is_none() {
            self.missing.push(field.to_string());
        }
        self
    }

    /// The field must be present and contain more than whitespace.
    pub fn require_text(&mut self, field: &str, value: &Option<String>) -> &mut Self {
        match value {
            Some(text) if !text.trim().is_empty() => {}
            _ => self.missing.push(field.to_string()),
        }
        self
    }

    /// If present, the field must not be blank.
    pub fn not_blank(&mut self, field: &str, value: &Option<String>) -> &mut Self {
        if matches!(value, Some(text) if text.trim().is_empty()) {
            self.invalid(field, "Must not be empty");
        }
        self
    }

    /// If present, the number must be finite and greater than zero.
    pub fn positive(&mut self, field: &str, value: Option<f64>) -> &mut Self {
        if matches!(value, Some(n) if !n.is_finite() || n <= 0.0) {
            self.invalid(field, "Must be greater than zero");
        }
        self
    }

    /// If present, the number must be finite and not negative.
    pub fn non_negative(&mut self, field: &str, value: Option<f64>) -> &mut Self {
        if matches!(value, Some(n) if !n.is_finite() || n < 0.0) {
            self.invalid(field, "Must not be negative");
        }
        self
    }

    pub fn invalid(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.invalid.push((field.to_string(), message.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        if self.is_empty() {
            return Ok(());
        }

        let message = if self.missing.is_empty() {
            let fields: Vec<&str> = self.invalid.iter().map(|(f, _)| f.as_str()).collect();
            format!("Invalid values for: {}", fields.join(", "))
        } else {
            format!("Missing required fields: {}", self.missing.join(", "))
        };

        let mut field_errors: HashMap<String, String> = self
            .invalid
            .into_iter()
            .collect();
        for field in self.missing {
            field_errors.insert(field, "This field is required".to_string());
        }

        Err(ApiError::validation_error(message, Some(field_errors)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_all_missing_fields() {
        let mut errors = FieldErrors::new();
        errors
            .require_text("farmName", &None)
            .require("totalArea", &None::<f64>)
            .require_text("location", &Some("  ".to_string()));

        match errors.into_result() {
            Err(ApiError::ValidationError { message, field_errors }) => {
                assert_eq!(message, "Missing required fields: farmName, totalArea, location");
                let fields = field_errors.unwrap();
                assert_eq!(fields.len(), 3);
                assert_eq!(fields["totalArea"], "This field is required");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn range_checks() {
        let mut errors = FieldErrors::new();
        errors
            .positive("totalArea", Some(0.0))
            .non_negative("quantity", Some(-1.0))
            .positive("area", None)
            .non_negative("actualYield", Some(0.0));

        match errors.into_result() {
            Err(ApiError::ValidationError { message, field_errors }) => {
                assert_eq!(message, "Invalid values for: totalArea, quantity");
                assert_eq!(field_errors.unwrap().len(), 2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn clean_input_passes() {
        let mut errors = FieldErrors::new();
        errors.require_text("title", &Some("Frost".to_string())).positive("area", Some(1.5));
        assert!(errors.into_result().is_ok());
    }
}
