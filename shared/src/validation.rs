//! Input validation helpers
//!
//! Request types carry `validator` derive rules; this module turns the
//! resulting `ValidationErrors` into a single user-facing message.

use validator::ValidationErrors;

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "name" => "Name",
        "email" => "Email",
        "password" => "Password",
        "gender" => "Gender",
        "age_group" => "Age Group",
        "profession" => "Profession",
        "purposes" => "Purposes",
        "custom_purpose" => "Custom Purpose",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }

    /// Pick the first failing field (alphabetical, so the result is stable)
    pub fn first_of(errors: &ValidationErrors) -> Option<Self> {
        let field_errors = errors.field_errors();
        let mut fields: Vec<_> = field_errors.keys().collect();
        fields.sort();

        let field = fields.into_iter().next()?;
        let message = field_errors
            .get(field)
            .and_then(|errs| errs.first())
            .map(|err| {
                err.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string())
            })
            .unwrap_or_else(|| "is invalid".to_string());

        Some(Self::new(field, &message))
    }
}

/// Reject names that are blank once surrounding whitespace is removed
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name cannot be blank".to_string());
    }
    Ok(())
}
