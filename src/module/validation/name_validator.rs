//! Module name validation

use tracing::warn;

/// Validation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Name is valid
    Valid,
    /// Name is invalid with specific errors
    Invalid(Vec<String>),
}

/// Module name validator
#[derive(Debug, Clone)]
pub struct ModuleNameValidator {
    /// Maximum name length (characters)
    max_name_len: usize,
}

impl ModuleNameValidator {
    /// Create a new validator
    pub fn new() -> Self {
        Self { max_name_len: 64 }
    }

    /// Validate a module name
    ///
    /// Accepts names starting with an alphanumeric character and made of
    /// alphanumerics, dashes, underscores and dots.
    pub fn validate(&self, name: &str) -> ValidationResult {
        let mut errors = Vec::new();

        if name.is_empty() {
            errors.push("Module name cannot be empty".to_string());
        } else {
            let len = name.chars().count();
            if len > self.max_name_len {
                errors.push(format!(
                    "Module name {} is {} characters long (max {})",
                    name, len, self.max_name_len
                ));
            }

            if !name.chars().next().map_or(false, |c| c.is_alphanumeric()) {
                errors.push(format!(
                    "Module name {} must start with an alphanumeric character",
                    name
                ));
            }

            if !name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
            {
                errors.push(format!(
                    "Invalid module name: {} (must be alphanumeric with dashes/underscores/dots)",
                    name
                ));
            }
        }

        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            warn!("Module name validation failed for {:?}: {:?}", name, errors);
            ValidationResult::Invalid(errors)
        }
    }
}

impl Default for ModuleNameValidator {
    fn default() -> Self {
        Self::new()
    }
}
