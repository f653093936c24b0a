// Validation traits

use crate::ValidationError;

/// Trait for validatable types
pub trait Validate {
    /// Validate the value and return every error found
    fn validate(&self) -> Result<(), Vec<ValidationError>>;
}
