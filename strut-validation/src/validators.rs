// Built-in validators

use crate::ValidationError;

// String validators

/// Validates that a string is not empty or whitespace
pub struct NotEmpty;

impl NotEmpty {
    pub fn validate(value: &str, field: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            Err(
                ValidationError::new(field, format!("{} should not be empty", field))
                    .with_constraint("notEmpty"),
            )
        } else {
            Ok(())
        }
    }
}

// Number validators

/// Validates a value lies in the closed range `min..=max`
pub struct InRange<T> {
    pub min: T,
    pub max: T,
}

impl InRange<i32> {
    pub fn validate(&self, value: i32, field: &str) -> Result<(), ValidationError> {
        if (self.min..=self.max).contains(&value) {
            Ok(())
        } else {
            Err(ValidationError::new(
                field,
                format!("{} must be between {} and {}", field, self.min, self.max),
            )
            .with_constraint("inRange")
            .with_value(value.to_string()))
        }
    }
}
