// Error types for the strut container

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    #[error("Dependency injection error: {0}")]
    DependencyInjection(String),

    #[error("Options binding error: {0}")]
    OptionsBinding(String),

    #[error(transparent)]
    OptionsValidation(#[from] OptionsValidationError),
}

impl Error {
    /// Check whether this error came from options validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::OptionsValidation(_))
    }
}

/// Raised when a bound options value fails one or more validators.
///
/// Every failure message is kept, in the order the validators reported them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("options validation failed for {options_type}: {}", .failures.join("; "))]
pub struct OptionsValidationError {
    /// Type name of the options value that failed.
    pub options_type: String,
    /// Individual failure messages.
    pub failures: Vec<String>,
}

impl OptionsValidationError {
    pub fn new(options_type: impl Into<String>, failures: Vec<String>) -> Self {
        Self {
            options_type: options_type.into(),
            failures,
        }
    }

    /// Check whether any failure message contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.failures.iter().any(|f| f.contains(needle))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
