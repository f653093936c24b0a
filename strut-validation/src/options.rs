// Running Validate implementations as options validators

use crate::Validate;
use strut_core::{Container, OptionsType};
use tracing::debug;

/// Name under which [`ValidateOptionsExt::validate_options`] registers its
/// validator; registering twice keeps a single entry.
pub const VALIDATE_OPTIONS: &str = "validate";

/// Attach a type's [`Validate`] rules to its container options.
pub trait ValidateOptionsExt {
    /// Validate `T` when `Options<T>` is first resolved.
    ///
    /// Every [`ValidationError`](crate::ValidationError) message becomes one
    /// failure of the resulting options validation error.
    fn validate_options<T>(&self) -> &Self
    where
        T: Validate + OptionsType;
}

impl ValidateOptionsExt for Container {
    fn validate_options<T>(&self) -> &Self
    where
        T: Validate + OptionsType,
    {
        debug!(
            options = std::any::type_name::<T>(),
            "Attaching options validation"
        );
        self.add_options_validator::<T, _>(VALIDATE_OPTIONS, |options: &T| {
            options
                .validate()
                .map_err(|errors| errors.into_iter().map(|e| e.message).collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InRange, NotEmpty, ValidationErrors};

    #[derive(Debug, Default)]
    struct Pool {
        name: String,
        size: i32,
    }

    impl Validate for Pool {
        fn validate(&self) -> Result<(), Vec<crate::ValidationError>> {
            let mut errors = ValidationErrors::default();
            errors.check(
                NotEmpty::validate(&self.name, "name")
                    .map_err(|e| e.with_message("pool name is required")),
            );
            errors.check(InRange { min: 1, max: 8 }.validate(self.size, "size"));
            errors.into_result()
        }
    }

    #[test]
    fn test_messages_become_failures() {
        let container = Container::new();
        container.validate_options::<Pool>();

        let err = container.options::<Pool>().unwrap_err();
        let strut_core::Error::OptionsValidation(err) = err else {
            panic!("expected a validation error");
        };
        assert_eq!(
            err.failures,
            vec!["pool name is required", "size must be between 1 and 8"]
        );
    }

    #[test]
    fn test_registering_twice_reports_once() {
        let container = Container::new();
        container
            .validate_options::<Pool>()
            .validate_options::<Pool>()
            .configure_options::<Pool, _>(|p| p.size = 4);

        let err = container.options::<Pool>().unwrap_err().to_string();
        assert_eq!(err.matches("pool name is required").count(), 1);
    }

    #[test]
    fn test_valid_options_resolve() {
        let container = Container::new();
        container
            .configure_options::<Pool, _>(|p| {
                p.name = "primary".to_string();
                p.size = 2;
            })
            .validate_options::<Pool>();

        assert_eq!(container.options::<Pool>().unwrap().size, 2);
    }
}
