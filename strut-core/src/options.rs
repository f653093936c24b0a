//! Options: typed configuration values owned by the container.
//!
//! An options type is assembled on first resolution: the container starts
//! from `T::default()`, applies every configure step in registration order,
//! then runs every validator. A valid value is cached as the
//! `Options<T>` singleton; an invalid one surfaces as
//! [`Error::OptionsValidation`] carrying all failure messages.
//!
//! Once built, the value is fixed for the life of the container. Configure
//! steps and validators registered after that point are kept but never run.
//!
//! ```
//! use strut_core::{Container, Options};
//!
//! #[derive(Default)]
//! struct Greeting {
//!     text: String,
//! }
//!
//! let container = Container::new();
//! container
//!     .configure_options::<Greeting, _>(|g| g.text = "hi".to_string())
//!     .add_options_validator::<Greeting, _>("text", |g| {
//!         if g.text.is_empty() {
//!             Err(vec!["text is required".to_string()])
//!         } else {
//!             Ok(())
//!         }
//!     });
//!
//! let greeting = container.options::<Greeting>().unwrap();
//! assert_eq!(greeting.text, "hi");
//! ```

use crate::container::Entry;
use crate::{Container, Error, OptionsType, OptionsValidationError, Provider, Result};
use parking_lot::RwLock;
use std::any::TypeId;
use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

type ConfigureStep<T> = Arc<dyn Fn(&mut T) -> Result<()> + Send + Sync>;
type ValidateStep<T> = Arc<dyn Fn(&T) -> std::result::Result<(), Vec<String>> + Send + Sync>;

/// A validated options value.
#[derive(Debug)]
pub struct Options<T> {
    value: T,
}

impl<T> Options<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &T {
        &self.value
    }
}

impl<T> Deref for Options<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: Send + Sync + 'static> Provider for Options<T> {}

/// Configure steps and validators collected for one options type.
pub(crate) struct OptionsSetup<T> {
    configure: RwLock<Vec<ConfigureStep<T>>>,
    validators: RwLock<Vec<(&'static str, ValidateStep<T>)>>,
    built: AtomicBool,
}

impl<T> OptionsSetup<T> {
    fn new() -> Self {
        Self {
            configure: RwLock::new(Vec::new()),
            validators: RwLock::new(Vec::new()),
            built: AtomicBool::new(false),
        }
    }
}

impl Container {
    /// Append a configure step for `T`.
    pub fn configure_options<T, F>(&self, configure: F) -> &Self
    where
        T: OptionsType,
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.try_configure_options::<T, _>(move |options| {
            configure(options);
            Ok(())
        })
    }

    /// Append a configure step that may fail, such as binding from a
    /// configuration source. The failure surfaces when `Options<T>` is
    /// resolved.
    ///
    /// Steps added after `Options<T>` was built do not apply.
    pub fn try_configure_options<T, F>(&self, configure: F) -> &Self
    where
        T: OptionsType,
        F: Fn(&mut T) -> Result<()> + Send + Sync + 'static,
    {
        let setup = self.options_setup::<T>();
        setup.configure.write().push(Arc::new(configure));
        warn_if_built(&setup, "configure step");
        debug!(
            options = std::any::type_name::<T>(),
            "Options configure step registered"
        );
        self.ensure_options_registered::<T>();
        self
    }

    /// Attach a validator to `T`, run once when `Options<T>` is first
    /// resolved.
    ///
    /// A validator registered under a name that is already present replaces
    /// the earlier one, so repeated registration does not duplicate failures.
    pub fn add_options_validator<T, F>(&self, name: &'static str, validator: F) -> &Self
    where
        T: OptionsType,
        F: Fn(&T) -> std::result::Result<(), Vec<String>> + Send + Sync + 'static,
    {
        let setup = self.options_setup::<T>();
        let step: ValidateStep<T> = Arc::new(validator);

        {
            let mut validators = setup.validators.write();
            match validators.iter_mut().find(|(existing, _)| *existing == name) {
                Some(slot) => slot.1 = step,
                None => validators.push((name, step)),
            }
        }
        warn_if_built(&setup, "validator");

        debug!(
            options = std::any::type_name::<T>(),
            validator = name,
            "Options validator registered"
        );
        self.ensure_options_registered::<T>();
        self
    }

    /// Whether `Options<T>` has been built and cached.
    pub fn is_options_built<T: OptionsType>(&self) -> bool {
        self.setups
            .read()
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref::<OptionsSetup<T>>())
            .is_some_and(|setup| setup.built.load(Ordering::Acquire))
    }

    /// Resolve the validated options for `T`.
    pub fn options<T: OptionsType>(&self) -> Result<Arc<Options<T>>> {
        self.resolve::<Options<T>>()
    }

    fn ensure_options_registered<T: OptionsType>(&self) {
        if !self.has::<Options<T>>() {
            self.register_singleton::<Options<T>, _>(|container| {
                container.build_options::<T>().map(Arc::new)
            });
        }
    }

    fn options_setup<T: OptionsType>(&self) -> Arc<OptionsSetup<T>> {
        let mut setups = self.setups.write();
        let entry = setups
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Arc::new(OptionsSetup::<T>::new()) as Entry);

        match Arc::clone(entry).downcast::<OptionsSetup<T>>() {
            Ok(setup) => setup,
            Err(_) => {
                let setup = Arc::new(OptionsSetup::<T>::new());
                *entry = Arc::clone(&setup) as Entry;
                setup
            }
        }
    }

    fn build_options<T: OptionsType>(&self) -> Result<Options<T>> {
        let type_name = std::any::type_name::<T>();
        let setup = self.options_setup::<T>();

        // Snapshot the steps so none of the locks is held while user code runs.
        let configure: Vec<_> = setup.configure.read().iter().cloned().collect();
        let validators: Vec<_> = setup.validators.read().iter().cloned().collect();

        let mut value = T::default();
        for step in &configure {
            step(&mut value)?;
        }

        let mut failures = Vec::new();
        for (_, validator) in &validators {
            if let Err(mut messages) = validator(&value) {
                failures.append(&mut messages);
            }
        }

        if !failures.is_empty() {
            warn!(
                options = type_name,
                failures = failures.len(),
                "Options validation failed"
            );
            return Err(Error::OptionsValidation(OptionsValidationError::new(
                type_name, failures,
            )));
        }

        debug!(
            options = type_name,
            steps = configure.len(),
            validators = validators.len(),
            "Options built"
        );
        setup.built.store(true, Ordering::Release);
        Ok(Options::new(value))
    }
}

fn warn_if_built<T>(setup: &OptionsSetup<T>, what: &str) {
    if setup.built.load(Ordering::Acquire) {
        warn!(
            options = std::any::type_name::<T>(),
            registration = what,
            "Options already built; late registration will not apply"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default, Debug)]
    struct Limits {
        max: i32,
        label: String,
    }

    #[test]
    fn test_steps_run_in_order() {
        let container = Container::new();
        container
            .configure_options::<Limits, _>(|l| l.max = 1)
            .configure_options::<Limits, _>(|l| l.max *= 10)
            .configure_options::<Limits, _>(|l| l.label = format!("max={}", l.max));

        let limits = container.options::<Limits>().unwrap();
        assert_eq!(limits.max, 10);
        assert_eq!(limits.label, "max=10");
    }

    #[test]
    fn test_all_failures_reported() {
        let container = Container::new();
        container
            .add_options_validator::<Limits, _>("max", |l| {
                if l.max > 0 {
                    Ok(())
                } else {
                    Err(vec!["max must be positive".to_string()])
                }
            })
            .add_options_validator::<Limits, _>("label", |l| {
                if l.label.is_empty() {
                    Err(vec!["label is required".to_string()])
                } else {
                    Ok(())
                }
            });

        match container.options::<Limits>() {
            Err(Error::OptionsValidation(e)) => {
                assert_eq!(
                    e.failures,
                    vec!["max must be positive".to_string(), "label is required".to_string()]
                );
            }
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_named_validator_is_replaced() {
        let container = Container::new();
        container
            .add_options_validator::<Limits, _>("max", |_| Err(vec!["first".to_string()]))
            .add_options_validator::<Limits, _>("max", |_| Err(vec!["second".to_string()]));

        let err = container.options::<Limits>().unwrap_err();
        let text = err.to_string();
        assert!(text.contains("second"));
        assert!(!text.contains("first"));
    }

    #[test]
    fn test_failing_configure_step_propagates() {
        let container = Container::new();
        container.try_configure_options::<Limits, _>(|_| {
            Err(Error::OptionsBinding("max: invalid digit".to_string()))
        });

        let err = container.options::<Limits>().unwrap_err();
        assert!(matches!(err, Error::OptionsBinding(_)));
    }

    #[test]
    fn test_steps_after_build_do_not_apply() {
        let container = Container::new();
        container.configure_options::<Limits, _>(|l| l.max = 1);
        assert!(!container.is_options_built::<Limits>());

        let first = container.options::<Limits>().unwrap();
        assert!(container.is_options_built::<Limits>());

        container
            .configure_options::<Limits, _>(|l| l.max = 2)
            .add_options_validator::<Limits, _>("late", |_| Err(vec!["late".to_string()]));

        let second = container.options::<Limits>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.max, 1);
    }

    #[test]
    fn test_failed_build_is_not_marked_built() {
        let container = Container::new();
        container.add_options_validator::<Limits, _>("max", |l| {
            if l.max > 0 {
                Ok(())
            } else {
                Err(vec!["max must be positive".to_string()])
            }
        });

        assert!(container.options::<Limits>().is_err());
        assert!(!container.is_options_built::<Limits>());
    }

    #[test]
    fn test_unconfigured_options_not_found() {
        let container = Container::new();
        assert!(matches!(
            container.options::<Limits>(),
            Err(Error::ProviderNotFound(_))
        ));
    }
}
