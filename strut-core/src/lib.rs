//! # Strut Core
//!
//! A typed service container with lazy singletons and validated options.
//!
//! Services are registered once at startup and resolved by type. Trait
//! objects are first-class: register an `Arc<dyn Trait>` (eagerly or through
//! a factory) and resolve it as `Arc<dyn Trait>`.
//!
//! ```
//! use std::sync::Arc;
//! use strut_core::{Container, Provider};
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! impl Provider for dyn Clock {}
//!
//! struct Fixed(u64);
//!
//! impl Clock for Fixed {
//!     fn now(&self) -> u64 {
//!         self.0
//!     }
//! }
//!
//! let container = Container::new();
//! container.register_singleton::<dyn Clock, _>(|_| Ok(Arc::new(Fixed(42)) as Arc<dyn Clock>));
//!
//! let clock = container.resolve::<dyn Clock>().unwrap();
//! assert_eq!(clock.now(), 42);
//! ```

pub mod container;
pub mod error;
pub mod logging;
pub mod options;
pub mod traits;

pub use container::{Container, Factory};
pub use error::{Error, OptionsValidationError, Result};
pub use options::Options;
pub use traits::{OptionsType, Provider};
