//! Validation for strut options and inputs
//!
//! Field validators produce [`ValidationError`]s; types collect them in a
//! [`Validate`] implementation, and [`ValidateOptionsExt`] runs that
//! implementation when container options are first resolved.
//!
//! # Examples
//!
//! ```
//! use strut_validation::{InRange, NotEmpty, Validate, ValidationError, ValidationErrors};
//!
//! struct Target {
//!     host: String,
//!     slot: i32,
//! }
//!
//! impl Validate for Target {
//!     fn validate(&self) -> Result<(), Vec<ValidationError>> {
//!         let mut errors = ValidationErrors::default();
//!         errors.check(NotEmpty::validate(&self.host, "host"));
//!         errors.check(InRange { min: 0, max: 15 }.validate(self.slot, "slot"));
//!         errors.into_result()
//!     }
//! }
//!
//! let target = Target { host: String::new(), slot: 16 };
//! assert_eq!(target.validate().unwrap_err().len(), 2);
//! ```

mod errors;
mod options;
mod traits;
mod validators;

pub use errors::*;
pub use options::*;
pub use traits::*;
pub use validators::*;
