// Core traits for the strut container

/// Marker for types that can be stored in and resolved from the container.
///
/// Implemented explicitly by services; trait objects opt in with
/// `impl Provider for dyn MyTrait {}` so they can be registered as
/// `Arc<dyn MyTrait>`.
pub trait Provider: Send + Sync + 'static {}

/// Bound shared by every options type managed by the container.
///
/// Options start from `Default` and are mutated by configure steps.
pub trait OptionsType: Default + Send + Sync + 'static {}

impl<T: Default + Send + Sync + 'static> OptionsType for T {}
