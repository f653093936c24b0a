// Dependency injection container

use crate::{Error, Provider, Result};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

pub(crate) type Entry = Arc<dyn Any + Send + Sync>;

/// Builds a singleton the first time it is resolved.
pub type Factory<T> = Box<dyn Fn(&Container) -> Result<Arc<T>> + Send + Sync>;

/// A registered singleton slot.
///
/// Eager registrations start filled. Lazy ones hold a factory and fill the
/// cell on the first successful resolution; a failed factory leaves the cell
/// empty so the next resolution runs it again.
struct Singleton<T: ?Sized> {
    instance: OnceCell<Arc<T>>,
    factory: Option<Factory<T>>,
}

impl<T: ?Sized + Provider> Singleton<T> {
    fn ready(instance: Arc<T>) -> Self {
        Self {
            instance: OnceCell::with_value(instance),
            factory: None,
        }
    }

    fn lazy(factory: Factory<T>) -> Self {
        Self {
            instance: OnceCell::new(),
            factory: Some(factory),
        }
    }

    fn get(&self, container: &Container) -> Result<Arc<T>> {
        self.instance
            .get_or_try_init(|| {
                let type_name = std::any::type_name::<T>();
                let factory = self.factory.as_ref().ok_or_else(|| {
                    Error::DependencyInjection(format!("No factory for {}", type_name))
                })?;

                debug!(provider = type_name, "Constructing singleton");
                factory(container)
            })
            .map(Arc::clone)
    }
}

/// The dependency injection container
///
/// Cloning is cheap and every clone shares the same registration table.
#[derive(Clone)]
pub struct Container {
    providers: Arc<RwLock<HashMap<TypeId, Entry>>>,
    pub(crate) setups: Arc<RwLock<HashMap<TypeId, Entry>>>,
}

impl Container {
    pub fn new() -> Self {
        debug!("Creating new DI container");
        Self {
            providers: Arc::new(RwLock::new(HashMap::new())),
            setups: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a provider instance
    pub fn register<T: Provider>(&self, instance: T) {
        self.register_arc(Arc::new(instance));
    }

    /// Register an already shared instance, including trait objects.
    pub fn register_arc<T: ?Sized + Provider>(&self, instance: Arc<T>) {
        self.insert::<T>(Singleton::ready(instance));
        debug!(
            provider = std::any::type_name::<T>(),
            "Provider registered in DI container"
        );
    }

    /// Register a singleton built on first resolution.
    ///
    /// The factory receives the container so it can resolve its own
    /// dependencies. Registering the same type again replaces the entry.
    pub fn register_singleton<T, F>(&self, factory: F)
    where
        T: ?Sized + Provider,
        F: Fn(&Container) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.insert::<T>(Singleton::lazy(Box::new(factory)));
        debug!(
            provider = std::any::type_name::<T>(),
            "Lazy singleton registered in DI container"
        );
    }

    fn insert<T: ?Sized + Provider>(&self, slot: Singleton<T>) {
        trace!(
            provider = std::any::type_name::<T>(),
            "Acquiring write lock for registration"
        );
        self.providers
            .write()
            .insert(TypeId::of::<T>(), Arc::new(slot));
    }

    /// Resolve a provider by type
    pub fn resolve<T: ?Sized + Provider>(&self) -> Result<Arc<T>> {
        let type_name = std::any::type_name::<T>();
        trace!(provider = type_name, "Attempting to resolve provider");

        // The lock is released before the factory runs so that factories can
        // resolve their own dependencies.
        let entry = self.providers.read().get(&TypeId::of::<T>()).cloned();
        let Some(entry) = entry else {
            debug!(provider = type_name, "Provider not found in container");
            return Err(Error::ProviderNotFound(format!(
                "Provider not found: {}",
                type_name
            )));
        };

        let slot = entry.downcast::<Singleton<T>>().map_err(|_| {
            Error::DependencyInjection(format!("Registration type mismatch for {}", type_name))
        })?;

        let result = slot.get(self);
        match &result {
            Ok(_) => trace!(provider = type_name, "Provider resolved successfully"),
            Err(e) => debug!(provider = type_name, error = %e, "Provider resolution failed"),
        }
        result
    }

    /// Check if a provider is registered
    pub fn has<T: ?Sized + Provider>(&self) -> bool {
        let exists = self.providers.read().contains_key(&TypeId::of::<T>());
        trace!(
            provider = std::any::type_name::<T>(),
            exists = exists,
            "Checked provider existence"
        );
        exists
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all providers and options setups
    pub fn clear(&self) {
        let mut providers = self.providers.write();
        let count = providers.len();
        providers.clear();
        self.setups.write().clear();

        debug!(provider_count = count, "Cleared all providers from container");
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    impl Provider for dyn Greeter {}

    struct English;

    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    #[test]
    fn test_trait_object_registration() {
        let container = Container::new();
        container.register_arc::<dyn Greeter>(Arc::new(English));

        let greeter = container.resolve::<dyn Greeter>().unwrap();
        assert_eq!(greeter.greet(), "hello");
        assert!(container.has::<dyn Greeter>());
    }

    #[test]
    fn test_lazy_singleton_is_built_once() {
        let container = Container::new();
        let builds = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&builds);
        container.register_singleton::<dyn Greeter, _>(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(English) as Arc<dyn Greeter>)
        });

        assert_eq!(builds.load(Ordering::SeqCst), 0);

        let first = container.resolve::<dyn Greeter>().unwrap();
        let second = container.resolve::<dyn Greeter>().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_factory_is_retried() {
        let container = Container::new();
        let attempts = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&attempts);
        container.register_singleton::<dyn Greeter, _>(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(Error::DependencyInjection("not yet".to_string()))
            } else {
                Ok(Arc::new(English) as Arc<dyn Greeter>)
            }
        });

        assert!(container.resolve::<dyn Greeter>().is_err());
        assert!(container.resolve::<dyn Greeter>().is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_clear_and_len() {
        let container = Container::new();
        assert!(container.is_empty());

        container.register_arc::<dyn Greeter>(Arc::new(English));
        assert_eq!(container.len(), 1);

        container.clear();
        assert!(container.is_empty());
        assert!(!container.has::<dyn Greeter>());
    }
}
