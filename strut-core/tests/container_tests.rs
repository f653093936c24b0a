use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use strut_core::{Container, Error, Provider};

#[derive(Clone)]
struct TestService {
    name: String,
}

impl Provider for TestService {}

struct Repository {
    service: Arc<TestService>,
}

impl Provider for Repository {}

#[test]
fn test_register_and_resolve() {
    let container = Container::new();

    container.register(TestService {
        name: "test".to_string(),
    });

    let resolved = container.resolve::<TestService>().unwrap();
    assert_eq!(resolved.name, "test");
}

#[test]
fn test_resolve_nonexistent() {
    let container = Container::new();
    let result = container.resolve::<TestService>();
    assert!(matches!(result, Err(Error::ProviderNotFound(_))));
}

#[test]
fn test_has_provider() {
    let container = Container::new();

    assert!(!container.has::<TestService>());

    container.register(TestService {
        name: "test".to_string(),
    });

    assert!(container.has::<TestService>());
}

#[test]
fn test_singleton_behavior() {
    let container = Container::new();

    container.register(TestService {
        name: "original".to_string(),
    });

    let resolved1 = container.resolve::<TestService>().unwrap();
    let resolved2 = container.resolve::<TestService>().unwrap();

    assert!(Arc::ptr_eq(&resolved1, &resolved2));
}

#[test]
fn test_factory_resolves_dependencies() {
    let container = Container::new();
    container.register(TestService {
        name: "db".to_string(),
    });
    container.register_singleton::<Repository, _>(|c| {
        Ok(Arc::new(Repository {
            service: c.resolve::<TestService>()?,
        }))
    });

    let repo = container.resolve::<Repository>().unwrap();
    assert_eq!(repo.service.name, "db");
}

#[test]
fn test_factory_missing_dependency_fails() {
    let container = Container::new();
    container.register_singleton::<Repository, _>(|c| {
        Ok(Arc::new(Repository {
            service: c.resolve::<TestService>()?,
        }))
    });

    assert!(container.resolve::<Repository>().is_err());
}

#[test]
fn test_clones_share_registrations() {
    let container = Container::new();
    let clone = container.clone();

    clone.register(TestService {
        name: "shared".to_string(),
    });

    assert!(container.has::<TestService>());
}

#[test]
fn test_reregistration_replaces_entry() {
    let container = Container::new();
    container.register(TestService {
        name: "first".to_string(),
    });
    container.register(TestService {
        name: "second".to_string(),
    });

    assert_eq!(container.resolve::<TestService>().unwrap().name, "second");
    assert_eq!(container.len(), 1);
}

#[test]
fn test_concurrent_first_resolution_builds_once() {
    let container = Container::new();
    let builds = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&builds);
    container.register_singleton::<TestService, _>(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(TestService {
            name: "lazy".to_string(),
        }))
    });

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let container = container.clone();
            std::thread::spawn(move || container.resolve::<TestService>().unwrap())
        })
        .collect();

    let instances: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert!(instances.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}
