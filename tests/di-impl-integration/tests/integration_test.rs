//! 依赖注入容器集成测试
use config_impl::{ConfigFormat, LayeredConfigLoader};
use di_abstractions::{
    ContainerBuilder, DiContainer, Injectable, Provider, RegisterOptions, Registry, Resolver,
};
use di_impl::ContainerImpl;
use infrastructure_common::{
    ContainerError, ContainerResult, DependencyError, FaultKind, ObjectKey, RegistrationError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

/// 接口实现
#[derive(Debug)]
struct English;

impl Greeter for English {
    fn greet(&self) -> String {
        "hello".to_string()
    }
}

#[derive(Debug)]
struct French;

impl Greeter for French {
    fn greet(&self) -> String {
        "bonjour".to_string()
    }
}

/// 依赖接口的对象
struct Reception {
    greeter: Arc<dyn Greeter>,
}

impl Injectable for Reception {
    fn inject(resolver: &mut dyn Resolver) -> ContainerResult<Self> {
        Ok(Self {
            greeter: resolver.interface::<dyn Greeter>()?,
        })
    }
}

/// 收集接口全部实现的对象
struct Chorus {
    all: Vec<Arc<dyn Greeter>>,
    european: Vec<Arc<dyn Greeter>>,
}

impl Injectable for Chorus {
    fn inject(resolver: &mut dyn Resolver) -> ContainerResult<Self> {
        Ok(Self {
            all: resolver.interfaces::<dyn Greeter>(None)?,
            european: resolver.interfaces::<dyn Greeter>(Some("^eu-"))?,
        })
    }
}

/// 配置绑定对象
#[derive(Debug)]
struct Config {
    x: i64,
    label: String,
}

impl Injectable for Config {
    fn inject(resolver: &mut dyn Resolver) -> ContainerResult<Self> {
        Ok(Self {
            x: resolver.value("x.y")?,
            label: resolver.optional_value("x.label")?.unwrap_or_default(),
        })
    }
}

#[derive(Debug)]
struct Thing {
    value: i64,
}

fn make_thing(config: Arc<Config>) -> anyhow::Result<Thing> {
    Ok(Thing { value: config.x })
}

fn container_with(toml: &str) -> ContainerImpl {
    ContainerImpl::builder()
        .with_config_loader(Arc::new(
            LayeredConfigLoader::new().add_inline("test", toml, ConfigFormat::Toml),
        ))
        .build()
}

fn english_options(alias: &str) -> RegisterOptions {
    RegisterOptions::new()
        .name(alias)
        .implement::<dyn Greeter, English>(|value| value)
}

#[test]
fn test_duplicate_identity_fails_regardless_of_order() {
    for instance_first in [true, false] {
        let container = ContainerImpl::new();
        let instance = Provider::instance(English);
        let factory = Provider::constructor(|| English);
        let (first, second) = if instance_first {
            (instance, factory)
        } else {
            (factory, instance)
        };

        container.register(first, RegisterOptions::new()).unwrap();
        let error = container
            .register(second, RegisterOptions::new())
            .unwrap_err();
        assert_eq!(error.kind(), FaultKind::Registration);
        assert!(matches!(
            error,
            ContainerError::Registration {
                source: RegistrationError::DuplicateObject { .. }
            }
        ));
    }
}

#[test]
fn test_aliases_are_distinct_objects() {
    let container = ContainerImpl::new();
    container
        .register(Provider::instance(Config { x: 1, label: "a".into() }), RegisterOptions::new().name("a"))
        .unwrap();
    container
        .register(Provider::instance(Config { x: 2, label: "b".into() }), RegisterOptions::new().name("b"))
        .unwrap();

    assert_eq!(container.get_object::<Config>("a").unwrap().x, 1);
    assert_eq!(container.get_object::<Config>("b").unwrap().x, 2);

    let error = container.get_object::<Config>("").unwrap_err();
    assert!(matches!(
        error,
        ContainerError::Dependency {
            source: DependencyError::ObjectNotFound { .. }
        }
    ));
}

#[test]
fn test_repeated_lookup_returns_same_value() {
    let container = ContainerImpl::new();
    container
        .register(Provider::constructor(|| English), RegisterOptions::new())
        .unwrap();

    let first = container.get_object::<English>("").unwrap();
    let second = container.get_object::<English>("").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_interface_without_binding_fails_load() {
    let container = ContainerImpl::new();
    container
        .register(Provider::injectable::<Reception>(), RegisterOptions::new())
        .unwrap();

    let error = container.load().unwrap_err();
    assert_eq!(error.kind(), FaultKind::Dependency);
    assert!(matches!(
        error,
        ContainerError::Dependency {
            source: DependencyError::MissingImplementation { .. }
        }
    ));
}

#[test]
fn test_interface_field_is_bound_implementation() {
    let container = ContainerImpl::new();
    container
        .register(Provider::injectable::<Reception>(), RegisterOptions::new())
        .unwrap();
    container
        .register(Provider::instance(English), english_options(""))
        .unwrap();

    container.load().unwrap();
    let reception = container.get_object::<Reception>("").unwrap();
    let english = container.get_object::<English>("").unwrap();
    assert_eq!(reception.greeter.greet(), "hello");

    let bound: Arc<dyn Greeter> = english;
    assert!(Arc::ptr_eq(&reception.greeter, &bound));
}

#[test]
fn test_first_binding_wins() {
    let container = ContainerImpl::new();
    container
        .register(
            Provider::instance(French),
            RegisterOptions::new().implement::<dyn Greeter, French>(|value| value),
        )
        .unwrap();
    container
        .register(Provider::instance(English), english_options(""))
        .unwrap();

    assert_eq!(container.get_interface::<dyn Greeter>().unwrap().greet(), "bonjour");
}

#[test]
fn test_factory_error_fails_load_and_stops_downstream() {
    #[derive(Debug)]
    struct Downstream;

    let container = ContainerImpl::new();
    container
        .register(
            Provider::factory(|| -> anyhow::Result<Thing> { anyhow::bail!("数据库不可用") }),
            RegisterOptions::new(),
        )
        .unwrap();
    container
        .register(
            Provider::constructor(|_thing: Arc<Thing>| Downstream),
            RegisterOptions::new(),
        )
        .unwrap();

    let error = container.load().unwrap_err();
    assert_eq!(error.kind(), FaultKind::Factory);
    assert!(error.to_string().contains("数据库不可用"));

    assert!(container
        .registered_objects()
        .iter()
        .filter(|descriptor| !descriptor.optional)
        .all(|descriptor| !descriptor.resolved));
    assert_eq!(container.stats().resolved_objects, 0);
    assert!(!container.is_loaded());
}

#[test]
fn test_optional_object_is_tolerated_until_referenced() {
    let unreferenced = ContainerImpl::new();
    unreferenced
        .register(Provider::injectable::<Reception>(), RegisterOptions::new().optional())
        .unwrap();
    unreferenced.load().unwrap();

    #[derive(Debug)]
    struct Lobby;

    let referenced = ContainerImpl::new();
    referenced
        .register(Provider::injectable::<Reception>(), RegisterOptions::new().optional())
        .unwrap();
    referenced
        .register(
            Provider::constructor(|_reception: Arc<Reception>| Lobby),
            RegisterOptions::new(),
        )
        .unwrap();

    let error = referenced.load().unwrap_err();
    assert!(matches!(
        error,
        ContainerError::Dependency {
            source: DependencyError::MissingImplementation { .. }
        }
    ));
}

#[test]
fn test_optional_object_resolves_on_lookup() {
    static BUILDS: AtomicUsize = AtomicUsize::new(0);

    let container = ContainerImpl::new();
    container
        .register(
            Provider::constructor(|| {
                BUILDS.fetch_add(1, Ordering::SeqCst);
                French
            }),
            RegisterOptions::new().optional(),
        )
        .unwrap();

    container.load().unwrap();
    assert_eq!(BUILDS.load(Ordering::SeqCst), 0);

    let first = container.get_object::<French>("").unwrap();
    let second = container.get_object::<French>("").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_factory_from_config_value() {
    let container = container_with("[x]\ny = 42\n");
    container
        .register(Provider::factory(make_thing), RegisterOptions::new())
        .unwrap();
    container
        .register(Provider::injectable::<Config>(), RegisterOptions::new())
        .unwrap();

    container.load().unwrap();
    let thing = container.get_object::<Thing>("").unwrap();
    assert_eq!(thing.value, 42);

    let config = container.get_object::<Config>("").unwrap();
    assert_eq!(config.label, "");
}

#[test]
fn test_missing_config_value_is_configuration_fault() {
    let container = container_with("[x]\nz = 1\n");
    container
        .register(Provider::injectable::<Config>(), RegisterOptions::new())
        .unwrap();

    let error = container.load().unwrap_err();
    assert_eq!(error.kind(), FaultKind::Configuration);
    assert!(error.to_string().contains("x.y"));
}

#[test]
fn test_unconvertible_config_value() {
    let container = container_with("[x]\ny = \"forty-two\"\n");
    container
        .register(Provider::injectable::<Config>(), RegisterOptions::new())
        .unwrap();

    let error = container.load().unwrap_err();
    assert_eq!(error.kind(), FaultKind::Configuration);
}

#[test]
fn test_environment_values_are_converted() {
    std::env::set_var("WIRINGIT__X__Y", "42");
    std::env::set_var("WIRINGIT__X__LABEL", "from-env");

    let container = ContainerImpl::builder()
        .with_config_loader(Arc::new(
            LayeredConfigLoader::new().add_environment("WIRINGIT", "__"),
        ))
        .build();
    container
        .register(Provider::injectable::<Config>(), RegisterOptions::new())
        .unwrap();

    let config = container.get_object::<Config>("").unwrap();
    assert_eq!(config.x, 42);
    assert_eq!(config.label, "from-env");

    std::env::remove_var("WIRINGIT__X__Y");
    std::env::remove_var("WIRINGIT__X__LABEL");
}

#[test]
fn test_environment_strings_reach_fields_unchanged() {
    std::env::set_var("WIRINGPIN__X__Y", "1");
    std::env::set_var("WIRINGPIN__X__LABEL", "007");

    let container = ContainerImpl::builder()
        .with_config_loader(Arc::new(
            LayeredConfigLoader::new().add_environment("WIRINGPIN", "__"),
        ))
        .build();
    container
        .register(Provider::injectable::<Config>(), RegisterOptions::new())
        .unwrap();

    let config = container.get_object::<Config>("").unwrap();
    assert_eq!(config.label, "007");
    assert_eq!(config.x, 1);

    std::env::remove_var("WIRINGPIN__X__Y");
    std::env::remove_var("WIRINGPIN__X__LABEL");
}

#[test]
fn test_unreadable_config_file_aborts_load() {
    let container = ContainerImpl::builder()
        .with_config_loader(Arc::new(
            LayeredConfigLoader::new().add_file("definitely/not/here/app"),
        ))
        .build();
    container
        .register(Provider::instance(English), RegisterOptions::new())
        .unwrap();

    let error = container.load().unwrap_err();
    assert_eq!(error.kind(), FaultKind::Configuration);
    assert_eq!(container.stats().resolved_objects, 0);
}

#[test]
fn test_config_file_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.toml");
    std::fs::write(&path, "[x]\ny = 7\nlabel = \"file\"\n").unwrap();

    let container = ContainerImpl::builder()
        .with_config_loader(Arc::new(LayeredConfigLoader::new().add_file(&path)))
        .build();
    container
        .register(Provider::injectable::<Config>(), RegisterOptions::new())
        .unwrap();

    let config = container.get_object::<Config>("").unwrap();
    assert_eq!(config.x, 7);
    assert_eq!(config.label, "file");
}

#[test]
fn test_cycle_is_reported() {
    struct Egg(#[allow(dead_code)] Arc<Chicken>);
    struct Chicken(#[allow(dead_code)] Arc<Egg>);

    let container = ContainerImpl::new();
    container
        .register(Provider::constructor(Egg), RegisterOptions::new())
        .unwrap();
    container
        .register(Provider::constructor(Chicken), RegisterOptions::new())
        .unwrap();

    let error = container.load().unwrap_err();
    assert_eq!(error.kind(), FaultKind::Cycle);
    match error {
        ContainerError::Dependency {
            source: DependencyError::CircularDependency { chain },
        } => {
            assert_eq!(chain.matches("->").count(), 2);
            assert!(chain.contains("Egg"));
            assert!(chain.contains("Chicken"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_collection_injection_and_filter() {
    let container = ContainerImpl::new();
    container
        .register(Provider::injectable::<Chorus>(), RegisterOptions::new())
        .unwrap();
    container
        .register(
            Provider::instance(French),
            RegisterOptions::new()
                .name("eu-fr")
                .implement::<dyn Greeter, French>(|value| value),
        )
        .unwrap();
    container
        .register(Provider::instance(English), english_options("us-en"))
        .unwrap();
    container
        .register(Provider::constructor(|| English), english_options("eu-en"))
        .unwrap();

    let chorus = container.get_object::<Chorus>("").unwrap();
    let voices: Vec<String> = chorus.all.iter().map(|greeter| greeter.greet()).collect();
    assert_eq!(voices, vec!["bonjour", "hello", "hello"]);
    assert_eq!(chorus.european.len(), 2);

    assert_eq!(container.get_all::<dyn Greeter>(Some("^us-")).unwrap().len(), 1);
    assert_eq!(container.get_all::<dyn Greeter>(None).unwrap().len(), 3);

    let invalid = container.get_all::<dyn Greeter>(Some("(")).err().unwrap();
    assert!(matches!(
        invalid,
        ContainerError::Dependency {
            source: DependencyError::InvalidFilter { .. }
        }
    ));
}

#[test]
fn test_empty_collection_is_allowed() {
    let container = ContainerImpl::new();
    container
        .register(Provider::injectable::<Chorus>(), RegisterOptions::new())
        .unwrap();

    let chorus = container.get_object::<Chorus>("").unwrap();
    assert!(chorus.all.is_empty());
    assert!(chorus.european.is_empty());
}

#[test]
fn test_registration_after_load_is_rejected() {
    let container = ContainerImpl::new();
    container.load().unwrap();

    let error = container
        .register(Provider::instance(English), RegisterOptions::new())
        .unwrap_err();
    assert!(matches!(
        error,
        ContainerError::Registration {
            source: RegistrationError::ContainerSealed { .. }
        }
    ));
    assert!(!container.is_registered(&ObjectKey::bare::<English>()));
}

#[test]
fn test_diagnostics() {
    let container = ContainerImpl::new();
    container
        .register(Provider::instance(English), english_options(""))
        .unwrap();
    container
        .register(Provider::constructor(|| French), RegisterOptions::new().optional())
        .unwrap();
    container.load().unwrap();

    let stats = container.stats();
    // 内置的配置快照也是一个可选对象
    assert_eq!(stats.registered_objects, 3);
    assert_eq!(stats.resolved_objects, 1);
    assert_eq!(stats.optional_objects, 2);
    assert_eq!(stats.interfaces, 1);
    assert_eq!(stats.bindings, 1);

    let descriptors = container.registered_objects();
    assert_eq!(descriptors[0].key, ObjectKey::bare::<English>());
    assert_eq!(descriptors[0].interfaces.len(), 1);
    assert!(descriptors[0].resolved);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_load_runs_once() {
    static BUILDS: AtomicUsize = AtomicUsize::new(0);

    let container = Arc::new(container_with("[x]\ny = 5\n"));
    container
        .register(Provider::injectable::<Config>(), RegisterOptions::new())
        .unwrap();
    container
        .register(
            Provider::factory(|config: Arc<Config>| {
                BUILDS.fetch_add(1, Ordering::SeqCst);
                make_thing(config)
            }),
            RegisterOptions::new(),
        )
        .unwrap();

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let container = Arc::clone(&container);
            tokio::task::spawn_blocking(move || container.get_object::<Thing>(""))
        })
        .collect();

    let mut things = Vec::new();
    for task in tasks {
        things.push(task.await.unwrap().unwrap());
    }

    assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
    assert!(things.iter().all(|thing| Arc::ptr_eq(thing, &things[0])));
    assert_eq!(things[0].value, 5);
}
