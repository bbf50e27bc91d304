//! `#[derive(Injectable)]` 与容器的集成测试

use component_macros::Injectable;
use config_impl::{ConfigFormat, LayeredConfigLoader};
use di_abstractions::{ContainerBuilder, DiContainer, Provider, RegisterOptions, Registry};
use di_impl::ContainerImpl;
use infrastructure_common::{ContainerError, DependencyError, FaultKind};
use std::sync::Arc;

pub trait AuditSink: Send + Sync {
    fn target(&self) -> &str;
}

#[derive(Debug)]
pub struct FileSink {
    path: String,
}

impl AuditSink for FileSink {
    fn target(&self) -> &str {
        &self.path
    }
}

#[derive(Debug, Injectable)]
pub struct Database {
    #[value("database.url")]
    url: String,
    #[value("database.pool_size", optional)]
    pool_size: u32,
}

#[derive(Injectable)]
pub struct OrderService {
    #[inject]
    database: Arc<Database>,
    #[inject(name = "replica")]
    replica: Arc<Database>,
    #[inject]
    sink: Arc<dyn AuditSink>,
    #[inject(all)]
    sinks: Vec<Arc<dyn AuditSink>>,
    #[inject(all = "^audit-")]
    audit_sinks: Vec<Arc<dyn AuditSink>>,
    #[value("orders.page_size")]
    page_size: usize,
    #[value("orders.region", optional)]
    region: String,
    processed: u64,
}

#[derive(Injectable)]
pub struct Ticker(#[inject] Arc<Database>, #[value("ticker.interval_ms")] u64);

const CONFIG: &str = r#"
[database]
url = "postgres://primary"
pool_size = 8

[orders]
page_size = "50"

[ticker]
interval_ms = 250
"#;

fn sink(path: &str) -> FileSink {
    FileSink {
        path: path.to_string(),
    }
}

fn sink_options(alias: &str) -> RegisterOptions {
    RegisterOptions::new()
        .name(alias)
        .implement::<dyn AuditSink, FileSink>(|value| value)
}

fn container() -> ContainerImpl {
    let container = ContainerImpl::builder()
        .with_config_loader(Arc::new(
            LayeredConfigLoader::new().add_inline("app", CONFIG, ConfigFormat::Toml),
        ))
        .build();

    container
        .register(Provider::injectable::<Database>(), RegisterOptions::new())
        .unwrap();
    container
        .register(
            Provider::instance(Database {
                url: "postgres://replica".to_string(),
                pool_size: 2,
            }),
            RegisterOptions::new().name("replica"),
        )
        .unwrap();
    container
        .register(Provider::instance(sink("stdout")), sink_options("console"))
        .unwrap();
    container
        .register(Provider::instance(sink("/var/log/a")), sink_options("audit-a"))
        .unwrap();
    container
        .register(Provider::instance(sink("/var/log/b")), sink_options("audit-b"))
        .unwrap();
    container
}

#[test]
fn test_derived_object_is_fully_injected() {
    let container = container();
    container
        .register(Provider::injectable::<OrderService>(), RegisterOptions::new())
        .unwrap();
    container.load().unwrap();

    let service = container.get_object::<OrderService>("").unwrap();
    let database = container.get_object::<Database>("").unwrap();

    assert!(Arc::ptr_eq(&service.database, &database));
    assert_eq!(service.database.url, "postgres://primary");
    assert_eq!(service.database.pool_size, 8);
    assert_eq!(service.replica.url, "postgres://replica");

    assert_eq!(service.sink.target(), "stdout");
    let targets: Vec<&str> = service.sinks.iter().map(|sink| sink.target()).collect();
    assert_eq!(targets, vec!["stdout", "/var/log/a", "/var/log/b"]);
    assert_eq!(service.audit_sinks.len(), 2);

    assert_eq!(service.page_size, 50);
    assert_eq!(service.region, "");
    assert_eq!(service.processed, 0);
}

#[test]
fn test_derived_tuple_struct() {
    let container = container();
    container
        .register(Provider::injectable::<Ticker>(), RegisterOptions::new())
        .unwrap();

    let ticker = container.get_object::<Ticker>("").unwrap();
    assert_eq!(ticker.0.url, "postgres://primary");
    assert_eq!(ticker.1, 250);
}

#[test]
fn test_missing_named_dependency() {
    #[derive(Injectable)]
    struct Reporting {
        #[inject(name = "warehouse")]
        #[allow(dead_code)]
        warehouse: Arc<Database>,
    }

    let container = container();
    container
        .register(Provider::injectable::<Reporting>(), RegisterOptions::new())
        .unwrap();

    let error = container.load().unwrap_err();
    assert_eq!(error.kind(), FaultKind::Dependency);
    match error {
        ContainerError::Dependency {
            source: DependencyError::MissingDependency { key, dependant },
        } => {
            assert_eq!(key.alias(), "warehouse");
            assert!(dependant.contains("Reporting"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_required_value() {
    #[derive(Injectable)]
    struct Mailer {
        #[value("mail.host")]
        #[allow(dead_code)]
        host: String,
    }

    let container = container();
    container
        .register(Provider::injectable::<Mailer>(), RegisterOptions::new())
        .unwrap();

    let error = container.load().unwrap_err();
    assert_eq!(error.kind(), FaultKind::Configuration);
    assert!(error.to_string().contains("mail.host"));
}
