//! Gateway resolution through a registry

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use lifeboat::gateway::{shared, Connector, MemoryGateway};
use lifeboat::{
    Entity, GatewayError, GatewayRegistry, LifeboatConfig, Model, ModelDefinition, ModelError,
};
use serde_json::json;

use crate::common::{clock, row};

#[derive(ModelDefinition)]
#[model(created_field = "created_at")]
struct Events;

#[derive(ModelDefinition)]
#[model(schema = "events", created_field = "created_at", timestamp_format = "%Y")]
struct YearlyEvents;

#[derive(ModelDefinition)]
#[model(schema = "reports", connection = "postgres://reporting")]
struct Reports;

#[derive(ModelDefinition)]
#[model(schema = "report_rows", connection = "postgres://reporting")]
struct ReportRows;

fn memory_connector(connects: Arc<AtomicUsize>) -> Connector {
    Box::new(move |_| {
        connects.fetch_add(1, Ordering::SeqCst);
        Ok(shared(MemoryGateway::new()))
    })
}

#[test]
fn test_models_share_default_gateway() {
    let registry = GatewayRegistry::new(shared(MemoryGateway::new()));
    let mut writer = Model::<Events>::from_registry(&registry).expect("model");
    let mut reader = Model::<Events>::from_registry(&registry).expect("model");

    assert!(Arc::ptr_eq(writer.gateway(), reader.gateway()));
    writer
        .create(row(json!({"id": 1, "kind": "login"})))
        .expect("create");
    let rows = reader.all().expect("read").collect_all().expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("kind"), json!("login"));
}

#[test]
fn test_registry_timestamp_format_is_the_fallback() {
    let registry =
        GatewayRegistry::new(shared(MemoryGateway::new())).with_timestamp_format("%d/%m/%Y");

    let events = Model::<Events>::from_registry(&registry).expect("model");
    assert_eq!(events.timestamp_format(), "%d/%m/%Y");

    let mut yearly = Model::<YearlyEvents>::from_registry(&registry)
        .expect("model")
        .with_clock(clock());
    assert_eq!(yearly.timestamp_format(), "%Y");
    yearly.create(row(json!({"id": 1}))).expect("create");
    let rows = yearly.all().expect("read").collect_all().expect("rows");
    assert_eq!(rows[0].get("created_at"), json!("2024"));
}

#[test]
fn test_credentials_resolve_to_one_cached_gateway() {
    let connects = Arc::new(AtomicUsize::new(0));
    let default = shared(MemoryGateway::new());
    let registry =
        GatewayRegistry::new(default.clone()).with_connector(memory_connector(connects.clone()));

    let reports = Model::<Reports>::from_registry(&registry).expect("model");
    let report_rows = Model::<ReportRows>::from_registry(&registry).expect("model");
    let events = Model::<Events>::from_registry(&registry).expect("model");

    assert_eq!(connects.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(reports.gateway(), report_rows.gateway()));
    assert!(!Arc::ptr_eq(reports.gateway(), &default));
    assert!(Arc::ptr_eq(events.gateway(), &default));
}

#[test]
fn test_credentials_without_connector_fail() {
    let registry = GatewayRegistry::new(shared(MemoryGateway::new()));
    match Model::<Reports>::from_registry(&registry) {
        Err(ModelError::Gateway(GatewayError::Connection(_))) => {}
        other => panic!("unexpected result: {:?}", other.map(|m| m.schema().to_string())),
    }
}

#[test]
fn test_registry_from_config_file() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("tempfile");
    file.write_all(
        br#"
[lifeboat]
timestamp_format = "%H:%M"

[lifeboat.connection]
dsn = "postgres://primary"
username = "app"
password = "secret"
"#,
    )
    .expect("write config");

    let config = LifeboatConfig::load_from(file.path()).expect("config");
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let recorded = seen.clone();
    let connector: Connector = Box::new(move |credentials| {
        recorded
            .lock()
            .expect("lock")
            .push(credentials.dsn.clone());
        Ok(shared(MemoryGateway::new()))
    });

    let registry = GatewayRegistry::from_config(&config, connector).expect("registry");
    assert_eq!(registry.timestamp_format(), "%H:%M");
    assert_eq!(*seen.lock().expect("lock"), vec!["postgres://primary".to_string()]);

    let mut events = Model::<Events>::from_registry(&registry)
        .expect("model")
        .with_clock(clock());
    events.create(row(json!({"id": 1}))).expect("create");
    let rows = events.all().expect("read").collect_all().expect("rows");
    assert_eq!(rows[0].get("created_at"), json!("12:00"));
}
