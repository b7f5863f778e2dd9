//! CRUD delegation against a recording gateway

use std::sync::{Arc, Mutex};

use lifeboat::gateway::{Conditions, Filter, GatewayCall, RecordingGateway};
use lifeboat::{Entity, GatewayError, Model, ModelDefinition, ModelError, Record};
use serde_json::json;

use crate::common::{calls, last_call, model, recorder, row, NOW};

#[derive(ModelDefinition)]
#[model(schema = "users", created_field = "created_at", updated_field = "updated_at")]
struct Users;

#[derive(ModelDefinition)]
struct Tags;

#[derive(ModelDefinition)]
#[model(
    schema = "ledger",
    writable = false,
    readable = false,
    updatable = false,
    deletable = false
)]
struct Ledger;

#[test]
fn test_create_stamps_created_field() {
    let gateway = recorder();
    let mut users = model::<Users>(&gateway);

    assert_eq!(users.create(row(json!({"name": "Ann"}))), Ok(true));
    assert_eq!(
        last_call(&gateway),
        GatewayCall::Create {
            schema: "users".to_string(),
            row: row(json!({"name": "Ann", "created_at": NOW})),
        }
    );
}

#[test]
fn test_create_returns_gateway_result() {
    let gateway = Arc::new(Mutex::new(RecordingGateway::new().with_result(false)));
    let mut tags = Model::<Tags>::new(gateway.clone()).expect("model");

    assert_eq!(tags.schema(), "tags");
    assert_eq!(tags.create(row(json!({"label": "rust"}))), Ok(false));
    assert_eq!(
        last_call(&gateway),
        GatewayCall::Create {
            schema: "tags".to_string(),
            row: row(json!({"label": "rust"})),
        }
    );
}

#[test]
fn test_create_batch_shares_one_timestamp() {
    let gateway = recorder();
    let mut users = model::<Users>(&gateway);

    let rows = vec![row(json!({"name": "a"})), row(json!({"name": "b"}))];
    assert_eq!(users.create_batch(rows), Ok(true));
    match last_call(&gateway) {
        GatewayCall::CreateBatch { schema, rows } => {
            assert_eq!(schema, "users");
            assert_eq!(rows.len(), 2);
            for stored in rows {
                assert_eq!(stored.get("created_at"), Some(&json!(NOW)));
            }
        }
        other => panic!("unexpected call: {other:?}"),
    }
}

#[test]
fn test_update_moves_identity_into_filter() {
    let gateway = recorder();
    let mut users = model::<Users>(&gateway);

    assert_eq!(users.update(row(json!({"id": 7, "name": "y"}))), Ok(true));
    match last_call(&gateway) {
        GatewayCall::Update {
            schema,
            row: set,
            filters,
            ..
        } => {
            assert_eq!(schema, "users");
            assert_eq!(set, row(json!({"name": "y", "updated_at": NOW})));
            assert_eq!(
                filters,
                vec![Filter::Equals {
                    column: "id".to_string(),
                    value: json!(7)
                }]
            );
        }
        other => panic!("unexpected call: {other:?}"),
    }
}

#[test]
fn test_update_batch_defaults_reference_to_schema_id() {
    let gateway = recorder();
    let mut users = model::<Users>(&gateway);

    let rows = vec![row(json!({"id": 1, "name": "a"}))];
    assert_eq!(users.update_batch(rows.clone(), None), Ok(true));
    assert_eq!(users.update_batch(rows, Some("email")), Ok(true));

    let references: Vec<String> = calls(&gateway)
        .into_iter()
        .filter_map(|call| match call {
            GatewayCall::UpdateBatch { reference, rows, .. } => {
                assert_eq!(rows[0].get("updated_at"), Some(&json!(NOW)));
                Some(reference)
            }
            _ => None,
        })
        .collect();
    assert_eq!(references, vec!["id", "email"]);
}

#[test]
fn test_save_dispatches_on_identity() {
    let gateway = recorder();
    let mut tags = model::<Tags>(&gateway);

    let existing = Record::from_attributes(Some(row(json!({"id": 5, "name": "x"}))));
    let fresh = Record::from_attributes(Some(row(json!({"name": "x"}))));
    let null_id = Record::from_attributes(Some(row(json!({"id": null, "name": "x"}))));

    assert_eq!(tags.save(&existing), Ok(true));
    assert!(matches!(last_call(&gateway), GatewayCall::Update { .. }));

    assert_eq!(tags.save(&fresh), Ok(true));
    assert!(matches!(last_call(&gateway), GatewayCall::Create { .. }));

    assert_eq!(tags.save(&null_id), Ok(true));
    assert!(matches!(last_call(&gateway), GatewayCall::Create { .. }));
}

#[test]
fn test_disabled_capabilities_never_reach_gateway() {
    let gateway = recorder();
    let mut ledger = model::<Ledger>(&gateway);

    assert_eq!(
        ledger.create(row(json!({"amount": 1}))),
        Err(ModelError::NotWritable)
    );
    assert_eq!(
        ledger.create_batch(vec![row(json!({"amount": 1}))]),
        Err(ModelError::NotWritable)
    );
    assert!(matches!(
        ledger.read(&[], Conditions::new()),
        Err(ModelError::NotReadable)
    ));
    assert_eq!(
        ledger.update(row(json!({"id": 1, "amount": 2}))),
        Err(ModelError::NotUpdatable)
    );
    assert_eq!(
        ledger.update_batch(vec![row(json!({"id": 1}))], None),
        Err(ModelError::NotUpdatable)
    );
    assert_eq!(ledger.delete(None, true), Err(ModelError::NotDeletable));
    assert_eq!(
        ledger.save(&Record::from_attributes(Some(row(json!({"id": 1}))))),
        Err(ModelError::NotUpdatable)
    );

    assert!(calls(&gateway).is_empty());
}

#[test]
fn test_read_passes_selector_and_conditions() {
    let gateway = Arc::new(Mutex::new(
        RecordingGateway::new().with_rows(vec![
            row(json!({"id": 1, "name": "Ann"})),
            row(json!({"id": 2, "name": "Bob"})),
        ]),
    ));
    let mut users = Model::<Users>::new(gateway.clone()).expect("model");

    let conditions = Conditions::new().eq("active", json!(true));
    let records = users
        .where_eq("team", json!("core"))
        .read(&["id", "name"], conditions.clone())
        .expect("read")
        .collect_all()
        .expect("rows");

    let names: Vec<_> = records.iter().map(|r| r.get("name")).collect();
    assert_eq!(names, vec![json!("Ann"), json!("Bob")]);
    assert_eq!(
        last_call(&gateway),
        GatewayCall::Read {
            schema: "users".to_string(),
            selector: vec!["id".to_string(), "name".to_string()],
            conditions,
            filters: vec![Filter::Equals {
                column: "team".to_string(),
                value: json!("core")
            }],
        }
    );
}

#[test]
fn test_hard_delete_forwards_conditions() {
    let gateway = recorder();
    let mut tags = model::<Tags>(&gateway);

    let conditions = Conditions::new().eq("id", json!(3));
    assert_eq!(tags.delete(Some(conditions.clone()), false), Ok(true));
    assert_eq!(
        last_call(&gateway),
        GatewayCall::Delete {
            schema: "tags".to_string(),
            conditions: Some(conditions),
            filters: Vec::new(),
        }
    );
}

#[test]
fn test_gateway_failure_is_wrapped() {
    let gateway = recorder();
    let mut tags = model::<Tags>(&gateway);

    gateway
        .lock()
        .expect("gateway lock")
        .fail_next(GatewayError::Execution("duplicate key".to_string()));

    let err = tags
        .create(row(json!({"label": "dup"})))
        .expect_err("gateway failure");
    assert!(err.is_storage_error());
    assert_eq!(err.to_string(), GatewayError::Execution("duplicate key".to_string()).to_string());
    assert_eq!(calls(&gateway).len(), 1);

    assert_eq!(tags.create(row(json!({"label": "ok"}))), Ok(true));
}
