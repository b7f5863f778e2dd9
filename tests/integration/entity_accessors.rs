//! Accessor/mutator dispatch and raw storage

use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Word;
use fake::faker::name::en::Name;
use fake::Fake;
use lifeboat::{Accessors, AttributeContainer, Entity, EntityError, Record};
use once_cell::sync::Lazy;
use rand::Rng;
use serde_json::{json, Value};

use crate::common::row;

#[derive(Debug, Entity)]
#[entity(accessors = account_accessors)]
struct Account {
    attributes: AttributeContainer,
}

static ACCOUNT_ACCESSORS: Lazy<Accessors<Account>> = Lazy::new(|| {
    Accessors::<Account>::new()
        .getter("balance", |account| {
            let cents = account.attributes.raw("balance").and_then(Value::as_i64);
            cents.map_or(Value::Null, |c| json!(format!("{}.{:02}", c / 100, c % 100)))
        })
        .setter("balance", |account, value| {
            let cents = value.as_f64().map(|v| (v * 100.0).round() as i64);
            account
                .attributes
                .insert("balance", cents.map_or(value, Value::from));
        })
        .setter("owner_name", |account, value| {
            let upper = value.as_str().map(|s| Value::from(s.to_uppercase()));
            account.attributes.insert("owner_name", upper.unwrap_or(value));
        })
});

fn account_accessors() -> &'static Accessors<Account> {
    &ACCOUNT_ACCESSORS
}

#[test]
fn test_raw_attributes_round_trip() {
    let mut rng = rand::thread_rng();
    for _ in 0..20 {
        let mut record = Record::empty();
        let name: String = Name().fake();
        let email: String = SafeEmail().fake();
        let column: String = Word().fake();
        let score: i64 = rng.gen_range(-1_000..1_000);

        assert_eq!(record.set("name", json!(name)), json!(name));
        record.set("email", json!(email));
        record.set(&format!("x_{column}"), json!(score));

        assert_eq!(record.get("name"), json!(name));
        assert_eq!(record.get("email"), json!(email));
        assert_eq!(record.get(&format!("x_{column}")), json!(score));
    }
}

#[test]
fn test_unset_clears_raw_slot() {
    let mut record = Record::from_attributes(Some(row(json!({"a": 1, "b": 2}))));
    record.unset("a");
    assert!(!record.has("a"));
    assert_eq!(record.get("a"), Value::Null);
    assert_eq!(record.to_array(), &row(json!({"b": 2})));
    assert_eq!(record.original_attributes(), &row(json!({"a": 1, "b": 2})));
}

#[test]
fn test_accessor_pair_routes_through_registry() {
    let mut account = Account::empty();
    account.set("balance", json!(12.5));

    assert_eq!(account.get("balance"), json!("12.50"));
    assert_eq!(account.to_array().get("balance"), Some(&json!(1250)));
    assert!(account.has("balance"));
}

#[test]
fn test_initial_data_runs_mutators_but_snapshot_is_raw() {
    let account = Account::from_attributes(Some(row(json!({
        "owner_name": "ada",
        "balance": 3.2,
    }))));

    assert_eq!(account.get("owner_name"), json!("ADA"));
    assert_eq!(account.get("balance"), json!("3.20"));
    assert_eq!(
        account.original_attributes(),
        &row(json!({"owner_name": "ada", "balance": 3.2}))
    );
}

#[test]
fn test_call_dispatch() {
    let mut account = Account::empty();

    assert_eq!(
        account.call("setBalanceAttribute", vec![json!(1)]),
        Ok(json!(1))
    );
    assert_eq!(account.call("getBalanceAttribute", vec![]), Ok(json!("1.00")));

    assert_eq!(
        account.call("setNicknameAttribute", vec![json!("zed")]),
        Ok(json!("zed"))
    );
    assert_eq!(account.get("nickname"), json!("zed"));
    assert_eq!(
        account.call("getLastLoginAtAttribute", vec![]),
        Ok(Value::Null)
    );

    assert_eq!(
        account.call("setNicknameAttribute", vec![]),
        Err(EntityError::MissingArgument("setNicknameAttribute".to_string()))
    );
    assert_eq!(
        account.call("refresh", vec![]),
        Err(EntityError::UnsupportedOperation("refresh".to_string()))
    );
}
