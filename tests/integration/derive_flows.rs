//! Derived entities persisted and hydrated through a model

use std::sync::{Arc, Mutex};

use lifeboat::gateway::{Conditions, MemoryGateway};
use lifeboat::{Accessors, AttributeContainer, Entity, Model, ModelDefinition};
use once_cell::sync::Lazy;
use serde_json::{json, Value};

use crate::common::{clock, row, NOW};

#[derive(Debug, Entity)]
#[entity(accessors = member_accessors)]
struct Member {
    attributes: AttributeContainer,
}

static MEMBER_ACCESSORS: Lazy<Accessors<Member>> = Lazy::new(|| {
    Accessors::<Member>::new()
        .getter("handle", |member| {
            let name = member.attributes.raw("name").and_then(Value::as_str);
            name.map_or(Value::Null, |n| json!(format!("@{}", n.to_lowercase())))
        })
        .setter("email", |member, value| {
            let lowered = value.as_str().map(|s| Value::from(s.to_lowercase()));
            member.attributes.insert("email", lowered.unwrap_or(value));
        })
});

fn member_accessors() -> &'static Accessors<Member> {
    &MEMBER_ACCESSORS
}

#[derive(ModelDefinition)]
#[model(
    entity = Member,
    created_field = "joined_at",
    updated_field = "touched_at"
)]
struct ClubMember;

#[test]
fn test_save_then_read_hydrates_derived_entity() {
    let gateway = Arc::new(Mutex::new(MemoryGateway::new()));
    let mut members = Model::<ClubMember>::new(gateway.clone())
        .expect("model")
        .with_clock(clock());
    assert_eq!(members.schema(), "club_member");

    let mut draft = Member::from_attributes(Some(row(json!({
        "id": 1,
        "name": "Grace",
        "email": "GRACE@Example.org",
    }))));
    draft.unset("id");
    assert_eq!(members.save(&draft), Ok(true));

    let stored = gateway.lock().expect("gateway lock").rows("club_member").to_vec();
    assert_eq!(
        stored,
        vec![row(json!({
            "name": "Grace",
            "email": "grace@example.org",
            "joined_at": NOW,
        }))]
    );

    members.create(row(json!({"id": 2, "name": "Linus"}))).expect("create");
    members
        .update(row(json!({"id": 2, "name": "Ada"})))
        .expect("update");

    let found = members
        .read(&["id", "name"], Conditions::new().eq("id", json!(2)))
        .expect("read")
        .collect_all()
        .expect("rows");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].get("handle"), json!("@ada"));
    assert_eq!(found[0].original_attributes(), &row(json!({"id": 2, "name": "Ada"})));
}
