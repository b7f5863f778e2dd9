//! Shared fixtures

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use lifeboat::gateway::{GatewayCall, RecordingGateway};
use lifeboat::{AttributeMap, FixedClock, Model, ModelDefinition};
use serde_json::Value;

pub type Recorder = Arc<Mutex<RecordingGateway>>;

pub fn row(value: Value) -> AttributeMap {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

pub fn recorder() -> Recorder {
    Arc::new(Mutex::new(RecordingGateway::new()))
}

pub const NOW: &str = "2024-05-01 12:00:00";

pub fn clock() -> FixedClock {
    let at = NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("valid date");
    FixedClock(at)
}

/// Model bound to `gateway` with the fixed clock.
pub fn model<D: ModelDefinition>(gateway: &Recorder) -> Model<D> {
    Model::<D>::new(gateway.clone())
        .expect("model configuration")
        .with_clock(clock())
}

pub fn calls(gateway: &Recorder) -> Vec<GatewayCall> {
    gateway.lock().expect("gateway lock").calls().to_vec()
}

pub fn last_call(gateway: &Recorder) -> GatewayCall {
    calls(gateway).pop().expect("at least one gateway call")
}
