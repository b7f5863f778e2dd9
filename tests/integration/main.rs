//! Integration tests for Lifeboat models, entities and gateway resolution
//!
//! Model behavior is asserted against a `RecordingGateway` (exact calls and
//! filters) and exercised end to end against a `MemoryGateway`.

mod common;
mod derive_flows;
mod entity_accessors;
mod model_crud;
mod registry;
