//! # Lifeboat
//!
//! Active-Record style data access on top of an external storage gateway.
//!
//! * [`Entity`]: attribute container whose named accesses resolve through
//!   registered accessors/mutators before falling back to raw storage.
//! * [`Model`]: schema-bound CRUD orchestrator enforcing capability flags,
//!   stamping timestamps and filtering soft-deleted rows.
//! * [`gateway`]: the storage contract a model drives, plus an explicit
//!   [`GatewayRegistry`] replacing a process-wide default connection.

// Lets the derive macros' `::lifeboat::` paths resolve inside this crate.
extern crate self as lifeboat;

pub mod config;
pub mod entity;
pub mod gateway;
pub mod metrics;
pub mod model;
pub mod naming;

pub use config::LifeboatConfig;
pub use entity::{Accessors, AttributeContainer, AttributeMap, Entity, EntityError, Record};
pub use gateway::{
    Conditions, Credentials, Gateway, GatewayError, GatewayRegistry, Records, ResultSet,
    SharedGateway,
};
pub use model::{
    Capabilities, Capability, Clock, FixedClock, Model, ModelDefinition, ModelError,
    ModelOptions, ReadScope, SystemClock, DEFAULT_TIMESTAMP_FORMAT,
};

pub use lifeboat_derive::{Entity, ModelDefinition};
