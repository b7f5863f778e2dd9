//! Gateway that records calls instead of executing them.
//!
//! Each terminal call is logged together with the pending filters and
//! assignments it consumed, so tests can assert exactly what a model
//! delegated and in which order.

use std::collections::VecDeque;

use serde_json::Value;

use super::{Conditions, Filter, Gateway, GatewayError, ResultSet};
use crate::entity::AttributeMap;

/// One terminal call received by a [`RecordingGateway`].
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    Create {
        schema: String,
        row: AttributeMap,
    },
    CreateBatch {
        schema: String,
        rows: Vec<AttributeMap>,
    },
    Read {
        schema: String,
        selector: Vec<String>,
        conditions: Conditions,
        filters: Vec<Filter>,
    },
    Update {
        schema: String,
        row: AttributeMap,
        assignments: AttributeMap,
        filters: Vec<Filter>,
    },
    UpdateBatch {
        reference: String,
        schema: String,
        rows: Vec<AttributeMap>,
        filters: Vec<Filter>,
    },
    Delete {
        schema: String,
        conditions: Option<Conditions>,
        filters: Vec<Filter>,
    },
}

impl GatewayCall {
    pub fn schema(&self) -> &str {
        match self {
            GatewayCall::Create { schema, .. }
            | GatewayCall::CreateBatch { schema, .. }
            | GatewayCall::Read { schema, .. }
            | GatewayCall::Update { schema, .. }
            | GatewayCall::UpdateBatch { schema, .. }
            | GatewayCall::Delete { schema, .. } => schema,
        }
    }

    /// Filters consumed by the call; empty for inserts.
    pub fn filters(&self) -> &[Filter] {
        match self {
            GatewayCall::Read { filters, .. }
            | GatewayCall::Update { filters, .. }
            | GatewayCall::UpdateBatch { filters, .. }
            | GatewayCall::Delete { filters, .. } => filters,
            GatewayCall::Create { .. } | GatewayCall::CreateBatch { .. } => &[],
        }
    }
}

/// Scriptable gateway for tests.
///
/// Write operations answer with [`with_result`](RecordingGateway::with_result)
/// (default `true`); reads hand out the queued row sets in order, then empty
/// sets. [`fail_next`](RecordingGateway::fail_next) makes the next terminal
/// call fail after it has been recorded.
#[derive(Debug)]
pub struct RecordingGateway {
    calls: Vec<GatewayCall>,
    pending_filters: Vec<Filter>,
    pending_assignments: AttributeMap,
    result: bool,
    reads: VecDeque<Vec<AttributeMap>>,
    failure: Option<GatewayError>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            pending_filters: Vec::new(),
            pending_assignments: AttributeMap::new(),
            result: true,
            reads: VecDeque::new(),
            failure: None,
        }
    }

    pub fn with_result(mut self, result: bool) -> Self {
        self.result = result;
        self
    }

    /// Queue the rows returned by the next unanswered `read`.
    pub fn with_rows(mut self, rows: Vec<AttributeMap>) -> Self {
        self.reads.push_back(rows);
        self
    }

    pub fn fail_next(&mut self, error: GatewayError) {
        self.failure = Some(error);
    }

    pub fn calls(&self) -> &[GatewayCall] {
        &self.calls
    }

    pub fn last_call(&self) -> Option<&GatewayCall> {
        self.calls.last()
    }

    pub fn pending_filters(&self) -> &[Filter] {
        &self.pending_filters
    }

    pub fn pending_assignments(&self) -> &AttributeMap {
        &self.pending_assignments
    }

    fn record(&mut self, call: GatewayCall) -> Result<(), GatewayError> {
        log::debug!("recorded gateway call on {}", call.schema());
        self.calls.push(call);
        match self.failure.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn take_filters(&mut self) -> Vec<Filter> {
        std::mem::take(&mut self.pending_filters)
    }
}

impl Default for RecordingGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl Gateway for RecordingGateway {
    fn create(&mut self, schema: &str, row: AttributeMap) -> Result<bool, GatewayError> {
        self.record(GatewayCall::Create {
            schema: schema.to_string(),
            row,
        })?;
        Ok(self.result)
    }

    fn create_batch(
        &mut self,
        schema: &str,
        rows: Vec<AttributeMap>,
    ) -> Result<bool, GatewayError> {
        self.record(GatewayCall::CreateBatch {
            schema: schema.to_string(),
            rows,
        })?;
        Ok(self.result)
    }

    fn read(
        &mut self,
        schema: &str,
        selector: &[String],
        conditions: &Conditions,
    ) -> Result<ResultSet, GatewayError> {
        let filters = self.take_filters();
        self.record(GatewayCall::Read {
            schema: schema.to_string(),
            selector: selector.to_vec(),
            conditions: conditions.clone(),
            filters,
        })?;
        Ok(ResultSet::from_rows(self.reads.pop_front().unwrap_or_default()))
    }

    fn update(&mut self, schema: &str, row: AttributeMap) -> Result<bool, GatewayError> {
        let filters = self.take_filters();
        let assignments = std::mem::take(&mut self.pending_assignments);
        self.record(GatewayCall::Update {
            schema: schema.to_string(),
            row,
            assignments,
            filters,
        })?;
        Ok(self.result)
    }

    fn update_batch(
        &mut self,
        reference: &str,
        schema: &str,
        rows: Vec<AttributeMap>,
    ) -> Result<bool, GatewayError> {
        let filters = self.take_filters();
        self.record(GatewayCall::UpdateBatch {
            reference: reference.to_string(),
            schema: schema.to_string(),
            rows,
            filters,
        })?;
        Ok(self.result)
    }

    fn delete(
        &mut self,
        schema: &str,
        conditions: Option<&Conditions>,
    ) -> Result<bool, GatewayError> {
        let filters = self.take_filters();
        self.record(GatewayCall::Delete {
            schema: schema.to_string(),
            conditions: conditions.cloned(),
            filters,
        })?;
        Ok(self.result)
    }

    fn filter(&mut self, filter: Filter) {
        self.pending_filters.push(filter);
    }

    fn has_pending(&self, filter: &Filter) -> bool {
        self.pending_filters.contains(filter)
    }

    fn set(&mut self, column: &str, value: Value) {
        self.pending_assignments.insert(column.to_string(), value);
    }
}
