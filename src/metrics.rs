//! Instrumentation for model operations.
//!
//! With the `metrics` feature, counters are recorded through the global
//! OpenTelemetry meter provider (the application installs the exporter).
//! With the `tracing` feature, every model operation runs inside a span.

#[cfg(feature = "metrics")]
use once_cell::sync::Lazy;
#[cfg(feature = "metrics")]
use opentelemetry::{global, metrics::Counter, KeyValue};

#[cfg(feature = "metrics")]
pub static METRICS: Lazy<LifeboatMetrics> = Lazy::new(LifeboatMetrics::init);

#[cfg(feature = "metrics")]
pub struct LifeboatMetrics {
    pub operations_total: Counter<u64>,
    pub capability_denials_total: Counter<u64>,
    pub gateway_errors_total: Counter<u64>,
}

#[cfg(feature = "metrics")]
impl LifeboatMetrics {
    pub fn init() -> Self {
        let meter = global::meter("lifeboat");

        let operations_total = meter
            .u64_counter("lifeboat_operations_total")
            .with_description("Model operations delegated to a gateway")
            .build();

        let capability_denials_total = meter
            .u64_counter("lifeboat_capability_denials_total")
            .with_description("Model operations refused by a capability flag")
            .build();

        let gateway_errors_total = meter
            .u64_counter("lifeboat_gateway_errors_total")
            .with_description("Gateway calls that returned an error")
            .build();

        Self {
            operations_total,
            capability_denials_total,
            gateway_errors_total,
        }
    }

    pub fn record_operation(&self, operation: &'static str) {
        self.operations_total
            .add(1, &[KeyValue::new("operation", operation)]);
    }

    pub fn record_denial(&self, operation: &'static str) {
        self.capability_denials_total
            .add(1, &[KeyValue::new("operation", operation)]);
    }

    pub fn record_gateway_error(&self, operation: &'static str) {
        self.gateway_errors_total
            .add(1, &[KeyValue::new("operation", operation)]);
    }
}

#[cfg(feature = "tracing")]
pub mod tracing_helpers {
    use tracing::Span;

    /// Span wrapping one model operation on `schema`.
    pub fn operation_span(operation: &'static str, schema: &str) -> Span {
        tracing::debug_span!("lifeboat.model", operation, schema)
    }
}
