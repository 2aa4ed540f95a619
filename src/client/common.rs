//! Operation tracking shared by the client calls.

use crate::client::ApiError;
use crate::observability::metrics;
use std::time::Instant;
use tracing::Span;

/// Records duration, outcome and metrics for one API call
pub(crate) struct OperationTracker {
    start: Instant,
    span: Span,
    collection: &'static str,
    operation: &'static str,
}

impl OperationTracker {
    pub(crate) fn new(span: Span, collection: &'static str, operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            span,
            collection,
            operation,
        }
    }

    pub(crate) fn record_success(&self) {
        let elapsed = self.start.elapsed();
        self.span.record("operation.success", true);
        self.span
            .record("operation.duration_ms", elapsed.as_millis() as u64);
        metrics::record_api_operation(self.collection, self.operation, elapsed.as_secs_f64());
    }

    pub(crate) fn record_error(&self, error: &ApiError) {
        let elapsed = self.start.elapsed();
        self.span.record("operation.success", false);
        self.span.record("error.message", error.to_string());
        if let Some(status) = error.status() {
            self.span.record("error.status", status);
        }
        self.span
            .record("operation.duration_ms", elapsed.as_millis() as u64);
        metrics::increment_api_operation_errors(self.collection, self.operation);
    }
}
