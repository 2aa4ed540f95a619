//! # Metrics
//!
//! Prometheus metrics for monitoring the provider.
//!
//! ## Metrics Exposed
//!
//! - `zpa_provider_reconciliations_total{kind}` - Total number of reconciliations
//! - `zpa_provider_reconciliation_errors_total{kind,class}` - Reconciliation errors by error class
//! - `zpa_provider_reconciliation_duration_seconds{kind}` - Duration of reconciliations
//! - `zpa_provider_external_actions_total{kind,action}` - Create/update/delete calls issued
//! - `zpa_provider_api_operations_total{collection,operation}` - ZPA API calls
//! - `zpa_provider_api_operation_errors_total{collection,operation}` - Failed ZPA API calls
//! - `zpa_provider_api_operation_duration_seconds{collection,operation}` - Duration of ZPA API calls
//! - `zpa_provider_token_exchanges_total{outcome}` - `/signin` exchanges
//! - `zpa_provider_requeues_total{reason}` - Requeues by reason
//! - `zpa_provider_provider_config_users{provider_config}` - Resources using each ProviderConfig

use anyhow::Result;
use prometheus::{GaugeVec, HistogramVec, IntCounterVec, Registry};
use std::sync::LazyLock;

pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static RECONCILIATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "zpa_provider_reconciliations_total",
            "Total number of reconciliations",
        ),
        &["kind"],
    )
    .expect("Failed to create RECONCILIATIONS_TOTAL metric - this should never happen")
});

static RECONCILIATION_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "zpa_provider_reconciliation_errors_total",
            "Total number of reconciliation errors by error class",
        ),
        &["kind", "class"],
    )
    .expect("Failed to create RECONCILIATION_ERRORS_TOTAL metric - this should never happen")
});

static RECONCILIATION_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "zpa_provider_reconciliation_duration_seconds",
            "Duration of reconciliation in seconds",
        )
        .buckets(vec![0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0]),
        &["kind"],
    )
    .expect("Failed to create RECONCILIATION_DURATION metric - this should never happen")
});

static EXTERNAL_ACTIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "zpa_provider_external_actions_total",
            "Total number of create, update and delete actions issued against ZPA",
        ),
        &["kind", "action"],
    )
    .expect("Failed to create EXTERNAL_ACTIONS_TOTAL metric - this should never happen")
});

static API_OPERATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "zpa_provider_api_operations_total",
            "Total number of successful ZPA API operations",
        ),
        &["collection", "operation"],
    )
    .expect("Failed to create API_OPERATIONS_TOTAL metric - this should never happen")
});

static API_OPERATION_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "zpa_provider_api_operation_errors_total",
            "Total number of failed ZPA API operations",
        ),
        &["collection", "operation"],
    )
    .expect("Failed to create API_OPERATION_ERRORS_TOTAL metric - this should never happen")
});

static API_OPERATION_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "zpa_provider_api_operation_duration_seconds",
            "Duration of ZPA API operations in seconds",
        )
        .buckets(vec![0.05, 0.1, 0.5, 1.0, 2.0, 5.0]),
        &["collection", "operation"],
    )
    .expect("Failed to create API_OPERATION_DURATION metric - this should never happen")
});

static TOKEN_EXCHANGES_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "zpa_provider_token_exchanges_total",
            "Total number of client credential exchanges against /signin",
        ),
        &["outcome"],
    )
    .expect("Failed to create TOKEN_EXCHANGES_TOTAL metric - this should never happen")
});

static REQUEUES_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new("zpa_provider_requeues_total", "Total number of requeues by reason"),
        &["reason"],
    )
    .expect("Failed to create REQUEUES_TOTAL metric - this should never happen")
});

static PROVIDER_CONFIG_USERS: LazyLock<GaugeVec> = LazyLock::new(|| {
    GaugeVec::new(
        prometheus::Opts::new(
            "zpa_provider_provider_config_users",
            "Number of managed resources using each ProviderConfig",
        ),
        &["provider_config"],
    )
    .expect("Failed to create PROVIDER_CONFIG_USERS metric - this should never happen")
});

pub fn register_metrics() -> Result<()> {
    REGISTRY.register(Box::new(RECONCILIATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RECONCILIATION_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RECONCILIATION_DURATION.clone()))?;
    REGISTRY.register(Box::new(EXTERNAL_ACTIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(API_OPERATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(API_OPERATION_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(API_OPERATION_DURATION.clone()))?;
    REGISTRY.register(Box::new(TOKEN_EXCHANGES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(REQUEUES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(PROVIDER_CONFIG_USERS.clone()))?;
    Ok(())
}

pub fn increment_reconciliations(kind: &str) {
    RECONCILIATIONS_TOTAL.with_label_values(&[kind]).inc();
}

pub fn increment_reconciliation_errors(kind: &str, class: &str) {
    RECONCILIATION_ERRORS_TOTAL
        .with_label_values(&[kind, class])
        .inc();
}

pub fn observe_reconciliation_duration(kind: &str, duration: f64) {
    RECONCILIATION_DURATION
        .with_label_values(&[kind])
        .observe(duration);
}

pub fn increment_external_actions(kind: &str, action: &str) {
    EXTERNAL_ACTIONS_TOTAL
        .with_label_values(&[kind, action])
        .inc();
}

pub fn record_api_operation(collection: &str, operation: &str, duration: f64) {
    API_OPERATIONS_TOTAL
        .with_label_values(&[collection, operation])
        .inc();
    API_OPERATION_DURATION
        .with_label_values(&[collection, operation])
        .observe(duration);
}

pub fn increment_api_operation_errors(collection: &str, operation: &str) {
    API_OPERATION_ERRORS_TOTAL
        .with_label_values(&[collection, operation])
        .inc();
}

pub fn increment_token_exchanges(outcome: &str) {
    TOKEN_EXCHANGES_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn increment_requeues_total(reason: &str) {
    REQUEUES_TOTAL.with_label_values(&[reason]).inc();
}

pub fn set_provider_config_users(provider_config: &str, users: i64) {
    PROVIDER_CONFIG_USERS
        .with_label_values(&[provider_config])
        .set(users as f64);
}
