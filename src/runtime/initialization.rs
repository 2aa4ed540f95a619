//! # Initialization
//!
//! Everything the controller needs before its watch loops start.

use crate::config::ControllerConfig;
use crate::controller::credentials::{ConfigStore, CredentialResolver, HttpTokenSource};
use crate::controller::reconciler::Context;
use crate::controller::reference::ReferenceResolver;
use crate::controller::server::{start_server, ServerState};
use crate::controller::store::KubeStore;
use crate::observability::metrics;
use anyhow::{Context as _, Result};
use kube::Client;
use std::sync::Arc;
use tracing::{error, info};

/// Shared state handed to the watch loops
#[derive(Debug)]
pub struct Runtime {
    pub context: Arc<Context>,
    pub server_state: Arc<ServerState>,
}

/// Install the process-wide rustls crypto provider.
///
/// Both `kube` and `reqwest` use rustls; exactly one provider must be chosen.
pub fn install_crypto_provider() {
    // Already installed is fine
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Set up `tracing` output. `RUST_LOG` wins over `default_level`.
pub fn init_tracing(config: &ControllerConfig, default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("zpa_provider={default_level},kube=warn").into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.json_logs() {
        builder.json().with_current_span(true).init();
    } else {
        builder.init();
    }
}

/// Build the reconcile context and start the metrics/probe server.
///
/// Logging must already be initialized.
pub async fn initialize(config: ControllerConfig) -> Result<Runtime> {
    metrics::register_metrics().context("Failed to register metrics")?;

    let server_state = Arc::new(ServerState::default());
    let port = config.metrics_port;
    let state = Arc::clone(&server_state);
    tokio::spawn(async move {
        if let Err(e) = start_server(port, state).await {
            error!("HTTP server error: {}", e);
        }
    });

    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;

    let http_client = reqwest::Client::builder()
        .timeout(config.http_timeout())
        .user_agent(concat!("zpa-provider/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let store = Arc::new(KubeStore::new(client.clone()));
    let config_store: Arc<dyn ConfigStore> = store.clone();
    let credentials = CredentialResolver::new(
        config_store,
        Arc::new(HttpTokenSource::new(http_client.clone())),
        http_client,
    );
    let references = ReferenceResolver::new(store);

    info!(
        poll_interval_secs = config.poll_interval_secs,
        reconcile_timeout_secs = config.reconcile_timeout_secs,
        max_concurrent_reconciliations = config.max_concurrent_reconciliations,
        "Controller initialized"
    );

    Ok(Runtime {
        context: Arc::new(Context::new(client, credentials, references, config)),
        server_state,
    })
}
