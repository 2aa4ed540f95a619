//! # ZPA Provider
//!
//! A Kubernetes controller that keeps Zscaler Private Access (ZPA) resources in
//! line with the custom resources declaring them.
//!
//! ## Overview
//!
//! 1. **Watching managed resources** - `Server`, `ServerGroup`, `SegmentGroup`
//!    and `ApplicationSegment`, all cluster-scoped
//! 2. **Connecting** - each reconcile reads its `ProviderConfig`, the credential
//!    secrets, and exchanges them for a short-lived API token
//! 3. **Observe, then act** - describe the remote object, adopt remote defaults,
//!    diff, and create, update or delete as needed
//! 4. **Usage tracking** - a `ProviderConfig` cannot be deleted while resources use it
//!
//! Metrics and probes are served on `--metrics-port`.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use zpa_provider::config::ControllerConfig;
use zpa_provider::runtime::{self, initialization};

/// Command line flags; each one overrides the matching environment variable
#[derive(Debug, Parser)]
#[command(name = "zpa-provider", version, about = "ZPA provider controller")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    debug: bool,

    /// Interval between observations of a resource that is in sync (seconds)
    #[arg(long)]
    poll_interval: Option<u64>,

    /// Upper bound for one reconcile cycle (seconds)
    #[arg(long)]
    reconcile_timeout: Option<u64>,

    /// Timeout for a single ZPA API call (seconds)
    #[arg(long)]
    http_timeout: Option<u64>,

    /// Maximum concurrent reconciliations per resource kind
    #[arg(long)]
    max_reconcile_rate: Option<u16>,

    /// Port for /metrics, /healthz and /readyz
    #[arg(long)]
    metrics_port: Option<u16>,

    /// Log format: json or text
    #[arg(long)]
    log_format: Option<String>,
}

impl Cli {
    fn apply(self, mut config: ControllerConfig) -> ControllerConfig {
        if let Some(secs) = self.poll_interval {
            config.poll_interval_secs = secs;
        }
        if let Some(secs) = self.reconcile_timeout {
            config.reconcile_timeout_secs = secs;
        }
        if let Some(secs) = self.http_timeout {
            config.http_timeout_secs = secs;
        }
        if let Some(rate) = self.max_reconcile_rate {
            config.max_concurrent_reconciliations = rate;
        }
        if let Some(port) = self.metrics_port {
            config.metrics_port = port;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before anything touches TLS
    initialization::install_crypto_provider();

    let cli = Cli::parse();
    let level = if cli.debug { "debug" } else { "info" };
    let config = cli.apply(ControllerConfig::from_env());
    initialization::init_tracing(&config, level);

    info!(
        "Starting ZPA provider {} ({}, built {})",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_GIT_HASH"),
        env!("BUILD_DATETIME")
    );

    let runtime = runtime::initialize(config).await?;
    runtime::run_controllers(runtime).await;

    info!("Controller stopped");
    Ok(())
}
