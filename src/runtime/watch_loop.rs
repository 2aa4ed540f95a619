//! # Watch Loops
//!
//! One kube-runtime `Controller` per kind. kube-runtime keeps at most one
//! reconcile in flight per object; `max_concurrent_reconciliations` bounds
//! the workers per kind.

use super::error_policy::error_policy;
use super::initialization::Runtime;
use crate::controller::external::ExternalResource;
use crate::controller::provider_config::{self, usage_owner};
use crate::controller::reconciler::{reconcile, Context};
use crate::crd::{
    ApplicationSegment, ProviderConfig, ProviderConfigUsage, SegmentGroup, Server, ServerGroup,
};
use futures::StreamExt;
use kube::api::Api;
use kube_runtime::controller::{self, Controller};
use kube_runtime::watcher;
use std::sync::Arc;
use tracing::{debug, info, warn};

fn controller_config(ctx: &Context) -> controller::Config {
    controller::Config::default().concurrency(ctx.config.max_concurrent_reconciliations)
}

async fn run_managed<K: ExternalResource>(ctx: Arc<Context>) {
    let kind = K::kind(&());
    info!("Watching {} resources", kind);

    let api: Api<K> = Api::all(ctx.client.clone());
    Controller::new(api, watcher::Config::default())
        .with_config(controller_config(&ctx))
        .shutdown_on_signal()
        .run(reconcile::<K>, error_policy::<K>, ctx)
        .for_each(|result| {
            match result {
                Ok((object, action)) => debug!("Reconciled {}: {:?}", object, action),
                Err(e) => warn!("{} controller: {}", kind, e),
            }
            futures::future::ready(())
        })
        .await;

    info!("{} watch loop stopped", K::kind(&()));
}

async fn run_provider_configs(ctx: Arc<Context>) {
    info!("Watching ProviderConfig resources");

    let configs: Api<ProviderConfig> = Api::all(ctx.client.clone());
    let usages: Api<ProviderConfigUsage> = Api::all(ctx.client.clone());
    Controller::new(configs, watcher::Config::default())
        .watches(usages, watcher::Config::default(), usage_owner)
        .with_config(controller_config(&ctx))
        .shutdown_on_signal()
        .run(provider_config::reconcile, error_policy::<ProviderConfig>, ctx)
        .for_each(|result| {
            if let Err(e) = result {
                warn!("ProviderConfig controller: {}", e);
            }
            futures::future::ready(())
        })
        .await;

    info!("ProviderConfig watch loop stopped");
}

/// Run every controller until a shutdown signal arrives
pub async fn run_controllers(runtime: Runtime) {
    let ctx = runtime.context;
    runtime.server_state.mark_ready();

    tokio::join!(
        run_provider_configs(Arc::clone(&ctx)),
        run_managed::<SegmentGroup>(Arc::clone(&ctx)),
        run_managed::<ServerGroup>(Arc::clone(&ctx)),
        run_managed::<Server>(Arc::clone(&ctx)),
        run_managed::<ApplicationSegment>(ctx),
    );

    info!("All controllers stopped");
}
