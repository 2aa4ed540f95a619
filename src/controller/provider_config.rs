//! # ProviderConfig Controller
//!
//! Counts the ProviderConfigUsage records pointing at each ProviderConfig,
//! publishes the count in `status.users` and holds the in-use finalizer until
//! no managed resource depends on the config anymore.

use crate::constants::{FIELD_MANAGER, PROVIDER_CONFIG_FINALIZER, PROVIDER_CONFIG_LABEL};
use crate::controller::reconciler::{backoff_key, Context, ReconcileError};
use crate::crd::{ProviderConfig, ProviderConfigUsage};
use crate::observability::metrics;
use kube::api::{Api, ListParams, Patch, PatchParams};
use kube::ResourceExt;
use kube_runtime::controller::Action;
use kube_runtime::finalizer::{finalizer, Error as FinalizerError, Event};
use kube_runtime::reflector::ObjectRef;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, Instrument};

const KIND: &str = "ProviderConfig";

/// Label selector listing the usages of `provider_config`
pub fn usage_selector(provider_config: &str) -> String {
    format!("{PROVIDER_CONFIG_LABEL}={provider_config}")
}

/// Maps a usage event to the ProviderConfig it tracks
pub fn usage_owner(usage: ProviderConfigUsage) -> Option<ObjectRef<ProviderConfig>> {
    let name = usage
        .labels()
        .get(PROVIDER_CONFIG_LABEL)
        .cloned()
        .unwrap_or(usage.spec.provider_config_ref.name);
    (!name.is_empty()).then(|| ObjectRef::new(&name))
}

/// Deletion may only proceed once nothing uses the config
fn ensure_released(name: &str, users: usize) -> Result<(), ReconcileError> {
    if users > 0 {
        return Err(ReconcileError::ProviderConfigInUse {
            name: name.to_string(),
            users,
        });
    }
    Ok(())
}

async fn count_users(ctx: &Context, name: &str) -> Result<usize, ReconcileError> {
    let usages: Api<ProviderConfigUsage> = Api::all(ctx.client.clone());
    let list = usages
        .list(&ListParams::default().labels(&usage_selector(name)))
        .await?;
    Ok(list.items.len())
}

pub async fn reconcile(
    config: Arc<ProviderConfig>,
    ctx: Arc<Context>,
) -> Result<Action, ReconcileError> {
    let start = Instant::now();
    let name = config.name_any();
    metrics::increment_reconciliations(KIND);
    let span = info_span!("controller.reconcile", resource.kind = KIND, resource.name = %name);

    let api: Api<ProviderConfig> = Api::all(ctx.client.clone());
    let (api_ref, ctx_ref) = (&api, &*ctx);
    let result = finalizer(&api, PROVIDER_CONFIG_FINALIZER, config, |event| async move {
        match event {
            Event::Apply(config) => publish_users(&config, api_ref, ctx_ref).await,
            Event::Cleanup(config) => release(&config, ctx_ref).await,
        }
    })
    .instrument(span)
    .await
    .map_err(|e| match e {
        FinalizerError::ApplyFailed(e) | FinalizerError::CleanupFailed(e) => e,
        other => ReconcileError::Finalizer(other.to_string()),
    });

    metrics::observe_reconciliation_duration(KIND, start.elapsed().as_secs_f64());
    if result.is_ok() {
        ctx.reset_backoff(&backoff_key(KIND, &name));
    }
    result
}

async fn publish_users(
    config: &ProviderConfig,
    api: &Api<ProviderConfig>,
    ctx: &Context,
) -> Result<Action, ReconcileError> {
    let name = config.name_any();
    let users = count_users(ctx, &name).await?;
    let users = i64::try_from(users).unwrap_or(i64::MAX);
    metrics::set_provider_config_users(&name, users);

    let current = config.status.as_ref().map(|status| status.users);
    if current != Some(users) {
        let patch = serde_json::json!({ "status": { "users": users } });
        api.patch_status(&name, &PatchParams::apply(FIELD_MANAGER), &Patch::Merge(patch))
            .await?;
        debug!("ProviderConfig {} now has {} users", name, users);
    }
    Ok(Action::requeue(ctx.config.poll_interval()))
}

async fn release(config: &ProviderConfig, ctx: &Context) -> Result<Action, ReconcileError> {
    let name = config.name_any();
    let users = count_users(ctx, &name).await?;
    ensure_released(&name, users)?;
    metrics::set_provider_config_users(&name, 0);
    info!("Released ProviderConfig {}", name);
    Ok(Action::await_change())
}
