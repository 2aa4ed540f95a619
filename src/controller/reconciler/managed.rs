//! # Managed Resource Reconcile
//!
//! One reconcile cycle for any kind implementing [`ExternalResource`].
//!
//! ## Flow
//!
//! 1. Add the managed finalizer (or run cleanup when the object is being deleted)
//! 2. Resolve references and persist them into `spec.forProvider`
//! 3. Connect with the referenced ProviderConfig
//! 4. Observe, then Create or Update when needed
//! 5. Persist the external name, late-initialized spec and status

use super::patch::ResourceWriter;
use super::types::{backoff_key, Context, ReconcileError};
use crate::config::ControllerConfig;
use crate::constants::MANAGED_FINALIZER;
use crate::controller::external::{connect, ExternalClient, ExternalResource};
use crate::crd::{Condition, DeletionPolicy, ManagedResource};
use crate::observability::metrics;
use kube::api::Api;
use kube::ResourceExt;
use kube_runtime::controller::Action;
use kube_runtime::finalizer::{finalizer, Error as FinalizerError, Event};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};

/// Reconcile entry point handed to `kube_runtime::Controller::run`
pub async fn reconcile<K: ExternalResource>(
    resource: Arc<K>,
    ctx: Arc<Context>,
) -> Result<Action, ReconcileError> {
    let start = Instant::now();
    let kind = K::kind(&());
    let name = resource.name_any();
    metrics::increment_reconciliations(&kind);

    let span = info_span!(
        "controller.reconcile",
        resource.kind = %kind,
        resource.name = %name,
        external_name = resource.external_name().unwrap_or_default()
    );

    let api: Api<K> = Api::all(ctx.client.clone());
    let timeout = ctx.config.reconcile_timeout();
    let (api_ref, ctx_ref) = (&api, &*ctx);
    let cycle = finalizer(&api, MANAGED_FINALIZER, resource, |event| async move {
        match event {
            Event::Apply(resource) => apply(resource, api_ref, ctx_ref).await,
            Event::Cleanup(resource) => cleanup(resource, api_ref, ctx_ref).await,
        }
    });

    let result = match tokio::time::timeout(timeout, cycle).instrument(span).await {
        Ok(Ok(action)) => Ok(action),
        Ok(Err(FinalizerError::ApplyFailed(e) | FinalizerError::CleanupFailed(e))) => Err(e),
        Ok(Err(e)) => Err(ReconcileError::Finalizer(e.to_string())),
        Err(_) => Err(ReconcileError::Timeout(timeout)),
    };

    metrics::observe_reconciliation_duration(&kind, start.elapsed().as_secs_f64());
    if result.is_ok() {
        ctx.reset_backoff(&backoff_key(&kind, &name));
    }
    result
}

async fn apply<K: ExternalResource>(
    resource: Arc<K>,
    api: &Api<K>,
    ctx: &Context,
) -> Result<Action, ReconcileError> {
    let mut desired = (*resource).clone();
    match sync(&*resource, &mut desired, api, ctx).await {
        Ok(action) => {
            desired.set_condition(Condition::reconcile_success());
            api.persist_status(&*resource, &desired).await?;
            Ok(action)
        }
        Err(e) => {
            desired.set_condition(Condition::reconcile_error(e.to_string()));
            if let Err(status_error) = api.persist_status(&*resource, &desired).await {
                warn!("Failed to record reconcile error in status: {}", status_error);
            }
            Err(e)
        }
    }
}

/// Resolve references, connect and converge; `desired` accumulates spec and status changes
async fn sync<K: ExternalResource>(
    original: &K,
    desired: &mut K,
    api: &Api<K>,
    ctx: &Context,
) -> Result<Action, ReconcileError> {
    if desired.resolve_references(&ctx.references).await? {
        api.persist_spec(original, desired).await?;
    }

    let external = connect(&ctx.credentials, &*desired).await?;
    converge(&external, original, desired, api, &ctx.config).await
}

/// Observe, then Create or Update when needed
async fn converge<K: ExternalResource, W: ResourceWriter<K>>(
    external: &ExternalClient<K>,
    original: &K,
    desired: &mut K,
    writer: &W,
    config: &ControllerConfig,
) -> Result<Action, ReconcileError> {
    let observation = external.observe(desired).await?;

    if observation.resource_late_initialized {
        debug!("Late-initialized {}", desired.name_any());
        writer.persist_spec(original, desired).await?;
    }

    if !observation.resource_exists {
        let creation = external.create(desired).await?;
        if creation.external_name_assigned {
            writer.persist_external_name(desired).await?;
        }
        // Observe the new object on the next cycle
        return Ok(Action::requeue(config.dependency_requeue()));
    }

    if !observation.resource_up_to_date {
        external.update(desired).await?;
    }

    Ok(Action::requeue(config.poll_interval()))
}

/// What deleting a managed resource requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cleanup {
    /// `deletionPolicy: Orphan` keeps the remote object
    Orphan,
    /// Nothing was ever created remotely
    NothingToDelete,
    DeleteRemote,
}

fn cleanup_plan<K: ManagedResource>(resource: &K) -> Cleanup {
    if resource.deletion_policy() == DeletionPolicy::Orphan {
        Cleanup::Orphan
    } else if resource.external_name().is_none() {
        Cleanup::NothingToDelete
    } else {
        Cleanup::DeleteRemote
    }
}

async fn cleanup<K: ExternalResource>(
    resource: Arc<K>,
    api: &Api<K>,
    ctx: &Context,
) -> Result<Action, ReconcileError> {
    match cleanup_plan(&*resource) {
        Cleanup::Orphan => {
            info!("Orphaning remote object of {} {}", K::kind(&()), resource.name_any());
            Ok(Action::await_change())
        }
        Cleanup::NothingToDelete => {
            debug!("{} has no external name, nothing to delete", resource.name_any());
            Ok(Action::await_change())
        }
        Cleanup::DeleteRemote => {
            let external = connect(&ctx.credentials, &*resource).await?;
            delete_remote(&external, &*resource, api).await
        }
    }
}

/// Delete the remote object and record the outcome in status
async fn delete_remote<K: ExternalResource, W: ResourceWriter<K>>(
    external: &ExternalClient<K>,
    original: &K,
    writer: &W,
) -> Result<Action, ReconcileError> {
    let mut desired = original.clone();
    let result = external.delete(&mut desired).await;
    if let Err(e) = &result {
        desired.set_condition(Condition::reconcile_error(e.to_string()));
    }
    if let Err(status_error) = writer.persist_status(original, &desired).await {
        warn!("Failed to record deletion status: {}", status_error);
    }
    result?;
    Ok(Action::await_change())
}
