//! # External Clients
//!
//! The Observe, Create, Update and Delete contract against ZPA.
//!
//! [`ExternalClient`] implements the contract once for every kind; the
//! per-kind differences (payload, diff fields, late-init fields, reference
//! fields, delete quirks) live in each kind's [`ExternalResource`] impl.
//!
//! ```text
//! connect ─► observe ─┬─ exists=false ──────────► create (vanished: re-create)
//!                     ├─ exists, up to date ────► (nothing)
//!                     └─ exists, stale ─────────► update
//! deleted ─► delete (no external name: no remote call)
//! ```

mod application_segment;
mod segment_group;
mod server;
mod server_group;

use crate::client::{ApiError, RemoteObject, ZpaClient};
use crate::controller::credentials::{ConnectError, CredentialResolver};
use crate::controller::reference::{ReferenceError, ReferenceResolver};
use crate::crd::{Condition, ManagedResource, TypedReference};
use crate::observability::metrics;
use async_trait::async_trait;
use kube::{Resource, ResourceExt};
use std::marker::PhantomData;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ExternalError {
    #[error("ZPA API request failed: {0}")]
    Api(#[from] ApiError),
    #[error("refusing to create: resource already has external name {external_name}")]
    AlreadyExists { external_name: String },
    #[error("resource has no external name")]
    MissingExternalName,
    #[error("ZPA did not return an id for the created object")]
    MissingId,
}

/// Outcome of [`ExternalClient::observe`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExternalObservation {
    pub resource_exists: bool,
    pub resource_up_to_date: bool,
    pub resource_late_initialized: bool,
}

/// Outcome of [`ExternalClient::create`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExternalCreation {
    pub external_name_assigned: bool,
}

/// Per-kind strategy plugged into [`ExternalClient`]
#[async_trait]
pub trait ExternalResource: ManagedResource {
    /// Wire representation of this kind
    type Remote: RemoteObject + Clone + std::fmt::Debug;

    /// Delete with `forceDelete=true`
    const FORCE_DELETE: bool = false;

    /// Resolve reference and selector fields into `spec.forProvider`.
    ///
    /// Returns true when the desired spec changed.
    async fn resolve_references(&mut self, _resolver: &ReferenceResolver) -> Result<bool, ReferenceError> {
        Ok(false)
    }

    fn remote_id(remote: &Self::Remote) -> Option<&str>;

    fn observation(remote: &Self::Remote) -> Self::Observation;

    /// Fill unset desired fields from `remote`; true when something changed
    fn late_initialize(params: &mut Self::Parameters, remote: &Self::Remote) -> bool;

    fn is_up_to_date(params: &Self::Parameters, remote: &Self::Remote) -> bool;

    /// Full desired representation, resolving embedded object names as needed
    async fn payload(&self, client: &ZpaClient) -> Result<Self::Remote, ApiError>;

    /// Runs before the remote object with `id` is deleted
    async fn before_delete(&self, _client: &ZpaClient, _id: &str) -> Result<(), ApiError> {
        Ok(())
    }
}

/// Reference to `resource` as recorded in ProviderConfigUsage
pub fn typed_reference<K: Resource<DynamicType = ()>>(resource: &K) -> TypedReference {
    TypedReference {
        api_version: K::api_version(&()).to_string(),
        kind: K::kind(&()).to_string(),
        name: resource.name_any(),
        uid: resource.uid(),
    }
}

/// Authenticate against the ProviderConfig the resource points at
pub async fn connect<K: ExternalResource>(
    credentials: &CredentialResolver,
    resource: &K,
) -> Result<ExternalClient<K>, ConnectError> {
    let client = credentials
        .resolve(resource.provider_config_ref(), &typed_reference(resource))
        .await?;
    Ok(ExternalClient::new(client))
}

/// Lifecycle operations for one kind against one tenant
pub struct ExternalClient<K> {
    client: ZpaClient,
    _kind: PhantomData<fn() -> K>,
}

impl<K> std::fmt::Debug for ExternalClient<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExternalClient")
            .field("client", &self.client)
            .finish()
    }
}

impl<K: ExternalResource> ExternalClient<K> {
    pub fn new(client: ZpaClient) -> Self {
        Self {
            client,
            _kind: PhantomData,
        }
    }

    /// Describe the remote object and fold it into `resource`.
    ///
    /// On success `status.atProvider` is replaced, unset desired fields are
    /// late-initialized and `Ready` becomes `Available`. When the recorded
    /// external name no longer resolves it is dropped, so the next Create
    /// records the replacement id.
    pub async fn observe(&self, resource: &mut K) -> Result<ExternalObservation, ExternalError> {
        let Some(id) = resource.external_name().map(str::to_string) else {
            return Ok(ExternalObservation::default());
        };

        let remote: K::Remote = match self.client.get(&id).await {
            Ok(remote) => remote,
            Err(e) if e.is_not_found() => {
                debug!("{} {} no longer exists in ZPA", K::kind(&()), id);
                resource.clear_external_name();
                return Ok(ExternalObservation::default());
            }
            Err(e) => return Err(e.into()),
        };

        resource.set_at_provider(K::observation(&remote));
        let late_initialized = K::late_initialize(resource.for_provider_mut(), &remote);
        let up_to_date = K::is_up_to_date(resource.for_provider(), &remote);
        resource.set_condition(Condition::available());

        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: up_to_date,
            resource_late_initialized: late_initialized,
        })
    }

    /// Create the remote object and record its id as the external name
    pub async fn create(&self, resource: &mut K) -> Result<ExternalCreation, ExternalError> {
        if let Some(existing) = resource.external_name() {
            return Err(ExternalError::AlreadyExists {
                external_name: existing.to_string(),
            });
        }

        resource.set_condition(Condition::creating());
        let payload = resource.payload(&self.client).await?;
        let created = self.client.add(&payload).await?;
        let id = K::remote_id(&created)
            .filter(|id| !id.is_empty())
            .ok_or(ExternalError::MissingId)?
            .to_string();
        metrics::increment_external_actions(&K::kind(&()), "create");
        info!("Created {} {} with id {}", K::kind(&()), resource.name_any(), id);

        resource.set_external_name(&id);
        Ok(ExternalCreation {
            external_name_assigned: true,
        })
    }

    /// Replace the remote object with the full desired representation
    pub async fn update(&self, resource: &K) -> Result<(), ExternalError> {
        let id = resource
            .external_name()
            .ok_or(ExternalError::MissingExternalName)?;
        let payload = resource.payload(&self.client).await?;
        self.client.update(id, &payload).await?;
        metrics::increment_external_actions(&K::kind(&()), "update");
        info!("Updated {} {} ({})", K::kind(&()), resource.name_any(), id);
        Ok(())
    }

    /// Delete the remote object; succeeds without a call when there is nothing to delete
    pub async fn delete(&self, resource: &mut K) -> Result<(), ExternalError> {
        resource.set_condition(Condition::deleting());
        let Some(id) = resource.external_name().map(str::to_string) else {
            return Ok(());
        };

        let result = match resource.before_delete(&self.client, &id).await {
            Ok(()) => self.client.delete::<K::Remote>(&id, K::FORCE_DELETE).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                metrics::increment_external_actions(&K::kind(&()), "delete");
                info!("Deleted {} {} ({})", K::kind(&()), resource.name_any(), id);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                debug!("{} {} was already gone", K::kind(&()), id);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
