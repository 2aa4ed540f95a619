//! # Resource Patches
//!
//! Merge patches persisting what a reconcile learned about a managed resource.
//! Each write skips the API call when nothing changed.

use crate::constants::{EXTERNAL_NAME_ANNOTATION, FIELD_MANAGER};
use crate::crd::ManagedResource;
use async_trait::async_trait;
use kube::api::{Api, Patch, PatchParams};
use kube::ResourceExt;
use tracing::debug;

/// Persists spec, external name and status of a managed resource
#[async_trait]
pub trait ResourceWriter<K: ManagedResource>: Send + Sync {
    /// Persist `spec.forProvider` (late-initialized fields and resolved references)
    async fn persist_spec(&self, original: &K, desired: &K) -> Result<(), kube::Error>;

    /// Persist the external-name annotation right after Create
    async fn persist_external_name(&self, desired: &K) -> Result<(), kube::Error>;

    /// Persist `status.atProvider` and conditions
    async fn persist_status(&self, original: &K, desired: &K) -> Result<(), kube::Error>;
}

#[async_trait]
impl<K: ManagedResource> ResourceWriter<K> for Api<K> {
    async fn persist_spec(&self, original: &K, desired: &K) -> Result<(), kube::Error> {
        if original.for_provider() == desired.for_provider() {
            return Ok(());
        }
        let patch = serde_json::json!({
            "spec": {
                "forProvider": desired.for_provider()
            }
        });
        self.patch(
            &desired.name_any(),
            &PatchParams::apply(FIELD_MANAGER),
            &Patch::Merge(patch),
        )
        .await?;
        debug!("Persisted spec.forProvider of {}", desired.name_any());
        Ok(())
    }

    async fn persist_external_name(&self, desired: &K) -> Result<(), kube::Error> {
        let Some(external_name) = desired.external_name() else {
            return Ok(());
        };
        let mut annotations = serde_json::Map::new();
        annotations.insert(
            EXTERNAL_NAME_ANNOTATION.to_string(),
            serde_json::Value::from(external_name),
        );
        let patch = serde_json::json!({
            "metadata": {
                "annotations": annotations
            }
        });
        self.patch(
            &desired.name_any(),
            &PatchParams::apply(FIELD_MANAGER),
            &Patch::Merge(patch),
        )
        .await?;
        Ok(())
    }

    async fn persist_status(&self, original: &K, desired: &K) -> Result<(), kube::Error> {
        if original.managed_status() == desired.managed_status() {
            debug!("Skipping status update of {}: unchanged", desired.name_any());
            return Ok(());
        }
        let patch = serde_json::json!({
            "status": desired.managed_status()
        });
        self.patch_status(
            &desired.name_any(),
            &PatchParams::apply(FIELD_MANAGER),
            &Patch::Merge(patch),
        )
        .await?;
        Ok(())
    }
}
