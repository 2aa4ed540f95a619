//! # Kubernetes Store
//!
//! [`ConfigStore`] and [`ReferenceReader`] backed by the Kubernetes API.

use crate::constants::{FIELD_MANAGER, PROVIDER_CONFIG_LABEL};
use crate::controller::credentials::{ConfigStore, StoreError};
use crate::controller::reference::{Candidate, ReferenceReader, TargetKind};
use crate::crd::{
    ManagedResource, ProviderConfig, ProviderConfigReference, ProviderConfigUsage,
    ProviderConfigUsageSpec, SegmentGroup, ServerGroup, TypedReference,
};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::api::{Api, ListParams, Patch, PatchParams};
use kube::{Client, ResourceExt};
use std::collections::BTreeMap;
use tracing::debug;

/// Name of the usage record for `resource`, one per managed resource
pub fn usage_name(resource: &TypedReference) -> String {
    match resource.uid.as_deref() {
        Some(uid) if !uid.is_empty() => uid.to_string(),
        _ => format!("{}-{}", resource.kind.to_lowercase(), resource.name),
    }
}

#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl KubeStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn candidate<K: ManagedResource>(&self, name: &str) -> Result<Option<Candidate>, StoreError> {
        let api: Api<K> = Api::all(self.client.clone());
        Ok(api.get_opt(name).await?.map(|object| to_candidate(&object)))
    }

    async fn candidates<K: ManagedResource>(&self) -> Result<Vec<Candidate>, StoreError> {
        let api: Api<K> = Api::all(self.client.clone());
        let list = api.list(&ListParams::default()).await?;
        Ok(list.items.iter().map(to_candidate).collect())
    }
}

fn to_candidate<K: ManagedResource>(object: &K) -> Candidate {
    Candidate {
        name: object.name_any(),
        labels: object.labels().clone(),
        external_name: object.external_name().map(str::to_string),
    }
}

#[async_trait]
impl ConfigStore for KubeStore {
    async fn provider_config(&self, name: &str) -> Result<Option<ProviderConfig>, StoreError> {
        let api: Api<ProviderConfig> = Api::all(self.client.clone());
        Ok(api.get_opt(name).await?)
    }

    async fn secret(&self, namespace: &str, name: &str) -> Result<Option<Secret>, StoreError> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.get_opt(name).await?)
    }

    async fn track_usage(
        &self,
        provider_config: &str,
        resource: &TypedReference,
    ) -> Result<(), StoreError> {
        let name = usage_name(resource);
        let mut usage = ProviderConfigUsage::new(
            &name,
            ProviderConfigUsageSpec {
                provider_config_ref: ProviderConfigReference {
                    name: provider_config.to_string(),
                },
                resource_ref: resource.clone(),
            },
        );
        usage.metadata.labels = Some(BTreeMap::from([(
            PROVIDER_CONFIG_LABEL.to_string(),
            provider_config.to_string(),
        )]));
        // Garbage collected together with the managed resource
        usage.metadata.owner_references = resource.uid.as_ref().map(|uid| {
            vec![OwnerReference {
                api_version: resource.api_version.clone(),
                kind: resource.kind.clone(),
                name: resource.name.clone(),
                uid: uid.clone(),
                ..Default::default()
            }]
        });

        let api: Api<ProviderConfigUsage> = Api::all(self.client.clone());
        api.patch(
            &name,
            &PatchParams::apply(FIELD_MANAGER).force(),
            &Patch::Apply(&usage),
        )
        .await?;
        debug!(
            "Tracked {} {} as user of ProviderConfig {}",
            resource.kind, resource.name, provider_config
        );
        Ok(())
    }
}

#[async_trait]
impl ReferenceReader for KubeStore {
    async fn get(&self, kind: TargetKind, name: &str) -> Result<Option<Candidate>, StoreError> {
        match kind {
            TargetKind::ServerGroup => self.candidate::<ServerGroup>(name).await,
            TargetKind::SegmentGroup => self.candidate::<SegmentGroup>(name).await,
        }
    }

    async fn list(&self, kind: TargetKind) -> Result<Vec<Candidate>, StoreError> {
        match kind {
            TargetKind::ServerGroup => self.candidates::<ServerGroup>().await,
            TargetKind::SegmentGroup => self.candidates::<SegmentGroup>().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_named_after_uid() {
        let reference = TypedReference {
            api_version: "zpa.crossplane.io/v1alpha1".to_string(),
            kind: "Server".to_string(),
            name: "web-01".to_string(),
            uid: Some("0b6f4c1e-1d7a-4d5e-9a57-55a3c3f3e0a1".to_string()),
        };
        assert_eq!(usage_name(&reference), "0b6f4c1e-1d7a-4d5e-9a57-55a3c3f3e0a1");
    }

    #[test]
    fn test_usage_name_without_uid() {
        let reference = TypedReference {
            api_version: "zpa.crossplane.io/v1alpha1".to_string(),
            kind: "ServerGroup".to_string(),
            name: "prod-group".to_string(),
            uid: None,
        };
        assert_eq!(usage_name(&reference), "servergroup-prod-group");
    }
}
