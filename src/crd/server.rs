//! # Server
//!
//! An application server (FQDN or IP address) that ZPA connectors forward traffic to.

use crate::crd::common::{
    managed_resource, DeletionPolicy, ManagedStatus, ProviderConfigReference, Reference, Selector,
};
use crate::crd::Toggle;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// Server custom resource
///
/// # Example
///
/// ```yaml
/// apiVersion: zpa.crossplane.io/v1alpha1
/// kind: Server
/// metadata:
///   name: web-01
/// spec:
///   providerConfigRef:
///     name: default
///   forProvider:
///     name: web-01
///     address: 10.0.0.12
///     enabled: true
///     serverGroupSelector:
///       matchLabels:
///         app: web
/// ```
#[derive(CustomResource, Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "Server",
    group = "zpa.crossplane.io",
    version = "v1alpha1",
    status = "ServerStatus",
    category = "crossplane",
    category = "managed",
    category = "zpa",
    printcolumn = r#"{"name":"READY", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}"#,
    printcolumn = r#"{"name":"SYNCED", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Synced\")].status"}"#,
    printcolumn = r#"{"name":"EXTERNAL-NAME", "type":"string", "jsonPath":".metadata.annotations.crossplane\\.io/external-name"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ServerSpec {
    pub for_provider: ServerParameters,
    /// ProviderConfig supplying credentials for this resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_config_ref: Option<ProviderConfigReference>,
    #[serde(default)]
    pub deletion_policy: DeletionPolicy,
}

/// Desired state of a Server
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServerParameters {
    /// Name of the server in ZPA
    pub name: String,
    /// Domain name or IP address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Toggle::is_unset")]
    #[schemars(with = "Option<bool>")]
    pub enabled: Toggle,
    /// DEFAULT or SIEM
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_space: Option<String>,
    /// IDs of the server groups this server belongs to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub server_groups: Vec<String>,
    /// ServerGroup resources resolved into `serverGroups`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub server_group_refs: Vec<Reference>,
    /// Selects ServerGroup resources resolved into `serverGroups`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_group_selector: Option<Selector>,
}

/// Observed state of a Server
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServerObservation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<String>,
}

pub type ServerStatus = ManagedStatus<ServerObservation>;

managed_resource!(Server, ServerParameters, ServerObservation);
