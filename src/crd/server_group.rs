//! # ServerGroup
//!
//! A group of application servers bound to one or more app connector groups.

use crate::crd::common::{managed_resource, DeletionPolicy, ManagedStatus, ProviderConfigReference};
use crate::crd::Toggle;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// ServerGroup custom resource
#[derive(CustomResource, Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "ServerGroup",
    group = "zpa.crossplane.io",
    version = "v1alpha1",
    status = "ServerGroupStatus",
    category = "crossplane",
    category = "managed",
    category = "zpa",
    printcolumn = r#"{"name":"READY", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}"#,
    printcolumn = r#"{"name":"SYNCED", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Synced\")].status"}"#,
    printcolumn = r#"{"name":"EXTERNAL-NAME", "type":"string", "jsonPath":".metadata.annotations.crossplane\\.io/external-name"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ServerGroupSpec {
    pub for_provider: ServerGroupParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_config_ref: Option<ProviderConfigReference>,
    #[serde(default)]
    pub deletion_policy: DeletionPolicy,
}

/// Desired state of a ServerGroup
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServerGroupParameters {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Toggle::is_unset")]
    #[schemars(with = "Option<bool>")]
    pub enabled: Toggle,
    #[serde(default, skip_serializing_if = "Toggle::is_unset")]
    #[schemars(with = "Option<bool>")]
    pub ip_anchored: Toggle,
    /// DEFAULT or SIEM
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_space: Option<String>,
    /// Discover servers from the connectors instead of listing them explicitly
    #[serde(default, skip_serializing_if = "Toggle::is_unset")]
    #[schemars(with = "Option<bool>")]
    pub dynamic_discovery: Toggle,
    /// IDs of the app connector groups serving this group
    #[serde(default)]
    pub app_connector_groups: Vec<String>,
}

/// Observed state of a ServerGroup
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServerGroupObservation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<String>,
}

pub type ServerGroupStatus = ManagedStatus<ServerGroupObservation>;

managed_resource!(ServerGroup, ServerGroupParameters, ServerGroupObservation);
