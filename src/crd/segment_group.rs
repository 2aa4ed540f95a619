//! # SegmentGroup
//!
//! A named bucket of application segments that access policies refer to.

use crate::crd::common::{managed_resource, DeletionPolicy, ManagedStatus, ProviderConfigReference};
use crate::crd::Toggle;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// SegmentGroup custom resource
#[derive(CustomResource, Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "SegmentGroup",
    group = "zpa.crossplane.io",
    version = "v1alpha1",
    status = "SegmentGroupStatus",
    category = "crossplane",
    category = "managed",
    category = "zpa",
    printcolumn = r#"{"name":"READY", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}"#,
    printcolumn = r#"{"name":"SYNCED", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Synced\")].status"}"#,
    printcolumn = r#"{"name":"EXTERNAL-NAME", "type":"string", "jsonPath":".metadata.annotations.crossplane\\.io/external-name"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct SegmentGroupSpec {
    pub for_provider: SegmentGroupParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_config_ref: Option<ProviderConfigReference>,
    #[serde(default)]
    pub deletion_policy: DeletionPolicy,
}

/// Desired state of a SegmentGroup
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SegmentGroupParameters {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Toggle::is_unset")]
    #[schemars(with = "Option<bool>")]
    pub enabled: Toggle,
    /// DEFAULT or SIEM
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_space: Option<String>,
    #[serde(default, skip_serializing_if = "Toggle::is_unset")]
    #[schemars(with = "Option<bool>")]
    pub policy_migrated: Toggle,
    /// "0" or "1"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_keep_alive_enabled: Option<String>,
}

/// Observed state of a SegmentGroup
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SegmentGroupObservation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<String>,
    #[serde(default)]
    pub policy_migrated: bool,
}

pub type SegmentGroupStatus = ManagedStatus<SegmentGroupObservation>;

managed_resource!(SegmentGroup, SegmentGroupParameters, SegmentGroupObservation);
