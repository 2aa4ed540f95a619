//! # ApplicationSegment
//!
//! A set of domains and port ranges published through ZPA, bound to a segment
//! group and served by one or more server groups.

use crate::crd::common::{
    managed_resource, DeletionPolicy, ManagedStatus, ProviderConfigReference, Reference, Selector,
};
use crate::crd::Toggle;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// ApplicationSegment custom resource
///
/// # Example
///
/// ```yaml
/// apiVersion: zpa.crossplane.io/v1alpha1
/// kind: ApplicationSegment
/// metadata:
///   name: intranet
/// spec:
///   providerConfigRef:
///     name: default
///   forProvider:
///     name: intranet
///     domainNames: ["intranet.example.com"]
///     tcpPortRanges: ["443", "443"]
///     segmentGroupIDRef:
///       name: corp-apps
///     serverGroupRefs:
///       - name: prod-group
/// ```
#[derive(CustomResource, Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "ApplicationSegment",
    group = "zpa.crossplane.io",
    version = "v1alpha1",
    status = "ApplicationSegmentStatus",
    category = "crossplane",
    category = "managed",
    category = "zpa",
    printcolumn = r#"{"name":"READY", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}"#,
    printcolumn = r#"{"name":"SYNCED", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Synced\")].status"}"#,
    printcolumn = r#"{"name":"EXTERNAL-NAME", "type":"string", "jsonPath":".metadata.annotations.crossplane\\.io/external-name"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSegmentSpec {
    pub for_provider: ApplicationSegmentParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_config_ref: Option<ProviderConfigReference>,
    #[serde(default)]
    pub deletion_policy: DeletionPolicy,
}

/// Desired state of an ApplicationSegment
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSegmentParameters {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Toggle::is_unset")]
    #[schemars(with = "Option<bool>")]
    pub enabled: Toggle,
    /// ALWAYS, NEVER or ON_NET
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bypass_type: Option<String>,
    /// DEFAULT or SIEM
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_space: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_idle_timeout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_max_age: Option<String>,
    #[serde(default)]
    pub domain_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Toggle::is_unset")]
    #[schemars(with = "Option<bool>")]
    pub double_encrypt: Toggle,
    /// DEFAULT or NONE
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_type: Option<String>,
    /// NONE, ON_ACCESS or CONTINUOUS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_reporting: Option<String>,
    /// PING_TRACEROUTING, PING or NONE
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icmp_access_type: Option<String>,
    #[serde(default, skip_serializing_if = "Toggle::is_unset")]
    #[schemars(with = "Option<bool>")]
    pub ip_anchored: Toggle,
    #[serde(default, skip_serializing_if = "Toggle::is_unset")]
    #[schemars(with = "Option<bool>")]
    pub is_cname_enabled: Toggle,
    #[serde(default, skip_serializing_if = "Toggle::is_unset")]
    #[schemars(with = "Option<bool>")]
    pub passive_health_enabled: Toggle,
    /// Port ranges as flat start/end pairs, e.g. `["80", "80", "8000", "8080"]`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tcp_port_ranges: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub udp_port_ranges: Vec<String>,
    /// ID of the segment group this segment belongs to
    #[serde(
        rename = "segmentGroupID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub segment_group_id: Option<String>,
    #[serde(
        rename = "segmentGroupIDRef",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub segment_group_id_ref: Option<Reference>,
    #[serde(
        rename = "segmentGroupIDSelector",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub segment_group_id_selector: Option<Selector>,
    /// IDs of the server groups serving this segment
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub server_groups: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub server_group_refs: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_group_selector: Option<Selector>,
}

/// Observed state of an ApplicationSegment
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSegmentObservation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<String>,
    #[serde(
        rename = "segmentGroupID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub segment_group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub domain_names: Vec<String>,
    /// Server groups as the API reports them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub server_groups: Vec<ObservedServerGroup>,
}

/// A server group embedded in an observed ApplicationSegment
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObservedServerGroup {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

pub type ApplicationSegmentStatus = ManagedStatus<ApplicationSegmentObservation>;

managed_resource!(
    ApplicationSegment,
    ApplicationSegmentParameters,
    ApplicationSegmentObservation
);
