//! # Wire Models
//!
//! JSON bodies exchanged with the ZPA management API.
//!
//! Each model names the collection it lives under via [`RemoteObject`], so the
//! client can build paths generically.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A ZPA object stored under `/customers/{customerId}/{COLLECTION}`
pub trait RemoteObject: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;
}

/// `{id, name}` pair used wherever ZPA embeds another object
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedReference {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Fields the API assigns to every object
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<String>,
}

/// `/server`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationServer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_space: Option<String>,
    /// Always sent, an empty list detaches the server from every group
    #[serde(default)]
    pub app_server_group_ids: Vec<String>,
    #[serde(flatten)]
    pub audit: Audit,
}

impl RemoteObject for ApplicationServer {
    const COLLECTION: &'static str = "server";
}

/// `/serverGroup`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerGroupResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub ip_anchored: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_space: Option<String>,
    #[serde(default)]
    pub dynamic_discovery: bool,
    #[serde(default)]
    pub app_connector_groups: Vec<NamedReference>,
    #[serde(flatten)]
    pub audit: Audit,
}

impl RemoteObject for ServerGroupResource {
    const COLLECTION: &'static str = "serverGroup";
}

/// `/segmentGroup`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentGroupResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_space: Option<String>,
    #[serde(default)]
    pub policy_migrated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_keep_alive_enabled: Option<String>,
    #[serde(flatten)]
    pub audit: Audit,
}

impl RemoteObject for SegmentGroupResource {
    const COLLECTION: &'static str = "segmentGroup";
}

/// `/application`, the API's name for an application segment
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bypass_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_space: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_idle_timeout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_max_age: Option<String>,
    #[serde(default)]
    pub domain_names: Vec<String>,
    #[serde(default)]
    pub double_encrypt: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_reporting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icmp_access_type: Option<String>,
    #[serde(default)]
    pub ip_anchored: bool,
    #[serde(default)]
    pub is_cname_enabled: bool,
    #[serde(default)]
    pub passive_health_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_group_id: Option<String>,
    #[serde(default)]
    pub tcp_port_ranges: Vec<String>,
    #[serde(default)]
    pub udp_port_ranges: Vec<String>,
    #[serde(default)]
    pub server_groups: Vec<NamedReference>,
    #[serde(flatten)]
    pub audit: Audit,
}

impl RemoteObject for ApplicationResource {
    const COLLECTION: &'static str = "application";
}

/// `/appConnectorGroup`, only read to resolve names
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConnectorGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

impl RemoteObject for AppConnectorGroup {
    const COLLECTION: &'static str = "appConnectorGroup";
}

/// Body of a successful `POST /signin`
#[derive(Debug, Clone, Deserialize)]
pub struct SigninResponse {
    #[serde(default)]
    pub access_token: String,
}
