//! # ProviderConfig
//!
//! Credentials and endpoint for a ZPA tenant, plus the usage records that keep a
//! ProviderConfig alive while managed resources depend on it.

use crate::crd::common::{Condition, ProviderConfigReference};
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// ZPA tenant connection settings
///
/// # Example
///
/// ```yaml
/// apiVersion: zpa.crossplane.io/v1alpha1
/// kind: ProviderConfig
/// metadata:
///   name: default
/// spec:
///   host: config.private.zscaler.com
///   customerID: "216196257331281920"
///   clientID:
///     source: Secret
///     secretRef:
///       namespace: crossplane-system
///       name: zpa-credentials
///       key: clientID
///   clientSecret:
///     source: Secret
///     secretRef:
///       namespace: crossplane-system
///       name: zpa-credentials
///       key: clientSecret
/// ```
#[derive(CustomResource, Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "ProviderConfig",
    group = "zpa.crossplane.io",
    version = "v1alpha1",
    status = "ProviderConfigStatus",
    category = "crossplane",
    category = "provider",
    category = "zpa",
    printcolumn = r#"{"name":"USERS", "type":"integer", "jsonPath":".status.users"}"#,
    printcolumn = r#"{"name":"AGE", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfigSpec {
    /// ZPA API host, e.g. `config.private.zscaler.com`.
    /// A leading `http://` or `https://` is honoured; otherwise HTTPS is used.
    pub host: String,
    /// Base path of the management API on the host (defaults to `/`)
    #[serde(default)]
    pub basepath: Option<String>,
    /// Unique identifier of the ZPA tenant
    #[serde(rename = "customerID")]
    pub customer_id: String,
    /// Where to read the API client identifier from
    #[serde(rename = "clientID")]
    pub client_id: CredentialSelector,
    /// Where to read the API client secret from
    pub client_secret: CredentialSelector,
}

/// Source of one credential value
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSelector {
    /// Credential source; only `Secret` is supported
    pub source: CredentialsSource,
    /// Secret key holding the value when `source` is `Secret`
    #[serde(default)]
    pub secret_ref: Option<SecretKeySelector>,
}

/// Credential sources understood by Crossplane providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
pub enum CredentialsSource {
    None,
    Secret,
    InjectedIdentity,
    Environment,
    Filesystem,
}

impl std::fmt::Display for CredentialsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::None => "None",
            Self::Secret => "Secret",
            Self::InjectedIdentity => "InjectedIdentity",
            Self::Environment => "Environment",
            Self::Filesystem => "Filesystem",
        };
        f.write_str(name)
    }
}

/// A key within a namespaced Kubernetes Secret
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretKeySelector {
    pub namespace: String,
    pub name: String,
    pub key: String,
}

/// Status of a ProviderConfig
#[derive(Debug, Clone, Default, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfigStatus {
    /// Number of managed resources currently using this ProviderConfig
    #[serde(default)]
    pub users: i64,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// Records that a managed resource uses a ProviderConfig.
///
/// Named after the UID of the managed resource and labelled with the
/// ProviderConfig name so usages can be listed per config.
#[derive(CustomResource, Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "ProviderConfigUsage",
    group = "zpa.crossplane.io",
    version = "v1alpha1",
    category = "crossplane",
    category = "provider",
    category = "zpa",
    printcolumn = r#"{"name":"CONFIG-NAME", "type":"string", "jsonPath":".spec.providerConfigRef.name"}"#,
    printcolumn = r#"{"name":"RESOURCE-KIND", "type":"string", "jsonPath":".spec.resourceRef.kind"}"#,
    printcolumn = r#"{"name":"RESOURCE-NAME", "type":"string", "jsonPath":".spec.resourceRef.name"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfigUsageSpec {
    pub provider_config_ref: ProviderConfigReference,
    pub resource_ref: TypedReference,
}

/// Fully qualified reference to a managed resource
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TypedReference {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub uid: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_config_deserializes_crossplane_field_names() {
        let spec: ProviderConfigSpec = serde_json::from_value(json!({
            "host": "config.private.zscaler.com",
            "customerID": "42",
            "clientID": {
                "source": "Secret",
                "secretRef": {"namespace": "crossplane-system", "name": "zpa", "key": "id"}
            },
            "clientSecret": {"source": "Environment"}
        }))
        .unwrap();

        assert_eq!(spec.customer_id, "42");
        assert_eq!(spec.basepath, None);
        assert_eq!(spec.client_id.source, CredentialsSource::Secret);
        assert_eq!(spec.client_secret.source, CredentialsSource::Environment);
        assert!(spec.client_secret.secret_ref.is_none());
    }
}
