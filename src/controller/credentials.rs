//! # Credential Resolver
//!
//! Turns a resource's `providerConfigRef` into an authenticated [`ZpaClient`].
//!
//! Every connect re-reads the ProviderConfig and its secrets, records a
//! ProviderConfigUsage for the resource and exchanges the client credentials
//! for a fresh bearer token. Nothing is cached between reconciles.

use crate::client::models::SigninResponse;
use crate::client::{HttpTransport, ZpaClient};
use crate::constants::{DEFAULT_BASEPATH, SIGNIN_PATH};
use crate::crd::{
    CredentialSelector, CredentialsSource, ProviderConfig, ProviderConfigReference,
    TypedReference,
};
use crate::observability::metrics;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info_span, Instrument};
use zeroize::Zeroizing;

/// Failure talking to the control plane's resource store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),
    #[error("resource store unavailable: {0}")]
    Unavailable(String),
}

/// Failure to produce an authenticated client.
///
/// Messages never include credential values.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("no providerConfigRef is given")]
    ConfigMissing,
    #[error("cannot get referenced ProviderConfig {name}: not found")]
    ProviderConfigNotFound { name: String },
    #[error("cannot track ProviderConfig usage: {0}")]
    TrackingFailed(#[source] StoreError),
    #[error("only Secret supported as credential source, {field} uses {found}")]
    UnsupportedCredentialSource {
        field: &'static str,
        found: CredentialsSource,
    },
    #[error("{field} has no secretRef")]
    SecretRefMissing { field: &'static str },
    #[error("cannot get credentials secret {namespace}/{name}: not found")]
    SecretNotFound { namespace: String, name: String },
    #[error("'{key}' is required in secret data of {namespace}/{name}")]
    SecretKeyMissing {
        namespace: String,
        name: String,
        key: String,
    },
    #[error("token exchange with {host} failed: {reason}")]
    AuthExchangeFailed { host: String, reason: String },
    #[error("cannot read provider configuration: {0}")]
    Store(#[from] StoreError),
    #[error("cannot build HTTP client: {0}")]
    HttpClient(String),
}

/// Read access to ProviderConfigs and Secrets, plus usage tracking
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn provider_config(&self, name: &str) -> Result<Option<ProviderConfig>, StoreError>;

    async fn secret(&self, namespace: &str, name: &str) -> Result<Option<Secret>, StoreError>;

    /// Upsert the usage record tying `resource` to `provider_config`
    async fn track_usage(
        &self,
        provider_config: &str,
        resource: &TypedReference,
    ) -> Result<(), StoreError>;
}

/// Where the API lives: `{scheme}://{host}` plus the configured base path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub origin: String,
    pub basepath: String,
}

impl Endpoint {
    /// HTTPS unless the host already names a scheme; base path defaults to `/`.
    pub fn new(host: &str, basepath: Option<&str>) -> Self {
        let host = host.trim().trim_end_matches('/');
        let origin = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{host}")
        };
        let basepath = match basepath.map(str::trim) {
            Some(path) if !path.is_empty() => path.to_string(),
            _ => DEFAULT_BASEPATH.to_string(),
        };
        Self { origin, basepath }
    }

    /// Host part without scheme, for messages
    pub fn host(&self) -> &str {
        self.origin
            .split_once("://")
            .map_or(self.origin.as_str(), |(_, host)| host)
    }

    pub fn signin_url(&self) -> String {
        format!("{}{SIGNIN_PATH}", self.origin)
    }

    pub fn base_url(&self) -> String {
        let path = self.basepath.trim_matches('/');
        if path.is_empty() {
            self.origin.clone()
        } else {
            format!("{}/{path}", self.origin)
        }
    }
}

/// Exchanges client credentials for a bearer token
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn exchange(
        &self,
        endpoint: &Endpoint,
        client_id: &str,
        client_secret: &str,
    ) -> Result<Zeroizing<String>, ConnectError>;
}

/// `POST {origin}/signin` with a form-encoded `client_id`/`client_secret`
#[derive(Debug, Clone)]
pub struct HttpTokenSource {
    http_client: reqwest::Client,
}

impl HttpTokenSource {
    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl TokenSource for HttpTokenSource {
    async fn exchange(
        &self,
        endpoint: &Endpoint,
        client_id: &str,
        client_secret: &str,
    ) -> Result<Zeroizing<String>, ConnectError> {
        let failed = |reason: String| ConnectError::AuthExchangeFailed {
            host: endpoint.host().to_string(),
            reason,
        };

        let result = async {
            let response = self
                .http_client
                .post(endpoint.signin_url())
                .form(&[("client_id", client_id), ("client_secret", client_secret)])
                .send()
                .await
                .map_err(|e| failed(e.without_url().to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(failed(format!(
                    "HTTP {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or_default()
                )));
            }

            let body: SigninResponse = response
                .json()
                .await
                .map_err(|e| failed(format!("malformed response: {}", e.without_url())))?;
            if body.access_token.is_empty() {
                return Err(failed("response carried no access_token".to_string()));
            }
            Ok(Zeroizing::new(body.access_token))
        }
        .await;

        metrics::increment_token_exchanges(if result.is_ok() { "success" } else { "failure" });
        result
    }
}

/// Produces authenticated clients from ProviderConfigs
#[derive(Clone)]
pub struct CredentialResolver {
    store: Arc<dyn ConfigStore>,
    tokens: Arc<dyn TokenSource>,
    http_client: reqwest::Client,
}

impl std::fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialResolver").finish_non_exhaustive()
    }
}

impl CredentialResolver {
    /// `http_client` is shared by every transport this resolver hands out
    pub fn new(
        store: Arc<dyn ConfigStore>,
        tokens: Arc<dyn TokenSource>,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            store,
            tokens,
            http_client,
        }
    }

    /// Resolve credentials for `resource` and return a client for its tenant.
    pub async fn resolve(
        &self,
        provider_config_ref: Option<&ProviderConfigReference>,
        resource: &TypedReference,
    ) -> Result<ZpaClient, ConnectError> {
        let reference = provider_config_ref.ok_or(ConnectError::ConfigMissing)?;
        let span = info_span!(
            "credentials.resolve",
            provider_config = %reference.name,
            resource.kind = %resource.kind,
            resource.name = %resource.name
        );

        async {
            let config = self
                .store
                .provider_config(&reference.name)
                .await?
                .ok_or_else(|| ConnectError::ProviderConfigNotFound {
                    name: reference.name.clone(),
                })?;

            self.store
                .track_usage(&reference.name, resource)
                .await
                .map_err(ConnectError::TrackingFailed)?;

            let client_id = self.credential("clientID", &config.spec.client_id).await?;
            let client_secret = self
                .credential("clientSecret", &config.spec.client_secret)
                .await?;

            let endpoint = Endpoint::new(&config.spec.host, config.spec.basepath.as_deref());
            let token = self
                .tokens
                .exchange(&endpoint, &client_id, &client_secret)
                .await?;
            debug!("Obtained ZPA access token for {}", endpoint.host());

            let transport =
                HttpTransport::with_client(self.http_client.clone(), endpoint.base_url(), token);
            Ok(ZpaClient::new(Arc::new(transport), config.spec.customer_id))
        }
        .instrument(span)
        .await
    }

    async fn credential(
        &self,
        field: &'static str,
        selector: &CredentialSelector,
    ) -> Result<Zeroizing<String>, ConnectError> {
        if selector.source != CredentialsSource::Secret {
            return Err(ConnectError::UnsupportedCredentialSource {
                field,
                found: selector.source,
            });
        }
        let secret_ref = selector
            .secret_ref
            .as_ref()
            .ok_or(ConnectError::SecretRefMissing { field })?;

        let secret = self
            .store
            .secret(&secret_ref.namespace, &secret_ref.name)
            .await?
            .ok_or_else(|| ConnectError::SecretNotFound {
                namespace: secret_ref.namespace.clone(),
                name: secret_ref.name.clone(),
            })?;

        secret
            .data
            .as_ref()
            .and_then(|data| data.get(&secret_ref.key))
            .map(|value| Zeroizing::new(String::from_utf8_lossy(&value.0).into_owned()))
            .ok_or_else(|| ConnectError::SecretKeyMissing {
                namespace: secret_ref.namespace.clone(),
                name: secret_ref.name.clone(),
                key: secret_ref.key.clone(),
            })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory store and token source.

    use super::*;
    use k8s_openapi::ByteString;
    use kube::api::ObjectMeta;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::Mutex;

    #[derive(Default)]
    pub(crate) struct FakeStore {
        pub(crate) configs: HashMap<String, ProviderConfig>,
        pub(crate) secrets: HashMap<(String, String), BTreeMap<String, String>>,
        pub(crate) usages: Mutex<Vec<(String, TypedReference)>>,
        pub(crate) fail_tracking: bool,
    }

    impl FakeStore {
        pub(crate) fn with_secret(mut self, namespace: &str, name: &str, pairs: &[(&str, &str)]) -> Self {
            self.secrets.insert(
                (namespace.to_string(), name.to_string()),
                pairs
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
            );
            self
        }

        pub(crate) fn with_config(mut self, name: &str, config: ProviderConfig) -> Self {
            self.configs.insert(name.to_string(), config);
            self
        }
    }

    #[async_trait]
    impl ConfigStore for FakeStore {
        async fn provider_config(&self, name: &str) -> Result<Option<ProviderConfig>, StoreError> {
            Ok(self.configs.get(name).cloned())
        }

        async fn secret(&self, namespace: &str, name: &str) -> Result<Option<Secret>, StoreError> {
            Ok(self
                .secrets
                .get(&(namespace.to_string(), name.to_string()))
                .map(|pairs| Secret {
                    metadata: ObjectMeta {
                        name: Some(name.to_string()),
                        namespace: Some(namespace.to_string()),
                        ..Default::default()
                    },
                    data: Some(
                        pairs
                            .iter()
                            .map(|(k, v)| (k.clone(), ByteString(v.as_bytes().to_vec())))
                            .collect(),
                    ),
                    ..Default::default()
                }))
        }

        async fn track_usage(
            &self,
            provider_config: &str,
            resource: &TypedReference,
        ) -> Result<(), StoreError> {
            if self.fail_tracking {
                return Err(StoreError::Unavailable("usage store down".to_string()));
            }
            self.usages
                .lock()
                .unwrap()
                .push((provider_config.to_string(), resource.clone()));
            Ok(())
        }
    }

    /// Hands out a fixed token and remembers what it was asked
    #[derive(Default)]
    pub(crate) struct FakeTokens {
        pub(crate) calls: Mutex<Vec<(Endpoint, String, String)>>,
    }

    #[async_trait]
    impl TokenSource for FakeTokens {
        async fn exchange(
            &self,
            endpoint: &Endpoint,
            client_id: &str,
            client_secret: &str,
        ) -> Result<Zeroizing<String>, ConnectError> {
            self.calls.lock().unwrap().push((
                endpoint.clone(),
                client_id.to_string(),
                client_secret.to_string(),
            ));
            Ok(Zeroizing::new("token-123".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{FakeStore, FakeTokens};
    use super::*;
    use crate::crd::{ProviderConfigSpec, SecretKeySelector};

    const SECRET_ID: &str = "id-c0ffee";
    const SECRET_VALUE: &str = "s3cr3t-value-never-logged";

    fn selector(source: CredentialsSource, key: &str) -> CredentialSelector {
        CredentialSelector {
            source,
            secret_ref: Some(SecretKeySelector {
                namespace: "crossplane-system".to_string(),
                name: "zpa-creds".to_string(),
                key: key.to_string(),
            }),
        }
    }

    fn provider_config(id_source: CredentialsSource, secret_source: CredentialsSource) -> ProviderConfig {
        ProviderConfig::new(
            "default",
            ProviderConfigSpec {
                host: "config.private.zscaler.com".to_string(),
                basepath: None,
                customer_id: "216196257331281920".to_string(),
                client_id: selector(id_source, "clientID"),
                client_secret: selector(secret_source, "clientSecret"),
            },
        )
    }

    fn store(config: ProviderConfig) -> FakeStore {
        FakeStore::default()
            .with_config("default", config)
            .with_secret(
                "crossplane-system",
                "zpa-creds",
                &[("clientID", SECRET_ID), ("clientSecret", SECRET_VALUE)],
            )
    }

    fn resource() -> TypedReference {
        TypedReference {
            api_version: "zpa.crossplane.io/v1alpha1".to_string(),
            kind: "Server".to_string(),
            name: "web-01".to_string(),
            uid: Some("5b9b8a56-7e4c-4f7e-9a4e-0d3c1a1f3e11".to_string()),
        }
    }

    fn default_ref() -> ProviderConfigReference {
        ProviderConfigReference {
            name: "default".to_string(),
        }
    }

    fn resolver(store: FakeStore, tokens: Arc<FakeTokens>) -> CredentialResolver {
        CredentialResolver::new(Arc::new(store), tokens, reqwest::Client::new())
    }

    #[tokio::test]
    async fn test_missing_reference_is_config_missing() {
        let resolver = resolver(FakeStore::default(), Arc::new(FakeTokens::default()));
        let err = resolver.resolve(None, &resource()).await.unwrap_err();
        assert!(matches!(err, ConnectError::ConfigMissing));
    }

    #[tokio::test]
    async fn test_unknown_provider_config() {
        let resolver = resolver(FakeStore::default(), Arc::new(FakeTokens::default()));
        let err = resolver
            .resolve(Some(&default_ref()), &resource())
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectError::ProviderConfigNotFound { name } if name == "default"));
    }

    #[tokio::test]
    async fn test_non_secret_sources_are_rejected_without_leaking() {
        for source in [
            CredentialsSource::None,
            CredentialsSource::InjectedIdentity,
            CredentialsSource::Environment,
            CredentialsSource::Filesystem,
        ] {
            let tokens = Arc::new(FakeTokens::default());
            let resolver = resolver(
                store(provider_config(CredentialsSource::Secret, source)),
                tokens.clone(),
            );
            let err = resolver
                .resolve(Some(&default_ref()), &resource())
                .await
                .unwrap_err();

            assert!(matches!(
                err,
                ConnectError::UnsupportedCredentialSource { field: "clientSecret", .. }
            ));
            let message = err.to_string();
            assert!(!message.contains(SECRET_VALUE));
            assert!(!message.contains(SECRET_ID));
            assert!(tokens.calls.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_tracking_failure_is_fatal() {
        let mut store = store(provider_config(
            CredentialsSource::Secret,
            CredentialsSource::Secret,
        ));
        store.fail_tracking = true;
        let tokens = Arc::new(FakeTokens::default());
        let err = resolver(store, tokens.clone())
            .resolve(Some(&default_ref()), &resource())
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectError::TrackingFailed(_)));
        assert!(tokens.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_secret_and_missing_key_are_distinct() {
        let config = provider_config(CredentialsSource::Secret, CredentialsSource::Secret);
        let no_secret = FakeStore::default().with_config("default", config.clone());
        let err = resolver(no_secret, Arc::new(FakeTokens::default()))
            .resolve(Some(&default_ref()), &resource())
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectError::SecretNotFound { .. }));

        let no_key = FakeStore::default().with_config("default", config).with_secret(
            "crossplane-system",
            "zpa-creds",
            &[("clientID", SECRET_ID)],
        );
        let err = resolver(no_key, Arc::new(FakeTokens::default()))
            .resolve(Some(&default_ref()), &resource())
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectError::SecretKeyMissing { ref key, .. } if key == "clientSecret"));
        assert!(!err.to_string().contains(SECRET_ID));
    }

    #[tokio::test]
    async fn test_successful_resolve_tracks_usage_and_exchanges() {
        let store = Arc::new(store(provider_config(
            CredentialsSource::Secret,
            CredentialsSource::Secret,
        )));
        let tokens = Arc::new(FakeTokens::default());
        let resolver = CredentialResolver::new(store.clone(), tokens.clone(), reqwest::Client::new());

        let client = resolver
            .resolve(Some(&default_ref()), &resource())
            .await
            .unwrap();

        assert_eq!(client.customer_id(), "216196257331281920");
        let usages = store.usages.lock().unwrap();
        assert_eq!(usages.len(), 1);
        assert_eq!(usages[0].0, "default");
        assert_eq!(usages[0].1.name, "web-01");

        let calls = tokens.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.signin_url(), "https://config.private.zscaler.com/signin");
        assert_eq!(calls[0].1, SECRET_ID);
        assert_eq!(calls[0].2, SECRET_VALUE);
    }

    #[test]
    fn test_endpoint_honours_explicit_scheme() {
        let endpoint = Endpoint::new("http://127.0.0.1:8080/", Some(""));
        assert_eq!(endpoint.signin_url(), "http://127.0.0.1:8080/signin");
        assert_eq!(endpoint.base_url(), "http://127.0.0.1:8080");
        assert_eq!(endpoint.host(), "127.0.0.1:8080");
    }

    #[test]
    fn test_endpoint_appends_basepath() {
        let endpoint = Endpoint::new("config.zpabeta.net", Some("/api/"));
        assert_eq!(endpoint.base_url(), "https://config.zpabeta.net/api");
    }
}
