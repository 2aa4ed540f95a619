//! # Reconciler Types
//!
//! Shared context, error taxonomy and per-resource backoff state.

use crate::config::ControllerConfig;
use crate::controller::backoff::ExponentialBackoff;
use crate::controller::credentials::{ConnectError, CredentialResolver};
use crate::controller::external::ExternalError;
use crate::controller::reference::{ReferenceError, ReferenceResolver};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

/// How a failed reconcile is retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Missing or invalid ProviderConfig, secret or usage tracking
    Configuration,
    /// Token exchange failed
    Authentication,
    /// A referenced resource is missing or has no external name yet
    DependencyNotReady,
    /// The remote object vanished
    NotFound,
    /// Any other ZPA failure
    RemoteApi,
    /// A selector matched zero or several candidates
    AmbiguousReference,
    /// Kubernetes API failure
    ControlPlane,
}

impl ErrorClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Authentication => "authentication",
            Self::DependencyNotReady => "dependency_not_ready",
            Self::NotFound => "not_found",
            Self::RemoteApi => "remote_api",
            Self::AmbiguousReference => "ambiguous_reference",
            Self::ControlPlane => "control_plane",
        }
    }
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("connect failed: {0}")]
    Connect(#[from] ConnectError),
    #[error("cannot resolve references: {0}")]
    Reference(#[from] ReferenceError),
    #[error("{0}")]
    External(#[from] ExternalError),
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),
    #[error("finalizer error: {0}")]
    Finalizer(String),
    #[error("ProviderConfig {name} is still used by {users} resources")]
    ProviderConfigInUse { name: String, users: usize },
    #[error("reconcile did not finish within {0:?}")]
    Timeout(Duration),
}

impl ReconcileError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Connect(ConnectError::AuthExchangeFailed { .. }) => ErrorClass::Authentication,
            Self::Connect(ConnectError::Store(_)) => ErrorClass::ControlPlane,
            Self::Connect(_) => ErrorClass::Configuration,
            Self::Reference(
                ReferenceError::ReferencedResourceNotFound { .. }
                | ReferenceError::ReferencedResourceNotReady { .. },
            ) => ErrorClass::DependencyNotReady,
            Self::Reference(
                ReferenceError::NoMatchingReference { .. }
                | ReferenceError::AmbiguousReference { .. },
            ) => ErrorClass::AmbiguousReference,
            Self::Reference(ReferenceError::Lookup { .. }) => ErrorClass::ControlPlane,
            Self::External(ExternalError::Api(e)) if e.is_not_found() => ErrorClass::NotFound,
            Self::External(_) | Self::Timeout(_) => ErrorClass::RemoteApi,
            Self::ProviderConfigInUse { .. } => ErrorClass::DependencyNotReady,
            Self::Kube(_) | Self::Finalizer(_) => ErrorClass::ControlPlane,
        }
    }
}

/// State shared by every reconcile worker
pub struct Context {
    pub client: kube::Client,
    pub credentials: CredentialResolver,
    pub references: ReferenceResolver,
    pub config: ControllerConfig,
    /// Backoff per `kind/name`
    pub backoff_states: Mutex<HashMap<String, ExponentialBackoff>>,
}

impl Context {
    pub fn new(
        client: kube::Client,
        credentials: CredentialResolver,
        references: ReferenceResolver,
        config: ControllerConfig,
    ) -> Self {
        Self {
            client,
            credentials,
            references,
            config,
            backoff_states: Mutex::new(HashMap::new()),
        }
    }

    /// Next retry delay for `key`, advancing its backoff
    pub fn next_backoff(&self, key: &str) -> Duration {
        let (start, max) = (self.config.backoff_start_secs, self.config.backoff_max_secs);
        match self.backoff_states.lock() {
            Ok(mut states) => states
                .entry(key.to_string())
                .or_insert_with(|| ExponentialBackoff::new(start, max))
                .next_backoff(),
            Err(_) => Duration::from_secs(max),
        }
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_secs(self.config.backoff_max_secs)
    }

    /// Forget the backoff for `key` after a successful reconcile
    pub fn reset_backoff(&self, key: &str) {
        if let Ok(mut states) = self.backoff_states.lock() {
            states.remove(key);
        }
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Key identifying one object in the backoff map
pub fn backoff_key(kind: &str, name: &str) -> String {
    format!("{kind}/{name}")
}
