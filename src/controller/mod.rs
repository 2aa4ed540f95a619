//! # Controller
//!
//! Reconciliation engine for ZPA managed resources.
//!
//! - `backoff`: exponential backoff for retries
//! - `credentials`: ProviderConfig to authenticated API client
//! - `diff`: desired vs observed comparison
//! - `external`: Observe/Create/Update/Delete per resource kind
//! - `late_init`: adopting remote defaults into unset spec fields
//! - `provider_config`: usage counting and the in-use finalizer
//! - `reconciler`: the generic managed resource reconcile loop
//! - `reference`: cross-resource reference resolution
//! - `server`: HTTP server for metrics and health checks
//! - `store`: Kubernetes-backed lookups and usage tracking

pub mod backoff;
pub mod credentials;
pub mod diff;
pub mod external;
pub mod late_init;
pub mod provider_config;
pub mod reconciler;
pub mod reference;
pub mod server;
pub mod store;
