//! # Constants
//!
//! Shared constants used throughout the controller.
//!
//! Defaults can be overridden via environment variables where applicable
//! (see [`crate::config::ControllerConfig`]).

/// API group shared by every ZPA custom resource
pub const API_GROUP: &str = "zpa.crossplane.io";

/// API version shared by every ZPA custom resource
pub const API_VERSION: &str = "v1alpha1";

/// Annotation holding the identifier the remote API assigned to a managed resource
pub const EXTERNAL_NAME_ANNOTATION: &str = "crossplane.io/external-name";

/// Finalizer guarding remote deletion of managed resources
pub const MANAGED_FINALIZER: &str = "finalizer.managedresource.crossplane.io";

/// Finalizer keeping a ProviderConfig alive while resources still use it
pub const PROVIDER_CONFIG_FINALIZER: &str = "in-use.crossplane.io";

/// Label on a ProviderConfigUsage naming the ProviderConfig it tracks
pub const PROVIDER_CONFIG_LABEL: &str = "crossplane.io/provider-config";

/// Field manager used for server-side apply
pub const FIELD_MANAGER: &str = "zpa-provider";

/// Token exchange endpoint, relative to the configured host
pub const SIGNIN_PATH: &str = "/signin";

/// Management API prefix; every resource path hangs off the customer segment
pub const MGMT_API_PREFIX: &str = "mgmtconfig/v1/admin/customers";

/// Default API base path when the ProviderConfig leaves it empty
pub const DEFAULT_BASEPATH: &str = "/";

/// Default HTTP server port for metrics and health probes
pub const DEFAULT_METRICS_PORT: u16 = 8080;

/// Default interval between observations of a healthy resource (seconds)
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Default upper bound for a single reconcile cycle (seconds)
pub const DEFAULT_RECONCILE_TIMEOUT_SECS: u64 = 120;

/// Default timeout for one HTTP call to the ZPA API (seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default requeue delay when a referenced resource is not ready yet (seconds)
pub const DEFAULT_DEPENDENCY_REQUEUE_SECS: u64 = 10;

/// Default exponential backoff starting value (seconds)
pub const DEFAULT_BACKOFF_START_SECS: u64 = 5;

/// Default exponential backoff maximum value (seconds)
pub const DEFAULT_BACKOFF_MAX_SECS: u64 = 300;

/// Default number of reconciliations running at the same time, per kind
pub const DEFAULT_MAX_CONCURRENT_RECONCILIATIONS: u16 = 10;
