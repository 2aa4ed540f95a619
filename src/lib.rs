//! ZPA Provider Library
//!
//! Reconciles Zscaler Private Access resources declared as Kubernetes custom
//! resources. The `zpa-provider` binary wires these modules together; tests and
//! the `crdgen` binary use them directly.

pub mod client;
pub mod config;
pub mod constants;
pub mod controller;
pub mod crd;
pub mod observability;
pub mod runtime;
