//! # Custom Resource Definitions
//!
//! Cluster-scoped CRDs in the `zpa.crossplane.io/v1alpha1` group.
//!
//! - `provider_config`: ProviderConfig and ProviderConfigUsage
//! - `server`, `server_group`, `segment_group`, `application_segment`: managed resources
//! - `common`: references, selectors, conditions and the [`ManagedResource`] trait
//! - `toggle`: three-valued flags for desired state

pub mod application_segment;
pub mod common;
pub mod provider_config;
pub mod segment_group;
pub mod server;
pub mod server_group;
pub mod toggle;

pub use application_segment::{
    ApplicationSegment, ApplicationSegmentObservation, ApplicationSegmentParameters,
    ApplicationSegmentSpec, ObservedServerGroup,
};
pub use common::{
    Condition, DeletionPolicy, ManagedResource, ManagedStatus, ProviderConfigReference, Reference,
    Selector,
};
pub use provider_config::{
    CredentialSelector, CredentialsSource, ProviderConfig, ProviderConfigSpec,
    ProviderConfigStatus, ProviderConfigUsage, ProviderConfigUsageSpec, SecretKeySelector,
    TypedReference,
};
pub use segment_group::{SegmentGroup, SegmentGroupObservation, SegmentGroupParameters, SegmentGroupSpec};
pub use server::{Server, ServerObservation, ServerParameters, ServerSpec};
pub use server_group::{ServerGroup, ServerGroupObservation, ServerGroupParameters, ServerGroupSpec};
pub use toggle::Toggle;
