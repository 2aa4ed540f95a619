//! # Error Policy
//!
//! Decides when a failed reconcile runs again, based on its [`ErrorClass`].

use crate::controller::reconciler::{backoff_key, Context, ErrorClass, ReconcileError};
use crate::observability::metrics;
use kube::{Resource, ResourceExt};
use kube_runtime::controller::Action;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// How long to wait before retrying
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retry {
    /// Short fixed delay; the dependency will likely show up soon
    Dependency,
    /// Per-resource exponential backoff
    Backoff,
    /// Longest backoff; used for references that need a user fix
    Maximum,
}

impl Retry {
    pub fn for_class(class: ErrorClass) -> Self {
        match class {
            ErrorClass::DependencyNotReady => Self::Dependency,
            ErrorClass::AmbiguousReference => Self::Maximum,
            ErrorClass::Configuration
            | ErrorClass::Authentication
            | ErrorClass::NotFound
            | ErrorClass::RemoteApi
            | ErrorClass::ControlPlane => Self::Backoff,
        }
    }

    fn reason(self) -> &'static str {
        match self {
            Self::Dependency => "dependency",
            Self::Backoff => "backoff",
            Self::Maximum => "maximum_backoff",
        }
    }
}

/// `error_policy` handed to `kube_runtime::Controller::run` for every kind
pub fn error_policy<K>(resource: Arc<K>, error: &ReconcileError, ctx: Arc<Context>) -> Action
where
    K: Resource<DynamicType = ()>,
{
    let kind = K::kind(&());
    let name = resource.name_any();
    let class = error.class();
    metrics::increment_reconciliation_errors(&kind, class.as_str());

    let retry = Retry::for_class(class);
    let delay = match retry {
        Retry::Dependency => {
            debug!("{} {} waits for a dependency: {}", kind, name, error);
            ctx.config.dependency_requeue()
        }
        Retry::Maximum => {
            warn!("{} {} cannot progress until its spec changes: {}", kind, name, error);
            ctx.max_backoff()
        }
        Retry::Backoff => {
            error!(error.class = %class, "Reconciliation of {} {} failed: {}", kind, name, error);
            ctx.next_backoff(&backoff_key(&kind, &name))
        }
    };

    metrics::increment_requeues_total(retry.reason());
    Action::requeue(delay)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_per_class() {
        assert_eq!(Retry::for_class(ErrorClass::DependencyNotReady), Retry::Dependency);
        assert_eq!(Retry::for_class(ErrorClass::AmbiguousReference), Retry::Maximum);
        for class in [
            ErrorClass::Configuration,
            ErrorClass::Authentication,
            ErrorClass::RemoteApi,
            ErrorClass::ControlPlane,
        ] {
            assert_eq!(Retry::for_class(class), Retry::Backoff, "{class}");
        }
    }
}
