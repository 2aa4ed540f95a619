//! # Managed Resource Common Types
//!
//! Types shared by every ZPA managed resource: provider config and cross-resource
//! references, selectors, deletion policy, conditions and the external-name
//! annotation.

use crate::constants::EXTERNAL_NAME_ANNOTATION;
use kube::api::ObjectMeta;
use kube::Resource;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Reference to the ProviderConfig holding the credentials for a resource
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfigReference {
    /// Name of the ProviderConfig
    pub name: String,
}

/// Reference to another managed resource by name
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// Name of the referenced resource
    pub name: String,
}

/// Label query selecting other managed resources
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Selector {
    /// Labels a candidate must carry (all of them) to be selected
    #[serde(default)]
    pub match_labels: BTreeMap<String, String>,
}

impl Selector {
    /// True when every selector label is present on `labels` with the same value
    pub fn matches(&self, labels: Option<&BTreeMap<String, String>>) -> bool {
        self.match_labels.iter().all(|(key, value)| {
            labels
                .and_then(|l| l.get(key))
                .is_some_and(|actual| actual == value)
        })
    }
}

/// What happens to the remote object when the managed resource is deleted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
pub enum DeletionPolicy {
    /// Delete the remote object together with the managed resource
    #[default]
    Delete,
    /// Leave the remote object in place
    Orphan,
}

/// Condition represents a status condition for the resource
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition (Ready, Synced)
    pub r#type: String,
    /// Status of condition (True, False, Unknown)
    pub status: String,
    /// Last transition time (RFC3339)
    #[serde(default)]
    pub last_transition_time: Option<String>,
    /// Reason for condition
    #[serde(default)]
    pub reason: Option<String>,
    /// Message describing condition
    #[serde(default)]
    pub message: Option<String>,
}

pub const CONDITION_READY: &str = "Ready";
pub const CONDITION_SYNCED: &str = "Synced";

impl Condition {
    fn new(r#type: &str, status: bool, reason: &str, message: Option<String>) -> Self {
        Self {
            r#type: r#type.to_string(),
            status: if status { "True" } else { "False" }.to_string(),
            last_transition_time: Some(chrono::Utc::now().to_rfc3339()),
            reason: Some(reason.to_string()),
            message,
        }
    }

    /// The remote object exists and was observed successfully
    pub fn available() -> Self {
        Self::new(CONDITION_READY, true, "Available", None)
    }

    /// The remote object is being created
    pub fn creating() -> Self {
        Self::new(CONDITION_READY, false, "Creating", None)
    }

    /// The remote object is being deleted
    pub fn deleting() -> Self {
        Self::new(CONDITION_READY, false, "Deleting", None)
    }

    pub fn reconcile_success() -> Self {
        Self::new(CONDITION_SYNCED, true, "ReconcileSuccess", None)
    }

    pub fn reconcile_error(message: impl Into<String>) -> Self {
        Self::new(CONDITION_SYNCED, false, "ReconcileError", Some(message.into()))
    }

    pub fn is_true(&self) -> bool {
        self.status == "True"
    }
}

/// Insert or replace the condition with the same type.
///
/// The transition time only moves when the status actually changes.
pub fn set_condition(conditions: &mut Vec<Condition>, mut condition: Condition) {
    match conditions.iter_mut().find(|c| c.r#type == condition.r#type) {
        Some(existing) => {
            if existing.status == condition.status {
                condition
                    .last_transition_time
                    .clone_from(&existing.last_transition_time);
            }
            *existing = condition;
        }
        None => conditions.push(condition),
    }
}

/// Status shared by every managed resource kind
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManagedStatus<O: Default> {
    /// Last observed remote state
    #[serde(default)]
    pub at_provider: O,
    /// Ready and Synced conditions
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// External name of a resource, `None` when unset or empty
pub fn external_name(meta: &ObjectMeta) -> Option<&str> {
    meta.annotations
        .as_ref()
        .and_then(|a| a.get(EXTERNAL_NAME_ANNOTATION))
        .map(String::as_str)
        .filter(|name| !name.is_empty())
}

pub fn set_external_name(meta: &mut ObjectMeta, name: &str) {
    meta.annotations
        .get_or_insert_with(BTreeMap::new)
        .insert(EXTERNAL_NAME_ANNOTATION.to_string(), name.to_string());
}

/// Accessors the generic reconciler needs on every managed resource kind
pub trait ManagedResource:
    Resource<DynamicType = ()> + Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Desired state (`spec.forProvider`)
    type Parameters: Clone + Debug + PartialEq + Serialize + Send + Sync;
    /// Observed remote state (`status.atProvider`)
    type Observation: Clone + Debug + Default + PartialEq + Serialize + Send + Sync;

    fn provider_config_ref(&self) -> Option<&ProviderConfigReference>;
    fn deletion_policy(&self) -> DeletionPolicy;
    fn for_provider(&self) -> &Self::Parameters;
    fn for_provider_mut(&mut self) -> &mut Self::Parameters;
    fn managed_status(&self) -> Option<&ManagedStatus<Self::Observation>>;
    fn managed_status_mut(&mut self) -> &mut ManagedStatus<Self::Observation>;

    fn external_name(&self) -> Option<&str> {
        external_name(self.meta())
    }

    fn set_external_name(&mut self, name: &str) {
        set_external_name(self.meta_mut(), name);
    }

    /// Forget a remote identifier that no longer resolves
    fn clear_external_name(&mut self) {
        if let Some(annotations) = self.meta_mut().annotations.as_mut() {
            annotations.remove(EXTERNAL_NAME_ANNOTATION);
        }
    }

    fn set_condition(&mut self, condition: Condition) {
        set_condition(&mut self.managed_status_mut().conditions, condition);
    }

    fn set_at_provider(&mut self, observation: Self::Observation) {
        self.managed_status_mut().at_provider = observation;
    }
}

/// Implements [`ManagedResource`] for a kind whose spec carries
/// `for_provider`, `provider_config_ref` and `deletion_policy`, and whose
/// status is a [`ManagedStatus`].
macro_rules! managed_resource {
    ($kind:ty, $params:ty, $observation:ty) => {
        impl $crate::crd::common::ManagedResource for $kind {
            type Parameters = $params;
            type Observation = $observation;

            fn provider_config_ref(&self) -> Option<&$crate::crd::common::ProviderConfigReference> {
                self.spec.provider_config_ref.as_ref()
            }

            fn deletion_policy(&self) -> $crate::crd::common::DeletionPolicy {
                self.spec.deletion_policy
            }

            fn for_provider(&self) -> &$params {
                &self.spec.for_provider
            }

            fn for_provider_mut(&mut self) -> &mut $params {
                &mut self.spec.for_provider
            }

            fn managed_status(&self) -> Option<&$crate::crd::common::ManagedStatus<$observation>> {
                self.status.as_ref()
            }

            fn managed_status_mut(
                &mut self,
            ) -> &mut $crate::crd::common::ManagedStatus<$observation> {
                self.status.get_or_insert_with(Default::default)
            }
        }
    };
}

pub(crate) use managed_resource;

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_selector_requires_every_label() {
        let selector = Selector {
            match_labels: labels(&[("env", "prod"), ("team", "net")]),
        };
        assert!(selector.matches(Some(&labels(&[("env", "prod"), ("team", "net"), ("x", "y")]))));
        assert!(!selector.matches(Some(&labels(&[("env", "prod")]))));
        assert!(!selector.matches(None));
    }

    #[test]
    fn test_empty_selector_matches_everything() {
        assert!(Selector::default().matches(None));
    }

    #[test]
    fn test_set_condition_keeps_transition_time_when_status_unchanged() {
        let mut conditions = vec![Condition {
            last_transition_time: Some("2024-01-01T00:00:00Z".to_string()),
            ..Condition::reconcile_success()
        }];
        set_condition(&mut conditions, Condition::reconcile_success());
        assert_eq!(conditions.len(), 1);
        assert_eq!(
            conditions[0].last_transition_time.as_deref(),
            Some("2024-01-01T00:00:00Z")
        );

        set_condition(&mut conditions, Condition::reconcile_error("boom"));
        assert_eq!(conditions.len(), 1);
        assert_ne!(
            conditions[0].last_transition_time.as_deref(),
            Some("2024-01-01T00:00:00Z")
        );
        assert_eq!(conditions[0].message.as_deref(), Some("boom"));
    }

    #[test]
    fn test_set_condition_appends_new_type() {
        let mut conditions = vec![Condition::available()];
        set_condition(&mut conditions, Condition::reconcile_success());
        assert_eq!(conditions.len(), 2);
    }

    #[test]
    fn test_external_name_empty_is_none() {
        let mut meta = ObjectMeta::default();
        assert_eq!(external_name(&meta), None);
        set_external_name(&mut meta, "");
        assert_eq!(external_name(&meta), None);
        set_external_name(&mut meta, "216196257331282583");
        assert_eq!(external_name(&meta), Some("216196257331282583"));
    }
}
