use super::ExternalResource;
use crate::client::{ApiError, SegmentGroupResource, ZpaClient};
use crate::controller::diff::Comparison;
use crate::controller::late_init::LateInit;
use crate::crd::{SegmentGroup, SegmentGroupObservation, SegmentGroupParameters};
use async_trait::async_trait;

#[async_trait]
impl ExternalResource for SegmentGroup {
    type Remote = SegmentGroupResource;

    fn remote_id(remote: &SegmentGroupResource) -> Option<&str> {
        remote.id.as_deref()
    }

    fn observation(remote: &SegmentGroupResource) -> SegmentGroupObservation {
        SegmentGroupObservation {
            id: remote.id.clone(),
            creation_time: remote.audit.creation_time.clone(),
            modified_by: remote.audit.modified_by.clone(),
            modified_time: remote.audit.modified_time.clone(),
            policy_migrated: remote.policy_migrated,
        }
    }

    fn late_initialize(params: &mut SegmentGroupParameters, remote: &SegmentGroupResource) -> bool {
        let mut late_init = LateInit::new();
        late_init
            .toggle(&mut params.enabled, remote.enabled)
            .string(&mut params.config_space, remote.config_space.as_deref())
            .toggle(&mut params.policy_migrated, remote.policy_migrated)
            .string(
                &mut params.tcp_keep_alive_enabled,
                remote.tcp_keep_alive_enabled.as_deref(),
            );
        late_init.mutated()
    }

    fn is_up_to_date(params: &SegmentGroupParameters, remote: &SegmentGroupResource) -> bool {
        Comparison::new("SegmentGroup")
            .string("name", Some(params.name.as_str()), Some(remote.name.as_str()))
            .string("description", params.description.as_deref(), remote.description.as_deref())
            .toggle("enabled", params.enabled, remote.enabled)
            .string("configSpace", params.config_space.as_deref(), remote.config_space.as_deref())
            .toggle("policyMigrated", params.policy_migrated, remote.policy_migrated)
            .string(
                "tcpKeepAliveEnabled",
                params.tcp_keep_alive_enabled.as_deref(),
                remote.tcp_keep_alive_enabled.as_deref(),
            )
            .finish()
    }

    async fn payload(&self, _client: &ZpaClient) -> Result<SegmentGroupResource, ApiError> {
        let params = &self.spec.for_provider;
        Ok(SegmentGroupResource {
            id: None,
            name: params.name.clone(),
            description: params.description.clone(),
            enabled: params.enabled.value(),
            config_space: params.config_space.clone(),
            policy_migrated: params.policy_migrated.value(),
            tcp_keep_alive_enabled: params.tcp_keep_alive_enabled.clone(),
            audit: Default::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::Toggle;

    #[test]
    fn test_keep_alive_drift_is_detected() {
        let params = SegmentGroupParameters {
            name: "corp".to_string(),
            tcp_keep_alive_enabled: Some("1".to_string()),
            ..Default::default()
        };
        let remote = SegmentGroupResource {
            name: "corp".to_string(),
            tcp_keep_alive_enabled: Some("0".to_string()),
            ..Default::default()
        };
        assert!(!SegmentGroup::is_up_to_date(&params, &remote));
    }

    #[test]
    fn test_late_init_adopts_remote_defaults() {
        let mut params = SegmentGroupParameters {
            name: "corp".to_string(),
            enabled: Toggle::False,
            ..Default::default()
        };
        let remote = SegmentGroupResource {
            name: "corp".to_string(),
            enabled: true,
            config_space: Some("DEFAULT".to_string()),
            ..Default::default()
        };

        assert!(SegmentGroup::late_initialize(&mut params, &remote));
        assert_eq!(params.enabled, Toggle::False);
        assert_eq!(params.config_space.as_deref(), Some("DEFAULT"));
        assert_eq!(params.policy_migrated, Toggle::False);
        assert!(!SegmentGroup::late_initialize(&mut params, &remote));
    }
}
