use super::ExternalResource;
use crate::client::{ApiError, ApplicationResource, NamedReference, ServerGroupResource, ZpaClient};
use crate::controller::diff::Comparison;
use crate::controller::late_init::LateInit;
use crate::controller::reference::{ReferenceError, ReferenceResolver, TargetKind};
use crate::crd::{
    ApplicationSegment, ApplicationSegmentObservation, ApplicationSegmentParameters,
    ObservedServerGroup,
};
use async_trait::async_trait;

#[async_trait]
impl ExternalResource for ApplicationSegment {
    type Remote = ApplicationResource;

    const FORCE_DELETE: bool = true;

    async fn resolve_references(&mut self, resolver: &ReferenceResolver) -> Result<bool, ReferenceError> {
        let params = &mut self.spec.for_provider;

        let segment_group = resolver
            .resolve(
                params.segment_group_id.as_deref(),
                params.segment_group_id_ref.as_ref(),
                params.segment_group_id_selector.as_ref(),
                TargetKind::SegmentGroup,
            )
            .await?;
        let mut changed =
            segment_group.apply(&mut params.segment_group_id, &mut params.segment_group_id_ref);

        let server_groups = resolver
            .resolve_multiple(
                &params.server_groups,
                &params.server_group_refs,
                params.server_group_selector.as_ref(),
                TargetKind::ServerGroup,
            )
            .await?;
        changed |= server_groups.apply(&mut params.server_groups, &mut params.server_group_refs);

        Ok(changed)
    }

    fn remote_id(remote: &ApplicationResource) -> Option<&str> {
        remote.id.as_deref()
    }

    fn observation(remote: &ApplicationResource) -> ApplicationSegmentObservation {
        ApplicationSegmentObservation {
            id: remote.id.clone(),
            creation_time: remote.audit.creation_time.clone(),
            modified_by: remote.audit.modified_by.clone(),
            modified_time: remote.audit.modified_time.clone(),
            segment_group_id: remote.segment_group_id.clone(),
            domain_names: remote.domain_names.clone(),
            server_groups: remote
                .server_groups
                .iter()
                .map(|group| ObservedServerGroup {
                    id: group.id.clone(),
                    name: group.name.clone(),
                })
                .collect(),
        }
    }

    fn late_initialize(
        params: &mut ApplicationSegmentParameters,
        remote: &ApplicationResource,
    ) -> bool {
        let mut late_init = LateInit::new();
        late_init
            .toggle(&mut params.enabled, remote.enabled)
            .toggle(&mut params.passive_health_enabled, remote.passive_health_enabled)
            .toggle(&mut params.double_encrypt, remote.double_encrypt)
            .string(&mut params.config_space, remote.config_space.as_deref())
            .string(&mut params.bypass_type, remote.bypass_type.as_deref())
            .string(&mut params.health_check_type, remote.health_check_type.as_deref())
            .string(&mut params.icmp_access_type, remote.icmp_access_type.as_deref())
            .toggle(&mut params.is_cname_enabled, remote.is_cname_enabled)
            .toggle(&mut params.ip_anchored, remote.ip_anchored)
            .string(&mut params.health_reporting, remote.health_reporting.as_deref());
        late_init.mutated()
    }

    fn is_up_to_date(params: &ApplicationSegmentParameters, remote: &ApplicationResource) -> bool {
        let server_groups: Vec<String> =
            remote.server_groups.iter().map(|group| group.id.clone()).collect();

        Comparison::new("ApplicationSegment")
            .string("bypassType", params.bypass_type.as_deref(), remote.bypass_type.as_deref())
            .string("configSpace", params.config_space.as_deref(), remote.config_space.as_deref())
            .string(
                "defaultIdleTimeout",
                params.default_idle_timeout.as_deref(),
                remote.default_idle_timeout.as_deref(),
            )
            .string(
                "defaultMaxAge",
                params.default_max_age.as_deref(),
                remote.default_max_age.as_deref(),
            )
            .string("description", params.description.as_deref(), remote.description.as_deref())
            .toggle("doubleEncrypt", params.double_encrypt, remote.double_encrypt)
            .toggle("enabled", params.enabled, remote.enabled)
            .string(
                "healthCheckType",
                params.health_check_type.as_deref(),
                remote.health_check_type.as_deref(),
            )
            .string(
                "healthReporting",
                params.health_reporting.as_deref(),
                remote.health_reporting.as_deref(),
            )
            .toggle("ipAnchored", params.ip_anchored, remote.ip_anchored)
            .string(
                "icmpAccessType",
                params.icmp_access_type.as_deref(),
                remote.icmp_access_type.as_deref(),
            )
            .toggle("isCnameEnabled", params.is_cname_enabled, remote.is_cname_enabled)
            .toggle(
                "passiveHealthEnabled",
                params.passive_health_enabled,
                remote.passive_health_enabled,
            )
            .set("domainNames", &params.domain_names, &remote.domain_names)
            .set("tcpPortRanges", &params.tcp_port_ranges, &remote.tcp_port_ranges)
            .set("udpPortRanges", &params.udp_port_ranges, &remote.udp_port_ranges)
            .string("name", Some(params.name.as_str()), Some(remote.name.as_str()))
            .string(
                "segmentGroupID",
                params.segment_group_id.as_deref(),
                remote.segment_group_id.as_deref(),
            )
            .set("serverGroups", &params.server_groups, &server_groups)
            .finish()
    }

    async fn payload(&self, client: &ZpaClient) -> Result<ApplicationResource, ApiError> {
        let params = &self.spec.for_provider;

        let mut server_groups = Vec::with_capacity(params.server_groups.len());
        for id in &params.server_groups {
            let group: ServerGroupResource = client.get(id).await?;
            server_groups.push(NamedReference {
                id: id.clone(),
                name: Some(group.name),
            });
        }

        Ok(ApplicationResource {
            id: None,
            name: params.name.clone(),
            description: params.description.clone(),
            enabled: params.enabled.value(),
            bypass_type: params.bypass_type.clone(),
            config_space: params.config_space.clone(),
            default_idle_timeout: params.default_idle_timeout.clone(),
            default_max_age: params.default_max_age.clone(),
            domain_names: params.domain_names.clone(),
            double_encrypt: params.double_encrypt.value(),
            health_check_type: params.health_check_type.clone(),
            health_reporting: params.health_reporting.clone(),
            icmp_access_type: params.icmp_access_type.clone(),
            ip_anchored: params.ip_anchored.value(),
            is_cname_enabled: params.is_cname_enabled.value(),
            passive_health_enabled: params.passive_health_enabled.value(),
            segment_group_id: params.segment_group_id.clone(),
            tcp_port_ranges: params.tcp_port_ranges.clone(),
            udp_port_ranges: params.udp_port_ranges.clone(),
            server_groups,
            audit: Default::default(),
        })
    }
}
