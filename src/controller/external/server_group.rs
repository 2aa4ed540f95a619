use super::ExternalResource;
use crate::client::{AppConnectorGroup, ApiError, NamedReference, ServerGroupResource, ZpaClient};
use crate::controller::diff::Comparison;
use crate::controller::late_init::LateInit;
use crate::crd::{ServerGroup, ServerGroupObservation, ServerGroupParameters};
use async_trait::async_trait;

#[async_trait]
impl ExternalResource for ServerGroup {
    type Remote = ServerGroupResource;

    fn remote_id(remote: &ServerGroupResource) -> Option<&str> {
        remote.id.as_deref()
    }

    fn observation(remote: &ServerGroupResource) -> ServerGroupObservation {
        ServerGroupObservation {
            id: remote.id.clone(),
            creation_time: remote.audit.creation_time.clone(),
            modified_by: remote.audit.modified_by.clone(),
            modified_time: remote.audit.modified_time.clone(),
        }
    }

    fn late_initialize(params: &mut ServerGroupParameters, remote: &ServerGroupResource) -> bool {
        let mut late_init = LateInit::new();
        late_init
            .string(&mut params.config_space, remote.config_space.as_deref())
            .toggle(&mut params.ip_anchored, remote.ip_anchored)
            .toggle(&mut params.enabled, remote.enabled)
            .toggle(&mut params.dynamic_discovery, remote.dynamic_discovery);
        late_init.mutated()
    }

    fn is_up_to_date(params: &ServerGroupParameters, remote: &ServerGroupResource) -> bool {
        let connector_groups: Vec<String> = remote
            .app_connector_groups
            .iter()
            .map(|group| group.id.clone())
            .collect();

        Comparison::new("ServerGroup")
            .string("description", params.description.as_deref(), remote.description.as_deref())
            .string("configSpace", params.config_space.as_deref(), remote.config_space.as_deref())
            .toggle("ipAnchored", params.ip_anchored, remote.ip_anchored)
            .toggle("dynamicDiscovery", params.dynamic_discovery, remote.dynamic_discovery)
            .toggle("enabled", params.enabled, remote.enabled)
            .set("appConnectorGroups", &params.app_connector_groups, &connector_groups)
            .string("name", Some(params.name.as_str()), Some(remote.name.as_str()))
            .finish()
    }

    async fn payload(&self, client: &ZpaClient) -> Result<ServerGroupResource, ApiError> {
        let params = &self.spec.for_provider;

        let mut app_connector_groups = Vec::with_capacity(params.app_connector_groups.len());
        for id in &params.app_connector_groups {
            let group: AppConnectorGroup = client.get(id).await?;
            app_connector_groups.push(NamedReference {
                id: id.clone(),
                name: Some(group.name),
            });
        }

        Ok(ServerGroupResource {
            id: None,
            name: params.name.clone(),
            description: params.description.clone(),
            enabled: params.enabled.value(),
            ip_anchored: params.ip_anchored.value(),
            config_space: params.config_space.clone(),
            dynamic_discovery: params.dynamic_discovery.value(),
            app_connector_groups,
            audit: Default::default(),
        })
    }
}
