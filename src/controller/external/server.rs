use super::ExternalResource;
use crate::client::{ApiError, ApplicationServer, ZpaClient};
use crate::controller::diff::Comparison;
use crate::controller::late_init::LateInit;
use crate::controller::reference::{ReferenceError, ReferenceResolver, TargetKind};
use crate::crd::{Server, ServerObservation, ServerParameters};
use async_trait::async_trait;
use tracing::debug;

impl Server {
    fn desired(&self, server_group_ids: Vec<String>) -> ApplicationServer {
        let params = &self.spec.for_provider;
        ApplicationServer {
            id: None,
            name: params.name.clone(),
            address: params.address.clone(),
            description: params.description.clone(),
            enabled: params.enabled.value(),
            config_space: params.config_space.clone(),
            app_server_group_ids: server_group_ids,
            audit: Default::default(),
        }
    }
}

#[async_trait]
impl ExternalResource for Server {
    type Remote = ApplicationServer;

    async fn resolve_references(&mut self, resolver: &ReferenceResolver) -> Result<bool, ReferenceError> {
        let params = &mut self.spec.for_provider;
        let resolved = resolver
            .resolve_multiple(
                &params.server_groups,
                &params.server_group_refs,
                params.server_group_selector.as_ref(),
                TargetKind::ServerGroup,
            )
            .await?;

        Ok(resolved.apply(&mut params.server_groups, &mut params.server_group_refs))
    }

    fn remote_id(remote: &ApplicationServer) -> Option<&str> {
        remote.id.as_deref()
    }

    fn observation(remote: &ApplicationServer) -> ServerObservation {
        ServerObservation {
            id: remote.id.clone(),
            creation_time: remote.audit.creation_time.clone(),
            modified_by: remote.audit.modified_by.clone(),
            modified_time: remote.audit.modified_time.clone(),
        }
    }

    fn late_initialize(params: &mut ServerParameters, remote: &ApplicationServer) -> bool {
        let mut late_init = LateInit::new();
        late_init
            .string(&mut params.config_space, remote.config_space.as_deref())
            .toggle(&mut params.enabled, remote.enabled);
        late_init.mutated()
    }

    fn is_up_to_date(params: &ServerParameters, remote: &ApplicationServer) -> bool {
        Comparison::new("Server")
            .string("address", params.address.as_deref(), remote.address.as_deref())
            .string("configSpace", params.config_space.as_deref(), remote.config_space.as_deref())
            .string("description", params.description.as_deref(), remote.description.as_deref())
            .toggle("enabled", params.enabled, remote.enabled)
            .set("serverGroups", &params.server_groups, &remote.app_server_group_ids)
            .string("name", Some(params.name.as_str()), Some(remote.name.as_str()))
            .finish()
    }

    async fn payload(&self, _client: &ZpaClient) -> Result<ApplicationServer, ApiError> {
        Ok(self.desired(self.spec.for_provider.server_groups.clone()))
    }

    /// ZPA refuses to delete a server that is still a member of a server group
    async fn before_delete(&self, client: &ZpaClient, id: &str) -> Result<(), ApiError> {
        debug!("Detaching server {} from all server groups", id);
        client.update(id, &self.desired(Vec::new())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::zpa::testing::FakeTransport;
    use crate::client::Method;
    use crate::controller::external::ExternalClient;
    use crate::controller::reference::testing::FakeReader;
    use crate::crd::{ManagedResource, Reference, ServerSpec, Toggle};
    use serde_json::json;
    use std::sync::Arc;

    fn server(params: ServerParameters) -> Server {
        Server::new(
            "web-01",
            ServerSpec {
                for_provider: params,
                provider_config_ref: None,
                deletion_policy: Default::default(),
            },
        )
    }

    #[tokio::test]
    async fn test_delete_detaches_before_deleting() {
        let transport = Arc::new(FakeTransport::default());
        let client = ExternalClient::<Server>::new(ZpaClient::new(transport.clone(), "1"));
        let mut resource = server(ServerParameters {
            name: "web-01".to_string(),
            address: Some("10.0.0.1".to_string()),
            enabled: Toggle::True,
            server_groups: vec!["42".to_string()],
            ..Default::default()
        });
        resource.set_external_name("9");

        client.delete(&mut resource).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, Method::PUT);
        assert_eq!(requests[0].body.as_ref().unwrap()["appServerGroupIds"], json!([]));
        assert_eq!(requests[0].body.as_ref().unwrap()["address"], json!("10.0.0.1"));
        assert_eq!(requests[1].method, Method::DELETE);
        assert_eq!(requests[1].path, "mgmtconfig/v1/admin/customers/1/server/9");
    }

    #[tokio::test]
    async fn test_server_group_refs_resolve_into_ids() {
        let reader = FakeReader::default()
            .with(TargetKind::ServerGroup, "prod-group", Some("42"), &[]);
        let resolver = ReferenceResolver::new(Arc::new(reader));
        let mut resource = server(ServerParameters {
            name: "web-01".to_string(),
            server_group_refs: vec![Reference {
                name: "prod-group".to_string(),
            }],
            ..Default::default()
        });

        assert!(resource.resolve_references(&resolver).await.unwrap());
        assert_eq!(resource.spec.for_provider.server_groups, vec!["42".to_string()]);
        assert!(!resource.resolve_references(&resolver).await.unwrap());
    }

    #[test]
    fn test_group_membership_drift() {
        let params = ServerParameters {
            name: "web-01".to_string(),
            server_groups: vec!["42".to_string()],
            ..Default::default()
        };
        let remote = ApplicationServer {
            name: "web-01".to_string(),
            ..Default::default()
        };
        assert!(!Server::is_up_to_date(&params, &remote));
    }
}
