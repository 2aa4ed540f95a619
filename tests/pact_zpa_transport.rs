//! Pact contract tests for the ZPA management API transport
//!
//! Covers the calls the reconciler depends on: describe, the two shapes of
//! not-found, create with a JSON payload and forced deletion.

mod common;

use common::{base_url, init_rustls};
use pact_consumer::prelude::*;
use serde_json::json;
use std::sync::Arc;
use zeroize::Zeroizing;
use zpa_provider::client::{
    ApplicationResource, HttpTransport, SegmentGroupResource, ServerGroupResource, ZpaClient,
};

const CUSTOMER: &str = "216196257331281920";
const PREFIX: &str = "/mgmtconfig/v1/admin/customers/216196257331281920";

fn client_for(url: &impl std::fmt::Display) -> ZpaClient {
    let transport = HttpTransport::with_client(
        reqwest::Client::new(),
        base_url(url),
        Zeroizing::new("token-abc".to_string()),
    );
    ZpaClient::new(Arc::new(transport), CUSTOMER)
}

#[tokio::test]
async fn test_get_segment_group_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new("ZPA-Provider", "ZPA-API");

    pact_builder.interaction("describe a segment group", "", |mut i| {
        i.given("segment group 72058304855015574 exists");
        i.request
            .method("GET")
            .path(format!("{PREFIX}/segmentGroup/72058304855015574"))
            .header("authorization", "Bearer token-abc");
        i.response
            .status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "id": "72058304855015574",
                "name": "corp-apps",
                "enabled": true,
                "configSpace": "DEFAULT",
                "policyMigrated": true,
                "tcpKeepAliveEnabled": "1",
                "creationTime": "1670000000"
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let group: SegmentGroupResource = client_for(&mock_server.url())
        .get("72058304855015574")
        .await
        .expect("describe should succeed");

    assert_eq!(group.name, "corp-apps");
    assert!(group.enabled);
    assert_eq!(group.config_space.as_deref(), Some("DEFAULT"));
    assert_eq!(group.tcp_keep_alive_enabled.as_deref(), Some("1"));
}

#[tokio::test]
async fn test_missing_server_group_reported_as_400_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new("ZPA-Provider", "ZPA-API");

    pact_builder.interaction("describe a deleted server group", "", |mut i| {
        i.given("server group 999 does not exist");
        i.request
            .method("GET")
            .path(format!("{PREFIX}/serverGroup/999"))
            .header("authorization", "Bearer token-abc");
        i.response
            .status(400)
            .header("content-type", "application/json")
            .json_body(json!({
                "id": "resource.not.found",
                "reason": "Resource not found"
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let error = client_for(&mock_server.url())
        .get::<ServerGroupResource>("999")
        .await
        .expect_err("describe should fail");

    assert_eq!(error.status(), Some(400));
    assert!(error.is_not_found(), "{error}");
}

#[tokio::test]
async fn test_missing_application_reported_as_404_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new("ZPA-Provider", "ZPA-API");

    pact_builder.interaction("describe an unknown application segment", "", |mut i| {
        i.given("application 12345 does not exist");
        i.request
            .method("GET")
            .path(format!("{PREFIX}/application/12345"))
            .header("authorization", "Bearer token-abc");
        i.response.status(404);
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let error = client_for(&mock_server.url())
        .get::<ApplicationResource>("12345")
        .await
        .expect_err("describe should fail");

    assert!(error.is_not_found(), "{error}");
}

#[tokio::test]
async fn test_create_segment_group_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new("ZPA-Provider", "ZPA-API");

    pact_builder.interaction("create a segment group", "", |mut i| {
        i.given("the tenant exists");
        i.request
            .method("POST")
            .path(format!("{PREFIX}/segmentGroup"))
            .header("authorization", "Bearer token-abc")
            .header("content-type", "application/json")
            .json_body(json!({
                "name": "corp-apps",
                "enabled": true,
                "policyMigrated": false
            }));
        i.response
            .status(201)
            .header("content-type", "application/json")
            .json_body(json!({
                "id": "72058304855015574",
                "name": "corp-apps",
                "enabled": true,
                "configSpace": "DEFAULT",
                "policyMigrated": false
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let desired = SegmentGroupResource {
        name: "corp-apps".to_string(),
        enabled: true,
        ..Default::default()
    };
    let created = client_for(&mock_server.url())
        .add(&desired)
        .await
        .expect("create should succeed");

    assert_eq!(created.id.as_deref(), Some("72058304855015574"));
    assert_eq!(created.config_space.as_deref(), Some("DEFAULT"));
}

#[tokio::test]
async fn test_force_delete_application_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new("ZPA-Provider", "ZPA-API");

    pact_builder.interaction("force delete an application segment", "", |mut i| {
        i.given("application 216196257331292000 exists");
        i.request
            .method("DELETE")
            .path(format!("{PREFIX}/application/216196257331292000"))
            .query_param("forceDelete", "true")
            .header("authorization", "Bearer token-abc");
        i.response.status(204);
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    client_for(&mock_server.url())
        .delete::<ApplicationResource>("216196257331292000", true)
        .await
        .expect("delete should succeed");
}
