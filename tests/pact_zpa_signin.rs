//! Pact contract tests for the ZPA token exchange
//!
//! `POST /signin` with form-encoded client credentials answers with a bearer
//! token used for every management API call.

mod common;

use common::{base_url, init_rustls};
use pact_consumer::prelude::*;
use serde_json::json;
use zpa_provider::controller::credentials::{ConnectError, Endpoint, HttpTokenSource, TokenSource};

#[tokio::test]
async fn test_signin_returns_access_token() {
    init_rustls();
    let mut pact_builder = PactBuilder::new("ZPA-Provider", "ZPA-API");

    pact_builder.interaction("exchange client credentials for a token", "", |mut i| {
        i.given("an API client zpa-client exists");
        i.request
            .method("POST")
            .path("/signin")
            .header("content-type", "application/x-www-form-urlencoded")
            .body("client_id=zpa-client&client_secret=s3cr3t");
        i.response
            .status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "token_type": "Bearer",
                "access_token": "token-abc",
                "expires_in": "3600"
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let endpoint = Endpoint::new(&base_url(&mock_server.url()), None);

    let tokens = HttpTokenSource::new(reqwest::Client::new());
    let token = tokens
        .exchange(&endpoint, "zpa-client", "s3cr3t")
        .await
        .expect("token exchange should succeed");

    assert_eq!(token.as_str(), "token-abc");
}

#[tokio::test]
async fn test_signin_rejected_without_leaking_secret() {
    init_rustls();
    let mut pact_builder = PactBuilder::new("ZPA-Provider", "ZPA-API");

    pact_builder.interaction("reject unknown client credentials", "", |mut i| {
        i.given("no API client named revoked-client exists");
        i.request
            .method("POST")
            .path("/signin")
            .header("content-type", "application/x-www-form-urlencoded")
            .body("client_id=revoked-client&client_secret=very-secret-value");
        i.response
            .status(401)
            .header("content-type", "application/json")
            .json_body(json!({
                "id": "authentication.failed",
                "reason": "Invalid client credentials"
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let endpoint = Endpoint::new(&base_url(&mock_server.url()), None);

    let tokens = HttpTokenSource::new(reqwest::Client::new());
    let error = tokens
        .exchange(&endpoint, "revoked-client", "very-secret-value")
        .await
        .expect_err("token exchange should fail");

    assert!(matches!(error, ConnectError::AuthExchangeFailed { .. }));
    let message = error.to_string();
    assert!(message.contains("401"), "{message}");
    assert!(!message.contains("very-secret-value"), "{message}");
}
