//! # ZPA Client
//!
//! Typed access to the ZPA management API.
//!
//! - `Transport`: the seam every request goes through; [`HttpTransport`] in production
//! - `ZpaClient`: typed get/add/update/delete on top of a transport
//! - `models`: JSON wire models
//! - `error`: [`ApiError`] and not-found classification

use async_trait::async_trait;
use serde_json::Value;

mod common;
pub mod error;
pub mod http;
pub mod models;
pub mod zpa;

pub use error::ApiError;
pub use http::HttpTransport;
pub use models::{
    AppConnectorGroup, ApplicationResource, ApplicationServer, NamedReference, RemoteObject,
    SegmentGroupResource, ServerGroupResource,
};
pub use reqwest::Method;
pub use zpa::ZpaClient;

/// One call against the management API
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base URL, without a leading slash
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Authenticated channel to the ZPA API
///
/// Returns the decoded JSON body, or `None` when the response had no body.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    async fn send(&self, request: ApiRequest) -> Result<Option<Value>, ApiError>;
}
