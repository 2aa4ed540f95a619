//! # ZPA Client
//!
//! Typed CRUD over the customer-scoped management API.

use crate::client::common::OperationTracker;
use crate::client::models::RemoteObject;
use crate::client::{ApiError, ApiRequest, Method, Transport};
use crate::constants::MGMT_API_PREFIX;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info_span, Instrument};

/// Client for one ZPA tenant
#[derive(Debug, Clone)]
pub struct ZpaClient {
    transport: Arc<dyn Transport>,
    customer_id: String,
}

impl ZpaClient {
    pub fn new(transport: Arc<dyn Transport>, customer_id: impl Into<String>) -> Self {
        Self {
            transport,
            customer_id: customer_id.into(),
        }
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    fn path<T: RemoteObject>(&self, id: Option<&str>) -> String {
        match id {
            Some(id) => format!(
                "{MGMT_API_PREFIX}/{}/{}/{}",
                self.customer_id,
                T::COLLECTION,
                id
            ),
            None => format!("{MGMT_API_PREFIX}/{}/{}", self.customer_id, T::COLLECTION),
        }
    }

    async fn call(
        &self,
        collection: &'static str,
        operation: &'static str,
        request: ApiRequest,
    ) -> Result<Option<Value>, ApiError> {
        let span = info_span!(
            "zpa.api",
            zpa.customer = %self.customer_id(),
            zpa.collection = collection,
            zpa.operation = operation,
            operation.success = tracing::field::Empty,
            operation.duration_ms = tracing::field::Empty,
            error.message = tracing::field::Empty,
            error.status = tracing::field::Empty
        );
        let tracker = OperationTracker::new(span.clone(), collection, operation);
        let result = self.transport.send(request).instrument(span).await;
        match &result {
            Ok(_) => tracker.record_success(),
            Err(e) => tracker.record_error(e),
        }
        result
    }

    /// `GET /{collection}/{id}`
    pub async fn get<T: RemoteObject>(&self, id: &str) -> Result<T, ApiError> {
        let request = ApiRequest::new(Method::GET, self.path::<T>(Some(id)));
        let body = self
            .call(T::COLLECTION, "get", request)
            .await?
            .ok_or_else(|| ApiError::Decode(format!("empty body for {} {id}", T::COLLECTION)))?;
        serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// `POST /{collection}`, returning the created object
    pub async fn add<T: RemoteObject>(&self, object: &T) -> Result<T, ApiError> {
        let body = serde_json::to_value(object).map_err(|e| ApiError::Decode(e.to_string()))?;
        let request = ApiRequest::new(Method::POST, self.path::<T>(None)).with_body(body);
        let created = self
            .call(T::COLLECTION, "add", request)
            .await?
            .ok_or_else(|| ApiError::Decode(format!("empty body creating {}", T::COLLECTION)))?;
        serde_json::from_value(created).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// `PUT /{collection}/{id}` with the full representation
    pub async fn update<T: RemoteObject>(&self, id: &str, object: &T) -> Result<(), ApiError> {
        let body = serde_json::to_value(object).map_err(|e| ApiError::Decode(e.to_string()))?;
        let request = ApiRequest::new(Method::PUT, self.path::<T>(Some(id))).with_body(body);
        self.call(T::COLLECTION, "update", request).await?;
        Ok(())
    }

    /// `DELETE /{collection}/{id}`; `force` adds `forceDelete=true`
    pub async fn delete<T: RemoteObject>(&self, id: &str, force: bool) -> Result<(), ApiError> {
        let mut request = ApiRequest::new(Method::DELETE, self.path::<T>(Some(id)));
        if force {
            request = request.with_query("forceDelete", "true");
        }
        self.call(T::COLLECTION, "delete", request).await?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeTransport;
    use super::*;
    use crate::client::{ApplicationResource, ApplicationServer};
    use serde_json::json;

    #[tokio::test]
    async fn test_get_builds_customer_scoped_path() {
        let transport = Arc::new(FakeTransport::default());
        transport.respond_json(json!({"id": "9", "name": "web-01", "address": "10.0.0.1"}));
        let client = ZpaClient::new(transport.clone(), "216196257331281920");

        let server: ApplicationServer = client.get("9").await.unwrap();

        assert_eq!(server.address.as_deref(), Some("10.0.0.1"));
        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::GET);
        assert_eq!(
            requests[0].path,
            "mgmtconfig/v1/admin/customers/216196257331281920/server/9"
        );
    }

    #[tokio::test]
    async fn test_force_delete_adds_query() {
        let transport = Arc::new(FakeTransport::default());
        let client = ZpaClient::new(transport.clone(), "1");

        client.delete::<ApplicationResource>("5", true).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::DELETE);
        assert_eq!(
            requests[0].query,
            vec![("forceDelete".to_string(), "true".to_string())]
        );
    }

    #[tokio::test]
    async fn test_get_with_empty_body_is_decode_error() {
        let transport = Arc::new(FakeTransport::default());
        let client = ZpaClient::new(transport, "1");

        let err = client.get::<ApplicationServer>("9").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
