//! # HTTP Transport
//!
//! `reqwest` transport carrying the bearer token obtained from `/signin`.

use crate::client::{ApiError, ApiRequest, Transport};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, Instrument};
use zeroize::Zeroizing;

/// Bearer-authenticated HTTP transport rooted at `{scheme}://{host}{basepath}`
pub struct HttpTransport {
    http_client: reqwest::Client,
    base_url: String,
    access_token: Zeroizing<String>,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("access_token", &"***")
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Create a transport sharing an existing client (connection pool)
    pub fn with_client(
        http_client: reqwest::Client,
        base_url: impl Into<String>,
        access_token: Zeroizing<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Option<Value>, ApiError> {
        let url = self.url(&request.path);
        let span = tracing::debug_span!(
            "zpa.http",
            http.method = %request.method,
            http.path = %request.path,
            http.status = tracing::field::Empty
        );

        async move {
            let mut builder = self
                .http_client
                .request(request.method.clone(), &url)
                .bearer_auth(self.access_token.as_str())
                .header("accept", "application/json");
            if !request.query.is_empty() {
                builder = builder.query(&request.query);
            }
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            let response = builder.send().await?;
            let status = response.status();
            tracing::Span::current().record("http.status", status.as_u16());
            let text = response.text().await?;

            if !status.is_success() {
                debug!("ZPA API error response: {}", status);
                return Err(ApiError::from_response(status.as_u16(), &text));
            }

            if text.trim().is_empty() {
                return Ok(None);
            }
            serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| ApiError::Decode(e.to_string()))
        }
        .instrument(span)
        .await
    }
}
