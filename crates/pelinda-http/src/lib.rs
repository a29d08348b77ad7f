// # reqwest Transport
//
// This crate provides the production `Transport` for the Pelinda client.
//
// ## Behavior
//
// - ✅ Sends exactly one HTTP request per call
// - ✅ Returns every status code to the client unchanged (4xx/5xx are not errors here)
// - ✅ Percent-encodes query parameters
// - ✅ Strips URLs from transport errors (query strings carry the API key)
// - ❌ NO retry logic (every failure is terminal for that call)
// - ❌ NO timeout unless built with `ReqwestTransport::with_timeout`
//
// ## Usage
//
// ```rust,ignore
// let client = pelinda_http::connect(api_key).await?;
// let outcome = client.get_execution_count().await;
// ```

use async_trait::async_trait;
use pelinda_core::traits::{HttpRequest, HttpResponse, Method, Transport};
use pelinda_core::{ClientConfig, Error, PelindaClient, Result};
use std::sync::Arc;
use std::time::Duration;

/// Transport backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with reqwest's default settings
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Create a transport that gives up on requests after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Wrap an existing client (proxies, TLS settings, ...)
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::network(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read response: {}", e.without_url())))?;

        tracing::debug!("{} {} -> {}", request.method, request.url, status.as_u16());

        Ok(HttpResponse::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
            body,
        ))
    }

    fn transport_name(&self) -> &'static str {
        "reqwest"
    }
}

/// Verify `api_key` against the production API over reqwest
pub async fn connect(api_key: impl Into<String>) -> Result<PelindaClient> {
    connect_with_config(api_key, ClientConfig::default()).await
}

/// Verify `api_key` against a custom endpoint configuration over reqwest
pub async fn connect_with_config(
    api_key: impl Into<String>,
    config: ClientConfig,
) -> Result<PelindaClient> {
    let transport = Arc::new(ReqwestTransport::new()?);
    PelindaClient::connect_with_config(api_key, transport, config).await
}
