// # Transport Trait
//
// Defines the interface the client uses to put a request on the wire.
//
// ## Implementations
//
// - reqwest: `pelinda-http` crate
// - Test doubles: `tests/common/mod.rs`
//
// ## Usage
//
// ```rust,ignore
// use pelinda_core::traits::{HttpRequest, Method, Transport};
//
// let request = HttpRequest::new(Method::Get, "https://pandadevelopment.net/api/execution-count")
//     .with_query("apiKey", api_key);
// let response = transport.send(request).await?;
// println!("{} {}", response.status, response.body);
// ```

use async_trait::async_trait;

/// HTTP method used by the vendor API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    /// Upper-case method name as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully built request, ready for a transport to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method
    pub method: Method,
    /// URL without query string
    pub url: String,
    /// Query parameters, unencoded; the transport encodes them
    pub query: Vec<(String, String)>,
    /// Headers in send order, names unique case-insensitively
    pub headers: Vec<(String, String)>,
    /// Serialized JSON body
    pub body: Option<String>,
}

impl HttpRequest {
    /// Create a request with no query, headers or body
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Append a query parameter
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Look up a query parameter by name
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a header by name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response handed back by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Reason phrase for the status (may be empty)
    pub status_text: String,
    /// Response body as text
    pub body: String,
}

impl HttpResponse {
    /// Create a response
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: body.into(),
        }
    }

    /// `true` for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for HTTP transports
///
/// A transport sends exactly one request per call. It must not retry, and it
/// reports connection-level failures as `Error::Network`; status codes are
/// returned as-is and interpreted by the client.
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return the raw response
    ///
    /// # Returns
    ///
    /// - `Ok(HttpResponse)`: Any response the server produced, including 4xx/5xx
    /// - `Err(Error)`: If no response was received
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, crate::Error>;

    /// Get the transport name (for logging/debugging)
    fn transport_name(&self) -> &'static str;
}
