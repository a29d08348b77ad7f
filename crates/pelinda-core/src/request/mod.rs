//! Request building
//!
//! [`RequestBuilder`] turns an endpoint and operation inputs into an
//! [`HttpRequest`] carrying the fixed vendor header set. The operation input
//! types live in [`bodies`] and their checks in [`validate`].

pub mod bodies;
pub mod validate;

pub use bodies::{
    CheckIdentifierRequest, DeleteKeyRequest, DeleteKeylessRequest, ExtendKeyExpirationRequest,
    FetchKeyRequest, GenerateKeyRequest, ValidateKeyRequest, KEYLESS_SENTINEL,
};

use crate::config::ClientConfig;
use crate::traits::{HttpRequest, Method};
use crate::Result;
use serde::Serialize;

/// Where a request is aimed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    /// A path under the configured base URL
    Api(&'a str),
    /// The versioned validation endpoint
    Validation,
}

/// Builds requests against one client configuration
#[derive(Debug)]
pub struct RequestBuilder<'a> {
    config: &'a ClientConfig,
    method: Method,
    target: Target<'a>,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl<'a> RequestBuilder<'a> {
    /// Start a request with the fixed header set applied
    pub fn new(config: &'a ClientConfig, method: Method, target: Target<'a>) -> Self {
        let mut builder = Self {
            config,
            method,
            target,
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        };

        if let Some(host) = &config.host {
            builder = builder.header("Host", host.as_str());
        }
        builder = builder
            .header("Accept", "*/*")
            .header("Accept-Language", config.accept_language.as_str())
            .header("Content-Type", "application/json");
        if let Some(host) = &config.host {
            builder = builder.header("Alt-Used", host.as_str());
        }
        for (name, value) in &config.extra_headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }

    /// Set a header, replacing any header with the same name
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&name))
        {
            Some(existing) => *existing = (name, value),
            None => self.headers.push((name, value)),
        }
        self
    }

    /// Append a query parameter
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Serialize `body` as the JSON request body
    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_string(body)?);
        Ok(self)
    }

    /// Label used in messages and logs; never contains the query string
    pub fn endpoint(&self) -> String {
        endpoint_label(self.config, self.target)
    }

    /// Finish the request
    pub fn build(self) -> HttpRequest {
        let url = match self.target {
            Target::Api(path) => self.config.endpoint_url(path),
            Target::Validation => self.config.validation_url.clone(),
        };
        HttpRequest {
            method: self.method,
            url,
            query: self.query,
            headers: self.headers,
            body: self.body,
        }
    }
}

/// Label for a target as it appears in failure messages
pub fn endpoint_label(config: &ClientConfig, target: Target<'_>) -> String {
    match target {
        Target::Api(path) => path.trim_start_matches('/').to_string(),
        Target::Validation => config.validation_url.clone(),
    }
}
