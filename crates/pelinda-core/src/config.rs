//! Client configuration
//!
//! The defaults point at the production Panda Development API. Every field can
//! be overridden, which is how tests aim the client at a local mock server.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default base URL for all `/api/<path>` endpoints
pub const DEFAULT_BASE_URL: &str = "https://pandadevelopment.net/api";

/// Default URL of the versioned key validation endpoint
pub const DEFAULT_VALIDATION_URL: &str = "https://pandadevelopment.net/v2_validation";

/// Default value of the `Host` and `Alt-Used` headers
pub const DEFAULT_HOST: &str = "pandadevelopment.net";

/// Default `Accept-Language` header
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "fr,fr-FR;q=0.8,en-US;q=0.5,en;q=0.3";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL joined with each endpoint path
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Full URL of the key validation endpoint (not joined with `base_url`)
    #[serde(default = "default_validation_url")]
    pub validation_url: String,

    /// Value sent as `Host` and `Alt-Used`; `None` leaves both to the transport
    #[serde(default = "default_host")]
    pub host: Option<String>,

    /// Value sent as `Accept-Language`
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Headers applied after the fixed set, replacing same-named ones
    #[serde(default)]
    pub extra_headers: BTreeMap<String, String>,
}

impl ClientConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            base_url: default_base_url(),
            validation_url: default_validation_url(),
            host: default_host(),
            accept_language: default_accept_language(),
            extra_headers: BTreeMap::new(),
        }
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the validation endpoint URL
    pub fn with_validation_url(mut self, validation_url: impl Into<String>) -> Self {
        self.validation_url = validation_url.into();
        self
    }

    /// Set or clear the `Host` / `Alt-Used` value
    pub fn with_host(mut self, host: Option<String>) -> Self {
        self.host = host;
        self
    }

    /// Add a header override
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(name.into(), value.into());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        validate_url("base_url", &self.base_url)?;
        validate_url("validation_url", &self.validation_url)?;

        if let Some(host) = &self.host {
            if host.trim().is_empty() {
                return Err(crate::Error::config("host cannot be empty when set"));
            }
        }

        if self.extra_headers.keys().any(|k| k.trim().is_empty()) {
            return Err(crate::Error::config("header names cannot be empty"));
        }

        Ok(())
    }

    /// Join an endpoint path onto the base URL
    pub fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_url(field: &str, url: &str) -> Result<(), crate::Error> {
    if url.is_empty() {
        return Err(crate::Error::config(format!("{} cannot be empty", field)));
    }
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(crate::Error::config(format!(
            "{} must start with http:// or https://, got {}",
            field, url
        )));
    }
    Ok(())
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_validation_url() -> String {
    DEFAULT_VALIDATION_URL.to_string()
}

fn default_host() -> Option<String> {
    Some(DEFAULT_HOST.to_string())
}

fn default_accept_language() -> String {
    DEFAULT_ACCEPT_LANGUAGE.to_string()
}
