// # Pelinda Client
//
// Authenticated client for the Panda Development license-key API.
//
// ## Lifecycle
//
// 1. `PelindaClient::connect` sends a probe to `execution-count` with the API key
// 2. A non-success status rejects the key (`Error::InvalidApiKey`)
// 3. The returned client is immutable; operations never fail with `Err`
//
// ## Request Contract
//
// - ONE HTTP request per operation, no retries, no background tasks
// - Inputs are validated before anything is sent
// - The API key NEVER appears in logs or failure messages
//
// ## API Reference
//
// - `GET  /api/execution-count?apiKey=...`
// - `POST /api/push-execution-count?apiKey=...`
// - `POST /api/generate-key/post`
// - `POST /api/key/delete`
// - `GET  /api/identifier-check?apiKey=...&identifier=...`
// - `POST /api/key/expand-expiration?apiKey=...&keyValue=...&days=...`
// - `GET  /api/key/fetch?apiKey=...&fetch=...`
// - `GET  /api/generated-key/fetch?apiKey=...&fetch=...`
// - `POST /api/keyless/delete`
// - `GET  /v2_validation?key=...&service=...&hwid=...`

mod operations;

use crate::config::ClientConfig;
use crate::outcome::Outcome;
use crate::request::{RequestBuilder, Target};
use crate::traits::{HardwareIdProvider, Method, Transport};
use crate::{Error, Result};
use serde_json::{Map, Value};
use std::sync::Arc;

pub(crate) const EXECUTION_COUNT: &str = "execution-count";
pub(crate) const PUSH_EXECUTION_COUNT: &str = "push-execution-count";
pub(crate) const GENERATE_KEY: &str = "generate-key/post";
pub(crate) const DELETE_KEY: &str = "key/delete";
pub(crate) const IDENTIFIER_CHECK: &str = "identifier-check";
pub(crate) const EXPAND_EXPIRATION: &str = "key/expand-expiration";
pub(crate) const FETCH_KEY: &str = "key/fetch";
pub(crate) const FETCH_GENERATED_KEY: &str = "generated-key/fetch";
pub(crate) const DELETE_KEYLESS: &str = "keyless/delete";

/// Client for the license-key API
///
/// Cloning is cheap: the transport, configuration and provider are shared.
/// The client is `Send + Sync`; concurrent operations are independent.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API key.
#[derive(Clone)]
pub struct PelindaClient {
    /// Verified API key
    /// ⚠️ NEVER log this value
    api_key: String,

    config: Arc<ClientConfig>,

    transport: Arc<dyn Transport>,

    /// Source of the HWID for `validate_key` when the caller omits it
    hardware_id: Option<Arc<dyn HardwareIdProvider>>,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for PelindaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PelindaClient")
            .field("api_key", &"<REDACTED>")
            .field("config", &self.config)
            .field("transport", &self.transport.transport_name())
            .field("hardware_id", &self.hardware_id.is_some())
            .finish()
    }
}

impl PelindaClient {
    /// Verify `api_key` against the production API and build a client
    ///
    /// # Returns
    ///
    /// - `Ok(PelindaClient)`: The server accepted the key
    /// - `Err(Error::InvalidApiKey)`: The probe returned a non-success status
    /// - `Err(Error::RequestFailed)`: The probe never got a response
    /// - `Err(Error::Config)`: The key is empty
    pub async fn connect(api_key: impl Into<String>, transport: Arc<dyn Transport>) -> Result<Self> {
        Self::connect_with_config(api_key, transport, ClientConfig::default()).await
    }

    /// Verify `api_key` and build a client with a custom configuration
    pub async fn connect_with_config(
        api_key: impl Into<String>,
        transport: Arc<dyn Transport>,
        config: ClientConfig,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::config("API key cannot be empty"));
        }
        config.validate()?;

        let client = Self {
            api_key,
            config: Arc::new(config),
            transport,
            hardware_id: None,
        };

        let probe = client
            .request(Method::Get, Target::Api(EXECUTION_COUNT))
            .query("apiKey", client.api_key.as_str());
        let endpoint = probe.endpoint();

        let response = client
            .transport
            .send(probe.build())
            .await
            .map_err(|e| Error::request_failed(&endpoint, &e))?;

        if !response.is_success() {
            tracing::warn!(
                "API key rejected by {}: {} {}",
                endpoint,
                response.status,
                response.status_text
            );
            return Err(Error::InvalidApiKey);
        }

        tracing::info!(
            "API key verified (transport: {})",
            client.transport.transport_name()
        );
        Ok(client)
    }

    /// Attach the provider used by `validate_key` when no HWID is given
    pub fn with_hardware_id_provider(mut self, provider: Arc<dyn HardwareIdProvider>) -> Self {
        self.hardware_id = Some(provider);
        self
    }

    /// The verified API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The configuration in use
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request<'a>(&'a self, method: Method, target: Target<'a>) -> RequestBuilder<'a> {
        RequestBuilder::new(&self.config, method, target)
    }

    /// Send a request and return its JSON object body
    ///
    /// Fails on transport errors, non-success statuses and bodies that are
    /// not a JSON object. Field checks are left to the caller.
    async fn execute(&self, builder: RequestBuilder<'_>) -> Result<Map<String, Value>> {
        let endpoint = builder.endpoint();
        let request = builder.build();

        tracing::debug!("{} {}", request.method, endpoint);

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| Error::request_failed(&endpoint, &e))?;

        if !response.is_success() {
            return Err(Error::http(endpoint, response.status, response.status_text));
        }

        let json: Value = serde_json::from_str(&response.body)
            .map_err(|e| Error::invalid_response(&endpoint, e.to_string()))?;

        match json {
            Value::Object(body) => Ok(body),
            other => Err(Error::invalid_response(
                &endpoint,
                format!("expected a JSON object, got {}", json_kind(&other)),
            )),
        }
    }
}

/// Log a failed operation and wrap its result
fn settle<T>(operation: &str, result: Result<T>) -> Outcome<T> {
    if let Err(e) = &result {
        tracing::warn!("{} failed: {}", operation, e);
    }
    result.into()
}

/// Fail unless every field is present and non-null, naming all that are absent
fn require(body: &Map<String, Value>, fields: &[&str]) -> Result<()> {
    let missing: Vec<&str> = fields
        .iter()
        .copied()
        .filter(|f| body.get(*f).is_none_or(Value::is_null))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::missing_response_fields(missing))
    }
}

/// Read a field as text; non-string values are rendered as JSON
fn text_field(body: &Map<String, Value>, field: &str) -> Result<String> {
    match body.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Null) | None => Err(Error::missing_response_fields([field])),
        Some(other) => Ok(other.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
