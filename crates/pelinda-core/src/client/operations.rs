//! One method per API action
//!
//! Each public method is a thin wrapper: the private `*_inner` twin does the
//! work as a `Result` pipeline and `settle` turns it into an [`Outcome`].

use super::{
    require, settle, text_field, PelindaClient, DELETE_KEY, DELETE_KEYLESS, EXECUTION_COUNT,
    EXPAND_EXPIRATION, FETCH_GENERATED_KEY, FETCH_KEY, GENERATE_KEY, IDENTIFIER_CHECK,
    PUSH_EXECUTION_COUNT,
};
use crate::outcome::{
    Acknowledged, DeletedKey, ExecutionCount, ExtendedKey, FetchedRecord, GeneratedKeys,
    IdentifierService, Outcome,
};
use crate::request::{
    validate, CheckIdentifierRequest, DeleteKeyRequest, DeleteKeylessRequest,
    ExtendKeyExpirationRequest, FetchKeyRequest, GenerateKeyRequest, Target, ValidateKeyRequest,
};
use crate::traits::Method;
use crate::{Error, Result};
use serde_json::Value;

const EXECUTION_COUNT_FETCHED: &str = "Execution count fetched successfully";

impl PelindaClient {
    /// Read the execution counter of this API key
    pub async fn get_execution_count(&self) -> Outcome<ExecutionCount> {
        settle("get_execution_count", self.get_execution_count_inner().await)
    }

    async fn get_execution_count_inner(&self) -> Result<ExecutionCount> {
        let body = self
            .execute(
                self.request(Method::Get, Target::Api(EXECUTION_COUNT))
                    .query("apiKey", self.api_key.as_str()),
            )
            .await?;

        require(&body, &["executionCount"])?;
        let execution_count = body["executionCount"].as_i64().ok_or_else(|| {
            Error::invalid_response(EXECUTION_COUNT, "executionCount: expected an integer")
        })?;

        let message = match body.get("message") {
            Some(Value::String(m)) => m.clone(),
            _ => EXECUTION_COUNT_FETCHED.to_string(),
        };

        Ok(ExecutionCount {
            message,
            execution_count,
        })
    }

    /// Increment the execution counter by one
    ///
    /// The server must answer with `success: true` and a `message`.
    pub async fn increment_execution_count(&self) -> Outcome<Acknowledged> {
        settle(
            "increment_execution_count",
            self.increment_execution_count_inner().await,
        )
    }

    async fn increment_execution_count_inner(&self) -> Result<Acknowledged> {
        let body = self
            .execute(
                self.request(Method::Post, Target::Api(PUSH_EXECUTION_COUNT))
                    .query("apiKey", self.api_key.as_str()),
            )
            .await?;

        require(&body, &["message"])?;
        let message = text_field(&body, "message")?;

        if body.get("success") != Some(&Value::Bool(true)) {
            return Err(Error::rejected(PUSH_EXECUTION_COUNT, message));
        }

        Ok(Acknowledged { message })
    }

    /// Generate license keys
    ///
    /// # Validation
    ///
    /// - An explicit `api_key` must equal the client's key
    /// - `expire` must be a real `YYYY-MM-DD` date
    /// - `count` and `is_premium` are required
    /// - `expires_by_days_key` and `days_keys` go together
    pub async fn generate_key(&self, request: GenerateKeyRequest) -> Outcome<GeneratedKeys> {
        settle("generate_key", self.generate_key_inner(request).await)
    }

    async fn generate_key_inner(&self, mut request: GenerateKeyRequest) -> Result<GeneratedKeys> {
        validate::authorize(&mut request.api_key, &self.api_key)?;
        validate::run(&request, validate::GENERATE_KEY)?;

        let body = self
            .execute(
                self.request(Method::Post, Target::Api(GENERATE_KEY))
                    .json(&request)?,
            )
            .await?;

        require(&body, &["message", "generatedKeys"])?;
        let message = text_field(&body, "message")?;
        let generated_keys: Vec<String> = serde_json::from_value(body["generatedKeys"].clone())
            .map_err(|e| Error::invalid_response(GENERATE_KEY, format!("generatedKeys: {}", e)))?;

        tracing::info!("Generated {} key(s)", generated_keys.len());
        Ok(GeneratedKeys {
            message,
            generated_keys,
        })
    }

    /// Delete an activated key
    ///
    /// Keys that were never activated are refused by the server.
    pub async fn delete_key(&self, request: DeleteKeyRequest) -> Outcome<DeletedKey> {
        settle("delete_key", self.delete_key_inner(request).await)
    }

    async fn delete_key_inner(&self, mut request: DeleteKeyRequest) -> Result<DeletedKey> {
        validate::authorize(&mut request.api_key, &self.api_key)?;
        validate::run(&request, validate::DELETE_KEY)?;

        let body = self
            .execute(
                self.request(Method::Post, Target::Api(DELETE_KEY))
                    .json(&request)?,
            )
            .await?;

        require(&body, &["message"])?;
        Ok(DeletedKey {
            message: text_field(&body, "message")?,
            deleted_key: request.key_value.unwrap_or_default(),
        })
    }

    /// Look up which service an identifier belongs to
    pub async fn check_identifier(
        &self,
        request: CheckIdentifierRequest,
    ) -> Outcome<IdentifierService> {
        settle("check_identifier", self.check_identifier_inner(request).await)
    }

    async fn check_identifier_inner(
        &self,
        request: CheckIdentifierRequest,
    ) -> Result<IdentifierService> {
        validate::run(&request, validate::CHECK_IDENTIFIER)?;
        let identifier = request.identifier.unwrap_or_default();

        let body = self
            .execute(
                self.request(Method::Get, Target::Api(IDENTIFIER_CHECK))
                    .query("apiKey", self.api_key.as_str())
                    .query("identifier", identifier),
            )
            .await?;

        require(&body, &["message", "service"])?;
        Ok(IdentifierService {
            message: text_field(&body, "message")?,
            service: text_field(&body, "service")?,
        })
    }

    /// Push a key's expiration back by `days`
    pub async fn extend_key_expiration(
        &self,
        request: ExtendKeyExpirationRequest,
    ) -> Outcome<ExtendedKey> {
        settle(
            "extend_key_expiration",
            self.extend_key_expiration_inner(request).await,
        )
    }

    async fn extend_key_expiration_inner(
        &self,
        request: ExtendKeyExpirationRequest,
    ) -> Result<ExtendedKey> {
        validate::run(&request, validate::EXTEND_KEY_EXPIRATION)?;
        let key_value = request.key_value.unwrap_or_default();
        let days = request.days.unwrap_or_default();

        let mut body = self
            .execute(
                self.request(Method::Post, Target::Api(EXPAND_EXPIRATION))
                    .query("apiKey", self.api_key.as_str())
                    .query("keyValue", key_value)
                    .query("days", days.to_string()),
            )
            .await?;

        require(&body, &["message", "key"])?;
        Ok(ExtendedKey {
            message: text_field(&body, "message")?,
            key: body.remove("key").unwrap_or(Value::Null),
        })
    }

    /// Search activated keys; the whole response is returned
    pub async fn fetch_key(&self, request: FetchKeyRequest) -> Outcome<FetchedRecord> {
        settle(
            "fetch_key",
            self.fetch_record(FETCH_KEY, "key", request).await,
        )
    }

    /// Search generated (not yet activated) keys; the whole response is returned
    pub async fn fetch_generated_key(&self, request: FetchKeyRequest) -> Outcome<FetchedRecord> {
        settle(
            "fetch_generated_key",
            self.fetch_record(FETCH_GENERATED_KEY, "generatedKey", request)
                .await,
        )
    }

    async fn fetch_record(
        &self,
        path: &str,
        expected: &str,
        request: FetchKeyRequest,
    ) -> Result<FetchedRecord> {
        validate::run(&request, validate::FETCH_KEY)?;
        let search_term = request.search_term.unwrap_or_default();

        let result = self
            .execute(
                self.request(Method::Get, Target::Api(path))
                    .query("apiKey", self.api_key.as_str())
                    .query("fetch", search_term),
            )
            .await?;

        require(&result, &[expected])?;
        Ok(FetchedRecord { result })
    }

    /// Delete the keyless session bound to a HWID
    pub async fn delete_keyless(&self, request: DeleteKeylessRequest) -> Outcome<Acknowledged> {
        settle("delete_keyless", self.delete_keyless_inner(request).await)
    }

    async fn delete_keyless_inner(&self, mut request: DeleteKeylessRequest) -> Result<Acknowledged> {
        validate::authorize(&mut request.api_key, &self.api_key)?;
        validate::run(&request, validate::DELETE_KEYLESS)?;

        let body = self
            .execute(
                self.request(Method::Post, Target::Api(DELETE_KEYLESS))
                    .json(&request)?,
            )
            .await?;

        require(&body, &["message"])?;
        Ok(Acknowledged {
            message: text_field(&body, "message")?,
        })
    }

    /// Validate a key (or keyless session) for a service on this machine
    ///
    /// When `hwid` is omitted it is read from the attached
    /// [`HardwareIdProvider`](crate::traits::HardwareIdProvider); without a
    /// provider the request fails with a missing `hwid`.
    pub async fn validate_key(&self, request: ValidateKeyRequest) -> Outcome<FetchedRecord> {
        settle("validate_key", self.validate_key_inner(request).await)
    }

    async fn validate_key_inner(&self, request: ValidateKeyRequest) -> Result<FetchedRecord> {
        validate::run(&request, validate::VALIDATE_KEY)?;

        let key = request.effective_key().unwrap_or_default().to_string();
        let service = request.service.clone().unwrap_or_default();
        let hwid = match request.hwid.as_deref().map(str::trim) {
            Some(hwid) if !hwid.is_empty() => hwid.to_string(),
            _ => self.local_hardware_id().await?,
        };

        let result = self
            .execute(
                self.request(Method::Get, Target::Validation)
                    .query("key", key)
                    .query("service", service)
                    .query("hwid", hwid),
            )
            .await?;

        require(&result, &["V2_Authentication"])?;
        Ok(FetchedRecord { result })
    }

    async fn local_hardware_id(&self) -> Result<String> {
        let provider = self
            .hardware_id
            .as_ref()
            .ok_or_else(|| Error::missing_field("hwid"))?;

        let hwid = provider.hardware_id().await?;
        tracing::debug!("Using local hardware identifier");
        Ok(hwid)
    }
}
