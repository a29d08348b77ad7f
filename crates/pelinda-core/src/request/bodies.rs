//! Operation inputs
//!
//! One structure per operation, enumerating every field the vendor endpoint
//! recognizes. Required fields are still `Option` so that an incomplete input
//! is representable and rejected by validation instead of at compile time;
//! the constructors fill every required field.
//!
//! The structures that are sent as JSON bodies serialize with the vendor's
//! camelCase names.

use serde::{Serialize, Serializer};

/// Key value sent by `validate_key` in keyless mode
pub const KEYLESS_SENTINEL: &str = "keyless";

/// Input of `generate_key` (`POST generate-key/post`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateKeyRequest {
    /// Must equal the client's key when set; injected when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Expiration date, `YYYY-MM-DD` (required)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire: Option<String>,

    /// Free-form note attached to the generated keys
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Number of keys to generate, at least 1 (required)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,

    /// Premium flag (required); sent as `"true"` / `"false"`
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "bool_as_string"
    )]
    pub is_premium: Option<bool>,

    /// Keys expire a number of days after activation instead of on `expire`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_by_days_key: Option<bool>,

    /// Lifetime in days; required together with `expires_by_days_key`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_keys: Option<u32>,
}

impl GenerateKeyRequest {
    /// Create a request with every required field set
    pub fn new(expire: impl Into<String>, count: u32, is_premium: bool) -> Self {
        Self {
            expire: Some(expire.into()),
            count: Some(count),
            is_premium: Some(is_premium),
            ..Self::default()
        }
    }

    /// Attach a note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Make keys expire `days` days after activation
    pub fn with_days_key(mut self, days: u32) -> Self {
        self.expires_by_days_key = Some(true);
        self.days_keys = Some(days);
        self
    }

    /// Pass an explicit API key (must match the client's)
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// Input of `delete_key` (`POST key/delete`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteKeyRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Activated key to delete (required)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_value: Option<String>,
}

impl DeleteKeyRequest {
    pub fn new(key_value: impl Into<String>) -> Self {
        Self {
            api_key: None,
            key_value: Some(key_value.into()),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// Input of `delete_keyless` (`POST keyless/delete`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteKeylessRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Hardware identifier of the keyless session (required)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hwid: Option<String>,
}

impl DeleteKeylessRequest {
    pub fn new(hwid: impl Into<String>) -> Self {
        Self {
            api_key: None,
            hwid: Some(hwid.into()),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// Input of `check_identifier` (`GET identifier-check`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckIdentifierRequest {
    /// Service identifier to look up (required)
    pub identifier: Option<String>,
}

impl CheckIdentifierRequest {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: Some(identifier.into()),
        }
    }
}

/// Input of `extend_key_expiration` (`POST key/expand-expiration`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtendKeyExpirationRequest {
    /// Key to extend (required)
    pub key_value: Option<String>,
    /// Days to add, at least 1 (required)
    pub days: Option<u32>,
}

impl ExtendKeyExpirationRequest {
    pub fn new(key_value: impl Into<String>, days: u32) -> Self {
        Self {
            key_value: Some(key_value.into()),
            days: Some(days),
        }
    }
}

/// Input of `fetch_key` and `fetch_generated_key`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchKeyRequest {
    /// Key value, note or HWID to search for (required)
    pub search_term: Option<String>,
}

impl FetchKeyRequest {
    pub fn new(search_term: impl Into<String>) -> Self {
        Self {
            search_term: Some(search_term.into()),
        }
    }
}

/// Input of `validate_key` (`GET v2_validation`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidateKeyRequest {
    /// Key to validate; required unless `keyless` is set
    pub key_value: Option<String>,
    /// Service identifier the key belongs to (required)
    pub service: Option<String>,
    /// Machine to bind to; read from the hardware identifier provider when unset
    pub hwid: Option<String>,
    /// Authenticate by HWID alone, sending [`KEYLESS_SENTINEL`] as the key
    pub keyless: bool,
}

impl ValidateKeyRequest {
    /// Validate a license key for a service
    pub fn new(key_value: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            key_value: Some(key_value.into()),
            service: Some(service.into()),
            hwid: None,
            keyless: false,
        }
    }

    /// Validate a keyless session for a service
    pub fn keyless(service: impl Into<String>) -> Self {
        Self {
            key_value: None,
            service: Some(service.into()),
            hwid: None,
            keyless: true,
        }
    }

    /// Use an explicit hardware identifier
    pub fn with_hwid(mut self, hwid: impl Into<String>) -> Self {
        self.hwid = Some(hwid.into());
        self
    }

    /// Key value that goes on the wire
    pub(crate) fn effective_key(&self) -> Option<&str> {
        if self.keyless {
            Some(KEYLESS_SENTINEL)
        } else {
            self.key_value.as_deref()
        }
    }
}

fn bool_as_string<S: Serializer>(value: &Option<bool>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(flag) => serializer.serialize_str(if *flag { "true" } else { "false" }),
        None => serializer.serialize_none(),
    }
}
