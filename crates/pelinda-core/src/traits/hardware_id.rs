// # Hardware Identifier Provider
//
// Supplies the machine identifier (HWID) that `validate_key` binds a license
// key or keyless session to when the caller does not pass one.
//
// ## Implementations
//
// - Platform lookup (wmic / machine-id / ioreg): `pelinda-hwid` crate
// - Fixed value: [`StaticHardwareId`]

use async_trait::async_trait;

/// Trait for hardware identifier sources
///
/// Lookups that read files or run system utilities must do so without
/// blocking the runtime. They must return the same identifier for the same
/// machine.
#[async_trait]
pub trait HardwareIdProvider: Send + Sync {
    /// Read the hardware identifier
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: A non-empty identifier
    /// - `Err(Error)`: If the identifier could not be determined
    async fn hardware_id(&self) -> Result<String, crate::Error>;
}

/// A provider that always returns the same identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticHardwareId(String);

impl StaticHardwareId {
    /// Create a provider for a fixed identifier
    pub fn new(hwid: impl Into<String>) -> Self {
        Self(hwid.into())
    }
}

#[async_trait]
impl HardwareIdProvider for StaticHardwareId {
    async fn hardware_id(&self) -> Result<String, crate::Error> {
        if self.0.trim().is_empty() {
            return Err(crate::Error::hardware_id("static hardware identifier is empty"));
        }
        Ok(self.0.clone())
    }
}
