// # Machine UUID Provider
//
// This crate provides the platform lookup behind `HardwareIdProvider`.
//
// ## Platform Support
//
// - Windows: `wmic csproduct get uuid` (SMBIOS system UUID)
// - Linux: `/sys/class/dmi/id/product_uuid`, then `/etc/machine-id`,
//   then `/var/lib/dbus/machine-id`
// - macOS: `IOPlatformUUID` from `ioreg -rd1 -c IOPlatformExpertDevice`
// - Anything else: always an error; pass `hwid` explicitly or use
//   `StaticHardwareId`
//
// The lookup runs on every call without blocking the runtime; nothing is
// cached.

use async_trait::async_trait;
use pelinda_core::traits::HardwareIdProvider;
use pelinda_core::{Error, Result};
use std::path::PathBuf;

#[cfg(any(target_os = "windows", target_os = "macos"))]
use tokio::process::Command;

/// Linux identifier files, most specific first
pub const LINUX_ID_FILES: &[&str] = &[
    "/sys/class/dmi/id/product_uuid",
    "/etc/machine-id",
    "/var/lib/dbus/machine-id",
];

/// Reads this machine's identifier with the platform's native mechanism
#[derive(Debug, Clone, Copy, Default)]
pub struct MachineUuidProvider;

impl MachineUuidProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HardwareIdProvider for MachineUuidProvider {
    async fn hardware_id(&self) -> Result<String> {
        platform_hardware_id().await
    }
}

#[cfg(target_os = "windows")]
async fn platform_hardware_id() -> Result<String> {
    let output = Command::new("wmic")
        .args(["csproduct", "get", "uuid"])
        .output()
        .await
        .map_err(|e| Error::hardware_id(format!("failed to run wmic: {}", e)))?;

    if !output.status.success() {
        return Err(Error::hardware_id(format!(
            "wmic exited with {}",
            output.status
        )));
    }

    parse_wmic_output(&String::from_utf8_lossy(&output.stdout))
        .ok_or_else(|| Error::hardware_id("wmic returned no UUID"))
}

#[cfg(target_os = "linux")]
async fn platform_hardware_id() -> Result<String> {
    FileHardwareId::new(LINUX_ID_FILES.iter().copied().map(PathBuf::from))
        .hardware_id()
        .await
}

#[cfg(target_os = "macos")]
async fn platform_hardware_id() -> Result<String> {
    let output = Command::new("ioreg")
        .args(["-rd1", "-c", "IOPlatformExpertDevice"])
        .output()
        .await
        .map_err(|e| Error::hardware_id(format!("failed to run ioreg: {}", e)))?;

    parse_ioreg_output(&String::from_utf8_lossy(&output.stdout))
        .ok_or_else(|| Error::hardware_id("ioreg returned no IOPlatformUUID"))
}

#[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
async fn platform_hardware_id() -> Result<String> {
    Err(Error::hardware_id(format!(
        "no hardware identifier lookup for {}",
        std::env::consts::OS
    )))
}

/// Reads the first non-empty file out of a list of candidates
#[derive(Debug, Clone)]
pub struct FileHardwareId {
    paths: Vec<PathBuf>,
}

impl FileHardwareId {
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            paths: paths.into_iter().collect(),
        }
    }
}

#[async_trait]
impl HardwareIdProvider for FileHardwareId {
    async fn hardware_id(&self) -> Result<String> {
        for path in &self.paths {
            match tokio::fs::read_to_string(path).await {
                Ok(content) => {
                    let id = content.trim();
                    if !id.is_empty() {
                        tracing::debug!("Hardware identifier read from {}", path.display());
                        return Ok(id.to_string());
                    }
                }
                Err(e) => {
                    tracing::debug!("Skipping {}: {}", path.display(), e);
                }
            }
        }
        Err(Error::hardware_id(format!(
            "none of {} identifier file(s) were readable",
            self.paths.len()
        )))
    }
}

/// Extract the UUID from `wmic csproduct get uuid` output
///
/// The output is a `UUID` header line followed by the value, padded with
/// whitespace and `\r\n` line endings.
pub fn parse_wmic_output(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .find(|line| !line.eq_ignore_ascii_case("uuid"))
        .map(String::from)
}

/// Extract `IOPlatformUUID` from `ioreg` output
pub fn parse_ioreg_output(output: &str) -> Option<String> {
    output
        .lines()
        .find(|line| line.contains("\"IOPlatformUUID\""))
        .and_then(|line| line.split('"').nth(3))
        .map(String::from)
        .filter(|id| !id.is_empty())
}
