// # Key Validation Tool
//
// Exercises the client against the real Panda Development API.
//
// ## Usage
//
// ```bash
// # Read-only (default): verify the API key, read the counter, validate a key
// PELINDA_API_KEY=your_api_key \
// PELINDA_SERVICE=your_service \
// PELINDA_KEY=KEY-TO-VALIDATE \
// cargo run --bin key_validation
//
// # Live mode also increments the execution counter
// PELINDA_MODE=live PELINDA_API_KEY=... PELINDA_SERVICE=... cargo run --bin key_validation
// ```
//
// ## Environment Variables
//
// Required:
// - `PELINDA_API_KEY`: API key from the vendor dashboard
// - `PELINDA_SERVICE`: Service identifier to validate against
//
// Optional:
// - `PELINDA_KEY`: License key to validate (keyless validation when unset)
// - `PELINDA_HWID`: Hardware identifier (read from this machine when unset)
// - `PELINDA_MODE`: "read-only" or "live" (default: read-only)

use anyhow::{Context, Result};
use pelinda_core::{Outcome, ValidateKeyRequest};
use pelinda_hwid::MachineUuidProvider;
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let api_key = env::var("PELINDA_API_KEY").context("PELINDA_API_KEY is required")?;
    let service = env::var("PELINDA_SERVICE").context("PELINDA_SERVICE is required")?;
    let key = env::var("PELINDA_KEY").ok();
    let hwid = env::var("PELINDA_HWID").ok();
    let live = env::var("PELINDA_MODE").unwrap_or_default().to_lowercase() == "live";

    tracing::info!("Configuration:");
    tracing::info!("  Service: {}", service);
    tracing::info!("  Key: {}", key.as_deref().unwrap_or("(keyless)"));
    tracing::info!("  HWID: {}", hwid.as_deref().unwrap_or("(this machine)"));
    tracing::info!("  Mode: {}", if live { "LIVE" } else { "READ-ONLY" });

    tracing::info!("--- Step 1: Verifying API key ---");
    let client = pelinda_http::connect(api_key)
        .await?
        .with_hardware_id_provider(Arc::new(MachineUuidProvider::new()));
    tracing::info!("✓ API key accepted (not shown for security)");

    tracing::info!("--- Step 2: Reading execution count ---");
    report("get_execution_count", client.get_execution_count().await)?;

    if live {
        tracing::info!("--- Step 3: Incrementing execution count ---");
        report("increment_execution_count", client.increment_execution_count().await)?;
    }

    tracing::info!("--- Step 4: Validating ---");
    let mut request = match key {
        Some(key) => ValidateKeyRequest::new(key, service),
        None => ValidateKeyRequest::keyless(service),
    };
    if let Some(hwid) = hwid {
        request = request.with_hwid(hwid);
    }
    let outcome = client.validate_key(request).await;
    if let Some(record) = outcome.payload() {
        tracing::info!(
            "Response: {}",
            serde_json::to_string_pretty(&record.result)?
        );
    }
    report("validate_key", outcome)?;

    tracing::info!("=== Validation complete ===");
    Ok(())
}

fn report<T: std::fmt::Debug>(operation: &str, outcome: Outcome<T>) -> Result<()> {
    match outcome {
        Outcome::Success(payload) => {
            tracing::info!("✓ {}: {:?}", operation, payload);
            Ok(())
        }
        Outcome::Failure(failure) => {
            tracing::error!("✗ {}: {}", operation, failure);
            anyhow::bail!("{} failed", operation)
        }
    }
}
