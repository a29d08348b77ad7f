//! Minimal embedding example for pelinda-core
//!
//! Plugs a custom `Transport` into the client so the whole flow runs without
//! a network: construction probe, key generation, and a validation that is
//! rejected locally before anything is sent.

use pelinda_core::traits::{HttpRequest, HttpResponse, Transport};
use pelinda_core::{GenerateKeyRequest, PelindaClient, Result, StaticHardwareId, ValidateKeyRequest};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Transport that answers from a fixed script
struct ScriptedTransport {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let body = if request.url.ends_with("/execution-count") {
            json!({ "executionCount": 0 })
        } else if request.url.ends_with("/generate-key/post") {
            json!({ "message": "Keys generated", "generatedKeys": ["DEMO-0001", "DEMO-0002"] })
        } else if request.url.ends_with("/v2_validation") {
            json!({ "V2_Authentication": "success" })
        } else {
            return Ok(HttpResponse::new(404, "Not Found", ""));
        };

        Ok(HttpResponse::new(200, "OK", body.to_string()))
    }

    fn transport_name(&self) -> &'static str {
        "scripted"
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let transport = Arc::new(ScriptedTransport {
        calls: AtomicUsize::new(0),
    });

    let client = PelindaClient::connect("demo-api-key", transport.clone())
        .await?
        .with_hardware_id_provider(Arc::new(StaticHardwareId::new("DEMO-MACHINE")));

    let keys = client
        .generate_key(GenerateKeyRequest::new("2030-12-31", 2, false).with_note("demo"))
        .await;
    println!("generate_key -> {:?}", keys);

    let validation = client
        .validate_key(ValidateKeyRequest::keyless("demo-service"))
        .await;
    println!("validate_key -> success={}", validation.is_success());

    // No key and no service: rejected without a request
    let rejected = client.validate_key(ValidateKeyRequest::default()).await;
    println!("validate_key -> {:?}", rejected.message());

    println!("requests sent: {}", transport.calls.load(Ordering::SeqCst));
    Ok(())
}
