//! Test doubles and common utilities for client contract tests
//!
//! `MockTransport` answers from a route table keyed by endpoint path and
//! counts every request it receives, so tests can assert that validation
//! failures never reach the network.

#![allow(dead_code)]

use pelinda_core::error::{Error, Result};
use pelinda_core::traits::{HardwareIdProvider, HttpRequest, HttpResponse, Transport};
use pelinda_core::PelindaClient;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub const API_KEY: &str = "test-api-key-0123456789";

#[derive(Clone)]
enum Reply {
    Respond(HttpResponse),
    Fail(String),
}

/// A transport that replays canned responses and records requests
pub struct MockTransport {
    routes: Mutex<Vec<(String, Reply)>>,
    call_count: AtomicUsize,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    /// Create a transport that accepts the construction probe
    pub fn new() -> Arc<Self> {
        let transport = Arc::new(Self {
            routes: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        });
        transport.respond("execution-count", 200, r#"{"executionCount": 0}"#);
        transport
    }

    /// Answer requests to `path` with `status` and `body`
    ///
    /// A later route for the same path replaces the earlier one.
    pub fn respond(&self, path: &str, status: u16, body: &str) {
        let reply = Reply::Respond(HttpResponse::new(status, reason(status), body));
        self.set_route(path, reply);
    }

    /// Answer requests to `path` with a transport error
    pub fn fail(&self, path: &str, message: &str) {
        self.set_route(path, Reply::Fail(message.to_string()));
    }

    fn set_route(&self, path: &str, reply: Reply) {
        let mut routes = self.routes.lock().unwrap();
        routes.retain(|(p, _)| p != path);
        routes.push((path.to_string(), reply));
    }

    /// Get the number of times send() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Get the most recent request
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        let reply = {
            let routes = self.routes.lock().unwrap();
            routes
                .iter()
                .find(|(path, _)| request.url.ends_with(&format!("/{}", path)))
                .map(|(_, reply)| reply.clone())
        };

        match reply {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Fail(message)) => Err(Error::network(message)),
            None => Ok(HttpResponse::new(404, "Not Found", "")),
        }
    }

    fn transport_name(&self) -> &'static str {
        "mock"
    }
}

/// A hardware identifier provider that counts lookups
pub struct CountingHardwareId {
    hwid: Option<String>,
    calls: AtomicUsize,
}

impl CountingHardwareId {
    pub fn new(hwid: &str) -> Arc<Self> {
        Arc::new(Self {
            hwid: Some(hwid.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn broken() -> Arc<Self> {
        Arc::new(Self {
            hwid: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl HardwareIdProvider for CountingHardwareId {
    async fn hardware_id(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.hwid
            .clone()
            .ok_or_else(|| Error::hardware_id("utility not available"))
    }
}

/// A hardware identifier provider that waits until released
pub struct GatedHardwareId {
    hwid: String,
    gate: Notify,
}

impl GatedHardwareId {
    pub fn new(hwid: &str) -> Arc<Self> {
        Arc::new(Self {
            hwid: hwid.to_string(),
            gate: Notify::new(),
        })
    }

    /// Let a pending or future lookup finish
    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait::async_trait]
impl HardwareIdProvider for GatedHardwareId {
    async fn hardware_id(&self) -> Result<String> {
        self.gate.notified().await;
        Ok(self.hwid.clone())
    }
}

/// Build a client against `transport`, asserting the probe succeeds
pub async fn connected(transport: &Arc<MockTransport>) -> PelindaClient {
    PelindaClient::connect(API_KEY, transport.clone())
        .await
        .expect("probe accepted")
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "",
    }
}
