// # pelinda-core
//
// Core client library for the Panda Development license-key API.
//
// ## Architecture Overview
//
// - **PelindaClient**: Verifies an API key once, then exposes one async method per API action
// - **Transport**: Trait for putting a request on the wire (reqwest impl in `pelinda-http`)
// - **HardwareIdProvider**: Trait for reading the local HWID (platform impl in `pelinda-hwid`)
// - **RequestBuilder**: Fixed vendor header set, query parameters, JSON bodies
// - **Outcome**: Per-operation success payload or a shared failure message
//
// ## Failure Channels
//
// 1. Construction returns `Result<PelindaClient, Error>`; a rejected key is an error
// 2. Operations return `Outcome<T>`; validation, HTTP and response-shape problems are failures
//
// ## Usage
//
// ```rust,ignore
// use pelinda_core::{PelindaClient, request::GenerateKeyRequest};
//
// let client = PelindaClient::connect(api_key, transport).await?;
// let outcome = client
//     .generate_key(GenerateKeyRequest::new("2030-12-31", 5, false).with_note("beta"))
//     .await;
// match outcome.into_result() {
//     Ok(keys) => println!("{:?}", keys.generated_keys),
//     Err(failure) => eprintln!("{}", failure),
// }
// ```

pub mod client;
pub mod config;
pub mod error;
pub mod outcome;
pub mod request;
pub mod traits;

// Re-export core types for convenience
pub use client::PelindaClient;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use outcome::{
    Acknowledged, DeletedKey, ExecutionCount, ExtendedKey, Failure, FetchedRecord, GeneratedKeys,
    IdentifierService, Outcome,
};
pub use request::{
    CheckIdentifierRequest, DeleteKeyRequest, DeleteKeylessRequest, ExtendKeyExpirationRequest,
    FetchKeyRequest, GenerateKeyRequest, ValidateKeyRequest,
};
pub use traits::{HardwareIdProvider, HttpRequest, HttpResponse, Method, StaticHardwareId, Transport};
