//! Contract Test: Response Handling
//!
//! Every operation sends one request and normalizes the response.
//!
//! Constraints verified:
//! - 2xx with the expected fields yields the operation's payload
//! - Non-2xx yields a failure embedding the status code
//! - 2xx with missing fields yields a failure naming them
//! - Transport failures become failures, never panics or errors
//! - Repeated calls against an unchanged backend are identical

mod common;

use common::*;
use pelinda_core::{
    CheckIdentifierRequest, DeleteKeyRequest, DeleteKeylessRequest, ExtendKeyExpirationRequest,
    FetchKeyRequest, GenerateKeyRequest, Method, ValidateKeyRequest,
};
use serde_json::{json, Value};

#[tokio::test]
async fn execution_count_payload() {
    let transport = MockTransport::new();
    let client = connected(&transport).await;
    transport.respond("execution-count", 200, r#"{"executionCount": 42}"#);

    let outcome = client.get_execution_count().await;

    let payload = outcome.payload().expect("success");
    assert_eq!(payload.execution_count, 42);
}

#[tokio::test]
async fn execution_count_is_idempotent() {
    let transport = MockTransport::new();
    let client = connected(&transport).await;
    transport.respond("execution-count", 200, r#"{"executionCount": 7}"#);

    let first = client.get_execution_count().await;
    let second = client.get_execution_count().await;

    assert_eq!(first, second);
    assert!(first.is_success());
}

#[tokio::test]
async fn every_operation_reports_server_errors() {
    let transport = MockTransport::new();
    let client = connected(&transport).await;
    for path in [
        "execution-count",
        "push-execution-count",
        "generate-key/post",
        "key/delete",
        "identifier-check",
        "key/expand-expiration",
        "key/fetch",
        "generated-key/fetch",
        "keyless/delete",
        "v2_validation",
    ] {
        transport.respond(path, 500, "");
    }

    let messages = vec![
        client.get_execution_count().await.message().map(String::from),
        client.increment_execution_count().await.message().map(String::from),
        client
            .generate_key(GenerateKeyRequest::new("2030-01-01", 1, false))
            .await
            .message()
            .map(String::from),
        client
            .delete_key(DeleteKeyRequest::new("KEY-1"))
            .await
            .message()
            .map(String::from),
        client
            .check_identifier(CheckIdentifierRequest::new("svc-id"))
            .await
            .message()
            .map(String::from),
        client
            .extend_key_expiration(ExtendKeyExpirationRequest::new("KEY-1", 5))
            .await
            .message()
            .map(String::from),
        client
            .fetch_key(FetchKeyRequest::new("KEY-1"))
            .await
            .message()
            .map(String::from),
        client
            .fetch_generated_key(FetchKeyRequest::new("KEY-1"))
            .await
            .message()
            .map(String::from),
        client
            .delete_keyless(DeleteKeylessRequest::new("HW-1"))
            .await
            .message()
            .map(String::from),
        client
            .validate_key(ValidateKeyRequest::new("KEY-1", "svc").with_hwid("HW-1"))
            .await
            .message()
            .map(String::from),
    ];

    for message in messages {
        let message = message.expect("operation should fail");
        assert!(message.contains("500"), "{}", message);
        assert!(message.contains("Internal Server Error"), "{}", message);
        assert!(!message.contains(API_KEY), "API key leaked: {}", message);
    }
}

#[tokio::test]
async fn http_failure_names_endpoint() {
    let transport = MockTransport::new();
    let client = connected(&transport).await;
    transport.respond("key/delete", 403, r#"{"message": "not activated"}"#);

    let outcome = client.delete_key(DeleteKeyRequest::new("KEY-1")).await;

    assert_eq!(
        outcome.message(),
        Some("Could not request key/delete, Server returned 403: Forbidden")
    );
}

#[tokio::test]
async fn missing_response_fields_fail_despite_ok_status() {
    let transport = MockTransport::new();
    let client = connected(&transport).await;
    transport.respond("execution-count", 200, r#"{"count": 42}"#);
    transport.respond("generate-key/post", 200, r#"{"message": "done"}"#);
    transport.respond("identifier-check", 200, r#"{}"#);
    transport.respond("key/fetch", 200, r#"{"message": "nothing"}"#);
    transport.respond("generated-key/fetch", 200, r#"{"key": {}}"#);
    transport.respond("v2_validation", 200, r#"{"status": "ok"}"#);
    transport.respond("push-execution-count", 200, r#"{"success": true}"#);
    transport.respond("key/delete", 200, r#"{"deleted": true}"#);
    transport.respond("key/expand-expiration", 200, r#"{"message": "ok"}"#);
    transport.respond("keyless/delete", 200, r#"{"message": null}"#);

    let outcome = client.get_execution_count().await;
    assert!(outcome.message().unwrap().contains("executionCount"));

    let outcome = client
        .generate_key(GenerateKeyRequest::new("2030-01-01", 1, false))
        .await;
    assert_eq!(
        outcome.message(),
        Some("Missing 'generatedKeys' in server response")
    );

    let outcome = client
        .check_identifier(CheckIdentifierRequest::new("svc-id"))
        .await;
    assert_eq!(
        outcome.message(),
        Some("Missing 'message', 'service' in server response")
    );

    let outcome = client.fetch_key(FetchKeyRequest::new("KEY-1")).await;
    assert!(outcome.message().unwrap().contains("'key'"));

    let outcome = client
        .fetch_generated_key(FetchKeyRequest::new("KEY-1"))
        .await;
    assert!(outcome.message().unwrap().contains("generatedKey"));

    let outcome = client
        .validate_key(ValidateKeyRequest::new("KEY-1", "svc").with_hwid("HW"))
        .await;
    assert!(outcome.message().unwrap().contains("V2_Authentication"));

    let outcome = client.increment_execution_count().await;
    assert_eq!(outcome.message(), Some("Missing 'message' in server response"));

    let outcome = client.delete_key(DeleteKeyRequest::new("KEY-1")).await;
    assert_eq!(outcome.message(), Some("Missing 'message' in server response"));

    let outcome = client
        .extend_key_expiration(ExtendKeyExpirationRequest::new("KEY-1", 7))
        .await;
    assert_eq!(outcome.message(), Some("Missing 'key' in server response"));

    let outcome = client
        .delete_keyless(DeleteKeylessRequest::new("HW-1"))
        .await;
    assert_eq!(outcome.message(), Some("Missing 'message' in server response"));
}

#[tokio::test]
async fn execution_count_of_wrong_type_is_not_reported_missing() {
    let transport = MockTransport::new();
    let client = connected(&transport).await;

    for body in [r#"{"executionCount": "42"}"#, r#"{"executionCount": 42.5}"#] {
        transport.respond("execution-count", 200, body);

        let outcome = client.get_execution_count().await;

        assert_eq!(
            outcome.message(),
            Some("Invalid JSON in response from execution-count: executionCount: expected an integer"),
            "body: {}",
            body
        );
    }
}

#[tokio::test]
async fn non_json_body_is_a_failure() {
    let transport = MockTransport::new();
    let client = connected(&transport).await;
    transport.respond("keyless/delete", 200, "<html>maintenance</html>");

    let outcome = client
        .delete_keyless(DeleteKeylessRequest::new("HW-1"))
        .await;

    assert!(outcome
        .message()
        .unwrap()
        .starts_with("Invalid JSON in response from keyless/delete"));
}

#[tokio::test]
async fn network_failure_is_a_failure() {
    let transport = MockTransport::new();
    let client = connected(&transport).await;
    transport.fail("key/fetch", "dns error: no such host");

    let outcome = client.fetch_key(FetchKeyRequest::new("KEY-1")).await;

    assert_eq!(
        outcome.message(),
        Some("Request to key/fetch failed: dns error: no such host")
    );
}

#[tokio::test]
async fn increment_requires_success_flag() {
    let transport = MockTransport::new();
    let client = connected(&transport).await;

    transport.respond(
        "push-execution-count",
        200,
        r#"{"success": true, "message": "Execution count incremented"}"#,
    );
    let outcome = client.increment_execution_count().await;
    assert_eq!(
        outcome.payload().map(|p| p.message.as_str()),
        Some("Execution count incremented")
    );
    let request = transport.last_request().unwrap();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.query_param("apiKey"), Some(API_KEY));

    transport.respond(
        "push-execution-count",
        200,
        r#"{"success": false, "message": "Limit reached"}"#,
    );
    let outcome = client.increment_execution_count().await;
    assert!(outcome.message().unwrap().contains("Limit reached"));
}

#[tokio::test]
async fn generate_key_sends_injected_key_and_string_premium() {
    let transport = MockTransport::new();
    let client = connected(&transport).await;
    transport.respond(
        "generate-key/post",
        200,
        r#"{"message": "Keys generated", "generatedKeys": ["AAA-111", "BBB-222"]}"#,
    );

    let outcome = client
        .generate_key(
            GenerateKeyRequest::new("2030-06-15", 2, true)
                .with_note("launch")
                .with_days_key(30),
        )
        .await;

    let payload = outcome.payload().expect("success");
    assert_eq!(payload.generated_keys, vec!["AAA-111", "BBB-222"]);
    assert_eq!(payload.message, "Keys generated");

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.header("Content-Type"), Some("application/json"));
    let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
    assert_eq!(
        body,
        json!({
            "apiKey": API_KEY,
            "expire": "2030-06-15",
            "note": "launch",
            "count": 2,
            "isPremium": "true",
            "expiresByDaysKey": true,
            "daysKeys": 30,
        })
    );
}

#[tokio::test]
async fn delete_key_echoes_key_value() {
    let transport = MockTransport::new();
    let client = connected(&transport).await;
    transport.respond("key/delete", 200, r#"{"message": "Key deleted"}"#);

    let outcome = client.delete_key(DeleteKeyRequest::new("KEY-9")).await;

    let payload = outcome.payload().expect("success");
    assert_eq!(payload.deleted_key, "KEY-9");
    assert_eq!(payload.message, "Key deleted");

    let body: Value =
        serde_json::from_str(transport.last_request().unwrap().body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({ "apiKey": API_KEY, "keyValue": "KEY-9" }));
}

#[tokio::test]
async fn check_identifier_payload() {
    let transport = MockTransport::new();
    let client = connected(&transport).await;
    transport.respond(
        "identifier-check",
        200,
        r#"{"message": "Identifier found", "service": "my-hub"}"#,
    );

    let outcome = client
        .check_identifier(CheckIdentifierRequest::new("my-hub-id"))
        .await;

    assert_eq!(outcome.payload().unwrap().service, "my-hub");
    let request = transport.last_request().unwrap();
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.query_param("identifier"), Some("my-hub-id"));
}

#[tokio::test]
async fn extend_expiration_uses_query_string() {
    let transport = MockTransport::new();
    let client = connected(&transport).await;
    transport.respond(
        "key/expand-expiration",
        200,
        r#"{"message": "Expiration extended", "key": {"value": "KEY-1", "expire": "2030-02-01"}}"#,
    );

    let outcome = client
        .extend_key_expiration(ExtendKeyExpirationRequest::new("KEY-1", 14))
        .await;

    let payload = outcome.payload().expect("success");
    assert_eq!(payload.key["expire"], "2030-02-01");

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, Method::Post);
    assert!(request.body.is_none());
    assert_eq!(request.query_param("keyValue"), Some("KEY-1"));
    assert_eq!(request.query_param("days"), Some("14"));
}

#[tokio::test]
async fn fetch_returns_whole_response() {
    let transport = MockTransport::new();
    let client = connected(&transport).await;
    transport.respond(
        "key/fetch",
        200,
        r#"{"key": {"value": "KEY-1"}, "activated": true}"#,
    );
    transport.respond(
        "generated-key/fetch",
        200,
        r#"{"generatedKey": {"value": "GEN-1"}}"#,
    );

    let outcome = client.fetch_key(FetchKeyRequest::new("KEY-1")).await;
    let record = outcome.payload().expect("success");
    assert_eq!(record.get("activated"), Some(&json!(true)));
    assert_eq!(
        transport.last_request().unwrap().query_param("fetch"),
        Some("KEY-1")
    );

    let outcome = client
        .fetch_generated_key(FetchKeyRequest::new("GEN-1"))
        .await;
    assert_eq!(
        outcome.payload().unwrap().get("generatedKey"),
        Some(&json!({"value": "GEN-1"}))
    );
    assert!(transport
        .last_request()
        .unwrap()
        .url
        .ends_with("/api/generated-key/fetch"));
}

#[tokio::test]
async fn validate_key_targets_validation_url() {
    let transport = MockTransport::new();
    let client = connected(&transport).await;
    transport.respond(
        "v2_validation",
        200,
        r#"{"V2_Authentication": "success", "Key_Information": {"Premium_Mode": false}}"#,
    );

    let outcome = client
        .validate_key(ValidateKeyRequest::new("KEY-1", "my-hub").with_hwid("HW-1"))
        .await;

    assert_eq!(
        outcome.payload().unwrap().get("V2_Authentication"),
        Some(&json!("success"))
    );
    let request = transport.last_request().unwrap();
    assert_eq!(request.url, "https://pandadevelopment.net/v2_validation");
    assert_eq!(request.query_param("key"), Some("KEY-1"));
    assert_eq!(request.query_param("service"), Some("my-hub"));
    assert_eq!(request.query_param("hwid"), Some("HW-1"));
    assert!(request.query_param("apiKey").is_none());
}

#[tokio::test]
async fn keyless_validation_derives_hwid() {
    let transport = MockTransport::new();
    let provider = CountingHardwareId::new("4C4C4544-0042-3510");
    let client = connected(&transport)
        .await
        .with_hardware_id_provider(provider.clone());
    transport.respond("v2_validation", 200, r#"{"V2_Authentication": "success"}"#);

    let outcome = client
        .validate_key(ValidateKeyRequest::keyless("my-hub"))
        .await;

    assert!(outcome.is_success(), "{:?}", outcome);
    assert_eq!(provider.calls(), 1);
    let request = transport.last_request().unwrap();
    assert_eq!(request.query_param("key"), Some("keyless"));
    assert_eq!(request.query_param("hwid"), Some("4C4C4544-0042-3510"));
}

#[tokio::test]
async fn explicit_hwid_skips_provider() {
    let transport = MockTransport::new();
    let provider = CountingHardwareId::new("LOCAL");
    let client = connected(&transport)
        .await
        .with_hardware_id_provider(provider.clone());
    transport.respond("v2_validation", 200, r#"{"V2_Authentication": "success"}"#);

    let outcome = client
        .validate_key(ValidateKeyRequest::new("KEY-1", "svc").with_hwid("REMOTE"))
        .await;

    assert!(outcome.is_success());
    assert_eq!(provider.calls(), 0);
    assert_eq!(
        transport.last_request().unwrap().query_param("hwid"),
        Some("REMOTE")
    );
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let transport = MockTransport::new();
    let client = connected(&transport).await;
    transport.respond("execution-count", 200, r#"{"executionCount": 3}"#);
    transport.respond("keyless/delete", 200, r#"{"message": "Keyless deleted"}"#);
    let before = transport.call_count();

    let (count, deleted) = tokio::join!(
        client.get_execution_count(),
        client.delete_keyless(DeleteKeylessRequest::new("HW-1")),
    );

    assert_eq!(count.payload().unwrap().execution_count, 3);
    assert_eq!(deleted.payload().unwrap().message, "Keyless deleted");
    assert_eq!(transport.call_count(), before + 2);
}

#[tokio::test]
async fn pending_hardware_lookup_does_not_hold_up_other_calls() {
    let transport = MockTransport::new();
    let provider = GatedHardwareId::new("HW-GATED");
    let client = connected(&transport)
        .await
        .with_hardware_id_provider(provider.clone());
    transport.respond("execution-count", 200, r#"{"executionCount": 9}"#);
    transport.respond("v2_validation", 200, r#"{"V2_Authentication": "success"}"#);

    // The lookup only finishes once the other call has completed
    let (validated, count) = tokio::join!(
        client.validate_key(ValidateKeyRequest::keyless("my-hub")),
        async {
            let count = client.get_execution_count().await;
            provider.release();
            count
        },
    );

    assert_eq!(count.payload().unwrap().execution_count, 9);
    assert!(validated.is_success(), "{:?}", validated);
    let request = transport.last_request().unwrap();
    assert_eq!(request.query_param("hwid"), Some("HW-GATED"));
}
