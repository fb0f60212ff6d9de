//! HTTP client wrapper integration tests
//!
//! Exercises `HttpClient` against a `wiremock` mock server: auth header
//! injection, request hooks, query strings, passthrough of 2xx bodies and
//! normalization of every failure into a `NetworkErrorResponse`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use malipo::http::{
    ApiResult, AuthHeaderProvider, AuthStrategy, HttpClient, HttpClientConfig,
    NetworkErrorResponse,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn client(server: &MockServer, auth: AuthStrategy) -> HttpClient {
    HttpClient::new(HttpClientConfig::new(server.uri(), "test"), auth).expect("client")
}

struct StaticHeader;

#[async_trait]
impl AuthHeaderProvider for StaticHeader {
    async fn auth_headers(&self) -> ApiResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer dynamic"));
        Ok(headers)
    }
}

struct RejectingProvider;

#[async_trait]
impl AuthHeaderProvider for RejectingProvider {
    async fn auth_headers(&self) -> ApiResult<HeaderMap> {
        Err(NetworkErrorResponse::from_status(
            401,
            r#"{"error":"invalid_client"}"#,
        ))
    }
}

// ---------------------------------------------------------------------------
// Success paths
// ---------------------------------------------------------------------------

/// A 2xx JSON body comes back deep-equal to what the server sent.
#[tokio::test]
async fn test_get_passes_body_through_unchanged() {
    let server = MockServer::start().await;
    let body = json!({
        "status": "success",
        "data": {"id": 17, "amounts": [1.5, "2.00"], "nested": {"flag": null}}
    });
    Mock::given(method("GET"))
        .and(path("/things/17"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let http = client(&server, AuthStrategy::bearer("secret"));
    let result: Value = http.get("/things/17", "get thing").await.unwrap();
    assert_eq!(result, body);
}

#[tokio::test]
async fn test_basic_auth_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let http = client(&server, AuthStrategy::basic("user", "pass"));
    let result: Value = http.get("/", "basic").await.unwrap();
    assert_eq!(result["ok"], true);
}

#[tokio::test]
async fn test_post_sends_json_body_and_default_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/payments"))
        .and(header("x-client", "malipo-tests"))
        .and(body_json(json!({"amount": "100", "currency": "MWK"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "p-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let http = HttpClient::new(
        HttpClientConfig::new(server.uri(), "test").with_header("x-client", "malipo-tests"),
        AuthStrategy::None,
    )
    .unwrap();
    let result: Value = http
        .post("payments", &json!({"amount": "100", "currency": "MWK"}), "create")
        .await
        .unwrap();
    assert_eq!(result, json!({"id": "p-1"}));
}

#[tokio::test]
async fn test_query_parameters_are_passed_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "25"))
        .and(query_param("status", "PENDING"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let http = client(&server, AuthStrategy::None);
    let result: Value = http
        .get_with_query(
            "/list",
            &json!({"page": 2, "per_page": 25, "status": "PENDING", "empty": null}),
            "list",
        )
        .await
        .unwrap();
    assert_eq!(result, json!([]));
}

#[tokio::test]
async fn test_dynamic_auth_and_request_hook() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/batches/9"))
        .and(header("authorization", "Bearer dynamic"))
        .and(header("x-organisation-id", "org-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let http = client(&server, AuthStrategy::custom(Arc::new(StaticHeader))).with_request_hook(
        Arc::new(|headers: &mut HeaderMap| {
            headers.insert("x-organisation-id", HeaderValue::from_static("org-1"));
        }),
    );
    let result: Value = http.delete("/batches/9", "cancel").await.unwrap();
    assert_eq!(result, Value::Null);
}

// ---------------------------------------------------------------------------
// Failure normalization
// ---------------------------------------------------------------------------

/// Status 400 with `{"message":"bad request"}` normalizes to the documented shape.
#[tokio::test]
async fn test_error_status_is_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "bad request"})))
        .mount(&server)
        .await;

    let http = client(&server, AuthStrategy::None);
    let err = http.get::<Value>("/x", "bad").await.unwrap_err();
    assert_eq!(
        serde_json::to_value(&err).unwrap(),
        json!({
            "errorMessage": "bad request",
            "statusCode": 400,
            "errorObject": "{\"message\":\"bad request\"}"
        })
    );
}

#[tokio::test]
async fn test_error_status_with_text_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let http = client(&server, AuthStrategy::None);
    let err = http.get::<Value>("/x", "down").await.unwrap_err();
    assert_eq!(err.status_code, 503);
    assert_eq!(err.error_message, "upstream unavailable");
    assert_eq!(err.error_object, "upstream unavailable");
}

#[tokio::test]
async fn test_undecodable_success_body_is_500() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let http = client(&server, AuthStrategy::None);
    let err = http.get::<Value>("/x", "html").await.unwrap_err();
    assert_eq!(err.status_code, 500);
    assert!(err.error_message.starts_with("Failed to decode response"));
    assert_eq!(err.error_object, "<html>oops</html>");
}

#[tokio::test]
async fn test_timeout_is_500_naming_the_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let http = HttpClient::new(
        HttpClientConfig::new(server.uri(), "test").with_timeout(Duration::from_millis(50)),
        AuthStrategy::None,
    )
    .unwrap();
    let err = http.get::<Value>("/slow", "slow").await.unwrap_err();
    assert_eq!(err.status_code, 500);
    assert!(err.error_message.contains("timed out"), "{}", err.error_message);
}

#[tokio::test]
async fn test_connection_failure_is_500() {
    let http = HttpClient::new(
        HttpClientConfig::new("http://127.0.0.1:1", "test"),
        AuthStrategy::None,
    )
    .unwrap();
    let err = http.get::<Value>("/", "refused").await.unwrap_err();
    assert_eq!(err.status_code, 500);
    assert!(!err.error_message.is_empty());
}

/// An auth provider failure is returned as-is and no request is sent.
#[tokio::test]
async fn test_auth_failure_short_circuits_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let http = client(&server, AuthStrategy::custom(Arc::new(RejectingProvider)));
    let err = http.get::<Value>("/", "auth").await.unwrap_err();
    assert_eq!(err.status_code, 401);
    assert_eq!(err.error_message, "invalid_client");
}
