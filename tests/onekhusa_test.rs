//! OneKhusa integration tests against a mock API and token endpoint

mod common;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use malipo::config::{Environment, OneKhusaConfig};
use malipo::providers::onekhusa::{
    DisbursementRequest, ListQuery, MobileMoneyNameLookup, OneKhusa, RequestToPayRequest,
    PRODUCTION_BASE_URL, SANDBOX_BASE_URL,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn mount_token(server: &MockServer, access_token: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/v1/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": access_token,
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn request_to_pay() -> RequestToPayRequest {
    RequestToPayRequest {
        merchant_reference: None,
        amount: 7_500u64.into(),
        currency_code: None,
        mobile_number: "0881234567".to_string(),
        operator_code: Some("TNM".to_string()),
        description: Some("School fees".to_string()),
        callback_url: None,
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn test_missing_credentials_fail_fast() {
    let config = OneKhusaConfig::new("", "secret", "org");
    let err = OneKhusa::new(&config, Environment::Sandbox).unwrap_err();
    assert!(err.to_string().contains("onekhusa"));
}

#[test]
fn test_environment_selects_base_url() {
    let config = OneKhusaConfig::new("id", "secret", "org");
    let sandbox = OneKhusa::new(&config, Environment::Sandbox).unwrap();
    assert_eq!(sandbox.base_url(), SANDBOX_BASE_URL);
    let production = OneKhusa::new(&config, Environment::Production).unwrap();
    assert_eq!(production.base_url(), PRODUCTION_BASE_URL);
}

// ---------------------------------------------------------------------------
// Auth and headers
// ---------------------------------------------------------------------------

/// Every call carries the organisation header and a bearer token; the token
/// is fetched once and reused.
#[tokio::test]
async fn test_requests_carry_token_and_organisation() {
    let server = MockServer::start().await;
    mount_token(&server, "ok-token", 1).await;
    Mock::given(method("GET"))
        .and(path("/v1/accounts/balance"))
        .and(header("authorization", "Bearer ok-token"))
        .and(header("x-organisation-id", "org-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "availableBalance": 120000.5,
            "currencyCode": "MWK"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = common::onekhusa(&server);
    let first = client.accounts().balance().await.unwrap();
    let second = client.accounts().balance().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first["currencyCode"], "MWK");
}

#[tokio::test]
async fn test_clear_token_fetches_again() {
    let server = MockServer::start().await;
    mount_token(&server, "ok-token", 2).await;
    Mock::given(method("GET"))
        .and(path("/v1/lookups/banks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    let client = common::onekhusa(&server);
    client.lookups().banks().await.unwrap();
    client.clear_token().await;
    assert!(client.token_manager().cached_token().await.is_none());
    client.lookups().banks().await.unwrap();
}

/// A token failure is returned without calling the API.
#[tokio::test]
async fn test_token_failure_is_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "Client authentication failed"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/accounts/balance"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = common::onekhusa(&server)
        .accounts()
        .balance()
        .await
        .unwrap_err();
    assert_eq!(err.status_code, 401);
    assert_eq!(err.error_message, "invalid_client");
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_request_to_pay_wire_shape() {
    let server = MockServer::start().await;
    mount_token(&server, "ok-token", 1).await;
    Mock::given(method("POST"))
        .and(path("/v1/collections"))
        .and(body_partial_json(json!({
            "amount": 7500,
            "currencyCode": "MWK",
            "mobileNumber": "0881234567",
            "operatorCode": "TNM",
            "description": "School fees"
        })))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "collectionId": "c-1",
            "status": "PENDING"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::onekhusa(&server);
    let result = client
        .collections()
        .request_to_pay(request_to_pay())
        .await
        .unwrap();
    assert_eq!(result, json!({"collectionId": "c-1", "status": "PENDING"}));

    let requests = server.received_requests().await.unwrap();
    let collection = requests
        .iter()
        .find(|r| r.url.path() == "/v1/collections")
        .unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&collection.body).unwrap();
    assert!(sent["merchantReference"].as_str().is_some());
    assert!(sent.get("mobile_number").is_none());
}

#[tokio::test]
async fn test_list_collections_query() {
    let server = MockServer::start().await;
    mount_token(&server, "ok-token", 1).await;
    Mock::given(method("GET"))
        .and(path("/v1/collections"))
        .and(query_param("page", "1"))
        .and(query_param("size", "20"))
        .and(query_param("startDate", "2024-01-01"))
        .and(query_param("endDate", "2024-01-31"))
        .and(query_param("status", "SUCCESSFUL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": []})))
        .expect(1)
        .mount(&server)
        .await;

    common::onekhusa(&server)
        .collections()
        .list(&ListQuery {
            page: Some(1),
            size: Some(20),
            start_date: Some("2024-01-01".to_string()),
            end_date: Some("2024-01-31".to_string()),
            status: Some("SUCCESSFUL".to_string()),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_single_disbursement_defaults() {
    let server = MockServer::start().await;
    mount_token(&server, "ok-token", 1).await;
    Mock::given(method("POST"))
        .and(path("/v1/disbursements"))
        .and(body_partial_json(json!({
            "merchantReference": "pay-1",
            "currencyCode": "MWK",
            "beneficiaryName": "Tiyamike Phiri"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "QUEUED"})))
        .expect(1)
        .mount(&server)
        .await;

    let request: DisbursementRequest = serde_json::from_value(json!({
        "merchant_reference": "pay-1",
        "amount": 10000,
        "beneficiary_name": "Tiyamike Phiri",
        "mobile_number": "0991234567",
        "operator_code": "AIRTEL"
    }))
    .unwrap();
    common::onekhusa(&server)
        .disbursements()
        .single(request)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_batch_lifecycle_verbs() {
    let server = MockServer::start().await;
    mount_token(&server, "ok-token", 1).await;
    Mock::given(method("PATCH"))
        .and(path("/v1/disbursements/batches/b-1/approve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "APPROVED"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/disbursements/batches/b-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "CANCELLED"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::onekhusa(&server);
    let approved = client.disbursements().approve_batch("b-1").await.unwrap();
    assert_eq!(approved["status"], "APPROVED");
    let cancelled = client.disbursements().cancel_batch("b-2").await.unwrap();
    assert_eq!(cancelled["status"], "CANCELLED");
}

#[tokio::test]
async fn test_mobile_money_name_lookup() {
    let server = MockServer::start().await;
    mount_token(&server, "ok-token", 1).await;
    Mock::given(method("POST"))
        .and(path("/v1/lookups/mobile-money"))
        .and(body_partial_json(json!({"mobileNumber": "0991234567", "operatorCode": "AIRTEL"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accountName": "T PHIRI"})))
        .expect(1)
        .mount(&server)
        .await;

    let result = common::onekhusa(&server)
        .lookups()
        .mobile_money_name(&MobileMoneyNameLookup {
            mobile_number: "0991234567".to_string(),
            operator_code: Some("AIRTEL".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(result["accountName"], "T PHIRI");
}
