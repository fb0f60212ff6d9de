//! pawaPay integration tests against a mock API
//!
//! Covers wire shaping (MSISDN parties, string amounts, default currency,
//! generated IDs), passthrough of response bodies, the payment page
//! redirect transform and error normalization.

mod common;

use serde_json::{json, Value};
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use malipo::config::{Environment, PawaPayConfig};
use malipo::providers::pawapay::{
    AvailabilityQuery, DepositRequest, PawaPay, PaymentPageRequest, PayoutRequest,
    RefundRequest, PRODUCTION_BASE_URL, SANDBOX_BASE_URL,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn deposit(msisdn: &str) -> DepositRequest {
    DepositRequest {
        deposit_id: None,
        amount: 1500u64.into(),
        currency: None,
        correspondent: "MTN_MOMO_ZMB".to_string(),
        msisdn: msisdn.to_string(),
        statement_description: Some("Order 1234".to_string()),
        country: None,
        pre_authorisation_code: None,
        customer_timestamp: None,
        metadata: None,
    }
}

fn payout(msisdn: &str, payout_id: Option<&str>) -> PayoutRequest {
    PayoutRequest {
        payout_id: payout_id.map(str::to_string),
        amount: "250.50".into(),
        currency: None,
        correspondent: "AIRTEL_MWI".to_string(),
        msisdn: msisdn.to_string(),
        statement_description: None,
        country: None,
        customer_timestamp: None,
        metadata: None,
    }
}

async fn last_body(server: &MockServer) -> Value {
    let requests = server.received_requests().await.expect("recording enabled");
    let request = requests.last().expect("at least one request");
    serde_json::from_slice(&request.body).expect("json body")
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn test_environment_selects_base_url() {
    let config = PawaPayConfig::new("token");
    let sandbox = PawaPay::new(&config, Environment::Sandbox).unwrap();
    assert_eq!(sandbox.base_url(), SANDBOX_BASE_URL);
    let production = PawaPay::new(&config, Environment::Production).unwrap();
    assert_eq!(production.base_url(), PRODUCTION_BASE_URL);

    let pinned = PawaPayConfig {
        environment: Some(Environment::Production),
        ..PawaPayConfig::new("token")
    };
    let client = PawaPay::new(&pinned, Environment::Sandbox).unwrap();
    assert_eq!(client.base_url(), PRODUCTION_BASE_URL);
}

// ---------------------------------------------------------------------------
// Deposits
// ---------------------------------------------------------------------------

/// A deposit without currency sends MWK, a string amount, and an MSISDN payer.
#[tokio::test]
async fn test_deposit_wire_shape() {
    let server = MockServer::start().await;
    let response = json!({"depositId": "ignored-by-test", "status": "ACCEPTED", "created": "2024-01-01T00:00:00Z"});
    Mock::given(method("POST"))
        .and(path("/deposits"))
        .and(header("authorization", "Bearer pawapay-token"))
        .and(body_partial_json(json!({
            "amount": "1500",
            "currency": "MWK",
            "correspondent": "MTN_MOMO_ZMB",
            "payer": {"type": "MSISDN", "address": {"value": "260971234567"}},
            "statementDescription": "Order 1234"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&response))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::pawapay(&server);
    let result = client.deposits().initiate(deposit("260971234567")).await.unwrap();
    assert_eq!(result, response);

    let sent = last_body(&server).await;
    let deposit_id = sent["depositId"].as_str().unwrap();
    assert_eq!(
        uuid::Uuid::parse_str(deposit_id).unwrap().get_version_num(),
        4
    );
    let timestamp = sent["customerTimestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    assert!(sent.get("msisdn").is_none());
}

#[tokio::test]
async fn test_deposit_keeps_caller_id_and_currency() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/deposits"))
        .and(body_partial_json(json!({
            "depositId": "f4401bd2-1568-4140-bf2d-eb77d2b2b639",
            "currency": "ZMW"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ACCEPTED"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::pawapay(&server);
    let request = DepositRequest {
        deposit_id: Some("f4401bd2-1568-4140-bf2d-eb77d2b2b639".to_string()),
        currency: Some("ZMW".to_string()),
        ..deposit("260971234567")
    };
    client.deposits().initiate(request).await.unwrap();
}

#[tokio::test]
async fn test_deposit_status_passthrough_and_not_found() {
    let server = MockServer::start().await;
    let found = json!([{"depositId": "d-1", "status": "COMPLETED", "amount": "1500"}]);
    Mock::given(method("GET"))
        .and(path("/deposits/d-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&found))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/deposits/d-404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errorMessage": "Deposit not found"
        })))
        .mount(&server)
        .await;

    let client = common::pawapay(&server);
    assert_eq!(client.deposits().status("d-1").await.unwrap(), found);

    let err = client.deposits().status("d-404").await.unwrap_err();
    assert_eq!(err.status_code, 404);
    assert_eq!(err.error_message, "Deposit not found");
}

#[tokio::test]
async fn test_resend_deposit_callback_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/deposits/resend-callback"))
        .and(body_json(json!({"depositId": "d-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ACCEPTED"})))
        .expect(1)
        .mount(&server)
        .await;

    common::pawapay(&server)
        .deposits()
        .resend_callback("d-1")
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Payouts and refunds
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_payout_recipient_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/payouts"))
        .and(body_partial_json(json!({
            "payoutId": "p-1",
            "amount": "250.50",
            "currency": "MWK",
            "recipient": {"type": "MSISDN", "address": {"value": "260971234567"}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ACCEPTED"})))
        .expect(1)
        .mount(&server)
        .await;

    common::pawapay(&server)
        .payouts()
        .initiate(payout("260971234567", Some("p-1")))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_bulk_payout_sends_array() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/payouts/bulk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"payoutId": "a", "status": "ACCEPTED"},
            {"payoutId": "b", "status": "ACCEPTED"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::pawapay(&server);
    client
        .payouts()
        .initiate_bulk(vec![
            payout("265991111111", Some("a")),
            payout("265992222222", Some("b")),
        ])
        .await
        .unwrap();

    let sent = last_body(&server).await;
    let items = sent.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1]["recipient"]["address"]["value"], "265992222222");
}

#[tokio::test]
async fn test_cancel_enqueued_payout_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/payouts/fail-enqueued/p-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ACCEPTED"})))
        .expect(1)
        .mount(&server)
        .await;

    common::pawapay(&server)
        .payouts()
        .cancel_enqueued("p-9")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_partial_refund() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/refunds"))
        .and(body_partial_json(json!({"depositId": "d-1", "amount": "500"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ACCEPTED"})))
        .expect(1)
        .mount(&server)
        .await;

    common::pawapay(&server)
        .refunds()
        .initiate(RefundRequest {
            refund_id: None,
            deposit_id: "d-1".to_string(),
            amount: Some(500u64.into()),
            metadata: None,
        })
        .await
        .unwrap();

    let sent = last_body(&server).await;
    assert!(sent["refundId"].as_str().is_some());
}

// ---------------------------------------------------------------------------
// Payment page, wallets, toolkit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_payment_page_redirect_transform() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/widget/sessions"))
        .and(body_partial_json(json!({"returnUrl": "https://shop.example/done"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "redirectUrl": "https://paywith.pawapay.io/session/123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let redirect = common::pawapay(&server)
        .payment_page()
        .create_session(PaymentPageRequest {
            deposit_id: None,
            return_url: "https://shop.example/done".to_string(),
            amount: None,
            msisdn: None,
            statement_description: None,
            language: None,
            country: Some("MWI".to_string()),
            reason: None,
            metadata: None,
        })
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(&redirect).unwrap(),
        json!({"redirectUrl": "https://paywith.pawapay.io/session/123", "error": false})
    );
}

#[tokio::test]
async fn test_country_wallet_balance() {
    let server = MockServer::start().await;
    let body = json!({"balances": [{"country": "MWI", "balance": "1000.00", "currency": "MWK"}]});
    Mock::given(method("GET"))
        .and(path("/v1/wallet-balances/MWI"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let result = common::pawapay(&server)
        .wallets()
        .country_balance("MWI")
        .await
        .unwrap();
    assert_eq!(result, body);
}

#[tokio::test]
async fn test_availability_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/availability"))
        .and(query_param("country", "MWI"))
        .and(query_param("operationType", "PAYOUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    common::pawapay(&server)
        .toolkit()
        .availability(&AvailabilityQuery {
            country: Some("MWI".to_string()),
            operation_type: Some("PAYOUT".to_string()),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_predict_correspondent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/predict-correspondent"))
        .and(body_json(json!({"msisdn": "+265 99 123 4567"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "country": "MWI",
            "correspondent": "AIRTEL_MWI",
            "msisdn": "265991234567"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = common::pawapay(&server)
        .toolkit()
        .predict_correspondent("+265 99 123 4567")
        .await
        .unwrap();
    assert_eq!(result["correspondent"], "AIRTEL_MWI");
}
