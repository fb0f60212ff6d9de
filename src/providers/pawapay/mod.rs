//! pawaPay integration
//!
//! Mobile money deposits, payouts and refunds across pawaPay's operator
//! network, plus the hosted payment page, wallet balances and the toolkit
//! endpoints. Authenticates with an API token as a bearer token.
//!
//! pawaPay identifies each transaction by a caller-chosen UUID. When the
//! caller omits one it is generated here and is visible in the request body
//! sent, so the caller can find it in the echoed response.

pub mod types;

pub use types::*;

use std::sync::Arc;

use serde_json::{json, Value};

use crate::config::{Environment, PawaPayConfig};
use crate::error::Result;
use crate::http::{ApiResult, AuthStrategy, HttpClient, HttpClientConfig};
use crate::providers::{generate_reference, segment, Party, RedirectResponse, DEFAULT_CURRENCY};

/// Sandbox API base URL.
pub const SANDBOX_BASE_URL: &str = "https://api.sandbox.pawapay.io";

/// Production API base URL.
pub const PRODUCTION_BASE_URL: &str = "https://api.pawapay.io";

const SERVICE_NAME: &str = "pawapay";

/// Returns the base URL for `environment`.
pub fn base_url_for(environment: Environment) -> &'static str {
    match environment {
        Environment::Sandbox => SANDBOX_BASE_URL,
        Environment::Production => PRODUCTION_BASE_URL,
    }
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// pawaPay API client.
#[derive(Debug, Clone)]
pub struct PawaPay {
    http: Arc<HttpClient>,
}

impl PawaPay {
    /// Builds a client from configuration.
    ///
    /// The provider's own `environment` wins over `default_environment`;
    /// `base_url` wins over both.
    ///
    /// # Errors
    ///
    /// Returns an error if the API token is empty or the HTTP client cannot
    /// be built.
    pub fn new(config: &PawaPayConfig, default_environment: Environment) -> Result<Self> {
        let environment = config.environment.unwrap_or(default_environment);
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| base_url_for(environment).to_string());
        let http = HttpClient::new(
            HttpClientConfig::new(&base_url, SERVICE_NAME).with_timeout(config.timeout()),
            AuthStrategy::bearer(config.api_token.clone()),
        )?;
        tracing::debug!(environment = %environment, base_url = %base_url, "pawaPay client initialized");
        Ok(Self::from_http(http))
    }

    /// Wraps an already configured HTTP client.
    pub fn from_http(http: HttpClient) -> Self {
        Self {
            http: Arc::new(http),
        }
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.http.config().base_url
    }

    /// Collections from customer wallets.
    pub fn deposits(&self) -> Deposits<'_> {
        Deposits { http: &self.http }
    }

    /// Disbursements to customer wallets.
    pub fn payouts(&self) -> Payouts<'_> {
        Payouts { http: &self.http }
    }

    /// Refunds of completed deposits.
    pub fn refunds(&self) -> Refunds<'_> {
        Refunds { http: &self.http }
    }

    /// Hosted payment page.
    pub fn payment_page(&self) -> PaymentPage<'_> {
        PaymentPage { http: &self.http }
    }

    /// Merchant wallet balances.
    pub fn wallets(&self) -> Wallets<'_> {
        Wallets { http: &self.http }
    }

    /// Configuration, availability and MSISDN helpers.
    pub fn toolkit(&self) -> Toolkit<'_> {
        Toolkit { http: &self.http }
    }
}

/// Deposit operations.
#[derive(Debug, Clone, Copy)]
pub struct Deposits<'a> {
    http: &'a HttpClient,
}

impl Deposits<'_> {
    /// Initiates a deposit. The payer is sent as an MSISDN party.
    pub async fn initiate(&self, request: DepositRequest) -> ApiResult<Value> {
        let payload = DepositPayload {
            deposit_id: request.deposit_id.unwrap_or_else(generate_reference),
            amount: request.amount.as_decimal_string(),
            currency: request
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            correspondent: request.correspondent,
            payer: Party::msisdn(request.msisdn),
            customer_timestamp: request.customer_timestamp.unwrap_or_else(now_rfc3339),
            statement_description: request.statement_description,
            country: request.country,
            pre_authorisation_code: request.pre_authorisation_code,
            metadata: request.metadata,
        };
        self.http
            .post("/deposits", &payload, "initiate deposit")
            .await
    }

    /// Returns the deposit with `deposit_id`.
    pub async fn status(&self, deposit_id: &str) -> ApiResult<Value> {
        self.http
            .get(
                &format!("/deposits/{}", segment(deposit_id)),
                "check deposit status",
            )
            .await
    }

    /// Asks pawaPay to resend the final-status callback.
    pub async fn resend_callback(&self, deposit_id: &str) -> ApiResult<Value> {
        self.http
            .post(
                "/deposits/resend-callback",
                &json!({ "depositId": deposit_id }),
                "resend deposit callback",
            )
            .await
    }
}

/// Payout operations.
#[derive(Debug, Clone, Copy)]
pub struct Payouts<'a> {
    http: &'a HttpClient,
}

impl Payouts<'_> {
    /// Initiates a payout. The recipient is sent as an MSISDN party.
    pub async fn initiate(&self, request: PayoutRequest) -> ApiResult<Value> {
        self.http
            .post("/payouts", &payout_payload(request), "initiate payout")
            .await
    }

    /// Initiates several payouts in one call.
    pub async fn initiate_bulk(&self, requests: Vec<PayoutRequest>) -> ApiResult<Value> {
        let payloads: Vec<PayoutPayload> = requests.into_iter().map(payout_payload).collect();
        self.http
            .post("/payouts/bulk", &payloads, "initiate bulk payouts")
            .await
    }

    /// Returns the payout with `payout_id`.
    pub async fn status(&self, payout_id: &str) -> ApiResult<Value> {
        self.http
            .get(
                &format!("/payouts/{}", segment(payout_id)),
                "check payout status",
            )
            .await
    }

    /// Asks pawaPay to resend the final-status callback.
    pub async fn resend_callback(&self, payout_id: &str) -> ApiResult<Value> {
        self.http
            .post(
                "/payouts/resend-callback",
                &json!({ "payoutId": payout_id }),
                "resend payout callback",
            )
            .await
    }

    /// Fails a payout that is still waiting in the `ENQUEUED` state.
    pub async fn cancel_enqueued(&self, payout_id: &str) -> ApiResult<Value> {
        self.http
            .post(
                &format!("/payouts/fail-enqueued/{}", segment(payout_id)),
                &json!({}),
                "cancel enqueued payout",
            )
            .await
    }
}

fn payout_payload(request: PayoutRequest) -> PayoutPayload {
    PayoutPayload {
        payout_id: request.payout_id.unwrap_or_else(generate_reference),
        amount: request.amount.as_decimal_string(),
        currency: request
            .currency
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        correspondent: request.correspondent,
        recipient: Party::msisdn(request.msisdn),
        customer_timestamp: request.customer_timestamp.unwrap_or_else(now_rfc3339),
        statement_description: request.statement_description,
        country: request.country,
        metadata: request.metadata,
    }
}

/// Refund operations.
#[derive(Debug, Clone, Copy)]
pub struct Refunds<'a> {
    http: &'a HttpClient,
}

impl Refunds<'_> {
    /// Initiates a refund of a completed deposit.
    pub async fn initiate(&self, request: RefundRequest) -> ApiResult<Value> {
        let payload = RefundPayload {
            refund_id: request.refund_id.unwrap_or_else(generate_reference),
            deposit_id: request.deposit_id,
            amount: request.amount.map(|a| a.as_decimal_string()),
            metadata: request.metadata,
        };
        self.http
            .post("/refunds", &payload, "initiate refund")
            .await
    }

    /// Returns the refund with `refund_id`.
    pub async fn status(&self, refund_id: &str) -> ApiResult<Value> {
        self.http
            .get(
                &format!("/refunds/{}", segment(refund_id)),
                "check refund status",
            )
            .await
    }

    /// Asks pawaPay to resend the final-status callback.
    pub async fn resend_callback(&self, refund_id: &str) -> ApiResult<Value> {
        self.http
            .post(
                "/refunds/resend-callback",
                &json!({ "refundId": refund_id }),
                "resend refund callback",
            )
            .await
    }
}

/// Hosted payment page operations.
#[derive(Debug, Clone, Copy)]
pub struct PaymentPage<'a> {
    http: &'a HttpClient,
}

impl PaymentPage<'_> {
    /// Creates a payment page session.
    ///
    /// The response is reduced to `{redirectUrl, error: false}`.
    pub async fn create_session(&self, request: PaymentPageRequest) -> ApiResult<RedirectResponse> {
        let payload = PaymentPagePayload {
            deposit_id: request.deposit_id.unwrap_or_else(generate_reference),
            return_url: request.return_url,
            amount: request.amount.map(|a| a.as_decimal_string()),
            msisdn: request.msisdn,
            statement_description: request.statement_description,
            language: request.language,
            country: request.country,
            reason: request.reason,
            metadata: request.metadata,
        };
        let body: Value = self
            .http
            .post("/v1/widget/sessions", &payload, "create payment page session")
            .await?;
        RedirectResponse::from_body(&body, "/redirectUrl", None)
    }
}

/// Wallet balance operations.
#[derive(Debug, Clone, Copy)]
pub struct Wallets<'a> {
    http: &'a HttpClient,
}

impl Wallets<'_> {
    /// Balances of every wallet.
    pub async fn balances(&self) -> ApiResult<Value> {
        self.http
            .get("/v1/wallet-balances", "list wallet balances")
            .await
    }

    /// Balances of the wallets in one country (ISO alpha-3).
    pub async fn country_balance(&self, country: &str) -> ApiResult<Value> {
        self.http
            .get(
                &format!("/v1/wallet-balances/{}", segment(country)),
                "country wallet balance",
            )
            .await
    }
}

/// Toolkit operations.
#[derive(Debug, Clone, Copy)]
pub struct Toolkit<'a> {
    http: &'a HttpClient,
}

impl Toolkit<'_> {
    /// Correspondents, limits and features enabled for this merchant.
    pub async fn active_configuration(&self) -> ApiResult<Value> {
        self.http
            .get("/active-conf", "get active configuration")
            .await
    }

    /// Current operational status of each correspondent.
    pub async fn availability(&self, query: &AvailabilityQuery) -> ApiResult<Value> {
        self.http
            .get_with_query("/availability", query, "check correspondent availability")
            .await
    }

    /// Predicts the correspondent for a phone number and normalizes it.
    pub async fn predict_correspondent(&self, msisdn: &str) -> ApiResult<Value> {
        self.http
            .post(
                "/v1/predict-correspondent",
                &json!({ "msisdn": msisdn }),
                "predict correspondent",
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_selects_base_url() {
        let sandbox = PawaPay::new(&PawaPayConfig::new("t"), Environment::Sandbox).unwrap();
        assert_eq!(sandbox.base_url(), SANDBOX_BASE_URL);

        let production = PawaPay::new(&PawaPayConfig::new("t"), Environment::Production).unwrap();
        assert_eq!(production.base_url(), PRODUCTION_BASE_URL);
    }

    #[test]
    fn test_provider_environment_overrides_default() {
        let mut config = PawaPayConfig::new("t");
        config.environment = Some(Environment::Production);
        let client = PawaPay::new(&config, Environment::Sandbox).unwrap();
        assert_eq!(client.base_url(), PRODUCTION_BASE_URL);
    }

    #[test]
    fn test_payout_payload_shape() {
        let payload = payout_payload(PayoutRequest {
            payout_id: Some("p-1".to_string()),
            amount: "100".into(),
            currency: None,
            correspondent: "AIRTEL_MWI".to_string(),
            msisdn: "265991234567".to_string(),
            statement_description: None,
            country: None,
            customer_timestamp: Some("2024-01-01T00:00:00Z".to_string()),
            metadata: None,
        });
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "payoutId": "p-1",
                "amount": "100",
                "currency": "MWK",
                "correspondent": "AIRTEL_MWI",
                "recipient": {"type": "MSISDN", "address": {"value": "265991234567"}},
                "customerTimestamp": "2024-01-01T00:00:00Z"
            })
        );
    }

    #[test]
    fn test_metadata_field_wire_names() {
        let field: MetadataField = serde_json::from_value(json!({
            "field_name": "orderId",
            "field_value": "ORD-1",
            "is_pii": false
        }))
        .unwrap();
        assert_eq!(
            serde_json::to_value(&field).unwrap(),
            json!({"fieldName": "orderId", "fieldValue": "ORD-1", "isPII": false})
        );
    }

    #[test]
    fn test_now_rfc3339_format() {
        let ts = now_rfc3339();
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
        assert!(ts.ends_with('Z'));
    }
}
