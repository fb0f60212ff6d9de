//! PayChangu integration
//!
//! Hosted checkout, mobile money, bank transfer and card collections, and
//! payouts to wallets and bank accounts. Authenticates with the merchant's
//! secret key as a bearer token.

pub mod types;

pub use types::*;

use std::sync::Arc;

use serde_json::{json, Value};

use crate::config::PayChanguConfig;
use crate::error::Result;
use crate::http::{ApiResult, AuthStrategy, HttpClient, HttpClientConfig};
use crate::providers::{generate_reference, segment, RedirectResponse, DEFAULT_CURRENCY};

/// Production API base URL. PayChangu has no separate sandbox host; test
/// keys select the sandbox.
pub const DEFAULT_BASE_URL: &str = "https://api.paychangu.com";

const SERVICE_NAME: &str = "paychangu";

/// PayChangu API client.
///
/// # Examples
///
/// ```no_run
/// use malipo::config::PayChanguConfig;
/// use malipo::providers::paychangu::{CheckoutRequest, PayChangu};
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = PayChangu::new(&PayChanguConfig::new("sk-test"))?;
/// let redirect = client
///     .checkout()
///     .initiate_payment(CheckoutRequest {
///         amount: 1500u64.into(),
///         currency: None,
///         tx_ref: None,
///         callback_url: "https://shop.example/callback".into(),
///         return_url: "https://shop.example/done".into(),
///         email: None,
///         first_name: None,
///         last_name: None,
///         customization: None,
///         meta: None,
///     })
///     .await?;
/// println!("send customer to {}", redirect.redirect_url);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PayChangu {
    http: Arc<HttpClient>,
}

impl PayChangu {
    /// Builds a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret key is empty or the HTTP client cannot
    /// be built.
    pub fn new(config: &PayChanguConfig) -> Result<Self> {
        let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let http = HttpClient::new(
            HttpClientConfig::new(base_url, SERVICE_NAME).with_timeout(config.timeout()),
            AuthStrategy::bearer(config.secret_key.clone()),
        )?;
        tracing::debug!(base_url = %base_url, "PayChangu client initialized");
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

    /// Hosted checkout.
    pub fn checkout(&self) -> Checkout<'_> {
        Checkout { http: &self.http }
    }

    /// Direct mobile money collections.
    pub fn mobile_money(&self) -> MobileMoney<'_> {
        MobileMoney { http: &self.http }
    }

    /// Bank transfer collections.
    pub fn bank_transfer(&self) -> BankTransfer<'_> {
        BankTransfer { http: &self.http }
    }

    /// Direct card charges.
    pub fn card(&self) -> Card<'_> {
        Card { http: &self.http }
    }

    /// Payouts to wallets and bank accounts.
    pub fn payouts(&self) -> Payouts<'_> {
        Payouts { http: &self.http }
    }
}

/// Hosted checkout operations.
#[derive(Debug, Clone, Copy)]
pub struct Checkout<'a> {
    http: &'a HttpClient,
}

impl Checkout<'_> {
    /// Creates a checkout session and returns the page to redirect to.
    ///
    /// Missing `currency` defaults to MWK and missing `tx_ref` is generated.
    /// The response is reduced to `{redirectUrl, error: false, txRef}`.
    pub async fn initiate_payment(&self, mut request: CheckoutRequest) -> ApiResult<RedirectResponse> {
        request.currency.get_or_insert_with(|| DEFAULT_CURRENCY.to_string());
        let tx_ref = request
            .tx_ref
            .get_or_insert_with(generate_reference)
            .clone();

        let body: Value = self
            .http
            .post("/payment", &request, "initiate checkout payment")
            .await?;
        RedirectResponse::from_body(&body, "/data/checkout_url", Some(tx_ref))
    }

    /// Looks up the outcome of a checkout by merchant reference.
    pub async fn verify_payment(&self, tx_ref: &str) -> ApiResult<Value> {
        self.http
            .get(
                &format!("/verify-payment/{}", segment(tx_ref)),
                "verify checkout payment",
            )
            .await
    }
}

/// Mobile money collection operations.
#[derive(Debug, Clone, Copy)]
pub struct MobileMoney<'a> {
    http: &'a HttpClient,
}

impl MobileMoney<'_> {
    /// Lists supported mobile money operators and their reference IDs.
    pub async fn operators(&self) -> ApiResult<Value> {
        self.http
            .get("/mobile-money", "list mobile money operators")
            .await
    }

    /// Pushes a payment prompt to a wallet.
    pub async fn charge(&self, mut request: MobileMoneyChargeRequest) -> ApiResult<Value> {
        request.charge_id.get_or_insert_with(generate_reference);
        self.http
            .post(
                "/mobile-money/payments/initialize",
                &request,
                "initialize mobile money charge",
            )
            .await
    }

    /// Asks PayChangu to re-check a charge with the operator.
    pub async fn verify(&self, charge_id: &str) -> ApiResult<Value> {
        self.http
            .get(
                &format!("/mobile-money/payments/{}/verify", segment(charge_id)),
                "verify mobile money charge",
            )
            .await
    }

    /// Returns the stored state of a charge.
    pub async fn details(&self, charge_id: &str) -> ApiResult<Value> {
        self.http
            .get(
                &format!("/mobile-money/payments/{}/details", segment(charge_id)),
                "mobile money charge details",
            )
            .await
    }
}

/// Bank transfer collection operations.
#[derive(Debug, Clone, Copy)]
pub struct BankTransfer<'a> {
    http: &'a HttpClient,
}

impl BankTransfer<'_> {
    /// Issues an account number the customer pays into.
    pub async fn charge(&self, mut request: BankTransferChargeRequest) -> ApiResult<Value> {
        request.currency.get_or_insert_with(|| DEFAULT_CURRENCY.to_string());
        request.charge_id.get_or_insert_with(generate_reference);
        request
            .payment_method
            .get_or_insert_with(|| "mobile_bank_transfer".to_string());
        self.http
            .post(
                "/direct-charge/payments/initialize",
                &request,
                "initialize bank transfer charge",
            )
            .await
    }

    /// Returns the stored state of a bank transfer.
    pub async fn details(&self, charge_id: &str) -> ApiResult<Value> {
        self.http
            .get(
                &format!("/direct-charge/transactions/{}/details", segment(charge_id)),
                "bank transfer details",
            )
            .await
    }
}

/// Card operations.
#[derive(Debug, Clone, Copy)]
pub struct Card<'a> {
    http: &'a HttpClient,
}

impl Card<'_> {
    /// Charges a card. The response may ask for a 3-D Secure redirect.
    pub async fn charge(&self, mut request: CardChargeRequest) -> ApiResult<Value> {
        request.currency.get_or_insert_with(|| DEFAULT_CURRENCY.to_string());
        request.charge_id.get_or_insert_with(generate_reference);
        self.http
            .post("/charge-card/payments", &request, "charge card")
            .await
    }

    /// Returns the outcome of a card charge.
    pub async fn verify(&self, charge_id: &str) -> ApiResult<Value> {
        self.http
            .get(
                &format!("/charge-card/verify/{}", segment(charge_id)),
                "verify card charge",
            )
            .await
    }

    /// Refunds a card charge in full.
    pub async fn refund(&self, charge_id: &str) -> ApiResult<Value> {
        self.http
            .post(
                &format!("/charge-card/refund/{}", segment(charge_id)),
                &json!({}),
                "refund card charge",
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
    /// Sends money to a mobile money wallet.
    pub async fn mobile_money(&self, mut request: MobileMoneyPayoutRequest) -> ApiResult<Value> {
        request.charge_id.get_or_insert_with(generate_reference);
        self.http
            .post(
                "/mobile-money/payouts/initialize",
                &request,
                "initialize mobile money payout",
            )
            .await
    }

    /// Returns the stored state of a mobile money payout.
    pub async fn mobile_money_details(&self, charge_id: &str) -> ApiResult<Value> {
        self.http
            .get(
                &format!("/mobile-money/payouts/{}/details", segment(charge_id)),
                "mobile money payout details",
            )
            .await
    }

    /// Lists banks that can receive payouts in `currency` (default MWK).
    pub async fn supported_banks(&self, currency: Option<&str>) -> ApiResult<Value> {
        let currency = currency.unwrap_or(DEFAULT_CURRENCY);
        self.http
            .get_with_query(
                "/direct-charge/payouts/supported-banks",
                &json!({ "currency": currency }),
                "list payout banks",
            )
            .await
    }

    /// Sends money to a bank account.
    pub async fn bank(&self, mut request: BankPayoutRequest) -> ApiResult<Value> {
        request.charge_id.get_or_insert_with(generate_reference);
        request
            .payout_method
            .get_or_insert_with(|| "bank_transfer".to_string());
        self.http
            .post(
                "/direct-charge/payouts/initialize",
                &request,
                "initialize bank payout",
            )
            .await
    }

    /// Returns the stored state of a bank payout.
    pub async fn bank_details(&self, charge_id: &str) -> ApiResult<Value> {
        self.http
            .get(
                &format!("/direct-charge/payouts/{}/details", segment(charge_id)),
                "bank payout details",
            )
            .await
    }

    /// Lists bank payouts, one page at a time.
    pub async fn list_bank_payouts(&self, query: &PayoutListQuery) -> ApiResult<Value> {
        self.http
            .get_with_query("/direct-charge/payouts", query, "list bank payouts")
            .await
    }
}
