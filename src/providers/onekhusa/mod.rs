//! OneKhusa integration
//!
//! Enterprise collections (request-to-pay), single and batch disbursements,
//! account balance and statements, and name lookups.
//!
//! Every request carries a bearer token from a [`TokenManager`] running the
//! OAuth2 client-credentials grant, and the merchant's `X-Organisation-Id`.

pub mod types;

pub use types::*;

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{json, Value};

use crate::config::{Environment, OneKhusaConfig};
use crate::error::{MalipoError, Result};
use crate::http::{
    ApiResult, AuthStrategy, ClientCredentialsSource, HttpClient, HttpClientConfig, RequestHook,
    TokenManager,
};
use crate::providers::{generate_reference, segment, DEFAULT_CURRENCY};

/// Sandbox API base URL.
pub const SANDBOX_BASE_URL: &str = "https://sandbox.api.onekhusa.com";

/// Production API base URL.
pub const PRODUCTION_BASE_URL: &str = "https://api.onekhusa.com";

/// Token endpoint path, relative to the base URL.
pub const TOKEN_PATH: &str = "/v1/oauth/token";

/// Header carrying the merchant organisation.
pub const ORGANISATION_HEADER: &str = "x-organisation-id";

const SERVICE_NAME: &str = "onekhusa";

/// Returns the base URL for `environment`.
pub fn base_url_for(environment: Environment) -> &'static str {
    match environment {
        Environment::Sandbox => SANDBOX_BASE_URL,
        Environment::Production => PRODUCTION_BASE_URL,
    }
}

/// OneKhusa API client.
#[derive(Debug, Clone)]
pub struct OneKhusa {
    http: Arc<HttpClient>,
    tokens: Arc<TokenManager>,
}

impl OneKhusa {
    /// Builds a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the client credentials are empty, the
    /// organisation id is not a valid header value, or an HTTP client cannot
    /// be built.
    pub fn new(config: &OneKhusaConfig, default_environment: Environment) -> Result<Self> {
        if config.client_id.trim().is_empty() || config.client_secret.trim().is_empty() {
            return Err(MalipoError::MissingCredentials(SERVICE_NAME.to_string()).into());
        }

        let environment = config.environment.unwrap_or(default_environment);
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| base_url_for(environment).to_string());
        let token_url = config.token_url.clone().unwrap_or_else(|| {
            format!("{}{}", base_url.trim_end_matches('/'), TOKEN_PATH)
        });

        let token_http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(MalipoError::Http)?;
        let mut source = ClientCredentialsSource::new(
            token_http,
            &token_url,
            config.client_id.clone(),
            config.client_secret.clone(),
        );
        if let Some(scope) = &config.scope {
            source = source.with_scope(scope.clone());
        }
        let tokens = Arc::new(TokenManager::new(Arc::new(source)));

        let http = HttpClient::new(
            HttpClientConfig::new(&base_url, SERVICE_NAME).with_timeout(config.timeout()),
            AuthStrategy::custom(tokens.clone()),
        )?
        .with_request_hook(organisation_hook(&config.organisation_id)?);

        tracing::debug!(
            environment = %environment,
            base_url = %base_url,
            token_url = %token_url,
            "OneKhusa client initialized"
        );

        Ok(Self {
            http: Arc::new(http),
            tokens,
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.http.config().base_url
    }

    /// The token cache backing this client.
    pub fn token_manager(&self) -> &Arc<TokenManager> {
        &self.tokens
    }

    /// Discards the cached access token; the next call fetches a new one.
    pub async fn clear_token(&self) {
        self.tokens.clear_token().await;
    }

    /// Request-to-pay collections.
    pub fn collections(&self) -> Collections<'_> {
        Collections { http: &self.http }
    }

    /// Single and batch disbursements.
    pub fn disbursements(&self) -> Disbursements<'_> {
        Disbursements { http: &self.http }
    }

    /// Merchant account balance and statements.
    pub fn accounts(&self) -> Accounts<'_> {
        Accounts { http: &self.http }
    }

    /// Name and bank lookups.
    pub fn lookups(&self) -> Lookups<'_> {
        Lookups { http: &self.http }
    }
}

/// Builds the hook that stamps `X-Organisation-Id` on every request.
fn organisation_hook(organisation_id: &str) -> Result<RequestHook> {
    let value = HeaderValue::from_str(organisation_id.trim()).map_err(|e| {
        MalipoError::Config(format!("onekhusa: invalid organisation_id: {}", e))
    })?;
    let name = HeaderName::from_static(ORGANISATION_HEADER);
    Ok(Arc::new(move |headers: &mut HeaderMap| {
        headers.insert(name.clone(), value.clone());
    }))
}

fn fill_disbursement_defaults(request: &mut DisbursementRequest) {
    request
        .merchant_reference
        .get_or_insert_with(generate_reference);
    request
        .currency_code
        .get_or_insert_with(|| DEFAULT_CURRENCY.to_string());
}

/// Collection operations.
#[derive(Debug, Clone, Copy)]
pub struct Collections<'a> {
    http: &'a HttpClient,
}

impl Collections<'_> {
    /// Sends a payment prompt to the payer's wallet.
    pub async fn request_to_pay(&self, mut request: RequestToPayRequest) -> ApiResult<Value> {
        request
            .merchant_reference
            .get_or_insert_with(generate_reference);
        request
            .currency_code
            .get_or_insert_with(|| DEFAULT_CURRENCY.to_string());
        self.http
            .post("/v1/collections", &request, "request to pay")
            .await
    }

    /// Returns one collection.
    pub async fn get(&self, collection_id: &str) -> ApiResult<Value> {
        self.http
            .get(
                &format!("/v1/collections/{}", segment(collection_id)),
                "get collection",
            )
            .await
    }

    /// Lists collections, one page at a time.
    pub async fn list(&self, query: &ListQuery) -> ApiResult<Value> {
        self.http
            .get_with_query("/v1/collections", query, "list collections")
            .await
    }
}

/// Disbursement operations.
#[derive(Debug, Clone, Copy)]
pub struct Disbursements<'a> {
    http: &'a HttpClient,
}

impl Disbursements<'_> {
    /// Sends one disbursement.
    pub async fn single(&self, mut request: DisbursementRequest) -> ApiResult<Value> {
        fill_disbursement_defaults(&mut request);
        self.http
            .post("/v1/disbursements", &request, "single disbursement")
            .await
    }

    /// Creates a batch awaiting approval.
    pub async fn batch(&self, mut request: BatchDisbursementRequest) -> ApiResult<Value> {
        request.batch_reference.get_or_insert_with(generate_reference);
        request
            .disbursements
            .iter_mut()
            .for_each(fill_disbursement_defaults);
        self.http
            .post("/v1/disbursements/batches", &request, "create disbursement batch")
            .await
    }

    /// Returns one disbursement.
    pub async fn get(&self, disbursement_id: &str) -> ApiResult<Value> {
        self.http
            .get(
                &format!("/v1/disbursements/{}", segment(disbursement_id)),
                "get disbursement",
            )
            .await
    }

    /// Returns one batch with its items.
    pub async fn get_batch(&self, batch_id: &str) -> ApiResult<Value> {
        self.http
            .get(
                &format!("/v1/disbursements/batches/{}", segment(batch_id)),
                "get disbursement batch",
            )
            .await
    }

    /// Lists disbursements, one page at a time.
    pub async fn list(&self, query: &ListQuery) -> ApiResult<Value> {
        self.http
            .get_with_query("/v1/disbursements", query, "list disbursements")
            .await
    }

    /// Approves a batch so its disbursements are sent.
    pub async fn approve_batch(&self, batch_id: &str) -> ApiResult<Value> {
        self.http
            .patch(
                &format!("/v1/disbursements/batches/{}/approve", segment(batch_id)),
                &json!({}),
                "approve disbursement batch",
            )
            .await
    }

    /// Cancels a batch that has not been approved.
    pub async fn cancel_batch(&self, batch_id: &str) -> ApiResult<Value> {
        self.http
            .delete(
                &format!("/v1/disbursements/batches/{}", segment(batch_id)),
                "cancel disbursement batch",
            )
            .await
    }
}

/// Account operations.
#[derive(Debug, Clone, Copy)]
pub struct Accounts<'a> {
    http: &'a HttpClient,
}

impl Accounts<'_> {
    /// Current merchant balance.
    pub async fn balance(&self) -> ApiResult<Value> {
        self.http
            .get("/v1/accounts/balance", "get account balance")
            .await
    }

    /// Account statement, one page at a time.
    pub async fn statement(&self, query: &StatementQuery) -> ApiResult<Value> {
        self.http
            .get_with_query("/v1/accounts/statement", query, "get account statement")
            .await
    }
}

/// Lookup operations.
#[derive(Debug, Clone, Copy)]
pub struct Lookups<'a> {
    http: &'a HttpClient,
}

impl Lookups<'_> {
    /// Registered name behind a wallet number.
    pub async fn mobile_money_name(&self, request: &MobileMoneyNameLookup) -> ApiResult<Value> {
        self.http
            .post("/v1/lookups/mobile-money", request, "mobile money name lookup")
            .await
    }

    /// Banks available for disbursements.
    pub async fn banks(&self) -> ApiResult<Value> {
        self.http.get("/v1/lookups/banks", "list banks").await
    }

    /// Registered name behind a bank account.
    pub async fn bank_account_name(&self, request: &BankAccountNameLookup) -> ApiResult<Value> {
        self.http
            .post("/v1/lookups/bank-account", request, "bank account name lookup")
            .await
    }
}
