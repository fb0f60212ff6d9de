//! OAuth2 client-credentials token cache
//!
//! [`TokenManager`] caches one bearer token, refreshes it shortly before it
//! expires, and collapses concurrent refreshes into a single request to the
//! token endpoint. It plugs into an [`HttpClient`](crate::http::HttpClient)
//! as a custom [`AuthStrategy`](crate::http::AuthStrategy).
//!
//! Token lifetime comes from the JWT `exp` claim when the access token is a
//! JWT, otherwise from `expires_in`. The JWT is decoded with `jsonwebtoken`
//! without verifying its signature; the claim is only a cache-expiry hint and
//! is never used to decide whether anything is trusted.

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use jsonwebtoken::{DecodingKey, Validation};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::http::auth::AuthHeaderProvider;
use crate::http::error::{ApiResult, NetworkErrorResponse};

/// A cached token is refreshed this long before it expires.
pub const REFRESH_BUFFER_MS: i64 = 30_000;

/// Lifetime assumed when the token endpoint omits `expires_in`.
pub const DEFAULT_EXPIRES_IN_SECS: i64 = 3_600;

/// Upper bound on `expires_in`; larger values are clamped (about 100 years).
pub const MAX_EXPIRES_IN_SECS: i64 = 100 * 365 * 24 * 3_600;

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of the current time in epoch milliseconds.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// Wall-clock time via `chrono`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
///
/// # Examples
///
/// ```
/// use malipo::http::token::{Clock, ManualClock};
///
/// let clock = ManualClock::new(1_000);
/// clock.advance(500);
/// assert_eq!(clock.now_millis(), 1_500);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    /// Creates a clock frozen at `now_millis`.
    pub fn new(now_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(now_millis),
        }
    }

    /// Moves the clock forward by `millis`.
    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }

    /// Sets the clock to `now_millis`.
    pub fn set(&self, now_millis: i64) {
        self.now.store(now_millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// Token types
// ---------------------------------------------------------------------------

/// A bearer token with its absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedToken {
    /// The access token string.
    pub access_token: String,
    /// Expiry in epoch milliseconds.
    pub expires_at: i64,
}

impl CachedToken {
    /// Returns `true` while `now_millis < expires_at - REFRESH_BUFFER_MS`.
    ///
    /// # Examples
    ///
    /// ```
    /// use malipo::http::token::CachedToken;
    ///
    /// let token = CachedToken { access_token: "t".into(), expires_at: 100_000 };
    /// assert!(token.is_usable(69_999));
    /// assert!(!token.is_usable(70_000));
    /// ```
    pub fn is_usable(&self, now_millis: i64) -> bool {
        now_millis < self.expires_at.saturating_sub(REFRESH_BUFFER_MS)
    }

    /// Builds a cached token from a token endpoint response.
    ///
    /// Prefers the JWT `exp` claim; falls back to `now + expires_in`, with
    /// `expires_in` clamped to `0..=MAX_EXPIRES_IN_SECS`.
    pub fn from_response(response: &TokenResponse, now_millis: i64) -> Self {
        let expires_at = jwt_expiry_millis(&response.access_token).unwrap_or_else(|| {
            let expires_in = response
                .expires_in
                .unwrap_or(DEFAULT_EXPIRES_IN_SECS)
                .clamp(0, MAX_EXPIRES_IN_SECS);
            now_millis.saturating_add(expires_in * 1_000)
        });
        Self {
            access_token: response.access_token.clone(),
            expires_at,
        }
    }
}

/// Body returned by an OAuth2 token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The issued access token.
    pub access_token: String,
    /// Token type, usually `"Bearer"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Lifetime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    #[serde(default)]
    exp: Option<f64>,
}

/// Reads the `exp` claim of a JWT, in epoch milliseconds.
///
/// Returns `None` if `token` is not a JWT, has no numeric `exp`, or `exp` is
/// negative or too large to express in milliseconds. The signature is not
/// checked.
pub fn jwt_expiry_millis(token: &str) -> Option<i64> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data =
        jsonwebtoken::decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .ok()?;
    let exp = data.claims.exp?;
    if !exp.is_finite() || exp < 0.0 || exp >= (i64::MAX / 1_000) as f64 {
        return None;
    }
    (exp as i64).checked_mul(1_000)
}

// ---------------------------------------------------------------------------
// Token sources
// ---------------------------------------------------------------------------

/// Fetches a fresh token from an authorization server.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Performs one token request.
    async fn fetch_token(&self) -> ApiResult<TokenResponse>;
}

/// OAuth2 client-credentials grant against a token endpoint.
pub struct ClientCredentialsSource {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    scope: Option<String>,
}

impl fmt::Debug for ClientCredentialsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentialsSource")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("scope", &self.scope)
            .finish()
    }
}

impl ClientCredentialsSource {
    /// Creates a source that posts to `token_url`.
    ///
    /// # Arguments
    ///
    /// * `http` - Client used for the token request
    /// * `token_url` - Absolute token endpoint URL
    /// * `client_id` - OAuth client identifier
    /// * `client_secret` - OAuth client secret
    pub fn new(
        http: reqwest::Client,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scope: None,
        }
    }

    /// Requests the given space-separated scopes.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }
}

#[async_trait]
impl TokenSource for ClientCredentialsSource {
    async fn fetch_token(&self) -> ApiResult<TokenResponse> {
        let mut form = vec![
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];
        if let Some(scope) = &self.scope {
            form.push(("scope", scope.as_str()));
        }

        tracing::debug!(url = %self.token_url, "Requesting access token");

        let response = self
            .http
            .post(&self.token_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&form)
            .send()
            .await
            .map_err(|e| NetworkErrorResponse::from_transport(&e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| NetworkErrorResponse::from_transport(&e))?;

        if !status.is_success() {
            return Err(NetworkErrorResponse::from_status(status.as_u16(), &text));
        }

        serde_json::from_str(&text).map_err(|e| NetworkErrorResponse::from_decode(&e, &text))
    }
}

// ---------------------------------------------------------------------------
// TokenManager
// ---------------------------------------------------------------------------

type SharedRefresh = Shared<BoxFuture<'static, ApiResult<CachedToken>>>;

#[derive(Default)]
struct TokenState {
    cached: Option<CachedToken>,
    in_flight: Option<SharedRefresh>,
    generation: u64,
}

/// Caches a bearer token and deduplicates concurrent refreshes.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use malipo::http::token::{ClientCredentialsSource, TokenManager};
///
/// # async fn example() -> malipo::http::ApiResult<()> {
/// let source = ClientCredentialsSource::new(
///     reqwest::Client::new(),
///     "https://auth.example.com/oauth/token",
///     "client-id",
///     "client-secret",
/// );
/// let manager = TokenManager::new(Arc::new(source));
/// let token = manager.get_token().await?;
/// # Ok(())
/// # }
/// ```
pub struct TokenManager {
    source: Arc<dyn TokenSource>,
    clock: Arc<dyn Clock>,
    state: Arc<Mutex<TokenState>>,
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager").finish_non_exhaustive()
    }
}

impl TokenManager {
    /// Creates a manager using the system clock.
    pub fn new(source: Arc<dyn TokenSource>) -> Self {
        Self::with_clock(source, Arc::new(SystemClock))
    }

    /// Creates a manager using `clock` for expiry decisions.
    pub fn with_clock(source: Arc<dyn TokenSource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            clock,
            state: Arc::new(Mutex::new(TokenState::default())),
        }
    }

    /// Returns a usable access token, fetching one if needed.
    ///
    /// 1. A cached token inside its validity window is returned with no I/O.
    /// 2. If a refresh is already running, its result is awaited.
    /// 3. Otherwise a new refresh starts; every concurrent caller shares it.
    ///
    /// # Errors
    ///
    /// Returns the normalized token-endpoint failure. Failures are not
    /// cached; the next call tries again.
    pub async fn get_token(&self) -> ApiResult<String> {
        let refresh = {
            let mut state = self.state.lock().await;
            if let Some(token) = &state.cached {
                if token.is_usable(self.clock.now_millis()) {
                    return Ok(token.access_token.clone());
                }
            }

            match &state.in_flight {
                Some(refresh) => refresh.clone(),
                None => {
                    let refresh = self.refresh_future(state.generation);
                    state.in_flight = Some(refresh.clone());
                    refresh
                }
            }
        };

        refresh.await.map(|token| token.access_token)
    }

    /// Returns the cached token, if any, without checking its validity.
    pub async fn cached_token(&self) -> Option<CachedToken> {
        self.state.lock().await.cached.clone()
    }

    /// Drops the cached token so the next call fetches a new one.
    ///
    /// A refresh that is already running when this is called will not
    /// repopulate the cache.
    pub async fn clear_token(&self) {
        let mut state = self.state.lock().await;
        state.cached = None;
        state.in_flight = None;
        state.generation = state.generation.wrapping_add(1);
        tracing::debug!("Cleared cached access token");
    }

    fn refresh_future(&self, generation: u64) -> SharedRefresh {
        let source = Arc::clone(&self.source);
        let clock = Arc::clone(&self.clock);
        let state = Arc::clone(&self.state);

        async move {
            tracing::debug!("Refreshing access token");
            let fetch = async {
                source
                    .fetch_token()
                    .await
                    .map(|response| CachedToken::from_response(&response, clock.now_millis()))
            };
            // A panicking source must still release the in-flight slot below.
            let result = AssertUnwindSafe(fetch)
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    Err(NetworkErrorResponse::local("token source panicked during refresh"))
                });

            let mut guard = state.lock().await;
            if guard.generation == generation {
                guard.in_flight = None;
                match &result {
                    Ok(token) => {
                        tracing::debug!(expires_at = token.expires_at, "Cached new access token");
                        guard.cached = Some(token.clone());
                    }
                    Err(err) => {
                        tracing::warn!(
                            status = err.status_code,
                            message = %err.error_message,
                            "Access token refresh failed"
                        );
                    }
                }
            }
            result
        }
        .boxed()
        .shared()
    }
}

#[async_trait]
impl AuthHeaderProvider for TokenManager {
    async fn auth_headers(&self) -> ApiResult<HeaderMap> {
        let token = self.get_token().await?;
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
            NetworkErrorResponse::local(format!("access token is not a valid header value: {}", e))
        })?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use std::sync::atomic::AtomicUsize;

    fn jwt_with_claims(claims: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims);
        format!("{}.{}.signature", header, payload)
    }

    fn jwt_with_exp(exp: i64) -> String {
        jwt_with_claims(&format!(r#"{{"sub":"svc","exp":{}}}"#, exp))
    }

    /// Hands out `token-1`, `token-2`, ... and counts calls.
    struct CountingSource {
        calls: AtomicUsize,
        expires_in: i64,
    }

    #[async_trait]
    impl TokenSource for CountingSource {
        async fn fetch_token(&self) -> ApiResult<TokenResponse> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(TokenResponse {
                access_token: format!("token-{}", n),
                token_type: Some("Bearer".to_string()),
                expires_in: Some(self.expires_in),
            })
        }
    }

    /// Panics on the first fetch, then behaves like `CountingSource`.
    struct PanicOnceSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TokenSource for PanicOnceSource {
        async fn fetch_token(&self) -> ApiResult<TokenResponse> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n == 1 {
                panic!("token endpoint exploded");
            }
            Ok(TokenResponse {
                access_token: format!("token-{}", n),
                token_type: None,
                expires_in: Some(3_600),
            })
        }
    }

    struct FailingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TokenSource for FailingSource {
        async fn fetch_token(&self) -> ApiResult<TokenResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(NetworkErrorResponse::from_status(
                401,
                r#"{"error":"invalid_client"}"#,
            ))
        }
    }

    #[test]
    fn test_jwt_expiry_is_read_from_payload() {
        assert_eq!(
            jwt_expiry_millis(&jwt_with_exp(1_700_000_000)),
            Some(1_700_000_000_000)
        );
    }

    #[test]
    fn test_jwt_expiry_rejects_opaque_tokens() {
        assert_eq!(jwt_expiry_millis("opaque-token"), None);
        assert_eq!(jwt_expiry_millis("a.b"), None);
        assert_eq!(jwt_expiry_millis("a.b.c.d"), None);
        assert_eq!(jwt_expiry_millis("a.!!!.c"), None);
    }

    #[test]
    fn test_jwt_without_exp_claim() {
        assert_eq!(jwt_expiry_millis(&jwt_with_claims(r#"{"sub":"x"}"#)), None);
    }

    #[test]
    fn test_jwt_fractional_exp() {
        assert_eq!(
            jwt_expiry_millis(&jwt_with_claims(r#"{"exp":1700000000.5}"#)),
            Some(1_700_000_000_000)
        );
    }

    #[test]
    fn test_jwt_out_of_range_exp_is_ignored() {
        assert_eq!(jwt_expiry_millis(&jwt_with_claims(r#"{"exp":1e300}"#)), None);
        assert_eq!(jwt_expiry_millis(&jwt_with_claims(r#"{"exp":-5}"#)), None);
        assert_eq!(
            jwt_expiry_millis(&jwt_with_claims(&format!(r#"{{"exp":{}}}"#, i64::MAX))),
            None
        );
    }

    #[test]
    fn test_out_of_range_jwt_exp_falls_back_to_expires_in() {
        let response = TokenResponse {
            access_token: jwt_with_claims(r#"{"exp":1e300}"#),
            token_type: None,
            expires_in: Some(60),
        };
        let token = CachedToken::from_response(&response, 1_000);
        assert_eq!(token.expires_at, 61_000);
    }

    #[test]
    fn test_from_response_clamps_expires_in() {
        let huge = TokenResponse {
            access_token: "opaque".to_string(),
            token_type: None,
            expires_in: Some(i64::MAX / 100),
        };
        let token = CachedToken::from_response(&huge, i64::MAX - 10);
        assert_eq!(token.expires_at, i64::MAX);
        assert!(token.is_usable(0));

        let negative = TokenResponse {
            expires_in: Some(-30),
            ..huge
        };
        let token = CachedToken::from_response(&negative, 5_000);
        assert_eq!(token.expires_at, 5_000);
        assert!(!token.is_usable(5_000));
    }

    #[test]
    fn test_is_usable_near_i64_min() {
        let token = CachedToken {
            access_token: "t".into(),
            expires_at: i64::MIN,
        };
        assert!(!token.is_usable(i64::MIN));
    }

    #[test]
    fn test_from_response_prefers_jwt_exp() {
        let response = TokenResponse {
            access_token: jwt_with_exp(2_000),
            token_type: None,
            expires_in: Some(10),
        };
        let token = CachedToken::from_response(&response, 0);
        assert_eq!(token.expires_at, 2_000_000);
    }

    #[test]
    fn test_from_response_falls_back_to_expires_in() {
        let response = TokenResponse {
            access_token: "opaque".to_string(),
            token_type: None,
            expires_in: Some(120),
        };
        let token = CachedToken::from_response(&response, 1_000);
        assert_eq!(token.expires_at, 121_000);
    }

    #[test]
    fn test_from_response_defaults_expires_in() {
        let response = TokenResponse {
            access_token: "opaque".to_string(),
            token_type: None,
            expires_in: None,
        };
        let token = CachedToken::from_response(&response, 0);
        assert_eq!(token.expires_at, DEFAULT_EXPIRES_IN_SECS * 1_000);
    }

    #[tokio::test]
    async fn test_token_reused_inside_window_and_refreshed_at_buffer() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
            expires_in: 300,
        });
        let clock = Arc::new(ManualClock::new(0));
        let manager = TokenManager::with_clock(source.clone(), clock.clone());

        assert_eq!(manager.get_token().await.unwrap(), "token-1");

        // expires_at = 300_000; usable while now < 270_000
        clock.set(269_999);
        assert_eq!(manager.get_token().await.unwrap(), "token-1");
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        clock.set(270_000);
        assert_eq!(manager.get_token().await.unwrap(), "token-2");
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_huge_expires_in_is_cached_and_reused() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
            expires_in: i64::MAX / 100,
        });
        let manager = TokenManager::with_clock(source.clone(), Arc::new(ManualClock::new(0)));

        assert_eq!(manager.get_token().await.unwrap(), "token-1");
        assert_eq!(manager.get_token().await.unwrap(), "token-1");
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            manager.cached_token().await.unwrap().expires_at,
            MAX_EXPIRES_IN_SECS * 1_000
        );
    }

    #[tokio::test]
    async fn test_panicking_source_does_not_wedge_refresh() {
        let source = Arc::new(PanicOnceSource {
            calls: AtomicUsize::new(0),
        });
        let manager = TokenManager::new(source.clone());

        let err = manager.get_token().await.unwrap_err();
        assert_eq!(err.status_code, 500);
        assert!(manager.cached_token().await.is_none());

        assert_eq!(manager.get_token().await.unwrap(), "token-2");
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let source = Arc::new(FailingSource {
            calls: AtomicUsize::new(0),
        });
        let manager = TokenManager::new(source.clone());

        let err = manager.get_token().await.unwrap_err();
        assert_eq!(err.status_code, 401);
        assert_eq!(err.error_message, "invalid_client");

        assert!(manager.get_token().await.is_err());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert!(manager.cached_token().await.is_none());
    }

    #[tokio::test]
    async fn test_clear_token_forces_refetch() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
            expires_in: 3_600,
        });
        let manager = TokenManager::new(source.clone());

        assert_eq!(manager.get_token().await.unwrap(), "token-1");
        manager.clear_token().await;
        assert!(manager.cached_token().await.is_none());
        assert_eq!(manager.get_token().await.unwrap(), "token-2");
    }

    #[tokio::test]
    async fn test_auth_headers_carry_bearer_token() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
            expires_in: 3_600,
        });
        let manager = TokenManager::new(source);
        let headers = manager.auth_headers().await.unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer token-1");
    }
}
