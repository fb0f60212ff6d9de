//! Provider-agnostic HTTP client wrapper
//!
//! [`HttpClient`] is the single point of outbound HTTP access for a
//! provider. It owns a configured `reqwest::Client`, resolves the provider's
//! [`AuthStrategy`], logs every call through `tracing`, and converts every
//! failure into a [`NetworkErrorResponse`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{MalipoError, Result};
use crate::http::auth::{AuthHeaderProvider, AuthStrategy};
use crate::http::error::{ApiResult, NetworkErrorResponse};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Mutates the headers of every outgoing request after auth is applied.
pub type RequestHook = Arc<dyn Fn(&mut HeaderMap) + Send + Sync>;

/// Static configuration of one [`HttpClient`].
///
/// # Examples
///
/// ```
/// use malipo::http::HttpClientConfig;
///
/// let config = HttpClientConfig::new("https://api.sandbox.pawapay.io", "pawapay");
/// assert_eq!(config.timeout.as_secs(), 30);
/// ```
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL every relative endpoint is joined to.
    pub base_url: String,
    /// Provider name used in log records.
    pub service_name: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Extra headers sent on every request.
    pub default_headers: HashMap<String, String>,
}

impl HttpClientConfig {
    /// Creates a configuration with the default timeout and no extra headers.
    pub fn new(base_url: impl Into<String>, service_name: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            service_name: service_name.into(),
            timeout: DEFAULT_TIMEOUT,
            default_headers: HashMap::new(),
        }
    }

    /// Overrides the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds a header sent on every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }
}

/// JSON HTTP client bound to one provider.
///
/// Safe to share across tasks; clone the surrounding `Arc` rather than the
/// client.
///
/// # Examples
///
/// ```no_run
/// use malipo::http::{AuthStrategy, HttpClient, HttpClientConfig};
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = HttpClient::new(
///     HttpClientConfig::new("https://api.paychangu.com", "paychangu"),
///     AuthStrategy::bearer("sk-test"),
/// )?;
/// let operators: serde_json::Value = client.get("/mobile-money", "list operators").await?;
/// # Ok(())
/// # }
/// ```
pub struct HttpClient {
    inner: reqwest::Client,
    config: HttpClientConfig,
    dynamic_auth: Option<Arc<dyn AuthHeaderProvider>>,
    request_hook: Option<RequestHook>,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.config.base_url)
            .field("service_name", &self.config.service_name)
            .field("timeout", &self.config.timeout)
            .field("dynamic_auth", &self.dynamic_auth.is_some())
            .field("request_hook", &self.request_hook.is_some())
            .finish()
    }
}

impl HttpClient {
    /// Builds a client for `config` authenticated with `auth`.
    ///
    /// Default headers are `Content-Type: application/json`,
    /// `Accept: application/json`, the configured extra headers, and the
    /// static auth header, in that order of precedence (later wins).
    ///
    /// # Errors
    ///
    /// Returns [`MalipoError::Config`] if the base URL is empty, a header is
    /// invalid, or the auth strategy is missing credentials.
    pub fn new(config: HttpClientConfig, auth: AuthStrategy) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(MalipoError::Config(format!(
                "{}: base_url cannot be empty",
                config.service_name
            ))
            .into());
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        for (name, value) in &config.default_headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                MalipoError::Config(format!("invalid header name {}: {}", name, e))
            })?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| MalipoError::Config(format!("invalid header value: {}", e)))?;
            headers.insert(name, value);
        }

        headers.extend(auth.static_headers()?);

        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner,
            config,
            dynamic_auth: auth.dynamic_provider(),
            request_hook: None,
        })
    }

    /// Installs a hook that can mutate the headers of every request.
    pub fn with_request_hook(mut self, hook: RequestHook) -> Self {
        self.request_hook = Some(hook);
        self
    }

    /// Returns the client's configuration.
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Sends a GET request.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str, context: &str) -> ApiResult<T> {
        self.send(Method::GET, endpoint, None, None, context).await
    }

    /// Sends a GET request with query parameters.
    ///
    /// `query` is serialized to a JSON object; `null` fields are dropped and
    /// every other value is passed through verbatim.
    pub async fn get_with_query<T, Q>(&self, endpoint: &str, query: &Q, context: &str) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let query = to_json(query)?;
        self.send(Method::GET, endpoint, Some(&query), None, context)
            .await
    }

    /// Sends a POST request with a JSON body.
    pub async fn post<T, B>(&self, endpoint: &str, body: &B, context: &str) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = to_json(body)?;
        self.send(Method::POST, endpoint, None, Some(&body), context)
            .await
    }

    /// Sends a PUT request with a JSON body.
    pub async fn put<T, B>(&self, endpoint: &str, body: &B, context: &str) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = to_json(body)?;
        self.send(Method::PUT, endpoint, None, Some(&body), context)
            .await
    }

    /// Sends a PATCH request with a JSON body.
    pub async fn patch<T, B>(&self, endpoint: &str, body: &B, context: &str) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = to_json(body)?;
        self.send(Method::PATCH, endpoint, None, Some(&body), context)
            .await
    }

    /// Sends a DELETE request.
    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str, context: &str) -> ApiResult<T> {
        self.send(Method::DELETE, endpoint, None, None, context)
            .await
    }

    /// Sends a request and decodes the JSON response.
    ///
    /// This is the single code path behind every verb helper: it applies
    /// the per-request auth headers and request hook, logs the call, and
    /// normalizes every failure.
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method
    /// * `endpoint` - Path relative to the base URL, or an absolute URL
    /// * `query` - Optional JSON object of query parameters
    /// * `body` - Optional JSON body
    /// * `context` - Operation description used in error logs
    pub async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        query: Option<&serde_json::Value>,
        body: Option<&serde_json::Value>,
        context: &str,
    ) -> ApiResult<T> {
        let url = self.url(endpoint);
        let service = self.config.service_name.as_str();
        let query_pairs = query.map(query_pairs).unwrap_or_default();

        tracing::debug!(
            service = %service,
            method = %method,
            url = %url,
            params = ?query_pairs,
            "Outbound request"
        );

        let mut headers = HeaderMap::new();
        if let Some(provider) = &self.dynamic_auth {
            match provider.auth_headers().await {
                Ok(auth_headers) => headers.extend(auth_headers),
                Err(err) => {
                    self.log_failure(context, &err);
                    return Err(err);
                }
            }
        }
        if let Some(hook) = &self.request_hook {
            hook(&mut headers);
        }

        let mut request = self.inner.request(method, &url).headers(headers);
        if !query_pairs.is_empty() {
            request = request.query(&query_pairs);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let err = NetworkErrorResponse::from_transport(&e);
                self.log_failure(context, &err);
                return Err(err);
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                let err = NetworkErrorResponse::from_transport(&e);
                self.log_failure(context, &err);
                return Err(err);
            }
        };

        tracing::debug!(
            service = %service,
            status = status.as_u16(),
            body = %text,
            "Inbound response"
        );

        if !status.is_success() {
            let err = NetworkErrorResponse::from_status(status.as_u16(), &text);
            self.log_failure(context, &err);
            return Err(err);
        }

        let decoded = if text.trim().is_empty() {
            serde_json::from_value(serde_json::Value::Null)
        } else {
            serde_json::from_str(&text)
        };

        decoded.map_err(|e| {
            let err = NetworkErrorResponse::from_decode(&e, &text);
            self.log_failure(context, &err);
            err
        })
    }

    /// Resolves `endpoint` against the base URL.
    ///
    /// Absolute URLs are returned unchanged; relative ones are joined with
    /// exactly one `/`.
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    fn log_failure(&self, context: &str, err: &NetworkErrorResponse) {
        tracing::error!(
            service = %self.config.service_name,
            context = %context,
            status = err.status_code,
            message = %err.error_message,
            "Provider request failed"
        );
    }
}

fn to_json<B: Serialize + ?Sized>(value: &B) -> ApiResult<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|e| NetworkErrorResponse::local(format!("Failed to serialize request: {}", e)))
}

/// Flattens a JSON object into query pairs, dropping `null` values.
fn query_pairs(query: &serde_json::Value) -> Vec<(String, String)> {
    let Some(object) = query.as_object() else {
        return Vec::new();
    };
    object
        .iter()
        .filter_map(|(key, value)| {
            let value = match value {
                serde_json::Value::Null => return None,
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), value))
        })
        .collect()
}
