//! Authentication strategies for provider HTTP clients
//!
//! An [`AuthStrategy`] is resolved once when an
//! [`HttpClient`](crate::http::HttpClient) is built. Static strategies
//! (`Bearer`, `Basic`) become default headers on the underlying
//! `reqwest::Client`. The `Custom` strategy is consulted on every request,
//! which is how the OAuth token manager keeps its bearer token fresh.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

use crate::error::{MalipoError, Result};
use crate::http::error::ApiResult;

/// Produces authentication headers for a single outgoing request.
///
/// Implementors may perform I/O (for example fetching an OAuth token).
/// A failure aborts the request and is returned to the SDK caller as-is.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use malipo::http::{ApiResult, AuthHeaderProvider};
/// use reqwest::header::{HeaderMap, HeaderValue};
///
/// struct ApiKey(&'static str);
///
/// #[async_trait]
/// impl AuthHeaderProvider for ApiKey {
///     async fn auth_headers(&self) -> ApiResult<HeaderMap> {
///         let mut headers = HeaderMap::new();
///         headers.insert("X-Api-Key", HeaderValue::from_static(self.0));
///         Ok(headers)
///     }
/// }
/// ```
#[async_trait]
pub trait AuthHeaderProvider: Send + Sync {
    /// Returns the headers to merge into the next request.
    async fn auth_headers(&self) -> ApiResult<HeaderMap>;
}

/// How a client authenticates against its provider.
#[derive(Clone)]
pub enum AuthStrategy {
    /// No authentication header.
    None,
    /// `Authorization: Bearer <token>`, fixed for the client's lifetime.
    Bearer {
        /// The bearer token.
        token: String,
    },
    /// `Authorization: Basic base64(username:password)`.
    Basic {
        /// Basic auth username.
        username: String,
        /// Basic auth password.
        password: String,
    },
    /// Headers computed per request by an async provider.
    Custom(Arc<dyn AuthHeaderProvider>),
}

impl fmt::Debug for AuthStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bearer { .. } => f.debug_struct("Bearer").field("token", &"***").finish(),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl AuthStrategy {
    /// Creates a bearer-token strategy.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Creates a basic-credentials strategy.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates a per-request strategy backed by `provider`.
    pub fn custom(provider: Arc<dyn AuthHeaderProvider>) -> Self {
        Self::Custom(provider)
    }

    /// Rejects strategies whose credentials are missing.
    ///
    /// Bearer needs a non-empty token and basic a non-empty username.
    ///
    /// # Errors
    ///
    /// Returns [`MalipoError::Config`] naming the missing credential.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Bearer { token } if token.trim().is_empty() => Err(MalipoError::Config(
                "bearer auth strategy requires a non-empty token".to_string(),
            )
            .into()),
            Self::Basic { username, .. } if username.trim().is_empty() => {
                Err(MalipoError::Config(
                    "basic auth strategy requires a non-empty username".to_string(),
                )
                .into())
            }
            _ => Ok(()),
        }
    }

    /// Computes the headers that never change for this strategy.
    ///
    /// `None` and `Custom` produce an empty map.
    ///
    /// # Errors
    ///
    /// Returns [`MalipoError::Config`] when the strategy is invalid or the
    /// credentials cannot be encoded as an HTTP header value.
    pub fn static_headers(&self) -> Result<HeaderMap> {
        self.validate()?;

        let mut headers = HeaderMap::new();
        let value = match self {
            Self::Bearer { token } => Some(format!("Bearer {}", token.trim())),
            Self::Basic { username, password } => Some(format!(
                "Basic {}",
                STANDARD.encode(format!("{}:{}", username, password))
            )),
            Self::None | Self::Custom(_) => None,
        };

        if let Some(value) = value {
            let mut header = HeaderValue::from_str(&value).map_err(|e| {
                MalipoError::Config(format!("invalid Authorization header value: {}", e))
            })?;
            header.set_sensitive(true);
            headers.insert(AUTHORIZATION, header);
        }

        Ok(headers)
    }

    /// Returns the per-request provider, if this is a `Custom` strategy.
    pub fn dynamic_provider(&self) -> Option<Arc<dyn AuthHeaderProvider>> {
        match self {
            Self::Custom(provider) => Some(Arc::clone(provider)),
            _ => None,
        }
    }
}
