//! Shared HTTP layer used by every provider
//!
//! - [`auth`]: authentication strategies and the per-request header trait
//! - [`client`]: the JSON client wrapper with logging and error normalization
//! - [`error`]: [`NetworkErrorResponse`] and [`ApiResult`]
//! - [`token`]: OAuth2 client-credentials token cache

pub mod auth;
pub mod client;
pub mod error;
pub mod token;

pub use auth::{AuthHeaderProvider, AuthStrategy};
pub use client::{HttpClient, HttpClientConfig, RequestHook, DEFAULT_TIMEOUT};
pub use error::{ApiResult, NetworkErrorResponse, DEFAULT_ERROR_STATUS};
pub use token::{
    CachedToken, ClientCredentialsSource, Clock, ManualClock, SystemClock, TokenManager,
    TokenResponse, TokenSource, REFRESH_BUFFER_MS,
};
