//! Payment provider integrations
//!
//! Each submodule binds one [`HttpClient`](crate::http::HttpClient) to a
//! provider's base URL and auth scheme and exposes one method per REST
//! endpoint, grouped the way the provider groups its API. Methods reshape
//! caller arguments into the provider's wire format and return the decoded
//! response body unchanged, or a
//! [`NetworkErrorResponse`](crate::http::NetworkErrorResponse).

pub mod onekhusa;
pub mod pawapay;
pub mod paychangu;

pub use onekhusa::OneKhusa;
pub use pawapay::PawaPay;
pub use paychangu::PayChangu;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::http::{ApiResult, NetworkErrorResponse};

/// Currency used when a caller omits one.
pub const DEFAULT_CURRENCY: &str = "MWK";

/// A money amount as the caller supplied it, number or decimal string.
///
/// Providers disagree on whether amounts travel as JSON numbers or strings.
/// Keeping the caller's literal avoids a float round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Amount {
    /// A JSON number such as `1500` or `12.50`
    Number(serde_json::Number),
    /// A decimal string such as `"1500"`
    Text(String),
}

impl Amount {
    /// The amount as a decimal string.
    ///
    /// # Examples
    ///
    /// ```
    /// use malipo::providers::Amount;
    ///
    /// assert_eq!(Amount::from(1500u64).as_decimal_string(), "1500");
    /// assert_eq!(Amount::from("12.50").as_decimal_string(), "12.50");
    /// ```
    pub fn as_decimal_string(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.trim().to_string(),
        }
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Amount {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A party identified by phone number, in pawaPay's wire shape.
///
/// Serializes as `{"type":"MSISDN","address":{"value":"<msisdn>"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Party {
    /// Address kind; always `MSISDN` for mobile money
    #[serde(rename = "type")]
    pub party_type: String,
    /// The party's address
    pub address: PartyAddress,
}

/// Address half of a [`Party`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PartyAddress {
    /// Phone number in international format without `+`
    pub value: String,
}

impl Party {
    /// Wraps a phone number as an MSISDN party.
    ///
    /// # Examples
    ///
    /// ```
    /// use malipo::providers::Party;
    ///
    /// let party = Party::msisdn("260971234567");
    /// assert_eq!(
    ///     serde_json::to_value(&party).unwrap(),
    ///     serde_json::json!({"type": "MSISDN", "address": {"value": "260971234567"}})
    /// );
    /// ```
    pub fn msisdn(msisdn: impl Into<String>) -> Self {
        Self {
            party_type: "MSISDN".to_string(),
            address: PartyAddress {
                value: msisdn.into(),
            },
        }
    }
}

/// Reduced response of hosted-checkout style endpoints.
///
/// Serializes as `{"redirectUrl": ..., "error": false[, "txRef": ...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedirectResponse {
    /// Page the customer should be sent to
    pub redirect_url: String,
    /// Always `false` on success
    pub error: bool,
    /// Merchant transaction reference, when the provider uses one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_ref: Option<String>,
}

impl RedirectResponse {
    /// Extracts a redirect URL found at `pointer` in `body`.
    ///
    /// A 2xx body without a usable URL is reported as a 500 failure
    /// carrying the body, since the caller has nowhere to send the customer.
    pub(crate) fn from_body(
        body: &serde_json::Value,
        pointer: &str,
        tx_ref: Option<String>,
    ) -> ApiResult<Self> {
        match body.pointer(pointer).and_then(|v| v.as_str()) {
            Some(url) if !url.is_empty() => Ok(Self {
                redirect_url: url.to_string(),
                error: false,
                tx_ref,
            }),
            _ => Err(NetworkErrorResponse::new(
                format!("Response did not contain a redirect URL at {}", pointer),
                crate::http::DEFAULT_ERROR_STATUS,
                body.to_string(),
            )),
        }
    }
}

/// Generates a reference for callers that did not supply one.
pub fn generate_reference() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Percent-encodes an identifier for use as one URL path segment.
pub(crate) fn segment(id: &str) -> String {
    url::form_urlencoded::byte_serialize(id.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
