//! pawaPay request types
//!
//! Caller-facing structs use snake_case; the payload structs at the bottom
//! carry pawaPay's camelCase wire shape.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::providers::{Amount, Party};

/// One metadata entry attached to a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct MetadataField {
    /// Field name
    pub field_name: String,
    /// Field value
    pub field_value: String,
    /// Marks the value as personally identifiable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename(serialize = "isPII"))]
    pub is_pii: Option<bool>,
}

/// Collects money from a customer's wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DepositRequest {
    /// UUID v4 for idempotency; generated when omitted
    #[serde(default)]
    pub deposit_id: Option<String>,
    /// Amount to collect
    pub amount: Amount,
    /// ISO currency code; defaults to MWK
    #[serde(default)]
    pub currency: Option<String>,
    /// Mobile network code, e.g. `AIRTEL_MWI`
    pub correspondent: String,
    /// Payer phone number in international format
    pub msisdn: String,
    /// Text on the customer's statement (4-22 characters)
    #[serde(default)]
    pub statement_description: Option<String>,
    /// ISO 3166-1 alpha-3 country code
    #[serde(default)]
    pub country: Option<String>,
    /// Code required by some operators to pre-authorise payments
    #[serde(default)]
    pub pre_authorisation_code: Option<String>,
    /// RFC 3339 time the customer initiated the payment; defaults to now
    #[serde(default)]
    pub customer_timestamp: Option<String>,
    /// Extra fields stored with the deposit
    #[serde(default)]
    pub metadata: Option<Vec<MetadataField>>,
}

/// Sends money to a customer's wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PayoutRequest {
    /// UUID v4 for idempotency; generated when omitted
    #[serde(default)]
    pub payout_id: Option<String>,
    /// Amount to send
    pub amount: Amount,
    /// ISO currency code; defaults to MWK
    #[serde(default)]
    pub currency: Option<String>,
    /// Mobile network code, e.g. `TNM_MWI`
    pub correspondent: String,
    /// Recipient phone number in international format
    pub msisdn: String,
    /// Text on the customer's statement (4-22 characters)
    #[serde(default)]
    pub statement_description: Option<String>,
    /// ISO 3166-1 alpha-3 country code
    #[serde(default)]
    pub country: Option<String>,
    /// RFC 3339 time the customer initiated the payout; defaults to now
    #[serde(default)]
    pub customer_timestamp: Option<String>,
    /// Extra fields stored with the payout
    #[serde(default)]
    pub metadata: Option<Vec<MetadataField>>,
}

/// Refunds a completed deposit, fully or partly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RefundRequest {
    /// UUID v4 for idempotency; generated when omitted
    #[serde(default)]
    pub refund_id: Option<String>,
    /// Deposit being refunded
    pub deposit_id: String,
    /// Partial amount; the full deposit is refunded when omitted
    #[serde(default)]
    pub amount: Option<Amount>,
    /// Extra fields stored with the refund
    #[serde(default)]
    pub metadata: Option<Vec<MetadataField>>,
}

/// Creates a hosted payment page session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PaymentPageRequest {
    /// UUID v4 of the resulting deposit; generated when omitted
    #[serde(default)]
    pub deposit_id: Option<String>,
    /// Where the customer lands after the page completes
    pub return_url: String,
    /// Fixed amount; the customer enters one when omitted
    #[serde(default)]
    pub amount: Option<Amount>,
    /// Pre-filled payer phone number
    #[serde(default)]
    pub msisdn: Option<String>,
    /// Text on the customer's statement
    #[serde(default)]
    pub statement_description: Option<String>,
    /// Page language, `EN` or `FR`
    #[serde(default)]
    pub language: Option<String>,
    /// ISO 3166-1 alpha-3 country code
    #[serde(default)]
    pub country: Option<String>,
    /// Reason shown to the customer
    #[serde(default)]
    pub reason: Option<String>,
    /// Extra fields stored with the deposit
    #[serde(default)]
    pub metadata: Option<Vec<MetadataField>>,
}

/// Filter for the availability endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct AvailabilityQuery {
    /// ISO 3166-1 alpha-3 country code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// `DEPOSIT`, `PAYOUT` or `REFUND`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<String>,
}

// ---------------------------------------------------------------------------
// Wire payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DepositPayload {
    pub deposit_id: String,
    pub amount: String,
    pub currency: String,
    pub correspondent: String,
    pub payer: Party,
    pub customer_timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_authorisation_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Vec<MetadataField>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PayoutPayload {
    pub payout_id: String,
    pub amount: String,
    pub currency: String,
    pub correspondent: String,
    pub recipient: Party,
    pub customer_timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Vec<MetadataField>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefundPayload {
    pub refund_id: String,
    pub deposit_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Vec<MetadataField>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentPagePayload {
    pub deposit_id: String,
    pub return_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msisdn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Vec<MetadataField>>,
}
