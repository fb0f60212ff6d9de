//! OneKhusa request types
//!
//! Fields deserialize from snake_case and serialize to OneKhusa's camelCase
//! wire names.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::providers::Amount;

/// Prompts a customer's wallet to approve a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct RequestToPayRequest {
    /// Merchant reference; generated when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_reference: Option<String>,
    /// Amount to collect
    pub amount: Amount,
    /// ISO currency code; defaults to MWK
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    /// Payer phone number
    pub mobile_number: String,
    /// Wallet operator, e.g. `AIRTEL` or `TNM`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_code: Option<String>,
    /// Narration shown to the payer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Webhook target for the collection result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

/// Sends money to a wallet or bank account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct DisbursementRequest {
    /// Merchant reference; generated when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_reference: Option<String>,
    /// Amount to send
    pub amount: Amount,
    /// ISO currency code; defaults to MWK
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    /// Beneficiary name
    pub beneficiary_name: String,
    /// Wallet number, for mobile money beneficiaries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
    /// Wallet operator, for mobile money beneficiaries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_code: Option<String>,
    /// Bank code from `lookups.banks`, for bank beneficiaries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_code: Option<String>,
    /// Account number, for bank beneficiaries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    /// Narration shown to the beneficiary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Webhook target for the disbursement result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

/// Creates a batch of disbursements that is approved separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct BatchDisbursementRequest {
    /// Batch reference; generated when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_reference: Option<String>,
    /// Batch narration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The individual disbursements
    pub disbursements: Vec<DisbursementRequest>,
}

/// Filters and page selection for collection and disbursement listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct ListQuery {
    /// Page number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Items per page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    /// Start of the date range, `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// End of the date range, `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Transaction status filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Page selection and date range for account statements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct StatementQuery {
    /// Page number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Items per page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    /// Start of the date range, `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// End of the date range, `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Resolves the registered name behind a wallet number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct MobileMoneyNameLookup {
    /// Wallet phone number
    pub mobile_number: String,
    /// Wallet operator, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_code: Option<String>,
}

/// Resolves the registered name behind a bank account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct BankAccountNameLookup {
    /// Bank code from `lookups.banks`
    pub bank_code: String,
    /// Account number
    pub account_number: String,
}
