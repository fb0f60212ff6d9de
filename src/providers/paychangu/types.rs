//! PayChangu request types
//!
//! PayChangu's wire format is already snake_case, so most of these structs
//! are sent as-is after defaults are filled in.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::providers::Amount;

/// Text shown on the hosted checkout page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Customization {
    /// Page title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Page description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Starts a hosted checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CheckoutRequest {
    /// Amount to charge
    pub amount: Amount,
    /// ISO currency code; defaults to MWK
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Merchant reference; generated when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_ref: Option<String>,
    /// Webhook target for the payment result
    pub callback_url: String,
    /// Where the customer lands after paying
    pub return_url: String,
    /// Customer email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Customer first name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Customer last name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Checkout page text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customization: Option<Customization>,
    /// Free-form data echoed back on verification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

/// Charges a mobile money wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MobileMoneyChargeRequest {
    /// Wallet phone number
    pub mobile: String,
    /// Operator reference from `mobile_money.operators`
    pub mobile_money_operator_ref_id: String,
    /// Amount to charge
    pub amount: Amount,
    /// Merchant reference; generated when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge_id: Option<String>,
    /// Customer email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Customer first name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Customer last name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Sends money to a mobile money wallet. Same shape as a charge.
pub type MobileMoneyPayoutRequest = MobileMoneyChargeRequest;

/// Starts a bank-transfer collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BankTransferChargeRequest {
    /// Amount to collect
    pub amount: Amount,
    /// ISO currency code; defaults to MWK
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Merchant reference; generated when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge_id: Option<String>,
    /// Payment method; defaults to `mobile_bank_transfer`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    /// Issue a reusable account number instead of a one-off one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_permanent_account: Option<bool>,
    /// Customer email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Customer first name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Customer last name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Charges a card directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CardChargeRequest {
    /// Card number
    pub card_number: String,
    /// Expiry as `MM/YY`
    pub expiry: String,
    /// Card security code
    pub cvv: String,
    /// Name printed on the card
    pub cardholder_name: String,
    /// Amount to charge
    pub amount: Amount,
    /// ISO currency code; defaults to MWK
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Merchant reference; generated when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge_id: Option<String>,
    /// Where 3-D Secure sends the customer afterwards
    pub redirect_url: String,
    /// Customer email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Sends money to a bank account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BankPayoutRequest {
    /// Bank identifier from `payouts.supported_banks`
    pub bank_uuid: String,
    /// Beneficiary account name
    pub bank_account_name: String,
    /// Beneficiary account number
    pub bank_account_number: String,
    /// Amount to send
    pub amount: Amount,
    /// Merchant reference; generated when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge_id: Option<String>,
    /// Payout method; defaults to `bank_transfer`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payout_method: Option<String>,
    /// Beneficiary email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Beneficiary first name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Beneficiary last name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Page selection for bank payout listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PayoutListQuery {
    /// 1-based page number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Items per page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}
