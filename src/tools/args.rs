//! Argument types for tools whose SDK method takes a bare identifier
//!
//! Request-shaped operations reuse the provider request types directly;
//! these wrappers give path-parameter operations an object schema.

use schemars::JsonSchema;
use serde::Deserialize;

use crate::providers::pawapay::PayoutRequest;

/// No arguments
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NoArgs {}

/// PayChangu transaction reference
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TxRefArgs {
    /// Transaction reference used when the payment was initiated
    pub tx_ref: String,
}

/// PayChangu charge identifier
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ChargeIdArgs {
    /// Charge identifier returned when the charge or payout was created
    pub charge_id: String,
}

/// Optional currency filter
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct CurrencyArgs {
    /// ISO currency code, e.g. "MWK"
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DepositIdArgs {
    /// Deposit identifier (UUID)
    pub deposit_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PayoutIdArgs {
    /// Payout identifier (UUID)
    pub payout_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RefundIdArgs {
    /// Refund identifier (UUID)
    pub refund_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CountryArgs {
    /// ISO 3166-1 alpha-3 country code, e.g. "MWI"
    pub country: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MsisdnArgs {
    /// Phone number in international format without '+'
    pub msisdn: String,
}

/// pawaPay bulk payout batch
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BulkPayoutArgs {
    /// Payouts to initiate in one request
    pub payouts: Vec<PayoutRequest>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CollectionIdArgs {
    /// Collection identifier
    pub collection_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DisbursementIdArgs {
    /// Disbursement identifier
    pub disbursement_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BatchIdArgs {
    /// Disbursement batch identifier
    pub batch_id: String,
}
