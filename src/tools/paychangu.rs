//! PayChangu tools

use std::sync::Arc;

use crate::providers::paychangu::{
    BankPayoutRequest, BankTransferChargeRequest, CardChargeRequest, CheckoutRequest,
    MobileMoneyChargeRequest, MobileMoneyPayoutRequest, PayChangu, PayoutListQuery,
};
use crate::tools::args::{ChargeIdArgs, CurrencyArgs, NoArgs, TxRefArgs};
use crate::tools::ToolRegistry;

/// Registers one tool per PayChangu SDK method.
pub fn register(registry: &mut ToolRegistry, client: &Arc<PayChangu>) {
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "paychangu_initiate_payment",
            "Start a PayChangu hosted checkout and return the redirect URL",
            |c, args: CheckoutRequest| c.checkout().initiate_payment(args).await
        )
        .mutating(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "paychangu_verify_payment",
            "Verify a PayChangu checkout payment by transaction reference",
            |c, args: TxRefArgs| c.checkout().verify_payment(&args.tx_ref).await
        )
        .read_only(),
    ));

    registry.register(Arc::new(
        sdk_tool!(
            client,
            "paychangu_mobile_money_operators",
            "List PayChangu mobile money operators",
            |c, _args: NoArgs| c.mobile_money().operators().await
        )
        .read_only(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "paychangu_mobile_money_charge",
            "Charge a mobile money wallet through PayChangu",
            |c, args: MobileMoneyChargeRequest| c.mobile_money().charge(args).await
        )
        .mutating(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "paychangu_mobile_money_verify",
            "Verify a PayChangu mobile money charge",
            |c, args: ChargeIdArgs| c.mobile_money().verify(&args.charge_id).await
        )
        .read_only(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "paychangu_mobile_money_details",
            "Get details of a PayChangu mobile money charge",
            |c, args: ChargeIdArgs| c.mobile_money().details(&args.charge_id).await
        )
        .read_only(),
    ));

    registry.register(Arc::new(
        sdk_tool!(
            client,
            "paychangu_bank_transfer_charge",
            "Create a PayChangu bank transfer charge",
            |c, args: BankTransferChargeRequest| c.bank_transfer().charge(args).await
        )
        .mutating(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "paychangu_bank_transfer_details",
            "Get details of a PayChangu bank transfer charge",
            |c, args: ChargeIdArgs| c.bank_transfer().details(&args.charge_id).await
        )
        .read_only(),
    ));

    registry.register(Arc::new(
        sdk_tool!(
            client,
            "paychangu_card_charge",
            "Charge a card through PayChangu",
            |c, args: CardChargeRequest| c.card().charge(args).await
        )
        .mutating(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "paychangu_card_verify",
            "Verify a PayChangu card charge",
            |c, args: ChargeIdArgs| c.card().verify(&args.charge_id).await
        )
        .read_only(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "paychangu_card_refund",
            "Refund a PayChangu card charge",
            |c, args: ChargeIdArgs| c.card().refund(&args.charge_id).await
        )
        .mutating(),
    ));

    registry.register(Arc::new(
        sdk_tool!(
            client,
            "paychangu_mobile_money_payout",
            "Send a PayChangu payout to a mobile money wallet",
            |c, args: MobileMoneyPayoutRequest| c.payouts().mobile_money(args).await
        )
        .mutating(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "paychangu_mobile_money_payout_details",
            "Get details of a PayChangu mobile money payout",
            |c, args: ChargeIdArgs| c.payouts().mobile_money_details(&args.charge_id).await
        )
        .read_only(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "paychangu_supported_banks",
            "List banks PayChangu can pay out to",
            |c, args: CurrencyArgs| c.payouts().supported_banks(args.currency.as_deref()).await
        )
        .read_only(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "paychangu_bank_payout",
            "Send a PayChangu payout to a bank account",
            |c, args: BankPayoutRequest| c.payouts().bank(args).await
        )
        .mutating(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "paychangu_bank_payout_details",
            "Get details of a PayChangu bank payout",
            |c, args: ChargeIdArgs| c.payouts().bank_details(&args.charge_id).await
        )
        .read_only(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "paychangu_list_bank_payouts",
            "List PayChangu bank payouts page by page",
            |c, args: PayoutListQuery| c.payouts().list_bank_payouts(&args).await
        )
        .read_only(),
    ));
}
