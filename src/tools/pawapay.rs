//! pawaPay tools

use std::sync::Arc;

use crate::providers::pawapay::{
    AvailabilityQuery, DepositRequest, PawaPay, PaymentPageRequest, PayoutRequest, RefundRequest,
};
use crate::tools::args::{
    BulkPayoutArgs, CountryArgs, DepositIdArgs, MsisdnArgs, NoArgs, PayoutIdArgs, RefundIdArgs,
};
use crate::tools::ToolRegistry;

/// Registers one tool per pawaPay SDK method.
pub fn register(registry: &mut ToolRegistry, client: &Arc<PawaPay>) {
    // Deposits
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "pawapay_initiate_deposit",
            "Request a mobile money payment from a customer through pawaPay",
            |c, args: DepositRequest| c.deposits().initiate(args).await
        )
        .mutating(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "pawapay_deposit_status",
            "Check the status of a pawaPay deposit",
            |c, args: DepositIdArgs| c.deposits().status(&args.deposit_id).await
        )
        .read_only(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "pawapay_resend_deposit_callback",
            "Ask pawaPay to resend the callback for a deposit",
            |c, args: DepositIdArgs| c.deposits().resend_callback(&args.deposit_id).await
        )
        .mutating(),
    ));

    // Payouts
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "pawapay_initiate_payout",
            "Send money to a customer's mobile money wallet through pawaPay",
            |c, args: PayoutRequest| c.payouts().initiate(args).await
        )
        .mutating(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "pawapay_initiate_bulk_payout",
            "Send several pawaPay payouts in one request",
            |c, args: BulkPayoutArgs| c.payouts().initiate_bulk(args.payouts).await
        )
        .mutating(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "pawapay_payout_status",
            "Check the status of a pawaPay payout",
            |c, args: PayoutIdArgs| c.payouts().status(&args.payout_id).await
        )
        .read_only(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "pawapay_resend_payout_callback",
            "Ask pawaPay to resend the callback for a payout",
            |c, args: PayoutIdArgs| c.payouts().resend_callback(&args.payout_id).await
        )
        .mutating(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "pawapay_cancel_enqueued_payout",
            "Cancel a pawaPay payout that is still enqueued",
            |c, args: PayoutIdArgs| c.payouts().cancel_enqueued(&args.payout_id).await
        )
        .mutating(),
    ));

    // Refunds
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "pawapay_initiate_refund",
            "Refund a completed pawaPay deposit",
            |c, args: RefundRequest| c.refunds().initiate(args).await
        )
        .mutating(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "pawapay_refund_status",
            "Check the status of a pawaPay refund",
            |c, args: RefundIdArgs| c.refunds().status(&args.refund_id).await
        )
        .read_only(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "pawapay_resend_refund_callback",
            "Ask pawaPay to resend the callback for a refund",
            |c, args: RefundIdArgs| c.refunds().resend_callback(&args.refund_id).await
        )
        .mutating(),
    ));

    registry.register(Arc::new(
        sdk_tool!(
            client,
            "pawapay_create_payment_page",
            "Create a pawaPay hosted payment page session and return its URL",
            |c, args: PaymentPageRequest| c.payment_page().create_session(args).await
        )
        .mutating(),
    ));

    registry.register(Arc::new(
        sdk_tool!(
            client,
            "pawapay_wallet_balances",
            "Get pawaPay wallet balances for every country",
            |c, _args: NoArgs| c.wallets().balances().await
        )
        .read_only(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "pawapay_country_wallet_balance",
            "Get pawaPay wallet balances for one country",
            |c, args: CountryArgs| c.wallets().country_balance(&args.country).await
        )
        .read_only(),
    ));

    // Toolkit
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "pawapay_active_configuration",
            "Get the pawaPay account configuration: countries, correspondents and limits",
            |c, _args: NoArgs| c.toolkit().active_configuration().await
        )
        .read_only(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "pawapay_availability",
            "Check which pawaPay correspondents are operational",
            |c, args: AvailabilityQuery| c.toolkit().availability(&args).await
        )
        .read_only(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "pawapay_predict_correspondent",
            "Predict the mobile network of a phone number",
            |c, args: MsisdnArgs| c.toolkit().predict_correspondent(&args.msisdn).await
        )
        .read_only(),
    ));
}
