//! OneKhusa tools

use std::sync::Arc;

use serde_json::json;

use crate::http::ApiResult;
use crate::providers::onekhusa::{
    BankAccountNameLookup, BatchDisbursementRequest, DisbursementRequest, ListQuery,
    MobileMoneyNameLookup, OneKhusa, RequestToPayRequest, StatementQuery,
};
use crate::tools::args::{BatchIdArgs, CollectionIdArgs, DisbursementIdArgs, NoArgs};
use crate::tools::ToolRegistry;

/// Registers one tool per OneKhusa SDK method, plus `onekhusa_clear_token`.
pub fn register(registry: &mut ToolRegistry, client: &Arc<OneKhusa>) {
    // Collections
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "onekhusa_request_to_pay",
            "Send a OneKhusa payment request to a customer's mobile wallet",
            |c, args: RequestToPayRequest| c.collections().request_to_pay(args).await
        )
        .mutating(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "onekhusa_get_collection",
            "Get a OneKhusa collection",
            |c, args: CollectionIdArgs| c.collections().get(&args.collection_id).await
        )
        .read_only(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "onekhusa_list_collections",
            "List OneKhusa collections with optional paging, date range and status filters",
            |c, args: ListQuery| c.collections().list(&args).await
        )
        .read_only(),
    ));

    // Disbursements
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "onekhusa_single_disbursement",
            "Send one OneKhusa disbursement",
            |c, args: DisbursementRequest| c.disbursements().single(args).await
        )
        .mutating(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "onekhusa_batch_disbursement",
            "Create a OneKhusa disbursement batch awaiting approval",
            |c, args: BatchDisbursementRequest| c.disbursements().batch(args).await
        )
        .mutating(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "onekhusa_get_disbursement",
            "Get a OneKhusa disbursement",
            |c, args: DisbursementIdArgs| c.disbursements().get(&args.disbursement_id).await
        )
        .read_only(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "onekhusa_get_disbursement_batch",
            "Get a OneKhusa disbursement batch",
            |c, args: BatchIdArgs| c.disbursements().get_batch(&args.batch_id).await
        )
        .read_only(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "onekhusa_list_disbursements",
            "List OneKhusa disbursements with optional paging, date range and status filters",
            |c, args: ListQuery| c.disbursements().list(&args).await
        )
        .read_only(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "onekhusa_approve_disbursement_batch",
            "Approve a pending OneKhusa disbursement batch",
            |c, args: BatchIdArgs| c.disbursements().approve_batch(&args.batch_id).await
        )
        .mutating(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "onekhusa_cancel_disbursement_batch",
            "Cancel a pending OneKhusa disbursement batch",
            |c, args: BatchIdArgs| c.disbursements().cancel_batch(&args.batch_id).await
        )
        .mutating(),
    ));

    // Accounts
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "onekhusa_account_balance",
            "Get the OneKhusa merchant account balance",
            |c, _args: NoArgs| c.accounts().balance().await
        )
        .read_only(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "onekhusa_account_statement",
            "Get the OneKhusa merchant account statement",
            |c, args: StatementQuery| c.accounts().statement(&args).await
        )
        .read_only(),
    ));

    // Lookups
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "onekhusa_mobile_money_name_lookup",
            "Look up the registered name of a mobile money wallet",
            |c, args: MobileMoneyNameLookup| c.lookups().mobile_money_name(&args).await
        )
        .read_only(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "onekhusa_banks",
            "List banks supported by OneKhusa",
            |c, _args: NoArgs| c.lookups().banks().await
        )
        .read_only(),
    ));
    registry.register(Arc::new(
        sdk_tool!(
            client,
            "onekhusa_bank_account_name_lookup",
            "Look up the registered name of a bank account",
            |c, args: BankAccountNameLookup| c.lookups().bank_account_name(&args).await
        )
        .read_only(),
    ));

    registry.register(Arc::new(sdk_tool!(
        client,
        "onekhusa_clear_token",
        "Discard the cached OneKhusa access token so the next call fetches a new one",
        |c, _args: NoArgs| {
            c.clear_token().await;
            ApiResult::Ok(json!({ "cleared": true }))
        }
    )));
}
