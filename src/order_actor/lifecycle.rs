//! Status and payment changes of placed orders.
//!
//! Every function here runs on the actor's working copy of the order. Errors are returned
//! before anything outside the order is touched, so a rejected action leaves both the order
//! and the catalog unchanged.

use super::error::OrderError;
use super::OrderContext;
use crate::model::{
    Caller, Order, OrderStatus, PaymentMethod, PaymentStatus, RestockLine,
    MAX_CANCELLATION_REASON_LEN,
};
use crate::utils::retry::retry_with_backoff;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

pub(crate) async fn update_status(
    order: &mut Order,
    status: OrderStatus,
    estimated_delivery: Option<DateTime<Utc>>,
    reason: Option<String>,
    ctx: &OrderContext,
) -> Result<(), OrderError> {
    let from = order.status;
    if !from.can_transition_to(status) {
        return Err(OrderError::InvalidTransition { from, to: status });
    }
    let reason = reason.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());
    if let Some(reason) = &reason {
        if reason.chars().count() > MAX_CANCELLATION_REASON_LEN {
            return Err(OrderError::validation(
                "reason",
                format!("must be at most {MAX_CANCELLATION_REASON_LEN} characters"),
            ));
        }
    }

    let now = Utc::now();
    order.status = status;
    order.updated_at = now;
    info!(order_id = %order.id, %from, to = %status, "Status changed");

    match status {
        OrderStatus::Delivered => {
            order.delivered_at = Some(now);
            if order.payment_status == PaymentStatus::Pending
                && order.payment_method != PaymentMethod::CashOnDelivery
            {
                warn!(order_id = %order.id, "Delivered with payment still pending");
            }
        }
        OrderStatus::Cancelled => {
            order.cancelled_at = Some(now);
            if reason.is_some() {
                order.cancellation_reason = reason;
            }
            restock(order, ctx).await;
        }
        _ => {}
    }

    if status != OrderStatus::Cancelled {
        if let Some(eta) = estimated_delivery {
            order.estimated_delivery = Some(eta);
        }
    }

    Ok(())
}

pub(crate) async fn cancel(
    order: &mut Order,
    caller: Caller,
    reason: Option<String>,
    ctx: &OrderContext,
) -> Result<(), OrderError> {
    if !caller.may_access(order.user_id) {
        warn!(order_id = %order.id, caller = %caller.user_id, "Cancel denied");
        return Err(OrderError::Forbidden(
            "you can only cancel your own orders".into(),
        ));
    }
    if order.status.is_terminal() {
        return Err(OrderError::InvalidTransition {
            from: order.status,
            to: OrderStatus::Cancelled,
        });
    }
    update_status(order, OrderStatus::Cancelled, None, reason, ctx).await
}

pub(crate) fn update_payment(
    order: &mut Order,
    payment_status: PaymentStatus,
    payment_id: Option<String>,
) {
    info!(order_id = %order.id, from = %order.payment_status, to = %payment_status, "Payment status changed");
    order.payment_status = payment_status;
    if payment_id.is_some() {
        order.payment_id = payment_id;
    }
    order.updated_at = Utc::now();
}

/// Retries restoration recorded by an earlier cancellation.
pub(crate) async fn reconcile(order: &mut Order, ctx: &OrderContext) {
    if order.pending_restock.is_empty() {
        return;
    }
    let pending = std::mem::take(&mut order.pending_restock);
    let owed = pending.len();
    order.pending_restock = restore_lines(pending, ctx).await;
    order.updated_at = Utc::now();
    info!(
        order_id = %order.id,
        restored = owed - order.pending_restock.len(),
        remaining = order.pending_restock.len(),
        "Reconciled stock"
    );
}

/// Puts the stock of every line back. Anything the catalog still refuses after retrying is
/// kept on the order for [`reconcile`].
async fn restock(order: &mut Order, ctx: &OrderContext) {
    let lines = order
        .items
        .iter()
        .map(|item| RestockLine {
            book: item.book,
            quantity: item.quantity,
        })
        .collect();
    order.pending_restock = restore_lines(lines, ctx).await;
    if !order.pending_restock.is_empty() {
        warn!(
            order_id = %order.id,
            pending = ?order.pending_restock,
            "Stock restoration incomplete, left for reconciliation"
        );
    }
}

/// Returns the lines that could not be restored.
pub(crate) async fn restore_lines(lines: Vec<RestockLine>, ctx: &OrderContext) -> Vec<RestockLine> {
    let mut failed = Vec::new();
    for line in lines {
        let result = retry_with_backoff(&ctx.restock_retry, |_| {
            ctx.books.restore_stock(line.book, line.quantity)
        })
        .await;
        if let Err(e) = result.into_result() {
            warn!(book = %line.book, quantity = line.quantity, error = %e, "Restore failed");
            failed.push(line);
        }
    }
    failed
}
