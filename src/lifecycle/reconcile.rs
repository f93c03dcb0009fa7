//! Background retry of stock that a cancellation could not put back.

use crate::clients::OrderClient;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Sends [`ReconcileStock`](crate::order_actor::OrderAction::ReconcileStock) to every order
/// that still owes stock. Returns how many orders are fully settled afterwards.
pub async fn reconcile_pending(orders: &OrderClient) -> usize {
    let owing = match orders.find(|o| !o.pending_restock.is_empty()).await {
        Ok(owing) => owing,
        Err(e) => {
            warn!(error = %e, "Could not list orders owing stock");
            return 0;
        }
    };
    if owing.is_empty() {
        return 0;
    }

    let mut settled = 0;
    for order in owing {
        match orders.reconcile_stock(order.id).await {
            Ok(order) if order.pending_restock.is_empty() => settled += 1,
            Ok(order) => {
                debug!(order_id = %order.id, lines = order.pending_restock.len(), "Still owing stock")
            }
            Err(e) => warn!(order_id = %order.id, error = %e, "Reconcile failed"),
        }
    }
    info!(settled, "Reconcile pass complete");
    settled
}

/// Runs [`reconcile_pending`] every `period` until `shutdown` flips to `true`.
pub async fn run(orders: OrderClient, period: Duration, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick fires immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                reconcile_pending(&orders).await;
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
    debug!("Reconcile job stopped");
}
