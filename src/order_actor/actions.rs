//! Lifecycle actions for the order ledger.
//!
//! After placement an order only changes through these. Each returns the order as stored
//! after the action.

use crate::model::{Caller, OrderStatus, PaymentStatus};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub enum OrderAction {
    /// Administrative status change along the transition graph.
    ///
    /// `reason` is recorded only when moving to `cancelled`; `estimated_delivery` is stored
    /// on any other accepted transition.
    UpdateStatus {
        status: OrderStatus,
        estimated_delivery: Option<DateTime<Utc>>,
        reason: Option<String>,
    },
    /// Cancellation requested by the owner or an admin.
    Cancel {
        caller: Caller,
        reason: Option<String>,
    },
    /// Payment bookkeeping. Independent of `status`.
    UpdatePayment {
        payment_status: PaymentStatus,
        payment_id: Option<String>,
    },
    /// Retries stock restoration left over from a cancellation.
    ReconcileStock,
}
