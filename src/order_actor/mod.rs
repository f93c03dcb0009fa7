//! # Order Actor
//!
//! The order ledger. Placement ([`assembly`]) happens in the create hook and every later
//! change ([`lifecycle`]) is an [`OrderAction`]. Both reach the catalog through the
//! [`BookClient`] injected as part of [`OrderContext`].
//!
//! ## Consistency
//!
//! The ledger processes one request at a time, and each stock change is a single atomic
//! action in the catalog actor. Placement reserves stock before the order is stored and
//! rolls reservations back if any line is refused, so either the order exists and its
//! stock is taken, or neither. Cancellation marks the order and restores stock in the same
//! action, retrying with backoff. Lines that still fail stay in
//! [`Order::pending_restock`](crate::model::Order::pending_restock) until
//! [`OrderAction::ReconcileStock`] succeeds for them.

pub mod actions;
pub mod assembly;
pub mod entity;
pub mod error;
pub mod lifecycle;

pub use actions::*;
pub use error::*;

use crate::clients::BookClient;
use crate::model::Order;
use crate::utils::retry::RetryConfig;
use actor_framework::{ResourceActor, ResourceClient};

/// Dependencies of the Order actor.
#[derive(Clone)]
pub struct OrderContext {
    pub books: BookClient,
    /// Backoff for compensating stock writes.
    pub restock_retry: RetryConfig,
}

impl OrderContext {
    pub fn new(books: BookClient) -> Self {
        Self {
            books,
            restock_retry: RetryConfig::default(),
        }
    }

    pub fn with_restock_retry(mut self, retry: RetryConfig) -> Self {
        self.restock_retry = retry;
        self
    }
}

/// Creates a new Order actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, ResourceClient<Order>) {
    ResourceActor::new(buffer_size)
}
