//! # System Lifecycle
//!
//! [`OrderSystem`] starts the catalog and ledger actors, wires the ledger to the catalog
//! through [`OrderContext`](crate::order_actor::OrderContext), and runs the stock
//! reconciliation job beside them.
//!
//! Actors stop when every client handle is gone. [`OrderSystem::shutdown`] stops the job,
//! drops its own handles and waits; clones handed out elsewhere (the HTTP state, query
//! services) must be dropped first or shutdown waits for them.

pub mod order_system;
pub mod reconcile;

pub use order_system::*;
