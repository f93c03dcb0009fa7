//! # Bookstore Orders
//!
//! Order lifecycle and inventory consistency for an online bookstore, built from
//! resource actors (see [`actor_framework`]).
//!
//! ## Layout
//!
//! - [`model`]: books, orders, addresses and money arithmetic.
//! - [`book_actor`]: the catalog. Owns stock and applies every stock change atomically.
//! - [`order_actor`]: the ledger. Places orders against the catalog and runs the
//!   status and payment state machine.
//! - [`clients`]: typed handles on both actors.
//! - [`query`]: reads, authorization of reads, analytics and sales reports.
//! - [`lifecycle`]: [`OrderSystem`](lifecycle::OrderSystem), which starts, wires and stops
//!   everything, plus the stock reconciliation job.
//! - [`api`]: the axum HTTP surface.
//! - [`config`], [`utils`]: environment configuration and retry with backoff.
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=info CATALOG_SEED_PATH=books.json cargo run
//! ```

pub mod api;
pub mod book_actor;
pub mod clients;
pub mod config;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod query;
pub mod utils;
