//! # Observability
//!
//! The actor loop logs with structured fields (`entity_type`, `id`, `size`) and domain
//! clients open a span per call via `#[tracing::instrument]`, so a checkout reads as one
//! nested trace:
//!
//! ```text
//! INFO place_order: Placing order user_id=user_1 items=1
//! DEBUG place_order: Get entity_type="Book" id=book_1 found=true
//! INFO place_order: Action ok entity_type="Book" id=book_1
//! INFO place_order: Created entity_type="Order" id=order_1 size=1
//! ```
//!
//! Verbosity is controlled with `RUST_LOG` (`info`, `debug`, or per-module filters such as
//! `RUST_LOG=bookstore_orders=debug,actor_framework=info`).

/// Installs the global subscriber. Call once, at process start.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // entity_type already says where a line comes from
        .compact()
        .init();
}
