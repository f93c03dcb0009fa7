//! Type-safe wrappers around [`ResourceClient`](actor_framework::ResourceClient).

pub mod book_client;
pub mod order_client;

pub use book_client::*;
pub use order_client::*;
