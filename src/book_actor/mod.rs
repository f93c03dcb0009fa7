//! # Book Actor
//!
//! The catalog store: one [`ResourceActor`] owning every [`Book`].
//!
//! Orders never write stock directly. They send [`BookAction::ReserveStock`] and
//! [`BookAction::RestoreStock`], and because the actor handles one message at a time the
//! check-and-decrement in `ReserveStock` is atomic. Two checkouts racing for the last copy
//! are serialized in the mailbox; the second one gets
//! [`BookError::InsufficientStock`].
//!
//! ```rust
//! use bookstore_orders::book_actor;
//! use bookstore_orders::clients::BookClient;
//! use bookstore_orders::model::BookCreate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, generic_client) = book_actor::new(8);
//!     let books = BookClient::new(generic_client);
//!     tokio::spawn(actor.run(()));
//!
//!     let id = books.create_book(BookCreate::new("Dune", "Frank Herbert", 9.99, 2)).await?;
//!     assert_eq!(books.reserve_stock(id, 2).await?, 0);
//!     assert!(books.reserve_stock(id, 1).await.is_err());
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::Book;
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new Book actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Book>, ResourceClient<Book>) {
    ResourceActor::new(buffer_size)
}
