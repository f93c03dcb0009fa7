//! # Actor Framework
//!
//! Building blocks for keeping each kind of stateful record (catalog books, order ledger
//! entries, ...) behind its own Tokio task. Callers never touch the records directly: they
//! send typed requests through a [`ResourceClient`] and the owning [`ResourceActor`] applies
//! them one at a time.
//!
//! ## Why one actor per resource?
//!
//! Sequential processing is what turns "decrement stock by N only if stock >= N" into a
//! single atomic step. Two checkouts racing for the last copy of a book land in the same
//! mailbox, the first one wins and the second one sees the updated count. No locks, no
//! read-modify-write gap between the check and the write.
//!
//! ## Layers
//!
//! 1. **Entity** ([`ActorEntity`]) - the record type and its business rules.
//! 2. **Runtime** ([`ResourceActor`]) - mailbox loop, id generation, in-memory store.
//! 3. **Interface** ([`ResourceClient`], [`ActorClient`]) - typed async calls.
//!
//! ## Example
//!
//! ```rust
//! use actor_framework::{ActorEntity, ResourceActor};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct Shelf { id: u32, copies: u32 }
//!
//! #[derive(Debug)] struct ShelfCreate { copies: u32 }
//! #[derive(Debug)] enum ShelfAction { Take(u32) }
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("only {0} copies left")]
//! struct ShelfError(u32);
//!
//! #[async_trait]
//! impl ActorEntity for Shelf {
//!     type Id = u32;
//!     type Create = ShelfCreate;
//!     type Update = std::convert::Infallible;
//!     type Action = ShelfAction;
//!     type ActionResult = u32;
//!     type Context = ();
//!     type Error = ShelfError;
//!
//!     fn from_create_params(id: u32, params: ShelfCreate) -> Result<Self, ShelfError> {
//!         Ok(Self { id, copies: params.copies })
//!     }
//!
//!     async fn on_update(&mut self, update: Self::Update, _: &()) -> Result<(), ShelfError> {
//!         match update {}
//!     }
//!
//!     async fn handle_action(&mut self, action: ShelfAction, _: &()) -> Result<u32, ShelfError> {
//!         let ShelfAction::Take(n) = action;
//!         if self.copies < n {
//!             return Err(ShelfError(self.copies));
//!         }
//!         self.copies -= n;
//!         Ok(self.copies)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = ResourceActor::<Shelf>::new(8);
//!     tokio::spawn(actor.run(()));
//!
//!     let id = client.create(ShelfCreate { copies: 2 }).await.unwrap();
//!     assert_eq!(client.perform_action(id, ShelfAction::Take(2)).await.unwrap(), 0);
//!     assert!(client.perform_action(id, ShelfAction::Take(1)).await.is_err());
//! }
//! ```
//!
//! ## Context injection
//!
//! Dependencies are handed to [`ResourceActor::run`] rather than to the constructor. The
//! order ledger needs a catalog client to reserve stock, the catalog needs nothing, so
//! both actors are created first and wired when they are spawned.
//!
//! ## Testing
//!
//! The [`mock`] module replays scripted responses so client wrappers can be tested
//! without spawning the real actor.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{Filter, ResourceRequest, Response};
