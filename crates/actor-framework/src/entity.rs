//! # ActorEntity Trait
//!
//! The contract a record type fulfils to be stored by a [`ResourceActor`](crate::ResourceActor).
//! Associated types pin down the id, the creation payload, the update payload, the custom
//! actions and the error type, so a `Book` actor can never be handed an order payload.
//!
//! Hooks run inside the owning actor task. While a hook awaits (for example on another
//! actor's client held in `Context`) the owning actor processes nothing else, which is what
//! gives a hook transactional behaviour with respect to its own store.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait implemented by every record managed by a `ResourceActor`.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// Identifier. Generated by the actor from a monotonically increasing `u32`.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// Payload used to create a new record.
    type Create: Send + Sync + Debug;

    /// Payload used to update an existing record.
    ///
    /// Use [`std::convert::Infallible`] for records that only change through actions.
    type Update: Send + Sync + Debug;

    /// Resource-specific operations (e.g. `ReserveStock`).
    type Action: Send + Sync + Debug;

    /// Value returned by a successful action.
    type ActionResult: Send + Sync + Debug;

    /// Dependencies handed to the actor in [`run`](crate::ResourceActor::run).
    type Context: Send + Sync;

    /// One error enum per resource, shared by every hook.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Builds the record from its freshly generated id and the creation payload.
    ///
    /// Synchronous checks on the payload belong here; anything that needs other actors
    /// belongs in [`on_create`](ActorEntity::on_create).
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Runs after construction and before the record is stored.
    ///
    /// An error discards the record. Side effects already performed on other actors must be
    /// compensated by the hook itself before returning the error.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies an update. Runs on a working copy which is only stored on success.
    async fn on_update(
        &mut self,
        update: Self::Update,
        ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Applies a custom action. Runs on a working copy which is only stored on success.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
