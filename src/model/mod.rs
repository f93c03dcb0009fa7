//! Domain records and payloads. `Book` and `Order` implement
//! [`ActorEntity`](actor_framework::ActorEntity) in [`book_actor`](crate::book_actor) and
//! [`order_actor`](crate::order_actor).

pub mod book;
pub mod money;
pub mod order;

pub use book::*;
pub use money::Totals;
pub use order::*;
