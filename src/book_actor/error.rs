//! Error types for the Book actor.

use crate::model::BookId;
use thiserror::Error;

/// Errors that can occur during catalog operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BookError {
    /// No book with this id.
    #[error("Book not found: {0}")]
    NotFound(BookId),

    /// The book exists but is no longer sold.
    #[error("Book {0} is not available")]
    Inactive(BookId),

    /// The requested quantity exceeds the available stock.
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },

    /// Stock actions move at least one copy.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),

    /// Rejected price or discount.
    #[error("Invalid book: {0}")]
    InvalidBook(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
