//! Error types for the Order actor.

use crate::model::{BookId, FieldError, OrderId, OrderStatus};
use thiserror::Error;

fn join(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// Malformed or missing input fields.
    #[error("Validation failed: {}", join(.0))]
    ValidationError(Vec<FieldError>),

    /// The book does not exist or is no longer sold.
    #[error("Book {0} not found or unavailable")]
    BookNotFound(BookId),

    /// The catalog holds fewer copies than requested.
    #[error("Insufficient stock for {title}: requested {requested}, available {available}")]
    InsufficientStock {
        book: BookId,
        title: String,
        requested: u32,
        available: u32,
    },

    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// Caller is neither the owner nor an admin.
    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Cannot change order status from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Storage or actor plumbing failed.
    #[error("Persistence error: {0}")]
    PersistenceError(String),
}

impl OrderError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        OrderError::ValidationError(vec![FieldError::new(field, message)])
    }

    /// Stable machine-readable name, used as `kind` in error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            OrderError::ValidationError(_) => "ValidationError",
            OrderError::BookNotFound(_) => "BookNotFound",
            OrderError::InsufficientStock { .. } => "InsufficientStock",
            OrderError::OrderNotFound(_) => "OrderNotFound",
            OrderError::Forbidden(_) => "Forbidden",
            OrderError::InvalidTransition { .. } => "InvalidTransition",
            OrderError::PersistenceError(_) => "PersistenceError",
        }
    }
}
