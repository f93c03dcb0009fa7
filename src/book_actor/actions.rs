//! Stock actions for the catalog actor.
//!
//! Every stock change goes through one of these, so each is a single atomic step in the
//! catalog mailbox: "take N only if N are there" can never interleave with another order.

/// Custom actions for Book entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookAction {
    /// Reads the current stock.
    CheckStock,
    /// Conditionally decrements stock.
    ///
    /// # Errors
    /// Fails if the book is inactive or holds fewer than the requested copies.
    ReserveStock(u32),
    /// Puts copies back, whether or not the book is still active.
    RestoreStock(u32),
}

/// Results from BookActions, one variant per action. Each carries the stock after the action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookActionResult {
    CheckStock(u32),
    ReserveStock(u32),
    RestoreStock(u32),
}
