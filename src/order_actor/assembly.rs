//! Order placement.
//!
//! Runs inside [`ActorEntity::on_create`](actor_framework::ActorEntity::on_create), so no
//! other order is placed or cancelled while it runs. Two passes:
//!
//! 1. **Validate and price**, in input order, reading the catalog only. The first failing
//!    line decides the error.
//! 2. **Reserve** each line with a conditional decrement. If one is refused, the lines
//!    already reserved are put back before the error is returned.
//!
//! When this returns `Ok` the actor stores the order; nothing between here and the insert
//! can fail.

use super::error::OrderError;
use super::lifecycle::restore_lines;
use super::OrderContext;
use crate::book_actor::BookError;
use crate::model::{BookId, LineItem, Order, RestockLine, Totals};
use actor_framework::ActorClient;
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

pub(crate) async fn assemble(order: &mut Order, ctx: &OrderContext) -> Result<(), OrderError> {
    info!(order_id = %order.id, user_id = %order.user_id, items = order.items.len(), "Placing order");

    let titles = validate_and_price(&mut order.items, ctx).await?;
    let subtotal: f64 = order.items.iter().map(LineItem::line_total).sum();
    order.totals = Totals::from_subtotal(subtotal);

    reserve_all(&order.items, &titles, ctx).await?;

    info!(order_id = %order.id, total = order.totals.total, "Order assembled");
    Ok(())
}

/// Returns the title of every book seen, for error messages.
async fn validate_and_price(
    items: &mut [LineItem],
    ctx: &OrderContext,
) -> Result<HashMap<BookId, String>, OrderError> {
    let mut requested: HashMap<BookId, u32> = HashMap::new();
    let mut titles = HashMap::new();

    for item in items.iter_mut() {
        let book = ctx
            .books
            .get(item.book)
            .await
            .map_err(|e| OrderError::PersistenceError(e.to_string()))?
            .filter(|book| book.is_active)
            .ok_or(OrderError::BookNotFound(item.book))?;

        // Repeated lines for one book draw on the same stock. Saturates, so a huge
        // total is simply more than any stock.
        let wanted = requested.entry(book.id).or_insert(0);
        *wanted = wanted.saturating_add(item.quantity);
        if !book.can_supply(*wanted) {
            debug!(book = %book.id, requested = *wanted, available = book.stock, "Short");
            return Err(OrderError::InsufficientStock {
                book: book.id,
                title: book.title,
                requested: *wanted,
                available: book.stock,
            });
        }

        item.price = book.price;
        item.discount = book.discount;
        titles.insert(book.id, book.title);
    }

    Ok(titles)
}

async fn reserve_all(
    items: &[LineItem],
    titles: &HashMap<BookId, String>,
    ctx: &OrderContext,
) -> Result<(), OrderError> {
    let mut taken: Vec<RestockLine> = Vec::with_capacity(items.len());

    for item in items {
        match ctx.books.reserve_stock(item.book, item.quantity).await {
            Ok(left) => {
                debug!(book = %item.book, quantity = item.quantity, left, "Reserved");
                taken.push(RestockLine {
                    book: item.book,
                    quantity: item.quantity,
                });
            }
            Err(e) => {
                warn!(book = %item.book, error = %e, rollback = taken.len(), "Reservation refused");
                let leaked = restore_lines(taken, ctx).await;
                if !leaked.is_empty() {
                    error!(?leaked, "Rollback could not return all reserved stock");
                }
                return Err(reservation_error(item, titles, e));
            }
        }
    }

    Ok(())
}

fn reservation_error(item: &LineItem, titles: &HashMap<BookId, String>, e: BookError) -> OrderError {
    match e {
        BookError::InsufficientStock {
            requested,
            available,
        } => OrderError::InsufficientStock {
            book: item.book,
            title: titles.get(&item.book).cloned().unwrap_or_default(),
            requested,
            available,
        },
        BookError::NotFound(_) | BookError::Inactive(_) => OrderError::BookNotFound(item.book),
        other => OrderError::PersistenceError(other.to_string()),
    }
}
