//! [`ActorEntity`] implementation for [`Book`].

use super::actions::{BookAction, BookActionResult};
use super::error::BookError;
use crate::model::book::check_pricing;
use crate::model::{Book, BookCreate, BookId, BookUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;

#[async_trait]
impl ActorEntity for Book {
    type Id = BookId;
    type Create = BookCreate;
    type Update = BookUpdate;
    type Action = BookAction;
    type ActionResult = BookActionResult;
    type Context = ();
    type Error = BookError;

    fn from_create_params(id: BookId, params: BookCreate) -> Result<Self, BookError> {
        check_pricing(params.price, params.discount).map_err(BookError::InvalidBook)?;
        if params.title.trim().is_empty() {
            return Err(BookError::InvalidBook("title must not be empty".into()));
        }
        Ok(Self {
            id,
            title: params.title,
            author: params.author,
            price: params.price,
            discount: params.discount,
            stock: params.stock,
            is_active: params.is_active,
        })
    }

    /// Price and discount changes never touch placed orders, which hold their own snapshot.
    async fn on_update(&mut self, update: BookUpdate, _ctx: &()) -> Result<(), BookError> {
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(discount) = update.discount {
            self.discount = discount;
        }
        if let Some(active) = update.is_active {
            self.is_active = active;
        }
        check_pricing(self.price, self.discount).map_err(BookError::InvalidBook)
    }

    async fn handle_action(
        &mut self,
        action: BookAction,
        _ctx: &(),
    ) -> Result<BookActionResult, BookError> {
        match action {
            BookAction::CheckStock => Ok(BookActionResult::CheckStock(self.stock)),
            BookAction::ReserveStock(0) | BookAction::RestoreStock(0) => {
                Err(BookError::InvalidQuantity(0))
            }
            BookAction::ReserveStock(quantity) => {
                if !self.is_active {
                    return Err(BookError::Inactive(self.id));
                }
                if self.stock < quantity {
                    return Err(BookError::InsufficientStock {
                        requested: quantity,
                        available: self.stock,
                    });
                }
                self.stock -= quantity;
                Ok(BookActionResult::ReserveStock(self.stock))
            }
            BookAction::RestoreStock(quantity) => {
                self.stock = self.stock.saturating_add(quantity);
                Ok(BookActionResult::RestoreStock(self.stock))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(stock: u32) -> Book {
        Book::from_create_params(BookId(1), BookCreate::new("Dune", "Frank Herbert", 20.0, stock))
            .unwrap()
    }

    #[test]
    fn test_create_rejects_bad_pricing() {
        let params = BookCreate::new("Dune", "Frank Herbert", -1.0, 1);
        assert!(matches!(
            Book::from_create_params(BookId(1), params),
            Err(BookError::InvalidBook(_))
        ));

        let params = BookCreate::new("Dune", "Frank Herbert", 10.0, 1).with_discount(120.0);
        assert!(Book::from_create_params(BookId(1), params).is_err());
    }

    #[tokio::test]
    async fn test_reserve_is_conditional() {
        let mut b = book(5);
        assert_eq!(
            b.handle_action(BookAction::ReserveStock(6), &()).await,
            Err(BookError::InsufficientStock {
                requested: 6,
                available: 5
            })
        );
        assert_eq!(b.stock, 5);

        assert_eq!(
            b.handle_action(BookAction::ReserveStock(5), &()).await,
            Ok(BookActionResult::ReserveStock(0))
        );
    }

    #[tokio::test]
    async fn test_inactive_book_cannot_be_reserved_but_can_be_restored() {
        let mut b = book(3);
        b.on_update(
            BookUpdate {
                is_active: Some(false),
                ..Default::default()
            },
            &(),
        )
        .await
        .unwrap();

        assert_eq!(
            b.handle_action(BookAction::ReserveStock(1), &()).await,
            Err(BookError::Inactive(BookId(1)))
        );
        assert_eq!(
            b.handle_action(BookAction::RestoreStock(2), &()).await,
            Ok(BookActionResult::RestoreStock(5))
        );
    }

    #[tokio::test]
    async fn test_zero_quantity_rejected() {
        let mut b = book(3);
        assert_eq!(
            b.handle_action(BookAction::ReserveStock(0), &()).await,
            Err(BookError::InvalidQuantity(0))
        );
    }

    #[tokio::test]
    async fn test_update_validates_result() {
        let mut b = book(3);
        let update = BookUpdate {
            discount: Some(-5.0),
            ..Default::default()
        };
        assert!(b.on_update(update, &()).await.is_err());
    }
}
