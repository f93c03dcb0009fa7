//! Real Order actor against a scripted catalog.
//!
//! The catalog is a [`MockClient`], so each test states exactly which catalog requests
//! the ledger makes and what they return, including failures a real catalog rarely
//! produces.

use actor_framework::mock::MockClient;
use actor_framework::{ActorClient, FrameworkError};
use bookstore_orders::book_actor::{BookActionResult, BookError};
use bookstore_orders::clients::{BookClient, OrderClient};
use bookstore_orders::lifecycle::reconcile::reconcile_pending;
use bookstore_orders::model::{
    Address, Book, BookId, Caller, OrderCreate, OrderItemRequest, OrderStatus, PaymentMethod,
    RestockLine, UserId,
};
use bookstore_orders::order_actor::{self, OrderContext, OrderError};
use bookstore_orders::utils::retry::RetryConfig;
use std::time::Duration;

fn book(id: u32, title: &str, stock: u32) -> Book {
    Book {
        id: BookId(id),
        title: title.into(),
        author: "Anon".into(),
        price: 20.0,
        discount: 10.0,
        stock,
        is_active: true,
    }
}

fn address() -> Address {
    Address {
        name: "Grace Hopper".into(),
        phone: "+12025550143".into(),
        street: "1 Navy Yard Road".into(),
        city: "Arlington".into(),
        state: "VA".into(),
        zip_code: "22202".into(),
        country: "USA".into(),
    }
}

fn cart(user: u32, lines: &[(u32, u32)]) -> OrderCreate {
    OrderCreate {
        user_id: UserId(user),
        items: lines
            .iter()
            .map(|&(book, quantity)| OrderItemRequest {
                book: BookId(book),
                quantity,
            })
            .collect(),
        payment_method: PaymentMethod::CreditCard,
        shipping_address: address(),
        billing_address: None,
        notes: None,
    }
}

fn start_ledger(books: &MockClient<Book>, retry: RetryConfig) -> OrderClient {
    let (actor, client) = order_actor::new(8);
    let context = OrderContext::new(BookClient::new(books.client())).with_restock_retry(retry);
    tokio::spawn(actor.run(context));
    OrderClient::new(client)
}

#[tokio::test]
async fn test_placement_prices_from_catalog_and_reserves() {
    let mut books = MockClient::<Book>::new();
    books.expect_get(BookId(1)).return_ok(Some(book(1, "Dune", 5)));
    books
        .expect_action(BookId(1))
        .return_ok(BookActionResult::ReserveStock(3));
    let orders = start_ledger(&books, RetryConfig::none());

    let order = orders.place_order(cart(1, &[(1, 2)])).await.unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.items[0].price, 20.0);
    assert_eq!(order.items[0].discount, 10.0);
    assert!((order.totals.subtotal - 36.0).abs() < 1e-9);
    assert!((order.totals.tax - 3.6).abs() < 1e-9);
    assert_eq!(order.totals.shipping, 10.0);
    assert!((order.totals.total - 49.6).abs() < 1e-9);
    assert_eq!(order.billing_address, order.shipping_address);
    books.verify();
}

#[tokio::test]
async fn test_invalid_cart_never_reaches_catalog() {
    let books = MockClient::<Book>::new();
    let orders = start_ledger(&books, RetryConfig::none());

    let err = orders.place_order(cart(1, &[])).await.unwrap_err();
    assert_eq!(err.kind(), "ValidationError");
    assert!(orders.find_all().await.unwrap().is_empty());
    books.verify();
}

#[tokio::test]
async fn test_unknown_or_inactive_book_is_book_not_found() {
    let mut books = MockClient::<Book>::new();
    books.expect_get(BookId(7)).return_ok(None);
    let mut retired = book(8, "Old", 3);
    retired.is_active = false;
    books.expect_get(BookId(8)).return_ok(Some(retired));
    let orders = start_ledger(&books, RetryConfig::none());

    assert_eq!(
        orders.place_order(cart(1, &[(7, 1)])).await.unwrap_err(),
        OrderError::BookNotFound(BookId(7))
    );
    assert_eq!(
        orders.place_order(cart(1, &[(8, 1)])).await.unwrap_err(),
        OrderError::BookNotFound(BookId(8))
    );
    books.verify();
}

#[tokio::test]
async fn test_refused_reservation_rolls_back_earlier_lines() {
    let mut books = MockClient::<Book>::new();
    books.expect_get(BookId(1)).return_ok(Some(book(1, "Dune", 5)));
    books.expect_get(BookId(2)).return_ok(Some(book(2, "Emma", 1)));
    books
        .expect_action(BookId(1))
        .return_ok(BookActionResult::ReserveStock(4));
    // Someone else took the last copy between validation and reservation.
    books
        .expect_action(BookId(2))
        .return_err(FrameworkError::EntityError(Box::new(
            BookError::InsufficientStock {
                requested: 1,
                available: 0,
            },
        )));
    books
        .expect_action(BookId(1))
        .return_ok(BookActionResult::RestoreStock(5));
    let orders = start_ledger(&books, RetryConfig::none());

    let err = orders
        .place_order(cart(1, &[(1, 1), (2, 1)]))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        OrderError::InsufficientStock {
            book: BookId(2),
            title: "Emma".into(),
            requested: 1,
            available: 0,
        }
    );
    assert!(orders.find_all().await.unwrap().is_empty());
    books.verify();
}

#[tokio::test]
async fn test_failed_restock_is_kept_and_reconciled_later() {
    let mut books = MockClient::<Book>::new();
    books.expect_get(BookId(1)).return_ok(Some(book(1, "Dune", 5)));
    books
        .expect_action(BookId(1))
        .return_ok(BookActionResult::ReserveStock(3));
    books
        .expect_action(BookId(1))
        .return_err(FrameworkError::ActorClosed);
    let orders = start_ledger(&books, RetryConfig::none());

    let placed = orders.place_order(cart(1, &[(1, 2)])).await.unwrap();
    let cancelled = orders
        .cancel_order(placed.id, Caller::customer(1), Some("too slow".into()))
        .await
        .unwrap();

    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert!(cancelled.cancelled_at.is_some());
    assert_eq!(cancelled.cancellation_reason.as_deref(), Some("too slow"));
    assert_eq!(
        cancelled.pending_restock,
        vec![RestockLine {
            book: BookId(1),
            quantity: 2
        }]
    );

    books
        .expect_action(BookId(1))
        .return_ok(BookActionResult::RestoreStock(5));
    assert_eq!(reconcile_pending(&orders).await, 1);

    let settled = orders.get(placed.id).await.unwrap().unwrap();
    assert!(settled.pending_restock.is_empty());
    assert_eq!(reconcile_pending(&orders).await, 0);
    books.verify();
}

#[tokio::test]
async fn test_restock_retries_transient_failures() {
    let mut books = MockClient::<Book>::new();
    books.expect_get(BookId(1)).return_ok(Some(book(1, "Dune", 5)));
    books
        .expect_action(BookId(1))
        .return_ok(BookActionResult::ReserveStock(4));
    books
        .expect_action(BookId(1))
        .return_err(FrameworkError::ActorDropped);
    books
        .expect_action(BookId(1))
        .return_ok(BookActionResult::RestoreStock(5));
    let retry = RetryConfig {
        max_attempts: 3,
        initial_delay: Duration::from_millis(1),
        ..RetryConfig::default()
    };
    let orders = start_ledger(&books, retry);

    let placed = orders.place_order(cart(1, &[(1, 1)])).await.unwrap();
    let cancelled = orders
        .cancel_order(placed.id, Caller::admin(99), None)
        .await
        .unwrap();

    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert!(cancelled.pending_restock.is_empty());
    books.verify();
}

#[tokio::test]
async fn test_rejected_cancel_touches_nothing() {
    let mut books = MockClient::<Book>::new();
    books.expect_get(BookId(1)).return_ok(Some(book(1, "Dune", 5)));
    books
        .expect_action(BookId(1))
        .return_ok(BookActionResult::ReserveStock(4));
    let orders = start_ledger(&books, RetryConfig::none());

    let placed = orders.place_order(cart(1, &[(1, 1)])).await.unwrap();

    let err = orders
        .cancel_order(placed.id, Caller::customer(2), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "Forbidden");

    let err = orders
        .cancel_order(placed.id, Caller::customer(1), Some("x".repeat(201)))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "ValidationError");

    let stored = orders.get(placed.id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Pending);
    assert!(stored.cancelled_at.is_none());
    books.verify();
}
