//! Response shapes. Orders are returned with the title and author of each book resolved
//! from the catalog; prices stay the snapshot taken at placement.

use crate::model::money::serialize_money;
use crate::model::{
    Address, Book, BookId, Order, OrderId, OrderStatus, PaymentMethod, PaymentStatus,
    RestockLine, Totals, UserId,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookSummary {
    pub id: BookId,
    pub title: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemView {
    /// `None` only if the book has vanished from the catalog.
    pub book: Option<BookSummary>,
    pub book_id: BookId,
    pub quantity: u32,
    #[serde(serialize_with = "serialize_money")]
    pub price: f64,
    pub discount: f64,
    #[serde(serialize_with = "serialize_money")]
    pub effective_price: f64,
    #[serde(serialize_with = "serialize_money")]
    pub line_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<LineItemView>,
    pub item_count: u64,
    #[serde(flatten)]
    pub totals: Totals,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    pub shipping_address: Address,
    pub billing_address: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pending_restock: Vec<RestockLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderView {
    pub fn new(order: Order, books: &HashMap<BookId, Book>) -> Self {
        let item_count = order.item_count();
        let items = order
            .items
            .iter()
            .map(|item| LineItemView {
                book: books.get(&item.book).map(|b| BookSummary {
                    id: b.id,
                    title: b.title.clone(),
                    author: b.author.clone(),
                }),
                book_id: item.book,
                quantity: item.quantity,
                price: item.price,
                discount: item.discount,
                effective_price: item.effective_price(),
                line_total: item.line_total(),
            })
            .collect();

        Self {
            id: order.id,
            user_id: order.user_id,
            items,
            item_count,
            totals: order.totals,
            status: order.status,
            payment_status: order.payment_status,
            payment_method: order.payment_method,
            payment_id: order.payment_id,
            shipping_address: order.shipping_address,
            billing_address: order.billing_address,
            notes: order.notes,
            estimated_delivery: order.estimated_delivery,
            delivered_at: order.delivered_at,
            cancelled_at: order.cancelled_at,
            cancellation_reason: order.cancellation_reason,
            pending_restock: order.pending_restock,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

/// Compact order line used in analytics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[serde(serialize_with = "serialize_money")]
    pub total: f64,
    pub item_count: u64,
    pub created_at: DateTime<Utc>,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            status: order.status,
            payment_status: order.payment_status,
            total: order.totals.total,
            item_count: order.item_count(),
            created_at: order.created_at,
        }
    }
}
