/// A catalog entry.
///
/// # Actor Framework
/// Managed by the catalog [`ResourceActor`](actor_framework::ResourceActor); see
/// [`book_actor`](crate::book_actor) for the stock actions.
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Books.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub u32);

impl From<u32> for BookId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "book_{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub price: f64,
    /// Percent, 0 to 100.
    pub discount: f64,
    pub stock: u32,
    pub is_active: bool,
}

impl Book {
    /// Whether an order may currently take `quantity` copies.
    pub fn can_supply(&self, quantity: u32) -> bool {
        self.is_active && self.stock >= quantity
    }
}

fn active_by_default() -> bool {
    true
}

/// Payload for adding a book to the catalog. Also the record format of the seed file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookCreate {
    pub title: String,
    pub author: String,
    pub price: f64,
    #[serde(default)]
    pub discount: f64,
    pub stock: u32,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

impl BookCreate {
    pub fn new(title: impl Into<String>, author: impl Into<String>, price: f64, stock: u32) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            price,
            discount: 0.0,
            stock,
            is_active: true,
        }
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }
}

/// Catalog edits. Stock only moves through stock actions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookUpdate {
    pub price: Option<f64>,
    pub discount: Option<f64>,
    pub is_active: Option<bool>,
}

/// Checks shared by create and update.
pub(crate) fn check_pricing(price: f64, discount: f64) -> Result<(), String> {
    if !price.is_finite() || price < 0.0 {
        return Err(format!("price must be a non-negative number, got {price}"));
    }
    if !discount.is_finite() || !(0.0..=100.0).contains(&discount) {
        return Err(format!("discount must be between 0 and 100, got {discount}"));
    }
    Ok(())
}
