//! Pricing rules.
//!
//! Amounts are plain `f64` dollars and are never rounded while computing. Rounding to cents
//! happens only when a value is serialized, through [`serialize_money`].

use serde::{Serialize, Serializer};

pub const TAX_RATE: f64 = 0.10;
/// Orders with a subtotal strictly above this ship for free.
pub const FREE_SHIPPING_OVER: f64 = 100.0;
pub const FLAT_SHIPPING: f64 = 10.0;

/// Unit price after applying a percentage discount.
pub fn effective_price(price: f64, discount_percent: f64) -> f64 {
    if discount_percent > 0.0 {
        price - price * discount_percent / 100.0
    } else {
        price
    }
}

pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

pub fn serialize_money<S: Serializer>(amount: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_cents(*amount))
}

/// The four monetary fields of an order. `total == subtotal + tax + shipping` by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    #[serde(serialize_with = "serialize_money")]
    pub subtotal: f64,
    #[serde(serialize_with = "serialize_money")]
    pub tax: f64,
    #[serde(serialize_with = "serialize_money")]
    pub shipping: f64,
    #[serde(serialize_with = "serialize_money")]
    pub total: f64,
}

impl Totals {
    pub fn from_subtotal(subtotal: f64) -> Self {
        let tax = subtotal * TAX_RATE;
        let shipping = if subtotal > FREE_SHIPPING_OVER {
            0.0
        } else {
            FLAT_SHIPPING
        };
        Self {
            subtotal,
            tax,
            shipping,
            total: subtotal + tax + shipping,
        }
    }
}
