/// A placed order and everything needed to place one.
///
/// # Actor Framework
/// Managed by the order ledger [`ResourceActor`](actor_framework::ResourceActor). Line items
/// are priced in [`ActorEntity::on_create`](actor_framework::ActorEntity::on_create) and only
/// the status and payment fields change afterwards; see [`order_actor`](crate::order_actor).
use crate::model::money::{self, serialize_money, Totals};
use crate::model::BookId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// Identifier issued by the external user directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u32);

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user_{}", self.0)
    }
}

/// Who is asking, as established by the authentication layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: UserId,
    pub is_admin: bool,
}

impl Caller {
    pub fn customer(user_id: u32) -> Self {
        Self {
            user_id: UserId(user_id),
            is_admin: false,
        }
    }

    pub fn admin(user_id: u32) -> Self {
        Self {
            user_id: UserId(user_id),
            is_admin: true,
        }
    }

    pub fn may_access(&self, owner: UserId) -> bool {
        self.is_admin || self.user_id == owner
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Position on the fulfilment path. `None` for `Cancelled`, which sits beside it.
    fn step(self) -> Option<u8> {
        match self {
            OrderStatus::Pending => Some(0),
            OrderStatus::Confirmed => Some(1),
            OrderStatus::Processing => Some(2),
            OrderStatus::Shipped => Some(3),
            OrderStatus::Delivered => Some(4),
            OrderStatus::Cancelled => None,
        }
    }

    /// Whether `next` is reachable from `self`.
    ///
    /// The fulfilment path `pending → confirmed → processing → shipped → delivered` only
    /// moves forward, though steps may be skipped. `cancelled` is reachable from `pending`,
    /// `confirmed` and `processing`. Terminal statuses reach nothing, and a status never
    /// reaches itself.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match (self.step(), next.step()) {
            (_, None) => matches!(
                self,
                OrderStatus::Pending | OrderStatus::Confirmed | OrderStatus::Processing
            ),
            (Some(from), Some(to)) => to > from,
            (None, Some(_)) => false,
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        };
        f.write_str(s)
    }
}

/// Accepted payment rails. The core stores the choice and never talks to a gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Paypal,
    Stripe,
    Razorpay,
    CashOnDelivery,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    #[serde(alias = "zip")]
    pub zip_code: String,
    pub country: String,
}

/// One offending input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// `+` optional, then a non-zero digit, then up to 15 more digits.
fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    let mut chars = digits.chars();
    matches!(chars.next(), Some('1'..='9'))
        && digits.len() <= 16
        && chars.all(|c| c.is_ascii_digit())
}

impl Address {
    /// Appends one [`FieldError`] per invalid field, prefixing field names with `prefix`.
    pub fn validate(&self, prefix: &str, errors: &mut Vec<FieldError>) {
        let mut length = |field: &str, value: &str, min: usize, max: usize| {
            let len = value.trim().chars().count();
            if len < min || len > max {
                errors.push(FieldError::new(
                    format!("{prefix}.{field}"),
                    format!("must be between {min} and {max} characters"),
                ));
            }
        };
        length("name", &self.name, 2, 50);
        length("street", &self.street, 5, 100);
        length("city", &self.city, 2, 50);
        length("state", &self.state, 2, 50);
        length("zipCode", &self.zip_code, 3, 10);
        length("country", &self.country, 2, 50);

        if !is_valid_phone(self.phone.trim()) {
            errors.push(FieldError::new(
                format!("{prefix}.phone"),
                "must be a valid phone number",
            ));
        }
    }
}

/// A priced line of a placed order. Price and discount are the catalog values at the time
/// the order was placed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub book: BookId,
    pub quantity: u32,
    #[serde(serialize_with = "serialize_money")]
    pub price: f64,
    pub discount: f64,
}

impl LineItem {
    pub fn effective_price(&self) -> f64 {
        money::effective_price(self.price, self.discount)
    }

    pub fn line_total(&self) -> f64 {
        self.effective_price() * f64::from(self.quantity)
    }
}

/// Stock owed back to the catalog by a cancelled order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestockLine {
    pub book: BookId,
    pub quantity: u32,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<LineItem>,
    pub totals: Totals,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub payment_id: Option<String>,
    pub shipping_address: Address,
    pub billing_address: Address,
    pub notes: Option<String>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    /// Non-empty only when a cancellation could not put every item back.
    pub pending_restock: Vec<RestockLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Copies across all lines.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.user_id == user
    }
}

/// One `(book, quantity)` pair of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    #[serde(alias = "bookId")]
    pub book: BookId,
    pub quantity: u32,
}

/// Payload for placing an order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub user_id: UserId,
    pub items: Vec<OrderItemRequest>,
    pub payment_method: PaymentMethod,
    pub shipping_address: Address,
    /// Defaults to the shipping address.
    pub billing_address: Option<Address>,
    pub notes: Option<String>,
}

pub const MAX_NOTES_LEN: usize = 500;
pub const MAX_CANCELLATION_REASON_LEN: usize = 200;

impl OrderCreate {
    /// Input checks that need no catalog lookup. Returns every offending field.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.items.is_empty() {
            errors.push(FieldError::new("items", "must contain at least one item"));
        }
        for (i, item) in self.items.iter().enumerate() {
            if item.quantity < 1 {
                errors.push(FieldError::new(
                    format!("items[{i}].quantity"),
                    "must be at least 1",
                ));
            }
        }

        self.shipping_address.validate("shippingAddress", &mut errors);
        if let Some(billing) = &self.billing_address {
            billing.validate("billingAddress", &mut errors);
        }

        if let Some(notes) = &self.notes {
            if notes.chars().count() > MAX_NOTES_LEN {
                errors.push(FieldError::new(
                    "notes",
                    format!("must be at most {MAX_NOTES_LEN} characters"),
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> Address {
        Address {
            name: "Ada Lovelace".into(),
            phone: "+441234567890".into(),
            street: "12 St James's Square".into(),
            city: "London".into(),
            state: "London".into(),
            zip_code: "SW1Y 4JH".into(),
            country: "UK".into(),
        }
    }

    fn create(items: Vec<OrderItemRequest>) -> OrderCreate {
        OrderCreate {
            user_id: UserId(1),
            items,
            payment_method: PaymentMethod::CreditCard,
            shipping_address: address(),
            billing_address: None,
            notes: None,
        }
    }

    #[test]
    fn test_forward_transitions() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Shipped));
        assert!(Shipped.can_transition_to(Delivered));
        assert!(Pending.can_transition_to(Shipped));
    }

    #[test]
    fn test_backward_and_same_transitions_rejected() {
        use OrderStatus::*;
        assert!(!Shipped.can_transition_to(Processing));
        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_cancellation_window() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(Processing.can_transition_to(Cancelled));
        assert!(!Shipped.can_transition_to(Cancelled));
    }

    #[test]
    fn test_terminal_statuses_reach_nothing() {
        for next in OrderStatus::ALL {
            assert!(!OrderStatus::Delivered.can_transition_to(next));
            assert!(!OrderStatus::Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn test_phone_format() {
        assert!(is_valid_phone("+14155550100"));
        assert!(is_valid_phone("7"));
        assert!(!is_valid_phone("0123"));
        assert!(!is_valid_phone("+1-415"));
        assert!(!is_valid_phone("12345678901234567"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn test_validate_accepts_complete_order() {
        let order = create(vec![OrderItemRequest {
            book: BookId(1),
            quantity: 2,
        }]);
        assert_eq!(order.validate(), Ok(()));
    }

    #[test]
    fn test_validate_lists_every_offending_field() {
        let mut order = create(vec![OrderItemRequest {
            book: BookId(1),
            quantity: 0,
        }]);
        order.shipping_address.city = " ".into();
        order.shipping_address.phone = "abc".into();
        order.notes = Some("x".repeat(501));

        let fields: Vec<String> = order
            .validate()
            .unwrap_err()
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(
            fields,
            vec![
                "items[0].quantity",
                "shippingAddress.city",
                "shippingAddress.phone",
                "notes"
            ]
        );
    }

    #[test]
    fn test_validate_rejects_empty_cart() {
        let err = create(vec![]).validate().unwrap_err();
        assert_eq!(err[0].field, "items");
    }

    #[test]
    fn test_address_accepts_zip_alias() {
        let json = serde_json::json!({
            "name": "Bo", "phone": "5551234", "street": "1 Main St", "city": "Oslo",
            "state": "Oslo", "zip": "0150", "country": "Norway"
        });
        let address: Address = serde_json::from_value(json).unwrap();
        assert_eq!(address.zip_code, "0150");
    }
}
