//! [`ActorEntity`] implementation for [`Order`].

use super::actions::OrderAction;
use super::error::OrderError;
use super::{assembly, lifecycle, OrderContext};
use crate::model::{
    LineItem, Order, OrderCreate, OrderId, OrderStatus, PaymentStatus, Totals,
};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;
use std::convert::Infallible;

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    /// Orders only change through [`OrderAction`]s.
    type Update = Infallible;
    type Action = OrderAction;
    type ActionResult = Order;
    type Context = OrderContext;
    type Error = OrderError;

    /// Checks the input and builds an unpriced pending order.
    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, OrderError> {
        params.validate().map_err(OrderError::ValidationError)?;

        let now = Utc::now();
        let billing_address = params
            .billing_address
            .unwrap_or_else(|| params.shipping_address.clone());
        let items = params
            .items
            .iter()
            .map(|item| LineItem {
                book: item.book,
                quantity: item.quantity,
                price: 0.0,
                discount: 0.0,
            })
            .collect();

        Ok(Self {
            id,
            user_id: params.user_id,
            items,
            totals: Totals::default(),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: params.payment_method,
            payment_id: None,
            shipping_address: params.shipping_address,
            billing_address,
            notes: params
                .notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            estimated_delivery: None,
            delivered_at: None,
            cancelled_at: None,
            cancellation_reason: None,
            pending_restock: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Prices the lines and takes the stock. See [`assembly`].
    async fn on_create(&mut self, ctx: &OrderContext) -> Result<(), OrderError> {
        assembly::assemble(self, ctx).await
    }

    async fn on_update(&mut self, update: Infallible, _ctx: &OrderContext) -> Result<(), OrderError> {
        match update {}
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        ctx: &OrderContext,
    ) -> Result<Order, OrderError> {
        match action {
            OrderAction::UpdateStatus {
                status,
                estimated_delivery,
                reason,
            } => lifecycle::update_status(self, status, estimated_delivery, reason, ctx).await?,
            OrderAction::Cancel { caller, reason } => {
                lifecycle::cancel(self, caller, reason, ctx).await?
            }
            OrderAction::UpdatePayment {
                payment_status,
                payment_id,
            } => lifecycle::update_payment(self, payment_status, payment_id),
            OrderAction::ReconcileStock => lifecycle::reconcile(self, ctx).await,
        }
        Ok(self.clone())
    }
}
