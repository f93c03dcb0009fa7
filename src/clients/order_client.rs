//! # Order Client
//!
//! High-level API for the order ledger. Placement and lifecycle logic run inside the
//! Order actor; this wrapper sends the requests and turns replies back into [`OrderError`].
use crate::model::{Caller, Order, OrderCreate, OrderId, OrderStatus, PaymentStatus};
use crate::order_actor::{OrderAction, OrderError};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }
}

impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        e.into_entity_error::<OrderError>()
            .unwrap_or_else(|e| OrderError::PersistenceError(e.to_string()))
    }
}

fn map_for(id: OrderId) -> impl FnOnce(FrameworkError) -> OrderError {
    move |e| match e {
        FrameworkError::NotFound(_) => OrderError::OrderNotFound(id),
        other => OrderClient::map_error(other),
    }
}

impl OrderClient {
    /// Validates, prices and stores an order, taking its stock. Returns the stored order.
    #[instrument(skip(self, params), fields(user_id = %params.user_id, items = params.items.len()))]
    pub async fn place_order(&self, params: OrderCreate) -> Result<Order, OrderError> {
        debug!("Sending request");
        let id = self.inner.create(params).await.map_err(Self::map_error)?;
        info!(order_id = %id, "Order placed");
        self.get(id).await?.ok_or(OrderError::OrderNotFound(id))
    }

    /// Orders accepted by `predicate`, in no particular order.
    #[instrument(skip(self, predicate))]
    pub async fn find(
        &self,
        predicate: impl Fn(&Order) -> bool + Send + Sync + 'static,
    ) -> Result<Vec<Order>, OrderError> {
        debug!("Sending request");
        self.inner.find(predicate).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        estimated_delivery: Option<DateTime<Utc>>,
    ) -> Result<Order, OrderError> {
        self.act(
            id,
            OrderAction::UpdateStatus {
                status,
                estimated_delivery,
                reason: None,
            },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn cancel_order(
        &self,
        id: OrderId,
        caller: Caller,
        reason: Option<String>,
    ) -> Result<Order, OrderError> {
        self.act(id, OrderAction::Cancel { caller, reason }).await
    }

    #[instrument(skip(self))]
    pub async fn update_payment_status(
        &self,
        id: OrderId,
        payment_status: PaymentStatus,
        payment_id: Option<String>,
    ) -> Result<Order, OrderError> {
        self.act(
            id,
            OrderAction::UpdatePayment {
                payment_status,
                payment_id,
            },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn reconcile_stock(&self, id: OrderId) -> Result<Order, OrderError> {
        self.act(id, OrderAction::ReconcileStock).await
    }

    async fn act(&self, id: OrderId, action: OrderAction) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, action)
            .await
            .map_err(map_for(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actor_framework::mock::{create_mock_client, expect_action, MockClient};

    #[tokio::test]
    async fn test_cancel_sends_caller_and_reason() {
        let (client, mut receiver) = create_mock_client::<Order>(4);
        let orders = OrderClient::new(client);

        let task = tokio::spawn(async move {
            orders
                .cancel_order(OrderId(3), Caller::customer(7), Some("changed my mind".into()))
                .await
        });

        let (id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(id, OrderId(3));
        assert_eq!(
            action,
            OrderAction::Cancel {
                caller: Caller::customer(7),
                reason: Some("changed my mind".into()),
            }
        );
        drop(responder);

        assert!(matches!(
            task.await.unwrap(),
            Err(OrderError::PersistenceError(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_order_maps_to_order_not_found() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_action(OrderId(5))
            .return_err(FrameworkError::NotFound("order_5".into()));
        mock.expect_action(OrderId(5))
            .return_err(FrameworkError::EntityError(Box::new(
                OrderError::InvalidTransition {
                    from: OrderStatus::Delivered,
                    to: OrderStatus::Processing,
                },
            )));

        let orders = OrderClient::new(mock.client());
        assert_eq!(
            orders
                .update_status(OrderId(5), OrderStatus::Shipped, None)
                .await
                .unwrap_err(),
            OrderError::OrderNotFound(OrderId(5))
        );
        assert_eq!(
            orders
                .update_status(OrderId(5), OrderStatus::Processing, None)
                .await
                .unwrap_err(),
            OrderError::InvalidTransition {
                from: OrderStatus::Delivered,
                to: OrderStatus::Processing,
            }
        );
        mock.verify();
    }
}
