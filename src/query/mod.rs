//! # Order Queries
//!
//! Read side of the ledger: single orders, per-user history, the admin listing and the
//! aggregate reports. Every read goes through the actors, so results reflect committed
//! state only. Access checks live here rather than in the actor because reads never
//! change anything.

pub mod analytics;
pub mod filter;
pub mod pagination;
pub mod view;

pub use analytics::{GroupBy, OrderAnalytics, SalesReport};
pub use filter::{DateRange, OrderFilter};
pub use pagination::{PageRequest, Pagination};
pub use view::{OrderSummary, OrderView};

use crate::clients::{BookClient, OrderClient};
use crate::config::Config;
use crate::model::{Book, BookId, Caller, Order, OrderId};
use crate::order_actor::OrderError;
use actor_framework::ActorClient;
use chrono::Utc;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// One page of orders.
#[derive(Debug, Clone, Serialize)]
pub struct OrderPage {
    pub orders: Vec<OrderView>,
    pub pagination: Pagination,
}

/// Page sizes and report limits used by [`OrderQueryService`].
#[derive(Debug, Clone, Copy)]
pub struct QueryLimits {
    pub user_page_size: u32,
    pub admin_page_size: u32,
    pub max_page_size: u32,
    pub recent_orders: usize,
}

impl From<&Config> for QueryLimits {
    fn from(config: &Config) -> Self {
        Self {
            user_page_size: config.orders_page_size,
            admin_page_size: config.admin_orders_page_size,
            max_page_size: config.max_page_size,
            recent_orders: config.analytics_recent_orders,
        }
    }
}

#[derive(Clone)]
pub struct OrderQueryService {
    orders: OrderClient,
    books: BookClient,
    limits: QueryLimits,
}

pub(crate) fn require_admin(caller: &Caller) -> Result<(), OrderError> {
    if caller.is_admin {
        Ok(())
    } else {
        Err(OrderError::Forbidden("admin role required".into()))
    }
}

/// Newest first; ids break ties so equal timestamps still page deterministically.
fn newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

impl OrderQueryService {
    pub fn new(orders: OrderClient, books: BookClient, limits: QueryLimits) -> Self {
        Self {
            orders,
            books,
            limits,
        }
    }

    /// The order, if `caller` owns it or is an admin.
    #[instrument(skip(self))]
    pub async fn get_order_by_id(
        &self,
        id: OrderId,
        caller: Caller,
    ) -> Result<OrderView, OrderError> {
        let order = self
            .orders
            .get(id)
            .await?
            .ok_or(OrderError::OrderNotFound(id))?;
        if !caller.may_access(order.user_id) {
            return Err(OrderError::Forbidden(format!(
                "{id} does not belong to {}",
                caller.user_id
            )));
        }
        self.view(order).await
    }

    /// The caller's own orders, newest first.
    #[instrument(skip(self))]
    pub async fn get_user_orders(
        &self,
        caller: Caller,
        page: PageRequest,
    ) -> Result<OrderPage, OrderError> {
        let user = caller.user_id;
        let orders = self.orders.find(move |o| o.is_owned_by(user)).await?;
        self.page(orders, page, self.limits.user_page_size).await
    }

    /// Every order matching `filter`, newest first. Admins only.
    #[instrument(skip(self))]
    pub async fn get_all_orders(
        &self,
        caller: Caller,
        filter: OrderFilter,
        page: PageRequest,
    ) -> Result<OrderPage, OrderError> {
        require_admin(&caller)?;
        let orders = self.orders.find(move |o| filter.matches(o)).await?;
        self.page(orders, page, self.limits.admin_page_size).await
    }

    #[instrument(skip(self))]
    pub async fn analytics(&self, caller: Caller) -> Result<OrderAnalytics, OrderError> {
        require_admin(&caller)?;
        let orders = self.orders.find_all().await?;
        Ok(analytics::order_analytics(
            &orders,
            Utc::now(),
            self.limits.recent_orders,
        ))
    }

    #[instrument(skip(self))]
    pub async fn sales_report(
        &self,
        caller: Caller,
        range: DateRange,
        group_by: GroupBy,
    ) -> Result<SalesReport, OrderError> {
        require_admin(&caller)?;
        let orders = self
            .orders
            .find(move |o| range.contains(o.created_at))
            .await?;
        Ok(analytics::sales_report(&orders, &range, group_by))
    }

    /// View of an order the caller already holds, e.g. the reply of a lifecycle action.
    pub async fn view(&self, order: Order) -> Result<OrderView, OrderError> {
        let id = order.id;
        self.resolve(vec![order])
            .await?
            .pop()
            .ok_or(OrderError::OrderNotFound(id))
    }

    async fn page(
        &self,
        mut orders: Vec<Order>,
        request: PageRequest,
        default_limit: u32,
    ) -> Result<OrderPage, OrderError> {
        newest_first(&mut orders);
        let (orders, pagination) =
            pagination::paginate(orders, request, default_limit, self.limits.max_page_size);
        Ok(OrderPage {
            orders: self.resolve(orders).await?,
            pagination,
        })
    }

    /// Builds views, fetching the referenced books in one catalog round trip.
    async fn resolve(&self, orders: Vec<Order>) -> Result<Vec<OrderView>, OrderError> {
        let wanted: HashSet<BookId> = orders
            .iter()
            .flat_map(|o| o.items.iter().map(|i| i.book))
            .collect();
        if wanted.is_empty() {
            let none = HashMap::new();
            return Ok(orders.into_iter().map(|o| OrderView::new(o, &none)).collect());
        }
        let books: HashMap<BookId, Book> = self
            .books
            .books(wanted)
            .await
            .map_err(|e| OrderError::PersistenceError(e.to_string()))?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();
        debug!(orders = orders.len(), books = books.len(), "Resolved books");
        Ok(orders
            .into_iter()
            .map(|o| OrderView::new(o, &books))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actor_framework::mock::MockClient;
    use actor_framework::FrameworkError;

    fn service(orders: &MockClient<Order>, books: &MockClient<Book>) -> OrderQueryService {
        OrderQueryService::new(
            OrderClient::new(orders.client()),
            BookClient::new(books.client()),
            QueryLimits::from(&Config::default()),
        )
    }

    #[tokio::test]
    async fn test_admin_reports_refuse_customers() {
        let orders = MockClient::<Order>::new();
        let books = MockClient::<Book>::new();
        let svc = service(&orders, &books);

        let err = svc.analytics(Caller::customer(1)).await.unwrap_err();
        assert_eq!(err.kind(), "Forbidden");
        let err = svc
            .get_all_orders(Caller::customer(1), OrderFilter::default(), PageRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "Forbidden");
        orders.verify();
    }

    #[tokio::test]
    async fn test_missing_order_is_not_found() {
        let mut orders = MockClient::<Order>::new();
        orders.expect_get(OrderId(4)).return_ok(None);
        orders
            .expect_get(OrderId(4))
            .return_err(FrameworkError::ActorClosed);
        let books = MockClient::<Book>::new();

        let svc = service(&orders, &books);
        let err = svc
            .get_order_by_id(OrderId(4), Caller::admin(1))
            .await
            .unwrap_err();
        assert_eq!(err, OrderError::OrderNotFound(OrderId(4)));

        let err = svc
            .get_order_by_id(OrderId(4), Caller::admin(1))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "PersistenceError");
        orders.verify();
    }

    #[tokio::test]
    async fn test_empty_analytics_for_admin() {
        let mut orders = MockClient::<Order>::new();
        orders.expect_find().return_ok(vec![]);
        let books = MockClient::<Book>::new();

        let stats = service(&orders, &books)
            .analytics(Caller::admin(1))
            .await
            .unwrap();
        assert_eq!(stats.total_orders, 0);
        assert_eq!(stats.monthly_revenue, 0.0);
        orders.verify();
    }
}
