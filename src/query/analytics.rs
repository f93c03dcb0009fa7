//! Aggregates over the whole ledger. Pure functions of the order list and the clock, so
//! an empty ledger yields zeros rather than errors.

use super::filter::DateRange;
use super::view::OrderSummary;
use crate::model::money::serialize_money;
use crate::model::{Order, OrderStatus, PaymentMethod, PaymentStatus};
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodCount {
    pub payment_method: PaymentMethod,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAnalytics {
    pub total_orders: usize,
    pub monthly_orders: usize,
    pub yearly_orders: usize,
    /// Sum of `total` over paid orders.
    #[serde(serialize_with = "serialize_money")]
    pub total_revenue: f64,
    #[serde(serialize_with = "serialize_money")]
    pub monthly_revenue: f64,
    pub status_distribution: Vec<StatusCount>,
    pub payment_method_distribution: Vec<PaymentMethodCount>,
    pub recent_orders: Vec<OrderSummary>,
}

/// Most frequent first; ties by key.
fn distribution<K: Copy + Eq + Hash + Ord>(keys: impl Iterator<Item = K>) -> Vec<(K, usize)> {
    let mut counts: HashMap<K, usize> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }
    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    counts
}

pub fn order_analytics(orders: &[Order], now: DateTime<Utc>, recent: usize) -> OrderAnalytics {
    let this_year = |o: &&Order| o.created_at.year() == now.year();
    let this_month = |o: &&Order| this_year(o) && o.created_at.month() == now.month();
    let paid = |o: &&Order| o.payment_status == PaymentStatus::Paid;

    let mut newest: Vec<&Order> = orders.iter().collect();
    newest.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

    OrderAnalytics {
        total_orders: orders.len(),
        monthly_orders: orders.iter().filter(this_month).count(),
        yearly_orders: orders.iter().filter(this_year).count(),
        total_revenue: orders.iter().filter(paid).map(|o| o.totals.total).sum(),
        monthly_revenue: orders
            .iter()
            .filter(paid)
            .filter(this_month)
            .map(|o| o.totals.total)
            .sum(),
        status_distribution: distribution(orders.iter().map(|o| o.status))
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect(),
        payment_method_distribution: distribution(orders.iter().map(|o| o.payment_method))
            .into_iter()
            .map(|(payment_method, count)| PaymentMethodCount {
                payment_method,
                count,
            })
            .collect(),
        recent_orders: newest
            .into_iter()
            .take(recent)
            .map(OrderSummary::from)
            .collect(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    #[default]
    Day,
    Month,
    Year,
}

impl GroupBy {
    /// Unknown values group by day.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("month") => GroupBy::Month,
            Some("year") => GroupBy::Year,
            _ => GroupBy::Day,
        }
    }

    fn format(self) -> &'static str {
        match self {
            GroupBy::Day => "%Y-%m-%d",
            GroupBy::Month => "%Y-%m",
            GroupBy::Year => "%Y",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalesBucket {
    pub period: String,
    pub orders: usize,
    #[serde(serialize_with = "serialize_money")]
    pub revenue: f64,
    pub items: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub sales_data: Vec<SalesBucket>,
    pub group_by: GroupBy,
}

/// Paid orders inside `range`, bucketed by period, oldest period first.
pub fn sales_report(orders: &[Order], range: &DateRange, group_by: GroupBy) -> SalesReport {
    let mut buckets: BTreeMap<String, SalesBucket> = BTreeMap::new();
    for order in orders
        .iter()
        .filter(|o| o.payment_status == PaymentStatus::Paid && range.contains(o.created_at))
    {
        let period = order.created_at.format(group_by.format()).to_string();
        let bucket = buckets.entry(period.clone()).or_insert_with(|| SalesBucket {
            period,
            ..SalesBucket::default()
        });
        bucket.orders += 1;
        bucket.revenue += order.totals.total;
        bucket.items += order.item_count();
    }
    SalesReport {
        sales_data: buckets.into_values().collect(),
        group_by,
    }
}
