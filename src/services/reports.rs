use crate::{
    dto::reports::{start_of_day, DateRangeQuery},
    entities::{checked_sum, Order, OrderKind, OrderStatus, PaymentMethod, StockItem},
    errors::ServiceError,
    storage::{OrderFilter, Storage},
};
use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::Iterable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

/// Longest range a report may cover, in days
pub const MAX_REPORT_DAYS: i64 = 366;
pub const MAX_TOP_ITEMS: u64 = 500;

/// Inclusive range of UTC calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReportPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportPeriod {
    pub fn resolve(query: &DateRangeQuery, today: NaiveDate) -> Result<Self, ServiceError> {
        let start = query.start_date.unwrap_or(today);
        let end = query.end_date.unwrap_or(today);
        if start > end {
            return Err(ServiceError::ValidationError(
                "start_date must not be after end_date".into(),
            ));
        }
        if (end - start).num_days() + 1 > MAX_REPORT_DAYS {
            return Err(ServiceError::ValidationError(format!(
                "report range cannot exceed {MAX_REPORT_DAYS} days"
            )));
        }
        Ok(Self { start, end })
    }

    /// `[start 00:00, end + 1 00:00)` in UTC
    pub fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let after_end = self.end.checked_add_days(Days::new(1)).unwrap_or(self.end);
        (start_of_day(self.start), start_of_day(after_end))
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentBreakdown {
    pub payment_method: PaymentMethod,
    pub orders: u64,
    #[schema(value_type = String)]
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct KindBreakdown {
    pub kind: OrderKind,
    pub orders: u64,
    #[schema(value_type = String)]
    pub total: Decimal,
}

/// Money figures cover finalized orders only
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SalesSummary {
    pub period: ReportPeriod,
    pub finalized_orders: u64,
    pub cancelled_orders: u64,
    pub open_orders: u64,
    /// Sum of subtotals
    #[schema(value_type = String)]
    pub gross_revenue: Decimal,
    #[schema(value_type = String)]
    pub discounts: Decimal,
    #[schema(value_type = String)]
    pub service_fees: Decimal,
    #[schema(value_type = String)]
    pub delivery_fees: Decimal,
    /// Sum of totals
    #[schema(value_type = String)]
    pub net_revenue: Decimal,
    #[schema(value_type = String)]
    pub average_ticket: Decimal,
    pub by_payment_method: Vec<PaymentBreakdown>,
    pub by_kind: Vec<KindBreakdown>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DailySales {
    pub date: NaiveDate,
    pub orders: u64,
    #[schema(value_type = String)]
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TopItem {
    pub menu_item_id: i32,
    pub name: String,
    pub quantity: i64,
    #[schema(value_type = String)]
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum StockLevel {
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "baixo")]
    Low,
    #[serde(rename = "zerado")]
    Empty,
}

impl StockLevel {
    pub fn of(item: &StockItem) -> Self {
        if item.quantity <= Decimal::ZERO {
            StockLevel::Empty
        } else if item.is_below_minimum() {
            StockLevel::Low
        } else {
            StockLevel::Normal
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockPosition {
    pub stock_item_id: i32,
    pub name: String,
    pub unit: String,
    #[schema(value_type = String)]
    pub quantity: Decimal,
    #[schema(value_type = String)]
    pub minimum_quantity: Decimal,
    #[schema(value_type = String)]
    pub ideal_quantity: Decimal,
    pub level: StockLevel,
    /// Quantity missing to reach the ideal level
    #[schema(value_type = String)]
    pub shortfall: Decimal,
    /// Positive balance valued at unit cost
    #[schema(value_type = String)]
    pub value: Decimal,
}

impl StockPosition {
    fn of(item: &StockItem) -> Result<Self, ServiceError> {
        let shortfall = item
            .ideal_quantity
            .checked_sub(item.quantity)
            .ok_or_else(|| ServiceError::out_of_range("stock shortfall"))?
            .max(Decimal::ZERO);
        let value = item
            .quantity
            .max(Decimal::ZERO)
            .checked_mul(item.unit_cost.unwrap_or_default())
            .ok_or_else(|| ServiceError::out_of_range("stock value"))?;
        Ok(Self {
            stock_item_id: item.id,
            name: item.name.clone(),
            unit: item.unit.clone(),
            quantity: item.quantity,
            minimum_quantity: item.minimum_quantity,
            ideal_quantity: item.ideal_quantity,
            level: StockLevel::of(item),
            shortfall,
            value,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockReport {
    pub items: Vec<StockPosition>,
    pub total_items: u64,
    pub low_items: u64,
    pub empty_items: u64,
    #[schema(value_type = String)]
    pub total_value: Decimal,
}

/// Read-only aggregations over orders and stock
#[derive(Clone)]
pub struct ReportService {
    storage: Arc<dyn Storage>,
    default_top_items: u64,
}

impl ReportService {
    pub fn new(storage: Arc<dyn Storage>, default_top_items: u64) -> Self {
        Self {
            storage,
            default_top_items,
        }
    }

    async fn orders_in(&self, period: &ReportPeriod) -> Result<Vec<Order>, ServiceError> {
        let (from, to) = period.bounds();
        self.storage
            .list_orders(&OrderFilter::created_between(from, to))
            .await
    }

    #[instrument(skip(self))]
    pub async fn sales_summary(&self, period: ReportPeriod) -> Result<SalesSummary, ServiceError> {
        let orders = self.orders_in(&period).await?;
        let summary = summarize(period, &orders)?;
        info!(
            finalized = summary.finalized_orders,
            net_revenue = %summary.net_revenue,
            "Generated sales summary"
        );
        Ok(summary)
    }

    #[instrument(skip(self))]
    pub async fn daily_sales(&self, period: ReportPeriod) -> Result<Vec<DailySales>, ServiceError> {
        let orders = self.orders_in(&period).await?;
        let mut per_day: HashMap<NaiveDate, (u64, Decimal)> = HashMap::new();
        for order in orders.iter().filter(|o| o.status == OrderStatus::Finished) {
            let slot = per_day.entry(order.created_at.date_naive()).or_default();
            slot.0 += 1;
            slot.1 = slot
                .1
                .checked_add(order.total)
                .ok_or_else(|| ServiceError::out_of_range("daily revenue"))?;
        }
        Ok(period
            .days()
            .map(|date| {
                let (orders, revenue) = per_day.get(&date).copied().unwrap_or_default();
                DailySales {
                    date,
                    orders,
                    revenue,
                }
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn top_items(
        &self,
        period: ReportPeriod,
        limit: Option<u64>,
    ) -> Result<Vec<TopItem>, ServiceError> {
        let limit = limit.unwrap_or(self.default_top_items);
        if limit == 0 || limit > MAX_TOP_ITEMS {
            return Err(ServiceError::ValidationError(format!(
                "limit must be between 1 and {MAX_TOP_ITEMS}"
            )));
        }

        let finished: Vec<i32> = self
            .orders_in(&period)
            .await?
            .into_iter()
            .filter(|o| o.status == OrderStatus::Finished)
            .map(|o| o.id)
            .collect();
        let lines = self.storage.list_items_for_orders(&finished).await?;

        let mut totals: HashMap<i32, TopItem> = HashMap::new();
        for line in lines {
            let entry = totals.entry(line.menu_item_id).or_insert_with(|| TopItem {
                menu_item_id: line.menu_item_id,
                name: line.name.clone(),
                quantity: 0,
                revenue: Decimal::ZERO,
            });
            entry.quantity += i64::from(line.quantity);
            entry.revenue = entry
                .revenue
                .checked_add(line.total)
                .ok_or_else(|| ServiceError::out_of_range("item revenue"))?;
        }

        let mut ranking: Vec<TopItem> = totals.into_values().collect();
        ranking.sort_by(|a, b| {
            b.quantity
                .cmp(&a.quantity)
                .then_with(|| b.revenue.cmp(&a.revenue))
                .then_with(|| a.menu_item_id.cmp(&b.menu_item_id))
        });
        ranking.truncate(limit as usize);
        Ok(ranking)
    }

    #[instrument(skip(self))]
    pub async fn stock_report(&self) -> Result<StockReport, ServiceError> {
        let items: Vec<StockPosition> = self
            .storage
            .list_stock_items()
            .await?
            .iter()
            .map(StockPosition::of)
            .collect::<Result<_, _>>()?;

        let count = |level| items.iter().filter(|p| p.level == level).count() as u64;
        Ok(StockReport {
            total_items: items.len() as u64,
            low_items: count(StockLevel::Low),
            empty_items: count(StockLevel::Empty),
            total_value: checked_sum(items.iter().map(|p| p.value), "stock value")?,
            items,
        })
    }
}

fn summarize(period: ReportPeriod, orders: &[Order]) -> Result<SalesSummary, ServiceError> {
    let finished: Vec<&Order> = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Finished)
        .collect();
    let sum = |f: fn(&Order) -> Decimal, what: &str| {
        checked_sum(finished.iter().map(|o| f(o)), what)
    };

    let net_revenue = sum(|o| o.total, "net revenue")?;
    let average_ticket = if finished.is_empty() {
        Decimal::ZERO
    } else {
        (net_revenue / Decimal::from(finished.len() as u64)).round_dp(2)
    };

    let mut by_payment_method = Vec::new();
    for method in PaymentMethod::iter() {
        let paid: Vec<_> = finished
            .iter()
            .filter(|o| o.payment_method == Some(method))
            .collect();
        if !paid.is_empty() {
            by_payment_method.push(PaymentBreakdown {
                payment_method: method,
                orders: paid.len() as u64,
                total: checked_sum(paid.iter().map(|o| o.total), "payment total")?,
            });
        }
    }

    let mut by_kind = Vec::new();
    for kind in OrderKind::iter() {
        let of_kind: Vec<_> = finished.iter().filter(|o| o.kind == kind).collect();
        if !of_kind.is_empty() {
            by_kind.push(KindBreakdown {
                kind,
                orders: of_kind.len() as u64,
                total: checked_sum(of_kind.iter().map(|o| o.total), "kind total")?,
            });
        }
    }

    Ok(SalesSummary {
        period,
        finalized_orders: finished.len() as u64,
        cancelled_orders: orders
            .iter()
            .filter(|o| o.status == OrderStatus::Cancelled)
            .count() as u64,
        open_orders: orders.iter().filter(|o| o.is_open()).count() as u64,
        gross_revenue: sum(|o| o.subtotal, "gross revenue")?,
        discounts: sum(|o| o.discount, "discounts")?,
        service_fees: sum(|o| o.service_fee, "service fees")?,
        delivery_fees: sum(|o| o.delivery_fee, "delivery fees")?,
        net_revenue,
        average_ticket,
        by_payment_method,
        by_kind,
    })
}
