//! Persistence seam. Handlers and services only see [`Storage`]; the
//! backend is picked at startup from `AppConfig::storage_backend`.
//!
//! Every `insert_*` ignores the `id` of its argument and returns the
//! stored record with the id assigned by the backend. `save_*` replaces
//! the whole record (last write wins) and fails with `NotFound` when the
//! id is unknown. `delete_*` reports whether a record was removed.

mod database;
mod memory;
pub mod seed;

pub use database::DbStorage;
pub use memory::MemStorage;

use crate::entities::{
    Client, DiningTable, Group, MenuItem, MovementKind, Order, OrderItem, OrderKind, OrderStatus,
    StockItem, StockMovement, Supplier, TableStatus,
};
use crate::errors::ServiceResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Menu item listing filters; `search` matches the name, case-insensitively
#[derive(Debug, Clone, Default)]
pub struct MenuItemFilter {
    pub group_id: Option<i32>,
    pub available: Option<bool>,
    pub search: Option<String>,
}

impl MenuItemFilter {
    pub fn matches(&self, item: &MenuItem) -> bool {
        self.group_id.map_or(true, |g| item.group_id == Some(g))
            && self.available.map_or(true, |a| item.available == a)
            && self
                .search
                .as_deref()
                .map_or(true, |s| contains_ignore_case(&item.name, s))
    }
}

/// Order listing filters. `from`/`to` bound `created_at`, `to` exclusive.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub kind: Option<OrderKind>,
    pub table_id: Option<i32>,
    pub client_id: Option<i32>,
    pub open_only: bool,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl OrderFilter {
    pub fn open_for_table(table_id: i32) -> Self {
        Self {
            table_id: Some(table_id),
            open_only: true,
            ..Default::default()
        }
    }

    pub fn created_between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            ..Default::default()
        }
    }

    pub fn matches(&self, order: &Order) -> bool {
        self.status.map_or(true, |s| order.status == s)
            && self.kind.map_or(true, |k| order.kind == k)
            && self.table_id.map_or(true, |t| order.table_id == Some(t))
            && self.client_id.map_or(true, |c| order.client_id == Some(c))
            && (!self.open_only || order.is_open())
            && self.from.map_or(true, |f| order.created_at >= f)
            && self.to.map_or(true, |t| order.created_at < t)
    }
}

/// Case-insensitive substring match used by the search filters
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub(crate) fn client_matches(client: &Client, search: &str) -> bool {
    contains_ignore_case(&client.name, search)
        || client
            .phone
            .as_deref()
            .is_some_and(|p| p.contains(search.trim()))
}

#[async_trait]
pub trait Storage: Send + Sync {
    /// Cheap round trip used by the readiness probe
    async fn ping(&self) -> ServiceResult<()>;

    // groups
    async fn list_groups(&self) -> ServiceResult<Vec<Group>>;
    async fn get_group(&self, id: i32) -> ServiceResult<Option<Group>>;
    async fn insert_group(&self, group: Group) -> ServiceResult<Group>;
    async fn save_group(&self, group: Group) -> ServiceResult<Group>;
    async fn delete_group(&self, id: i32) -> ServiceResult<bool>;

    // menu items
    async fn list_menu_items(&self, filter: &MenuItemFilter) -> ServiceResult<Vec<MenuItem>>;
    async fn get_menu_item(&self, id: i32) -> ServiceResult<Option<MenuItem>>;
    async fn find_menu_item_by_barcode(&self, barcode: &str) -> ServiceResult<Option<MenuItem>>;
    async fn count_menu_items_in_group(&self, group_id: i32) -> ServiceResult<u64>;
    async fn insert_menu_item(&self, item: MenuItem) -> ServiceResult<MenuItem>;
    async fn save_menu_item(&self, item: MenuItem) -> ServiceResult<MenuItem>;
    async fn delete_menu_item(&self, id: i32) -> ServiceResult<bool>;

    // clients
    async fn list_clients(&self, search: Option<&str>) -> ServiceResult<Vec<Client>>;
    async fn get_client(&self, id: i32) -> ServiceResult<Option<Client>>;
    async fn insert_client(&self, client: Client) -> ServiceResult<Client>;
    async fn save_client(&self, client: Client) -> ServiceResult<Client>;
    async fn delete_client(&self, id: i32) -> ServiceResult<bool>;

    // dining tables
    async fn list_tables(&self, status: Option<TableStatus>) -> ServiceResult<Vec<DiningTable>>;
    async fn get_table(&self, id: i32) -> ServiceResult<Option<DiningTable>>;
    async fn find_table_by_number(&self, number: i32) -> ServiceResult<Option<DiningTable>>;
    async fn insert_table(&self, table: DiningTable) -> ServiceResult<DiningTable>;
    async fn save_table(&self, table: DiningTable) -> ServiceResult<DiningTable>;
    async fn delete_table(&self, id: i32) -> ServiceResult<bool>;

    // suppliers
    async fn list_suppliers(&self) -> ServiceResult<Vec<Supplier>>;
    async fn get_supplier(&self, id: i32) -> ServiceResult<Option<Supplier>>;
    async fn insert_supplier(&self, supplier: Supplier) -> ServiceResult<Supplier>;
    async fn save_supplier(&self, supplier: Supplier) -> ServiceResult<Supplier>;
    async fn delete_supplier(&self, id: i32) -> ServiceResult<bool>;

    // stock
    async fn list_stock_items(&self) -> ServiceResult<Vec<StockItem>>;
    async fn get_stock_item(&self, id: i32) -> ServiceResult<Option<StockItem>>;
    async fn find_stock_item_by_barcode(&self, barcode: &str)
        -> ServiceResult<Option<StockItem>>;
    async fn insert_stock_item(&self, item: StockItem) -> ServiceResult<StockItem>;
    async fn save_stock_item(&self, item: StockItem) -> ServiceResult<StockItem>;
    /// Removes the item together with its movement history
    async fn delete_stock_item(&self, id: i32) -> ServiceResult<bool>;
    /// Adds `delta` to the item's quantity and records the movement, atomically.
    /// `None` when the item does not exist.
    async fn apply_stock_movement(
        &self,
        stock_item_id: i32,
        kind: MovementKind,
        delta: Decimal,
        reason: Option<String>,
    ) -> ServiceResult<Option<(StockItem, StockMovement)>>;
    /// Newest first; all items when `stock_item_id` is `None`
    async fn list_movements(&self, stock_item_id: Option<i32>)
        -> ServiceResult<Vec<StockMovement>>;

    // orders
    /// Newest first
    async fn list_orders(&self, filter: &OrderFilter) -> ServiceResult<Vec<Order>>;
    async fn get_order(&self, id: i32) -> ServiceResult<Option<Order>>;
    async fn find_order_by_number(&self, number: i32) -> ServiceResult<Option<Order>>;
    /// Assigns `number = max + 1` and stores the order with its items atomically
    async fn insert_order(
        &self,
        order: Order,
        items: Vec<OrderItem>,
    ) -> ServiceResult<(Order, Vec<OrderItem>)>;
    async fn save_order(&self, order: Order) -> ServiceResult<Order>;
    /// Removes the order and its items
    async fn delete_order(&self, id: i32) -> ServiceResult<bool>;

    // order items
    async fn list_order_items(&self, order_id: i32) -> ServiceResult<Vec<OrderItem>>;
    async fn list_items_for_orders(&self, order_ids: &[i32]) -> ServiceResult<Vec<OrderItem>>;
    async fn get_order_item(&self, id: i32) -> ServiceResult<Option<OrderItem>>;
    async fn insert_order_item(&self, item: OrderItem) -> ServiceResult<OrderItem>;
    async fn save_order_item(&self, item: OrderItem) -> ServiceResult<OrderItem>;
    async fn delete_order_item(&self, id: i32) -> ServiceResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::OrderKind;

    fn order_at(status: OrderStatus, table_id: Option<i32>) -> Order {
        let now = Utc::now();
        Order {
            id: 1,
            number: 1,
            kind: OrderKind::Table,
            status,
            table_id,
            client_id: None,
            customer_name: None,
            delivery_address: None,
            notes: None,
            subtotal: Decimal::ZERO,
            discount: Decimal::ZERO,
            service_fee: Decimal::ZERO,
            delivery_fee: Decimal::ZERO,
            total: Decimal::ZERO,
            payment_method: None,
            amount_paid: None,
            change_due: None,
            created_at: now,
            updated_at: now,
            closed_at: None,
        }
    }

    #[test]
    fn open_table_filter_skips_closed_orders() {
        let filter = OrderFilter::open_for_table(4);
        assert!(filter.matches(&order_at(OrderStatus::Ready, Some(4))));
        assert!(!filter.matches(&order_at(OrderStatus::Finished, Some(4))));
        assert!(!filter.matches(&order_at(OrderStatus::Pending, Some(5))));
    }

    #[test]
    fn date_range_upper_bound_is_exclusive() {
        let order = order_at(OrderStatus::Pending, None);
        let at = order.created_at;
        assert!(OrderFilter::created_between(at, at + chrono::Duration::seconds(1)).matches(&order));
        assert!(!OrderFilter::created_between(at - chrono::Duration::seconds(1), at).matches(&order));
    }

    #[test]
    fn search_is_case_insensitive() {
        assert!(contains_ignore_case("Pastel de Queijo", "queijo"));
        assert!(!contains_ignore_case("Coxinha", "pastel"));
    }

    #[test]
    fn search_folds_accents_and_takes_wildcards_literally() {
        assert!(contains_ignore_case("PÃO DE QUEIJO", "pão"));
        assert!(!contains_ignore_case("Suco natural", "%"));
        assert!(contains_ignore_case("Desconto 10%", "10%"));
        assert!(!contains_ignore_case("Coca", "c_ca"));
    }
}
