use super::{client_matches, MenuItemFilter, OrderFilter, Storage};
use crate::entities::{
    Client, DiningTable, Group, MenuItem, MovementKind, Order, OrderItem, StockItem,
    StockMovement, Supplier, TableStatus,
};
use crate::errors::{ServiceError, ServiceResult};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Rows of one entity keyed by id, plus the id sequence
#[derive(Debug)]
struct Rows<T> {
    rows: BTreeMap<i32, T>,
    last_id: i32,
}

impl<T> Default for Rows<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T: Clone> Rows<T> {
    fn insert_with(&mut self, build: impl FnOnce(i32) -> T) -> T {
        self.last_id += 1;
        let row = build(self.last_id);
        self.rows.insert(self.last_id, row.clone());
        row
    }

    fn replace(&mut self, id: i32, row: T, entity: &str) -> ServiceResult<T> {
        match self.rows.get_mut(&id) {
            Some(slot) => {
                *slot = row.clone();
                Ok(row)
            }
            None => Err(ServiceError::not_found(entity, id)),
        }
    }

    fn get(&self, id: i32) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    fn filtered(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows.values().filter(|r| pred(r)).cloned().collect()
    }

    fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.rows.values().find(|r| pred(r)).cloned()
    }

    fn remove(&mut self, id: i32) -> bool {
        self.rows.remove(&id).is_some()
    }
}

#[derive(Debug, Default)]
struct State {
    groups: Rows<Group>,
    menu_items: Rows<MenuItem>,
    clients: Rows<Client>,
    tables: Rows<DiningTable>,
    suppliers: Rows<Supplier>,
    stock_items: Rows<StockItem>,
    movements: Rows<StockMovement>,
    orders: Rows<Order>,
    order_items: Rows<OrderItem>,
}

/// Volatile storage: everything lives in process memory and is lost on restart.
///
/// A single lock guards all entities, so each trait call is atomic.
#[derive(Debug, Default)]
pub struct MemStorage {
    state: RwLock<State>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> ServiceResult<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| ServiceError::InternalError("memory storage lock poisoned".into()))
    }

    fn write(&self) -> ServiceResult<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| ServiceError::InternalError("memory storage lock poisoned".into()))
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn ping(&self) -> ServiceResult<()> {
        self.read().map(|_| ())
    }

    async fn list_groups(&self) -> ServiceResult<Vec<Group>> {
        Ok(self.read()?.groups.all())
    }

    async fn get_group(&self, id: i32) -> ServiceResult<Option<Group>> {
        Ok(self.read()?.groups.get(id))
    }

    async fn insert_group(&self, group: Group) -> ServiceResult<Group> {
        Ok(self
            .write()?
            .groups
            .insert_with(|id| Group { id, ..group }))
    }

    async fn save_group(&self, group: Group) -> ServiceResult<Group> {
        self.write()?.groups.replace(group.id, group, "group")
    }

    async fn delete_group(&self, id: i32) -> ServiceResult<bool> {
        Ok(self.write()?.groups.remove(id))
    }

    async fn list_menu_items(&self, filter: &MenuItemFilter) -> ServiceResult<Vec<MenuItem>> {
        Ok(self.read()?.menu_items.filtered(|m| filter.matches(m)))
    }

    async fn get_menu_item(&self, id: i32) -> ServiceResult<Option<MenuItem>> {
        Ok(self.read()?.menu_items.get(id))
    }

    async fn find_menu_item_by_barcode(&self, barcode: &str) -> ServiceResult<Option<MenuItem>> {
        Ok(self
            .read()?
            .menu_items
            .find(|m| m.barcode.as_deref() == Some(barcode)))
    }

    async fn count_menu_items_in_group(&self, group_id: i32) -> ServiceResult<u64> {
        let state = self.read()?;
        Ok(state
            .menu_items
            .rows
            .values()
            .filter(|m| m.group_id == Some(group_id))
            .count() as u64)
    }

    async fn insert_menu_item(&self, item: MenuItem) -> ServiceResult<MenuItem> {
        Ok(self
            .write()?
            .menu_items
            .insert_with(|id| MenuItem { id, ..item }))
    }

    async fn save_menu_item(&self, item: MenuItem) -> ServiceResult<MenuItem> {
        self.write()?.menu_items.replace(item.id, item, "menu item")
    }

    async fn delete_menu_item(&self, id: i32) -> ServiceResult<bool> {
        Ok(self.write()?.menu_items.remove(id))
    }

    async fn list_clients(&self, search: Option<&str>) -> ServiceResult<Vec<Client>> {
        let state = self.read()?;
        Ok(match search {
            Some(s) => state.clients.filtered(|c| client_matches(c, s)),
            None => state.clients.all(),
        })
    }

    async fn get_client(&self, id: i32) -> ServiceResult<Option<Client>> {
        Ok(self.read()?.clients.get(id))
    }

    async fn insert_client(&self, client: Client) -> ServiceResult<Client> {
        Ok(self
            .write()?
            .clients
            .insert_with(|id| Client { id, ..client }))
    }

    async fn save_client(&self, client: Client) -> ServiceResult<Client> {
        self.write()?.clients.replace(client.id, client, "client")
    }

    async fn delete_client(&self, id: i32) -> ServiceResult<bool> {
        Ok(self.write()?.clients.remove(id))
    }

    async fn list_tables(&self, status: Option<TableStatus>) -> ServiceResult<Vec<DiningTable>> {
        let state = self.read()?;
        let mut tables = state
            .tables
            .filtered(|t| status.map_or(true, |s| t.status == s));
        tables.sort_by_key(|t| t.number);
        Ok(tables)
    }

    async fn get_table(&self, id: i32) -> ServiceResult<Option<DiningTable>> {
        Ok(self.read()?.tables.get(id))
    }

    async fn find_table_by_number(&self, number: i32) -> ServiceResult<Option<DiningTable>> {
        Ok(self.read()?.tables.find(|t| t.number == number))
    }

    async fn insert_table(&self, table: DiningTable) -> ServiceResult<DiningTable> {
        Ok(self
            .write()?
            .tables
            .insert_with(|id| DiningTable { id, ..table }))
    }

    async fn save_table(&self, table: DiningTable) -> ServiceResult<DiningTable> {
        self.write()?.tables.replace(table.id, table, "table")
    }

    async fn delete_table(&self, id: i32) -> ServiceResult<bool> {
        Ok(self.write()?.tables.remove(id))
    }

    async fn list_suppliers(&self) -> ServiceResult<Vec<Supplier>> {
        Ok(self.read()?.suppliers.all())
    }

    async fn get_supplier(&self, id: i32) -> ServiceResult<Option<Supplier>> {
        Ok(self.read()?.suppliers.get(id))
    }

    async fn insert_supplier(&self, supplier: Supplier) -> ServiceResult<Supplier> {
        Ok(self
            .write()?
            .suppliers
            .insert_with(|id| Supplier { id, ..supplier }))
    }

    async fn save_supplier(&self, supplier: Supplier) -> ServiceResult<Supplier> {
        self.write()?
            .suppliers
            .replace(supplier.id, supplier, "supplier")
    }

    async fn delete_supplier(&self, id: i32) -> ServiceResult<bool> {
        Ok(self.write()?.suppliers.remove(id))
    }

    async fn list_stock_items(&self) -> ServiceResult<Vec<StockItem>> {
        Ok(self.read()?.stock_items.all())
    }

    async fn get_stock_item(&self, id: i32) -> ServiceResult<Option<StockItem>> {
        Ok(self.read()?.stock_items.get(id))
    }

    async fn find_stock_item_by_barcode(
        &self,
        barcode: &str,
    ) -> ServiceResult<Option<StockItem>> {
        Ok(self
            .read()?
            .stock_items
            .find(|s| s.barcode.as_deref() == Some(barcode)))
    }

    async fn insert_stock_item(&self, item: StockItem) -> ServiceResult<StockItem> {
        Ok(self
            .write()?
            .stock_items
            .insert_with(|id| StockItem { id, ..item }))
    }

    async fn save_stock_item(&self, item: StockItem) -> ServiceResult<StockItem> {
        self.write()?
            .stock_items
            .replace(item.id, item, "stock item")
    }

    async fn delete_stock_item(&self, id: i32) -> ServiceResult<bool> {
        let mut state = self.write()?;
        if !state.stock_items.remove(id) {
            return Ok(false);
        }
        state.movements.rows.retain(|_, m| m.stock_item_id != id);
        Ok(true)
    }

    async fn apply_stock_movement(
        &self,
        stock_item_id: i32,
        kind: MovementKind,
        delta: Decimal,
        reason: Option<String>,
    ) -> ServiceResult<Option<(StockItem, StockMovement)>> {
        let mut state = self.write()?;
        let now = Utc::now();
        let Some(item) = state.stock_items.rows.get_mut(&stock_item_id) else {
            return Ok(None);
        };
        // nothing may panic while the write guard is held
        let quantity = item
            .quantity
            .checked_add(delta)
            .ok_or_else(|| ServiceError::out_of_range("stock balance"))?;
        item.quantity = quantity;
        item.updated_at = now;
        let item = item.clone();
        let movement = state.movements.insert_with(|id| StockMovement {
            id,
            stock_item_id,
            kind,
            quantity: delta,
            reason,
            created_at: now,
        });
        Ok(Some((item, movement)))
    }

    async fn list_movements(
        &self,
        stock_item_id: Option<i32>,
    ) -> ServiceResult<Vec<StockMovement>> {
        let state = self.read()?;
        Ok(state
            .movements
            .rows
            .values()
            .rev()
            .filter(|m| stock_item_id.map_or(true, |id| m.stock_item_id == id))
            .cloned()
            .collect())
    }

    async fn list_orders(&self, filter: &OrderFilter) -> ServiceResult<Vec<Order>> {
        let state = self.read()?;
        Ok(state
            .orders
            .rows
            .values()
            .rev()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect())
    }

    async fn get_order(&self, id: i32) -> ServiceResult<Option<Order>> {
        Ok(self.read()?.orders.get(id))
    }

    async fn find_order_by_number(&self, number: i32) -> ServiceResult<Option<Order>> {
        Ok(self.read()?.orders.find(|o| o.number == number))
    }

    async fn insert_order(
        &self,
        order: Order,
        items: Vec<OrderItem>,
    ) -> ServiceResult<(Order, Vec<OrderItem>)> {
        let mut state = self.write()?;
        let number = state.orders.rows.values().map(|o| o.number).max().unwrap_or(0) + 1;
        let order = state.orders.insert_with(|id| Order { id, number, ..order });
        let items = items
            .into_iter()
            .map(|item| {
                state.order_items.insert_with(|id| OrderItem {
                    id,
                    order_id: order.id,
                    ..item
                })
            })
            .collect();
        Ok((order, items))
    }

    async fn save_order(&self, order: Order) -> ServiceResult<Order> {
        self.write()?.orders.replace(order.id, order, "order")
    }

    async fn delete_order(&self, id: i32) -> ServiceResult<bool> {
        let mut state = self.write()?;
        if !state.orders.remove(id) {
            return Ok(false);
        }
        state.order_items.rows.retain(|_, i| i.order_id != id);
        Ok(true)
    }

    async fn list_order_items(&self, order_id: i32) -> ServiceResult<Vec<OrderItem>> {
        Ok(self
            .read()?
            .order_items
            .filtered(|i| i.order_id == order_id))
    }

    async fn list_items_for_orders(&self, order_ids: &[i32]) -> ServiceResult<Vec<OrderItem>> {
        Ok(self
            .read()?
            .order_items
            .filtered(|i| order_ids.contains(&i.order_id)))
    }

    async fn get_order_item(&self, id: i32) -> ServiceResult<Option<OrderItem>> {
        Ok(self.read()?.order_items.get(id))
    }

    async fn insert_order_item(&self, item: OrderItem) -> ServiceResult<OrderItem> {
        Ok(self
            .write()?
            .order_items
            .insert_with(|id| OrderItem { id, ..item }))
    }

    async fn save_order_item(&self, item: OrderItem) -> ServiceResult<OrderItem> {
        self.write()?
            .order_items
            .replace(item.id, item, "order item")
    }

    async fn delete_order_item(&self, id: i32) -> ServiceResult<bool> {
        Ok(self.write()?.order_items.remove(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn stock_item(name: &str) -> StockItem {
        let now = Utc::now();
        StockItem {
            id: 0,
            name: name.into(),
            unit: "kg".into(),
            quantity: Decimal::ZERO,
            minimum_quantity: dec!(2),
            ideal_quantity: dec!(10),
            unit_cost: None,
            supplier_id: None,
            barcode: None,
            category: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn ids_are_sequential_per_entity() {
        let store = MemStorage::new();
        let a = store.insert_stock_item(stock_item("arroz")).await.unwrap();
        let b = store.insert_stock_item(stock_item("feijao")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        // ids are never reused after a delete
        assert!(store.delete_stock_item(b.id).await.unwrap());
        let c = store.insert_stock_item(stock_item("farinha")).await.unwrap();
        assert_eq!(c.id, 3);
    }

    #[tokio::test]
    async fn overflowing_movement_leaves_store_usable() {
        let store = MemStorage::new();
        let item = store.insert_stock_item(stock_item("sal")).await.unwrap();
        store
            .apply_stock_movement(item.id, MovementKind::In, Decimal::MAX, None)
            .await
            .unwrap();

        let err = store
            .apply_stock_movement(item.id, MovementKind::In, Decimal::MAX, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));

        let stored = store.get_stock_item(item.id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, Decimal::MAX);
        assert_eq!(store.list_movements(Some(item.id)).await.unwrap().len(), 1);
        assert!(store.list_tables(None).await.is_ok());
    }

    #[tokio::test]
    async fn movement_updates_quantity_and_history_together() {
        let store = MemStorage::new();
        let item = store.insert_stock_item(stock_item("oleo")).await.unwrap();
        let (updated, movement) = store
            .apply_stock_movement(item.id, MovementKind::Out, dec!(-1.5), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.quantity, dec!(-1.5));
        assert_eq!(movement.quantity, dec!(-1.5));
        assert_eq!(store.list_movements(Some(item.id)).await.unwrap().len(), 1);

        assert!(store
            .apply_stock_movement(99, MovementKind::In, dec!(1), None)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn deleting_stock_item_drops_its_movements() {
        let store = MemStorage::new();
        let item = store.insert_stock_item(stock_item("sal")).await.unwrap();
        store
            .apply_stock_movement(item.id, MovementKind::In, dec!(3), None)
            .await
            .unwrap();
        assert!(store.delete_stock_item(item.id).await.unwrap());
        assert!(store.list_movements(None).await.unwrap().is_empty());
        assert!(!store.delete_stock_item(item.id).await.unwrap());
    }

    #[tokio::test]
    async fn save_unknown_record_is_not_found() {
        let store = MemStorage::new();
        let mut item = stock_item("acucar");
        item.id = 42;
        let err = store.save_stock_item(item).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
