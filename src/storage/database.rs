use super::{client_matches, contains_ignore_case, MenuItemFilter, OrderFilter, Storage};
use crate::entities::{
    client, dining_table, group, menu_item, order, order_item, stock_item, stock_movement,
    supplier, Client, DiningTable, Group, MenuItem, MovementKind, Order, OrderItem, OrderStatus,
    StockItem, StockMovement, Supplier, TableStatus,
};
use crate::errors::{ServiceError, ServiceResult};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::debug;

/// sea-orm backed storage (SQLite or Postgres, depending on the URL)
#[derive(Debug, Clone)]
pub struct DbStorage {
    db: Arc<DatabaseConnection>,
}

impl DbStorage {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn conn(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn update_error(err: DbErr, entity: &str, id: i32) -> ServiceError {
    match err {
        DbErr::RecordNotUpdated => ServiceError::not_found(entity, id),
        other => ServiceError::DatabaseError(other),
    }
}

#[async_trait]
impl Storage for DbStorage {
    async fn ping(&self) -> ServiceResult<()> {
        crate::db::check_connection(self.conn()).await
    }

    async fn list_groups(&self) -> ServiceResult<Vec<Group>> {
        Ok(group::Entity::find()
            .order_by_asc(group::Column::Id)
            .all(self.conn())
            .await?)
    }

    async fn get_group(&self, id: i32) -> ServiceResult<Option<Group>> {
        Ok(group::Entity::find_by_id(id).one(self.conn()).await?)
    }

    async fn insert_group(&self, group: Group) -> ServiceResult<Group> {
        let mut active = group.into_active_model().reset_all();
        active.id = NotSet;
        Ok(active.insert(self.conn()).await?)
    }

    async fn save_group(&self, group: Group) -> ServiceResult<Group> {
        let id = group.id;
        group
            .into_active_model()
            .reset_all()
            .update(self.conn())
            .await
            .map_err(|e| update_error(e, "group", id))
    }

    async fn delete_group(&self, id: i32) -> ServiceResult<bool> {
        let res = group::Entity::delete_by_id(id).exec(self.conn()).await?;
        Ok(res.rows_affected > 0)
    }

    async fn list_menu_items(&self, filter: &MenuItemFilter) -> ServiceResult<Vec<MenuItem>> {
        let mut cond = Condition::all();
        if let Some(group_id) = filter.group_id {
            cond = cond.add(menu_item::Column::GroupId.eq(group_id));
        }
        if let Some(available) = filter.available {
            cond = cond.add(menu_item::Column::Available.eq(available));
        }
        let items = menu_item::Entity::find()
            .filter(cond)
            .order_by_asc(menu_item::Column::Id)
            .all(self.conn())
            .await?;
        // text search runs in Rust: SQLite `lower()` and `LIKE` only fold ASCII
        Ok(match filter.search.as_deref() {
            Some(search) => items
                .into_iter()
                .filter(|item| contains_ignore_case(&item.name, search))
                .collect(),
            None => items,
        })
    }

    async fn get_menu_item(&self, id: i32) -> ServiceResult<Option<MenuItem>> {
        Ok(menu_item::Entity::find_by_id(id).one(self.conn()).await?)
    }

    async fn find_menu_item_by_barcode(&self, barcode: &str) -> ServiceResult<Option<MenuItem>> {
        Ok(menu_item::Entity::find()
            .filter(menu_item::Column::Barcode.eq(barcode))
            .one(self.conn())
            .await?)
    }

    async fn count_menu_items_in_group(&self, group_id: i32) -> ServiceResult<u64> {
        Ok(menu_item::Entity::find()
            .filter(menu_item::Column::GroupId.eq(group_id))
            .count(self.conn())
            .await?)
    }

    async fn insert_menu_item(&self, item: MenuItem) -> ServiceResult<MenuItem> {
        let mut active = item.into_active_model().reset_all();
        active.id = NotSet;
        Ok(active.insert(self.conn()).await?)
    }

    async fn save_menu_item(&self, item: MenuItem) -> ServiceResult<MenuItem> {
        let id = item.id;
        item.into_active_model()
            .reset_all()
            .update(self.conn())
            .await
            .map_err(|e| update_error(e, "menu item", id))
    }

    async fn delete_menu_item(&self, id: i32) -> ServiceResult<bool> {
        let res = menu_item::Entity::delete_by_id(id).exec(self.conn()).await?;
        Ok(res.rows_affected > 0)
    }

    async fn list_clients(&self, search: Option<&str>) -> ServiceResult<Vec<Client>> {
        let clients = client::Entity::find()
            .order_by_asc(client::Column::Id)
            .all(self.conn())
            .await?;
        Ok(match search {
            Some(search) => clients
                .into_iter()
                .filter(|client| client_matches(client, search))
                .collect(),
            None => clients,
        })
    }

    async fn get_client(&self, id: i32) -> ServiceResult<Option<Client>> {
        Ok(client::Entity::find_by_id(id).one(self.conn()).await?)
    }

    async fn insert_client(&self, client: Client) -> ServiceResult<Client> {
        let mut active = client.into_active_model().reset_all();
        active.id = NotSet;
        Ok(active.insert(self.conn()).await?)
    }

    async fn save_client(&self, client: Client) -> ServiceResult<Client> {
        let id = client.id;
        client
            .into_active_model()
            .reset_all()
            .update(self.conn())
            .await
            .map_err(|e| update_error(e, "client", id))
    }

    async fn delete_client(&self, id: i32) -> ServiceResult<bool> {
        let res = client::Entity::delete_by_id(id).exec(self.conn()).await?;
        Ok(res.rows_affected > 0)
    }

    async fn list_tables(&self, status: Option<TableStatus>) -> ServiceResult<Vec<DiningTable>> {
        let mut query = dining_table::Entity::find().order_by_asc(dining_table::Column::Number);
        if let Some(status) = status {
            query = query.filter(dining_table::Column::Status.eq(status));
        }
        Ok(query.all(self.conn()).await?)
    }

    async fn get_table(&self, id: i32) -> ServiceResult<Option<DiningTable>> {
        Ok(dining_table::Entity::find_by_id(id).one(self.conn()).await?)
    }

    async fn find_table_by_number(&self, number: i32) -> ServiceResult<Option<DiningTable>> {
        Ok(dining_table::Entity::find()
            .filter(dining_table::Column::Number.eq(number))
            .one(self.conn())
            .await?)
    }

    async fn insert_table(&self, table: DiningTable) -> ServiceResult<DiningTable> {
        let mut active = table.into_active_model().reset_all();
        active.id = NotSet;
        Ok(active.insert(self.conn()).await?)
    }

    async fn save_table(&self, table: DiningTable) -> ServiceResult<DiningTable> {
        let id = table.id;
        table
            .into_active_model()
            .reset_all()
            .update(self.conn())
            .await
            .map_err(|e| update_error(e, "table", id))
    }

    async fn delete_table(&self, id: i32) -> ServiceResult<bool> {
        let res = dining_table::Entity::delete_by_id(id)
            .exec(self.conn())
            .await?;
        Ok(res.rows_affected > 0)
    }

    async fn list_suppliers(&self) -> ServiceResult<Vec<Supplier>> {
        Ok(supplier::Entity::find()
            .order_by_asc(supplier::Column::Id)
            .all(self.conn())
            .await?)
    }

    async fn get_supplier(&self, id: i32) -> ServiceResult<Option<Supplier>> {
        Ok(supplier::Entity::find_by_id(id).one(self.conn()).await?)
    }

    async fn insert_supplier(&self, supplier: Supplier) -> ServiceResult<Supplier> {
        let mut active = supplier.into_active_model().reset_all();
        active.id = NotSet;
        Ok(active.insert(self.conn()).await?)
    }

    async fn save_supplier(&self, supplier: Supplier) -> ServiceResult<Supplier> {
        let id = supplier.id;
        supplier
            .into_active_model()
            .reset_all()
            .update(self.conn())
            .await
            .map_err(|e| update_error(e, "supplier", id))
    }

    async fn delete_supplier(&self, id: i32) -> ServiceResult<bool> {
        let res = supplier::Entity::delete_by_id(id).exec(self.conn()).await?;
        Ok(res.rows_affected > 0)
    }

    async fn list_stock_items(&self) -> ServiceResult<Vec<StockItem>> {
        Ok(stock_item::Entity::find()
            .order_by_asc(stock_item::Column::Id)
            .all(self.conn())
            .await?)
    }

    async fn get_stock_item(&self, id: i32) -> ServiceResult<Option<StockItem>> {
        Ok(stock_item::Entity::find_by_id(id).one(self.conn()).await?)
    }

    async fn find_stock_item_by_barcode(
        &self,
        barcode: &str,
    ) -> ServiceResult<Option<StockItem>> {
        Ok(stock_item::Entity::find()
            .filter(stock_item::Column::Barcode.eq(barcode))
            .one(self.conn())
            .await?)
    }

    async fn insert_stock_item(&self, item: StockItem) -> ServiceResult<StockItem> {
        let mut active = item.into_active_model().reset_all();
        active.id = NotSet;
        Ok(active.insert(self.conn()).await?)
    }

    async fn save_stock_item(&self, item: StockItem) -> ServiceResult<StockItem> {
        let id = item.id;
        item.into_active_model()
            .reset_all()
            .update(self.conn())
            .await
            .map_err(|e| update_error(e, "stock item", id))
    }

    async fn delete_stock_item(&self, id: i32) -> ServiceResult<bool> {
        let txn = self.conn().begin().await?;
        stock_movement::Entity::delete_many()
            .filter(stock_movement::Column::StockItemId.eq(id))
            .exec(&txn)
            .await?;
        let res = stock_item::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(res.rows_affected > 0)
    }

    async fn apply_stock_movement(
        &self,
        stock_item_id: i32,
        kind: MovementKind,
        delta: Decimal,
        reason: Option<String>,
    ) -> ServiceResult<Option<(StockItem, StockMovement)>> {
        let txn = self.conn().begin().await?;
        let Some(item) = stock_item::Entity::find_by_id(stock_item_id)
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };

        let now = Utc::now();
        let quantity = item
            .quantity
            .checked_add(delta)
            .ok_or_else(|| ServiceError::out_of_range("stock balance"))?;
        let mut active: stock_item::ActiveModel = item.into();
        active.quantity = Set(quantity);
        active.updated_at = Set(now);
        let item = active.update(&txn).await?;

        let movement = stock_movement::ActiveModel {
            id: NotSet,
            stock_item_id: Set(stock_item_id),
            kind: Set(kind),
            quantity: Set(delta),
            reason: Set(reason),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        debug!(stock_item_id, %delta, "stock movement persisted");
        Ok(Some((item, movement)))
    }

    async fn list_movements(
        &self,
        stock_item_id: Option<i32>,
    ) -> ServiceResult<Vec<StockMovement>> {
        let mut query = stock_movement::Entity::find().order_by_desc(stock_movement::Column::Id);
        if let Some(id) = stock_item_id {
            query = query.filter(stock_movement::Column::StockItemId.eq(id));
        }
        Ok(query.all(self.conn()).await?)
    }

    async fn list_orders(&self, filter: &OrderFilter) -> ServiceResult<Vec<Order>> {
        let mut cond = Condition::all();
        if let Some(status) = filter.status {
            cond = cond.add(order::Column::Status.eq(status));
        }
        if let Some(kind) = filter.kind {
            cond = cond.add(order::Column::Kind.eq(kind));
        }
        if let Some(table_id) = filter.table_id {
            cond = cond.add(order::Column::TableId.eq(table_id));
        }
        if let Some(client_id) = filter.client_id {
            cond = cond.add(order::Column::ClientId.eq(client_id));
        }
        if filter.open_only {
            cond = cond.add(
                order::Column::Status.is_not_in([OrderStatus::Finished, OrderStatus::Cancelled]),
            );
        }
        if let Some(from) = filter.from {
            cond = cond.add(order::Column::CreatedAt.gte(from));
        }
        if let Some(to) = filter.to {
            cond = cond.add(order::Column::CreatedAt.lt(to));
        }
        Ok(order::Entity::find()
            .filter(cond)
            .order_by_desc(order::Column::Id)
            .all(self.conn())
            .await?)
    }

    async fn get_order(&self, id: i32) -> ServiceResult<Option<Order>> {
        Ok(order::Entity::find_by_id(id).one(self.conn()).await?)
    }

    async fn find_order_by_number(&self, number: i32) -> ServiceResult<Option<Order>> {
        Ok(order::Entity::find()
            .filter(order::Column::Number.eq(number))
            .one(self.conn())
            .await?)
    }

    async fn insert_order(
        &self,
        order: Order,
        items: Vec<OrderItem>,
    ) -> ServiceResult<(Order, Vec<OrderItem>)> {
        let txn = self.conn().begin().await?;

        let max_number: Option<i32> = order::Entity::find()
            .select_only()
            .column_as(Expr::col(order::Column::Number).max(), "max_number")
            .into_tuple::<Option<i32>>()
            .one(&txn)
            .await?
            .flatten();

        let mut active = order.into_active_model().reset_all();
        active.id = NotSet;
        active.number = Set(max_number.unwrap_or(0) + 1);
        let order = active.insert(&txn).await?;

        let mut stored = Vec::with_capacity(items.len());
        for item in items {
            let mut active = item.into_active_model().reset_all();
            active.id = NotSet;
            active.order_id = Set(order.id);
            stored.push(active.insert(&txn).await?);
        }

        txn.commit().await?;
        Ok((order, stored))
    }

    async fn save_order(&self, order: Order) -> ServiceResult<Order> {
        let id = order.id;
        order
            .into_active_model()
            .reset_all()
            .update(self.conn())
            .await
            .map_err(|e| update_error(e, "order", id))
    }

    async fn delete_order(&self, id: i32) -> ServiceResult<bool> {
        let txn = self.conn().begin().await?;
        order_item::Entity::delete_many()
            .filter(order_item::Column::OrderId.eq(id))
            .exec(&txn)
            .await?;
        let res = order::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(res.rows_affected > 0)
    }

    async fn list_order_items(&self, order_id: i32) -> ServiceResult<Vec<OrderItem>> {
        Ok(order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .order_by_asc(order_item::Column::Id)
            .all(self.conn())
            .await?)
    }

    async fn list_items_for_orders(&self, order_ids: &[i32]) -> ServiceResult<Vec<OrderItem>> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(order_item::Entity::find()
            .filter(order_item::Column::OrderId.is_in(order_ids.iter().copied()))
            .order_by_asc(order_item::Column::Id)
            .all(self.conn())
            .await?)
    }

    async fn get_order_item(&self, id: i32) -> ServiceResult<Option<OrderItem>> {
        Ok(order_item::Entity::find_by_id(id).one(self.conn()).await?)
    }

    async fn insert_order_item(&self, item: OrderItem) -> ServiceResult<OrderItem> {
        let mut active = item.into_active_model().reset_all();
        active.id = NotSet;
        Ok(active.insert(self.conn()).await?)
    }

    async fn save_order_item(&self, item: OrderItem) -> ServiceResult<OrderItem> {
        let id = item.id;
        item.into_active_model()
            .reset_all()
            .update(self.conn())
            .await
            .map_err(|e| update_error(e, "order item", id))
    }

    async fn delete_order_item(&self, id: i32) -> ServiceResult<bool> {
        let res = order_item::Entity::delete_by_id(id)
            .exec(self.conn())
            .await?;
        Ok(res.rows_affected > 0)
    }
}
