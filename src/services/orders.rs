use crate::{
    dto::{
        clean,
        orders::{
            CloseOrder, NewOrder, NewOrderItem, OrderDetail, OrderQuery, UpdateOrder,
            UpdateOrderItem,
        },
        reports::start_of_day,
    },
    entities::{
        checked_sum, Client, MenuItem, Order, OrderItem, OrderKind, OrderStatus, TableStatus,
    },
    errors::ServiceError,
    storage::{OrderFilter, Storage},
};
use chrono::{DateTime, Days, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Order lifecycle. Keeps the table floor status and client counters in
/// step with the orders that reference them.
#[derive(Clone)]
pub struct OrderService {
    storage: Arc<dyn Storage>,
}

fn line_total(unit_price: Decimal, quantity: i32) -> Result<Decimal, ServiceError> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or_else(|| ServiceError::out_of_range("order item total"))
}

fn line_from_menu_item(
    menu_item: &MenuItem,
    quantity: i32,
    notes: Option<String>,
    now: DateTime<Utc>,
) -> Result<OrderItem, ServiceError> {
    Ok(OrderItem {
        id: 0,
        order_id: 0,
        menu_item_id: menu_item.id,
        name: menu_item.name.clone(),
        quantity,
        unit_price: menu_item.price,
        total: line_total(menu_item.price, quantity)?,
        notes: clean(notes),
        created_at: now,
    })
}

fn subtotal_of(items: &[OrderItem]) -> Result<Decimal, ServiceError> {
    checked_sum(items.iter().map(|i| i.total), "order subtotal")
}

/// Calendar dates are UTC days; `end_date` is inclusive
fn filter_from_query(query: OrderQuery) -> Result<OrderFilter, ServiceError> {
    if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
        if start > end {
            return Err(ServiceError::ValidationError(
                "start_date must not be after end_date".into(),
            ));
        }
    }
    let to = match query.end_date {
        Some(end) => Some(start_of_day(end.checked_add_days(Days::new(1)).ok_or_else(
            || ServiceError::ValidationError("end_date out of range".into()),
        )?)),
        None => None,
    };
    Ok(OrderFilter {
        status: query.status,
        kind: query.kind,
        table_id: query.table_id,
        client_id: query.client_id,
        open_only: query.open.unwrap_or(false),
        from: query.start_date.map(start_of_day),
        to,
    })
}

impl OrderService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self, query: OrderQuery) -> Result<Vec<Order>, ServiceError> {
        let filter = filter_from_query(query)?;
        self.storage.list_orders(&filter).await
    }

    async fn find(&self, id: i32) -> Result<Order, ServiceError> {
        self.storage
            .get_order(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("order", id))
    }

    async fn with_items(&self, order: Order) -> Result<OrderDetail, ServiceError> {
        let items = self.storage.list_order_items(order.id).await?;
        Ok(OrderDetail { order, items })
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<OrderDetail, ServiceError> {
        let order = self.find(id).await?;
        self.with_items(order).await
    }

    pub async fn get_by_number(&self, number: i32) -> Result<OrderDetail, ServiceError> {
        let order = self
            .storage
            .find_order_by_number(number)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("order number {number} not found")))?;
        self.with_items(order).await
    }

    async fn available_menu_item(&self, id: i32) -> Result<MenuItem, ServiceError> {
        let item = self.storage.get_menu_item(id).await?.ok_or_else(|| {
            ServiceError::ValidationError(format!("menu item {id} does not exist"))
        })?;
        if !item.available {
            return Err(ServiceError::ValidationError(format!(
                "menu item {id} ({}) is not available",
                item.name
            )));
        }
        Ok(item)
    }

    /// Table must exist and carry no other open order
    async fn table_ready_for_order(
        &self,
        table_id: i32,
        except_order: Option<i32>,
    ) -> Result<(), ServiceError> {
        if self.storage.get_table(table_id).await?.is_none() {
            return Err(ServiceError::ValidationError(format!(
                "table {table_id} does not exist"
            )));
        }
        let busy = self
            .storage
            .list_orders(&OrderFilter::open_for_table(table_id))
            .await?
            .into_iter()
            .any(|o| Some(o.id) != except_order);
        if busy {
            return Err(ServiceError::Conflict(format!(
                "table {table_id} already has an open order"
            )));
        }
        Ok(())
    }

    async fn set_table_status(&self, table_id: i32, status: TableStatus) -> Result<(), ServiceError> {
        match self.storage.get_table(table_id).await? {
            Some(mut table) if table.status != status => {
                table.status = status;
                self.storage.save_table(table).await?;
                info!(table_id, status = ?status, "Table status follows order");
            }
            Some(_) => {}
            None => warn!(table_id, "Order references a missing table"),
        }
        Ok(())
    }

    async fn register_client_order(
        &self,
        client: Client,
        at: DateTime<Utc>,
    ) -> Result<(), ServiceError> {
        let client_id = client.id;
        let mut client = client;
        client.order_count += 1;
        client.last_order_at = Some(at);
        self.storage.save_client(client).await.map_err(|e| {
            error!(client_id, error = %e, "Failed to update client counters");
            e
        })?;
        Ok(())
    }

    #[instrument(skip(self, input), fields(kind = ?input.kind))]
    pub async fn create(&self, input: NewOrder) -> Result<OrderDetail, ServiceError> {
        let now = Utc::now();

        match (input.kind, input.table_id) {
            (OrderKind::Table, Some(table_id)) => self.table_ready_for_order(table_id, None).await?,
            (OrderKind::Table, None) => {
                return Err(ServiceError::ValidationError(
                    "table_id is required for mesa orders".into(),
                ))
            }
            (_, Some(_)) => {
                return Err(ServiceError::ValidationError(
                    "table_id is only accepted on mesa orders".into(),
                ))
            }
            (_, None) => {}
        }

        let client = match input.client_id {
            Some(client_id) => Some(self.storage.get_client(client_id).await?.ok_or_else(|| {
                ServiceError::ValidationError(format!("client {client_id} does not exist"))
            })?),
            None => None,
        };

        let mut delivery_address = clean(input.delivery_address);
        if input.kind == OrderKind::Delivery && delivery_address.is_none() {
            delivery_address = client.as_ref().and_then(|c| c.address.clone());
            if delivery_address.is_none() && client.is_none() {
                return Err(ServiceError::ValidationError(
                    "delivery orders need a delivery_address or a client".into(),
                ));
            }
        }

        let mut lines = Vec::with_capacity(input.items.len());
        for line in input.items {
            let menu_item = self.available_menu_item(line.menu_item_id).await?;
            lines.push(line_from_menu_item(&menu_item, line.quantity, line.notes, now)?);
        }

        let customer_name =
            clean(input.customer_name).or_else(|| client.as_ref().map(|c| c.name.clone()));

        let mut order = Order {
            id: 0,
            number: 0,
            kind: input.kind,
            status: OrderStatus::Pending,
            table_id: input.table_id,
            client_id: input.client_id,
            customer_name,
            delivery_address,
            notes: clean(input.notes),
            subtotal: Decimal::ZERO,
            discount: input.discount.unwrap_or_default(),
            service_fee: input.service_fee.unwrap_or_default(),
            delivery_fee: input.delivery_fee.unwrap_or_default(),
            total: Decimal::ZERO,
            payment_method: None,
            amount_paid: None,
            change_due: None,
            created_at: now,
            updated_at: now,
            closed_at: None,
        };
        order.apply_subtotal(subtotal_of(&lines)?)?;

        let (order, items) = self.storage.insert_order(order, lines).await.map_err(|e| {
            error!(error = %e, "Failed to store order");
            e
        })?;

        if let Some(table_id) = order.occupied_table() {
            self.set_table_status(table_id, TableStatus::Occupied).await?;
        }
        if let Some(client) = client {
            self.register_client_order(client, now).await?;
        }

        info!(
            order_id = order.id,
            number = order.number,
            total = %order.total,
            "Order created"
        );
        Ok(OrderDetail { order, items })
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: UpdateOrder) -> Result<Order, ServiceError> {
        let mut order = self.find(id).await?;
        if !order.is_open() {
            return Err(ServiceError::InvalidOperation(format!(
                "order {id} is closed"
            )));
        }

        let previous_table = order.occupied_table();
        if let Some(table_id) = input.table_id {
            if order.kind != OrderKind::Table {
                return Err(ServiceError::ValidationError(
                    "only mesa orders can move between tables".into(),
                ));
            }
            if Some(table_id) != previous_table {
                self.table_ready_for_order(table_id, Some(id)).await?;
                order.table_id = Some(table_id);
            }
        }

        if let Some(name) = input.customer_name {
            order.customer_name = clean(name);
        }
        if let Some(address) = input.delivery_address {
            order.delivery_address = clean(address);
        }
        if let Some(notes) = input.notes {
            order.notes = clean(notes);
        }
        if let Some(discount) = input.discount {
            order.discount = discount;
        }
        if let Some(fee) = input.service_fee {
            order.service_fee = fee;
        }
        if let Some(fee) = input.delivery_fee {
            order.delivery_fee = fee;
        }
        order.refresh_total()?;
        order.updated_at = Utc::now();

        let order = self.storage.save_order(order).await?;

        let current_table = order.occupied_table();
        if current_table != previous_table {
            if let Some(old) = previous_table {
                self.set_table_status(old, TableStatus::Free).await?;
            }
            if let Some(new) = current_table {
                self.set_table_status(new, TableStatus::Occupied).await?;
            }
            info!(order_id = id, from = ?previous_table, to = ?current_table, "Order moved to another table");
        }

        info!(order_id = id, "Order updated");
        Ok(order)
    }

    /// Any status may follow any other. Entering a terminal status stamps
    /// `closed_at` and frees the table; leaving it reopens both, provided
    /// the table has not taken another order meanwhile.
    #[instrument(skip(self))]
    pub async fn set_status(&self, id: i32, status: OrderStatus) -> Result<Order, ServiceError> {
        let mut order = self.find(id).await?;
        let old_status = order.status;
        let now = Utc::now();

        if old_status.is_terminal() && !status.is_terminal() {
            if let Some(table_id) = order.occupied_table() {
                self.table_ready_for_order(table_id, Some(id)).await?;
            }
        }

        order.status = status;
        order.updated_at = now;
        match (old_status.is_terminal(), status.is_terminal()) {
            (false, true) => order.closed_at = Some(now),
            (true, false) => order.closed_at = None,
            _ => {}
        }

        let order = self.storage.save_order(order).await?;

        if let Some(table_id) = order.occupied_table() {
            match (old_status.is_terminal(), status.is_terminal()) {
                (false, true) => self.set_table_status(table_id, TableStatus::Free).await?,
                (true, false) => self.set_table_status(table_id, TableStatus::Occupied).await?,
                _ => {}
            }
        }

        info!(order_id = id, old_status = ?old_status, new_status = ?status, "Order status updated");
        Ok(order)
    }

    /// Payment closing: records payment and change, finalizes, frees the table
    #[instrument(skip(self, input), fields(method = ?input.payment_method))]
    pub async fn close(&self, id: i32, input: CloseOrder) -> Result<Order, ServiceError> {
        let mut order = self.find(id).await?;
        if !order.is_open() {
            return Err(ServiceError::InvalidOperation(format!(
                "order {id} is already closed"
            )));
        }

        if let Some(discount) = input.discount {
            order.discount = discount;
        }
        if let Some(fee) = input.service_fee {
            order.service_fee = fee;
        }
        order.refresh_total()?;

        let paid = input.amount_paid.unwrap_or(order.total);
        if paid < order.total {
            return Err(ServiceError::ValidationError(format!(
                "amount_paid {paid} does not cover the total {}",
                order.total
            )));
        }

        let now = Utc::now();
        order.payment_method = Some(input.payment_method);
        order.amount_paid = Some(paid);
        let change = paid
            .checked_sub(order.total)
            .ok_or_else(|| ServiceError::out_of_range("change due"))?;
        order.change_due = Some(change);
        order.status = OrderStatus::Finished;
        order.closed_at = Some(now);
        order.updated_at = now;

        let order = self.storage.save_order(order).await?;
        if let Some(table_id) = order.occupied_table() {
            self.set_table_status(table_id, TableStatus::Free).await?;
        }

        info!(order_id = id, total = %order.total, change = ?order.change_due, "Order closed");
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let order = self.find(id).await?;
        self.storage.delete_order(id).await?;
        if order.is_open() {
            if let Some(table_id) = order.occupied_table() {
                self.set_table_status(table_id, TableStatus::Free).await?;
            }
        }
        info!(order_id = id, number = order.number, "Order deleted");
        Ok(())
    }

    pub async fn items(&self, order_id: i32) -> Result<Vec<OrderItem>, ServiceError> {
        self.find(order_id).await?;
        self.storage.list_order_items(order_id).await
    }

    async fn open_order(&self, order_id: i32) -> Result<Order, ServiceError> {
        let order = self.find(order_id).await?;
        if !order.is_open() {
            return Err(ServiceError::InvalidOperation(format!(
                "order {order_id} is closed; items can no longer change"
            )));
        }
        Ok(order)
    }

    async fn item_of(&self, order_id: i32, item_id: i32) -> Result<OrderItem, ServiceError> {
        match self.storage.get_order_item(item_id).await? {
            Some(item) if item.order_id == order_id => Ok(item),
            _ => Err(ServiceError::NotFound(format!(
                "item {item_id} not found on order {order_id}"
            ))),
        }
    }

    /// Recomputes subtotal and total from the stored items
    async fn refresh_totals(&self, mut order: Order) -> Result<Order, ServiceError> {
        let items = self.storage.list_order_items(order.id).await?;
        order.apply_subtotal(subtotal_of(&items)?)?;
        order.updated_at = Utc::now();
        self.storage.save_order(order).await
    }

    #[instrument(skip(self, input), fields(menu_item_id = input.menu_item_id))]
    pub async fn add_item(
        &self,
        order_id: i32,
        input: NewOrderItem,
    ) -> Result<OrderItem, ServiceError> {
        let order = self.open_order(order_id).await?;
        let menu_item = self.available_menu_item(input.menu_item_id).await?;
        let mut line = line_from_menu_item(&menu_item, input.quantity, input.notes, Utc::now())?;
        line.order_id = order_id;

        let item = self.storage.insert_order_item(line).await?;
        let order = self.refresh_totals(order).await?;
        info!(order_id, item_id = item.id, total = %order.total, "Item added to order");
        Ok(item)
    }

    #[instrument(skip(self, input))]
    pub async fn update_item(
        &self,
        order_id: i32,
        item_id: i32,
        input: UpdateOrderItem,
    ) -> Result<OrderItem, ServiceError> {
        let order = self.open_order(order_id).await?;
        let mut item = self.item_of(order_id, item_id).await?;
        if let Some(quantity) = input.quantity {
            item.quantity = quantity;
            item.total = line_total(item.unit_price, quantity)?;
        }
        if let Some(notes) = input.notes {
            item.notes = clean(notes);
        }
        let item = self.storage.save_order_item(item).await?;
        let order = self.refresh_totals(order).await?;
        info!(order_id, item_id, total = %order.total, "Order item updated");
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn remove_item(&self, order_id: i32, item_id: i32) -> Result<(), ServiceError> {
        let order = self.open_order(order_id).await?;
        self.item_of(order_id, item_id).await?;
        self.storage.delete_order_item(item_id).await?;
        let order = self.refresh_totals(order).await?;
        info!(order_id, item_id, total = %order.total, "Item removed from order");
        Ok(())
    }
}
