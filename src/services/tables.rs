use crate::{
    dto::tables::{NewTable, UpdateTable},
    entities::{DiningTable, Order, TableStatus},
    errors::ServiceError,
    storage::{OrderFilter, Storage},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Dining tables and their floor status
#[derive(Clone)]
pub struct TableService {
    storage: Arc<dyn Storage>,
}

impl TableService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self, status: Option<TableStatus>) -> Result<Vec<DiningTable>, ServiceError> {
        self.storage.list_tables(status).await
    }

    pub async fn get(&self, id: i32) -> Result<DiningTable, ServiceError> {
        self.storage
            .get_table(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("table", id))
    }

    /// Most recent order still open on the table
    pub async fn current_order(&self, id: i32) -> Result<Order, ServiceError> {
        self.get(id).await?;
        self.storage
            .list_orders(&OrderFilter::open_for_table(id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::NotFound(format!("table {id} has no open order")))
    }

    async fn ensure_number_free(&self, number: i32, except: Option<i32>) -> Result<(), ServiceError> {
        match self.storage.find_table_by_number(number).await? {
            Some(existing) if Some(existing.id) != except => Err(ServiceError::Conflict(format!(
                "table number {number} is already in use"
            ))),
            _ => Ok(()),
        }
    }

    #[instrument(skip(self, input), fields(number = input.number))]
    pub async fn create(&self, input: NewTable) -> Result<DiningTable, ServiceError> {
        self.ensure_number_free(input.number, None).await?;
        let table = self.storage.insert_table(input.into_record(Utc::now())).await?;
        info!(table_id = table.id, "Table created");
        Ok(table)
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: UpdateTable) -> Result<DiningTable, ServiceError> {
        let mut table = self.get(id).await?;
        if let Some(number) = input.number {
            self.ensure_number_free(number, Some(id)).await?;
        }
        input.apply(&mut table);
        let table = self.storage.save_table(table).await?;
        info!(table_id = id, "Table updated");
        Ok(table)
    }

    /// Sets the status directly, e.g. `reservada` or `limpeza` from the floor plan
    #[instrument(skip(self))]
    pub async fn set_status(&self, id: i32, status: TableStatus) -> Result<DiningTable, ServiceError> {
        let mut table = self.get(id).await?;
        table.status = status;
        let table = self.storage.save_table(table).await?;
        info!(table_id = id, status = ?status, "Table status changed");
        Ok(table)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.get(id).await?;
        let open = self
            .storage
            .list_orders(&OrderFilter::open_for_table(id))
            .await?;
        if !open.is_empty() {
            warn!(table_id = id, open_orders = open.len(), "Refusing to delete table in use");
            return Err(ServiceError::Conflict(format!(
                "table {id} has {} open order(s)",
                open.len()
            )));
        }
        self.storage.delete_table(id).await?;
        info!(table_id = id, "Table deleted");
        Ok(())
    }
}
