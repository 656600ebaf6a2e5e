use crate::{
    dto::suppliers::{NewSupplier, UpdateSupplier},
    entities::Supplier,
    errors::ServiceError,
    storage::Storage,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Clone)]
pub struct SupplierService {
    storage: Arc<dyn Storage>,
}

impl SupplierService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> Result<Vec<Supplier>, ServiceError> {
        self.storage.list_suppliers().await
    }

    pub async fn get(&self, id: i32) -> Result<Supplier, ServiceError> {
        self.storage
            .get_supplier(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("supplier", id))
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: NewSupplier) -> Result<Supplier, ServiceError> {
        let supplier = self
            .storage
            .insert_supplier(input.into_record(Utc::now()))
            .await?;
        info!(supplier_id = supplier.id, "Supplier created");
        Ok(supplier)
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: UpdateSupplier) -> Result<Supplier, ServiceError> {
        let mut supplier = self.get(id).await?;
        input.apply(&mut supplier);
        let supplier = self.storage.save_supplier(supplier).await?;
        info!(supplier_id = id, "Supplier updated");
        Ok(supplier)
    }

    /// Deletes the supplier and unlinks the stock items it provided
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.get(id).await?;
        let now = Utc::now();
        for mut item in self.storage.list_stock_items().await? {
            if item.supplier_id == Some(id) {
                item.supplier_id = None;
                item.updated_at = now;
                self.storage.save_stock_item(item).await?;
            }
        }
        self.storage.delete_supplier(id).await?;
        info!(supplier_id = id, "Supplier deleted");
        Ok(())
    }
}
