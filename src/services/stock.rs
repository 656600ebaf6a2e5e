use crate::{
    dto::stock::{NewStockItem, StockAdjustment, UpdateStockItem},
    entities::{checked_sum, MovementKind, StockItem, StockMovement},
    errors::ServiceError,
    storage::Storage,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;

/// Item balance after an adjustment together with the logged movement
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdjustmentResult {
    pub item: StockItem,
    pub movement: StockMovement,
}

/// Stock balances. Every quantity change goes through a logged movement.
#[derive(Clone)]
pub struct StockService {
    storage: Arc<dyn Storage>,
}

impl StockService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> Result<Vec<StockItem>, ServiceError> {
        self.storage.list_stock_items().await
    }

    pub async fn get(&self, id: i32) -> Result<StockItem, ServiceError> {
        self.storage
            .get_stock_item(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("stock item", id))
    }

    pub async fn find_by_barcode(&self, barcode: &str) -> Result<StockItem, ServiceError> {
        self.storage
            .find_stock_item_by_barcode(barcode.trim())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("no stock item with barcode {barcode}")))
    }

    /// Items whose balance is under their minimum
    pub async fn low_stock(&self) -> Result<Vec<StockItem>, ServiceError> {
        Ok(self
            .storage
            .list_stock_items()
            .await?
            .into_iter()
            .filter(StockItem::is_below_minimum)
            .collect())
    }

    async fn ensure_supplier_exists(&self, supplier_id: Option<i32>) -> Result<(), ServiceError> {
        if let Some(id) = supplier_id {
            if self.storage.get_supplier(id).await?.is_none() {
                return Err(ServiceError::ValidationError(format!(
                    "supplier {id} does not exist"
                )));
            }
        }
        Ok(())
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: NewStockItem) -> Result<StockItem, ServiceError> {
        self.ensure_supplier_exists(input.supplier_id).await?;
        let (record, opening) = input.into_record(Utc::now());
        let mut item = self.storage.insert_stock_item(record).await?;

        if let Some(quantity) = opening {
            let (updated, _) = self
                .storage
                .apply_stock_movement(
                    item.id,
                    MovementKind::In,
                    quantity,
                    Some("saldo inicial".to_string()),
                )
                .await?
                .ok_or_else(|| ServiceError::not_found("stock item", item.id))?;
            item = updated;
        }

        info!(stock_item_id = item.id, quantity = %item.quantity, "Stock item created");
        Ok(item)
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: UpdateStockItem) -> Result<StockItem, ServiceError> {
        input.check_unit_cost().map_err(|e| {
            ServiceError::ValidationError(format!("unit_cost: {}", e.message.unwrap_or_default()))
        })?;
        let mut item = self.get(id).await?;
        self.ensure_supplier_exists(input.new_supplier_id()).await?;
        input.apply(&mut item, Utc::now());
        let item = self.storage.save_stock_item(item).await?;
        info!(stock_item_id = id, "Stock item updated");
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        if !self.storage.delete_stock_item(id).await? {
            return Err(ServiceError::not_found("stock item", id));
        }
        info!(stock_item_id = id, "Stock item deleted with its movements");
        Ok(())
    }

    /// Applies a signed delta; the balance may go negative
    #[instrument(skip(self, input), fields(delta = %input.quantity))]
    pub async fn adjust(
        &self,
        id: i32,
        input: StockAdjustment,
    ) -> Result<AdjustmentResult, ServiceError> {
        if input.quantity.is_zero() {
            return Err(ServiceError::ValidationError(
                "quantity: must not be zero".into(),
            ));
        }
        let kind = input.movement_kind();
        let reason = crate::dto::clean(input.reason);

        let (item, movement) = self
            .storage
            .apply_stock_movement(id, kind, input.quantity, reason)
            .await
            .map_err(|e| {
                error!(stock_item_id = id, error = %e, "Stock adjustment failed");
                e
            })?
            .ok_or_else(|| ServiceError::not_found("stock item", id))?;

        info!(
            stock_item_id = id,
            kind = ?kind,
            quantity = %item.quantity,
            "Stock adjusted"
        );
        Ok(AdjustmentResult { item, movement })
    }

    pub async fn movements(&self, id: Option<i32>) -> Result<Vec<StockMovement>, ServiceError> {
        if let Some(id) = id {
            self.get(id).await?;
        }
        self.storage.list_movements(id).await
    }

    /// Sum of a history's deltas; equals the balance of an item created at zero
    pub fn net_change(movements: &[StockMovement]) -> Result<Decimal, ServiceError> {
        checked_sum(movements.iter().map(|m| m.quantity), "net stock change")
    }
}
