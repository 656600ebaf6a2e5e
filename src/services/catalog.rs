use crate::{
    dto::catalog::{NewGroup, NewMenuItem, UpdateGroup, UpdateMenuItem},
    entities::{Group, MenuItem},
    errors::ServiceError,
    storage::{MenuItemFilter, Storage},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Menu groups and the items sold under them
#[derive(Clone)]
pub struct CatalogService {
    storage: Arc<dyn Storage>,
}

impl CatalogService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list_groups(&self) -> Result<Vec<Group>, ServiceError> {
        self.storage.list_groups().await
    }

    pub async fn get_group(&self, id: i32) -> Result<Group, ServiceError> {
        self.storage
            .get_group(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("group", id))
    }

    #[instrument(skip(self, input))]
    pub async fn create_group(&self, input: NewGroup) -> Result<Group, ServiceError> {
        let group = self.storage.insert_group(input.into_record(Utc::now())).await?;
        info!(group_id = group.id, "Group created");
        Ok(group)
    }

    #[instrument(skip(self, input))]
    pub async fn update_group(&self, id: i32, input: UpdateGroup) -> Result<Group, ServiceError> {
        let mut group = self.get_group(id).await?;
        input.apply(&mut group);
        let group = self.storage.save_group(group).await?;
        info!(group_id = id, "Group updated");
        Ok(group)
    }

    #[instrument(skip(self))]
    pub async fn delete_group(&self, id: i32) -> Result<(), ServiceError> {
        self.get_group(id).await?;
        let in_use = self.storage.count_menu_items_in_group(id).await?;
        if in_use > 0 {
            warn!(group_id = id, in_use, "Refusing to delete group with menu items");
            return Err(ServiceError::Conflict(format!(
                "group {id} still has {in_use} menu item(s)"
            )));
        }
        self.storage.delete_group(id).await?;
        info!(group_id = id, "Group deleted");
        Ok(())
    }

    pub async fn list_menu_items(
        &self,
        filter: &MenuItemFilter,
    ) -> Result<Vec<MenuItem>, ServiceError> {
        self.storage.list_menu_items(filter).await
    }

    pub async fn get_menu_item(&self, id: i32) -> Result<MenuItem, ServiceError> {
        self.storage
            .get_menu_item(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("menu item", id))
    }

    pub async fn find_menu_item_by_barcode(&self, barcode: &str) -> Result<MenuItem, ServiceError> {
        self.storage
            .find_menu_item_by_barcode(barcode.trim())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("no menu item with barcode {barcode}")))
    }

    async fn ensure_group_exists(&self, group_id: Option<i32>) -> Result<(), ServiceError> {
        if let Some(group_id) = group_id {
            if self.storage.get_group(group_id).await?.is_none() {
                return Err(ServiceError::ValidationError(format!(
                    "group {group_id} does not exist"
                )));
            }
        }
        Ok(())
    }

    #[instrument(skip(self, input))]
    pub async fn create_menu_item(&self, input: NewMenuItem) -> Result<MenuItem, ServiceError> {
        self.ensure_group_exists(input.group_id).await?;
        let item = self
            .storage
            .insert_menu_item(input.into_record(Utc::now()))
            .await?;
        info!(menu_item_id = item.id, "Menu item created");
        Ok(item)
    }

    #[instrument(skip(self, input))]
    pub async fn update_menu_item(
        &self,
        id: i32,
        input: UpdateMenuItem,
    ) -> Result<MenuItem, ServiceError> {
        input.check_cost().map_err(|e| {
            ServiceError::ValidationError(format!("cost: {}", e.message.unwrap_or_default()))
        })?;
        let mut item = self.get_menu_item(id).await?;
        self.ensure_group_exists(input.new_group_id()).await?;
        input.apply(&mut item, Utc::now());
        let item = self.storage.save_menu_item(item).await?;
        info!(menu_item_id = id, "Menu item updated");
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn delete_menu_item(&self, id: i32) -> Result<(), ServiceError> {
        if !self.storage.delete_menu_item(id).await? {
            return Err(ServiceError::not_found("menu item", id));
        }
        info!(menu_item_id = id, "Menu item deleted");
        Ok(())
    }
}
