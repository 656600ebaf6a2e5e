use crate::{
    dto::clients::{NewClient, UpdateClient},
    entities::{Client, Order},
    errors::ServiceError,
    storage::{OrderFilter, Storage},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Clone)]
pub struct ClientService {
    storage: Arc<dyn Storage>,
}

impl ClientService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Client>, ServiceError> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        self.storage.list_clients(search).await
    }

    pub async fn get(&self, id: i32) -> Result<Client, ServiceError> {
        self.storage
            .get_client(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("client", id))
    }

    /// Orders placed by the client, newest first
    pub async fn order_history(&self, id: i32) -> Result<Vec<Order>, ServiceError> {
        self.get(id).await?;
        self.storage
            .list_orders(&OrderFilter {
                client_id: Some(id),
                ..Default::default()
            })
            .await
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: NewClient) -> Result<Client, ServiceError> {
        let client = self.storage.insert_client(input.into_record(Utc::now())).await?;
        info!(client_id = client.id, "Client created");
        Ok(client)
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: UpdateClient) -> Result<Client, ServiceError> {
        let mut client = self.get(id).await?;
        input.apply(&mut client);
        let client = self.storage.save_client(client).await?;
        info!(client_id = id, "Client updated");
        Ok(client)
    }

    /// Past orders keep their `client_id` and customer name snapshot
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        if !self.storage.delete_client(id).await? {
            return Err(ServiceError::not_found("client", id));
        }
        info!(client_id = id, "Client deleted");
        Ok(())
    }
}
