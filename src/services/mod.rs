// Catalogue and registers
pub mod catalog;
pub mod clients;
pub mod suppliers;
pub mod tables;

// Floor operations
pub mod orders;
pub mod stock;

// Analytics and Reporting
pub mod reports;

use crate::storage::Storage;
use std::sync::Arc;

/// Service container shared by the HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<catalog::CatalogService>,
    pub clients: Arc<clients::ClientService>,
    pub suppliers: Arc<suppliers::SupplierService>,
    pub tables: Arc<tables::TableService>,
    pub orders: Arc<orders::OrderService>,
    pub stock: Arc<stock::StockService>,
    pub reports: Arc<reports::ReportService>,
}

impl AppServices {
    pub fn new(storage: Arc<dyn Storage>, report_top_items_limit: u64) -> Self {
        Self {
            catalog: Arc::new(catalog::CatalogService::new(storage.clone())),
            clients: Arc::new(clients::ClientService::new(storage.clone())),
            suppliers: Arc::new(suppliers::SupplierService::new(storage.clone())),
            tables: Arc::new(tables::TableService::new(storage.clone())),
            orders: Arc::new(orders::OrderService::new(storage.clone())),
            stock: Arc::new(stock::StockService::new(storage.clone())),
            reports: Arc::new(reports::ReportService::new(
                storage,
                report_top_items_limit,
            )),
        }
    }
}
