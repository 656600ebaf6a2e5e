use crate::{
    dto::{catalog, clients, orders, stock, suppliers, tables},
    entities::{
        client, dining_table, group, menu_item, order, order_item, stock_item, stock_movement,
        supplier, MovementKind, OrderKind, OrderStatus, PaymentMethod, TableStatus,
    },
    errors::ErrorResponse,
    handlers,
    services::{reports, stock::AdjustmentResult},
    AppState,
};
use axum::{response::Json, routing::get, Router};
use utoipa::OpenApi;

/// Path of the generated document
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Comanda API",
        version = "0.1.0",
        description = r#"
# Comanda

Restaurant point-of-sale backend: menu catalogue, dining tables, orders with
their items, stock balances with a movement log, clients, suppliers and sales
reports.

Enumerated fields travel with the floor staff's vocabulary, for example order
status `pendente`, `em_preparo`, `pronto`, `entregue`, `finalizado`,
`cancelado`. Money values are decimal strings.

## Errors

Every failure answers with the same body:

```json
{
  "error": "Bad Request",
  "message": "Validation error: quantity: must not be zero",
  "request_id": "2b1f...",
  "timestamp": "2024-06-01T12:00:00Z"
}
```
"#
    ),
    tags(
        (name = "pedidos", description = "Orders and their items"),
        (name = "estoque", description = "Stock items and movements"),
        (name = "relatorios", description = "Sales and stock reports"),
        (name = "health", description = "Liveness and readiness probes"),
    ),
    paths(
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::orders::get_order_by_number,
        handlers::orders::create_order,
        handlers::orders::update_order,
        handlers::orders::update_order_status,
        handlers::orders::close_order,
        handlers::orders::delete_order,
        handlers::orders::list_order_items,
        handlers::orders::add_order_item,
        handlers::orders::update_order_item,
        handlers::orders::remove_order_item,
        handlers::stock::list_stock_items,
        handlers::stock::low_stock,
        handlers::stock::get_stock_item,
        handlers::stock::get_stock_item_by_barcode,
        handlers::stock::create_stock_item,
        handlers::stock::update_stock_item,
        handlers::stock::delete_stock_item,
        handlers::stock::adjust_stock,
        handlers::stock::item_movements,
        handlers::stock::list_movements,
        handlers::reports::sales_summary,
        handlers::reports::daily_sales,
        handlers::reports::top_items,
        handlers::reports::stock_report,
        handlers::health::liveness_check,
        handlers::health::readiness_check,
    ),
    components(
        schemas(
            ErrorResponse,
            TableStatus,
            OrderKind,
            OrderStatus,
            PaymentMethod,
            MovementKind,
            group::Model,
            menu_item::Model,
            client::Model,
            dining_table::Model,
            supplier::Model,
            stock_item::Model,
            stock_movement::Model,
            order::Model,
            order_item::Model,
            catalog::NewGroup,
            catalog::UpdateGroup,
            catalog::NewMenuItem,
            catalog::UpdateMenuItem,
            clients::NewClient,
            clients::UpdateClient,
            tables::NewTable,
            tables::UpdateTable,
            tables::TableStatusUpdate,
            suppliers::NewSupplier,
            suppliers::UpdateSupplier,
            stock::NewStockItem,
            stock::UpdateStockItem,
            stock::StockAdjustment,
            AdjustmentResult,
            orders::NewOrder,
            orders::NewOrderItem,
            orders::UpdateOrder,
            orders::OrderStatusUpdate,
            orders::CloseOrder,
            orders::UpdateOrderItem,
            orders::OrderDetail,
            reports::ReportPeriod,
            reports::SalesSummary,
            reports::PaymentBreakdown,
            reports::KindBreakdown,
            reports::DailySales,
            reports::TopItem,
            reports::StockLevel,
            reports::StockPosition,
            reports::StockReport,
            handlers::health::LivenessResponse,
            handlers::health::ReadinessResponse,
        )
    )
)]
pub struct ApiDoc;

/// Serves the document as JSON
pub fn openapi_routes() -> Router<AppState> {
    Router::new().route(OPENAPI_JSON_PATH, get(|| async { Json(ApiDoc::openapi()) }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_order_stock_and_report_paths() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();
        assert!(json.contains("Comanda API"));
        assert!(json.contains("/api/pedidos/{id}/fechar"));
        assert!(json.contains("/api/estoque/{id}/ajuste"));
        assert!(json.contains("/api/relatorios/produtos-mais-vendidos"));
        assert!(json.contains("em_preparo"));
    }
}
