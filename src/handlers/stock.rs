use super::common::{
    created_response, no_content_response, success_response, ApiPath, ValidatedJson,
};
use crate::{
    dto::stock::{NewStockItem, StockAdjustment, UpdateStockItem},
    entities::{StockItem, StockMovement},
    errors::{ErrorResponse, ServiceError},
    services::stock::AdjustmentResult,
    AppState,
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Router,
};

pub fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stock_items).post(create_stock_item))
        .route("/baixo", get(low_stock))
        .route("/codigo/:barcode", get(get_stock_item_by_barcode))
        .route(
            "/:id",
            get(get_stock_item)
                .put(update_stock_item)
                .delete(delete_stock_item),
        )
        .route("/:id/ajuste", post(adjust_stock))
        .route("/:id/movimentacoes", get(item_movements))
}

/// Movement log across every stock item
pub fn movements_routes() -> Router<AppState> {
    Router::new().route("/", get(list_movements))
}

#[utoipa::path(
    get,
    path = "/api/estoque",
    responses((status = 200, description = "Stock items by name", body = [StockItem])),
    tag = "estoque"
)]
pub async fn list_stock_items(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(state.services.stock.list().await?))
}

/// Items whose balance is under their minimum
#[utoipa::path(
    get,
    path = "/api/estoque/baixo",
    responses((status = 200, description = "Items needing replenishment", body = [StockItem])),
    tag = "estoque"
)]
pub async fn low_stock(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(state.services.stock.low_stock().await?))
}

#[utoipa::path(
    get,
    path = "/api/estoque/{id}",
    params(("id" = i32, Path, description = "Stock item id")),
    responses(
        (status = 200, description = "Stock item", body = StockItem),
        (status = 404, description = "Stock item not found", body = ErrorResponse),
    ),
    tag = "estoque"
)]
pub async fn get_stock_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(state.services.stock.get(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/estoque/codigo/{barcode}",
    params(("barcode" = String, Path, description = "Barcode")),
    responses(
        (status = 200, description = "Stock item", body = StockItem),
        (status = 404, description = "No item with this barcode", body = ErrorResponse),
    ),
    tag = "estoque"
)]
pub async fn get_stock_item_by_barcode(
    State(state): State<AppState>,
    ApiPath(barcode): ApiPath<String>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(
        state.services.stock.find_by_barcode(&barcode).await?,
    ))
}

/// Register a stock item; a positive opening quantity is logged as an entry
#[utoipa::path(
    post,
    path = "/api/estoque",
    request_body = NewStockItem,
    responses(
        (status = 201, description = "Stock item created", body = StockItem),
        (status = 400, description = "Invalid stock item", body = ErrorResponse),
    ),
    tag = "estoque"
)]
pub async fn create_stock_item(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewStockItem>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(created_response(state.services.stock.create(payload).await?))
}

/// Edit descriptive fields; quantity only changes through adjustments
#[utoipa::path(
    put,
    path = "/api/estoque/{id}",
    params(("id" = i32, Path, description = "Stock item id")),
    request_body = UpdateStockItem,
    responses(
        (status = 200, description = "Stock item updated", body = StockItem),
        (status = 400, description = "Invalid update", body = ErrorResponse),
        (status = 404, description = "Stock item not found", body = ErrorResponse),
    ),
    tag = "estoque"
)]
pub async fn update_stock_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateStockItem>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(
        state.services.stock.update(id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/estoque/{id}",
    params(("id" = i32, Path, description = "Stock item id")),
    responses(
        (status = 204, description = "Stock item and its movements deleted"),
        (status = 404, description = "Stock item not found", body = ErrorResponse),
    ),
    tag = "estoque"
)]
pub async fn delete_stock_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.stock.delete(id).await?;
    Ok(no_content_response())
}

/// Apply a signed quantity change and log it
#[utoipa::path(
    post,
    path = "/api/estoque/{id}/ajuste",
    params(("id" = i32, Path, description = "Stock item id")),
    request_body = StockAdjustment,
    responses(
        (status = 200, description = "Updated item and the logged movement", body = AdjustmentResult),
        (status = 400, description = "Zero or malformed quantity", body = ErrorResponse),
        (status = 404, description = "Stock item not found", body = ErrorResponse),
    ),
    tag = "estoque"
)]
pub async fn adjust_stock(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(payload): ValidatedJson<StockAdjustment>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(
        state.services.stock.adjust(id, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/estoque/{id}/movimentacoes",
    params(("id" = i32, Path, description = "Stock item id")),
    responses(
        (status = 200, description = "Movements of the item, newest first", body = [StockMovement]),
        (status = 404, description = "Stock item not found", body = ErrorResponse),
    ),
    tag = "estoque"
)]
pub async fn item_movements(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(
        state.services.stock.movements(Some(id)).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/movimentacoes",
    responses((status = 200, description = "All movements, newest first", body = [StockMovement])),
    tag = "estoque"
)]
pub async fn list_movements(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(state.services.stock.movements(None).await?))
}
