use super::common::{
    created_response, no_content_response, success_response, ApiPath, ApiQuery, ValidatedJson,
};
use crate::{
    dto::orders::{
        CloseOrder, NewOrder, NewOrderItem, OrderDetail, OrderQuery, OrderStatusUpdate,
        UpdateOrder, UpdateOrderItem,
    },
    entities::{Order, OrderItem},
    errors::{ErrorResponse, ServiceError},
    AppState,
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};

/// Creates the router for order endpoints
pub fn orders_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/numero/:number", get(get_order_by_number))
        .route("/:id", get(get_order).put(update_order).delete(delete_order))
        .route("/:id/status", put(update_order_status))
        .route("/:id/fechar", post(close_order))
        .route("/:id/itens", get(list_order_items).post(add_order_item))
        .route(
            "/:id/itens/:item_id",
            put(update_order_item).delete(remove_order_item),
        )
}

/// List orders, newest first
#[utoipa::path(
    get,
    path = "/api/pedidos",
    params(OrderQuery),
    responses(
        (status = 200, description = "Orders matching the filters", body = [Order]),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
    ),
    tag = "pedidos"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<OrderQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(state.services.orders.list(query).await?))
}

/// Get an order with its items
#[utoipa::path(
    get,
    path = "/api/pedidos/{id}",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order found", body = OrderDetail),
        (status = 404, description = "Order not found", body = ErrorResponse),
    ),
    tag = "pedidos"
)]
pub async fn get_order(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(state.services.orders.get(id).await?))
}

/// Get an order by its sequential number
#[utoipa::path(
    get,
    path = "/api/pedidos/numero/{number}",
    params(("number" = i32, Path, description = "Order number")),
    responses(
        (status = 200, description = "Order found", body = OrderDetail),
        (status = 404, description = "Order not found", body = ErrorResponse),
    ),
    tag = "pedidos"
)]
pub async fn get_order_by_number(
    State(state): State<AppState>,
    ApiPath(number): ApiPath<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(
        state.services.orders.get_by_number(number).await?,
    ))
}

/// Open a new order
#[utoipa::path(
    post,
    path = "/api/pedidos",
    request_body = NewOrder,
    responses(
        (status = 201, description = "Order created", body = OrderDetail),
        (status = 400, description = "Invalid order", body = ErrorResponse),
        (status = 409, description = "Table already has an open order", body = ErrorResponse),
    ),
    tag = "pedidos"
)]
pub async fn create_order(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewOrder>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(created_response(state.services.orders.create(payload).await?))
}

#[utoipa::path(
    put,
    path = "/api/pedidos/{id}",
    params(("id" = i32, Path, description = "Order id")),
    request_body = UpdateOrder,
    responses(
        (status = 200, description = "Order updated", body = Order),
        (status = 400, description = "Invalid update or order closed", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
        (status = 409, description = "Target table already has an open order", body = ErrorResponse),
    ),
    tag = "pedidos"
)]
pub async fn update_order(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateOrder>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(
        state.services.orders.update(id, payload).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/pedidos/{id}/status",
    params(("id" = i32, Path, description = "Order id")),
    request_body = OrderStatusUpdate,
    responses(
        (status = 200, description = "Status changed", body = Order),
        (status = 400, description = "Unknown status", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
    ),
    tag = "pedidos"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(payload): ValidatedJson<OrderStatusUpdate>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(
        state.services.orders.set_status(id, payload.status).await?,
    ))
}

/// Take payment and finalize the order, freeing its table
#[utoipa::path(
    post,
    path = "/api/pedidos/{id}/fechar",
    params(("id" = i32, Path, description = "Order id")),
    request_body = CloseOrder,
    responses(
        (status = 200, description = "Order finalized", body = Order),
        (status = 400, description = "Order closed or payment short", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
    ),
    tag = "pedidos"
)]
pub async fn close_order(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(payload): ValidatedJson<CloseOrder>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(state.services.orders.close(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/pedidos/{id}",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 204, description = "Order and its items deleted"),
        (status = 404, description = "Order not found", body = ErrorResponse),
    ),
    tag = "pedidos"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.orders.delete(id).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    get,
    path = "/api/pedidos/{id}/itens",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Items of the order", body = [OrderItem]),
        (status = 404, description = "Order not found", body = ErrorResponse),
    ),
    tag = "pedidos"
)]
pub async fn list_order_items(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(state.services.orders.items(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/pedidos/{id}/itens",
    params(("id" = i32, Path, description = "Order id")),
    request_body = NewOrderItem,
    responses(
        (status = 201, description = "Item added, totals recomputed", body = OrderItem),
        (status = 400, description = "Order closed or product unavailable", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
    ),
    tag = "pedidos"
)]
pub async fn add_order_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(payload): ValidatedJson<NewOrderItem>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(created_response(
        state.services.orders.add_item(id, payload).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/pedidos/{id}/itens/{item_id}",
    params(
        ("id" = i32, Path, description = "Order id"),
        ("item_id" = i32, Path, description = "Order item id"),
    ),
    request_body = UpdateOrderItem,
    responses(
        (status = 200, description = "Item updated, totals recomputed", body = OrderItem),
        (status = 400, description = "Order closed", body = ErrorResponse),
        (status = 404, description = "Order or item not found", body = ErrorResponse),
    ),
    tag = "pedidos"
)]
pub async fn update_order_item(
    State(state): State<AppState>,
    ApiPath((id, item_id)): ApiPath<(i32, i32)>,
    ValidatedJson(payload): ValidatedJson<UpdateOrderItem>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(
        state
            .services
            .orders
            .update_item(id, item_id, payload)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/pedidos/{id}/itens/{item_id}",
    params(
        ("id" = i32, Path, description = "Order id"),
        ("item_id" = i32, Path, description = "Order item id"),
    ),
    responses(
        (status = 204, description = "Item removed, totals recomputed"),
        (status = 400, description = "Order closed", body = ErrorResponse),
        (status = 404, description = "Order or item not found", body = ErrorResponse),
    ),
    tag = "pedidos"
)]
pub async fn remove_order_item(
    State(state): State<AppState>,
    ApiPath((id, item_id)): ApiPath<(i32, i32)>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.orders.remove_item(id, item_id).await?;
    Ok(no_content_response())
}
