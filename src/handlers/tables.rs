use super::common::{
    created_response, no_content_response, success_response, ApiPath, ApiQuery, ValidatedJson,
};
use crate::{
    dto::tables::{NewTable, TableQuery, TableStatusUpdate, UpdateTable},
    errors::ServiceError,
    AppState,
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, put},
    Router,
};

pub fn tables_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tables).post(create_table))
        .route("/:id", get(get_table).put(update_table).delete(delete_table))
        .route("/:id/status", put(set_table_status))
        .route("/:id/pedido", get(current_order))
}

async fn list_tables(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TableQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(state.services.tables.list(query.status).await?))
}

async fn get_table(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(state.services.tables.get(id).await?))
}

/// Open order on the table, with its items
async fn current_order(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state.services.tables.current_order(id).await?;
    Ok(success_response(state.services.orders.get(order.id).await?))
}

async fn create_table(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewTable>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(created_response(state.services.tables.create(payload).await?))
}

async fn update_table(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateTable>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(state.services.tables.update(id, payload).await?))
}

async fn set_table_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(payload): ValidatedJson<TableStatusUpdate>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(
        state.services.tables.set_status(id, payload.status).await?,
    ))
}

async fn delete_table(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.tables.delete(id).await?;
    Ok(no_content_response())
}
