use super::common::{
    created_response, no_content_response, success_response, ApiPath, ApiQuery, ValidatedJson,
};
use crate::{
    dto::clients::{ClientQuery, NewClient, UpdateClient},
    errors::ServiceError,
    AppState,
};
use axum::{extract::State, response::IntoResponse, routing::get, Router};

pub fn clients_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route("/:id", get(get_client).put(update_client).delete(delete_client))
        .route("/:id/pedidos", get(client_orders))
}

async fn list_clients(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ClientQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(
        state.services.clients.list(query.search.as_deref()).await?,
    ))
}

async fn get_client(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(state.services.clients.get(id).await?))
}

async fn client_orders(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(
        state.services.clients.order_history(id).await?,
    ))
}

async fn create_client(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewClient>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(created_response(state.services.clients.create(payload).await?))
}

async fn update_client(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateClient>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(
        state.services.clients.update(id, payload).await?,
    ))
}

async fn delete_client(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.clients.delete(id).await?;
    Ok(no_content_response())
}
