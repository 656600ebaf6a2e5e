use super::common::{created_response, no_content_response, success_response, ApiPath, ValidatedJson};
use crate::{
    dto::catalog::{NewGroup, UpdateGroup},
    errors::ServiceError,
    AppState,
};
use axum::{extract::State, response::IntoResponse, routing::get, Router};

pub fn groups_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_groups).post(create_group))
        .route("/:id", get(get_group).put(update_group).delete(delete_group))
}

async fn list_groups(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(state.services.catalog.list_groups().await?))
}

async fn get_group(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(state.services.catalog.get_group(id).await?))
}

async fn create_group(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewGroup>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(created_response(state.services.catalog.create_group(payload).await?))
}

async fn update_group(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateGroup>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(
        state.services.catalog.update_group(id, payload).await?,
    ))
}

async fn delete_group(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.catalog.delete_group(id).await?;
    Ok(no_content_response())
}
