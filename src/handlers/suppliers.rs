use super::common::{created_response, no_content_response, success_response, ApiPath, ValidatedJson};
use crate::{
    dto::suppliers::{NewSupplier, UpdateSupplier},
    errors::ServiceError,
    AppState,
};
use axum::{extract::State, response::IntoResponse, routing::get, Router};

pub fn suppliers_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_suppliers).post(create_supplier))
        .route(
            "/:id",
            get(get_supplier).put(update_supplier).delete(delete_supplier),
        )
}

async fn list_suppliers(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(state.services.suppliers.list().await?))
}

async fn get_supplier(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(state.services.suppliers.get(id).await?))
}

async fn create_supplier(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewSupplier>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(created_response(state.services.suppliers.create(payload).await?))
}

async fn update_supplier(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateSupplier>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(
        state.services.suppliers.update(id, payload).await?,
    ))
}

async fn delete_supplier(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.suppliers.delete(id).await?;
    Ok(no_content_response())
}
