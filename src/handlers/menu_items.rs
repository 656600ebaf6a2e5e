use super::common::{
    created_response, no_content_response, success_response, ApiPath, ApiQuery, ValidatedJson,
};
use crate::{
    dto::catalog::{MenuItemQuery, NewMenuItem, UpdateMenuItem},
    errors::ServiceError,
    storage::MenuItemFilter,
    AppState,
};
use axum::{extract::State, response::IntoResponse, routing::get, Router};

pub fn menu_items_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_menu_items).post(create_menu_item))
        .route("/codigo/:barcode", get(get_menu_item_by_barcode))
        .route(
            "/:id",
            get(get_menu_item)
                .put(update_menu_item)
                .delete(delete_menu_item),
        )
}

async fn list_menu_items(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<MenuItemQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let filter = MenuItemFilter::from(query);
    Ok(success_response(
        state.services.catalog.list_menu_items(&filter).await?,
    ))
}

async fn get_menu_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(state.services.catalog.get_menu_item(id).await?))
}

async fn get_menu_item_by_barcode(
    State(state): State<AppState>,
    ApiPath(barcode): ApiPath<String>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(
        state
            .services
            .catalog
            .find_menu_item_by_barcode(&barcode)
            .await?,
    ))
}

async fn create_menu_item(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewMenuItem>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(created_response(
        state.services.catalog.create_menu_item(payload).await?,
    ))
}

async fn update_menu_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateMenuItem>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(
        state.services.catalog.update_menu_item(id, payload).await?,
    ))
}

async fn delete_menu_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.catalog.delete_menu_item(id).await?;
    Ok(no_content_response())
}
