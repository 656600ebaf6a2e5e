//! Groups and menu items through the HTTP surface.

mod common;

use axum::http::StatusCode;
use common::{id_of, money, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;

#[tokio::test]
async fn group_crud_round_trip() {
    let app = TestApp::new().await;

    let created = app
        .create(
            "/api/grupos",
            json!({ "name": "Bebidas", "description": "Sucos e refrigerantes" }),
        )
        .await;
    let id = id_of(&created);
    assert_eq!(created["active"], true);

    let (status, fetched) = app.get(&format!("/api/grupos/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Bebidas");
    assert_eq!(fetched["description"], "Sucos e refrigerantes");

    let (status, updated) = app
        .put(&format!("/api/grupos/{id}"), json!({ "name": "Drinks" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Drinks");
    assert_eq!(updated["description"], "Sucos e refrigerantes");

    assert_eq!(app.delete(&format!("/api/grupos/{id}")).await, StatusCode::NO_CONTENT);
    let (_, list) = app.get("/api/grupos").await;
    assert!(list.as_array().unwrap().is_empty());
    let (status, _) = app.get(&format!("/api/grupos/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn group_in_use_cannot_be_deleted() {
    let app = TestApp::new().await;
    let group_id = app.create_group("Lanches").await;
    app.create(
        "/api/produtos",
        json!({ "name": "X-Burger", "price": "22.00", "group_id": group_id }),
    )
    .await;

    let status = app.delete(&format!("/api/grupos/{group_id}")).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn menu_item_update_changes_only_given_fields() {
    let app = TestApp::new().await;
    let group_id = app.create_group("Pratos").await;
    let created = app
        .create(
            "/api/produtos",
            json!({
                "name": "Feijoada",
                "price": "39.90",
                "cost": "15.00",
                "group_id": group_id,
                "barcode": "7890000000011"
            }),
        )
        .await;
    let id = id_of(&created);

    let (status, updated) = app
        .put(&format!("/api/produtos/{id}"), json!({ "price": "42.50" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(money(&updated["price"]), dec!(42.50));
    assert_eq!(updated["name"], "Feijoada");
    assert_eq!(money(&updated["cost"]), dec!(15.00));
    assert_eq!(updated["group_id"], group_id);
    assert_eq!(updated["barcode"], "7890000000011");

    let (status, cleared) = app
        .put(&format!("/api/produtos/{id}"), json!({ "group_id": null }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(cleared["group_id"].is_null());
}

#[tokio::test]
async fn menu_items_filter_by_group_availability_and_name() {
    let app = TestApp::new().await;
    let drinks = app.create_group("Bebidas").await;
    app.create(
        "/api/produtos",
        json!({ "name": "Suco de Laranja", "price": "9.00", "group_id": drinks }),
    )
    .await;
    app.create(
        "/api/produtos",
        json!({ "name": "Refrigerante", "price": "6.00", "group_id": drinks, "available": false }),
    )
    .await;
    app.create_menu_item("Pastel de Carne", "8.50").await;

    let (_, by_group) = app.get(&format!("/api/produtos?group_id={drinks}")).await;
    assert_eq!(by_group.as_array().unwrap().len(), 2);

    let (_, available) = app
        .get(&format!("/api/produtos?group_id={drinks}&available=true"))
        .await;
    let available = available.as_array().unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0]["name"], "Suco de Laranja");

    let (_, search) = app.get("/api/produtos?search=PASTEL").await;
    let search = search.as_array().unwrap();
    assert_eq!(search.len(), 1);
    assert_eq!(search[0]["name"], "Pastel de Carne");
}

#[tokio::test]
async fn menu_item_lookup_by_barcode() {
    let app = TestApp::new().await;
    app.create(
        "/api/produtos",
        json!({ "name": "Água", "price": "4.00", "barcode": "789123" }),
    )
    .await;

    let (status, found) = app.get("/api/produtos/codigo/789123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["name"], "Água");

    let (status, body) = app.get("/api/produtos/codigo/000").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn invalid_menu_item_payloads_are_rejected() {
    let app = TestApp::new().await;

    let (status, _) = app
        .post("/api/produtos", json!({ "name": "Pastel", "price": "-1.00" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/api/produtos", json!({ "name": "", "price": "1.00" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/produtos",
            json!({ "name": "Pastel", "price": "1.00", "sku": "x" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            "/api/produtos",
            json!({ "name": "Pastel", "price": "1.00", "group_id": 999 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("999"));
}

#[tokio::test]
async fn missing_and_malformed_ids() {
    let app = TestApp::new().await;
    let (status, _) = app.get("/api/produtos/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.get("/api/produtos/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");

    assert_eq!(app.delete("/api/produtos/42").await, StatusCode::NOT_FOUND);
}
