//! End-to-end order lifecycle over the HTTP surface:
//! opening on a table, item changes, payment closing and the table status
//! that follows it, numbering, client counters and deletion.

mod common;

use axum::http::StatusCode;
use common::{id_of, money, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;

async fn table_status(app: &TestApp, table_id: i64) -> String {
    let (_, table) = app.get(&format!("/api/mesas/{table_id}")).await;
    table["status"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn table_order_occupies_and_closing_frees_the_table() {
    let app = TestApp::new().await;
    let table = app.create_table(4).await;
    let burger = app.create_menu_item("X-Salada", "25.00").await;
    let soda = app.create_menu_item("Refrigerante", "6.50").await;

    let order = app.open_table_order(table, &[(burger, 2), (soda, 1)]).await;
    let order_id = id_of(&order);
    assert_eq!(order["status"], "pendente");
    assert_eq!(order["kind"], "mesa");
    assert_eq!(money(&order["subtotal"]), dec!(56.50));
    assert_eq!(money(&order["total"]), dec!(56.50));
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
    assert_eq!(order["items"][0]["name"], "X-Salada");
    assert_eq!(table_status(&app, table).await, "ocupada");

    let (status, closed) = app
        .post(
            &format!("/api/pedidos/{order_id}/fechar"),
            json!({ "payment_method": "dinheiro", "amount_paid": "60.00", "service_fee": "3.50" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{closed}");
    assert_eq!(closed["status"], "finalizado");
    assert_eq!(closed["payment_method"], "dinheiro");
    assert_eq!(money(&closed["total"]), dec!(60.00));
    assert_eq!(money(&closed["change_due"]), dec!(0.00));
    assert!(closed["closed_at"].is_string());
    assert_eq!(table_status(&app, table).await, "livre");

    let (status, _) = app
        .post(
            &format!("/api/pedidos/{order_id}/fechar"),
            json!({ "payment_method": "pix" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn finalizing_through_status_frees_and_reopening_reoccupies() {
    let app = TestApp::new().await;
    let table = app.create_table(1).await;
    let item = app.create_menu_item("Chopp", "12.00").await;
    let order_id = id_of(&app.open_table_order(table, &[(item, 1)]).await);

    for status in ["em_preparo", "pronto", "entregue"] {
        let (code, order) = app
            .put(
                &format!("/api/pedidos/{order_id}/status"),
                json!({ "status": status }),
            )
            .await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(order["status"], status);
        assert_eq!(table_status(&app, table).await, "ocupada");
    }

    let (_, finished) = app
        .put(
            &format!("/api/pedidos/{order_id}/status"),
            json!({ "status": "finalizado" }),
        )
        .await;
    assert!(finished["closed_at"].is_string());
    assert_eq!(table_status(&app, table).await, "livre");

    let (_, reopened) = app
        .put(
            &format!("/api/pedidos/{order_id}/status"),
            json!({ "status": "pendente" }),
        )
        .await;
    assert!(reopened["closed_at"].is_null());
    assert_eq!(table_status(&app, table).await, "ocupada");

    let (status, _) = app
        .put(
            &format!("/api/pedidos/{order_id}/status"),
            json!({ "status": "perdido" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn one_open_order_per_table() {
    let app = TestApp::new().await;
    let table = app.create_table(2).await;
    let item = app.create_menu_item("Água", "4.00").await;
    let first = id_of(&app.open_table_order(table, &[(item, 1)]).await);

    let (status, _) = app
        .post(
            "/api/pedidos",
            json!({ "kind": "mesa", "table_id": table, "items": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    app.put(
        &format!("/api/pedidos/{first}/status"),
        json!({ "status": "cancelado" }),
    )
    .await;
    let (status, _) = app
        .post("/api/pedidos", json!({ "kind": "mesa", "table_id": table }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn reopening_is_refused_once_the_table_has_a_new_order() {
    let app = TestApp::new().await;
    let table = app.create_table(5).await;
    let coffee = app.create_menu_item("Café", "5.00").await;

    let first = id_of(&app.open_table_order(table, &[(coffee, 1)]).await);
    let (status, _) = app
        .put(&format!("/api/pedidos/{first}/status"), json!({ "status": "finalizado" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let second = id_of(&app.open_table_order(table, &[(coffee, 2)]).await);

    let (status, body) = app
        .put(&format!("/api/pedidos/{first}/status"), json!({ "status": "pendente" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");

    let (_, open) = app.get(&format!("/api/pedidos?table_id={table}&open=true")).await;
    let open = open.as_array().unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(id_of(&open[0]), second);
    let (_, current) = app.get(&format!("/api/mesas/{table}/pedido")).await;
    assert_eq!(id_of(&current), second);

    let (status, _) = app
        .put(&format!("/api/pedidos/{second}/status"), json!({ "status": "finalizado" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(table_status(&app, table).await, "livre");

    // with the table free again the first order may come back
    let (status, reopened) = app
        .put(&format!("/api/pedidos/{first}/status"), json!({ "status": "pendente" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{reopened}");
    assert_eq!(table_status(&app, table).await, "ocupada");
}

#[tokio::test]
async fn order_kind_rules() {
    let app = TestApp::new().await;
    let table = app.create_table(9).await;

    let (status, _) = app.post("/api/pedidos", json!({ "kind": "mesa" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/api/pedidos", json!({ "kind": "balcao", "table_id": table }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.post("/api/pedidos", json!({ "kind": "delivery" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let counter = app
        .create(
            "/api/pedidos",
            json!({ "kind": "balcao", "customer_name": "Ana" }),
        )
        .await;
    assert!(counter["table_id"].is_null());
    assert_eq!(table_status(&app, table).await, "livre");

    let delivery = app
        .create(
            "/api/pedidos",
            json!({ "kind": "delivery", "delivery_address": "Av. Brasil, 100", "delivery_fee": "7.00" }),
        )
        .await;
    assert_eq!(money(&delivery["total"]), dec!(7.00));

    let (status, _) = app.post("/api/pedidos", json!({ "kind": "viagem" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn numbers_are_sequential_and_searchable() {
    let app = TestApp::new().await;
    let mut numbers = Vec::new();
    for _ in 0..3 {
        let order = app.create("/api/pedidos", json!({ "kind": "balcao" })).await;
        numbers.push(order["number"].as_i64().unwrap());
    }
    assert_eq!(numbers, vec![1, 2, 3]);

    let (status, found) = app.get("/api/pedidos/numero/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["number"], 2);
    assert!(found["items"].is_array());

    let (status, _) = app.get("/api/pedidos/numero/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = app.get("/api/pedidos").await;
    let listed: Vec<i64> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["number"].as_i64().unwrap())
        .collect();
    assert_eq!(listed, vec![3, 2, 1]);
}

#[tokio::test]
async fn item_changes_recompute_totals() {
    let app = TestApp::new().await;
    let pizza = app.create_menu_item("Pizza Margherita", "48.00").await;
    let beer = app.create_menu_item("Cerveja", "11.00").await;
    let order = app
        .create(
            "/api/pedidos",
            json!({ "kind": "balcao", "discount": "5.00", "items": [{ "menu_item_id": pizza, "quantity": 1 }] }),
        )
        .await;
    let order_id = id_of(&order);
    assert_eq!(money(&order["total"]), dec!(43.00));

    let (status, added) = app
        .post(
            &format!("/api/pedidos/{order_id}/itens"),
            json!({ "menu_item_id": beer, "quantity": 2, "notes": "bem gelada" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(money(&added["total"]), dec!(22.00));
    assert_eq!(added["notes"], "bem gelada");
    let beer_line = id_of(&added);

    let (_, detail) = app.get(&format!("/api/pedidos/{order_id}")).await;
    assert_eq!(money(&detail["subtotal"]), dec!(70.00));
    assert_eq!(money(&detail["total"]), dec!(65.00));

    let (status, line) = app
        .put(
            &format!("/api/pedidos/{order_id}/itens/{beer_line}"),
            json!({ "quantity": 3 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(money(&line["total"]), dec!(33.00));
    let (_, detail) = app.get(&format!("/api/pedidos/{order_id}")).await;
    assert_eq!(money(&detail["total"]), dec!(76.00));

    assert_eq!(
        app.delete(&format!("/api/pedidos/{order_id}/itens/{beer_line}")).await,
        StatusCode::NO_CONTENT
    );
    let (_, items) = app.get(&format!("/api/pedidos/{order_id}/itens")).await;
    assert_eq!(items.as_array().unwrap().len(), 1);
    let (_, detail) = app.get(&format!("/api/pedidos/{order_id}")).await;
    assert_eq!(money(&detail["total"]), dec!(43.00));

    let (status, _) = app
        .post(
            &format!("/api/pedidos/{order_id}/itens"),
            json!({ "menu_item_id": beer, "quantity": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn closed_orders_reject_changes() {
    let app = TestApp::new().await;
    let item = app.create_menu_item("Pão de queijo", "3.00").await;
    let order = app
        .create(
            "/api/pedidos",
            json!({ "kind": "balcao", "items": [{ "menu_item_id": item, "quantity": 4 }] }),
        )
        .await;
    let order_id = id_of(&order);
    let line_id = id_of(&order["items"][0]);

    let (status, _) = app
        .post(
            &format!("/api/pedidos/{order_id}/fechar"),
            json!({ "payment_method": "credito", "amount_paid": "5.00" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            &format!("/api/pedidos/{order_id}/fechar"),
            json!({ "payment_method": "credito" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post(
            &format!("/api/pedidos/{order_id}/itens"),
            json!({ "menu_item_id": item, "quantity": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app
        .put(
            &format!("/api/pedidos/{order_id}/itens/{line_id}"),
            json!({ "quantity": 2 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        app.delete(&format!("/api/pedidos/{order_id}/itens/{line_id}")).await,
        StatusCode::BAD_REQUEST
    );
    let (status, _) = app
        .put(&format!("/api/pedidos/{order_id}"), json!({ "notes": "tarde" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unavailable_or_missing_menu_items_are_rejected() {
    let app = TestApp::new().await;
    let hidden = id_of(
        &app.create(
            "/api/produtos",
            json!({ "name": "Sopa", "price": "18.00", "available": false }),
        )
        .await,
    );

    let (status, _) = app
        .post(
            "/api/pedidos",
            json!({ "kind": "balcao", "items": [{ "menu_item_id": hidden, "quantity": 1 }] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/pedidos",
            json!({ "kind": "balcao", "items": [{ "menu_item_id": 404, "quantity": 1 }] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, orders) = app.get("/api/pedidos").await;
    assert!(orders.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn client_orders_update_counters_and_history() {
    let app = TestApp::new().await;
    let client = app.create_client("Carla Dias").await;

    let delivery = app
        .create(
            "/api/pedidos",
            json!({ "kind": "delivery", "client_id": client }),
        )
        .await;
    assert_eq!(delivery["customer_name"], "Carla Dias");
    assert_eq!(delivery["delivery_address"], "Rua A, 10");
    app.create(
        "/api/pedidos",
        json!({ "kind": "balcao", "client_id": client, "customer_name": "Carla" }),
    )
    .await;

    let (_, fetched) = app.get(&format!("/api/clientes/{client}")).await;
    assert_eq!(fetched["order_count"], 2);
    assert!(fetched["last_order_at"].is_string());

    let (_, history) = app.get(&format!("/api/clientes/{client}/pedidos")).await;
    assert_eq!(history.as_array().unwrap().len(), 2);

    let (status, _) = app
        .post("/api/pedidos", json!({ "kind": "balcao", "client_id": 777 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn moving_an_order_between_tables() {
    let app = TestApp::new().await;
    let from = app.create_table(10).await;
    let to = app.create_table(11).await;
    let busy = app.create_table(12).await;
    let order_id = id_of(&app.open_table_order(from, &[]).await);
    app.open_table_order(busy, &[]).await;

    let (status, _) = app
        .put(&format!("/api/pedidos/{order_id}"), json!({ "table_id": busy }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, moved) = app
        .put(&format!("/api/pedidos/{order_id}"), json!({ "table_id": to }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["table_id"], to);
    assert_eq!(table_status(&app, from).await, "livre");
    assert_eq!(table_status(&app, to).await, "ocupada");
}

#[tokio::test]
async fn deleting_an_open_order_frees_table_and_removes_items() {
    let app = TestApp::new().await;
    let table = app.create_table(6).await;
    let item = app.create_menu_item("Porção de batata", "29.00").await;
    let order_id = id_of(&app.open_table_order(table, &[(item, 1)]).await);

    assert_eq!(app.delete(&format!("/api/pedidos/{order_id}")).await, StatusCode::NO_CONTENT);
    assert_eq!(table_status(&app, table).await, "livre");

    let (status, _) = app.get(&format!("/api/pedidos/{order_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get(&format!("/api/pedidos/{order_id}/itens")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.delete(&format!("/api/pedidos/{order_id}")).await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_filters() {
    let app = TestApp::new().await;
    let table = app.create_table(1).await;
    let open = id_of(&app.open_table_order(table, &[]).await);
    let counter = id_of(&app.create("/api/pedidos", json!({ "kind": "balcao" })).await);
    app.post(
        &format!("/api/pedidos/{counter}/fechar"),
        json!({ "payment_method": "pix" }),
    )
    .await;

    let (_, only_open) = app.get("/api/pedidos?open=true").await;
    let only_open = only_open.as_array().unwrap();
    assert_eq!(only_open.len(), 1);
    assert_eq!(only_open[0]["id"], open);

    let (_, finished) = app.get("/api/pedidos?status=finalizado").await;
    assert_eq!(finished.as_array().unwrap()[0]["id"], counter);

    let (_, by_table) = app.get(&format!("/api/pedidos?table_id={table}")).await;
    assert_eq!(by_table.as_array().unwrap().len(), 1);

    let (_, by_kind) = app.get("/api/pedidos?kind=balcao").await;
    assert_eq!(by_kind.as_array().unwrap().len(), 1);

    let (_, future) = app
        .get("/api/pedidos?start_date=2999-01-01&end_date=2999-01-02")
        .await;
    assert!(future.as_array().unwrap().is_empty());

    let (status, _) = app
        .get("/api/pedidos?start_date=2024-05-02&end_date=2024-05-01")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
