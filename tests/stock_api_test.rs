//! Stock balances and the movement log.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use comanda_api::{
    dto::stock::{NewStockItem, StockAdjustment},
    services::stock::StockService,
    storage::MemStorage,
};
use common::{id_of, quantity, TestApp};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

#[tokio::test]
async fn opening_quantity_is_logged_as_an_entry() {
    let app = TestApp::new().await;
    let id = app.create_stock_item("Farinha", "25", "5").await;

    let (_, item) = app.get(&format!("/api/estoque/{id}")).await;
    assert_eq!(quantity(&item["quantity"]), dec!(25));

    let (_, movements) = app.get(&format!("/api/estoque/{id}/movimentacoes")).await;
    let movements = movements.as_array().unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0]["kind"], "entrada");
    assert_eq!(quantity(&movements[0]["quantity"]), dec!(25));
    assert_eq!(movements[0]["reason"], "saldo inicial");
}

#[tokio::test]
async fn out_of_range_adjustment_is_rejected_and_store_keeps_serving() {
    let app = TestApp::new().await;
    let id = app.create_stock_item("Sal", "10", "1").await;
    let uri = format!("/api/estoque/{id}/ajuste");

    for _ in 0..2 {
        let (status, body) = app
            .post(&uri, json!({ "quantity": "79228162514264337593543950335" }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    }
    let (status, _) = app.post(&uri, json!({ "quantity": "-100000000000" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.get("/api/mesas").await;
    assert_eq!(status, StatusCode::OK);
    let (status, item) = app.get(&format!("/api/estoque/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quantity(&item["quantity"]), dec!(10));
    let (_, movements) = app.get(&format!("/api/estoque/{id}/movimentacoes")).await;
    assert_eq!(movements.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn balance_stays_within_column_precision_per_request() {
    let app = TestApp::new().await;
    let id = app.create_stock_item("Açúcar", "0", "0").await;

    let (status, result) = app
        .post(
            &format!("/api/estoque/{id}/ajuste"),
            json!({ "quantity": "99999999999.999" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{result}");
    assert_eq!(quantity(&result["item"]["quantity"]), dec!(99999999999.999));
}

#[tokio::test]
async fn adjustments_move_the_balance_and_log_movements() {
    let app = TestApp::new().await;
    let id = app.create_stock_item("Queijo", "10", "2").await;

    let (status, result) = app
        .post(
            &format!("/api/estoque/{id}/ajuste"),
            json!({ "quantity": "-2.5", "reason": "pizza" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{result}");
    assert_eq!(quantity(&result["item"]["quantity"]), dec!(7.5));
    assert_eq!(result["movement"]["kind"], "saida");
    assert_eq!(quantity(&result["movement"]["quantity"]), dec!(-2.5));

    let (_, result) = app
        .post(
            &format!("/api/estoque/{id}/ajuste"),
            json!({ "quantity": "0.5", "kind": "ajuste", "reason": "inventário" }),
        )
        .await;
    assert_eq!(result["movement"]["kind"], "ajuste");
    assert_eq!(quantity(&result["item"]["quantity"]), dec!(8));

    let (_, movements) = app.get(&format!("/api/estoque/{id}/movimentacoes")).await;
    let kinds: Vec<&str> = movements
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["ajuste", "saida", "entrada"]);

    let (_, all) = app.get("/api/movimentacoes").await;
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn balance_may_go_negative() {
    let app = TestApp::new().await;
    let id = app.create_stock_item("Ovos", "2", "0").await;
    let (status, result) = app
        .post(&format!("/api/estoque/{id}/ajuste"), json!({ "quantity": -5 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quantity(&result["item"]["quantity"]), dec!(-3));
}

#[tokio::test]
async fn invalid_adjustments_are_rejected() {
    let app = TestApp::new().await;
    let id = app.create_stock_item("Sal", "1", "0").await;

    let (status, _) = app
        .post(&format!("/api/estoque/{id}/ajuste"), json!({ "quantity": "0" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(&format!("/api/estoque/{id}/ajuste"), json!({ "quantity": "muito" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/api/estoque/999/ajuste", json!({ "quantity": "1" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, movements) = app.get(&format!("/api/estoque/{id}/movimentacoes")).await;
    assert_eq!(movements.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn update_edits_descriptive_fields_only() {
    let app = TestApp::new().await;
    let id = app.create_stock_item("Arroz", "30", "10").await;

    let (status, updated) = app
        .put(
            &format!("/api/estoque/{id}"),
            json!({ "minimum_quantity": "40", "category": "grãos" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["category"], "grãos");
    assert_eq!(quantity(&updated["minimum_quantity"]), dec!(40));
    assert_eq!(quantity(&updated["quantity"]), dec!(30));
    assert_eq!(updated["name"], "Arroz");

    let (status, _) = app
        .put(&format!("/api/estoque/{id}"), json!({ "quantity": "99" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn low_stock_lists_items_under_minimum() {
    let app = TestApp::new().await;
    let low = app.create_stock_item("Tomate", "1", "5").await;
    app.create_stock_item("Batata", "20", "5").await;
    app.create_stock_item("Alho", "5", "5").await;

    let (_, items) = app.get("/api/estoque/baixo").await;
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(id_of(&items[0]), low);
}

#[tokio::test]
async fn barcode_lookup_and_delete_cascade() {
    let app = TestApp::new().await;
    let item = app
        .create(
            "/api/estoque",
            json!({ "name": "Leite", "unit": "l", "initial_quantity": "12", "barcode": "789555" }),
        )
        .await;
    let id = id_of(&item);

    let (status, found) = app.get("/api/estoque/codigo/789555").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["name"], "Leite");

    assert_eq!(app.delete(&format!("/api/estoque/{id}")).await, StatusCode::NO_CONTENT);
    let (status, _) = app.get(&format!("/api/estoque/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, all) = app.get("/api/movimentacoes").await;
    assert!(all.as_array().unwrap().is_empty());
    let (status, _) = app.get(&format!("/api/estoque/{id}/movimentacoes")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn round_trip(deltas: Vec<i64>) -> (Decimal, Decimal) {
    let service = StockService::new(Arc::new(MemStorage::new()));
    let item = service
        .create(NewStockItem {
            name: "Carne".into(),
            unit: "kg".into(),
            initial_quantity: Some(dec!(3)),
            minimum_quantity: None,
            ideal_quantity: None,
            unit_cost: None,
            supplier_id: None,
            barcode: None,
            category: None,
        })
        .await
        .unwrap();

    for delta in deltas {
        let delta = Decimal::new(delta, 2);
        for quantity in [delta, -delta] {
            service
                .adjust(
                    item.id,
                    StockAdjustment {
                        quantity,
                        kind: None,
                        reason: None,
                    },
                )
                .await
                .unwrap();
        }
    }

    let after = service.get(item.id).await.unwrap().quantity;
    let history = service.movements(Some(item.id)).await.unwrap();
    let net = StockService::net_change(&history).unwrap();
    (after, net)
}

proptest! {
    #[test]
    fn adding_then_removing_restores_the_balance(
        deltas in prop::collection::vec(1i64..1_000_000, 1..8)
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let (after, net) = runtime.block_on(round_trip(deltas));
        prop_assert_eq!(after, dec!(3));
        prop_assert_eq!(net, dec!(3));
    }
}
