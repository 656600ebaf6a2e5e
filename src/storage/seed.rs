use super::Storage;
use crate::entities::{DiningTable, Group, MenuItem, StockItem, Supplier, TableStatus};
use crate::errors::ServiceResult;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

const TABLE_COUNT: i32 = 8;

/// Loads a small demo catalogue when the store has no groups and no tables.
/// Returns whether anything was written.
pub async fn seed_demo_data(storage: &dyn Storage) -> ServiceResult<bool> {
    if !storage.list_groups().await?.is_empty() || !storage.list_tables(None).await?.is_empty() {
        info!("Storage already populated, skipping demo seed");
        return Ok(false);
    }

    let now = Utc::now();
    let menu: [(&str, &[(&str, Decimal)]); 3] = [
        (
            "Lanches",
            &[("X-Burguer", dec!(22.00)), ("X-Salada", dec!(24.50)), ("Misto Quente", dec!(12.00))],
        ),
        (
            "Bebidas",
            &[("Refrigerante Lata", dec!(6.00)), ("Suco Natural", dec!(9.00)), ("Agua Mineral", dec!(4.00))],
        ),
        ("Porcoes", &[("Batata Frita", dec!(28.00)), ("Calabresa Acebolada", dec!(35.00))]),
    ];

    for (group_name, items) in menu {
        let group = storage
            .insert_group(Group {
                id: 0,
                name: group_name.to_string(),
                description: None,
                active: true,
                created_at: now,
            })
            .await?;
        for (name, price) in items {
            storage
                .insert_menu_item(MenuItem {
                    id: 0,
                    name: name.to_string(),
                    description: None,
                    price: *price,
                    cost: None,
                    group_id: Some(group.id),
                    barcode: None,
                    available: true,
                    created_at: now,
                    updated_at: now,
                })
                .await?;
        }
    }

    for number in 1..=TABLE_COUNT {
        storage
            .insert_table(DiningTable {
                id: 0,
                number,
                capacity: 4,
                status: TableStatus::Free,
                location: Some("Salao".to_string()),
                created_at: now,
            })
            .await?;
    }

    let supplier = storage
        .insert_supplier(Supplier {
            id: 0,
            name: "Distribuidora Central".to_string(),
            document: None,
            contact_name: None,
            phone: None,
            email: None,
            address: None,
            notes: None,
            created_at: now,
        })
        .await?;

    for (name, unit, minimum, ideal) in [
        ("Pao de Hamburguer", "un", dec!(20), dec!(100)),
        ("Carne Bovina", "kg", dec!(5), dec!(20)),
        ("Batata Congelada", "kg", dec!(10), dec!(40)),
    ] {
        storage
            .insert_stock_item(StockItem {
                id: 0,
                name: name.to_string(),
                unit: unit.to_string(),
                quantity: Decimal::ZERO,
                minimum_quantity: minimum,
                ideal_quantity: ideal,
                unit_cost: None,
                supplier_id: Some(supplier.id),
                barcode: None,
                category: Some("Insumos".to_string()),
                created_at: now,
                updated_at: now,
            })
            .await?;
    }

    info!("Demo data seeded");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemStorage, MenuItemFilter};

    #[tokio::test]
    async fn seeds_once() {
        let store = MemStorage::new();
        assert!(seed_demo_data(&store).await.unwrap());
        assert!(!seed_demo_data(&store).await.unwrap());

        let tables = store.list_tables(None).await.unwrap();
        assert_eq!(tables.len(), TABLE_COUNT as usize);
        assert!(tables.iter().all(|t| t.status == TableStatus::Free));
        assert_eq!(
            store
                .list_menu_items(&MenuItemFilter::default())
                .await
                .unwrap()
                .len(),
            8
        );
    }
}
