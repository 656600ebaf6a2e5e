use super::{clean, double_option, money_amount, stock_delta, stock_quantity};
use crate::entities::{MovementKind, StockItem};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewStockItem {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    /// Unit of measure, e.g. "kg", "un", "l"
    #[validate(length(min = 1, max = 20))]
    pub unit: String,
    /// Opening balance, recorded as an `entrada` movement
    #[validate(custom = "stock_quantity")]
    #[schema(value_type = Option<String>)]
    pub initial_quantity: Option<Decimal>,
    #[validate(custom = "stock_quantity")]
    #[schema(value_type = Option<String>)]
    pub minimum_quantity: Option<Decimal>,
    #[validate(custom = "stock_quantity")]
    #[schema(value_type = Option<String>)]
    pub ideal_quantity: Option<Decimal>,
    #[validate(custom = "money_amount")]
    #[schema(value_type = Option<String>)]
    pub unit_cost: Option<Decimal>,
    pub supplier_id: Option<i32>,
    #[validate(length(min = 1, max = 64))]
    pub barcode: Option<String>,
    pub category: Option<String>,
}

impl NewStockItem {
    /// Record with a zero balance plus the opening quantity to apply, if any
    pub fn into_record(self, now: DateTime<Utc>) -> (StockItem, Option<Decimal>) {
        let item = StockItem {
            id: 0,
            name: self.name.trim().to_string(),
            unit: self.unit.trim().to_string(),
            quantity: Decimal::ZERO,
            minimum_quantity: self.minimum_quantity.unwrap_or_default(),
            ideal_quantity: self.ideal_quantity.unwrap_or_default(),
            unit_cost: self.unit_cost,
            supplier_id: self.supplier_id,
            barcode: clean(self.barcode),
            category: clean(self.category),
            created_at: now,
            updated_at: now,
        };
        let opening = self.initial_quantity.filter(|q| !q.is_zero());
        (item, opening)
    }
}

/// The balance only moves through adjustments, so `quantity` is not accepted here
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateStockItem {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub unit: Option<String>,
    #[validate(custom = "stock_quantity")]
    #[schema(value_type = Option<String>)]
    pub minimum_quantity: Option<Decimal>,
    #[validate(custom = "stock_quantity")]
    #[schema(value_type = Option<String>)]
    pub ideal_quantity: Option<Decimal>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub unit_cost: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub supplier_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub barcode: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub category: Option<Option<String>>,
}

impl UpdateStockItem {
    pub fn new_supplier_id(&self) -> Option<i32> {
        self.supplier_id.flatten()
    }

    pub fn check_unit_cost(&self) -> Result<(), validator::ValidationError> {
        match self.unit_cost {
            Some(Some(cost)) => money_amount(&cost),
            _ => Ok(()),
        }
    }

    pub fn apply(self, item: &mut StockItem, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            item.name = name.trim().to_string();
        }
        if let Some(unit) = self.unit {
            item.unit = unit.trim().to_string();
        }
        if let Some(minimum) = self.minimum_quantity {
            item.minimum_quantity = minimum;
        }
        if let Some(ideal) = self.ideal_quantity {
            item.ideal_quantity = ideal;
        }
        if let Some(cost) = self.unit_cost {
            item.unit_cost = cost;
        }
        if let Some(supplier_id) = self.supplier_id {
            item.supplier_id = supplier_id;
        }
        if let Some(barcode) = self.barcode {
            item.barcode = clean(barcode);
        }
        if let Some(category) = self.category {
            item.category = clean(category);
        }
        item.updated_at = now;
    }
}

/// Signed change to a stock balance
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct StockAdjustment {
    #[validate(custom = "stock_delta")]
    #[schema(value_type = String, example = "-2.5")]
    pub quantity: Decimal,
    /// Defaults to `entrada` for positive and `saida` for negative quantities
    pub kind: Option<MovementKind>,
    #[validate(length(max = 255))]
    pub reason: Option<String>,
}

impl StockAdjustment {
    pub fn movement_kind(&self) -> MovementKind {
        self.kind
            .unwrap_or_else(|| MovementKind::for_delta(self.quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn kind_follows_sign_when_omitted() {
        let out: StockAdjustment = serde_json::from_str(r#"{"quantity": "-3"}"#).unwrap();
        assert_eq!(out.movement_kind(), MovementKind::Out);
        let inbound: StockAdjustment = serde_json::from_str(r#"{"quantity": 3}"#).unwrap();
        assert_eq!(inbound.movement_kind(), MovementKind::In);
        let explicit: StockAdjustment =
            serde_json::from_str(r#"{"quantity": "-1", "kind": "ajuste"}"#).unwrap();
        assert_eq!(explicit.movement_kind(), MovementKind::Adjustment);
    }

    #[test]
    fn zero_adjustment_fails_validation() {
        let payload: StockAdjustment = serde_json::from_str(r#"{"quantity": "0"}"#).unwrap();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn adjustment_beyond_column_precision_fails_validation() {
        let payload: StockAdjustment =
            serde_json::from_str(r#"{"quantity": "79228162514264337593543950335"}"#).unwrap();
        assert!(payload.validate().is_err());
        let opening = NewStockItem {
            name: "Farinha".into(),
            unit: "kg".into(),
            initial_quantity: Some(dec!(100000000000)),
            minimum_quantity: None,
            ideal_quantity: None,
            unit_cost: None,
            supplier_id: None,
            barcode: None,
            category: None,
        };
        assert!(opening.validate().is_err());
    }

    #[test]
    fn quantity_cannot_be_patched_directly() {
        assert!(serde_json::from_str::<UpdateStockItem>(r#"{"quantity": "10"}"#).is_err());
    }

    #[test]
    fn opening_balance_is_split_from_record() {
        let (item, opening) = NewStockItem {
            name: "Queijo".into(),
            unit: "kg".into(),
            initial_quantity: Some(dec!(4.5)),
            minimum_quantity: Some(dec!(1)),
            ideal_quantity: None,
            unit_cost: None,
            supplier_id: None,
            barcode: None,
            category: None,
        }
        .into_record(Utc::now());
        assert_eq!(item.quantity, Decimal::ZERO);
        assert_eq!(opening, Some(dec!(4.5)));
    }
}
