use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum MovementKind {
    #[sea_orm(string_value = "entrada")]
    #[serde(rename = "entrada")]
    In,
    #[sea_orm(string_value = "saida")]
    #[serde(rename = "saida")]
    Out,
    #[sea_orm(string_value = "ajuste")]
    #[serde(rename = "ajuste")]
    Adjustment,
}

impl MovementKind {
    /// Kind implied by the sign of a delta when the caller does not name one
    pub fn for_delta(delta: Decimal) -> Self {
        if delta.is_sign_negative() {
            MovementKind::Out
        } else {
            MovementKind::In
        }
    }
}

/// Logged stock quantity change; `quantity` is the signed delta applied
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "stock_movements")]
#[schema(as = StockMovement)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub stock_item_id: i32,
    pub kind: MovementKind,
    pub quantity: Decimal,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::stock_item::Entity",
        from = "Column::StockItemId",
        to = "super::stock_item::Column::Id"
    )]
    StockItem,
}

impl Related<super::stock_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
