use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Occupancy of a table. Stored and serialized with the floor staff's vocabulary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum TableStatus {
    #[sea_orm(string_value = "livre")]
    #[serde(rename = "livre")]
    Free,
    #[sea_orm(string_value = "ocupada")]
    #[serde(rename = "ocupada")]
    Occupied,
    #[sea_orm(string_value = "reservada")]
    #[serde(rename = "reservada")]
    Reserved,
    #[sea_orm(string_value = "limpeza")]
    #[serde(rename = "limpeza")]
    Cleaning,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "dining_tables")]
#[schema(as = DiningTable)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub number: i32,
    pub capacity: i32,
    pub status: TableStatus,
    /// Free text such as "varanda" or "salão"
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order::Entity")]
    Order,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
