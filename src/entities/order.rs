use crate::errors::{ServiceError, ServiceResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum OrderKind {
    #[sea_orm(string_value = "mesa")]
    #[serde(rename = "mesa")]
    Table,
    #[sea_orm(string_value = "balcao")]
    #[serde(rename = "balcao")]
    Counter,
    #[sea_orm(string_value = "delivery")]
    #[serde(rename = "delivery")]
    Delivery,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum OrderStatus {
    #[sea_orm(string_value = "pendente")]
    #[serde(rename = "pendente")]
    Pending,
    #[sea_orm(string_value = "em_preparo")]
    #[serde(rename = "em_preparo")]
    Preparing,
    #[sea_orm(string_value = "pronto")]
    #[serde(rename = "pronto")]
    Ready,
    #[sea_orm(string_value = "entregue")]
    #[serde(rename = "entregue")]
    Delivered,
    #[sea_orm(string_value = "finalizado")]
    #[serde(rename = "finalizado")]
    Finished,
    #[sea_orm(string_value = "cancelado")]
    #[serde(rename = "cancelado")]
    Cancelled,
}

impl OrderStatus {
    /// Finished and cancelled orders are closed; their table is released.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Finished | OrderStatus::Cancelled)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "dinheiro")]
    #[serde(rename = "dinheiro")]
    Cash,
    #[sea_orm(string_value = "credito")]
    #[serde(rename = "credito")]
    Credit,
    #[sea_orm(string_value = "debito")]
    #[serde(rename = "debito")]
    Debit,
    #[sea_orm(string_value = "pix")]
    #[serde(rename = "pix")]
    Pix,
    #[sea_orm(string_value = "vale")]
    #[serde(rename = "vale")]
    Voucher,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "orders")]
#[schema(as = Order)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Sequential ticket number shown to staff and customers
    #[sea_orm(unique)]
    pub number: i32,
    pub kind: OrderKind,
    pub status: OrderStatus,
    pub table_id: Option<i32>,
    pub client_id: Option<i32>,
    pub customer_name: Option<String>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub service_fee: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
    pub payment_method: Option<PaymentMethod>,
    pub amount_paid: Option<Decimal>,
    pub change_due: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl Model {
    pub fn is_open(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Table whose status follows this order, if it is a table order
    pub fn occupied_table(&self) -> Option<i32> {
        match self.kind {
            OrderKind::Table => self.table_id,
            _ => None,
        }
    }

    /// Sets `subtotal` and derives `total` from it and the fees.
    pub fn apply_subtotal(&mut self, subtotal: Decimal) -> ServiceResult<()> {
        self.subtotal = subtotal;
        self.refresh_total()
    }

    pub fn refresh_total(&mut self) -> ServiceResult<()> {
        self.total = self
            .subtotal
            .checked_sub(self.discount)
            .and_then(|t| t.checked_add(self.service_fee))
            .and_then(|t| t.checked_add(self.delivery_fee))
            .ok_or_else(|| ServiceError::out_of_range("order total"))?;
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItem,
    #[sea_orm(
        belongs_to = "super::dining_table::Entity",
        from = "Column::TableId",
        to = "super::dining_table::Column::Id"
    )]
    DiningTable,
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItem.def()
    }
}

impl Related<super::dining_table::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DiningTable.def()
    }
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
