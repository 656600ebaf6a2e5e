use super::{double_option, money_amount};
use crate::entities::{Order, OrderItem, OrderKind, OrderStatus, PaymentMethod};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewOrderItem {
    pub menu_item_id: i32,
    #[validate(range(min = 1, max = 999))]
    pub quantity: i32,
    #[validate(length(max = 255))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewOrder {
    pub kind: OrderKind,
    /// Required for `mesa` orders
    pub table_id: Option<i32>,
    pub client_id: Option<i32>,
    /// Defaults to the client's name when a client is given
    #[validate(length(max = 120))]
    pub customer_name: Option<String>,
    /// Required for `delivery` orders without a client
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    #[validate(custom = "money_amount")]
    #[schema(value_type = Option<String>)]
    pub discount: Option<Decimal>,
    #[validate(custom = "money_amount")]
    #[schema(value_type = Option<String>)]
    pub service_fee: Option<Decimal>,
    #[validate(custom = "money_amount")]
    #[schema(value_type = Option<String>)]
    pub delivery_fee: Option<Decimal>,
    #[serde(default)]
    #[validate]
    pub items: Vec<NewOrderItem>,
}

/// Header fields of an order; items have their own endpoints
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateOrder {
    /// Moves a table order to another table
    pub table_id: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub customer_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub delivery_address: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
    #[validate(custom = "money_amount")]
    #[schema(value_type = Option<String>)]
    pub discount: Option<Decimal>,
    #[validate(custom = "money_amount")]
    #[schema(value_type = Option<String>)]
    pub service_fee: Option<Decimal>,
    #[validate(custom = "money_amount")]
    #[schema(value_type = Option<String>)]
    pub delivery_fee: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// Payment closing
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CloseOrder {
    pub payment_method: PaymentMethod,
    /// Defaults to the order total; must cover it
    #[validate(custom = "money_amount")]
    #[schema(value_type = Option<String>)]
    pub amount_paid: Option<Decimal>,
    #[validate(custom = "money_amount")]
    #[schema(value_type = Option<String>)]
    pub discount: Option<Decimal>,
    #[validate(custom = "money_amount")]
    #[schema(value_type = Option<String>)]
    pub service_fee: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateOrderItem {
    #[validate(range(min = 1, max = 999))]
    pub quantity: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub kind: Option<OrderKind>,
    pub table_id: Option<i32>,
    pub client_id: Option<i32>,
    /// `true` lists only orders that are not finalized or cancelled
    pub open: Option<bool>,
    /// Inclusive, `YYYY-MM-DD`
    pub start_date: Option<NaiveDate>,
    /// Inclusive, `YYYY-MM-DD`
    pub end_date: Option<NaiveDate>,
}

/// Order header together with its items
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}
