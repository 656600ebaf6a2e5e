use super::{clean, double_option, money_amount};
use crate::entities::{Group, MenuItem};
use crate::storage::MenuItemFilter;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewGroup {
    #[validate(length(min = 1, max = 80))]
    pub name: String,
    pub description: Option<String>,
    pub active: Option<bool>,
}

impl NewGroup {
    pub fn into_record(self, now: DateTime<Utc>) -> Group {
        Group {
            id: 0,
            name: self.name.trim().to_string(),
            description: clean(self.description),
            active: self.active.unwrap_or(true),
            created_at: now,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateGroup {
    #[validate(length(min = 1, max = 80))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub active: Option<bool>,
}

impl UpdateGroup {
    pub fn apply(self, group: &mut Group) {
        if let Some(name) = self.name {
            group.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            group.description = clean(description);
        }
        if let Some(active) = self.active {
            group.active = active;
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewMenuItem {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom = "money_amount")]
    #[schema(value_type = String, example = "24.90")]
    pub price: Decimal,
    #[validate(custom = "money_amount")]
    #[schema(value_type = Option<String>)]
    pub cost: Option<Decimal>,
    pub group_id: Option<i32>,
    #[validate(length(min = 1, max = 64))]
    pub barcode: Option<String>,
    pub available: Option<bool>,
}

impl NewMenuItem {
    pub fn into_record(self, now: DateTime<Utc>) -> MenuItem {
        MenuItem {
            id: 0,
            name: self.name.trim().to_string(),
            description: clean(self.description),
            price: self.price,
            cost: self.cost,
            group_id: self.group_id,
            barcode: clean(self.barcode),
            available: self.available.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateMenuItem {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[validate(custom = "money_amount")]
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub cost: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub group_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub barcode: Option<Option<String>>,
    pub available: Option<bool>,
}

impl UpdateMenuItem {
    /// Group id the update points to, if it sets one
    pub fn new_group_id(&self) -> Option<i32> {
        self.group_id.flatten()
    }

    /// Bounds a new cost, which the derive cannot reach through the double option
    pub fn check_cost(&self) -> Result<(), validator::ValidationError> {
        match self.cost {
            Some(Some(cost)) => money_amount(&cost),
            _ => Ok(()),
        }
    }

    pub fn apply(self, item: &mut MenuItem, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            item.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            item.description = clean(description);
        }
        if let Some(price) = self.price {
            item.price = price;
        }
        if let Some(cost) = self.cost {
            item.cost = cost;
        }
        if let Some(group_id) = self.group_id {
            item.group_id = group_id;
        }
        if let Some(barcode) = self.barcode {
            item.barcode = clean(barcode);
        }
        if let Some(available) = self.available {
            item.available = available;
        }
        item.updated_at = now;
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MenuItemQuery {
    pub group_id: Option<i32>,
    pub available: Option<bool>,
    /// Case-insensitive match on the name
    pub search: Option<String>,
}

impl From<MenuItemQuery> for MenuItemFilter {
    fn from(q: MenuItemQuery) -> Self {
        MenuItemFilter {
            group_id: q.group_id,
            available: q.available,
            search: clean(q.search),
        }
    }
}
