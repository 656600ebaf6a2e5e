use super::{clean, double_option};
use crate::entities::{DiningTable, TableStatus};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

const DEFAULT_CAPACITY: i32 = 4;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewTable {
    #[validate(range(min = 1))]
    pub number: i32,
    #[validate(range(min = 1, max = 100))]
    pub capacity: Option<i32>,
    pub status: Option<TableStatus>,
    pub location: Option<String>,
}

impl NewTable {
    pub fn into_record(self, now: DateTime<Utc>) -> DiningTable {
        DiningTable {
            id: 0,
            number: self.number,
            capacity: self.capacity.unwrap_or(DEFAULT_CAPACITY),
            status: self.status.unwrap_or(TableStatus::Free),
            location: clean(self.location),
            created_at: now,
        }
    }
}

/// Status changes go through the dedicated status endpoint
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateTable {
    #[validate(range(min = 1))]
    pub number: Option<i32>,
    #[validate(range(min = 1, max = 100))]
    pub capacity: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub location: Option<Option<String>>,
}

impl UpdateTable {
    pub fn apply(self, table: &mut DiningTable) {
        if let Some(number) = self.number {
            table.number = number;
        }
        if let Some(capacity) = self.capacity {
            table.capacity = capacity;
        }
        if let Some(location) = self.location {
            table.location = clean(location);
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct TableStatusUpdate {
    pub status: TableStatus,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TableQuery {
    pub status: Option<TableStatus>,
}
