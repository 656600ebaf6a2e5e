use super::{clean, double_option};
use crate::entities::Supplier;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewSupplier {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    /// CNPJ/CPF, stored as typed
    #[validate(length(max = 32))]
    pub document: Option<String>,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl NewSupplier {
    pub fn into_record(self, now: DateTime<Utc>) -> Supplier {
        Supplier {
            id: 0,
            name: self.name.trim().to_string(),
            document: clean(self.document),
            contact_name: clean(self.contact_name),
            phone: clean(self.phone),
            email: clean(self.email),
            address: clean(self.address),
            notes: clean(self.notes),
            created_at: now,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateSupplier {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub document: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub contact_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(email)]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

impl UpdateSupplier {
    pub fn apply(self, supplier: &mut Supplier) {
        if let Some(name) = self.name {
            supplier.name = name.trim().to_string();
        }
        if let Some(v) = self.document {
            supplier.document = clean(v);
        }
        if let Some(v) = self.contact_name {
            supplier.contact_name = clean(v);
        }
        if let Some(v) = self.phone {
            supplier.phone = clean(v);
        }
        if let Some(v) = self.email {
            supplier.email = clean(v);
        }
        if let Some(v) = self.address {
            supplier.address = clean(v);
        }
        if let Some(v) = self.notes {
            supplier.notes = clean(v);
        }
    }
}
