use super::{clean, double_option};
use crate::entities::Client;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewClient {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl NewClient {
    pub fn into_record(self, now: DateTime<Utc>) -> Client {
        Client {
            id: 0,
            name: self.name.trim().to_string(),
            phone: clean(self.phone),
            email: clean(self.email),
            address: clean(self.address),
            notes: clean(self.notes),
            order_count: 0,
            last_order_at: None,
            created_at: now,
        }
    }
}

/// Order counters are maintained by order creation and cannot be patched
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateClient {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
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

impl UpdateClient {
    pub fn apply(self, client: &mut Client) {
        if let Some(name) = self.name {
            client.name = name.trim().to_string();
        }
        if let Some(phone) = self.phone {
            client.phone = clean(phone);
        }
        if let Some(email) = self.email {
            client.email = clean(email);
        }
        if let Some(address) = self.address {
            client.address = clean(address);
        }
        if let Some(notes) = self.notes {
            client.notes = clean(notes);
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClientQuery {
    /// Matches the name (case-insensitive) or the phone number
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_email_is_rejected() {
        let payload: NewClient =
            serde_json::from_str(r#"{"name": "Ana", "email": "ana-at-home"}"#).unwrap();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn new_client_starts_without_orders() {
        let client = NewClient {
            name: "Ana".into(),
            phone: Some("11 99999-0000".into()),
            email: None,
            address: None,
            notes: Some("".into()),
        }
        .into_record(Utc::now());
        assert_eq!(client.order_count, 0);
        assert!(client.last_order_at.is_none());
        assert!(client.notes.is_none());
    }
}
