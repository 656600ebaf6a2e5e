//! Request payloads and query strings accepted by the HTTP layer.
//!
//! `New*` payloads build a fresh record, `Update*` payloads are partial:
//! an absent field leaves the stored value untouched, and for nullable
//! fields an explicit `null` clears it.

pub mod catalog;
pub mod clients;
pub mod orders;
pub mod reports;
pub mod stock;
pub mod suppliers;
pub mod tables;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use validator::ValidationError;

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
pub(crate) fn double_option<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Largest amount a `decimal(12, 2)` money column holds
pub const MAX_MONEY: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Largest balance a `decimal(14, 3)` quantity column holds
pub const MAX_QUANTITY: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 3);

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Money field: zero or greater, within the column precision
pub(crate) fn money_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(invalid("non_negative", "must be zero or greater"));
    }
    if *value > MAX_MONEY {
        return Err(invalid("max_money", "must not exceed 9999999999.99"));
    }
    Ok(())
}

/// Stock balance or threshold: zero or greater, within the column precision
pub(crate) fn stock_quantity(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(invalid("non_negative", "must be zero or greater"));
    }
    if *value > MAX_QUANTITY {
        return Err(invalid("max_quantity", "must not exceed 99999999999.999"));
    }
    Ok(())
}

/// Signed stock change: non-zero, bounded like a balance
pub(crate) fn stock_delta(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_zero() {
        return Err(invalid("non_zero", "must not be zero"));
    }
    if value.abs() > MAX_QUANTITY {
        return Err(invalid("max_quantity", "must be within 99999999999.999 either way"));
    }
    Ok(())
}

/// Trims and drops blank strings so optional text never stores `""`
pub(crate) fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
