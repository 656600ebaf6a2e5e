//! sea-orm entities. The `Model` of each module doubles as the record type
//! returned by every [`crate::storage::Storage`] implementation.

pub mod client;
pub mod dining_table;
pub mod group;
pub mod menu_item;
pub mod order;
pub mod order_item;
pub mod stock_item;
pub mod stock_movement;
pub mod supplier;

use crate::errors::{ServiceError, ServiceResult};
use rust_decimal::Decimal;

pub use dining_table::TableStatus;
pub use order::{OrderKind, OrderStatus, PaymentMethod};
pub use stock_movement::MovementKind;

pub type Client = client::Model;
pub type DiningTable = dining_table::Model;
pub type Group = group::Model;
pub type MenuItem = menu_item::Model;
pub type Order = order::Model;
pub type OrderItem = order_item::Model;
pub type StockItem = stock_item::Model;
pub type StockMovement = stock_movement::Model;
pub type Supplier = supplier::Model;

/// Sum of money or quantities; `what` names the figure in the overflow error
pub fn checked_sum<I>(values: I, what: &str) -> ServiceResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(value))
        .ok_or_else(|| ServiceError::out_of_range(what))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    #[test]
    fn checked_sum_reports_overflow() {
        assert_eq!(checked_sum([dec!(1.5), dec!(2.25)], "x").unwrap(), dec!(3.75));
        assert_matches!(
            checked_sum([Decimal::MAX, dec!(1)], "revenue"),
            Err(ServiceError::ValidationError(msg)) if msg.contains("revenue")
        );
    }
}
