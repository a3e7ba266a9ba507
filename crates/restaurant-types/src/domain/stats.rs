use serde::{Deserialize, Serialize};

use super::order::OrderRecord;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderStats {
    pub total_orders: u64,
    pub confirmed_orders: u64,
    pub delivered_orders: u64,
    pub revenue: f64,
}

/// Sum of every item subtotal across `orders`.
pub fn revenue_of<'a, I>(orders: I) -> f64
where
    I: IntoIterator<Item = &'a OrderRecord>,
{
    orders.into_iter().map(OrderRecord::total).sum()
}
