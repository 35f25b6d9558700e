//! Dashboard read definitions.

use common::Money;

/// Aggregated figures of the dealership at some moment.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    /// Number of all the vehicles.
    pub total_vehicles: u64,

    /// Number of vehicles ready to be sold.
    pub vehicles_for_sale: u64,

    /// Number of vehicles being repaired.
    pub vehicles_in_repair: u64,

    /// Number of sold vehicles.
    pub vehicles_sold: u64,

    /// Number of active customers.
    pub total_customers: u64,

    /// Number of purchases since the start of the day.
    pub today_purchases: u64,

    /// Number of sales since the start of the day.
    pub today_sales: u64,

    /// Sum of the sale totals since the start of the day.
    pub today_revenue: Money,

    /// Sum of the sale totals since the start of the month.
    pub monthly_revenue: Money,

    /// Sum of all the sale totals minus sum of all the purchase totals.
    pub total_profit: Money,
}
