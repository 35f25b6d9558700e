//! [`DashboardStats`] definitions.

use common::Money;
use derive_more::From;
use juniper::graphql_object;
use service::read;

use crate::{AsError, Context, Error};

/// Aggregated figures of the showroom.
#[derive(Clone, Copy, Debug, From)]
pub struct DashboardStats(read::dashboard::Stats);

impl DashboardStats {
    /// Converts the provided count into a GraphQL integer.
    fn count(count: u64, ctx: &Context) -> Result<i32, Error> {
        i32::try_from(count)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }
}

/// Aggregated figures of the showroom.
///
/// Daily and monthly figures are counted in UTC.
#[graphql_object(context = Context)]
impl DashboardStats {
    /// Number of all the `Vehicle`s.
    pub fn total_vehicles(&self, ctx: &Context) -> Result<i32, Error> {
        Self::count(self.0.total_vehicles, ctx)
    }

    /// Number of `Vehicle`s ready to be sold.
    pub fn vehicles_for_sale(&self, ctx: &Context) -> Result<i32, Error> {
        Self::count(self.0.vehicles_for_sale, ctx)
    }

    /// Number of `Vehicle`s being repaired.
    pub fn vehicles_in_repair(&self, ctx: &Context) -> Result<i32, Error> {
        Self::count(self.0.vehicles_in_repair, ctx)
    }

    /// Number of sold `Vehicle`s.
    pub fn vehicles_sold(&self, ctx: &Context) -> Result<i32, Error> {
        Self::count(self.0.vehicles_sold, ctx)
    }

    /// Number of active `Customer`s.
    pub fn total_customers(&self, ctx: &Context) -> Result<i32, Error> {
        Self::count(self.0.total_customers, ctx)
    }

    /// Number of `Purchase`s made today.
    pub fn today_purchases(&self, ctx: &Context) -> Result<i32, Error> {
        Self::count(self.0.today_purchases, ctx)
    }

    /// Number of `Sale`s made today.
    pub fn today_sales(&self, ctx: &Context) -> Result<i32, Error> {
        Self::count(self.0.today_sales, ctx)
    }

    /// Sum of the `Sale` totals made today.
    pub fn today_revenue(&self) -> Money {
        self.0.today_revenue
    }

    /// Sum of the `Sale` totals made this month.
    pub fn monthly_revenue(&self) -> Money {
        self.0.monthly_revenue
    }

    /// All the `Sale` totals minus all the `Purchase` totals.
    pub fn total_profit(&self) -> Money {
        self.0.total_profit
    }
}
