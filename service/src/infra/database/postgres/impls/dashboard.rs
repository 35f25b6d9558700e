//! [`read::dashboard`]-related [`Database`] implementations.

use common::{
    operations::{By, Select},
    DateTime,
};
use tracerr::Traced;

use crate::{
    domain::vehicle,
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C> Database<Select<By<read::dashboard::Stats, DateTime>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::dashboard::Stats;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::dashboard::Stats, DateTime>>,
    ) -> Result<Self::Ok, Self::Err> {
        let now = by.into_inner();
        let (day, month) = (now.start_of_day(), now.start_of_month());

        const SQL: &str = "\
            SELECT \
                (SELECT COUNT(*) FROM vehicles) AS total_vehicles, \
                (SELECT COUNT(*) FROM vehicles \
                 WHERE status = $1::INT2) AS vehicles_for_sale, \
                (SELECT COUNT(*) FROM vehicles \
                 WHERE status = $2::INT2) AS vehicles_in_repair, \
                (SELECT COUNT(*) FROM vehicles \
                 WHERE status = $3::INT2) AS vehicles_sold, \
                (SELECT COUNT(*) FROM customers \
                 WHERE is_active) AS total_customers, \
                (SELECT COUNT(*) FROM purchase_transactions \
                 WHERE transacted_at >= $4::TIMESTAMPTZ) AS today_purchases, \
                (SELECT COUNT(*) FROM sales_transactions \
                 WHERE transacted_at >= $4::TIMESTAMPTZ) AS today_sales, \
                (SELECT COALESCE(SUM(total_amount), 0) \
                 FROM sales_transactions \
                 WHERE transacted_at >= $4::TIMESTAMPTZ) AS today_revenue, \
                (SELECT COALESCE(SUM(total_amount), 0) \
                 FROM sales_transactions \
                 WHERE transacted_at >= $5::TIMESTAMPTZ) AS monthly_revenue, \
                (SELECT COALESCE(SUM(total_amount), 0) \
                 FROM sales_transactions) \
                - (SELECT COALESCE(SUM(total_amount), 0) \
                   FROM purchase_transactions) AS total_profit";
        let row = self
            .query_opt(
                SQL,
                &[
                    &vehicle::Status::ReadyToSell,
                    &vehicle::Status::InRepair,
                    &vehicle::Status::Sold,
                    &day,
                    &month,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .expect("always exists");

        let count = |col: &str| {
            u64::try_from(row.get::<_, i64>(col))
                .unwrap_or_else(|_| panic!("`{col}` overflow"))
        };
        Ok(read::dashboard::Stats {
            total_vehicles: count("total_vehicles"),
            vehicles_for_sale: count("vehicles_for_sale"),
            vehicles_in_repair: count("vehicles_in_repair"),
            vehicles_sold: count("vehicles_sold"),
            total_customers: count("total_customers"),
            today_purchases: count("today_purchases"),
            today_sales: count("today_sales"),
            today_revenue: row.get("today_revenue"),
            monthly_revenue: row.get("monthly_revenue"),
            total_profit: row.get("total_profit"),
        })
    }
}
