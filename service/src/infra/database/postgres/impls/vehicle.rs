//! [`Vehicle`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{vehicle, Vehicle},
    infra::{
        database::{
            self,
            postgres::{Connection, FuzzPattern},
            Postgres,
        },
        Database,
    },
    read,
};

use super::select_page;

/// Columns of the `vehicles` table.
macro_rules! columns {
    () => {
        "id, code, chassis_number, license_plate, \
         brand, model, variant, year, color, mileage, \
         fuel_type, transmission, \
         purchase_price, total_repair_cost, \
         suggested_selling_price, approved_selling_price, \
         final_selling_price, \
         status, \
         purchased_from_customer_id, sold_to_customer_id, \
         purchased_by, sold_by, price_approved_by, \
         purchased_at, sold_at, \
         purchase_notes, condition_notes, \
         created_at, updated_at"
    };
}

/// Reads a [`Vehicle`] out of the provided [`Row`] selected with
/// [`columns!`].
fn from_row(row: &Row) -> Vehicle {
    let year = u16::try_from(row.get::<_, i32>("year"))
        .expect("`year` overflow");
    Vehicle {
        id: row.get("id"),
        code: row.get("code"),
        chassis_number: row.get("chassis_number"),
        license_plate: row.get("license_plate"),
        brand: row.get("brand"),
        model: row.get("model"),
        variant: row.get("variant"),
        // OK, because of the `CHECK` constraint on the column.
        year: vehicle::Year::new(year).expect("`year` out of range"),
        color: row.get("color"),
        mileage: row
            .get::<_, Option<i64>>("mileage")
            .map(u32::try_from)
            .transpose()
            .expect("`mileage` overflow"),
        fuel_type: row.get("fuel_type"),
        transmission: row.get("transmission"),
        purchase_price: row.get("purchase_price"),
        total_repair_cost: row.get("total_repair_cost"),
        suggested_selling_price: row.get("suggested_selling_price"),
        approved_selling_price: row.get("approved_selling_price"),
        final_selling_price: row.get("final_selling_price"),
        status: row.get("status"),
        purchased_from: row.get("purchased_from_customer_id"),
        sold_to: row.get("sold_to_customer_id"),
        purchased_by: row.get("purchased_by"),
        sold_by: row.get("sold_by"),
        price_approved_by: row.get("price_approved_by"),
        purchased_at: row.get("purchased_at"),
        sold_at: row.get("sold_at"),
        purchase_notes: row.get("purchase_notes"),
        condition_notes: row.get("condition_notes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl<C> Database<Select<By<Option<Vehicle>, vehicle::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Vehicle>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Vehicle>, vehicle::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: vehicle::Id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            columns!(),
            " FROM vehicles \
              WHERE id = $1::UUID \
              LIMIT 1",
        );
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C> Database<Select<By<Option<Vehicle>, vehicle::ChassisNumber>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Vehicle>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Vehicle>, vehicle::ChassisNumber>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let chassis_number: vehicle::ChassisNumber = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            columns!(),
            " FROM vehicles \
              WHERE chassis_number = $1::VARCHAR \
              LIMIT 1",
        );
        self.query_opt(SQL, &[&chassis_number])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C> Database<Insert<Vehicle>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Vehicle>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(vehicle): Insert<Vehicle>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(vehicle)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Vehicle>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(vehicle): Update<Vehicle>,
    ) -> Result<Self::Ok, Self::Err> {
        let Vehicle {
            id,
            code,
            chassis_number,
            license_plate,
            brand,
            model,
            variant,
            year,
            color,
            mileage,
            fuel_type,
            transmission,
            purchase_price,
            total_repair_cost,
            suggested_selling_price,
            approved_selling_price,
            final_selling_price,
            status,
            purchased_from,
            sold_to,
            purchased_by,
            sold_by,
            price_approved_by,
            purchased_at,
            sold_at,
            purchase_notes,
            condition_notes,
            created_at,
            updated_at,
        } = vehicle;

        let year = i32::from(u16::from(year));
        let mileage = mileage.map(i64::from);

        const SQL: &str = concat!(
            "INSERT INTO vehicles (",
            columns!(),
            ") VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, \
                $5::VARCHAR, $6::VARCHAR, $7::VARCHAR, $8::INT4, \
                $9::VARCHAR, $10::INT8, \
                $11::INT2, $12::INT2, \
                $13::NUMERIC, $14::NUMERIC, \
                $15::NUMERIC, $16::NUMERIC, \
                $17::NUMERIC, \
                $18::INT2, \
                $19::UUID, $20::UUID, \
                $21::UUID, $22::UUID, $23::UUID, \
                $24::TIMESTAMPTZ, $25::TIMESTAMPTZ, \
                $26::TEXT, $27::TEXT, \
                $28::TIMESTAMPTZ, $29::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET license_plate = EXCLUDED.license_plate, \
                brand = EXCLUDED.brand, \
                model = EXCLUDED.model, \
                variant = EXCLUDED.variant, \
                year = EXCLUDED.year, \
                color = EXCLUDED.color, \
                mileage = EXCLUDED.mileage, \
                fuel_type = EXCLUDED.fuel_type, \
                transmission = EXCLUDED.transmission, \
                purchase_price = EXCLUDED.purchase_price, \
                total_repair_cost = EXCLUDED.total_repair_cost, \
                suggested_selling_price = EXCLUDED.suggested_selling_price, \
                approved_selling_price = EXCLUDED.approved_selling_price, \
                final_selling_price = EXCLUDED.final_selling_price, \
                status = EXCLUDED.status, \
                purchased_from_customer_id = \
                    EXCLUDED.purchased_from_customer_id, \
                sold_to_customer_id = EXCLUDED.sold_to_customer_id, \
                purchased_by = EXCLUDED.purchased_by, \
                sold_by = EXCLUDED.sold_by, \
                price_approved_by = EXCLUDED.price_approved_by, \
                purchased_at = EXCLUDED.purchased_at, \
                sold_at = EXCLUDED.sold_at, \
                purchase_notes = EXCLUDED.purchase_notes, \
                condition_notes = EXCLUDED.condition_notes, \
                updated_at = EXCLUDED.updated_at",
        );
        self.exec(
            SQL,
            &[
                &id,
                &code,
                &chassis_number,
                &license_plate,
                &brand,
                &model,
                &variant,
                &year,
                &color,
                &mileage,
                &fuel_type,
                &transmission,
                &purchase_price,
                &total_repair_cost,
                &suggested_selling_price,
                &approved_selling_price,
                &final_selling_price,
                &status,
                &purchased_from,
                &sold_to,
                &purchased_by,
                &sold_by,
                &price_approved_by,
                &purchased_at,
                &sold_at,
                &purchase_notes,
                &condition_notes,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Vehicle, vehicle::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Vehicle, vehicle::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: vehicle::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM vehicles \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Vehicle, vehicle::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Vehicle, vehicle::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: vehicle::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM vehicles \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Vehicle, vehicle::ChassisNumber>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Vehicle, vehicle::ChassisNumber>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let chassis_number: vehicle::ChassisNumber = by.into_inner();

        // No row may exist yet, so the chassis number itself is locked.
        const SQL: &str = "\
            SELECT pg_advisory_xact_lock(\
                hashtextextended($1::VARCHAR, 0)\
            )";
        self.query(SQL, &[&chassis_number])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<read::vehicle::HasHistory, vehicle::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::vehicle::HasHistory;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::vehicle::HasHistory, vehicle::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: vehicle::Id = by.into_inner();

        const SQL: &str = "\
            SELECT EXISTS (SELECT 1 FROM repairs \
                           WHERE vehicle_id = $1::UUID) \
                OR EXISTS (SELECT 1 FROM purchase_transactions \
                           WHERE vehicle_id = $1::UUID) \
                OR EXISTS (SELECT 1 FROM sales_transactions \
                           WHERE vehicle_id = $1::UUID)";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| {
                read::vehicle::HasHistory(
                    row.expect("always exists").get::<_, bool>(0),
                )
            })
    }
}

impl<C>
    Database<
        Select<By<read::vehicle::list::Page, read::vehicle::list::Selector>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::vehicle::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::vehicle::list::Page, read::vehicle::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::vehicle::list::Selector {
            arguments,
            filter: read::vehicle::list::Filter { search, status },
        } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];

        let status_idx = status.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });
        let pattern = search.as_ref().map(|s| FuzzPattern::new(s.as_ref()));
        let pattern_idx = pattern.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });

        let source = format!(
            "FROM vehicles \
             WHERE true \
                   {status} \
                   {search}",
            status = status_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND status = ${idx}::INT2"))
            }),
            search = pattern_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(
                    "AND (code ILIKE ${idx}::VARCHAR \
                          OR chassis_number ILIKE ${idx}::VARCHAR \
                          OR license_plate ILIKE ${idx}::VARCHAR \
                          OR brand ILIKE ${idx}::VARCHAR \
                          OR model ILIKE ${idx}::VARCHAR)"
                ))
            }),
        );
        select_page(
            self,
            columns!(),
            &source,
            "created_at DESC, code DESC",
            &ps,
            arguments,
            from_row,
        )
        .await
        .map_err(tracerr::wrap!())
    }
}
