//! [`Repair`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{repair, spare_part, Repair},
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

/// Columns of the `repairs` table.
macro_rules! columns {
    () => {
        "id, number, vehicle_id, title, description, \
         labor_cost, total_parts_cost, total_cost, \
         status, mechanic_id, work_notes, \
         started_at, completed_at, created_at"
    };
}

/// Columns of the `repair_parts` table.
macro_rules! part_columns {
    () => {
        "id, repair_id, spare_part_id, quantity, unit_cost, total_cost, \
         notes, used_at"
    };
}

/// Reads a [`Repair`] out of the provided [`Row`].
fn from_row(row: &Row) -> Repair {
    Repair {
        id: row.get("id"),
        number: row.get("number"),
        vehicle_id: row.get("vehicle_id"),
        title: row.get("title"),
        description: row.get("description"),
        labor_cost: row.get("labor_cost"),
        total_parts_cost: row.get("total_parts_cost"),
        total_cost: row.get("total_cost"),
        status: row.get("status"),
        mechanic_id: row.get("mechanic_id"),
        work_notes: row.get("work_notes"),
        started_at: row.get("started_at"),
        completed_at: row.get("completed_at"),
        created_at: row.get("created_at"),
    }
}

/// Reads a [`repair::Part`] out of the provided [`Row`].
fn part_from_row(row: &Row) -> repair::Part {
    let quantity = u32::try_from(row.get::<_, i64>("quantity"))
        .expect("`quantity` overflow");
    repair::Part {
        id: row.get("id"),
        repair_id: row.get("repair_id"),
        spare_part_id: row.get("spare_part_id"),
        // OK, because of the `CHECK` constraint on the column.
        quantity: spare_part::Quantity::new(quantity)
            .expect("`quantity` is positive"),
        unit_cost: row.get("unit_cost"),
        total_cost: row.get("total_cost"),
        notes: row.get("notes"),
        used_at: row.get("used_at"),
    }
}

impl<C> Database<Select<By<Option<Repair>, repair::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Repair>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Repair>, repair::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: repair::Id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            columns!(),
            " FROM repairs \
              WHERE id = $1::UUID \
              LIMIT 1",
        );
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C> Database<Insert<Repair>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Repair>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(repair): Insert<Repair>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(repair)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Repair>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(repair): Update<Repair>,
    ) -> Result<Self::Ok, Self::Err> {
        let Repair {
            id,
            number,
            vehicle_id,
            title,
            description,
            labor_cost,
            total_parts_cost,
            total_cost,
            status,
            mechanic_id,
            work_notes,
            started_at,
            completed_at,
            created_at,
        } = repair;

        const SQL: &str = concat!(
            "INSERT INTO repairs (",
            columns!(),
            ") VALUES (\
                $1::UUID, $2::VARCHAR, $3::UUID, $4::VARCHAR, $5::TEXT, \
                $6::NUMERIC, $7::NUMERIC, $8::NUMERIC, \
                $9::INT2, $10::UUID, $11::TEXT, \
                $12::TIMESTAMPTZ, $13::TIMESTAMPTZ, $14::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET title = EXCLUDED.title, \
                description = EXCLUDED.description, \
                labor_cost = EXCLUDED.labor_cost, \
                total_parts_cost = EXCLUDED.total_parts_cost, \
                total_cost = EXCLUDED.total_cost, \
                status = EXCLUDED.status, \
                mechanic_id = EXCLUDED.mechanic_id, \
                work_notes = EXCLUDED.work_notes, \
                started_at = EXCLUDED.started_at, \
                completed_at = EXCLUDED.completed_at",
        );
        self.exec(
            SQL,
            &[
                &id,
                &number,
                &vehicle_id,
                &title,
                &description,
                &labor_cost,
                &total_parts_cost,
                &total_cost,
                &status,
                &mechanic_id,
                &work_notes,
                &started_at,
                &completed_at,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Repair, repair::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Repair, repair::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: repair::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM repairs \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C>
    Database<
        Select<By<read::repair::list::Page, read::repair::list::Selector>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::repair::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::repair::list::Page, read::repair::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::repair::list::Selector {
            arguments,
            filter:
                read::repair::list::Filter {
                    search,
                    status,
                    vehicle_id,
                },
        } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];

        let status_idx = status.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });
        let vehicle_idx = vehicle_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });
        let pattern = search.as_ref().map(|s| FuzzPattern::new(s.as_ref()));
        let pattern_idx = pattern.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });

        let source = format!(
            "FROM repairs \
             WHERE true \
                   {status} \
                   {vehicle} \
                   {search}",
            status = status_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND status = ${idx}::INT2"))
            }),
            vehicle = vehicle_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND vehicle_id = ${idx}::UUID"))
            }),
            search = pattern_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(
                    "AND (number ILIKE ${idx}::VARCHAR \
                          OR title ILIKE ${idx}::VARCHAR)"
                ))
            }),
        );
        select_page(
            self,
            columns!(),
            &source,
            "created_at DESC, number DESC",
            &ps,
            arguments,
            from_row,
        )
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Option<repair::Part>, repair::part::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<repair::Part>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<repair::Part>, repair::part::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: repair::part::Id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            part_columns!(),
            " FROM repair_parts \
              WHERE id = $1::UUID \
              LIMIT 1",
        );
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(part_from_row))
    }
}

impl<C> Database<Select<By<Vec<repair::Part>, repair::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<repair::Part>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<repair::Part>, repair::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let repair_id: repair::Id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            part_columns!(),
            " FROM repair_parts \
              WHERE repair_id = $1::UUID \
              ORDER BY used_at, id",
        );
        Ok(self
            .query(SQL, &[&repair_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(part_from_row)
            .collect())
    }
}

impl<C> Database<Insert<repair::Part>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(part): Insert<repair::Part>,
    ) -> Result<Self::Ok, Self::Err> {
        let repair::Part {
            id,
            repair_id,
            spare_part_id,
            quantity,
            unit_cost,
            total_cost,
            notes,
            used_at,
        } = part;

        let quantity = i64::from(quantity.get());

        const SQL: &str = concat!(
            "INSERT INTO repair_parts (",
            part_columns!(),
            ") VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::INT8, \
                $5::NUMERIC, $6::NUMERIC, $7::VARCHAR, $8::TIMESTAMPTZ \
            )",
        );
        self.exec(
            SQL,
            &[
                &id,
                &repair_id,
                &spare_part_id,
                &quantity,
                &unit_cost,
                &total_cost,
                &notes,
                &used_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<repair::Part, repair::part::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<repair::Part, repair::part::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: repair::part::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM repair_parts \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
