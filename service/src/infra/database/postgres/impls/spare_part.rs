//! [`SparePart`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{spare_part, SparePart},
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

/// Columns of the `spare_parts` table.
macro_rules! columns {
    () => {
        "id, code, name, description, brand, \
         cost_price, selling_price, \
         stock_quantity, min_stock_level, unit_measure, \
         created_at, updated_at, is_active"
    };
}

/// Reads a [`SparePart`] out of the provided [`Row`].
fn from_row(row: &Row) -> SparePart {
    SparePart {
        id: row.get("id"),
        code: row.get("code"),
        name: row.get("name"),
        description: row.get("description"),
        brand: row.get("brand"),
        cost_price: row.get("cost_price"),
        selling_price: row.get("selling_price"),
        stock_quantity: u32::try_from(row.get::<_, i64>("stock_quantity"))
            .expect("`stock_quantity` overflow"),
        min_stock_level: u32::try_from(row.get::<_, i64>("min_stock_level"))
            .expect("`min_stock_level` overflow"),
        unit_measure: row.get("unit_measure"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        is_active: row.get("is_active"),
    }
}

impl<C> Database<Select<By<Option<SparePart>, spare_part::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<SparePart>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<SparePart>, spare_part::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: spare_part::Id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            columns!(),
            " FROM spare_parts \
              WHERE id = $1::UUID \
              LIMIT 1",
        );
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C> Database<Insert<SparePart>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<SparePart>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(part): Insert<SparePart>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(part)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<SparePart>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(part): Update<SparePart>,
    ) -> Result<Self::Ok, Self::Err> {
        let SparePart {
            id,
            code,
            name,
            description,
            brand,
            cost_price,
            selling_price,
            stock_quantity,
            min_stock_level,
            unit_measure,
            created_at,
            updated_at,
            is_active,
        } = part;

        let stock_quantity = i64::from(stock_quantity);
        let min_stock_level = i64::from(min_stock_level);

        const SQL: &str = concat!(
            "INSERT INTO spare_parts (",
            columns!(),
            ") VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::TEXT, $5::VARCHAR, \
                $6::NUMERIC, $7::NUMERIC, \
                $8::INT8, $9::INT8, $10::VARCHAR, \
                $11::TIMESTAMPTZ, $12::TIMESTAMPTZ, $13::BOOLEAN \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                description = EXCLUDED.description, \
                brand = EXCLUDED.brand, \
                cost_price = EXCLUDED.cost_price, \
                selling_price = EXCLUDED.selling_price, \
                stock_quantity = EXCLUDED.stock_quantity, \
                min_stock_level = EXCLUDED.min_stock_level, \
                unit_measure = EXCLUDED.unit_measure, \
                updated_at = EXCLUDED.updated_at, \
                is_active = EXCLUDED.is_active",
        );
        self.exec(
            SQL,
            &[
                &id,
                &code,
                &name,
                &description,
                &brand,
                &cost_price,
                &selling_price,
                &stock_quantity,
                &min_stock_level,
                &unit_measure,
                &created_at,
                &updated_at,
                &is_active,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<SparePart, spare_part::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<SparePart, spare_part::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: spare_part::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM spare_parts \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Vec<SparePart>, read::spare_part::LowStock>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<SparePart>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<SparePart>, read::spare_part::LowStock>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = concat!(
            "SELECT ",
            columns!(),
            " FROM spare_parts \
              WHERE is_active \
                AND stock_quantity <= min_stock_level \
              ORDER BY code",
        );
        Ok(self
            .query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C>
    Database<
        Select<
            By<read::spare_part::list::Page, read::spare_part::list::Selector>,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::spare_part::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::spare_part::list::Page, read::spare_part::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::spare_part::list::Selector {
            arguments,
            filter:
                read::spare_part::list::Filter {
                    search,
                    low_stock_only,
                    include_inactive,
                },
        } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];

        let pattern = search.as_ref().map(|s| FuzzPattern::new(s.as_ref()));
        let pattern_idx = pattern.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });

        let source = format!(
            "FROM spare_parts \
             WHERE true \
                   {active} \
                   {low_stock} \
                   {search}",
            active = if include_inactive { "" } else { "AND is_active" },
            low_stock = if low_stock_only {
                "AND stock_quantity <= min_stock_level"
            } else {
                ""
            },
            search = pattern_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(
                    "AND (code ILIKE ${idx}::VARCHAR \
                          OR name ILIKE ${idx}::VARCHAR \
                          OR brand ILIKE ${idx}::VARCHAR)"
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
