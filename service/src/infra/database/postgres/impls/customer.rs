//! [`Customer`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{customer, Customer},
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

/// Columns of the `customers` table.
macro_rules! columns {
    () => {
        "id, code, name, phone, email, address, id_card_number, kind, \
         created_at, updated_at, is_active"
    };
}

/// Reads a [`Customer`] out of the provided [`Row`].
fn from_row(row: &Row) -> Customer {
    Customer {
        id: row.get("id"),
        code: row.get("code"),
        name: row.get("name"),
        phone: row.get("phone"),
        email: row.get("email"),
        address: row.get("address"),
        id_card_number: row.get("id_card_number"),
        kind: row.get("kind"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        is_active: row.get("is_active"),
    }
}

impl<C> Database<Select<By<Option<Customer>, customer::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Customer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Customer>, customer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: customer::Id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            columns!(),
            " FROM customers \
              WHERE id = $1::UUID \
              LIMIT 1",
        );
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C> Database<Insert<Customer>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Customer>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(customer): Insert<Customer>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(customer)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Customer>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(customer): Update<Customer>,
    ) -> Result<Self::Ok, Self::Err> {
        let Customer {
            id,
            code,
            name,
            phone,
            email,
            address,
            id_card_number,
            kind,
            created_at,
            updated_at,
            is_active,
        } = customer;

        const SQL: &str = concat!(
            "INSERT INTO customers (",
            columns!(),
            ") VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, \
                $4::VARCHAR, $5::VARCHAR, $6::VARCHAR, $7::VARCHAR, \
                $8::INT2, \
                $9::TIMESTAMPTZ, $10::TIMESTAMPTZ, \
                $11::BOOLEAN \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                phone = EXCLUDED.phone, \
                email = EXCLUDED.email, \
                address = EXCLUDED.address, \
                id_card_number = EXCLUDED.id_card_number, \
                kind = EXCLUDED.kind, \
                updated_at = EXCLUDED.updated_at, \
                is_active = EXCLUDED.is_active",
        );
        self.exec(
            SQL,
            &[
                &id,
                &code,
                &name,
                &phone,
                &email,
                &address,
                &id_card_number,
                &kind,
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

impl<C> Database<Lock<By<Customer, customer::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Customer, customer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: customer::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM customers \
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
        Select<By<read::customer::list::Page, read::customer::list::Selector>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::customer::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::customer::list::Page, read::customer::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::customer::list::Selector {
            arguments,
            filter: read::customer::list::Filter { search, kind },
        } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];

        let kind_idx = kind.as_ref().map(|k| {
            ps.push(k);
            ps.len()
        });
        let pattern = search.as_ref().map(|s| FuzzPattern::new(s.as_ref()));
        let pattern_idx = pattern.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });

        let source = format!(
            "FROM customers \
             WHERE is_active \
                   {kind} \
                   {search}",
            kind = kind_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND kind = ${idx}::INT2"))
            }),
            search = pattern_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(
                    "AND (code ILIKE ${idx}::VARCHAR \
                          OR name ILIKE ${idx}::VARCHAR \
                          OR phone ILIKE ${idx}::VARCHAR \
                          OR email ILIKE ${idx}::VARCHAR)"
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
