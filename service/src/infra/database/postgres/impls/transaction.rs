//! [`transaction`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::transaction::{self, Purchase, Sale},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

use super::select_page;

/// Columns of the `purchase_transactions` table.
macro_rules! purchase_columns {
    () => {
        "id, number, invoice_number, vehicle_id, customer_id, \
         vehicle_price, tax_amount, total_amount, \
         payment_method, payment_reference, cashier_id, status, notes, \
         transacted_at"
    };
}

/// Columns of the `sales_transactions` table.
macro_rules! sale_columns {
    () => {
        "id, number, invoice_number, vehicle_id, customer_id, \
         vehicle_price, tax_amount, discount_amount, total_amount, \
         payment_method, payment_reference, cashier_id, status, notes, \
         transacted_at"
    };
}

/// Reads a [`Purchase`] out of the provided [`Row`].
fn purchase_from_row(row: &Row) -> Purchase {
    Purchase {
        id: row.get("id"),
        number: row.get("number"),
        invoice_number: row.get("invoice_number"),
        vehicle_id: row.get("vehicle_id"),
        customer_id: row.get("customer_id"),
        vehicle_price: row.get("vehicle_price"),
        tax_amount: row.get("tax_amount"),
        total_amount: row.get("total_amount"),
        payment_method: row.get("payment_method"),
        payment_reference: row.get("payment_reference"),
        cashier_id: row.get("cashier_id"),
        status: row.get("status"),
        notes: row.get("notes"),
        transacted_at: row.get("transacted_at"),
    }
}

/// Reads a [`Sale`] out of the provided [`Row`].
fn sale_from_row(row: &Row) -> Sale {
    Sale {
        id: row.get("id"),
        number: row.get("number"),
        invoice_number: row.get("invoice_number"),
        vehicle_id: row.get("vehicle_id"),
        customer_id: row.get("customer_id"),
        vehicle_price: row.get("vehicle_price"),
        tax_amount: row.get("tax_amount"),
        discount_amount: row.get("discount_amount"),
        total_amount: row.get("total_amount"),
        payment_method: row.get("payment_method"),
        payment_reference: row.get("payment_reference"),
        cashier_id: row.get("cashier_id"),
        status: row.get("status"),
        notes: row.get("notes"),
        transacted_at: row.get("transacted_at"),
    }
}

/// Builds the `FROM ... WHERE ...` clause selecting the rows of the
/// provided `table` matching the [`read::transaction::Filter`], pushing its
/// parameters into `ps`.
fn source<'a>(
    table: &str,
    filter: &'a read::transaction::Filter,
    ps: &mut Vec<&'a (dyn ToSql + Sync)>,
) -> String {
    let read::transaction::Filter {
        vehicle_id,
        customer_id,
    } = filter;

    let vehicle_idx = vehicle_id.as_ref().map(|id| {
        ps.push(id);
        ps.len()
    });
    let customer_idx = customer_id.as_ref().map(|id| {
        ps.push(id);
        ps.len()
    });

    format!(
        "FROM {table} \
         WHERE true \
               {vehicle} \
               {customer}",
        vehicle = vehicle_idx.into_iter().format_with("", |idx, f| {
            f(&format_args!("AND vehicle_id = ${idx}::UUID"))
        }),
        customer = customer_idx.into_iter().format_with("", |idx, f| {
            f(&format_args!("AND customer_id = ${idx}::UUID"))
        }),
    )
}

impl<C> Database<Select<By<Option<Purchase>, transaction::purchase::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Purchase>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Purchase>, transaction::purchase::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: transaction::purchase::Id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            purchase_columns!(),
            " FROM purchase_transactions \
              WHERE id = $1::UUID \
              LIMIT 1",
        );
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(purchase_from_row))
    }
}

impl<C> Database<Insert<Purchase>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(purchase): Insert<Purchase>,
    ) -> Result<Self::Ok, Self::Err> {
        let Purchase {
            id,
            number,
            invoice_number,
            vehicle_id,
            customer_id,
            vehicle_price,
            tax_amount,
            total_amount,
            payment_method,
            payment_reference,
            cashier_id,
            status,
            notes,
            transacted_at,
        } = purchase;

        const SQL: &str = concat!(
            "INSERT INTO purchase_transactions (",
            purchase_columns!(),
            ") VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::UUID, $5::UUID, \
                $6::NUMERIC, $7::NUMERIC, $8::NUMERIC, \
                $9::INT2, $10::VARCHAR, $11::UUID, $12::INT2, $13::TEXT, \
                $14::TIMESTAMPTZ \
            )",
        );
        self.exec(
            SQL,
            &[
                &id,
                &number,
                &invoice_number,
                &vehicle_id,
                &customer_id,
                &vehicle_price,
                &tax_amount,
                &total_amount,
                &payment_method,
                &payment_reference,
                &cashier_id,
                &status,
                &notes,
                &transacted_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C>
    Database<
        Select<
            By<
                read::transaction::purchase::list::Page,
                read::transaction::purchase::list::Selector,
            >,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::transaction::purchase::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<
                read::transaction::purchase::list::Page,
                read::transaction::purchase::list::Selector,
            >,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::transaction::purchase::list::Selector { arguments, filter } =
            by.into_inner();

        let mut ps = vec![];
        let source = source("purchase_transactions", &filter, &mut ps);
        select_page(
            self,
            purchase_columns!(),
            &source,
            "transacted_at DESC, number DESC",
            &ps,
            arguments,
            purchase_from_row,
        )
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Option<Sale>, transaction::sale::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Sale>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Sale>, transaction::sale::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: transaction::sale::Id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            sale_columns!(),
            " FROM sales_transactions \
              WHERE id = $1::UUID \
              LIMIT 1",
        );
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(sale_from_row))
    }
}

impl<C> Database<Insert<Sale>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(sale): Insert<Sale>,
    ) -> Result<Self::Ok, Self::Err> {
        let Sale {
            id,
            number,
            invoice_number,
            vehicle_id,
            customer_id,
            vehicle_price,
            tax_amount,
            discount_amount,
            total_amount,
            payment_method,
            payment_reference,
            cashier_id,
            status,
            notes,
            transacted_at,
        } = sale;

        const SQL: &str = concat!(
            "INSERT INTO sales_transactions (",
            sale_columns!(),
            ") VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::UUID, $5::UUID, \
                $6::NUMERIC, $7::NUMERIC, $8::NUMERIC, $9::NUMERIC, \
                $10::INT2, $11::VARCHAR, $12::UUID, $13::INT2, $14::TEXT, \
                $15::TIMESTAMPTZ \
            )",
        );
        self.exec(
            SQL,
            &[
                &id,
                &number,
                &invoice_number,
                &vehicle_id,
                &customer_id,
                &vehicle_price,
                &tax_amount,
                &discount_amount,
                &total_amount,
                &payment_method,
                &payment_reference,
                &cashier_id,
                &status,
                &notes,
                &transacted_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C>
    Database<
        Select<
            By<
                read::transaction::sale::list::Page,
                read::transaction::sale::list::Selector,
            >,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::transaction::sale::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<
                read::transaction::sale::list::Page,
                read::transaction::sale::list::Selector,
            >,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::transaction::sale::list::Selector { arguments, filter } =
            by.into_inner();

        let mut ps = vec![];
        let source = source("sales_transactions", &filter, &mut ps);
        select_page(
            self,
            sale_columns!(),
            &source,
            "transacted_at DESC, number DESC",
            &ps,
            arguments,
            sale_from_row,
        )
        .await
        .map_err(tracerr::wrap!())
    }
}
