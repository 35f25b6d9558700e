//! [`StockMovement`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::{spare_part, StockMovement},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Insert<StockMovement>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(movement): Insert<StockMovement>,
    ) -> Result<Self::Ok, Self::Err> {
        let StockMovement {
            id,
            spare_part_id,
            kind,
            reference_kind,
            reference_id,
            quantity_before,
            quantity_moved,
            quantity_after,
            notes,
            moved_at,
        } = movement;

        let quantity_before = i64::from(quantity_before);
        let quantity_moved = i64::from(quantity_moved);
        let quantity_after = i64::from(quantity_after);

        const SQL: &str = "\
            INSERT INTO stock_movements (\
                id, spare_part_id, kind, reference_kind, reference_id, \
                quantity_before, quantity_moved, quantity_after, \
                notes, moved_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::INT2, $4::INT2, $5::UUID, \
                $6::INT8, $7::INT8, $8::INT8, \
                $9::VARCHAR, $10::TIMESTAMPTZ \
            )";
        self.exec(
            SQL,
            &[
                &id,
                &spare_part_id,
                &kind,
                &reference_kind,
                &reference_id,
                &quantity_before,
                &quantity_moved,
                &quantity_after,
                &notes,
                &moved_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Select<By<Vec<StockMovement>, spare_part::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<StockMovement>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<StockMovement>, spare_part::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let spare_part_id: spare_part::Id = by.into_inner();

        let quantity = |row: &tokio_postgres::Row, col: &str| {
            u32::try_from(row.get::<_, i64>(col))
                .unwrap_or_else(|_| panic!("`{col}` overflow"))
        };

        const SQL: &str = "\
            SELECT id, spare_part_id, kind, reference_kind, reference_id, \
                   quantity_before, quantity_moved, quantity_after, \
                   notes, moved_at \
            FROM stock_movements \
            WHERE spare_part_id = $1::UUID \
            ORDER BY moved_at DESC, id";
        Ok(self
            .query(SQL, &[&spare_part_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| StockMovement {
                id: row.get("id"),
                spare_part_id: row.get("spare_part_id"),
                kind: row.get("kind"),
                reference_kind: row.get("reference_kind"),
                reference_id: row.get("reference_id"),
                quantity_before: quantity(&row, "quantity_before"),
                quantity_moved: quantity(&row, "quantity_moved"),
                quantity_after: quantity(&row, "quantity_after"),
                notes: row.get("notes"),
                moved_at: row.get("moved_at"),
            })
            .collect())
    }
}
