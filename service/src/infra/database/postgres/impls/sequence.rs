//! [`sequence`]-related [`Database`] implementations.

use common::operations::{By, Increment};
use tracerr::Traced;

use crate::{
    domain::sequence,
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Increment<By<sequence::Value, sequence::Key>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = sequence::Value;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Increment(by): Increment<By<sequence::Value, sequence::Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let key = by.into_inner();
        let prefix = key.prefix().as_str();
        let scope = key.scope();

        // Row lock of the upsert serializes concurrent generators.
        const SQL: &str = "\
            INSERT INTO sequences (prefix, scope, value) \
            VALUES ($1::VARCHAR, $2::VARCHAR, 1) \
            ON CONFLICT (prefix, scope) DO UPDATE \
            SET value = sequences.value + 1 \
            RETURNING value";
        self.query_opt(SQL, &[&prefix, &scope])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| {
                sequence::Value(
                    u32::try_from(
                        row.expect("always exists").get::<_, i64>("value"),
                    )
                    .expect("`value` overflow"),
                )
            })
    }
}
