//! Offset pagination over Postgres rows.

use common::pagination::{Arguments, Page};
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::infra::database::{self, postgres::Connection, Postgres};

/// Selects a [`Page`] of the rows described by the provided `source` (a
/// `FROM ... WHERE ...` SQL clause bound to the `ps` parameters), along
/// with the total number of them.
pub(super) async fn select_page<C, T>(
    db: &Postgres<C>,
    columns: &str,
    source: &str,
    ordering: &str,
    ps: &[&(dyn ToSql + Sync)],
    arguments: Arguments,
    from_row: impl Fn(&Row) -> T,
) -> Result<Page<T>, Traced<database::Error>>
where
    C: Connection,
{
    let total = db
        .query_opt(&format!("SELECT COUNT(*) {source}"), ps)
        .await
        .map_err(tracerr::wrap!())?
        .expect("always exists")
        .get::<_, i64>(0);

    let limit = i64::from(arguments.limit());
    let offset = i64::try_from(arguments.offset()).unwrap_or(i64::MAX);
    let paging: [&(dyn ToSql + Sync); 2] = [&limit, &offset];
    let params = ps.iter().copied().chain(paging).collect::<Vec<_>>();

    let sql = format!(
        "SELECT {columns} \
         {source} \
         ORDER BY {ordering} \
         LIMIT ${limit_idx}::INT8 \
         OFFSET ${offset_idx}::INT8",
        limit_idx = ps.len() + 1,
        offset_idx = ps.len() + 2,
    );
    let rows = db
        .query(&sql, &params)
        .await
        .map_err(tracerr::wrap!())?;

    Ok(Page::new(
        arguments,
        rows.iter().map(from_row),
        u64::try_from(total).expect("`COUNT(*)` overflow"),
    ))
}
