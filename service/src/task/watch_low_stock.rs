//! [`WatchLowStock`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::operations::{By, Perform, Select, Start};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::SparePart,
    infra::{database, Database},
    read, Service,
};

use super::Task;

/// Configuration for [`WatchLowStock`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between stock checks.
    pub interval: time::Duration,
}

/// [`Task`] reporting active [`SparePart`]s whose stock is at or below their
/// minimum level.
#[derive(Clone, Copy, Debug)]
pub struct WatchLowStock<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db> Task<Start<By<WatchLowStock<Self>, Config>>> for Service<Db>
where
    WatchLowStock<Service<Db>>:
        Task<Perform<()>, Ok = Vec<SparePart>, Err: Error> + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<WatchLowStock<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = WatchLowStock {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            match task.execute(Perform(())).await {
                Ok(parts) => {
                    log::debug!(
                        "`task::WatchLowStock` found {} spare parts low on \
                         stock",
                        parts.len(),
                    );
                }
                Err(e) => log::error!("`task::WatchLowStock` failed: {e}"),
            }
        }
    }
}

impl<Db> Task<Perform<()>> for WatchLowStock<Service<Db>>
where
    Db: Database<
        Select<By<Vec<SparePart>, read::spare_part::LowStock>>,
        Ok = Vec<SparePart>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<SparePart>;
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let parts = self
            .service
            .database()
            .execute(Select(By::new(read::spare_part::LowStock)))
            .await
            .map_err(tracerr::wrap!())?;
        for p in &parts {
            log::warn!(
                "`SparePart(code: {})` is low on stock: {} left, minimum is {}",
                p.code,
                p.stock_quantity,
                p.min_stock_level,
            );
        }
        Ok(parts)
    }
}

/// Error of [`WatchLowStock`] execution.
pub type ExecutionError = Traced<database::Error>;

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{
        operations::{Insert, Perform},
        Money,
    };

    use super::{Config, WatchLowStock};
    use crate::{
        domain::fixture,
        infra::{Database as _, Memory},
        task::Task as _,
        Service,
    };

    #[tokio::test]
    async fn reports_active_parts_at_or_below_minimum() {
        let db = Memory::default();

        let mut low = fixture::spare_part(2, Money::from(10));
        low.min_stock_level = 2;
        let mut fine = fixture::spare_part(3, Money::from(10));
        fine.min_stock_level = 2;
        let mut deleted = fixture::spare_part(0, Money::from(10));
        deleted.min_stock_level = 5;
        deleted.is_active = false;
        for p in [low.clone(), fine, deleted] {
            db.execute(Insert(p)).await.unwrap();
        }

        let task = WatchLowStock {
            config: Config {
                interval: Duration::from_secs(3600),
            },
            service: Service::with_database(db),
        };
        let found = task.execute(Perform(())).await.unwrap();

        assert_eq!(
            found.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![low.id],
        );
    }
}
