//! [`Background`] environment of the [`Task`]s.

use std::{
    error::Error as StdError,
    future::{Future, IntoFuture},
};

use derive_more::Display;
use futures::{
    future::{self, LocalBoxFuture},
    FutureExt as _, TryFutureExt as _,
};
use tokio::task;
use tracing::{self as log, Instrument as _};

#[cfg(doc)]
use crate::Task;

/// Environment running the long-lived [`Task`]s of a [`Service`] on the
/// current thread.
///
/// Resolves once all the spawned [`Task`]s finish, or as soon as any of them
/// fails.
///
/// [`Service`]: crate::Service
#[derive(Debug, Default)]
pub struct Background {
    /// Local set the [`Task`]s are spawned onto.
    set: task::LocalSet,

    /// Names and handles of the spawned [`Task`]s.
    tasks: Vec<(&'static str, task::JoinHandle<Result<(), Failure>>)>,
}

impl Background {
    /// Spawns the provided `future` as a [`Task`] with the provided `name`.
    pub fn spawn<F, E>(&mut self, name: &'static str, future: F)
    where
        F: Future<Output = Result<(), E>> + 'static,
        E: StdError + 'static,
    {
        log::debug!("spawning `{name}` background task");
        let handle = self.set.spawn_local(
            future
                .map_err(move |e| Failure::new(name, e))
                .instrument(log::info_span!("task", name)),
        );
        self.tasks.push((name, handle));
    }
}

impl IntoFuture for Background {
    type Output = Result<(), Failure>;
    type IntoFuture = LocalBoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        let Self { set, tasks } = self;
        let finished = tasks.into_iter().map(|(name, handle)| {
            handle
                .map(move |res| {
                    res.unwrap_or_else(|e| Err(Failure::new(name, e)))
                })
                .inspect_err(|e| log::error!("{e}"))
                .boxed_local()
        });
        async move {
            set.run_until(future::try_join_all(finished).map_ok(drop))
                .await
        }
        .boxed_local()
    }
}

/// Failure of a [`Background`] [`Task`].
#[derive(Debug, Display)]
#[display("`{task}` background task failed: {source}")]
pub struct Failure {
    /// Name of the failed [`Task`].
    pub task: &'static str,

    /// Error the [`Task`] failed with.
    pub source: Box<dyn StdError + 'static>,
}

impl StdError for Failure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&*self.source)
    }
}

impl Failure {
    /// Creates a new [`Failure`] of the named [`Task`].
    fn new(task: &'static str, err: impl StdError + 'static) -> Self {
        Self {
            task,
            source: Box::new(err),
        }
    }
}

#[cfg(test)]
mod spec {
    use std::{fmt, future::IntoFuture as _};

    use super::Background;

    #[derive(Debug)]
    struct Boom;

    impl fmt::Display for Boom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("boom")
        }
    }

    impl std::error::Error for Boom {}

    #[tokio::test]
    async fn resolves_once_tasks_finish() {
        let mut bg = Background::default();
        bg.spawn("first", async { Ok::<_, Boom>(()) });
        bg.spawn("second", async { Ok::<_, Boom>(()) });

        assert!(bg.into_future().await.is_ok());
    }

    #[tokio::test]
    async fn names_failed_task() {
        let mut bg = Background::default();
        bg.spawn("ok", async { Ok::<_, Boom>(()) });
        bg.spawn("failing", async { Err(Boom) });

        let err = bg.into_future().await.unwrap_err();

        assert_eq!(err.task, "failing");
        assert_eq!(err.to_string(), "`failing` background task failed: boom");
    }
}
