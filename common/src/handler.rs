//! [`Handler`] definition.

use std::future::Future;

/// Something executing `Args` asynchronously.
///
/// Commands and queries of the service, operations of a database and
/// background tasks are all [`Handler`]s of the values describing them.
pub trait Handler<Args = ()> {
    /// Result of a successful execution.
    type Ok;

    /// Error of a failed execution.
    type Err;

    /// Executes the provided `args`.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
