//! [`Query`] of the dashboard statistics.

use common::{operations::By, DateTime};

#[cfg(doc)]
use crate::Query;
use crate::read;

use super::DatabaseQuery;

/// Queries [`read::dashboard::Stats`] as of the provided [`DateTime`].
///
/// Daily and monthly figures are counted since the start of the UTC day and
/// month of the provided [`DateTime`].
pub type Stats = DatabaseQuery<By<read::dashboard::Stats, DateTime>>;
