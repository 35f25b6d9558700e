//! [`Query`] collection related to a single [`SparePart`].

use common::operations::By;

use crate::domain::{spare_part, SparePart, StockMovement};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`SparePart`] by its [`spare_part::Id`].
pub type ById = DatabaseQuery<By<Option<SparePart>, spare_part::Id>>;

/// Queries all the [`StockMovement`]s of a [`SparePart`], newest first.
pub type Movements = DatabaseQuery<By<Vec<StockMovement>, spare_part::Id>>;
