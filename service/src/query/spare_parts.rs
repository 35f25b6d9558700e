//! [`Query`] collection related to multiple [`SparePart`]s.

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{domain::SparePart, read};

use super::DatabaseQuery;

/// Queries a [`read::spare_part::list::Page`] of [`SparePart`]s, newest
/// first.
pub type List = DatabaseQuery<
    By<read::spare_part::list::Page, read::spare_part::list::Selector>,
>;

/// Queries all the active [`SparePart`]s running low on stock.
pub type LowStock = DatabaseQuery<By<Vec<SparePart>, read::spare_part::LowStock>>;
