//! [`Query`] collection related to a single [`Repair`].

use common::operations::By;

use crate::domain::{repair, Repair};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Repair`] by its [`repair::Id`].
pub type ById = DatabaseQuery<By<Option<Repair>, repair::Id>>;

/// Queries all the [`repair::Part`]s of a [`Repair`], oldest first.
pub type Parts = DatabaseQuery<By<Vec<repair::Part>, repair::Id>>;

/// Queries a [`repair::Part`] by its [`repair::part::Id`].
pub type PartById = DatabaseQuery<By<Option<repair::Part>, repair::part::Id>>;
