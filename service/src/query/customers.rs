//! [`Query`] collection related to multiple [`Customer`]s.

use common::operations::By;

#[cfg(doc)]
use crate::{domain::Customer, Query};
use crate::read;

use super::DatabaseQuery;

/// Queries a [`read::customer::list::Page`] of active [`Customer`]s, newest
/// first.
pub type List = DatabaseQuery<
    By<read::customer::list::Page, read::customer::list::Selector>,
>;
