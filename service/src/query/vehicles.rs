//! [`Query`] collection related to multiple [`Vehicle`]s.

use common::operations::By;

#[cfg(doc)]
use crate::{domain::Vehicle, Query};
use crate::read;

use super::DatabaseQuery;

/// Queries a [`read::vehicle::list::Page`] of [`Vehicle`]s, newest first.
pub type List = DatabaseQuery<
    By<read::vehicle::list::Page, read::vehicle::list::Selector>,
>;
