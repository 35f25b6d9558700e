//! [`Query`] collection related to multiple [`Repair`]s.

use common::operations::By;

#[cfg(doc)]
use crate::{domain::Repair, Query};
use crate::read;

use super::DatabaseQuery;

/// Queries a [`read::repair::list::Page`] of [`Repair`]s, newest first.
pub type List =
    DatabaseQuery<By<read::repair::list::Page, read::repair::list::Selector>>;
