//! [`Query`] collection related to multiple [`Purchase`]s.

use common::operations::By;

#[cfg(doc)]
use crate::{domain::transaction::Purchase, Query};
use crate::read::transaction::purchase::list;

use super::DatabaseQuery;

/// Queries a [`list::Page`] of [`Purchase`]s, newest first.
pub type List = DatabaseQuery<By<list::Page, list::Selector>>;
