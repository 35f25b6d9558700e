//! [`Query`] collection related to multiple [`Sale`]s.

use common::operations::By;

#[cfg(doc)]
use crate::{domain::transaction::Sale, Query};
use crate::read::transaction::sale::list;

use super::DatabaseQuery;

/// Queries a [`list::Page`] of [`Sale`]s, newest first.
pub type List = DatabaseQuery<By<list::Page, list::Selector>>;
