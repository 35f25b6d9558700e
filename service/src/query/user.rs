//! [`Query`]s of the staff [`User`]s.

use common::operations::By;

use crate::domain::{user, User};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Looks up a staff [`User`], active or not, by its [`user::Id`].
pub type ById = DatabaseQuery<By<Option<User>, user::Id>>;
