//! [`Vehicle`]-related read definitions.

use derive_more::Deref;

#[cfg(doc)]
use crate::domain::{transaction, Repair, Vehicle};

/// Indicator whether any [`Repair`], [`transaction::Purchase`] or
/// [`transaction::Sale`] references a [`Vehicle`].
#[derive(Clone, Copy, Debug, Deref, Eq, Hash, PartialEq)]
pub struct HasHistory(pub bool);

pub mod list {
    //! [`Vehicle`] list definitions.

    use common::define_pagination;

    use crate::{
        domain::{vehicle, Vehicle},
        read::Search,
    };

    define_pagination!(Vehicle, Filter);

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`Search`] over code, chassis number, license plate, brand and
        /// model.
        pub search: Option<Search>,

        /// [`vehicle::Status`] to filter by.
        pub status: Option<vehicle::Status>,
    }
}
