//! [`Repair`]-related read definitions.

#[cfg(doc)]
use crate::domain::Repair;

pub mod list {
    //! [`Repair`] list definitions.

    use common::define_pagination;

    use crate::{
        domain::{repair, vehicle, Repair},
        read::Search,
    };

    define_pagination!(Repair, Filter);

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`Search`] over number and title.
        pub search: Option<Search>,

        /// [`repair::Status`] to filter by.
        pub status: Option<repair::Status>,

        /// ID of the repaired [`Vehicle`] to filter by.
        ///
        /// [`Vehicle`]: crate::domain::Vehicle
        pub vehicle_id: Option<vehicle::Id>,
    }
}
