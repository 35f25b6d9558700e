//! [`Customer`]-related read definitions.

#[cfg(doc)]
use crate::domain::Customer;

pub mod list {
    //! [`Customer`] list definitions.

    use common::define_pagination;

    use crate::{
        domain::{customer, Customer},
        read::Search,
    };

    define_pagination!(Customer, Filter);

    /// Filter for [`Selector`].
    ///
    /// Deleted [`Customer`]s are never listed.
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`Search`] over code, name, phone and email.
        pub search: Option<Search>,

        /// [`customer::Kind`] to filter by.
        pub kind: Option<customer::Kind>,
    }
}
