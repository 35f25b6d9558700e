//! [`Purchase`]- and [`Sale`]-related read definitions.

#[cfg(doc)]
use crate::domain::transaction::{Purchase, Sale};

/// Filter for [`Purchase`] and [`Sale`] lists.
#[derive(Clone, Copy, Debug, Default)]
pub struct Filter {
    /// ID of the [`Vehicle`] to filter by.
    ///
    /// [`Vehicle`]: crate::domain::Vehicle
    pub vehicle_id: Option<crate::domain::vehicle::Id>,

    /// ID of the [`Customer`] to filter by.
    ///
    /// [`Customer`]: crate::domain::Customer
    pub customer_id: Option<crate::domain::customer::Id>,
}

pub mod purchase {
    //! [`Purchase`] list definitions.

    pub mod list {
        //! [`Purchase`] list definitions.

        use common::define_pagination;

        use crate::domain::transaction::Purchase;

        pub use crate::read::transaction::Filter;

        define_pagination!(Purchase, Filter);
    }
}

pub mod sale {
    //! [`Sale`] list definitions.

    pub mod list {
        //! [`Sale`] list definitions.

        use common::define_pagination;

        use crate::domain::transaction::Sale;

        pub use crate::read::transaction::Filter;

        define_pagination!(Sale, Filter);
    }
}
