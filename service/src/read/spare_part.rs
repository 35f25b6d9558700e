//! [`SparePart`]-related read definitions.

#[cfg(doc)]
use crate::domain::SparePart;

/// Selector of the active [`SparePart`]s being low on stock.
#[derive(Clone, Copy, Debug, Default)]
pub struct LowStock;

pub mod list {
    //! [`SparePart`] list definitions.

    use common::define_pagination;

    use crate::{domain::SparePart, read::Search};

    define_pagination!(SparePart, Filter);

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`Search`] over code, name and brand.
        pub search: Option<Search>,

        /// Whether to list only [`SparePart`]s at or below their minimum
        /// stock level.
        pub low_stock_only: bool,

        /// Whether to list deleted [`SparePart`]s as well.
        pub include_inactive: bool,
    }
}
