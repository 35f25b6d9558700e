//! Abstractions for offset pagination.

/// Number of items on a page when none (or an invalid one) is requested.
pub const DEFAULT_LIMIT: u32 = 10;

/// Maximum number of items on a single page.
pub const MAX_LIMIT: u32 = 100;

/// Pagination arguments.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Arguments {
    /// 1-based number of the requested page.
    page: u32,

    /// Maximum number of items on the requested page.
    limit: u32,
}

impl Default for Arguments {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Arguments {
    /// Creates new [`Arguments`] out of the requested values.
    ///
    /// Non-positive or missing `page` falls back to the first page.
    /// Non-positive, missing or exceeding [`MAX_LIMIT`] `limit` falls back to
    /// [`DEFAULT_LIMIT`].
    #[must_use]
    pub fn new(page: Option<i32>, limit: Option<i32>) -> Self {
        let page = page
            .and_then(|p| u32::try_from(p).ok())
            .filter(|p| *p > 0)
            .unwrap_or(1);
        let limit = limit
            .and_then(|l| u32::try_from(l).ok())
            .filter(|l| (1..=MAX_LIMIT).contains(l))
            .unwrap_or(DEFAULT_LIMIT);
        Self { page, limit }
    }

    /// Returns the 1-based page number requested by these [`Arguments`].
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Returns the maximum number of items requested by these [`Arguments`].
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns the number of items to skip before the requested page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// A page of items.
#[derive(Clone, Debug)]
pub struct Page<T> {
    /// Items on this [`Page`].
    pub items: Vec<T>,

    /// Total number of items matching the request across all pages.
    pub total: u64,

    /// [`Arguments`] this [`Page`] was selected with.
    pub arguments: Arguments,
}

impl<T> Page<T> {
    /// Creates a new [`Page`] out of its already selected items.
    #[must_use]
    pub fn new(
        arguments: Arguments,
        items: impl IntoIterator<Item = impl Into<T>>,
        total: u64,
    ) -> Self {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            total,
            arguments,
        }
    }

    /// Selects a [`Page`] out of all the matching items.
    #[must_use]
    pub fn slice(arguments: Arguments, all: Vec<T>) -> Self {
        let total = u64::try_from(all.len()).unwrap_or(u64::MAX);
        let offset = usize::try_from(arguments.offset()).unwrap_or(usize::MAX);
        let items = all
            .into_iter()
            .skip(offset)
            .take(usize::try_from(arguments.limit()).unwrap_or(usize::MAX))
            .collect();
        Self {
            items,
            total,
            arguments,
        }
    }
}

/// Pagination selector.
#[derive(Clone, Copy, Debug, Default)]
pub struct Selector<F> {
    /// Pagination [`Arguments`].
    pub arguments: Arguments,

    /// Additional filter being applied to the result.
    pub filter: F,
}

/// Defines pagination types.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_pagination {
    ($node:ty, $filter:ty) => {
        #[doc = "A [`Page`] of nodes."]
        pub type Page = $crate::pagination::Page<$node>;

        #[doc = "Arguments for selecting a [`Page`]."]
        pub type Arguments = $crate::pagination::Arguments;

        #[doc = "[`Page`] selector."]
        pub type Selector = $crate::pagination::Selector<$filter>;
    };
}

#[cfg(test)]
mod spec {
    use super::{Arguments, Page, DEFAULT_LIMIT};

    #[test]
    fn clamps_arguments() {
        let args = Arguments::new(None, None);
        assert_eq!((args.page(), args.limit()), (1, DEFAULT_LIMIT));

        let args = Arguments::new(Some(0), Some(0));
        assert_eq!((args.page(), args.limit()), (1, DEFAULT_LIMIT));

        let args = Arguments::new(Some(-3), Some(-1));
        assert_eq!((args.page(), args.limit()), (1, DEFAULT_LIMIT));

        let args = Arguments::new(Some(2), Some(101));
        assert_eq!((args.page(), args.limit()), (2, DEFAULT_LIMIT));

        let args = Arguments::new(Some(3), Some(100));
        assert_eq!((args.page(), args.limit()), (3, 100));
        assert_eq!(args.offset(), 200);
    }

    #[test]
    fn slices_page() {
        let page =
            Page::slice(Arguments::new(Some(2), Some(3)), (1..=7).collect());
        assert_eq!(page.items, vec![4, 5, 6]);
        assert_eq!(page.total, 7);

        let page: Page<i32> =
            Page::slice(Arguments::new(Some(4), Some(3)), (1..=7).collect());
        assert!(page.items.is_empty());
        assert_eq!(page.total, 7);
    }
}
