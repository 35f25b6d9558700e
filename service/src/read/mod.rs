//! Read entities definitions.

pub mod customer;
pub mod dashboard;
pub mod repair;
pub mod spare_part;
pub mod transaction;
pub mod vehicle;

use common::define_text;

define_text! {
    #[doc = "Text to search for in a list (case-insensitive substring)."]
    struct Search(max_len = 100);
}

impl Search {
    /// Indicates whether any of the provided `fields` contains this
    /// [`Search`], ignoring case.
    #[must_use]
    pub fn matches_any<'a>(
        &self,
        fields: impl IntoIterator<Item = Option<&'a str>>,
    ) -> bool {
        let needle = self.as_ref().to_lowercase();
        fields
            .into_iter()
            .flatten()
            .any(|f| f.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod spec {
    use super::Search;

    #[test]
    fn matches_case_insensitively() {
        let search = Search::new("avan").unwrap();

        assert!(search.matches_any([Some("Toyota"), Some("AVANZA")]));
        assert!(search.matches_any([None, Some("Avanza Veloz")]));
        assert!(!search.matches_any([Some("Toyota"), None]));
        assert!(!search.matches_any([]));
    }
}
