//! Forward/backward navigation through paged listings

use thiserror::Error;

use crate::api::Page;

/// Navigation past the end of a paged listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("there are no more pages")]
    NoMorePages,

    #[error("there are no previous pages")]
    NoPreviousPage,
}

/// A listing that exposes links to its neighbouring pages
pub trait Paginated {
    fn next_url(&self) -> Option<&str>;
    fn previous_url(&self) -> Option<&str>;
}

impl<T> Paginated for Page<T> {
    fn next_url(&self) -> Option<&str> {
        self.next.as_deref()
    }

    fn previous_url(&self) -> Option<&str> {
        self.previous.as_deref()
    }
}

/// Tracks where the next and previous page of a listing live
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCursor {
    next: Option<String>,
    previous: Option<String>,
}

impl PageCursor {
    /// A cursor whose next page is `first_page` and which has no previous page
    pub fn starting_at(first_page: impl Into<String>) -> Self {
        Self {
            next: Some(first_page.into()),
            previous: None,
        }
    }

    /// Replaces both links with the ones reported by `listing`
    ///
    /// Absent or empty links clear the corresponding side.
    pub fn update(&mut self, listing: &impl Paginated) {
        self.next = non_empty(listing.next_url());
        self.previous = non_empty(listing.previous_url());
    }

    /// URL of the next page
    pub fn next(&self) -> Result<&str, NavigationError> {
        self.next.as_deref().ok_or(NavigationError::NoMorePages)
    }

    /// URL of the previous page
    pub fn previous(&self) -> Result<&str, NavigationError> {
        self.previous.as_deref().ok_or(NavigationError::NoPreviousPage)
    }
}

fn non_empty(url: Option<&str>) -> Option<String> {
    url.filter(|url| !url.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::NamedResource;

    fn page(next: Option<&str>, previous: Option<&str>) -> Page<NamedResource> {
        Page {
            count: 0,
            next: next.map(str::to_string),
            previous: previous.map(str::to_string),
            results: Vec::new(),
        }
    }

    #[test]
    fn test_fresh_cursor_has_no_previous_page() {
        let cursor = PageCursor::starting_at("A");

        assert_eq!(cursor.next(), Ok("A"));
        assert_eq!(cursor.previous(), Err(NavigationError::NoPreviousPage));
    }

    #[test]
    fn test_default_cursor_has_no_pages() {
        let cursor = PageCursor::default();

        assert_eq!(cursor.next(), Err(NavigationError::NoMorePages));
        assert_eq!(cursor.previous(), Err(NavigationError::NoPreviousPage));
    }

    #[test]
    fn test_update_sets_next_and_clears_previous() {
        let mut cursor = PageCursor::starting_at("A");

        cursor.update(&page(Some("B"), None));

        assert_eq!(cursor.next(), Ok("B"));
        assert!(cursor.previous().is_err());
    }

    #[test]
    fn test_update_with_no_links_clears_both() {
        let mut cursor = PageCursor::starting_at("A");
        cursor.update(&page(Some("C"), Some("A")));
        assert_eq!(cursor.previous(), Ok("A"));

        cursor.update(&page(None, None));

        assert_eq!(cursor.next(), Err(NavigationError::NoMorePages));
        assert_eq!(cursor.previous(), Err(NavigationError::NoPreviousPage));
    }

    #[test]
    fn test_empty_link_counts_as_absent() {
        let mut cursor = PageCursor::default();

        cursor.update(&page(Some(""), Some("A")));

        assert!(cursor.next().is_err());
        assert_eq!(cursor.previous(), Ok("A"));
    }
}
