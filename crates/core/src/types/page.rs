//! Pagination envelope used by the backend's list endpoints.

use serde::{Deserialize, Serialize};

/// One page of a backend entity listing.
///
/// The backend returns Spring-style pages: the items for the requested page
/// under `content` plus the total page count. Page indices are zero-based.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items for the requested page.
    pub content: Vec<T>,
    /// Total number of pages for the query.
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// An empty page (no items, no pages).
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            content: Vec::new(),
            total_pages: 0,
        }
    }

    /// Whether a page exists after the given zero-based index.
    #[must_use]
    pub const fn has_next(&self, page: u32) -> bool {
        page + 1 < self.total_pages
    }

    /// Whether a page exists before the given zero-based index.
    #[must_use]
    pub const fn has_prev(&self, page: u32) -> bool {
        page > 0
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_backend_envelope() {
        let page: Page<String> =
            serde_json::from_str(r#"{"content":["a","b"],"totalPages":3}"#).unwrap();
        assert_eq!(page.content, vec!["a", "b"]);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_navigation_bounds() {
        let page = Page::<()> {
            content: vec![],
            total_pages: 3,
        };
        assert!(page.has_next(0));
        assert!(page.has_next(1));
        assert!(!page.has_next(2));
        assert!(!page.has_prev(0));
        assert!(page.has_prev(2));
    }

    #[test]
    fn test_empty() {
        let page = Page::<u32>::empty();
        assert!(page.content.is_empty());
        assert!(!page.has_next(0));
    }
}
