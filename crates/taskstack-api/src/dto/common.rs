//! Common DTO types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dto::TodoResponse;

/// Paginated listing envelope
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[aliases(PaginatedTodoResponse = PaginatedResponse<TodoResponse>)]
pub struct PaginatedResponse<T> {
    /// Items on this page
    pub content: Vec<T>,
    /// Page arithmetic and navigation links
    pub metadata: PageMetadata,
}

impl<T> PaginatedResponse<T> {
    pub fn new(content: Vec<T>, total: u64, page: u64, per_page: u64, path: &str) -> Self {
        let metadata = PageMetadata::new(total, page, per_page, path);
        Self { content, metadata }
    }
}

/// Page metadata with navigation URLs
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PageMetadata {
    /// Total number of items across all pages
    pub total: u64,
    /// Items per page
    pub per_page: u64,
    /// Current page (1-based)
    pub current_page: u64,
    /// Last page number
    pub last_page: u64,
    /// URL of the first page
    pub first_page_url: String,
    /// URL of the last page
    pub last_page_url: String,
    /// URL of the next page, if any
    pub next_page_url: Option<String>,
    /// URL of the previous page, if any
    pub prev_page_url: Option<String>,
    /// Request path the listing was served from
    pub path: String,
    /// 1-based ordinal of the first item on this page, if any
    pub from: Option<u64>,
    /// 1-based ordinal of the last item on this page, if any
    pub to: Option<u64>,
}

impl PageMetadata {
    pub fn new(total: u64, current_page: u64, per_page: u64, path: &str) -> Self {
        let last_page = if total == 0 {
            1
        } else {
            total.div_ceil(per_page)
        };

        let page_url = |page: u64| format!("{}?page={}&per_page={}", path, page, per_page);

        let offset = current_page.saturating_sub(1).saturating_mul(per_page);
        let (from, to) = if offset < total {
            (Some(offset + 1), Some(offset.saturating_add(per_page).min(total)))
        } else {
            (None, None)
        };

        Self {
            total,
            per_page,
            current_page,
            last_page,
            first_page_url: page_url(1),
            last_page_url: page_url(last_page),
            next_page_url: (current_page < last_page).then(|| page_url(current_page + 1)),
            prev_page_url: (current_page > 1).then(|| page_url(current_page - 1)),
            path: path.to_string(),
            from,
            to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_page_links() {
        let meta = PageMetadata::new(45, 3, 10, "/todos");
        assert_eq!(meta.last_page, 5);
        assert_eq!(meta.from, Some(21));
        assert_eq!(meta.to, Some(30));
        assert_eq!(meta.prev_page_url.as_deref(), Some("/todos?page=2&per_page=10"));
        assert_eq!(meta.next_page_url.as_deref(), Some("/todos?page=4&per_page=10"));
    }

    #[test]
    fn first_page_has_no_prev() {
        let meta = PageMetadata::new(45, 1, 10, "/todos");
        assert!(meta.prev_page_url.is_none());
        assert_eq!(meta.next_page_url.as_deref(), Some("/todos?page=2&per_page=10"));
        assert_eq!(meta.from, Some(1));
        assert_eq!(meta.to, Some(10));
    }

    #[test]
    fn last_page_has_no_next_and_partial_to() {
        let meta = PageMetadata::new(45, 5, 10, "/todos");
        assert!(meta.next_page_url.is_none());
        assert_eq!(meta.from, Some(41));
        assert_eq!(meta.to, Some(45));
    }

    #[test]
    fn empty_listing() {
        let meta = PageMetadata::new(0, 1, 10, "/todos");
        assert_eq!(meta.total, 0);
        assert_eq!(meta.last_page, 1);
        assert!(meta.from.is_none());
        assert!(meta.to.is_none());
        assert!(meta.next_page_url.is_none());
        assert!(meta.prev_page_url.is_none());
    }

    #[test]
    fn page_past_the_end() {
        let meta = PageMetadata::new(5, 3, 10, "/todos");
        assert!(meta.from.is_none());
        assert!(meta.to.is_none());
    }

    #[test]
    fn absurd_page_number_does_not_overflow() {
        let meta = PageMetadata::new(5, u64::MAX, 10, "/todos");
        assert!(meta.from.is_none());
        assert!(meta.to.is_none());
        assert!(meta.next_page_url.is_none());
    }
}
