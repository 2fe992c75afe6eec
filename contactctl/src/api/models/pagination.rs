//! Page-number pagination for search endpoints.
//!
//! Pages are 1-based. A request past the last page is not an error: it returns an empty page
//! alongside the real page count.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::SearchConfig;
use crate::errors::Error;

/// Paging metadata returned next to a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Paging {
    /// The page that was requested (1-based)
    pub current_page: i64,
    /// Total number of pages for the current filter
    pub pages: i64,
    /// Page size used
    pub size: i64,
}

/// A resolved page request: defaults applied and bounds checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    size: i64,
}

impl PageRequest {
    /// Apply defaults from config and reject out-of-range values.
    pub fn resolve(page: Option<i64>, size: Option<i64>, config: &SearchConfig) -> Result<Self, Error> {
        let page = page.unwrap_or(1);
        let size = size.unwrap_or(config.default_page_size);

        if page < 1 {
            return Err(Error::invalid_field("page", "must be at least 1"));
        }
        if size < 1 || size > config.max_page_size {
            return Err(Error::invalid_field(
                "size",
                format!("must be between 1 and {}", config.max_page_size),
            ));
        }

        Ok(Self { page, size })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    /// Rows to skip before this page.
    pub fn skip(&self) -> i64 {
        (self.page - 1).saturating_mul(self.size)
    }

    /// Paging metadata for `total` matching rows.
    pub fn paging(&self, total: i64) -> Paging {
        Paging {
            current_page: self.page,
            pages: (total.max(0) + self.size - 1) / self.size,
            size: self.size,
        }
    }
}
