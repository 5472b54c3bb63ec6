//! Offset pagination primitives for list endpoints.
//!
//! List handlers accept a one-based `page` number and serve a fixed number of
//! rows per page. [`PageRequest`] turns the raw page number into the `limit`
//! and `offset` pair persistence adapters feed to SQL, so every adapter
//! computes windows the same way.
//!
//! ```
//! use pagination::{PageRequest, PageSize};
//!
//! let size = PageSize::new(4).expect("non-zero page size");
//! let request = PageRequest::new(Some(2), size);
//! assert_eq!(request.offset(), 4);
//! assert_eq!(request.limit(), 4);
//! ```

use serde::{Deserialize, Serialize};

/// Errors raised while building pagination primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// A page must hold at least one row.
    #[error("page size must be greater than zero")]
    ZeroPageSize,
}

/// Number of rows served per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageSize(u32);

impl PageSize {
    /// Validate and construct a page size.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ZeroPageSize`] when `size` is zero.
    pub const fn new(size: u32) -> Result<Self, PaginationError> {
        if size == 0 {
            return Err(PaginationError::ZeroPageSize);
        }
        Ok(Self(size))
    }

    /// Rows per page.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for PageSize {
    type Error = PaginationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageSize> for u32 {
    fn from(value: PageSize) -> Self {
        value.0
    }
}

/// A one-based page request resolved against a fixed page size.
///
/// Missing page numbers default to the first page and values below one are
/// clamped to it, so the computed offset is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u32,
    size: PageSize,
}

impl PageRequest {
    /// Resolve a raw page number against `size`.
    #[must_use]
    pub fn new(page: Option<i64>, size: PageSize) -> Self {
        let page = page
            .filter(|value| *value >= 1)
            .map_or(1, |value| u32::try_from(value).unwrap_or(u32::MAX));
        Self { page, size }
    }

    /// The first page for `size`.
    #[must_use]
    pub const fn first(size: PageSize) -> Self {
        Self { page: 1, size }
    }

    /// One-based page number after clamping.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Configured page size.
    #[must_use]
    pub const fn size(&self) -> PageSize {
        self.size
    }

    /// Maximum number of rows to fetch.
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.size.get())
    }

    /// Number of rows to skip: `(page - 1) * size`.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)).saturating_mul(self.limit())
    }

    /// `offset` as a `usize`, for slicing in-memory collections.
    #[must_use]
    pub fn offset_usize(&self) -> usize {
        usize::try_from(self.offset()).unwrap_or(usize::MAX)
    }

    /// `limit` as a `usize`, for slicing in-memory collections.
    #[must_use]
    pub fn limit_usize(&self) -> usize {
        usize::try_from(self.size.get()).unwrap_or(usize::MAX)
    }
}

/// Raw list query parameters shared by list endpoints.
///
/// `q` (also accepted as `query`) carries the optional case-insensitive
/// substring filter; `page` the requested one-based page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ListQuery {
    /// Optional substring filter.
    #[serde(default, alias = "query")]
    pub q: Option<String>,
    /// Requested page number.
    #[serde(default)]
    pub page: Option<i64>,
}

impl ListQuery {
    /// Filter text with surrounding whitespace removed; empty input means no filter.
    #[must_use]
    pub fn filter(&self) -> Option<&str> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Resolve the page request for `size`.
    #[must_use]
    pub fn page_request(&self, size: PageSize) -> PageRequest {
        PageRequest::new(self.page, size)
    }
}
