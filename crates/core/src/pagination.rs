//! Stateless pagination helpers.
//!
//! Listing is expressed as a `skip` / `limit` window over the ordered
//! collection. Page-based callers (1-indexed pages of a fixed size) are
//! translated into the same window via [`PageWindow::for_page`].

/// Default page size when the caller does not supply one.
pub const DEFAULT_PAGE_LIMIT: i64 = 100;

/// Largest page a single request may ask for.
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Clamp a user-provided limit into `[0, max]`. A limit of 0 is legal and
/// yields an empty page.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(0, max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Number of pages needed to show `count` items, `ceil(count / page_size)`.
pub fn page_count(count: i64, page_size: i64) -> i64 {
    if count <= 0 || page_size <= 0 {
        return 0;
    }
    count / page_size + i64::from(count % page_size != 0)
}

/// A `skip` / `limit` window over an ordered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub skip: i64,
    pub limit: i64,
}

impl PageWindow {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip: skip.max(0),
            limit: limit.max(0),
        }
    }

    /// Window for a 1-indexed page. Pages below 1 are treated as page 1;
    /// pages past the end are not clamped and simply select nothing.
    pub fn for_page(page: i64, page_size: i64) -> Self {
        let page_size = page_size.max(0);
        let skip = (page.max(1) - 1).saturating_mul(page_size);
        Self {
            skip,
            limit: page_size,
        }
    }

    /// Resolve raw listing parameters into a window.
    ///
    /// `page` takes precedence over `skip`. The page size comes from
    /// `page_size`, then `limit`, then [`DEFAULT_PAGE_LIMIT`], capped at
    /// [`MAX_PAGE_LIMIT`].
    pub fn resolve(
        skip: Option<i64>,
        limit: Option<i64>,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Self {
        let limit = clamp_limit(page_size.or(limit), DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        match page {
            Some(page) => Self::for_page(page, limit),
            None => Self::new(clamp_offset(skip), limit),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
