//! Shared query parameter types for API handlers.

use estate_core::pagination::PageWindow;
use serde::Deserialize;

/// Listing parameters: either `?skip=&limit=` or 1-indexed `?page=&page_size=`.
///
/// Values are clamped by [`PageWindow::resolve`]; `page` wins over `skip`.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PaginationParams {
    pub fn window(&self) -> PageWindow {
        PageWindow::resolve(self.skip, self.limit, self.page, self.page_size)
    }
}
