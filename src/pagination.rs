//! Page/limit clamping and the paginated response envelope.

use serde::Serialize;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Sanitized pagination parameters.
#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    pub page: i64,
    pub limit: i64,
}

impl PageParams {
    /// Clamp raw query values: page < 1 falls back to 1, limit < 1 falls back
    /// to 10, limit > 100 clamps to 100.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p >= 1 => p,
            _ => DEFAULT_PAGE,
        };
        let limit = match limit {
            Some(l) if l >= 1 => l.min(MAX_LIMIT),
            _ => DEFAULT_LIMIT,
        };
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// One page of results plus row/page totals.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub page: i64,
    pub limit: i64,
    pub total_rows: i64,
    pub total_pages: i64,
    pub data: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(params: PageParams, total_rows: i64, data: Vec<T>) -> Self {
        let total_pages = (total_rows + params.limit - 1) / params.limit;
        Self {
            page: params.page,
            limit: params.limit,
            total_rows,
            total_pages,
            data,
        }
    }
}
