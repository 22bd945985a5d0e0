use serde::{Deserialize, Serialize};

use catalog_items::{Item, ItemPage};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

// -------------------------
// Request DTOs
// -------------------------

/// Raw `GET /items` query string. Numbers stay strings until
/// [`Pagination::parse`] so a bad value can be reported precisely.
#[derive(Debug, Default, Deserialize)]
pub struct ListItemsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub query: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    /// Blank or missing values fall back to the defaults; `limit` is clamped
    /// to [`MAX_LIMIT`]. Anything non-numeric or below 1 is rejected.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Result<Self, &'static str> {
        let page = parse_positive(page, DEFAULT_PAGE).ok_or("page must be a positive integer")?;
        let limit =
            parse_positive(limit, DEFAULT_LIMIT).ok_or("limit must be a positive integer")?;

        Ok(Self {
            page,
            limit: limit.min(MAX_LIMIT),
        })
    }
}

fn parse_positive(raw: Option<&str>, default: i64) -> Option<i64> {
    match raw.map(str::trim) {
        None | Some("") => Some(default),
        Some(s) => s.parse::<i64>().ok().filter(|n| *n >= 1),
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct ItemListResponse {
    pub items: Vec<Item>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
}

impl ItemListResponse {
    pub fn new(page: ItemPage, pagination: Pagination) -> Self {
        Self {
            items: page.items,
            pagination: PaginationMeta {
                page: pagination.page,
                limit: pagination.limit,
                total: page.total,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_and_blank_values() {
        assert_eq!(
            Pagination::parse(None, None).unwrap(),
            Pagination { page: 1, limit: 20 }
        );
        assert_eq!(
            Pagination::parse(Some(" "), Some("")).unwrap(),
            Pagination { page: 1, limit: 20 }
        );
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(Pagination::parse(Some("3"), Some("500")).unwrap().limit, 100);
        assert_eq!(Pagination::parse(Some("3"), Some("100")).unwrap().limit, 100);
        assert_eq!(Pagination::parse(Some("3"), Some("7")).unwrap().page, 3);
    }

    #[test]
    fn non_positive_or_non_numeric_is_rejected() {
        for (page, limit) in [("0", "10"), ("1", "0"), ("-2", "10"), ("abc", "10"), ("1", "1.5")] {
            assert!(
                Pagination::parse(Some(page), Some(limit)).is_err(),
                "page={page} limit={limit}"
            );
        }
    }
}
