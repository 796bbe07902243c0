//! Search and pagination over the item collection
//!
//! Pure functions only: identical inputs always produce identical pages.

use crate::models::{Item, ItemsPage};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Search and pagination parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    /// Case-insensitive name substring; `None` or empty keeps everything
    pub search: Option<String>,
    pub page: i64,
    pub limit: i64,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            search: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl QueryParams {
    pub fn new(search: Option<String>, page: i64, limit: i64) -> Self {
        Self {
            search,
            page,
            limit,
        }
    }

    /// Build from raw query-string values.
    ///
    /// Numbers are read from their leading integer (`"3abc"` is 3); anything
    /// without one falls back to the default.
    pub fn from_raw(q: Option<&str>, page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            search: q.filter(|q| !q.is_empty()).map(str::to_string),
            page: page.and_then(parse_leading_int).unwrap_or(DEFAULT_PAGE),
            limit: limit.and_then(parse_leading_int).unwrap_or(DEFAULT_LIMIT),
        }
    }

    /// Page number clamped to at least 1
    pub fn effective_page(&self) -> usize {
        usize::try_from(self.page.max(1)).unwrap_or(usize::MAX)
    }

    /// Page size clamped to [1, MAX_LIMIT]
    pub fn effective_limit(&self) -> usize {
        // Clamped into 1..=100, so the conversion cannot fail
        self.limit.clamp(1, MAX_LIMIT) as usize
    }
}

fn parse_leading_int(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let (sign, digits) = match raw.as_bytes().first() {
        Some(b'-') => (-1, &raw[1..]),
        Some(b'+') => (1, &raw[1..]),
        _ => (1, raw),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Saturate instead of failing on absurdly long digit runs
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(sign * value)
}

/// Filter `items` by name and cut out the requested page.
///
/// `total_pages` never drops below 1, so an empty result still reports "page 1 of 1".
pub fn query(items: &[Item], params: &QueryParams) -> ItemsPage {
    let page = params.effective_page();
    let limit = params.effective_limit();

    let needle = params
        .search
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let filtered: Vec<&Item> = match needle.as_deref() {
        Some(needle) => items.iter().filter(|item| item.name_matches(needle)).collect(),
        None => items.iter().collect(),
    };

    let start = (page - 1).saturating_mul(limit);
    let page_items = filtered
        .iter()
        .skip(start)
        .take(limit)
        .map(|item| (*item).clone())
        .collect();

    ItemsPage {
        items: page_items,
        page,
        total_pages: filtered.len().div_ceil(limit).max(1),
    }
}
