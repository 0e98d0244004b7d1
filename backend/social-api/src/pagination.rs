//! Offset pagination shared by the list endpoints.
//!
//! Query parameters keep the client-facing camelCase names (`pageNum`,
//! `pageSize`). They are read as strings so that garbage values fall back to
//! the defaults instead of failing the request.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_NUM: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    #[serde(rename = "pageNum")]
    pub page_num: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
    pub keyword: Option<String>,
}

/// A normalised page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub num: i64,
    pub size: i64,
    pub keyword: Option<String>,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            num: DEFAULT_PAGE_NUM,
            size: DEFAULT_PAGE_SIZE,
            keyword: None,
        }
    }
}

fn positive_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v >= 1)
        .unwrap_or(default)
}

impl From<&PageQuery> for Page {
    fn from(query: &PageQuery) -> Self {
        let keyword = query
            .keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(String::from);

        Self {
            num: positive_or(query.page_num.as_deref(), DEFAULT_PAGE_NUM),
            size: positive_or(query.page_size.as_deref(), DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE),
            keyword,
        }
    }
}

impl Page {
    pub fn limit(&self) -> i64 {
        self.size
    }

    /// Saturates for page numbers far past the last row.
    pub fn offset(&self) -> i64 {
        (self.num - 1).saturating_mul(self.size)
    }

    /// `%keyword%` for ILIKE filters.
    pub fn keyword_pattern(&self) -> Option<String> {
        self.keyword.as_ref().map(|k| format!("%{}%", k))
    }

    /// Case-insensitive substring match against any of `fields`; true when
    /// no keyword is set.
    pub fn matches_keyword(&self, fields: &[&str]) -> bool {
        match &self.keyword {
            None => true,
            Some(keyword) => {
                let needle = keyword.to_lowercase();
                fields.iter().any(|f| f.to_lowercase().contains(&needle))
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageResponse<T> {
    pub page_num: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub total_records: i64,
    pub data: Vec<T>,
}

impl<T> PageResponse<T> {
    pub fn new(page: &Page, total_records: i64, data: Vec<T>) -> Self {
        let total_pages = (total_records + page.size - 1) / page.size;
        Self {
            page_num: page.num,
            page_size: page.size,
            total_pages,
            total_records,
            data,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PageResponse<U> {
        PageResponse {
            page_num: self.page_num,
            page_size: self.page_size,
            total_pages: self.total_pages,
            total_records: self.total_records,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(num: Option<&str>, size: Option<&str>, keyword: Option<&str>) -> PageQuery {
        PageQuery {
            page_num: num.map(String::from),
            page_size: size.map(String::from),
            keyword: keyword.map(String::from),
        }
    }

    #[test]
    fn test_defaults_when_missing() {
        let page = Page::from(&PageQuery::default());
        assert_eq!(page, Page::default());
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 10);
    }

    #[test]
    fn test_garbage_and_non_positive_fall_back() {
        let page = Page::from(&query(Some("abc"), Some("0"), None));
        assert_eq!(page.num, 1);
        assert_eq!(page.size, 10);

        let page = Page::from(&query(Some("-3"), Some("-1"), None));
        assert_eq!(page.num, 1);
        assert_eq!(page.size, 10);
    }

    #[test]
    fn test_offset_and_cap() {
        let page = Page::from(&query(Some("3"), Some("20"), None));
        assert_eq!(page.offset(), 40);

        let page = Page::from(&query(Some("1"), Some("1000"), None));
        assert_eq!(page.size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_huge_page_number_saturates_offset() {
        let page = Page::from(&query(Some("9223372036854775807"), Some("10"), None));
        assert_eq!(page.num, i64::MAX);
        assert_eq!(page.offset(), i64::MAX);

        let resp = PageResponse::new(&page, 3, Vec::<i64>::new());
        assert_eq!(resp.total_pages, 1);
        assert!(resp.data.is_empty());
    }

    #[test]
    fn test_keyword_is_trimmed_and_blank_ignored() {
        let page = Page::from(&query(None, None, Some("  cat ")));
        assert_eq!(page.keyword.as_deref(), Some("cat"));
        assert_eq!(page.keyword_pattern().as_deref(), Some("%cat%"));

        let page = Page::from(&query(None, None, Some("   ")));
        assert_eq!(page.keyword, None);
        assert!(page.matches_keyword(&["anything"]));
    }

    #[test]
    fn test_matches_keyword_case_insensitive() {
        let page = Page::from(&query(None, None, Some("CaT")));
        assert!(page.matches_keyword(&["dog", "my cats"]));
        assert!(!page.matches_keyword(&["dog", "bird"]));
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page = Page::from(&query(Some("1"), Some("10"), None));
        assert_eq!(PageResponse::new(&page, 0, Vec::<i64>::new()).total_pages, 0);
        assert_eq!(PageResponse::new(&page, 10, Vec::<i64>::new()).total_pages, 1);
        assert_eq!(PageResponse::new(&page, 11, Vec::<i64>::new()).total_pages, 2);
    }

    #[test]
    fn test_map_keeps_page_info() {
        let page = Page::from(&query(Some("2"), Some("2"), None));
        let mapped = PageResponse::new(&page, 5, vec![1, 2]).map(|n| n * 10);
        assert_eq!(mapped.data, vec![10, 20]);
        assert_eq!(mapped.page_num, 2);
        assert_eq!(mapped.total_pages, 3);
    }
}
