//! Listing query builder: turns raw list parameters into a post filter and a
//! pagination window, and computes the pagination envelope.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Post, PostStatus};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;
/// Largest offset a SQL `OFFSET` can carry (`BIGINT`).
pub const MAX_SKIP: u64 = i64::MAX as u64;

/// Raw list parameters as they arrive on the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListParams {
    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page.to_string());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit.to_string());
        self
    }

    pub fn category(mut self, category: Uuid) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn status(mut self, status: PostStatus) -> Self {
        self.status = Some(status.as_str().to_string());
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}

/// Exact-match constraint on one field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldFilter<T> {
    #[default]
    Any,
    Eq(T),
    /// The requested value cannot exist in the store, so nothing matches.
    Unmatchable,
}

impl<T: PartialEq> FieldFilter<T> {
    fn parse<E>(raw: Option<&str>, parse: impl FnOnce(&str) -> Result<T, E>) -> Self {
        match raw {
            None | Some("") => FieldFilter::Any,
            Some(value) => parse(value).map_or(FieldFilter::Unmatchable, FieldFilter::Eq),
        }
    }

    pub fn accepts(&self, value: &T) -> bool {
        match self {
            FieldFilter::Any => true,
            FieldFilter::Eq(expected) => expected == value,
            FieldFilter::Unmatchable => false,
        }
    }
}

/// Conjunction of the clauses present on a list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub category: FieldFilter<Uuid>,
    pub status: FieldFilter<PostStatus>,
    /// Lowercased search words; `Some(empty)` when the search text had no words.
    pub search: Option<Vec<String>>,
}

impl PostFilter {
    /// True when no post can satisfy the filter, so the store need not be queried.
    pub fn is_unsatisfiable(&self) -> bool {
        matches!(self.category, FieldFilter::Unmatchable)
            || matches!(self.status, FieldFilter::Unmatchable)
            || self.search.as_ref().is_some_and(Vec::is_empty)
    }

    /// Evaluate the filter against a post held in memory.
    ///
    /// Search matches when any query word occurs as a word of the title or
    /// content, ignoring case.
    pub fn matches(&self, post: &Post) -> bool {
        if !self.category.accepts(&post.category_id) || !self.status.accepts(&post.status) {
            return false;
        }

        match &self.search {
            None => true,
            Some(terms) => {
                let words: Vec<String> = tokenize(&post.title)
                    .chain(tokenize(&post.content))
                    .collect();
                terms.iter().any(|term| words.contains(term))
            }
        }
    }
}

/// Split text into lowercased alphanumeric words.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
}

/// A fully resolved list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    pub filter: PostFilter,
    pub page: u64,
    pub limit: u64,
}

impl PostQuery {
    pub fn from_params(params: &ListParams) -> Self {
        let page = parse_positive(params.page.as_deref()).unwrap_or(DEFAULT_PAGE);
        let limit = parse_positive(params.limit.as_deref())
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);

        let search = params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                let mut terms: Vec<String> = Vec::new();
                for term in tokenize(s) {
                    if !terms.contains(&term) {
                        terms.push(term);
                    }
                }
                terms
            });

        Self {
            filter: PostFilter {
                category: FieldFilter::parse(params.category.as_deref(), Uuid::parse_str),
                status: FieldFilter::parse(params.status.as_deref(), |s| s.parse::<PostStatus>()),
                search,
            },
            page,
            limit,
        }
    }

    /// Number of matching posts that precede the requested page, capped at
    /// [`MAX_SKIP`].
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit).min(MAX_SKIP)
    }

    pub fn paginate(&self, total_posts: u64) -> Pagination {
        Pagination {
            current_page: self.page,
            total_pages: total_posts.div_ceil(self.limit),
            total_posts,
            limit: self.limit,
        }
    }
}

/// Read a leading base-10 integer the way form fields are usually coerced;
/// anything non-numeric or below one yields `None`.
fn parse_positive(raw: Option<&str>) -> Option<u64> {
    let raw = raw?.trim_start();
    let (negative, digits) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    let value: u64 = digits[..end].parse().ok()?;
    (!negative && value >= 1).then_some(value)
}

/// Pagination envelope returned with a post listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_posts: u64,
    pub limit: u64,
}

/// One window of results plus the size of the whole match set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PostDraft;

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        let mut params = ListParams::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "page" => params.page = value,
                "limit" => params.limit = value,
                "category" => params.category = value,
                "status" => params.status = value,
                "search" => params.search = value,
                _ => unreachable!(),
            }
        }
        params
    }

    fn post(title: &str, content: &str, category_id: Uuid, status: PostStatus) -> Post {
        Post::new(PostDraft {
            title: title.to_string(),
            content: content.to_string(),
            author: "A".to_string(),
            category_id,
            featured_image: None,
            status: Some(status),
            tags: None,
        })
    }

    #[test]
    fn test_defaults() {
        let query = PostQuery::from_params(&ListParams::default());
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
        assert_eq!(query.skip(), 0);
        assert_eq!(query.filter, PostFilter::default());
    }

    #[test]
    fn test_skip() {
        let query = PostQuery::from_params(&params(&[("page", "3"), ("limit", "7")]));
        assert_eq!(query.skip(), 14);
    }

    #[test]
    fn test_skip_fits_bigint() {
        let query = PostQuery::from_params(&params(&[("page", "1000000000000000000")]));
        assert_eq!(query.page, 1_000_000_000_000_000_000);
        assert_eq!(query.skip(), MAX_SKIP);
        assert_eq!(query.paginate(3).current_page, 1_000_000_000_000_000_000);
    }

    #[test]
    fn test_page_and_limit_coercion() {
        for (raw, expected) in [("abc", 1), ("0", 1), ("-4", 1), ("2abc", 2), (" 5", 5)] {
            let query = PostQuery::from_params(&params(&[("page", raw)]));
            assert_eq!(query.page, expected, "page {raw:?}");
        }
        for (raw, expected) in [("0", 10), ("-1", 10), ("x", 10), ("25", 25), ("5000", 100)] {
            let query = PostQuery::from_params(&params(&[("limit", raw)]));
            assert_eq!(query.limit, expected, "limit {raw:?}");
        }
    }

    #[test]
    fn test_pagination_math() {
        let query = PostQuery::from_params(&params(&[("page", "2"), ("limit", "10")]));
        assert_eq!(query.paginate(0).total_pages, 0);
        assert_eq!(query.paginate(10).total_pages, 1);
        assert_eq!(query.paginate(11).total_pages, 2);

        let pagination = query.paginate(25);
        assert_eq!(
            pagination,
            Pagination {
                current_page: 2,
                total_pages: 3,
                total_posts: 25,
                limit: 10,
            }
        );
    }

    #[test]
    fn test_filter_clauses() {
        let id = Uuid::new_v4();
        let query = PostQuery::from_params(&params(&[
            ("category", &id.to_string()),
            ("status", "published"),
            ("search", "  Rust rust async "),
        ]));
        assert_eq!(query.filter.category, FieldFilter::Eq(id));
        assert_eq!(query.filter.status, FieldFilter::Eq(PostStatus::Published));
        assert_eq!(
            query.filter.search,
            Some(vec!["rust".to_string(), "async".to_string()])
        );
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let query = PostQuery::from_params(&params(&[
            ("category", ""),
            ("status", ""),
            ("search", "   "),
        ]));
        assert_eq!(query.filter, PostFilter::default());
    }

    #[test]
    fn test_unmatchable_values() {
        let query = PostQuery::from_params(&params(&[("category", "not-an-id")]));
        assert!(query.filter.is_unsatisfiable());

        let query = PostQuery::from_params(&params(&[("status", "archived")]));
        assert!(query.filter.is_unsatisfiable());

        let query = PostQuery::from_params(&params(&[("search", "?!")]));
        assert!(query.filter.is_unsatisfiable());
    }

    #[test]
    fn test_matches_intersection() {
        let tech = Uuid::new_v4();
        let life = Uuid::new_v4();
        let rust_tech = post("Rust tips", "Borrowing", tech, PostStatus::Published);
        let rust_life = post("Garden", "I rust my tools", life, PostStatus::Published);
        let go_tech = post("Go tips", "Goroutines", tech, PostStatus::Draft);

        let query = PostQuery::from_params(&params(&[
            ("search", "RUST"),
            ("category", &tech.to_string()),
        ]));
        assert!(query.filter.matches(&rust_tech));
        assert!(!query.filter.matches(&rust_life));
        assert!(!query.filter.matches(&go_tech));

        let query = PostQuery::from_params(&params(&[("status", "draft")]));
        assert!(query.filter.matches(&go_tech));
        assert!(!query.filter.matches(&rust_tech));
    }

    #[test]
    fn test_search_matches_whole_words() {
        let p = post("Trusty", "nothing here", Uuid::new_v4(), PostStatus::Draft);
        let query = PostQuery::from_params(&params(&[("search", "rust")]));
        assert!(!query.filter.matches(&p));
    }

    #[test]
    fn test_builder_round_trips_through_from_params() {
        let id = Uuid::new_v4();
        let raw = ListParams::default()
            .page(2)
            .limit(5)
            .category(id)
            .status(PostStatus::Draft)
            .search("hello");
        let query = PostQuery::from_params(&raw);
        assert_eq!(query.page, 2);
        assert_eq!(query.limit, 5);
        assert_eq!(query.filter.category, FieldFilter::Eq(id));
    }
}
