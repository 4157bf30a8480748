// src/domain/paging.rs
//
// Keyset pagination and listing filters.
//
// The cursor is the row id: `after_id` is an exclusive lower bound and the
// page is `WHERE id > after_id ORDER BY id LIMIT limit`. New rows always get
// larger ids, so already-returned pages never shift under concurrent
// inserts. Deleting an already-seen row is not compensated, and there is no
// reverse traversal.

use crate::domain::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Score bound above the maximum rate, so the default filter excludes nothing.
pub const UNBOUNDED_SCORE: f64 = 11.0;

/// One keyset page request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Page {
    /// Exclusive lower bound on id; 0 starts from the beginning
    pub after_id: i64,
    /// Maximum number of rows returned; must be positive
    pub limit: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            after_id: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl Page {
    pub fn new(after_id: i64, limit: i64) -> Self {
        Self { after_id, limit }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.limit <= 0 {
            return Err(DomainError::InvariantViolation(format!(
                "page limit {} must be positive",
                self.limit
            )));
        }
        Ok(())
    }
}

/// Movie listing query. All filters combine with AND.
///
/// Known limitation carried over from the ordering design: `after_id` always
/// bounds `id`, so with `sort_by_avg_rating` set the cursor is a pure
/// exclusion filter rather than a true boundary for the rating order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieQuery {
    pub page: Page,

    /// Substring match on title (database-default case handling)
    pub title_contains: Option<String>,

    /// Exact match on release year
    pub release_year: Option<i32>,

    /// Upper-exclusive bound on avg_rating; defaults to [`UNBOUNDED_SCORE`]
    pub before_score: Option<f64>,

    /// When set: order by avg_rating descending, id ascending as tiebreak.
    /// When unset: order by id ascending.
    pub sort_by_avg_rating: bool,
}

impl MovieQuery {
    pub fn validate(&self) -> DomainResult<()> {
        self.page.validate()
    }

    pub fn before_score(&self) -> f64 {
        self.before_score.unwrap_or(UNBOUNDED_SCORE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page() {
        let page = Page::default();
        assert_eq!(page.after_id, 0);
        assert_eq!(page.limit, 20);
        assert!(page.validate().is_ok());
    }

    #[test]
    fn test_zero_limit_rejected() {
        assert!(Page::new(0, 0).validate().is_err());
        assert!(Page::new(0, -3).validate().is_err());
    }

    #[test]
    fn test_default_query_is_unbounded() {
        let query = MovieQuery::default();
        assert_eq!(query.before_score(), UNBOUNDED_SCORE);
        assert!(!query.sort_by_avg_rating);
        assert!(query.validate().is_ok());
    }
}
