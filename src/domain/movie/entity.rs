use serde::{Deserialize, Serialize};

/// A catalog entry. `avg_rating` is derived state: it caches the arithmetic
/// mean of the movie's review rates and is recomputed inside every
/// transaction that touches those reviews. It is never written directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Server-assigned identity, monotonic (used as the keyset cursor)
    pub id: i64,

    /// Title (required, non-empty)
    pub title: String,

    /// Optional description (at least 5 characters when present)
    pub description: Option<String>,

    /// Optional release year (must be > 1900 when present)
    pub release_year: Option<i32>,

    /// Cached mean of review rates; 0.0 when the movie has no reviews
    pub avg_rating: f64,
}

/// Caller-supplied fields for creating a movie. The id and the initial
/// `avg_rating` of 0.0 are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDraft {
    pub title: String,
    pub description: Option<String>,
    pub release_year: Option<i32>,
}
