use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's rating of a movie. At most one review exists per
/// (user_id, movie_id) pair; the storage layer enforces the uniqueness.
///
/// Relationships are held as foreign-key ids, never as embedded entities.
/// Resolving the user or the movie is an explicit lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,

    /// Rating in [1, 10] (the schema tolerates a legacy 0, see invariants)
    pub rate: i32,

    /// Optional free text (at least 5 characters when present)
    pub text: Option<String>,

    /// Set by the service at creation and overwritten on every update
    pub rated_at: DateTime<Utc>,

    pub user_id: i64,
    pub movie_id: i64,
}

/// Caller-supplied fields for creating or updating a review. Identity,
/// ownership and the timestamp are all server-assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDraft {
    pub rate: i32,
    pub text: Option<String>,
}
