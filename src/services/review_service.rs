// src/services/review_service.rs
//
// Review lifecycle: a (user, movie) pair moves absent -> active on create,
// stays active on update and returns to absent on delete. Every transition
// recomputes the movie's avg_rating inside the same transaction, so no
// commit ever publishes a stale aggregate.

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::db::{get_connection, ConnectionPool};
use crate::domain::paging::Page;
use crate::domain::review::{validate_review_draft, Review, ReviewDraft};
use crate::error::{AppError, AppResult};
use crate::repositories::{MovieRepository, NewReview, ReviewRepository};

/// Aggregate result for listing a movie's reviews. The optional sections
/// mirror the listing options and are omitted from serialized output when
/// not requested.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewListing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_rating: Option<f64>,

    /// Count of all reviews for the movie
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_ratings: Option<i64>,

    /// Count of reviews carrying text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_reviews: Option<i64>,

    pub reviews: Vec<Review>,
}

/// Which aggregate sections to include alongside the review page.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewListingOptions {
    pub avg_rating: bool,
    pub no_ratings: bool,
    pub no_reviews: bool,
}

pub struct ReviewService {
    pool: Arc<ConnectionPool>,
    review_repo: Arc<dyn ReviewRepository>,
    movie_repo: Arc<dyn MovieRepository>,
}

impl ReviewService {
    pub fn new(
        pool: Arc<ConnectionPool>,
        review_repo: Arc<dyn ReviewRepository>,
        movie_repo: Arc<dyn MovieRepository>,
    ) -> Self {
        Self {
            pool,
            review_repo,
            movie_repo,
        }
    }

    /// Create the caller's review for a movie.
    ///
    /// The existence pre-checks are pessimistic; the uniqueness constraint
    /// at insert time is the optimistic safety net for a concurrent create
    /// that races past them, and surfaces as `DuplicateReview` via the
    /// storage-error classification.
    pub fn create_review(
        &self,
        user_id: i64,
        movie_id: i64,
        draft: &ReviewDraft,
    ) -> AppResult<Review> {
        validate_review_draft(draft)?;

        let mut conn = get_connection(&self.pool)?;
        let tx = conn.transaction()?;

        if self.movie_repo.get_by_id(&tx, movie_id)?.is_none() {
            return Err(AppError::MovieNotFound);
        }
        if self
            .review_repo
            .get_by_user_and_movie(&tx, user_id, movie_id)?
            .is_some()
        {
            return Err(AppError::DuplicateReview);
        }

        let review = self.review_repo.insert(
            &tx,
            &NewReview {
                rate: draft.rate,
                text: draft.text.clone(),
                rated_at: Utc::now(),
                user_id,
                movie_id,
            },
        )?;

        let avg = self.movie_repo.recompute_avg_rating(&tx, movie_id)?;
        tx.commit()?;

        log::debug!(
            "review {} created for movie {} by user {}; avg_rating now {}",
            review.id,
            movie_id,
            user_id,
            avg
        );
        Ok(review)
    }

    /// Overwrite the caller's existing review (rate, text, timestamp).
    /// Lookup is by (user, movie), so a review owned by someone else is
    /// indistinguishable from an absent one.
    pub fn update_review(
        &self,
        user_id: i64,
        movie_id: i64,
        draft: &ReviewDraft,
    ) -> AppResult<Review> {
        validate_review_draft(draft)?;

        let mut conn = get_connection(&self.pool)?;
        let tx = conn.transaction()?;

        let existing = self
            .review_repo
            .get_by_user_and_movie(&tx, user_id, movie_id)?
            .ok_or(AppError::ReviewNotFound)?;

        let rated_at = Utc::now();
        self.review_repo
            .update(&tx, existing.id, draft.rate, draft.text.as_deref(), rated_at)?;
        self.movie_repo.recompute_avg_rating(&tx, movie_id)?;
        tx.commit()?;

        Ok(Review {
            id: existing.id,
            rate: draft.rate,
            text: draft.text.clone(),
            rated_at,
            user_id,
            movie_id,
        })
    }

    /// Delete the caller's review and return its id.
    ///
    /// The recompute runs even if the movie row vanished concurrently: it
    /// then updates zero rows and the delete still succeeds.
    pub fn delete_review(&self, user_id: i64, movie_id: i64) -> AppResult<i64> {
        let mut conn = get_connection(&self.pool)?;
        let tx = conn.transaction()?;

        let existing = self
            .review_repo
            .get_by_user_and_movie(&tx, user_id, movie_id)?
            .ok_or(AppError::ReviewNotFound)?;

        self.review_repo
            .delete_by_user_and_movie(&tx, user_id, movie_id)?;
        self.movie_repo.recompute_avg_rating(&tx, movie_id)?;
        tx.commit()?;

        log::debug!(
            "review {} deleted for movie {} by user {}",
            existing.id,
            movie_id,
            user_id
        );
        Ok(existing.id)
    }

    /// One keyset page of a movie's reviews plus the requested aggregate
    /// sections.
    pub fn movie_reviews(
        &self,
        movie_id: i64,
        page: &Page,
        options: ReviewListingOptions,
    ) -> AppResult<ReviewListing> {
        page.validate()?;

        let conn = get_connection(&self.pool)?;

        let movie = self
            .movie_repo
            .get_by_id(&conn, movie_id)?
            .ok_or(AppError::MovieNotFound)?;

        let avg_rating = options.avg_rating.then_some(movie.avg_rating);
        let no_ratings = if options.no_ratings {
            Some(self.review_repo.count_for_movie(&conn, movie_id)?)
        } else {
            None
        };
        let no_reviews = if options.no_reviews {
            Some(self.review_repo.count_with_text_for_movie(&conn, movie_id)?)
        } else {
            None
        };

        let reviews = self.review_repo.list_by_movie(&conn, movie_id, page)?;

        Ok(ReviewListing {
            avg_rating,
            no_ratings,
            no_reviews,
            reviews,
        })
    }

    /// Point lookup of one user's review of one movie.
    pub fn user_review_on_movie(&self, user_id: i64, movie_id: i64) -> AppResult<Review> {
        let conn = get_connection(&self.pool)?;
        self.review_repo
            .get_by_user_and_movie(&conn, user_id, movie_id)?
            .ok_or(AppError::ReviewNotFound)
    }
}
