// src/services/movie_service.rs

use std::sync::Arc;

use crate::db::{get_connection, ConnectionPool};
use crate::domain::movie::{validate_movie_draft, Movie, MovieDraft};
use crate::domain::paging::MovieQuery;
use crate::error::{AppError, AppResult};
use crate::repositories::{MovieRepository, ReviewRepository};

pub struct MovieService {
    pool: Arc<ConnectionPool>,
    movie_repo: Arc<dyn MovieRepository>,
    review_repo: Arc<dyn ReviewRepository>,
}

impl MovieService {
    pub fn new(
        pool: Arc<ConnectionPool>,
        movie_repo: Arc<dyn MovieRepository>,
        review_repo: Arc<dyn ReviewRepository>,
    ) -> Self {
        Self {
            pool,
            movie_repo,
            review_repo,
        }
    }

    pub fn create_movie(&self, draft: &MovieDraft) -> AppResult<Movie> {
        validate_movie_draft(draft)?;

        let conn = get_connection(&self.pool)?;
        let movie = self.movie_repo.insert(&conn, draft)?;

        log::info!("movie {} created: {}", movie.id, movie.title);
        Ok(movie)
    }

    pub fn get_movie(&self, movie_id: i64) -> AppResult<Option<Movie>> {
        let conn = get_connection(&self.pool)?;
        self.movie_repo.get_by_id(&conn, movie_id)
    }

    pub fn get_movie_by_title(&self, title: &str) -> AppResult<Option<Movie>> {
        let conn = get_connection(&self.pool)?;
        self.movie_repo.get_by_title(&conn, title)
    }

    pub fn list_movies(&self, query: &MovieQuery) -> AppResult<Vec<Movie>> {
        query.validate()?;

        let conn = get_connection(&self.pool)?;
        self.movie_repo.list(&conn, query)
    }

    /// Delete the movie and every review referencing it in one transaction
    /// and return the deleted id. No aggregate recompute is needed: the row
    /// carrying the aggregate is itself gone.
    pub fn delete_movie(&self, movie_id: i64) -> AppResult<i64> {
        let mut conn = get_connection(&self.pool)?;
        let tx = conn.transaction()?;

        if self.movie_repo.get_by_id(&tx, movie_id)?.is_none() {
            return Err(AppError::MovieNotFound);
        }

        let reviews_removed = self.review_repo.delete_by_movie(&tx, movie_id)?;
        self.movie_repo.delete(&tx, movie_id)?;
        tx.commit()?;

        log::info!(
            "movie {} deleted along with {} review(s)",
            movie_id,
            reviews_removed
        );
        Ok(movie_id)
    }
}
