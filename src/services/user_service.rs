// src/services/user_service.rs

use std::sync::Arc;

use crate::db::{get_connection, ConnectionPool};
use crate::domain::paging::Page;
use crate::domain::review::Review;
use crate::domain::user::{validate_username, User};
use crate::error::{AppError, AppResult};
use crate::repositories::{MovieRepository, ReviewRepository, UserRepository};

pub struct UserService {
    pool: Arc<ConnectionPool>,
    user_repo: Arc<dyn UserRepository>,
    review_repo: Arc<dyn ReviewRepository>,
    movie_repo: Arc<dyn MovieRepository>,
}

impl UserService {
    pub fn new(
        pool: Arc<ConnectionPool>,
        user_repo: Arc<dyn UserRepository>,
        review_repo: Arc<dyn ReviewRepository>,
        movie_repo: Arc<dyn MovieRepository>,
    ) -> Self {
        Self {
            pool,
            user_repo,
            review_repo,
            movie_repo,
        }
    }

    /// Register an account. The caller supplies the credential hash; hashing
    /// and comparison belong to the auth collaborator.
    ///
    /// Uniqueness follows the same pattern as review creation: a pessimistic
    /// pre-check, with the username constraint at insert time catching the
    /// race and surfacing as `DuplicateIdentity`.
    pub fn register_user(&self, username: &str, password_hash: &str) -> AppResult<User> {
        validate_username(username)?;

        let conn = get_connection(&self.pool)?;

        if self.user_repo.get_by_username(&conn, username)?.is_some() {
            return Err(AppError::DuplicateIdentity);
        }

        let user = self.user_repo.insert(&conn, username, password_hash)?;
        log::info!("user {} registered: {}", user.id, user.username);
        Ok(user)
    }

    pub fn get_user(&self, user_id: i64) -> AppResult<Option<User>> {
        let conn = get_connection(&self.pool)?;
        self.user_repo.get_by_id(&conn, user_id)
    }

    pub fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let conn = get_connection(&self.pool)?;
        self.user_repo.get_by_username(&conn, username)
    }

    pub fn list_users(&self, page: &Page) -> AppResult<Vec<User>> {
        page.validate()?;

        let conn = get_connection(&self.pool)?;
        self.user_repo.list(&conn, page)
    }

    /// One keyset page of the user's reviews, ordered by review id.
    pub fn list_user_reviews(&self, user_id: i64, page: &Page) -> AppResult<Vec<Review>> {
        page.validate()?;

        let conn = get_connection(&self.pool)?;

        if self.user_repo.get_by_id(&conn, user_id)?.is_none() {
            return Err(AppError::UserNotFound);
        }

        self.review_repo.list_by_user(&conn, user_id, page)
    }

    /// Delete an account. The user's reviews go with it via the foreign-key
    /// cascade, so every movie the user had reviewed gets its average
    /// recomputed inside the same transaction.
    pub fn delete_user(&self, user_id: i64) -> AppResult<i64> {
        let mut conn = get_connection(&self.pool)?;
        let tx = conn.transaction()?;

        if self.user_repo.get_by_id(&tx, user_id)?.is_none() {
            return Err(AppError::UserNotFound);
        }

        let affected_movies = self.review_repo.movie_ids_reviewed_by_user(&tx, user_id)?;
        self.user_repo.delete(&tx, user_id)?;
        for movie_id in &affected_movies {
            self.movie_repo.recompute_avg_rating(&tx, *movie_id)?;
        }
        tx.commit()?;

        log::info!(
            "user {} deleted; recomputed ratings for {} movie(s)",
            user_id,
            affected_movies.len()
        );
        Ok(user_id)
    }
}
