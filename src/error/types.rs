// src/error/types.rs
use crate::domain::DomainError;
use rusqlite::ErrorCode;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] DomainError),

    #[error("Movie not found")]
    MovieNotFound,

    #[error("Review not found")]
    ReviewNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("User has already reviewed this movie")]
    DuplicateReview,

    #[error("Username already taken")]
    DuplicateIdentity,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

impl AppError {
    /// Classify a storage error raised by an insert that can race past a
    /// pre-check. Uniqueness failures on the known constraints become their
    /// specific duplicate kinds; every other constraint failure stays a
    /// generic `ConstraintViolation`. This translation is the only defense
    /// against the check-then-act race, so callers on those paths must use
    /// it instead of a plain `From`.
    pub fn classify_constraint(err: rusqlite::Error) -> AppError {
        if let rusqlite::Error::SqliteFailure(e, Some(msg)) = &err {
            if e.code == ErrorCode::ConstraintViolation {
                if msg.contains("users.username") {
                    return AppError::DuplicateIdentity;
                }
                if msg.contains("reviews.user_id") && msg.contains("reviews.movie_id") {
                    return AppError::DuplicateReview;
                }
                return AppError::ConstraintViolation(msg.clone());
            }
        }
        AppError::Database(err)
    }
}

pub type AppResult<T> = Result<T, AppError>;
