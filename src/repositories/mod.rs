// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO invariant enforcement
// - NO cross-repository calls
// - Explicit SQL only
//
// Every method takes a &Connection so that multi-statement sequences run
// inside whatever ambient transaction the calling service has opened.

pub mod movie_repository;
pub mod review_repository;
pub mod user_repository;

pub use movie_repository::{MovieRepository, SqliteMovieRepository};
pub use review_repository::{NewReview, ReviewRepository, SqliteReviewRepository};
pub use user_repository::{SqliteUserRepository, UserRepository};
