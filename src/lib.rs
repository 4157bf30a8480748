// src/lib.rs
// ReviewHub - Movie review catalog core
//
// Architecture:
// - Domain-centric: entities and pure invariant checks live in domain/
// - Explicit: transactions are opened by services and passed down; no
//   implicit sessions, no hidden recomputation
// - Derived data: movies.avg_rating is a cache over the review rows and is
//   recomputed inside every transaction that changes them
//
// The HTTP routing, authentication and admin surfaces are external
// collaborators; this crate is the engine they call into.

// ============================================================================
// MODULES
// ============================================================================

pub mod db;
pub mod domain;
pub mod error;
pub mod repositories;
pub mod services;

// ============================================================================
// PUBLIC API - Domain Entities
// ============================================================================

pub use domain::{
    validate_movie_draft,
    validate_review_draft,
    validate_username,
    // Movie
    Movie,
    MovieDraft,
    // Paging / filtering
    MovieQuery,
    Page,
    // Review
    Review,
    ReviewDraft,
    // User
    User,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{
    MovieRepository,
    NewReview,
    ReviewRepository,
    SqliteMovieRepository,
    SqliteReviewRepository,
    SqliteUserRepository,
    UserRepository,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    MovieService,
    ReviewListing,
    ReviewListingOptions,
    ReviewService,
    UserService,
};
