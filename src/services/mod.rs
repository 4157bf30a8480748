// src/services/mod.rs
//
// Services Module - Orchestration Layer
//
// Services own transaction scope: each mutating operation opens one
// transaction covering the precondition checks, the row mutation and the
// aggregate recompute, and commits only on clean completion. Repositories
// never commit.

pub mod movie_service;
pub mod review_service;
pub mod user_service;


// Re-export all services and their types
pub use movie_service::MovieService;

pub use review_service::{ReviewListing, ReviewListingOptions, ReviewService};

pub use user_service::UserService;
