// src/domain/movie/mod.rs

pub mod entity;
pub mod invariants;

pub use entity::{Movie, MovieDraft};
pub use invariants::validate_movie_draft;
