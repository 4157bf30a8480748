// src/domain/review/mod.rs

pub mod entity;
pub mod invariants;

pub use entity::{Review, ReviewDraft};
pub use invariants::validate_review_draft;
