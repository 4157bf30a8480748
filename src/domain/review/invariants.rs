use super::entity::ReviewDraft;
use crate::domain::{DomainError, DomainResult};

/// Validates all Review invariants before a create or update touches storage.
///
/// The storage CHECK constraint allows rate 0 (kept for pre-existing rows);
/// this crate never produces one — the API contract is the stricter [1, 10].
pub fn validate_review_draft(draft: &ReviewDraft) -> DomainResult<()> {
    validate_rate(draft.rate)?;
    validate_text(draft.text.as_deref())?;
    Ok(())
}

fn validate_rate(rate: i32) -> DomainResult<()> {
    if !(1..=10).contains(&rate) {
        return Err(DomainError::InvariantViolation(format!(
            "rate {} must be between 1 and 10",
            rate
        )));
    }
    Ok(())
}

/// Text, if present, must have at least 5 characters
fn validate_text(text: Option<&str>) -> DomainResult<()> {
    if let Some(text) = text {
        if text.chars().count() < 5 {
            return Err(DomainError::InvariantViolation(
                "text should be at least 5 characters".to_string(),
            ));
        }
    }
    Ok(())
}
