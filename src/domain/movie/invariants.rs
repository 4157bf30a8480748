use super::entity::MovieDraft;
use crate::domain::{DomainError, DomainResult};

/// Validates all Movie invariants
/// These are the absolute rules that must hold before a Movie reaches storage
pub fn validate_movie_draft(draft: &MovieDraft) -> DomainResult<()> {
    validate_title(&draft.title)?;
    validate_description(draft.description.as_deref())?;
    validate_release_year(draft.release_year)?;
    Ok(())
}

/// Title cannot be empty
fn validate_title(title: &str) -> DomainResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "movie must have a title".to_string(),
        ));
    }
    Ok(())
}

/// Description, if present, must have at least 5 characters
fn validate_description(description: Option<&str>) -> DomainResult<()> {
    if let Some(text) = description {
        if text.chars().count() < 5 {
            return Err(DomainError::InvariantViolation(
                "description should be at least 5 characters".to_string(),
            ));
        }
    }
    Ok(())
}

/// Release year, if present, must be after 1900
fn validate_release_year(year: Option<i32>) -> DomainResult<()> {
    if let Some(year) = year {
        if year <= 1900 {
            return Err(DomainError::InvariantViolation(format!(
                "release year {} should be greater than 1900",
                year
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, description: Option<&str>, release_year: Option<i32>) -> MovieDraft {
        MovieDraft {
            title: title.to_string(),
            description: description.map(String::from),
            release_year,
        }
    }

    #[test]
    fn test_valid_movie() {
        let d = draft("Blade Runner", Some("Do androids dream?"), Some(1982));
        assert!(validate_movie_draft(&d).is_ok());
    }

    #[test]
    fn test_empty_title_fails() {
        let d = draft("   ", None, None);
        assert!(validate_movie_draft(&d).is_err());
    }

    #[test]
    fn test_short_description_fails() {
        let d = draft("Brazil", Some("meh"), None);
        assert!(validate_movie_draft(&d).is_err());
    }

    #[test]
    fn test_missing_description_is_fine() {
        let d = draft("Brazil", None, None);
        assert!(validate_movie_draft(&d).is_ok());
    }

    #[test]
    fn test_year_1900_fails() {
        let d = draft("Old One", None, Some(1900));
        assert!(validate_movie_draft(&d).is_err());
    }

    #[test]
    fn test_year_1901_is_fine() {
        let d = draft("Less Old One", None, Some(1901));
        assert!(validate_movie_draft(&d).is_ok());
    }
}
