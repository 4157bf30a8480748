use crate::domain::{DomainError, DomainResult};

/// Username cannot be empty
pub fn validate_username(username: &str) -> DomainResult<()> {
    if username.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "username cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_username() {
        assert!(validate_username("alice").is_ok());
    }

    #[test]
    fn test_blank_username_fails() {
        assert!(validate_username("  ").is_err());
    }
}
