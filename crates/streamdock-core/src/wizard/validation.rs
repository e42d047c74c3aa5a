//! Local checks that run before any remote call.

use super::errors::SessionError;

pub const MIN_STREAM_NAME_LEN: usize = 2;

/// Validate a stream name, returning it trimmed.
pub fn validate_stream_name(name: &str) -> Result<String, SessionError> {
    let trimmed = name.trim();
    if trimmed.chars().count() < MIN_STREAM_NAME_LEN {
        return Err(SessionError::validation(
            "Please choose a name for your stream!",
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_name_trimmed() {
        assert_eq!(validate_stream_name("  Roof Plan ").unwrap(), "Roof Plan");
    }

    #[test]
    fn test_two_chars_is_enough() {
        assert_eq!(validate_stream_name("L1").unwrap(), "L1");
    }

    #[test]
    fn test_short_names_rejected() {
        for name in ["", "a", "  ", " b "] {
            assert!(
                matches!(
                    validate_stream_name(name),
                    Err(SessionError::Validation { .. })
                ),
                "expected '{}' to be rejected",
                name
            );
        }
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        assert!(validate_stream_name("é").is_err());
        assert!(validate_stream_name("éé").is_ok());
    }
}
