//! Perfection predicate and input checks shared by the resolver and the game.

use crate::constants::{
    CENTIS_PER_SECOND, MAX_MESSAGE_CHARS, MAX_NAME_CHARS, TARGET_CENTIS, TARGET_SECONDS,
};
use crate::error::ValidationError;

/// Exact match against the target. No tolerance band.
#[allow(clippy::float_cmp)]
pub fn is_perfect(time: f64) -> bool {
    time == TARGET_SECONDS
}

pub fn is_perfect_centis(centis: u32) -> bool {
    centis == TARGET_CENTIS
}

pub fn centis_to_seconds(centis: u32) -> f64 {
    f64::from(centis) / CENTIS_PER_SECOND
}

/// Trim a player name and check its length. Names stay case-sensitive.
pub fn normalize_name(raw: &str) -> Result<&str, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingName);
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(ValidationError::NameTooLong {
            max: MAX_NAME_CHARS,
        });
    }
    Ok(name)
}

pub fn validate_time(time: f64) -> Result<(), ValidationError> {
    if !time.is_finite() || time < 0.0 {
        return Err(ValidationError::InvalidTime);
    }
    Ok(())
}

pub fn validate_attempts(attempts: u32) -> Result<(), ValidationError> {
    if attempts == 0 {
        return Err(ValidationError::ZeroAttempts);
    }
    Ok(())
}

/// Trim an optional message; blank collapses to `None`.
pub fn normalize_message(raw: Option<&str>) -> Result<Option<&str>, ValidationError> {
    let Some(message) = raw.map(str::trim).filter(|m| !m.is_empty()) else {
        return Ok(None);
    };
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ValidationError::MessageTooLong {
            max: MAX_MESSAGE_CHARS,
        });
    }
    Ok(Some(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_target_is_perfect() {
        assert!(is_perfect(10.0));
        assert!(is_perfect(10.00));
        assert!(!is_perfect(9.99));
        assert!(!is_perfect(10.01));
        assert!(!is_perfect(9.995));
        assert!(!is_perfect(f64::NAN));
    }

    #[test]
    fn target_centis_converts_to_exact_target() {
        assert!(is_perfect(centis_to_seconds(TARGET_CENTIS)));
        assert!(is_perfect_centis(1_000));
        assert!(!is_perfect(centis_to_seconds(999)));
    }

    #[test]
    fn names_are_trimmed_and_bounded() {
        assert_eq!(normalize_name("  Ada  "), Ok("Ada"));
        assert_eq!(normalize_name("   "), Err(ValidationError::MissingName));
        let long = "x".repeat(MAX_NAME_CHARS + 1);
        assert_eq!(
            normalize_name(&long),
            Err(ValidationError::NameTooLong {
                max: MAX_NAME_CHARS
            })
        );
    }

    #[test]
    fn time_must_be_finite_and_non_negative() {
        assert!(validate_time(0.0).is_ok());
        assert!(validate_time(12.5).is_ok());
        assert_eq!(validate_time(-0.01), Err(ValidationError::InvalidTime));
        assert_eq!(validate_time(f64::INFINITY), Err(ValidationError::InvalidTime));
    }

    #[test]
    fn blank_message_is_none() {
        assert_eq!(normalize_message(None), Ok(None));
        assert_eq!(normalize_message(Some("  ")), Ok(None));
        assert_eq!(normalize_message(Some(" hi ")), Ok(Some("hi")));
        assert!(normalize_message(Some(&"m".repeat(MAX_MESSAGE_CHARS + 1))).is_err());
    }
}
