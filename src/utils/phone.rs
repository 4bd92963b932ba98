use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::LazyLock;

static US_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+1\d{10}$").expect("static phone regex"));

/// Validates a US phone number in `+1XXXXXXXXXX` form.
pub fn validate_us_phone(phone: &str) -> AppResult<()> {
    if !US_PHONE.is_match(phone) {
        return Err(AppError::ValidationError(
            "phone must be a US number (+1xxxxxxxxxx)".to_string(),
        ));
    }
    Ok(())
}

/// Formats a phone number to `+1XXXXXXXXXX` when it has 10 digits, or 11
/// digits starting with 1. Anything else is returned unchanged.
pub fn format_us_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() == 11 && digits.starts_with('1') {
        format!("+{digits}")
    } else if digits.len() == 10 {
        format!("+1{digits}")
    } else {
        phone.to_string()
    }
}

/// Canonical form used in entitlement keys, so that `(201) 555-0147`,
/// `201-555-0147` and `+1 201 555 0147` all map to the same gate key.
/// Returns `None` for blank input.
pub fn normalize_phone_key(phone: &str) -> Option<String> {
    let trimmed = phone.trim();
    if trimmed.is_empty() {
        return None;
    }
    let formatted = format_us_phone(trimmed);
    if US_PHONE.is_match(&formatted) {
        return Some(formatted);
    }
    // non-US: keep digits only so punctuation never splits a key
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        Some(trimmed.to_string())
    } else {
        Some(format!("+{digits}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_us_phone() {
        assert!(validate_us_phone("+12345678901").is_ok());
        assert!(validate_us_phone("+1234567890").is_err());
        assert!(validate_us_phone("12345678901").is_err());
        assert!(validate_us_phone("+22345678901").is_err());
    }

    #[test]
    fn test_format_us_phone() {
        assert_eq!(format_us_phone("2345678901"), "+12345678901");
        assert_eq!(format_us_phone("12345678901"), "+12345678901");
        assert_eq!(format_us_phone("+12345678901"), "+12345678901");
        assert_eq!(format_us_phone("(234) 567-8901"), "+12345678901");
    }

    #[test]
    fn test_normalize_phone_key() {
        assert_eq!(normalize_phone_key("   "), None);
        assert_eq!(normalize_phone_key(""), None);
        assert_eq!(
            normalize_phone_key(" (201) 555-0147 ").as_deref(),
            Some("+12015550147")
        );
        assert_eq!(
            normalize_phone_key("+1 201 555 0147").as_deref(),
            Some("+12015550147")
        );
        assert_eq!(
            normalize_phone_key("+44 20 7946 0958").as_deref(),
            Some("+442079460958")
        );
    }
}
