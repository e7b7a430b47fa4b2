// Answer validators, one predicate per validation kind

use regex::Regex;
use std::sync::OnceLock;

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();
static PHONE_PATTERN: OnceLock<Regex> = OnceLock::new();
static PHONE_SEPARATORS: OnceLock<Regex> = OnceLock::new();

fn get_email_pattern() -> &'static Regex {
    EMAIL_PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

fn get_phone_pattern() -> &'static Regex {
    PHONE_PATTERN.get_or_init(|| Regex::new(r"^\+?[1-9]\d{7,14}$").unwrap())
}

fn get_phone_separators() -> &'static Regex {
    PHONE_SEPARATORS.get_or_init(|| Regex::new(r"[\s\-()]").unwrap())
}

/// Lowest accepted urgency score
pub const MIN_PRIORITY: i64 = 1;
/// Highest accepted urgency score
pub const MAX_PRIORITY: i64 = 10;

/// Non-empty after trimming
pub fn validate_required(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Standard `local@domain.tld` shape
pub fn validate_email(email: &str) -> bool {
    let email = email.trim();
    if email.is_empty() {
        return false;
    }
    get_email_pattern().is_match(email)
}

/// Optional phone number.
///
/// Empty input is accepted. Otherwise spaces, dashes and parentheses are
/// stripped and the rest must be an optional `+` followed by 8-15 digits,
/// the first of which is not zero.
pub fn validate_phone(phone: &str) -> bool {
    let phone = phone.trim();
    if phone.is_empty() {
        return true;
    }
    let cleaned = get_phone_separators().replace_all(phone, "");
    get_phone_pattern().is_match(&cleaned)
}

/// Integer in the closed range [1, 10]
pub fn validate_priority(value: &str) -> bool {
    parse_priority(value).is_some()
}

/// Parse an urgency score, returning `None` when it is not an integer in range
pub fn parse_priority(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value
        .parse::<i64>()
        .ok()
        .filter(|n| (MIN_PRIORITY..=MAX_PRIORITY).contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@b.com"));
        assert!(validate_email("  maria.lopez@empresa.com.mx  "));
        assert!(!validate_email("not-an-email"));
        assert!(!validate_email(""));
        assert!(!validate_email("   "));
        assert!(!validate_email("a b@c.com"));
        assert!(!validate_email("a@b"));
    }

    #[test]
    fn test_validate_priority() {
        assert!(!validate_priority("0"));
        assert!(!validate_priority("11"));
        assert!(!validate_priority("abc"));
        assert!(!validate_priority(""));
        assert!(!validate_priority("5.5"));
        assert!(validate_priority("1"));
        assert!(validate_priority("10"));
        assert!(validate_priority(" 7 "));
    }

    #[test]
    fn test_parse_priority() {
        assert_eq!(parse_priority("8"), Some(8));
        assert_eq!(parse_priority("-3"), None);
        assert_eq!(parse_priority("100"), None);
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone(""));
        assert!(validate_phone("   "));
        assert!(!validate_phone("123"));
        assert!(validate_phone("+525512345678"));
        assert!(validate_phone("+52 55 1234 5678"));
        assert!(validate_phone("(55) 1234-5678"));
        assert!(!validate_phone("+0123456789"));
        assert!(!validate_phone("+1234567890123456"));
        assert!(!validate_phone("55-ABC-5678"));
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("Acepto"));
        assert!(!validate_required(""));
        assert!(!validate_required(" \t\n"));
    }
}
