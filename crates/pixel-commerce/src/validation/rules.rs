//! Field rules shared by the schemas.

use regex::Regex;
use std::sync::OnceLock;

static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
static SLUG: OnceLock<Option<Regex>> = OnceLock::new();
static COUPON_CODE: OnceLock<Option<Regex>> = OnceLock::new();

fn matches(cell: &'static OnceLock<Option<Regex>>, pattern: &str, value: &str) -> bool {
    cell.get_or_init(|| Regex::new(pattern).ok())
        .as_ref()
        .map(|re| re.is_match(value))
        .unwrap_or(false)
}

/// Length in characters, not bytes.
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn is_email(value: &str) -> bool {
    matches(&EMAIL, r"^[^\s@]+@[^\s@]+\.[^\s@]+$", value)
}

/// Lowercase letters, digits and hyphens.
pub fn is_slug(value: &str) -> bool {
    matches(&SLUG, r"^[a-z0-9-]+$", value)
}

/// Uppercase letters, digits and hyphens.
pub fn is_coupon_code(value: &str) -> bool {
    matches(&COUPON_CODE, r"^[A-Z0-9-]+$", value)
}

pub fn is_url(value: &str) -> bool {
    reqwest::Url::parse(value).is_ok()
}

pub fn is_datetime(value: &str) -> bool {
    chrono::DateTime::parse_from_rfc3339(value).is_ok()
}

/// At least one ASCII lowercase letter, one ASCII uppercase letter and one digit.
pub fn has_password_mix(password: &str) -> bool {
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    has_lower && has_upper && has_digit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(is_email("maker@pixel3d.com.br"));
        assert!(!is_email("maker@pixel3d"));
        assert!(!is_email("maker pixel@x.com"));
        assert!(!is_email(""));
    }

    #[test]
    fn test_slug_and_coupon_code() {
        assert!(is_slug("benchy-2024"));
        assert!(!is_slug("Benchy"));
        assert!(!is_slug("benchy_2024"));
        assert!(is_coupon_code("PIXEL-10"));
        assert!(!is_coupon_code("pixel10"));
    }

    #[test]
    fn test_password_mix() {
        assert!(has_password_mix("Pixel123"));
        assert!(!has_password_mix("pixel123"));
        assert!(!has_password_mix("PIXELabc"));
        assert!(!has_password_mix("senhaÇ123"));
        assert!(!has_password_mix("ÉCRAN123"));
    }

    #[test]
    fn test_url_and_datetime() {
        assert!(is_url("https://cdn.pixel3d.com.br/benchy.png"));
        assert!(!is_url("benchy.png"));
        assert!(is_datetime("2024-12-31T23:59:59Z"));
        assert!(is_datetime("2024-12-31T23:59:59-03:00"));
        assert!(!is_datetime("31/12/2024"));
    }

    #[test]
    fn test_char_len_counts_characters() {
        assert_eq!(char_len("Dragão"), 6);
        assert!(is_blank("   "));
    }
}
