//! Email address validation and log masking

use once_cell::sync::Lazy;
use regex::Regex;

/// Address shape accepted by the signup flow: word characters with optional
/// `.`/`-` separated segments on both sides and a 2-3 letter final label.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").expect("Invalid email regex")
});

/// Check an address against the signup email format (surrounding whitespace ignored)
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email.trim())
}

/// Canonical form used as a storage key: trimmed and lower-cased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Mask an address for logging: keeps the first character of the local part
/// and the full domain, e.g. `u***@example.com`
pub fn mask_email(email: &str) -> String {
    match email.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        _ => "***".to_string(),
    }
}
