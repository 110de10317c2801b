//! Input validation for submitted rows.

use crate::error::{CoreError, Result};
use crate::shortcode::ShortCode;
use url::Url;

pub const MIN_VALIDITY_MINUTES: u32 = 1;
pub const MAX_VALIDITY_MINUTES: u32 = 7200;

/// Returns `true` if `s` is an absolute `http` or `https` URL.
pub fn is_valid_http_url(s: &str) -> bool {
    Url::parse(s).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

/// Checks an URL the way the shortener accepts it: trimmed, non-empty,
/// absolute http(s).
pub fn validate_url(s: &str) -> Result<()> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(CoreError::MissingUrl);
    }
    if !is_valid_http_url(trimmed) {
        return Err(CoreError::InvalidUrl(trimmed.to_string()));
    }
    Ok(())
}

/// Parses a validity period in minutes.
///
/// Blank input means "use the default" and yields `Ok(None)`. Anything that
/// is not all ASCII digits, or falls outside `1..=7200`, is invalid.
pub fn parse_validity_minutes(s: Option<&str>) -> Result<Option<u32>> {
    let Some(raw) = s.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::InvalidValidity(raw.to_string()));
    }

    // all digits, so the only parse failure left is overflow
    match raw.parse::<u32>() {
        Ok(minutes) if (MIN_VALIDITY_MINUTES..=MAX_VALIDITY_MINUTES).contains(&minutes) => {
            Ok(Some(minutes))
        }
        _ => Err(CoreError::InvalidValidity(raw.to_string())),
    }
}

/// Returns `true` if `s` is 3-20 characters of `[A-Za-z0-9_-]`.
pub fn is_valid_shortcode(s: &str) -> bool {
    ShortCode::is_valid(s)
}

/// Runs every row check and collects the user-facing messages, in field
/// order. An empty list means the row is valid.
pub fn validate_row(url: &str, validity: Option<&str>, shortcode: Option<&str>) -> Vec<String> {
    let mut errors = Vec::new();

    if let Err(e) = validate_url(url) {
        errors.push(e.to_string());
    }

    if let Err(e) = parse_validity_minutes(validity) {
        errors.push(e.to_string());
    }

    if let Some(code) = shortcode.map(str::trim).filter(|c| !c.is_empty()) {
        if let Err(e) = ShortCode::new(code) {
            errors.push(e.to_string());
        }
    }

    errors
}
