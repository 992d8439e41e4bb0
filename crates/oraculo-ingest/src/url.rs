//! URL normalization for user-supplied site and video addresses.

use url::Url;

/// Validate and canonicalize a user-typed URL.
///
/// Trims whitespace, prefixes `https://` when no scheme is given, and
/// verifies that both scheme and host parse. Invalid input degrades to
/// an empty string, which callers read as "no source".
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    match Url::parse(&candidate) {
        Ok(parsed) if parsed.has_host() => candidate,
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepends_https_when_scheme_missing() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(
            normalize_url("  example.com/path?q=1  "),
            "https://example.com/path?q=1"
        );
    }

    #[test]
    fn keeps_existing_scheme() {
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
    }

    #[test]
    fn empty_and_blank_stay_empty() {
        assert_eq!(normalize_url(""), "");
        assert_eq!(normalize_url("   "), "");
    }

    #[test]
    fn unparseable_host_degrades_to_empty() {
        assert_eq!(normalize_url("https://"), "");
        assert_eq!(normalize_url("http:// bad host"), "");
        assert_eq!(normalize_url("///"), "");
    }
}
