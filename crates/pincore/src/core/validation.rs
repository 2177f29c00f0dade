//! Pinterest link classification
//!
//! - `is_supported`: whitelist of canonical pin URL shapes plus the pin.it shortener
//! - `canonicalize`: strips tracking query parameters before the link reaches yt-dlp

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::error::{AppError, AppResult};

/// Canonical pin URLs: optional `www.` or two-letter locale subdomain, optional
/// `/<user>` path prefix, numeric pin id. Anchored at the start only; whatever
/// trails the id is accepted.
static PIN_URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:https?://(?:www\.|[a-z]{2}\.)?pinterest\.(?:com|fr|de|es|it|co\.uk)(?:/[^/\s]+)?/pin/\d+|https?://pin\.it/[a-zA-Z0-9]+|pinterest://pin/\d+)",
    )
    .expect("Failed to compile pin URL regex")
});

/// Link shortener domain, matched anywhere in the text as a permissive fallback.
const SHORTENER_DOMAIN: &str = "pin.it";

/// Query parameters containing any of these (case-insensitive, anywhere in
/// `key=value`) are dropped by [`canonicalize`].
const TRACKING_MARKERS: &[&str] = &["utm_", "source=", "ref=", "campaign="];

/// Checks whether `text` is a link the bot can process.
///
/// # Examples
/// ```
/// use pincore::core::validation::is_supported;
///
/// assert!(is_supported("https://pinterest.com/pin/123456789/"));
/// assert!(is_supported("  https://pin.it/abc123  "));
/// assert!(!is_supported("https://example.com/video"));
/// assert!(!is_supported("   "));
/// ```
pub fn is_supported(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }

    PIN_URL_REGEX.is_match(trimmed) || trimmed.to_lowercase().contains(SHORTENER_DOMAIN)
}

/// Removes tracking parameters from a link.
///
/// Rebuilds `scheme://host/path` followed by the retained parameters joined
/// with `&`. Scheme, host casing and path are preserved byte for byte; the
/// fragment is dropped. Running it twice gives the same result as once.
///
/// ```
/// use pincore::core::validation::canonicalize;
///
/// assert_eq!(
///     canonicalize("https://pinterest.com/pin/1?utm_source=x&foo=bar"),
///     "https://pinterest.com/pin/1?foo=bar"
/// );
/// ```
pub fn canonicalize(url: &str) -> String {
    let url = url.trim();
    let without_fragment = url.split_once('#').map_or(url, |(head, _)| head);

    let (base, query) = match without_fragment.split_once('?') {
        Some((base, query)) => (base, query),
        None => (without_fragment, ""),
    };

    let retained: Vec<&str> = query
        .split('&')
        .filter(|param| !param.is_empty())
        .filter(|param| !is_tracking_param(param))
        .collect();

    if retained.is_empty() {
        base.to_string()
    } else {
        format!("{}?{}", base, retained.join("&"))
    }
}

/// Classifies and canonicalizes in one step, for callers outside the chat flow.
pub fn pinterest_link(text: &str) -> AppResult<String> {
    if !is_supported(text) {
        return Err(AppError::Validation(format!("not a Pinterest link: {}", text.trim())));
    }
    Ok(canonicalize(text))
}

fn is_tracking_param(param: &str) -> bool {
    let lowered = param.to_lowercase();
    TRACKING_MARKERS.iter().any(|marker| lowered.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pinterest_link() {
        assert_eq!(
            pinterest_link(" https://pin.it/abc123?utm_medium=copy ").unwrap(),
            "https://pin.it/abc123"
        );
        let err = pinterest_link("https://example.com").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: not a Pinterest link: https://example.com");
    }

    #[test]
    fn test_canonical_pin_urls_are_supported() {
        for url in [
            "https://pinterest.com/pin/123456789/",
            "http://www.pinterest.fr/pin/42",
            "https://www.pinterest.co.uk/pin/987654321012345/",
            "https://fr.pinterest.com/pin/1234/",
            "https://www.pinterest.com/someuser/pin/55/",
            "https://pin.it/AbC123",
            "pinterest://pin/77",
        ] {
            assert!(is_supported(url), "expected supported: {}", url);
        }
    }

    #[test]
    fn test_foreign_or_malformed_links_are_rejected() {
        for text in [
            "",
            "   \n\t",
            "https://example.com/video",
            "https://pinterest.com/ideas/cats/",
            "https://pinterest.net/pin/123",
            "see https://pinterest.com/pin/123",
            "hello world",
        ] {
            assert!(!is_supported(text), "expected unsupported: {:?}", text);
        }
    }

    #[test]
    fn test_shortener_matched_anywhere() {
        assert!(is_supported("look at this PIN.IT/xyz"));
        assert!(is_supported("pin.it/xyz"));
    }

    #[test]
    fn test_canonicalize_strips_tracking() {
        assert_eq!(
            canonicalize("https://pinterest.com/pin/1?utm_source=x&foo=bar"),
            "https://pinterest.com/pin/1?foo=bar"
        );
        assert_eq!(
            canonicalize("https://pinterest.com/pin/1/?utm_medium=a&ref=home&campaign=z"),
            "https://pinterest.com/pin/1/"
        );
        // substring match: a parameter merely containing a marker is dropped too
        assert_eq!(canonicalize("https://pin.it/abc?data_source=1&keep=2"), "https://pin.it/abc?keep=2");
    }

    #[test]
    fn test_canonicalize_preserves_host_casing_and_path() {
        assert_eq!(
            canonicalize("HTTPS://WWW.Pinterest.COM/Pin/1?a=1#frag"),
            "HTTPS://WWW.Pinterest.COM/Pin/1?a=1"
        );
        assert_eq!(canonicalize("https://pinterest.com/pin/1"), "https://pinterest.com/pin/1");
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        for url in [
            "https://pinterest.com/pin/1?utm_source=x&foo=bar",
            "https://pinterest.com/pin/1?&&a=1&&",
            "https://pin.it/abc?",
            "pinterest://pin/3?ref=x",
            "no scheme at all?x=1",
        ] {
            let once = canonicalize(url);
            assert_eq!(canonicalize(&once), once, "not idempotent for {}", url);
        }
    }
}
