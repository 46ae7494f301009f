//! Coarse acceptance test for submitted URLs.
//!
//! A URL is accepted when it is non-empty and contains a configured marker
//! substring (e.g. "youtube.com"). This screens out obvious mistakes before
//! spawning the fetch tool; it does no parsing and is not a security boundary.

/// True when `url` is non-empty and contains `marker`.
pub fn url_allowed(url: &str, marker: &str) -> bool {
    !url.is_empty() && url.contains(marker)
}
