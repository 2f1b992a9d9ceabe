//! Track URL resolution.
//!
//! Extracts the canonical [`TrackId`] out of the surface forms a track
//! sharing link can take:
//! * `https://open.spotify.com/track/{id}`
//! * `spotify:track:{id}`
//! * `https://open.spotify.com/intl-xx/track/{id}`
//!
//! Resolution is pure string matching: no I/O, and the same input always
//! yields the same result. A string that matches no pattern resolves to
//! `None`, which is a normal negative result, not an error.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::track::TrackId;

/// Accepted URL patterns, tried in order; the first match wins.
static PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?:https?://)?open\.spotify\.com/track/([a-zA-Z0-9]{22})")
            .expect("invalid track link pattern"),
        Regex::new(r"spotify:track:([a-zA-Z0-9]{22})").expect("invalid track uri pattern"),
        Regex::new(r"(?:https?://)?open\.spotify\.com/intl-[a-z]{2}/track/([a-zA-Z0-9]{22})")
            .expect("invalid localized track link pattern"),
    ]
});

/// Resolves a track sharing URL into its embedded identifier.
///
/// Returns `None` when no pattern matches.
#[must_use]
pub fn resolve(input: &str) -> Option<TrackId> {
    PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(input))
        .and_then(|captures| captures.get(1))
        .and_then(|id| id.as_str().parse().ok())
}

/// Whether the input contains a resolvable track URL.
#[must_use]
pub fn is_track_url(input: &str) -> bool {
    resolve(input).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "4uLU6hMCjMI75M1A2tKUQC";

    #[test]
    fn resolves_web_link() {
        let id = resolve("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC").unwrap();
        assert_eq!(id.as_str(), ID);
    }

    #[test]
    fn resolves_web_link_without_scheme() {
        let id = resolve("open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC").unwrap();
        assert_eq!(id.as_str(), ID);
    }

    #[test]
    fn resolves_web_link_with_query() {
        let id =
            resolve("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC?si=abc123").unwrap();
        assert_eq!(id.as_str(), ID);
    }

    #[test]
    fn resolves_uri_scheme() {
        let id = resolve("spotify:track:4uLU6hMCjMI75M1A2tKUQC").unwrap();
        assert_eq!(id.as_str(), ID);
    }

    #[test]
    fn resolves_localized_link() {
        let id = resolve("https://open.spotify.com/intl-de/track/4uLU6hMCjMI75M1A2tKUQC").unwrap();
        assert_eq!(id.as_str(), ID);
    }

    #[test]
    fn rejects_non_track_input() {
        assert_eq!(resolve(""), None);
        assert_eq!(resolve("https://example.com/track/4uLU6hMCjMI75M1A2tKUQC"), None);
        assert_eq!(resolve("https://open.spotify.com/album/4uLU6hMCjMI75M1A2tKUQC"), None);
        // Truncated identifier.
        assert_eq!(resolve("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQ"), None);
        assert!(!is_track_url("not a url"));
    }

    #[test]
    fn resolution_is_deterministic() {
        let input = "spotify:track:4uLU6hMCjMI75M1A2tKUQC";
        assert_eq!(resolve(input), resolve(input));
    }
}
