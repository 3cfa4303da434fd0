//! Conditional request support
//!
//! `ETag` generation and `If-None-Match` evaluation for data file responses.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Compute a quoted `ETag` for a body, e.g. `"9f2c1a"`.
///
/// Content-hash based, so equal bytes always produce the same tag no matter
/// which worker served them.
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}\"", hasher.finish())
}

/// Decide whether an `If-None-Match` header matches the current `ETag`.
///
/// Handles the comma-separated list form and the `*` wildcard. A match means
/// the client's copy is fresh and a 304 should be returned.
pub fn etag_matches(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|candidates| {
        candidates
            .split(',')
            .any(|c| c.trim() == etag || c.trim() == "*")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_etag_is_quoted() {
        let etag = generate_etag(b"node,edges\n1,2\n");
        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        assert!(etag.len() > 2);
    }

    #[test]
    fn test_etag_stable_for_same_content() {
        assert_eq!(generate_etag(b"same bytes"), generate_etag(b"same bytes"));
    }

    #[test]
    fn test_etag_differs_for_different_content() {
        assert_ne!(generate_etag(b"file a"), generate_etag(b"file b"));
    }

    #[test]
    fn test_etag_matching() {
        let etag = "\"abc123\"";
        assert!(etag_matches(Some("\"abc123\""), etag));
        assert!(etag_matches(Some("\"zzz\", \"abc123\""), etag));
        assert!(etag_matches(Some("*"), etag));
        assert!(!etag_matches(Some("\"other\""), etag));
        assert!(!etag_matches(None, etag));
    }
}
