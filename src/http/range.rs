//! Range header parsing
//!
//! Single-range `bytes=` parsing for resumable downloads of data files
//! (RFC 7233). Multi-range requests are deliberately not supported and are
//! answered with the full content.

/// A byte range requested by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte position (inclusive).
    pub start: usize,
    /// Last byte position (inclusive), `None` for open-ended ranges.
    pub end: Option<usize>,
}

impl ByteRange {
    /// Resolve the inclusive end position against the actual file size.
    #[inline]
    pub fn resolved_end(&self, file_size: usize) -> usize {
        self.end.unwrap_or_else(|| file_size.saturating_sub(1))
    }
}

/// Outcome of parsing a `Range` header.
#[derive(Debug)]
pub enum RangeOutcome {
    /// A satisfiable single range.
    Satisfiable(ByteRange),
    /// Syntactically valid but outside the file, answer 416.
    NotSatisfiable,
    /// Absent, malformed, or multi-range: serve the full content.
    Ignored,
}

/// Parse a `Range` header value against a known file size.
///
/// Accepted forms: `bytes=start-end`, `bytes=start-`, `bytes=-suffix`.
pub fn parse_range(header: Option<&str>, file_size: usize) -> RangeOutcome {
    let Some(spec) = header.and_then(|h| h.strip_prefix("bytes=")) else {
        return RangeOutcome::Ignored;
    };

    // Single range only
    if spec.contains(',') {
        return RangeOutcome::Ignored;
    }

    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeOutcome::Ignored;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    if start_str.is_empty() {
        // Suffix form: "-500" means the last 500 bytes
        let Ok(suffix) = end_str.parse::<usize>() else {
            return RangeOutcome::Ignored;
        };
        if suffix == 0 || file_size == 0 {
            return RangeOutcome::NotSatisfiable;
        }
        return RangeOutcome::Satisfiable(ByteRange {
            start: file_size.saturating_sub(suffix),
            end: Some(file_size - 1),
        });
    }

    let Ok(start) = start_str.parse::<usize>() else {
        return RangeOutcome::Ignored;
    };
    if start >= file_size {
        return RangeOutcome::NotSatisfiable;
    }

    let end = if end_str.is_empty() {
        None
    } else {
        match end_str.parse::<usize>() {
            // Clamp to the last byte, as RFC 7233 allows
            Ok(e) if e >= start => Some(e.min(file_size - 1)),
            Ok(_) => return RangeOutcome::NotSatisfiable,
            Err(_) => return RangeOutcome::Ignored,
        }
    };

    RangeOutcome::Satisfiable(ByteRange { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_header_is_ignored() {
        assert!(matches!(parse_range(None, 100), RangeOutcome::Ignored));
        assert!(matches!(
            parse_range(Some("items=0-9"), 100),
            RangeOutcome::Ignored
        ));
    }

    #[test]
    fn test_fixed_range() {
        match parse_range(Some("bytes=0-9"), 100) {
            RangeOutcome::Satisfiable(r) => {
                assert_eq!(r.start, 0);
                assert_eq!(r.end, Some(9));
                assert_eq!(r.resolved_end(100), 9);
            }
            _ => panic!("expected Satisfiable"),
        }
    }

    #[test]
    fn test_open_ended_range() {
        match parse_range(Some("bytes=50-"), 100) {
            RangeOutcome::Satisfiable(r) => {
                assert_eq!(r.start, 50);
                assert_eq!(r.end, None);
                assert_eq!(r.resolved_end(100), 99);
            }
            _ => panic!("expected Satisfiable"),
        }
    }

    #[test]
    fn test_suffix_range() {
        match parse_range(Some("bytes=-20"), 100) {
            RangeOutcome::Satisfiable(r) => {
                assert_eq!(r.start, 80);
                assert_eq!(r.end, Some(99));
            }
            _ => panic!("expected Satisfiable"),
        }
    }

    #[test]
    fn test_oversized_suffix_covers_whole_file() {
        match parse_range(Some("bytes=-500"), 100) {
            RangeOutcome::Satisfiable(r) => {
                assert_eq!(r.start, 0);
                assert_eq!(r.end, Some(99));
            }
            _ => panic!("expected Satisfiable"),
        }
    }

    #[test]
    fn test_end_clamped_to_file_size() {
        match parse_range(Some("bytes=90-200"), 100) {
            RangeOutcome::Satisfiable(r) => {
                assert_eq!(r.start, 90);
                assert_eq!(r.end, Some(99));
            }
            _ => panic!("expected Satisfiable"),
        }
    }

    #[test]
    fn test_start_past_end_of_file() {
        assert!(matches!(
            parse_range(Some("bytes=200-"), 100),
            RangeOutcome::NotSatisfiable
        ));
    }

    #[test]
    fn test_malformed_and_multi_range() {
        assert!(matches!(
            parse_range(Some("bytes=a-b"), 100),
            RangeOutcome::Ignored
        ));
        assert!(matches!(
            parse_range(Some("bytes=0-9,20-29"), 100),
            RangeOutcome::Ignored
        ));
    }
}
