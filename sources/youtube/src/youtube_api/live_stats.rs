//! The YouTube Gaming `live_stats` endpoint.
//!
//! `GET /live_stats?v=<video id>` answers with the current concurrent viewer
//! count of a live video as a bare decimal number. For anything it cannot
//! report on it answers with some other body, which callers treat as "count
//! unavailable".

/// Parses a `live_stats` body into a viewer count.
///
/// Only a non-empty run of ASCII digits is accepted; surrounding whitespace
/// or a value that does not fit in a `u64` means the count is unavailable.
pub fn parse_viewer_count(body: &str) -> Option<u64> {
    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    body.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_viewer_count() {
        assert_eq!(parse_viewer_count("1234"), Some(1234));
        assert_eq!(parse_viewer_count("0"), Some(0));
        assert_eq!(parse_viewer_count("007"), Some(7));
    }

    #[test]
    fn test_parse_viewer_count_rejects_non_digits() {
        assert_eq!(parse_viewer_count(""), None);
        assert_eq!(parse_viewer_count("12a4"), None);
        assert_eq!(parse_viewer_count("-5"), None);
        assert_eq!(parse_viewer_count("+5"), None);
        assert_eq!(parse_viewer_count(" 12"), None);
        assert_eq!(parse_viewer_count("12\n"), None);
        assert_eq!(parse_viewer_count("١٢"), None);
    }

    #[test]
    fn test_parse_viewer_count_overflow() {
        assert_eq!(parse_viewer_count("99999999999999999999999"), None);
    }
}
