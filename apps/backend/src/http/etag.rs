//! ETag helpers for match documents.
//!
//! Every successful save bumps a match's version, so the ETag doubles as the
//! optimistic-concurrency token for `If-Match` on scoring commands.

use crate::error::AppError;
use crate::errors::ErrorCode;

/// Format: `"match-{id}-v{version}"` (quoted, as HTTP requires).
///
/// ```
/// # use crease::http::etag::match_etag;
/// assert_eq!(match_etag("final", 5), r#""match-final-v5""#);
/// ```
pub fn match_etag(match_id: &str, version: u64) -> String {
    format!(r#""match-{match_id}-v{version}""#)
}

/// Extract the version from a match ETag.
///
/// The version is read after the last `-v`, so match ids containing `-v`
/// still parse.
pub fn parse_match_version_from_etag(s: &str) -> Result<u64, AppError> {
    let s = s.trim().trim_start_matches("W/").trim_matches('"');

    let marker = "-v";
    let version_start = s.rfind(marker).ok_or_else(|| {
        AppError::bad_request(
            ErrorCode::InvalidHeader,
            format!(
                "Invalid ETag format: missing version marker. Expected \"match-{{id}}-v{{version}}\", got: \"{s}\""
            ),
        )
    })? + marker.len();

    let version_str = &s[version_start..];
    version_str.parse::<u64>().map_err(|_| {
        AppError::bad_request(
            ErrorCode::InvalidHeader,
            format!("Invalid ETag format: version must be a non-negative integer, got: \"{version_str}\""),
        )
    })
}
