//! Asset handler.
//!
//! Serves files below the assets directory with a guessed content type and
//! a content-derived `ETag`.

use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use md5::{Digest, Md5};

use crate::error::ServerError;
use crate::state::AppState;

const ASSET_CACHE_CONTROL: &str = "public, max-age=3600";

/// Serve the asset at `path` (relative to the assets directory).
pub(crate) fn serve_asset(
    state: &AppState,
    path: &str,
    headers: &HeaderMap,
) -> Result<Response, ServerError> {
    let content = state.site.read_asset(path)?;
    let etag = compute_etag(&content);

    if headers
        .get(header::IF_NONE_MATCH)
        .is_some_and(|value| etag_matches(value, &etag))
    {
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
    }

    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Ok((
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (header::ETAG, etag),
            (header::CACHE_CONTROL, ASSET_CACHE_CONTROL.to_owned()),
        ],
        content,
    )
        .into_response())
}

/// Compute `ETag` from content.
///
/// MD5 truncated to 64 bits (16 hex chars), quoted.
fn compute_etag(content: &[u8]) -> String {
    let hash = Md5::digest(content);
    format!("\"{}\"", &hex::encode(hash)[..16])
}

/// Check an `If-None-Match` value (possibly a list, possibly weak) against `etag`.
fn etag_matches(value: &HeaderValue, etag: &str) -> bool {
    let Ok(value) = value.to_str() else {
        return false;
    };
    value.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || candidate.trim_start_matches("W/") == etag
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_etag_format() {
        let etag = compute_etag(b"body { color: red }");

        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        // 16 hex chars + 2 quotes
        assert_eq!(etag.len(), 18);
    }

    #[test]
    fn test_compute_etag_depends_on_content() {
        assert_ne!(compute_etag(b"a"), compute_etag(b"b"));
        assert_eq!(compute_etag(b"a"), compute_etag(b"a"));
    }

    #[test]
    fn test_etag_matches_list_and_weak() {
        let etag = compute_etag(b"a");
        let list = HeaderValue::from_str(&format!("\"other\", W/{etag}")).unwrap();

        assert!(etag_matches(&list, &etag));
        assert!(etag_matches(&HeaderValue::from_static("*"), &etag));
        assert!(!etag_matches(&HeaderValue::from_static("\"nope\""), &etag));
    }
}
