//! HTTP request handlers.

pub(crate) mod assets;
pub(crate) mod pages;

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, Uri};
use axum::response::Response;
use kb_site::{SEARCH_PATH, decode_path};

use crate::error::ServerError;
use crate::state::AppState;

/// What a request path below the mount point refers to.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Target<'a> {
    /// Page at the mount-relative path (still percent-encoded).
    Page(&'a str),
    /// The search page.
    Search,
    /// Asset path below the assets directory, decoded.
    Asset(String),
}

/// Classify a raw request path.
///
/// Returns `None` for paths outside `mount_prefix`. Both prefixes are
/// percent-encoded like the request path.
pub(crate) fn classify<'a>(
    mount_prefix: &str,
    assets_prefix: &str,
    path: &'a str,
) -> Option<Target<'a>> {
    let rest = path.strip_prefix(mount_prefix)?;
    if !rest.is_empty() && !rest.starts_with('/') {
        return None;
    }

    let relative = rest.trim_matches('/');
    if relative == SEARCH_PATH {
        return Some(Target::Search);
    }
    if let Some(asset) = relative
        .strip_prefix(assets_prefix)
        .and_then(|r| r.strip_prefix('/'))
    {
        return Some(Target::Asset(decode_path(asset).into_owned()));
    }

    Some(Target::Page(rest))
}

/// Handle every GET request.
pub(crate) async fn serve(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let path = uri.path();
    match classify(&state.mount_prefix, &state.assets_prefix, path) {
        Some(Target::Page(page)) => pages::render_page(&state, page),
        Some(Target::Search) => pages::render_search(&state, &uri),
        Some(Target::Asset(asset)) => assets::serve_asset(&state, &asset, &headers),
        None => Err(ServerError::NoRoute(path.to_owned())),
    }
}
