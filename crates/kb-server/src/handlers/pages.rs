//! Page and search handlers.

use axum::extract::Query;
use axum::http::{Uri, header};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;

use crate::error::ServerError;
use crate::state::AppState;

/// Query string of the search page.
#[derive(Debug, Default, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

/// Render the page at a mount-relative path.
pub(crate) fn render_page(state: &AppState, path: &str) -> Result<Response, ServerError> {
    let page = state.site.render(path)?;
    tracing::debug!(path = %path, store_path = %page.store_path, "Served page");
    Ok(html_response(page.html))
}

/// Render search results for the `q` query parameter.
pub(crate) fn render_search(state: &AppState, uri: &Uri) -> Result<Response, ServerError> {
    let query = Query::<SearchQuery>::try_from_uri(uri)
        .map(|Query(query)| query)
        .unwrap_or_default();
    let page = state.site.render_search(&query.q)?;
    Ok(html_response(page.html))
}

fn html_response(html: String) -> Response {
    ([(header::CACHE_CONTROL, "no-cache")], Html(html)).into_response()
}
