//! URL path helpers.

use std::borrow::Cow;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

/// Characters escaped in generated page links. `/` is kept.
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Join a mount path and a pages-relative path with exactly one `/`.
///
/// An empty relative path yields the mount path itself (without a trailing
/// slash, except for the root mount `/`).
///
/// # Examples
///
/// ```
/// use kb_site::join_url;
///
/// assert_eq!(join_url("/", "1 Intro.md"), "/1 Intro.md");
/// assert_eq!(join_url("/docs/", "2 Guides"), "/docs/2 Guides");
/// assert_eq!(join_url("/docs", ""), "/docs");
/// ```
#[must_use]
pub fn join_url(mount_path: &str, path: &str) -> String {
    let mount = mount_path.trim_end_matches('/');
    let path = path.trim_matches('/');
    if path.is_empty() {
        if mount.is_empty() {
            "/".to_owned()
        } else {
            mount.to_owned()
        }
    } else {
        format!("{mount}/{path}")
    }
}

/// Percent-encode a path for use in `href`.
#[must_use]
pub fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, PATH).to_string()
}

/// Percent-decode a request path. Invalid UTF-8 is replaced.
#[must_use]
pub fn decode_path(path: &str) -> Cow<'_, str> {
    percent_decode_str(path).decode_utf8_lossy()
}
