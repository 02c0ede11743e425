//! Request path cleanup
//!
//! Test authors write urls as `~/home/index`, `/home/index/` or with stray
//! backslashes. Matching works on one shape: a leading `/`, single slashes
//! between segments, no trailing slash.

use std::borrow::Cow;

/// Brings `path` into the shape the route table matches against
///
/// Paths already in that shape are borrowed unchanged.
///
/// # Examples
///
/// ```
/// use routeprobe_router::path::normalize_path;
/// use std::borrow::Cow;
///
/// assert!(matches!(normalize_path("/about"), Cow::Borrowed("/about")));
/// assert_eq!(normalize_path("~/home/Index/42"), "/home/Index/42");
/// assert_eq!(normalize_path("/about/"), "/about");
/// assert_eq!(normalize_path("\\users\\123"), "/users/123");
/// assert_eq!(normalize_path("/path//to///page"), "/path/to/page");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    let clean = path.starts_with('/')
        && !path.contains("//")
        && !path.contains('\\')
        && (path == "/" || !path.ends_with('/'));
    if clean {
        return Cow::Borrowed(path);
    }

    let path = path.strip_prefix('~').unwrap_or(path).replace('\\', "/");
    let joined = segments(&path).join("/");
    Cow::Owned(format!("/{joined}"))
}

/// Non-empty segments of a path
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}
