use http::Method;
use routeprobe_router::{Request, RoutingError};

use crate::config::Settings;

/// Builds the request a url is routed as
///
/// `~/` app-relative urls are accepted; `method` defaults to the configured
/// verb.
pub fn synthetic_request(
    url: &str,
    method: Option<Method>,
    settings: &Settings,
) -> Result<Request, RoutingError> {
    Request::new(method.unwrap_or_else(|| settings.method()), url)
}

/// The url as it appears in failure messages, under the configured origin
///
/// # Examples
///
/// ```
/// use routeprobe::request::qualify_url;
///
/// assert_eq!(qualify_url("http://site.com", "/api/missing/32/foo"), "http://site.com/api/missing/32/foo");
/// assert_eq!(qualify_url("http://site.com/", "~/home/Index/42"), "http://site.com/home/Index/42");
/// assert_eq!(qualify_url("http://site.com", "https://other.org/a"), "https://other.org/a");
/// ```
pub fn qualify_url(base_url: &str, url: &str) -> String {
    if url.contains("://") {
        return url.to_string();
    }

    let path = url.trim_start_matches('~').trim_start_matches('/');
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}
