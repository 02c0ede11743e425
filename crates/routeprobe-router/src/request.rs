use http::Method;

use crate::path::normalize_path;
use crate::{names_match, RoutingError};

/// A request as seen by the route table: method, app-relative path and query
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
}

impl Request {
    /// Builds a request from a url
    ///
    /// Accepts absolute urls (`http://site.com/api/customer/32`), rooted paths
    /// (`/api/customer/32`) and app-relative paths (`~/api/customer/32`).
    /// Query values are percent-decoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use routeprobe_router::{Method, Request};
    ///
    /// let req = Request::new(Method::GET, "http://site.com/member/1234/ChangePassword?newPassword=new").unwrap();
    /// assert_eq!(req.path(), "/member/1234/ChangePassword");
    /// assert_eq!(req.query_value("newpassword"), Some("new"));
    /// ```
    pub fn new(method: Method, url: &str) -> Result<Self, RoutingError> {
        let without_fragment = url.split('#').next().unwrap_or(url);
        let (path_part, query_part) = match without_fragment.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (without_fragment, None),
        };

        let path = strip_origin(path_part)?;
        let query = query_part.map(parse_query).transpose()?.unwrap_or_default();

        Ok(Self {
            method,
            path: normalize_path(path).into_owned(),
            query,
        })
    }

    pub fn get(url: &str) -> Result<Self, RoutingError> {
        Self::new(Method::GET, url)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Canonical app-relative path, always starting with `/`
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// First query value for a key (see [`names_match`])
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| names_match(k, key))
            .map(|(_, v)| v.as_str())
    }
}

fn strip_origin(url: &str) -> Result<&str, RoutingError> {
    match url.split_once("://") {
        Some((scheme, rest)) => {
            if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.') {
                return Err(RoutingError::InvalidUrl(url.to_string()));
            }
            Ok(rest.find('/').map(|idx| &rest[idx..]).unwrap_or("/"))
        }
        None => Ok(url),
    }
}

fn parse_query(query: &str) -> Result<Vec<(String, String)>, RoutingError> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            Ok((decode(key)?, decode(value)?))
        })
        .collect()
}

/// Percent-decodes a url component, treating `+` as a space
pub(crate) fn decode(component: &str) -> Result<String, RoutingError> {
    let spaced = component.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|cow| cow.into_owned())
        .map_err(|_| RoutingError::InvalidEncoding(component.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url() {
        let req = Request::get("http://site.com/api/customer/32").unwrap();
        assert_eq!(req.path(), "/api/customer/32");
        assert!(req.query().is_empty());
    }

    #[test]
    fn test_host_only_url() {
        let req = Request::get("https://site.com").unwrap();
        assert_eq!(req.path(), "/");
    }

    #[test]
    fn test_app_relative_url() {
        let req = Request::get("~/home/Index/42").unwrap();
        assert_eq!(req.path(), "/home/Index/42");
    }

    #[test]
    fn test_query_decoding() {
        let req = Request::new(Method::POST, "/search?q=a+b&tag=%C3%A9t%C3%A9&flag").unwrap();
        assert_eq!(req.method(), &Method::POST);
        assert_eq!(req.query_value("q"), Some("a b"));
        assert_eq!(req.query_value("TAG"), Some("été"));
        assert_eq!(req.query_value("flag"), Some(""));
    }

    #[test]
    fn test_invalid_encoding() {
        assert!(matches!(
            Request::get("/search?q=%FF"),
            Err(RoutingError::InvalidEncoding(_))
        ));
    }
}
