use http::Method;
use thiserror::Error;

/// Errors raised while parsing a route template
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    #[error("unbalanced braces in route segment '{0}'")]
    UnbalancedBraces(String),

    #[error("empty parameter name in route segment '{0}'")]
    EmptyParameter(String),

    #[error("catch-all parameter '{0}' must be the last segment")]
    CatchAllNotLast(String),

    #[error("parameter '{0}' appears more than once")]
    DuplicateParameter(String),
}

/// Errors raised by the route table while matching a request
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutingError {
    #[error("invalid percent-encoding in url segment '{0}'")]
    InvalidEncoding(String),

    #[error("invalid url '{0}'")]
    InvalidUrl(String),
}

/// Why no action could be selected for a matched route
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    /// No controller or action answers this route at all
    #[error("no action found: {0}")]
    NotFound(String),

    /// The controller has actions for this route, none of them for the verb
    ///
    /// `controller` is the route name (`Customer`), `controller_type` the
    /// type name (`CustomerController`).
    #[error("method {method} not allowed on controller '{controller}'")]
    MethodNotAllowed {
        method: Method,
        controller: String,
        controller_type: String,
    },
}
