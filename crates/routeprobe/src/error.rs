use thiserror::Error;

pub use routeprobe_router::{RoutingError, SelectionError, TemplateError};

/// A call expression that cannot describe an expected action call
///
/// These mean the test itself is malformed, so the fluent surface panics
/// with the message instead of reporting through the assert engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    #[error("expression '{0}' is not a method call on the controller")]
    UnsupportedExpressionKind(String),

    #[error("argument '{expression}' for parameter '{parameter}' is not a literal")]
    NonLiteralArgument { parameter: String, expression: String },

    #[error("'{method}' is not an action of controller '{controller}'")]
    UnknownAction { controller: String, method: String },

    #[error("'{method}' resolves to more than one action of controller '{controller}'")]
    AmbiguousAction { controller: String, method: String },

    #[error("action '{method}' takes {expected} arguments but the call supplies {found}")]
    ArgumentCountMismatch {
        method: String,
        expected: usize,
        found: usize,
    },
}
