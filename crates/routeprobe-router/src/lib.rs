//! # routeprobe router
//!
//! An MVC-style route table in the shape of classic controller/action web
//! frameworks:
//! - Templates with parameters (`{controller}/{action}/{id}`)
//! - Defaults and optional parameters
//! - Catch-all parameters (`docs/{*path}`)
//! - Constraints (`int`, `alpha`, regex, HTTP method)
//! - Per-route message handlers
//! - A controller registry with verb-aware action selection
//! - URL generation from route values
//!
//! ## Matching
//!
//! Routes are tried in registration order and the first route whose template
//! matches the request path (and whose constraints accept the captured values)
//! produces the [`RouteData`]. Literal segments compare case-insensitively.
//!
//! ## Example
//!
//! ```
//! use routeprobe_router::{Request, Route, RouteTable, Value};
//!
//! let mut table = RouteTable::new();
//! table.add_route(
//!     Route::new("Default", "{controller}/{action}/{id}")
//!         .unwrap()
//!         .with_default("controller", "Home")
//!         .with_default("action", "Index")
//!         .with_optional("id"),
//! );
//!
//! let request = Request::get("/home/index/42").unwrap();
//! let data = table.match_request(&request).unwrap().unwrap();
//! assert_eq!(data.get("id").map(|v| v.value.clone()), Some(Value::from("42")));
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod constraint;
mod controller;
mod error;
mod generate;
mod handler;
pub mod path;
mod request;
mod route;
mod table;
pub mod template;
mod value;

pub use constraint::Constraint;
pub use controller::{
    conventional_verbs, names_match, ActionDescriptor, Controller, ControllerDescriptor, ParameterDescriptor,
    CONTROLLER_SUFFIX,
};
pub use error::{RoutingError, SelectionError, TemplateError};
pub use handler::Handler;
pub use http::Method;
pub use request::Request;
pub use route::{Route, RouteDefault};
pub use table::{RouteData, RouteDataValue, RouteTable, SelectedAction, ValueSource};
pub use template::TemplateSegment;
pub use value::Value;
