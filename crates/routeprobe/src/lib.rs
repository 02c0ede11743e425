//! # routeprobe
//!
//! Fluent assertions that a route table maps urls to controller actions, and
//! controller actions back to urls.
//!
//! - Resolve a url the way dispatch would: route match, then action selection
//! - Compare the controller, action and bound parameter values against an
//!   expected call (`call!`) or a plain object
//! - Tell "no route" apart from "route found, verb not allowed"
//! - Check the message handler a route carries
//! - Generate urls from controller actions and compare them
//!
//! ## Example
//!
//! ```
//! use routeprobe::router::{Route, RouteTable};
//! use routeprobe::{call, controller, Method, RecordingAssertEngine, ShouldMap};
//! use std::sync::Arc;
//!
//! pub struct CustomerController;
//!
//! #[controller]
//! impl CustomerController {
//!     pub fn get(&self, id: i32) -> String {
//!         format!("customer {}", id)
//!     }
//! }
//!
//! let routes = RouteTable::new()
//!     .with_route(Route::new("DefaultApi", "api/{controller}/{id}").unwrap().with_optional("id"))
//!     .with_controller::<CustomerController>();
//!
//! routes.should_map("/api/customer/32").to(call!(|c: CustomerController| c.get(32)));
//! routes.should_map("/api/customer/32").to_no_method::<CustomerController>(Method::POST);
//!
//! let engine = Arc::new(RecordingAssertEngine::new());
//! routes
//!     .should_map("/api/missing/32/foo")
//!     .using(engine.clone())
//!     .to(call!(|c: CustomerController| c.get(32)));
//! assert_eq!(
//!     engine.messages(),
//!     vec!["No route matched url 'http://site.com/api/missing/32/foo'".to_string()]
//! );
//! ```

extern crate self as routeprobe;

// ============================================================================
// Module Declarations
// ============================================================================

pub mod assert_engine;
pub mod comparator;
pub mod config;
pub mod error;
pub mod expression;
pub mod fluent;
pub mod generate;
pub mod logging;
pub mod properties;
pub mod request;
pub mod resolver;
pub mod routing;
pub mod values;

pub use routeprobe_router as router;

pub use assert_engine::{AssertEngine, PanicAssertEngine, RecordingAssertEngine};
pub use comparator::{values_equal, HandlerCheck, MatchContext, RouteComparator};
pub use config::{Settings, BASE_URL_ENV};
pub use error::ExpressionError;
pub use expression::{ActionCall, CallExpr, ExpectedCall, ExpressionReader};
pub use fluent::{RouteAssert, RouteAssertion, ShouldMap};
pub use generate::UrlGenerator;
pub use properties::PropertyReader;
pub use resolver::{ResolvedRoute, RouteMatchOutcome, RouteResolver};
pub use routing::RoutingConfig;
pub use values::{RouteValue, RouteValueOrigin, RouteValues};

pub use routeprobe_macro::{call, controller};
pub use routeprobe_router::{Method, Value};
