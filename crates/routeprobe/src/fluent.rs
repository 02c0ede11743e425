//! Fluent assertion surface
//!
//! ```ignore
//! routes.should_map("/api/customer/32")
//!     .to(call!(|c: CustomerController| c.get(32)))
//!     .with_handler::<AuthHandler>();
//!
//! routes.should_map("/api/customer/32").to_no_method::<CustomerController>(Method::POST);
//! routes.should_map("/pai/customer/32").to_no_route();
//! routes.should_map("/").from(call!(|c: HomeController| c.index(None)));
//! ```
//!
//! Assertions report through an [`AssertEngine`]: the process-wide default
//! unless one is given with [`RouteAssertion::using`].

use std::sync::Arc;

use http::Method;
use routeprobe_router::{Controller, Handler};
use serde::Serialize;

use crate::assert_engine::{self, AssertEngine};
use crate::comparator::{HandlerCheck, MatchContext, RouteComparator};
use crate::config::Settings;
use crate::expression::{ActionCall, ExpectedCall};
use crate::generate::UrlGenerator;
use crate::properties::PropertyReader;
use crate::resolver::{RouteMatchOutcome, RouteResolver};
use crate::routing::RoutingConfig;
use crate::values::RouteValues;

/// Entry point of the fluent surface, available on every routing config
pub trait ShouldMap {
    fn should_map(&self, url: &str) -> RouteAssertion<'_>;
}

impl<R: RoutingConfig> ShouldMap for R {
    fn should_map(&self, url: &str) -> RouteAssertion<'_> {
        RouteAssertion::new(self, url)
    }
}

/// Assertions about one url
///
/// Handler checks apply to the route resolved by the preceding `to*` call,
/// or resolve the url with the default verb when there was none.
pub struct RouteAssertion<'a> {
    routes: &'a dyn RoutingConfig,
    url: String,
    settings: Settings,
    engine: Arc<dyn AssertEngine>,
    resolved: Option<(RouteMatchOutcome, Method)>,
}

impl<'a> RouteAssertion<'a> {
    pub fn new(routes: &'a dyn RoutingConfig, url: &str) -> Self {
        Self {
            routes,
            url: url.to_string(),
            settings: Settings::current(),
            engine: assert_engine::default_engine(),
            resolved: None,
        }
    }

    /// Reports through `engine` instead of the process-wide default
    pub fn using(mut self, engine: Arc<dyn AssertEngine>) -> Self {
        self.engine = engine;
        self
    }

    /// Replaces the process-wide [`Settings::current`]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    // ========================================================================
    // Url to action
    // ========================================================================

    /// Asserts the url routes to the call with the default verb
    ///
    /// # Panics
    ///
    /// When the call is not a method call on the controller with literal
    /// arguments.
    pub fn to<C: Controller>(self, call: ActionCall<C>) -> Self {
        let method = self.settings.method();
        self.to_method(method, call)
    }

    /// Asserts the url routes to the call for `method`
    pub fn to_method<C: Controller>(self, method: Method, call: ActionCall<C>) -> Self {
        let expected = self.expected_values(&read_call(&call));
        self.to_route_values(Some(method), expected)
    }

    /// Asserts the url routes to the simple fields of `expected`
    ///
    /// # Panics
    ///
    /// When `expected` cannot be serialized.
    pub fn to_values<T: Serialize + ?Sized>(self, expected: &T) -> Self {
        let expected = PropertyReader::route_values(expected)
            .unwrap_or_else(|e| panic!("expected route values could not be read: {}", e));
        self.to_route_values(None, expected)
    }

    pub fn to_route_values(mut self, method: Option<Method>, mut expected: RouteValues) -> Self {
        let method = method.unwrap_or_else(|| self.settings.method());
        let outcome = self.resolve(method.clone());
        let ctx = self.context(&method);

        RouteComparator::new(self.engine.as_ref()).compare(&outcome, &mut expected, &ctx);

        self.resolved = Some((outcome, method));
        self
    }

    /// Asserts no route answers the url
    pub fn to_no_route(mut self) -> Self {
        let method = self.settings.method();
        let outcome = self.resolve(method.clone());
        let ctx = self.context(&method);

        RouteComparator::new(self.engine.as_ref()).expect_no_route(&outcome, &ctx);

        self.resolved = Some((outcome, method));
        self
    }

    /// Asserts the url routes to `C` but no action of it accepts `method`
    pub fn to_no_method<C: Controller>(mut self, method: Method) -> Self {
        let outcome = self.resolve(method.clone());
        let ctx = self.context(&method);

        let descriptor = C::descriptor();
        let controller = if self.settings.strip_controller_suffix {
            descriptor.name()
        } else {
            descriptor.type_name()
        };
        RouteComparator::new(self.engine.as_ref()).expect_no_method(&outcome, controller, &ctx);

        self.resolved = Some((outcome, method));
        self
    }

    // ========================================================================
    // Action to url
    // ========================================================================

    /// Asserts the call generates this url
    ///
    /// # Panics
    ///
    /// When the call is not a method call on the controller with literal
    /// arguments.
    pub fn from<C: Controller>(self, call: ActionCall<C>) -> Self {
        let expected = read_call(&call).to_route_values(true);
        UrlGenerator::assert_generates(self.engine.as_ref(), self.routes, &self.url, None, &expected);
        self
    }

    // ========================================================================
    // Handlers
    // ========================================================================

    /// Asserts the matched route carries handler `H`
    pub fn with_handler<H: 'static>(self) -> Self {
        self.check_handler(HandlerCheck::With(Handler::of::<H>()))
    }

    /// Asserts the matched route does not carry handler `H`
    pub fn without_handler<H: 'static>(self) -> Self {
        self.check_handler(HandlerCheck::Without(Handler::of::<H>()))
    }

    /// Asserts the matched route carries no handler
    pub fn without_handler_any(self) -> Self {
        self.check_handler(HandlerCheck::WithoutAny)
    }

    /// Outcome of the last resolution, if any
    pub fn outcome(&self) -> Option<&RouteMatchOutcome> {
        self.resolved.as_ref().map(|(outcome, _)| outcome)
    }

    fn check_handler(mut self, check: HandlerCheck) -> Self {
        let (outcome, method) = match self.resolved.take() {
            Some(resolved) => resolved,
            None => {
                let method = self.settings.method();
                (self.resolve(method.clone()), method)
            }
        };
        let ctx = self.context(&method);

        RouteComparator::new(self.engine.as_ref()).check_handler(&outcome, check, &ctx);

        self.resolved = Some((outcome, method));
        self
    }

    fn resolve(&self, method: Method) -> RouteMatchOutcome {
        RouteResolver::new(self.settings.clone()).resolve(self.routes, &self.url, Some(method))
    }

    fn context(&self, method: &Method) -> MatchContext {
        MatchContext::new(&self.url, method.clone(), &self.settings)
    }

    fn expected_values(&self, call: &ExpectedCall) -> RouteValues {
        call.to_route_values(self.settings.strip_controller_suffix)
    }
}

fn read_call<C: Controller>(call: &ActionCall<C>) -> ExpectedCall {
    call.read()
        .unwrap_or_else(|e| panic!("invalid action call '{}': {}", call.expr(), e))
}

// ============================================================================
// Free-function surface
// ============================================================================

/// Assertions without the fluent builder
///
/// ```ignore
/// RouteAssert::has_route(&routes, "~/home/Index/42", &json!({
///     "controller": "Home", "action": "Index", "id": 42
/// }));
/// RouteAssert::generates_url(&routes, "/", "Index", "Home", None);
/// ```
///
/// Failures go to the engine installed with
/// [`use_assert_engine`](Self::use_assert_engine).
pub struct RouteAssert;

impl RouteAssert {
    /// Installs the process-wide engine
    pub fn use_assert_engine(engine: Arc<dyn AssertEngine>) {
        assert_engine::set_default_engine(engine);
    }

    /// Restores the panicking engine
    pub fn reset_assert_engine() {
        assert_engine::reset_default_engine();
    }

    /// Asserts `url` routes to the simple fields of `expected`
    pub fn has_route<R, T>(routes: &R, url: &str, expected: &T)
    where
        R: RoutingConfig + ?Sized,
        T: Serialize + ?Sized,
    {
        RouteAssertion::new(&routes, url).to_values(expected);
    }

    /// Asserts `url` routes to the simple fields of `expected` for `method`
    pub fn has_api_route<R, T>(routes: &R, url: &str, method: Method, expected: &T)
    where
        R: RoutingConfig + ?Sized,
        T: Serialize + ?Sized,
    {
        let expected = PropertyReader::route_values(expected)
            .unwrap_or_else(|e| panic!("expected route values could not be read: {}", e));
        RouteAssertion::new(&routes, url).to_route_values(Some(method), expected);
    }

    /// Asserts no route answers `url`
    pub fn no_route<R: RoutingConfig + ?Sized>(routes: &R, url: &str) {
        RouteAssertion::new(&routes, url).to_no_route();
    }

    /// Asserts `action` on `controller` generates `expected_url`
    ///
    /// `current_url` is the application path urls are generated under.
    pub fn generates_url<R: RoutingConfig + ?Sized>(
        routes: &R,
        expected_url: &str,
        action: &str,
        controller: &str,
        current_url: Option<&str>,
    ) {
        let values = RouteValues::new()
            .with_action(action)
            .with_controller(controller);
        UrlGenerator::assert_generates(
            assert_engine::default_engine().as_ref(),
            &routes,
            expected_url,
            current_url,
            &values,
        );
    }

    /// Asserts the simple fields of `values` generate `expected_url`
    pub fn generates_url_values<R, T>(routes: &R, expected_url: &str, values: &T, current_url: Option<&str>)
    where
        R: RoutingConfig + ?Sized,
        T: Serialize + ?Sized,
    {
        let values = PropertyReader::route_values(values)
            .unwrap_or_else(|e| panic!("route values could not be read: {}", e));
        UrlGenerator::assert_generates(
            assert_engine::default_engine().as_ref(),
            &routes,
            expected_url,
            current_url,
            &values,
        );
    }
}
