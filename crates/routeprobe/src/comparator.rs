//! Expected vs actual route values
//!
//! Every discrepancy is reported through the [`AssertEngine`]; nothing is
//! returned. A missing route or a rejected verb is reported once and stops the
//! comparison, value mismatches are each reported.

use http::Method;
use routeprobe_router::{names_match, Handler, Value};
use tracing::debug;

use crate::assert_engine::AssertEngine;
use crate::config::Settings;
use crate::request::qualify_url;
use crate::resolver::RouteMatchOutcome;
use crate::values::{RouteValues, ACTION_KEY, CONTROLLER_KEY};

/// The url and verb an outcome was resolved for
#[derive(Debug, Clone, PartialEq)]
pub struct MatchContext {
    /// Url as the test wrote it
    pub url: String,
    /// Url under the configured origin, used by some messages
    pub qualified_url: String,
    pub method: Method,
}

impl MatchContext {
    pub fn new(url: &str, method: Method, settings: &Settings) -> Self {
        Self {
            url: url.to_string(),
            qualified_url: qualify_url(&settings.base_url, url),
            method,
        }
    }
}

/// Handler assertion on a resolved route
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandlerCheck {
    /// The route carries this handler
    With(Handler),
    /// The route does not carry this handler
    Without(Handler),
    /// The route carries no handler at all
    WithoutAny,
}

pub struct RouteComparator<'a> {
    engine: &'a dyn AssertEngine,
}

impl<'a> RouteComparator<'a> {
    pub fn new(engine: &'a dyn AssertEngine) -> Self {
        Self { engine }
    }

    /// Compares an outcome against expected values
    pub fn compare(&self, outcome: &RouteMatchOutcome, expected: &mut RouteValues, ctx: &MatchContext) {
        let actual = match outcome {
            RouteMatchOutcome::NoRouteMatched { .. } => {
                self.engine
                    .fail(&format!("No route matched url '{}'", ctx.qualified_url));
                return;
            }
            RouteMatchOutcome::MethodNotAllowed { method, .. } => {
                self.engine.fail(&format!(
                    "Method {} is not allowed on url '{}'",
                    method, ctx.url
                ));
                return;
            }
            RouteMatchOutcome::Matched(resolved) => &resolved.values,
        };

        expected.check_data_ok(self.engine);

        if let Some(controller) = expected.controller() {
            self.compare_name(CONTROLLER_KEY, controller, actual.controller(), ctx);
        }
        if let Some(action) = expected.action() {
            self.compare_name(ACTION_KEY, action, actual.action(), ctx);
        }

        for value in expected.values() {
            match actual.get(&value.name) {
                None if value.value.is_null() => {}
                None => self
                    .engine
                    .fail(&format!("Route value '{}' not found", value.name)),
                Some(found) => {
                    if !values_equal(&value.value, &found.value) {
                        self.mismatch(&value.name, &value.value.to_string(), &found.value.to_string(), ctx);
                    }
                }
            }
        }
    }

    /// Asserts that no route answers the url
    pub fn expect_no_route(&self, outcome: &RouteMatchOutcome, ctx: &MatchContext) {
        if !matches!(outcome, RouteMatchOutcome::NoRouteMatched { .. }) {
            self.engine
                .fail(&format!("Found a route for url '{}'", ctx.url));
        }
    }

    /// Asserts that the url routes to `controller` but not for the verb
    pub fn expect_no_method(&self, outcome: &RouteMatchOutcome, controller: &str, ctx: &MatchContext) {
        match outcome {
            RouteMatchOutcome::MethodNotAllowed {
                controller: actual, ..
            } => {
                if !names_match(controller, actual) {
                    self.mismatch(CONTROLLER_KEY, controller, actual, ctx);
                }
            }
            RouteMatchOutcome::Matched(_) => self.engine.fail(&format!(
                "Method {} is allowed on url '{}'",
                ctx.method, ctx.url
            )),
            RouteMatchOutcome::NoRouteMatched { .. } => self
                .engine
                .fail(&format!("No route matched url '{}'", ctx.qualified_url)),
        }
    }

    /// Checks the handler of a resolved route; does nothing when the url did
    /// not resolve
    pub fn check_handler(&self, outcome: &RouteMatchOutcome, check: HandlerCheck, ctx: &MatchContext) {
        let Some(resolved) = outcome.resolved() else {
            debug!(url = %ctx.url, "handler check skipped, url did not resolve");
            return;
        };

        match (check, resolved.handler) {
            (HandlerCheck::With(expected), Some(actual)) if expected == actual => {}
            (HandlerCheck::With(expected), Some(actual)) => self.engine.fail(&format!(
                "Did not match handler type '{}' for url '{}', found a handler of type '{}'.",
                expected.short_name(),
                ctx.qualified_url,
                actual.short_name()
            )),
            (HandlerCheck::With(expected), None) => self.engine.fail(&format!(
                "Did not match handler type '{}' for url '{}', found no handler.",
                expected.short_name(),
                ctx.qualified_url
            )),
            (HandlerCheck::Without(unwanted), Some(actual)) if unwanted == actual => {
                self.found_handler(actual, ctx)
            }
            (HandlerCheck::WithoutAny, Some(actual)) => self.found_handler(actual, ctx),
            (HandlerCheck::Without(_) | HandlerCheck::WithoutAny, _) => {}
        }
    }

    fn found_handler(&self, actual: Handler, ctx: &MatchContext) {
        self.engine.fail(&format!(
            "Matching handler of type '{}' found for url '{}'.",
            actual.short_name(),
            ctx.qualified_url
        ));
    }

    fn compare_name(&self, name: &str, expected: &str, actual: Option<&str>, ctx: &MatchContext) {
        match actual {
            None => self.engine.fail(&format!("Route value '{}' not found", name)),
            Some(actual) if names_match(expected, actual) => {}
            Some(actual) => self.mismatch(name, expected, actual, ctx),
        }
    }

    fn mismatch(&self, name: &str, expected: &str, actual: &str, ctx: &MatchContext) {
        debug!(name, expected, actual, url = %ctx.url, "route value mismatch");
        self.engine.fail(&format!(
            "Expected '{}', not '{}' for '{}' at url '{}'.",
            expected, actual, name, ctx.url
        ));
    }
}

/// Type-aware equality between an expected and an actual value
///
/// Url values arrive as strings, so a typed value on either side compares by
/// meaning: numbers numerically, booleans ignoring case, uuids structurally.
/// Two strings compare exactly. An expected null is met by an absent or
/// empty actual value.
///
/// # Examples
///
/// ```
/// use routeprobe::{values_equal, Value};
///
/// assert!(values_equal(&Value::Int(42), &Value::from("42")));
/// assert!(values_equal(&Value::Bool(true), &Value::from("TRUE")));
/// assert!(!values_equal(&Value::from("betsy"), &Value::from("Betsy")));
/// ```
pub fn values_equal(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Null, actual) => actual.is_empty(),
        (_, Value::Null) => false,
        (Value::Str(e), Value::Str(a)) => {
            e == a
                || matches!(
                    (expected.as_uuid(), actual.as_uuid()),
                    (Some(e), Some(a)) if e == a
                )
        }
        (Value::Int(_) | Value::Float(_), _) | (_, Value::Int(_) | Value::Float(_)) => {
            match (expected.as_f64(), actual.as_f64()) {
                (Some(e), Some(a)) => e == a,
                _ => false,
            }
        }
        (Value::Bool(_), _) | (_, Value::Bool(_)) => {
            match (expected.as_bool(), actual.as_bool()) {
                (Some(e), Some(a)) => e == a,
                _ => false,
            }
        }
        (Value::Uuid(_), _) | (_, Value::Uuid(_)) => {
            match (expected.as_uuid(), actual.as_uuid()) {
                (Some(e), Some(a)) => e == a,
                _ => false,
            }
        }
    }
}
