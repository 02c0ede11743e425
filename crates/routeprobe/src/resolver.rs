//! Drives a routing configuration with a synthetic request
//!
//! Resolution runs the same two steps dispatch would: match the url against
//! the route table, then select the action on the matched controller. A url
//! that matches a route but whose controller has no action for the verb is
//! reported as [`RouteMatchOutcome::MethodNotAllowed`], never as a missing
//! route.

use http::Method;
use routeprobe_router::{
    names_match, Handler, Request, RouteData, RoutingError, SelectedAction, SelectionError, ValueSource,
};
use tracing::{debug, warn};

use crate::config::Settings;
use crate::request::synthetic_request;
use crate::routing::RoutingConfig;
use crate::values::{RouteValue, RouteValueOrigin, RouteValues};

/// Result of resolving one url
#[derive(Debug, Clone, PartialEq)]
pub enum RouteMatchOutcome {
    /// No route matched, or the matched route leads to no action
    NoRouteMatched { cause: Option<RoutingError> },
    /// A route matched but no action of its controller accepts the verb
    MethodNotAllowed { method: Method, controller: String },
    Matched(ResolvedRoute),
}

impl RouteMatchOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self, RouteMatchOutcome::Matched(_))
    }

    pub fn resolved(&self) -> Option<&ResolvedRoute> {
        match self {
            RouteMatchOutcome::Matched(resolved) => Some(resolved),
            _ => None,
        }
    }
}

/// A url resolved all the way to an action
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoute {
    /// Controller, action and bound parameter values
    pub values: RouteValues,
    /// Handler the matched route carries
    pub handler: Option<Handler>,
    pub route_name: Option<String>,
}

/// Resolves urls to route values
#[derive(Debug, Clone, Default)]
pub struct RouteResolver {
    settings: Settings,
}

impl RouteResolver {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Resolves `url` with `method`, or the configured default verb
    pub fn resolve(
        &self,
        routes: &dyn RoutingConfig,
        url: &str,
        method: Option<Method>,
    ) -> RouteMatchOutcome {
        match synthetic_request(url, method, &self.settings) {
            Ok(request) => self.resolve_request(routes, &request),
            Err(e) => {
                warn!(url, error = %e, "could not build a request for url");
                RouteMatchOutcome::NoRouteMatched { cause: Some(e) }
            }
        }
    }

    pub fn resolve_request(&self, routes: &dyn RoutingConfig, request: &Request) -> RouteMatchOutcome {
        let data = match routes.route_data(request) {
            Ok(Some(data)) => data,
            Ok(None) => {
                debug!(path = request.path(), "no route data");
                return RouteMatchOutcome::NoRouteMatched { cause: None };
            }
            Err(e) => {
                warn!(path = request.path(), error = %e, "routing failed");
                return RouteMatchOutcome::NoRouteMatched { cause: Some(e) };
            }
        };

        let selected = match routes.select_action(&data, request) {
            Ok(selected) => selected,
            Err(SelectionError::MethodNotAllowed {
                method,
                controller,
                controller_type,
            }) => {
                debug!(path = request.path(), %method, controller, "method not allowed");
                let controller = if self.settings.strip_controller_suffix {
                    controller
                } else {
                    controller_type
                };
                return RouteMatchOutcome::MethodNotAllowed { method, controller };
            }
            Err(SelectionError::NotFound(reason)) => {
                debug!(path = request.path(), reason, "no action for route");
                return RouteMatchOutcome::NoRouteMatched { cause: None };
            }
        };

        let values = self.route_values(&selected, &data, request);
        debug!(
            path = request.path(),
            controller = values.controller().unwrap_or_default(),
            action = values.action().unwrap_or_default(),
            "route resolved"
        );

        RouteMatchOutcome::Matched(ResolvedRoute {
            values,
            handler: data.handler().copied(),
            route_name: data.route_name().map(str::to_string),
        })
    }

    /// Controller, action, then each action parameter with a value in the
    /// route data or the query string
    ///
    /// Controller and action keep the text the route produced when it names
    /// the selected descriptor, so the values generate the same url back.
    fn route_values(&self, selected: &SelectedAction, data: &RouteData, request: &Request) -> RouteValues {
        let controller = if self.settings.strip_controller_suffix {
            routed_or(data.controller(), selected.controller.name())
        } else {
            selected.controller.type_name().to_string()
        };
        let action = routed_or(data.action(), selected.action.name());

        let mut values = RouteValues::new()
            .with_controller(controller)
            .with_action(action);

        for parameter in selected.action.parameters() {
            let from_route = data.get(&parameter.name).filter(|v| !v.value.is_empty());

            if let Some(found) = from_route {
                let origin = match found.source {
                    ValueSource::Path => RouteValueOrigin::Url,
                    ValueSource::Default => RouteValueOrigin::Default,
                };
                values.add(RouteValue::new(parameter.name.as_str(), found.value.clone(), origin));
            } else if let Some(query) = request.query_value(&parameter.name) {
                values.add(RouteValue::new(parameter.name.as_str(), query, RouteValueOrigin::Url));
            }
        }

        values
    }
}

fn routed_or(routed: Option<String>, canonical: &str) -> String {
    routed
        .filter(|text| names_match(text, canonical))
        .unwrap_or_else(|| canonical.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use routeprobe_router::{
        ActionDescriptor, ControllerDescriptor, ParameterDescriptor, Route, RouteTable, Value,
    };

    struct AuthHandler;

    fn table() -> RouteTable {
        RouteTable::new()
            .with_route(
                Route::new("DefaultApi", "api/{controller}/{id}")
                    .unwrap()
                    .with_optional("id")
                    .with_handler(Handler::of::<AuthHandler>()),
            )
            .with_route(
                Route::new("Paged", "list/{page}")
                    .unwrap()
                    .with_default("controller", "Customer")
                    .with_default("action", "list")
                    .with_default("page", 1),
            )
            .with_controller_descriptor(
                ControllerDescriptor::new("CustomerController")
                    .with_action(
                        ActionDescriptor::new("get", "get")
                            .with_conventional_verbs()
                            .with_parameter(ParameterDescriptor::new("id", "i32", false)),
                    )
                    .with_action(
                        ActionDescriptor::new("list", "list")
                            .with_verbs([Method::GET])
                            .with_parameter(ParameterDescriptor::new("page", "i32", false))
                            .with_parameter(ParameterDescriptor::new("filter", "Option<String>", true)),
                    ),
            )
    }

    #[test]
    fn test_resolves_path_values() {
        let outcome = RouteResolver::default().resolve(&table(), "/API/Customer/32", None);

        let resolved = outcome.resolved().unwrap();
        assert_eq!(resolved.values.controller(), Some("Customer"));
        assert_eq!(resolved.values.action(), Some("get"));
        let id = resolved.values.get("id").unwrap();
        assert_eq!(id.value, Value::from("32"));
        assert_eq!(id.origin, RouteValueOrigin::Url);
        assert_eq!(resolved.handler, Some(Handler::of::<AuthHandler>()));
        assert_eq!(resolved.route_name.as_deref(), Some("DefaultApi"));
    }

    #[test]
    fn test_defaults_and_query_values() {
        let outcome = RouteResolver::default().resolve(&table(), "/list?filter=gold", None);

        let values = &outcome.resolved().unwrap().values;
        let page = values.get("page").unwrap();
        assert_eq!(page.value, Value::Int(1));
        assert_eq!(page.origin, RouteValueOrigin::Default);
        assert_eq!(values.get("filter").unwrap().value, Value::from("gold"));
        assert_eq!(values.get("filter").unwrap().origin, RouteValueOrigin::Url);
    }

    #[test]
    fn test_route_data_outside_parameters_is_not_a_value() {
        let outcome = RouteResolver::default().resolve(&table(), "/list/3", None);
        let values = &outcome.resolved().unwrap().values;
        assert_eq!(values.values().len(), 1);
    }

    #[test]
    fn test_no_route() {
        let outcome = RouteResolver::default().resolve(&table(), "/api/missing/32/foo", None);
        assert_eq!(outcome, RouteMatchOutcome::NoRouteMatched { cause: None });
    }

    #[test]
    fn test_unknown_controller_is_no_route() {
        let outcome = RouteResolver::default().resolve(&table(), "/api/orders/32", None);
        assert_eq!(outcome, RouteMatchOutcome::NoRouteMatched { cause: None });
    }

    #[test]
    fn test_method_not_allowed() {
        let outcome = RouteResolver::default().resolve(&table(), "/api/customer/32", Some(Method::POST));
        assert_eq!(
            outcome,
            RouteMatchOutcome::MethodNotAllowed {
                method: Method::POST,
                controller: "Customer".to_string(),
            }
        );
    }

    #[test]
    fn test_routing_error_is_kept_as_cause() {
        let outcome = RouteResolver::default().resolve(&table(), "/api/customer/%FF", None);
        assert!(matches!(
            outcome,
            RouteMatchOutcome::NoRouteMatched { cause: Some(RoutingError::InvalidEncoding(_)) }
        ));
    }

    #[test]
    fn test_keeps_routed_controller_and_action_text() {
        let outcome = RouteResolver::default().resolve(&table(), "/List/2", None);
        let values = &outcome.resolved().unwrap().values;
        assert_eq!(values.controller(), Some("Customer"));
        assert_eq!(values.action(), Some("list"));

        let outcome = RouteResolver::default().resolve(&table(), "/api/CUSTOMER/2", None);
        assert_eq!(outcome.resolved().unwrap().values.controller(), Some("CUSTOMER"));
    }

    #[test]
    fn test_method_not_allowed_names_type_when_suffix_is_kept() {
        let resolver = RouteResolver::new(Settings {
            strip_controller_suffix: false,
            ..Settings::default()
        });
        let outcome = resolver.resolve(&table(), "/api/customer/32", Some(Method::POST));
        assert_eq!(
            outcome,
            RouteMatchOutcome::MethodNotAllowed {
                method: Method::POST,
                controller: "CustomerController".to_string(),
            }
        );
    }

    #[test]
    fn test_type_name_when_suffix_is_kept() {
        let resolver = RouteResolver::new(Settings {
            strip_controller_suffix: false,
            ..Settings::default()
        });
        let outcome = resolver.resolve(&table(), "/api/customer/32", None);
        assert_eq!(
            outcome.resolved().unwrap().values.controller(),
            Some("CustomerController")
        );
    }
}
