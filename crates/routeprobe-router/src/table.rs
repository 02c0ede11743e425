use http::Method;
use tracing::{debug, trace};

use crate::generate::generate_for_route;
use crate::path::segments;
use crate::request::decode;
use crate::template::TemplateSegment;
use crate::{
    names_match, ActionDescriptor, Controller, ControllerDescriptor, Handler, Request, Route,
    RouteDefault, RoutingError, SelectionError, Value,
};

// ============================================================================
// Route Data
// ============================================================================

/// Where a route data value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// Captured from a path segment
    Path,
    /// Filled in from a route default
    Default,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteDataValue {
    pub value: Value,
    pub source: ValueSource,
}

/// Result of matching a request against the table
#[derive(Debug, Clone, PartialEq)]
pub struct RouteData {
    route_name: Option<String>,
    template: String,
    values: Vec<(String, RouteDataValue)>,
    handler: Option<Handler>,
}

impl RouteData {
    /// Value for a key (see [`names_match`](crate::names_match))
    pub fn get(&self, key: &str) -> Option<&RouteDataValue> {
        self.values
            .iter()
            .find(|(k, _)| names_match(k, key))
            .map(|(_, v)| v)
    }

    /// Values in template order, then defaults
    pub fn values(&self) -> &[(String, RouteDataValue)] {
        &self.values
    }

    pub fn controller(&self) -> Option<String> {
        self.text("controller")
    }

    pub fn action(&self) -> Option<String> {
        self.text("action")
    }

    pub fn route_name(&self) -> Option<&str> {
        self.route_name.as_deref()
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Handler the dispatch pipeline would run for this route
    pub fn handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }

    fn text(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(|v| v.value.to_string())
            .filter(|s| !s.is_empty())
    }
}

/// Controller and action chosen for a matched route
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedAction {
    pub controller: ControllerDescriptor,
    pub action: ActionDescriptor,
}

// ============================================================================
// Route Table
// ============================================================================

/// Ordered route collection plus the controllers routes dispatch to
///
/// Routes are tried in registration order; the first match wins.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
    controllers: Vec<ControllerDescriptor>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_route(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Builder form of [`RouteTable::add_route`]
    pub fn with_route(mut self, route: Route) -> Self {
        self.add_route(route);
        self
    }

    /// Removes every route, keeping registered controllers
    pub fn clear_routes(&mut self) {
        self.routes.clear();
    }

    /// Registers a controller, replacing any with the same type name
    pub fn register<C: Controller>(&mut self) {
        self.register_descriptor(C::descriptor());
    }

    pub fn with_controller<C: Controller>(mut self) -> Self {
        self.register::<C>();
        self
    }

    pub fn register_descriptor(&mut self, descriptor: ControllerDescriptor) {
        self.controllers
            .retain(|c| c.type_name() != descriptor.type_name());
        self.controllers.push(descriptor);
    }

    pub fn with_controller_descriptor(mut self, descriptor: ControllerDescriptor) -> Self {
        self.register_descriptor(descriptor);
        self
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn controllers(&self) -> &[ControllerDescriptor] {
        &self.controllers
    }

    pub fn route_named(&self, name: &str) -> Option<&Route> {
        self.routes
            .iter()
            .find(|r| r.name.as_deref() == Some(name))
    }

    /// Controller registered under a route name (`Customer`) or type name
    pub fn controller_named(&self, name: &str) -> Option<&ControllerDescriptor> {
        self.controllers.iter().find(|c| {
            c.name().eq_ignore_ascii_case(name) || c.type_name().eq_ignore_ascii_case(name)
        })
    }

    // ========================================================================
    // Matching
    // ========================================================================

    /// Finds the first route matching the request
    ///
    /// Returns `Ok(None)` when no route matches or an ignore route matches.
    ///
    /// # Examples
    ///
    /// ```
    /// use routeprobe_router::{Request, Route, RouteTable};
    ///
    /// let table = RouteTable::new().with_route(
    ///     Route::new("DefaultApi", "api/{controller}/{id}").unwrap().with_optional("id"),
    /// );
    ///
    /// let data = table.match_request(&Request::get("/api/customer/32").unwrap()).unwrap();
    /// assert_eq!(data.unwrap().controller().as_deref(), Some("customer"));
    ///
    /// let data = table.match_request(&Request::get("/api/missing/32/foo").unwrap()).unwrap();
    /// assert!(data.is_none());
    /// ```
    pub fn match_request(&self, request: &Request) -> Result<Option<RouteData>, RoutingError> {
        let path_segments = segments(request.path());

        for route in &self.routes {
            trace!(template = %route.template, path = %request.path(), "trying route");

            let Some(values) = match_route(route, &path_segments, request.method())? else {
                continue;
            };

            if route.is_ignore() {
                debug!(template = %route.template, "request matched an ignore route");
                return Ok(None);
            }

            debug!(
                route = route.name.as_deref().unwrap_or("<unnamed>"),
                template = %route.template,
                "route matched"
            );

            return Ok(Some(RouteData {
                route_name: route.name.clone(),
                template: route.template.clone(),
                values,
                handler: route.handler,
            }));
        }

        debug!(path = %request.path(), "no route matched");
        Ok(None)
    }

    // ========================================================================
    // Action Selection
    // ========================================================================

    /// Chooses the controller action a matched route dispatches to
    ///
    /// When the route data names an action, candidates are the controller's
    /// actions with that name; otherwise every action is a candidate and the
    /// verb decides. Among candidates accepting the verb, the one binding the
    /// most parameters wins; an action binds when each required parameter is
    /// available from route data or the query string.
    ///
    /// Fails with [`SelectionError::MethodNotAllowed`] when candidates exist
    /// but none accepts the request method.
    pub fn select_action(
        &self,
        data: &RouteData,
        request: &Request,
    ) -> Result<SelectedAction, SelectionError> {
        let controller_name = data
            .controller()
            .ok_or_else(|| SelectionError::NotFound("route data has no controller".to_string()))?;

        let controller = self.controller_named(&controller_name).ok_or_else(|| {
            SelectionError::NotFound(format!("no controller named '{}'", controller_name))
        })?;

        let action_name = data.action();
        let candidates: Vec<&ActionDescriptor> = match &action_name {
            Some(action) => controller.actions_named(action).collect(),
            None => controller.actions().iter().collect(),
        };

        if candidates.is_empty() {
            return Err(SelectionError::NotFound(format!(
                "controller '{}' has no matching action",
                controller.name()
            )));
        }

        let method = request.method();
        let by_verb: Vec<&ActionDescriptor> = candidates
            .into_iter()
            .filter(|a| a.accepts(method))
            .collect();

        if by_verb.is_empty() {
            debug!(controller = controller.name(), %method, "no action accepts method");
            return Err(SelectionError::MethodNotAllowed {
                method: method.clone(),
                controller: controller.name().to_string(),
                controller_type: controller.type_name().to_string(),
            });
        }

        // Reversed so the first declared action wins ties
        let selected = by_verb
            .into_iter()
            .rev()
            .filter(|a| binds(a, data, request))
            .max_by_key(|a| bound_count(a, data, request))
            .ok_or_else(|| {
                SelectionError::NotFound(format!(
                    "no action on controller '{}' binds the request",
                    controller.name()
                ))
            })?;

        debug!(
            controller = controller.name(),
            action = selected.name(),
            "action selected"
        );

        Ok(SelectedAction {
            controller: controller.clone(),
            action: selected.clone(),
        })
    }

    // ========================================================================
    // URL Generation
    // ========================================================================

    /// Generates a URL from route values using the first route that can
    /// produce one
    ///
    /// `app_path` is the application root the URL is generated under.
    /// Trailing parameters equal to their defaults are dropped and values not
    /// used by the route go to the query string.
    ///
    /// # Examples
    ///
    /// ```
    /// use routeprobe_router::{Route, RouteTable, Value};
    ///
    /// let table = RouteTable::new().with_route(
    ///     Route::new("Default", "{controller}/{action}/{id}")
    ///         .unwrap()
    ///         .with_default("controller", "Home")
    ///         .with_default("action", "Index")
    ///         .with_optional("id"),
    /// );
    ///
    /// let values = vec![
    ///     ("action".to_string(), Value::from("NoSuchAction")),
    ///     ("controller".to_string(), Value::from("Home")),
    /// ];
    /// assert_eq!(table.generate_url(&values, None).as_deref(), Some("/Home/NoSuchAction"));
    /// assert_eq!(table.generate_url(&values, Some("/foo")).as_deref(), Some("/foo/Home/NoSuchAction"));
    /// ```
    pub fn generate_url(&self, values: &[(String, Value)], app_path: Option<&str>) -> Option<String> {
        let relative = self
            .routes
            .iter()
            .filter(|r| !r.is_ignore())
            .find_map(|route| generate_for_route(route, values))?;

        Some(with_app_path(app_path, &relative))
    }

    /// Generates a URL with one named route
    pub fn url_for(&self, name: &str, values: &[(String, Value)]) -> Option<String> {
        self.route_named(name)
            .and_then(|route| generate_for_route(route, values))
            .map(|relative| with_app_path(None, &relative))
    }
}

fn with_app_path(app_path: Option<&str>, relative: &str) -> String {
    let root = app_path.unwrap_or("").trim_start_matches('~').trim_end_matches('/');
    let root = root.trim_start_matches('/');
    if root.is_empty() {
        format!("/{}", relative)
    } else {
        format!("/{}/{}", root, relative)
    }
}

// ============================================================================
// Matching helpers
// ============================================================================

fn match_route(
    route: &Route,
    path: &[&str],
    method: &Method,
) -> Result<Option<Vec<(String, RouteDataValue)>>, RoutingError> {
    if !route.allows_method(method) {
        return Ok(None);
    }

    let Some(mut values) = match_segments(route, route.segments(), path, Vec::new())? else {
        return Ok(None);
    };

    // Defaults for keys the template does not carry (controller = "Foo" ...)
    for (key, default) in route.defaults() {
        if let RouteDefault::Value(value) = default {
            if !values.iter().any(|(k, _)| names_match(k, key)) {
                values.push((key.clone(), default_value(value)));
            }
        }
    }

    let all_valid = values
        .iter()
        .all(|(key, v)| route.validates(key, &v.value.to_string()));

    Ok(if all_valid { Some(values) } else { None })
}

/// Walks template and path segments together
fn match_segments(
    route: &Route,
    template: &[TemplateSegment],
    path: &[&str],
    mut values: Vec<(String, RouteDataValue)>,
) -> Result<Option<Vec<(String, RouteDataValue)>>, RoutingError> {
    let Some((segment, rest)) = template.split_first() else {
        // Consumed the template: success only if the path is consumed too
        return Ok(path.is_empty().then_some(values));
    };

    match segment {
        TemplateSegment::Literal(text) => match path.split_first() {
            Some((head, tail)) if head.eq_ignore_ascii_case(text) => {
                match_segments(route, rest, tail, values)
            }
            _ => Ok(None),
        },
        TemplateSegment::Parameter(name) => match path.split_first() {
            Some((head, tail)) => {
                values.push((name.clone(), path_value(decode(head)?)));
                match_segments(route, rest, tail, values)
            }
            None => match route.default_for(name) {
                Some(RouteDefault::Value(value)) => {
                    values.push((name.clone(), default_value(value)));
                    match_segments(route, rest, path, values)
                }
                Some(RouteDefault::Optional) => match_segments(route, rest, path, values),
                None => Ok(None),
            },
        },
        TemplateSegment::CatchAll(name) => {
            if path.is_empty() {
                if let Some(RouteDefault::Value(value)) = route.default_for(name) {
                    values.push((name.clone(), default_value(value)));
                }
            } else {
                let decoded = path
                    .iter()
                    .map(|s| decode(s))
                    .collect::<Result<Vec<_>, _>>()?;
                values.push((name.clone(), path_value(decoded.join("/"))));
            }
            Ok(Some(values))
        }
    }
}

fn path_value(text: String) -> RouteDataValue {
    RouteDataValue {
        value: Value::Str(text),
        source: ValueSource::Path,
    }
}

fn default_value(value: &Value) -> RouteDataValue {
    RouteDataValue {
        value: value.clone(),
        source: ValueSource::Default,
    }
}

// ============================================================================
// Selection helpers
// ============================================================================

fn available(name: &str, data: &RouteData, request: &Request) -> bool {
    data.get(name).map(|v| !v.value.is_empty()).unwrap_or(false)
        || request.query_value(name).is_some()
}

fn binds(action: &ActionDescriptor, data: &RouteData, request: &Request) -> bool {
    action
        .parameters()
        .iter()
        .all(|p| p.optional || available(&p.name, data, request))
}

fn bound_count(action: &ActionDescriptor, data: &RouteData, request: &Request) -> usize {
    action
        .parameters()
        .iter()
        .filter(|p| available(&p.name, data, request))
        .count()
}
