use http::Method;

use crate::template::{parse_template, TemplateSegment};
use crate::{names_match, Constraint, Handler, TemplateError, Value};

/// Default for a route value
#[derive(Debug, Clone, PartialEq)]
pub enum RouteDefault {
    /// Used when the template parameter is absent from the path
    Value(Value),
    /// The parameter may be absent and then produces no route value
    Optional,
}

/// A single route: template, defaults, constraints and handler
#[derive(Debug, Clone)]
pub struct Route {
    /// Name for URL generation (`Default`, `DefaultApi`, ...)
    pub name: Option<String>,
    /// Template text as registered, e.g. `api/{controller}/{id}`
    pub template: String,
    pub(crate) segments: Vec<TemplateSegment>,
    pub(crate) defaults: Vec<(String, RouteDefault)>,
    pub(crate) constraints: Vec<(String, Constraint)>,
    pub(crate) handler: Option<Handler>,
    /// Ignore routes stop matching: a request they match routes nowhere
    pub(crate) is_ignore: bool,
}

impl Route {
    /// Creates a named route from a template
    ///
    /// # Examples
    ///
    /// ```
    /// use routeprobe_router::Route;
    ///
    /// let route = Route::new("DefaultApi", "api/{controller}/{id}").unwrap();
    /// assert_eq!(route.parameter_names(), vec!["controller", "id"]);
    /// ```
    pub fn new(name: impl Into<String>, template: &str) -> Result<Self, TemplateError> {
        let mut route = Self::unnamed(template)?;
        route.name = Some(name.into());
        Ok(route)
    }

    pub fn unnamed(template: &str) -> Result<Self, TemplateError> {
        Ok(Self {
            name: None,
            template: template.to_string(),
            segments: parse_template(template)?,
            defaults: Vec::new(),
            constraints: Vec::new(),
            handler: None,
            is_ignore: false,
        })
    }

    /// A route whose matches are routed nowhere (static resources etc.)
    pub fn ignore(template: &str) -> Result<Self, TemplateError> {
        let mut route = Self::unnamed(template)?;
        route.is_ignore = true;
        Ok(route)
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Sets a default value
    ///
    /// # Examples
    ///
    /// ```
    /// use routeprobe_router::{Route, RouteDefault, Value};
    ///
    /// let route = Route::new("Default", "{controller}/{action}/{id}")
    ///     .unwrap()
    ///     .with_default("controller", "Home")
    ///     .with_default("id", 32);
    /// assert_eq!(route.default_for("ID"), Some(&RouteDefault::Value(Value::Int(32))));
    /// ```
    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_default(key.into(), RouteDefault::Value(value.into()));
        self
    }

    /// Marks a parameter optional
    pub fn with_optional(mut self, key: impl Into<String>) -> Self {
        self.set_default(key.into(), RouteDefault::Optional);
        self
    }

    pub fn with_constraint(mut self, key: impl Into<String>, constraint: Constraint) -> Self {
        self.constraints.push((key.into(), constraint));
        self
    }

    /// Restricts the route to the given HTTP methods
    pub fn with_methods(self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.with_constraint("httpMethod", Constraint::Methods(methods.into_iter().collect()))
    }

    /// Attaches a per-route message handler
    pub fn with_handler(mut self, handler: Handler) -> Self {
        self.handler = Some(handler);
        self
    }

    fn set_default(&mut self, key: String, default: RouteDefault) {
        match self
            .defaults
            .iter_mut()
            .find(|(k, _)| names_match(k, &key))
        {
            Some(entry) => entry.1 = default,
            None => self.defaults.push((key, default)),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn segments(&self) -> &[TemplateSegment] {
        &self.segments
    }

    pub fn parameter_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(TemplateSegment::parameter_name)
            .collect()
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.segments
            .iter()
            .filter_map(TemplateSegment::parameter_name)
            .any(|p| names_match(p, name))
    }

    pub fn default_for(&self, key: &str) -> Option<&RouteDefault> {
        self.defaults
            .iter()
            .find(|(k, _)| names_match(k, key))
            .map(|(_, d)| d)
    }

    pub fn defaults(&self) -> &[(String, RouteDefault)] {
        &self.defaults
    }

    pub fn constraints_for<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Constraint> {
        self.constraints
            .iter()
            .filter(move |(k, _)| names_match(k, key))
            .map(|(_, c)| c)
    }

    pub fn handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }

    pub fn is_ignore(&self) -> bool {
        self.is_ignore
    }

    /// Whether every method constraint accepts the method
    pub fn allows_method(&self, method: &Method) -> bool {
        self.constraints.iter().all(|(_, c)| c.allows_method(method))
    }

    /// Whether every value constraint on `key` accepts the value
    pub fn validates(&self, key: &str, value: &str) -> bool {
        self.constraints_for(key).all(|c| c.validate(value))
    }
}
