use http::Method;

use crate::handler::short_type_name;

/// Type-name suffix stripped to obtain a controller's route name
pub const CONTROLLER_SUFFIX: &str = "Controller";

/// A type whose methods are routable actions
///
/// Usually implemented with the `#[controller]` attribute from
/// `routeprobe-macro`, which reads action names, parameter names and verbs off
/// an `impl` block.
pub trait Controller: 'static {
    fn descriptor() -> ControllerDescriptor;
}

/// Static description of a controller and its actions
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerDescriptor {
    type_name: String,
    actions: Vec<ActionDescriptor>,
}

impl ControllerDescriptor {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            actions: Vec::new(),
        }
    }

    pub fn with_action(mut self, action: ActionDescriptor) -> Self {
        self.actions.push(action);
        self
    }

    /// Type name without module path, e.g. `CustomerController`
    pub fn type_name(&self) -> &str {
        short_type_name(&self.type_name)
    }

    /// Route name: the type name with any `Controller` suffix stripped
    ///
    /// # Examples
    ///
    /// ```
    /// use routeprobe_router::ControllerDescriptor;
    ///
    /// assert_eq!(ControllerDescriptor::new("CustomerController").name(), "Customer");
    /// assert_eq!(ControllerDescriptor::new("Reports").name(), "Reports");
    /// ```
    pub fn name(&self) -> &str {
        let type_name = self.type_name();
        match type_name.strip_suffix(CONTROLLER_SUFFIX) {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => type_name,
        }
    }

    pub fn actions(&self) -> &[ActionDescriptor] {
        &self.actions
    }

    /// Actions whose route name matches (see [`names_match`])
    pub fn actions_named<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a ActionDescriptor> + 'n
    where
        'a: 'n,
    {
        self.actions
            .iter()
            .filter(move |a| names_match(a.name(), name))
    }

    /// Actions implemented by the given Rust method
    pub fn actions_for_method<'a>(
        &'a self,
        method_name: &'a str,
    ) -> impl Iterator<Item = &'a ActionDescriptor> {
        self.actions
            .iter()
            .filter(move |a| a.method_name() == method_name)
    }
}

/// Static description of one action method
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDescriptor {
    name: String,
    method_name: String,
    verbs: Vec<Method>,
    parameters: Vec<ParameterDescriptor>,
}

impl ActionDescriptor {
    /// An action routed as `name` and implemented by `method_name`.
    /// Accepts every verb until verbs are set.
    pub fn new(name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method_name: method_name.into(),
            verbs: Vec::new(),
            parameters: Vec::new(),
        }
    }

    pub fn with_verbs(mut self, verbs: impl IntoIterator<Item = Method>) -> Self {
        self.verbs = verbs.into_iter().collect();
        self
    }

    /// Applies [`conventional_verbs`] to the method name
    pub fn with_conventional_verbs(self) -> Self {
        let verbs = conventional_verbs(&self.method_name);
        self.with_verbs(verbs)
    }

    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// Allowed verbs; empty means any verb
    pub fn verbs(&self) -> &[Method] {
        &self.verbs
    }

    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    pub fn accepts(&self, method: &Method) -> bool {
        self.verbs.is_empty() || self.verbs.contains(method)
    }
}

/// Formal parameter of an action method
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    pub name: String,
    /// Source text of the parameter type
    pub type_name: String,
    /// `Option<_>` parameters may be absent from the route
    pub optional: bool,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, optional: bool) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            optional,
        }
    }
}

/// Whether two route value or action names refer to the same thing
///
/// Comparison ignores ASCII case and underscores, so Rust's snake_case
/// names line up with the camelCase keys route templates tend to use.
///
/// # Examples
///
/// ```
/// use routeprobe_router::names_match;
///
/// assert!(names_match("memberId", "member_id"));
/// assert!(names_match("ChangePassword", "change_password"));
/// assert!(!names_match("id", "ids"));
/// ```
pub fn names_match(a: &str, b: &str) -> bool {
    let mut left = a.chars().filter(|c| *c != '_');
    let mut right = b.chars().filter(|c| *c != '_');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return true,
            (Some(l), Some(r)) if l.eq_ignore_ascii_case(&r) => continue,
            _ => return false,
        }
    }
}

/// Verbs implied by an action's method name prefix
///
/// `get_*` answers GET, `post_*` answers POST and so on; any other name
/// answers every verb.
///
/// # Examples
///
/// ```
/// use routeprobe_router::{conventional_verbs, Method};
///
/// assert_eq!(conventional_verbs("get"), vec![Method::GET]);
/// assert_eq!(conventional_verbs("get_by_name"), vec![Method::GET]);
/// assert_eq!(conventional_verbs("Delete"), vec![Method::DELETE]);
/// assert!(conventional_verbs("change_password").is_empty());
/// assert!(conventional_verbs("getaway").is_empty());
/// ```
pub fn conventional_verbs(method_name: &str) -> Vec<Method> {
    const PREFIXES: [(&str, Method); 7] = [
        ("get", Method::GET),
        ("post", Method::POST),
        ("put", Method::PUT),
        ("delete", Method::DELETE),
        ("patch", Method::PATCH),
        ("head", Method::HEAD),
        ("options", Method::OPTIONS),
    ];

    let lower = method_name.to_ascii_lowercase();
    PREFIXES
        .iter()
        .find(|(prefix, _)| {
            lower == *prefix
                || lower
                    .strip_prefix(prefix)
                    .map(|rest| rest.starts_with('_') || starts_upper(&method_name[prefix.len()..]))
                    .unwrap_or(false)
        })
        .map(|(_, method)| vec![method.clone()])
        .unwrap_or_default()
}

fn starts_upper(s: &str) -> bool {
    s.chars().next().map(|c| c.is_ascii_uppercase()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> ControllerDescriptor {
        ControllerDescriptor::new("app::controllers::CustomerController")
            .with_action(
                ActionDescriptor::new("get", "get")
                    .with_conventional_verbs()
                    .with_parameter(ParameterDescriptor::new("id", "i32", false)),
            )
            .with_action(ActionDescriptor::new("GetAll", "get_all").with_conventional_verbs())
    }

    #[test]
    fn test_names() {
        let c = customer();
        assert_eq!(c.type_name(), "CustomerController");
        assert_eq!(c.name(), "Customer");
        assert_eq!(ControllerDescriptor::new("Controller").name(), "Controller");
    }

    #[test]
    fn test_action_lookup() {
        let c = customer();
        assert_eq!(c.actions_named("GET").count(), 1);
        assert_eq!(c.actions_named("getall").count(), 1);
        assert_eq!(c.actions_for_method("get_all").count(), 1);
        assert_eq!(c.actions_for_method("GetAll").count(), 0);
    }

    #[test]
    fn test_found_actions_outlive_lookup_name() {
        let c = customer();
        let found: Vec<&ActionDescriptor> = {
            let name = String::from("getAll");
            c.actions_named(&name).collect()
        };
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].method_name(), "get_all");
    }

    #[test]
    fn test_accepts() {
        let c = customer();
        let get = &c.actions()[0];
        assert!(get.accepts(&Method::GET));
        assert!(!get.accepts(&Method::POST));
        assert!(ActionDescriptor::new("index", "index").accepts(&Method::PUT));
    }

    #[test]
    fn test_camel_case_convention() {
        assert_eq!(conventional_verbs("PostComment"), vec![Method::POST]);
        assert!(conventional_verbs("Posture").is_empty());
    }
}
