use http::Method;
use regex::Regex;

/// Constraint attached to a route parameter (or, for [`Constraint::Methods`],
/// to the whole route)
///
/// # Examples
///
/// ```
/// use routeprobe_router::Constraint;
///
/// assert!(Constraint::Int.validate("42"));
/// assert!(!Constraint::Int.validate("abc"));
/// assert!(Constraint::Alpha.validate("abc"));
/// assert!(Constraint::regex("^[a-z]{3}$").unwrap().validate("abc"));
/// ```
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Signed integer
    Int,
    /// ASCII letters only
    Alpha,
    /// Full-match regular expression
    Regex(Regex),
    /// Request must use one of these HTTP methods
    Methods(Vec<Method>),
}

impl Constraint {
    /// Builds a regex constraint anchored to the whole value
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        let anchored = format!(
            "^(?:{})$",
            pattern.trim_start_matches('^').trim_end_matches('$')
        );
        Regex::new(&anchored).map(Constraint::Regex)
    }

    /// Checks a parameter value. Method constraints never reject a value.
    pub fn validate(&self, value: &str) -> bool {
        match self {
            Constraint::Int => value.parse::<i64>().is_ok(),
            Constraint::Alpha => !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic()),
            Constraint::Regex(re) => re.is_match(value),
            Constraint::Methods(_) => true,
        }
    }

    /// Checks a request method. Value constraints never reject a method.
    pub fn allows_method(&self, method: &Method) -> bool {
        match self {
            Constraint::Methods(methods) => methods.contains(method),
            _ => true,
        }
    }
}
