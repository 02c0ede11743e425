//! Route template parsing
//!
//! Pure parsing of route templates such as `api/{controller}/{id}` into typed
//! segments.

use crate::TemplateError;

/// A single segment of a route template
///
/// # Examples
///
/// ```
/// use routeprobe_router::template::{classify_segment, TemplateSegment};
///
/// assert_eq!(classify_segment("api").unwrap(), TemplateSegment::Literal("api".into()));
/// assert_eq!(classify_segment("{id}").unwrap(), TemplateSegment::Parameter("id".into()));
/// assert_eq!(classify_segment("{*path}").unwrap(), TemplateSegment::CatchAll("path".into()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateSegment {
    /// Static text, matched case-insensitively
    Literal(String),
    /// `{name}`: exactly one path segment
    Parameter(String),
    /// `{*name}`: the remainder of the path, possibly empty
    CatchAll(String),
}

impl TemplateSegment {
    /// Parameter name for parameter and catch-all segments
    pub fn parameter_name(&self) -> Option<&str> {
        match self {
            TemplateSegment::Parameter(name) | TemplateSegment::CatchAll(name) => Some(name),
            TemplateSegment::Literal(_) => None,
        }
    }
}

/// Classifies one `/`-separated template segment
///
/// # Parsing Rules (evaluated in order)
///
/// 1. **Catch-all**: `{*name}`
/// 2. **Parameter**: `{name}`
/// 3. **Literal**: text without braces
pub fn classify_segment(segment: &str) -> Result<TemplateSegment, TemplateError> {
    match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        Some(inner) => {
            if inner.contains('{') || inner.contains('}') {
                return Err(TemplateError::UnbalancedBraces(segment.to_string()));
            }

            let (catch_all, name) = match inner.strip_prefix('*') {
                Some(name) => (true, name),
                None => (false, inner),
            };

            let name = name.trim();
            if name.is_empty() {
                return Err(TemplateError::EmptyParameter(segment.to_string()));
            }

            Ok(if catch_all {
                TemplateSegment::CatchAll(name.to_string())
            } else {
                TemplateSegment::Parameter(name.to_string())
            })
        }
        None if segment.contains('{') || segment.contains('}') => {
            Err(TemplateError::UnbalancedBraces(segment.to_string()))
        }
        None => Ok(TemplateSegment::Literal(segment.to_string())),
    }
}

/// Parses a full template into segments
///
/// Leading `~/` and `/` are ignored, empty segments are skipped.
///
/// # Examples
///
/// ```
/// use routeprobe_router::template::{parse_template, TemplateSegment};
///
/// let segments = parse_template("api/{controller}/{id}").unwrap();
/// assert_eq!(segments.len(), 3);
/// assert_eq!(segments[1], TemplateSegment::Parameter("controller".into()));
/// ```
pub fn parse_template(template: &str) -> Result<Vec<TemplateSegment>, TemplateError> {
    let template = template.trim_start_matches('~');

    let segments = template
        .split('/')
        .filter(|s| !s.is_empty())
        .map(classify_segment)
        .collect::<Result<Vec<_>, _>>()?;

    // Catch-all must be last
    if let Some(pos) = segments
        .iter()
        .position(|s| matches!(s, TemplateSegment::CatchAll(_)))
    {
        if pos + 1 != segments.len() {
            let name = segments[pos].parameter_name().unwrap_or_default().to_string();
            return Err(TemplateError::CatchAllNotLast(name));
        }
    }

    let mut seen: Vec<&str> = Vec::new();
    for name in segments.iter().filter_map(TemplateSegment::parameter_name) {
        if seen.iter().any(|s| s.eq_ignore_ascii_case(name)) {
            return Err(TemplateError::DuplicateParameter(name.to_string()));
        }
        seen.push(name);
    }

    Ok(segments)
}
