use crate::template::TemplateSegment;
use crate::{names_match, Route, RouteDefault, Value};

/// Generates the app-relative URL (without leading `/`) for one route
///
/// Returns `None` when the route cannot represent the values:
/// - a default the template does not carry disagrees with a supplied value
/// - a required parameter has neither a value nor a default
/// - a supplied value fails the parameter's constraints
/// - an empty optional parameter would be followed by further segments
pub(crate) fn generate_for_route(route: &Route, values: &[(String, Value)]) -> Option<String> {
    let supplied = |key: &str| {
        values
            .iter()
            .find(|(k, _)| names_match(k, key))
            .map(|(_, v)| v)
            .filter(|v| !v.is_null())
    };

    // Defaults outside the template act as filters
    let defaults_agree = route.defaults().iter().all(|(key, default)| {
        route.has_parameter(key)
            || match (default, supplied(key)) {
                (RouteDefault::Value(d), Some(v)) => v.text_eq(d),
                _ => true,
            }
    });
    if !defaults_agree {
        return None;
    }

    // (text, elidable) per template segment
    let mut parts: Vec<(String, bool)> = Vec::with_capacity(route.segments().len());
    for segment in route.segments() {
        let (name, catch_all) = match segment {
            TemplateSegment::Literal(text) => {
                parts.push((text.clone(), false));
                continue;
            }
            TemplateSegment::Parameter(name) => (name, false),
            TemplateSegment::CatchAll(name) => (name, true),
        };

        let part = match (supplied(name), route.default_for(name)) {
            (Some(value), default) => {
                if !route.validates(name, &value.to_string()) {
                    return None;
                }
                let elidable = matches!(default, Some(RouteDefault::Value(d)) if value.text_eq(d));
                (encode_value(value, catch_all), elidable)
            }
            (None, Some(RouteDefault::Value(d))) => (encode_value(d, catch_all), true),
            (None, Some(RouteDefault::Optional)) => (String::new(), true),
            (None, None) if catch_all => (String::new(), true),
            (None, None) => return None,
        };
        parts.push(part);
    }

    while parts.last().map(|(_, elidable)| *elidable).unwrap_or(false) {
        parts.pop();
    }

    if parts.iter().any(|(text, _)| text.is_empty()) {
        return None;
    }

    let path = parts
        .into_iter()
        .map(|(text, _)| text)
        .collect::<Vec<_>>()
        .join("/");

    let query = values
        .iter()
        .filter(|(key, value)| {
            !value.is_null() && !route.has_parameter(key) && route.default_for(key).is_none()
        })
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(&value.to_string())
            )
        })
        .collect::<Vec<_>>();

    if query.is_empty() {
        Some(path)
    } else {
        Some(format!("{}?{}", path, query.join("&")))
    }
}

fn encode_value(value: &Value, catch_all: bool) -> String {
    let text = value.to_string();
    if catch_all {
        text.split('/')
            .map(|piece| urlencoding::encode(piece).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    } else {
        urlencoding::encode(&text).into_owned()
    }
}
