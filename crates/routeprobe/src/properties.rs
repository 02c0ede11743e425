// Reads route values from plain data objects
// Any Serialize type works; only scalar fields become route values

use serde::Serialize;
use serde_json::Value as Json;

use routeprobe_router::Value;

use crate::values::{RouteValue, RouteValueOrigin, RouteValues};

/// Extracts simple-typed fields from serializable objects
///
/// Fields serializing to strings, booleans, numbers or null (an empty
/// `Option`) are simple. Nested structs, maps and sequences are skipped.
pub struct PropertyReader;

impl PropertyReader {
    /// Whether a serialized field is a routable scalar
    pub fn is_simple(value: &Json) -> bool {
        matches!(
            value,
            Json::String(_) | Json::Bool(_) | Json::Number(_) | Json::Null
        )
    }

    /// Simple fields of `data` in declaration order
    ///
    /// A value that does not serialize to an object (a unit, a number)
    /// has no properties.
    ///
    /// # Examples
    ///
    /// ```
    /// use routeprobe::{PropertyReader, Value};
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct Expected {
    ///     controller: &'static str,
    ///     id: i32,
    ///     tags: Vec<String>,
    /// }
    ///
    /// let props = PropertyReader::properties(&Expected {
    ///     controller: "Home",
    ///     id: 42,
    ///     tags: vec![],
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(props.len(), 2);
    /// assert_eq!(props[1].value, Value::Int(42));
    /// ```
    pub fn properties<T: Serialize + ?Sized>(data: &T) -> serde_json::Result<Vec<RouteValue>> {
        let Json::Object(fields) = serde_json::to_value(data)? else {
            return Ok(Vec::new());
        };

        Ok(fields
            .into_iter()
            .filter(|(_, value)| Self::is_simple(value))
            .map(|(name, value)| RouteValue::new(name, scalar(value), RouteValueOrigin::Unknown))
            .collect())
    }

    /// Names of the simple fields of `data`
    pub fn simple_property_names<T: Serialize + ?Sized>(data: &T) -> serde_json::Result<Vec<String>> {
        Ok(Self::properties(data)?
            .into_iter()
            .map(|property| property.name)
            .collect())
    }

    /// Route values from the simple fields of `data`
    pub fn route_values<T: Serialize + ?Sized>(data: &T) -> serde_json::Result<RouteValues> {
        let mut values = RouteValues::new();
        for property in Self::properties(data)? {
            values.add(property);
        }
        Ok(values)
    }
}

fn scalar(value: Json) -> Value {
    match value {
        Json::String(s) => Value::Str(s),
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => Value::Int(i),
            (None, Some(u)) => Value::from(u),
            (None, None) => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
        },
        _ => Value::Null,
    }
}
