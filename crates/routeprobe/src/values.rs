use routeprobe_router::{names_match, Value};

use crate::assert_engine::AssertEngine;

/// Where a route value logically came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RouteValueOrigin {
    #[default]
    Unknown,
    /// Captured from the url path or query string
    Url,
    /// Bound from the request body
    Body,
    /// Filled in from a route default
    Default,
}

/// One named routing value
#[derive(Debug, Clone, PartialEq)]
pub struct RouteValue {
    pub name: String,
    pub value: Value,
    pub origin: RouteValueOrigin,
    /// Whether this is the conventional `id` value
    pub is_id: bool,
}

impl RouteValue {
    pub fn new(name: impl Into<String>, value: impl Into<Value>, origin: RouteValueOrigin) -> Self {
        let name = name.into();
        let is_id = names_match(&name, "id");
        Self {
            name,
            value: value.into(),
            origin,
            is_id,
        }
    }

    /// Textual form, as the value would appear in a url
    pub fn value_as_string(&self) -> String {
        self.value.to_string()
    }
}

/// Controller, action and the other values of one route
///
/// Keys are looked up with [`names_match`]; `controller` and `action` are held
/// apart from the other values. A set built from raw data is not known to be
/// valid until [`check_data_ok`](Self::check_data_ok) has run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteValues {
    controller: Option<String>,
    action: Option<String>,
    values: Vec<RouteValue>,
    data_ok: bool,
}

pub(crate) const CONTROLLER_KEY: &str = "controller";
pub(crate) const ACTION_KEY: &str = "action";

impl RouteValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from raw string data
    ///
    /// # Examples
    ///
    /// ```
    /// use routeprobe::RouteValues;
    ///
    /// let values = RouteValues::from_strings([
    ///     ("controller", "foo"),
    ///     ("action", "bar"),
    ///     ("fish", "hallibut"),
    /// ]);
    /// assert_eq!(values.controller(), Some("foo"));
    /// assert_eq!(values.values().len(), 1);
    /// ```
    pub fn from_strings<I, K, V>(data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_pairs(
            data.into_iter()
                .map(|(k, v)| (Into::<String>::into(k), Value::Str(v.into()))),
        )
    }

    /// Builds a set from typed values, all with unknown origin
    pub fn from_pairs<I, K>(data: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut values = Self::new();
        for (name, value) in data {
            values.add(RouteValue::new(name, value, RouteValueOrigin::Unknown));
        }
        values
    }

    pub fn with_controller(mut self, controller: impl Into<String>) -> Self {
        self.controller = Some(controller.into()).filter(|c| !c.is_empty());
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into()).filter(|a| !a.is_empty());
        self
    }

    /// Adds a value, keeping the first one when a key repeats
    ///
    /// `controller` and `action` keys set the corresponding fields.
    pub fn add(&mut self, value: RouteValue) {
        let slot = if names_match(&value.name, CONTROLLER_KEY) {
            Some(&mut self.controller)
        } else if names_match(&value.name, ACTION_KEY) {
            Some(&mut self.action)
        } else {
            None
        };

        match slot {
            Some(slot) => {
                if slot.is_none() && !value.value.is_empty() {
                    *slot = Some(value.value_as_string());
                }
            }
            None => {
                if self.get(&value.name).is_none() {
                    self.values.push(value);
                }
            }
        }
    }

    pub fn controller(&self) -> Option<&str> {
        self.controller.as_deref()
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// Values other than controller and action, in insertion order
    pub fn values(&self) -> &[RouteValue] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<&RouteValue> {
        self.values.iter().find(|v| names_match(&v.name, name))
    }

    /// Looks up a value by name
    ///
    /// Entries are not yet filtered by `origin`: every origin, `Body`
    /// included, behaves like [`RouteValueOrigin::Unknown`].
    pub fn get_route_value(&self, name: &str, origin: RouteValueOrigin) -> Option<&RouteValue> {
        let _ = origin;
        self.get(name)
    }

    /// Checks the required keys, reporting one failure per missing key
    pub fn check_data_ok(&mut self, engine: &dyn AssertEngine) -> bool {
        let mut ok = true;

        if self.controller.is_none() {
            engine.fail("No controller property found");
            ok = false;
        }

        if self.action.is_none() {
            engine.fail("No action property found");
            ok = false;
        }

        self.data_ok = ok;
        ok
    }

    /// Result of the last [`check_data_ok`](Self::check_data_ok); false
    /// until it has run
    pub fn data_ok(&self) -> bool {
        self.data_ok
    }

    /// Controller, action, then the other values
    pub fn to_pairs(&self) -> Vec<(String, Value)> {
        let mut pairs = Vec::with_capacity(self.values.len() + 2);
        if let Some(controller) = &self.controller {
            pairs.push((CONTROLLER_KEY.to_string(), Value::from(controller.as_str())));
        }
        if let Some(action) = &self.action {
            pairs.push((ACTION_KEY.to_string(), Value::from(action.as_str())));
        }
        pairs.extend(self.values.iter().map(|v| (v.name.clone(), v.value.clone())));
        pairs
    }
}
