use std::any::{type_name, TypeId};
use std::fmt;

/// A message handler attached to a route
///
/// Handlers are identified by type. The route table never invokes them, it
/// only records which handler the dispatch pipeline would run for a route.
#[derive(Clone, Copy)]
pub struct Handler {
    type_id: TypeId,
    type_name: &'static str,
}

impl Handler {
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    /// Whether this handler is of type `T`
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Full type path, e.g. `my_app::handlers::AuthHandler`
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Type name without module path or generic arguments
    ///
    /// # Examples
    ///
    /// ```
    /// use routeprobe_router::Handler;
    ///
    /// struct TestHandlerOne;
    /// assert_eq!(Handler::of::<TestHandlerOne>().short_name(), "TestHandlerOne");
    /// ```
    pub fn short_name(&self) -> &'static str {
        short_type_name(self.type_name)
    }
}

/// Strips the module path and generic arguments from a type name
pub(crate) fn short_type_name(name: &str) -> &str {
    let base = name.split('<').next().unwrap_or(name);
    base.rsplit("::").next().unwrap_or(base)
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for Handler {}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler").field(&self.type_name).finish()
    }
}
