// routeprobe procedural macros
// Provides the #[controller] attribute and the call!() expression macro

use proc_macro::TokenStream;

mod call;
mod controller;

/// Describes an `impl` block's methods as controller actions
///
/// Every method taking `self` by reference becomes an action. Associated
/// functions without a receiver are skipped.
///
/// # Helper attributes
///
/// - `#[action(name = "ChangePassword")]` - route name of the action
///   (defaults to the method name)
/// - `#[verbs(GET, POST)]` - accepted HTTP methods (defaults to the verb
///   implied by the method name prefix, or any verb)
/// - `#[non_action]` - exclude a method
///
/// # Example
///
/// ```ignore
/// pub struct CustomerController;
///
/// #[controller]
/// impl CustomerController {
///     // GET only, by name convention
///     pub fn get(&self, id: i32) -> String {
///         format!("customer {}", id)
///     }
///
///     #[action(name = "Search")]
///     #[verbs(GET, POST)]
///     pub fn search(&self, q: Option<String>) -> Vec<String> {
///         Vec::new()
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn controller(attr: TokenStream, item: TokenStream) -> TokenStream {
    controller::expand(attr, item)
}

/// Builds an action call expression from a closure over a controller
///
/// The call is type-checked against the controller (the closure is compiled
/// but never run) and turned into a `routeprobe::ActionCall` whose arguments
/// are read as route values.
///
/// # Syntax
///
/// - `call!(|c: HomeController| c.index())`
/// - `call!(|c: CustomerController| c.get(32))`
/// - `call!(|c: MemberController| c.change_password(1234, "new") as bool)`
///
/// Arguments must be literals (`32`, `-1`, `"new"`, `true`, `None`) or
/// `SCREAMING_CASE` constants.
#[proc_macro]
pub fn call(input: TokenStream) -> TokenStream {
    call::expand(input)
}
