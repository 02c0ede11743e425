//! Integration tests for routeprobe-router
//!
//! Tests are organized by feature area:
//! - Template parsing
//! - Matching (defaults, optional and catch-all parameters, ignore routes)
//! - Constraints
//! - Action selection
//! - URL generation

use pretty_assertions::assert_eq;
use routeprobe_router::*;
use rstest::rstest;

fn default_route() -> Route {
    Route::new("Default", "{controller}/{action}/{id}")
        .unwrap()
        .with_default("controller", "Home")
        .with_default("action", "Index")
        .with_optional("id")
}

fn customer_controller() -> ControllerDescriptor {
    ControllerDescriptor::new("CustomerController")
        .with_action(
            ActionDescriptor::new("get", "get")
                .with_conventional_verbs()
                .with_parameter(ParameterDescriptor::new("id", "i32", false)),
        )
        .with_action(ActionDescriptor::new("get_all", "get_all").with_conventional_verbs())
        .with_action(
            ActionDescriptor::new("delete", "delete")
                .with_conventional_verbs()
                .with_parameter(ParameterDescriptor::new("id", "i32", false)),
        )
}

fn api_table() -> RouteTable {
    RouteTable::new()
        .with_route(
            Route::new("DefaultApi", "api/{controller}/{id}")
                .unwrap()
                .with_optional("id"),
        )
        .with_controller_descriptor(customer_controller())
}

fn value_of(data: &RouteData, key: &str) -> Option<String> {
    data.get(key).map(|v| v.value.to_string())
}

// ============================================================================
// Template parsing
// ============================================================================

#[test]
fn test_template_rejects_unbalanced_braces() {
    assert!(matches!(
        Route::new("bad", "{controller/{action}"),
        Err(TemplateError::UnbalancedBraces(_))
    ));
}

#[test]
fn test_template_rejects_duplicate_parameter() {
    assert!(matches!(
        Route::new("bad", "{id}/{id}"),
        Err(TemplateError::DuplicateParameter(_))
    ));
}

#[test]
fn test_template_rejects_catch_all_not_last() {
    assert!(matches!(
        Route::new("bad", "{*path}/edit"),
        Err(TemplateError::CatchAllNotLast(_))
    ));
}

#[test]
fn test_template_parameter_names() {
    let route = default_route();
    assert_eq!(route.parameter_names(), vec!["controller", "action", "id"]);
    assert!(route.has_parameter("ID"));
}

// ============================================================================
// Matching
// ============================================================================

#[test]
fn test_match_fills_defaults() {
    let table = RouteTable::new().with_route(default_route());

    let data = table.match_request(&Request::get("/").unwrap()).unwrap().unwrap();
    assert_eq!(data.controller().as_deref(), Some("Home"));
    assert_eq!(data.action().as_deref(), Some("Index"));
    assert!(data.get("id").is_none());
    assert_eq!(data.get("controller").unwrap().source, ValueSource::Default);
}

#[test]
fn test_match_captures_path_values() {
    let table = RouteTable::new().with_route(default_route());

    let data = table
        .match_request(&Request::get("/home/index/42").unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(value_of(&data, "id").as_deref(), Some("42"));
    assert_eq!(data.get("id").unwrap().source, ValueSource::Path);
    assert_eq!(data.route_name(), Some("Default"));
}

#[test]
fn test_match_first_route_wins() {
    let table = RouteTable::new()
        .with_route(
            Route::new("FooBarFishRoute", "Foo/Bar/Fish/{name}/{pony}")
                .unwrap()
                .with_default("controller", "Foo")
                .with_default("action", "Bar"),
        )
        .with_route(default_route());

    let data = table
        .match_request(&Request::get("/foo/bar/fish/betsy/trotter").unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(data.route_name(), Some("FooBarFishRoute"));
    assert_eq!(data.controller().as_deref(), Some("Foo"));
    assert_eq!(value_of(&data, "pony").as_deref(), Some("trotter"));
}

#[test]
fn test_match_too_many_segments() {
    let table = api_table();
    let data = table
        .match_request(&Request::get("/api/missing/32/foo").unwrap())
        .unwrap();
    assert!(data.is_none());
}

#[test]
fn test_catch_all_captures_rest() {
    let table = RouteTable::new().with_route(Route::new("docs", "docs/{*path}").unwrap());

    let data = table
        .match_request(&Request::get("/docs/guide/install").unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(value_of(&data, "path").as_deref(), Some("guide/install"));
}

#[test]
fn test_ignore_route_stops_matching() {
    let table = RouteTable::new()
        .with_route(Route::ignore("content/{*path_info}").unwrap())
        .with_route(default_route());

    let data = table
        .match_request(&Request::get("/content/site.css").unwrap())
        .unwrap();
    assert!(data.is_none());
}

#[test]
fn test_percent_decoding() {
    let table = RouteTable::new().with_route(default_route());

    let data = table
        .match_request(&Request::get("/home/index/a%20b").unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(value_of(&data, "id").as_deref(), Some("a b"));
}

#[test]
fn test_route_handler_is_carried() {
    struct AuthHandler;

    let table = RouteTable::new().with_route(
        Route::new("DefaultApi", "api/{controller}/{id}")
            .unwrap()
            .with_optional("id")
            .with_handler(Handler::of::<AuthHandler>()),
    );

    let data = table
        .match_request(&Request::get("/api/customer/1").unwrap())
        .unwrap()
        .unwrap();
    assert!(data.handler().unwrap().is::<AuthHandler>());
    assert_eq!(data.handler().unwrap().short_name(), "AuthHandler");
}

// ============================================================================
// Constraints
// ============================================================================

#[rstest]
#[case("/product/12", true)]
#[case("/product/-3", true)]
#[case("/product/abc", false)]
#[case("/product/1.5", false)]
fn test_int_constraint_rejects_route(#[case] url: &str, #[case] expected: bool) {
    let table = RouteTable::new().with_route(
        Route::new("Product", "product/{id}")
            .unwrap()
            .with_default("controller", "Product")
            .with_default("action", "Show")
            .with_constraint("id", Constraint::Int),
    );

    let data = table.match_request(&Request::get(url).unwrap()).unwrap();
    assert_eq!(data.is_some(), expected);
}

#[test]
fn test_method_constraint_rejects_route() {
    let table = RouteTable::new().with_route(default_route().with_methods([Method::GET]));

    assert!(table
        .match_request(&Request::new(Method::GET, "/home/index").unwrap())
        .unwrap()
        .is_some());
    assert!(table
        .match_request(&Request::new(Method::POST, "/home/index").unwrap())
        .unwrap()
        .is_none());
}

// ============================================================================
// Action selection
// ============================================================================

#[test]
fn test_select_resolves_controller() {
    let table = api_table();

    let request = Request::get("/api/customer/32").unwrap();
    let data = table.match_request(&request).unwrap().unwrap();
    let selected = table.select_action(&data, &request).unwrap();
    assert_eq!(selected.controller.name(), "Customer");
    assert_eq!(selected.action.name(), "get");
}

#[rstest]
#[case(Method::GET, "/api/customer/32", "get")]
#[case(Method::GET, "/api/customer", "get_all")]
#[case(Method::DELETE, "/api/customer/32", "delete")]
fn test_select_each_verb(#[case] method: Method, #[case] url: &str, #[case] action: &str) {
    let table = api_table();

    let request = Request::new(method, url).unwrap();
    let data = table.match_request(&request).unwrap().unwrap();
    let selected = table.select_action(&data, &request).unwrap();
    assert_eq!(selected.action.method_name(), action);
}

#[test]
fn test_select_method_not_allowed() {
    let table = api_table();

    let request = Request::new(Method::POST, "/api/customer/32").unwrap();
    let data = table.match_request(&request).unwrap().unwrap();
    assert_eq!(
        table.select_action(&data, &request),
        Err(SelectionError::MethodNotAllowed {
            method: Method::POST,
            controller: "Customer".to_string(),
            controller_type: "CustomerController".to_string(),
        })
    );
}

#[test]
fn test_select_unknown_controller() {
    let table = api_table();

    let request = Request::get("/api/missing/32").unwrap();
    let data = table.match_request(&request).unwrap().unwrap();
    assert!(matches!(
        table.select_action(&data, &request),
        Err(SelectionError::NotFound(_))
    ));
}

#[test]
fn test_select_binds_query_values() {
    let table = RouteTable::new()
        .with_route(
            Route::new("Member", "member/{memberId}/ChangePassword")
                .unwrap()
                .with_default("controller", "Member")
                .with_default("action", "ChangePassword"),
        )
        .with_controller_descriptor(
            ControllerDescriptor::new("MemberController").with_action(
                ActionDescriptor::new("ChangePassword", "change_password")
                    .with_parameter(ParameterDescriptor::new("member_id", "i32", false))
                    .with_parameter(ParameterDescriptor::new("new_password", "&str", false)),
            ),
        );

    let request = Request::get("/member/1/ChangePassword?newPassword=x").unwrap();
    let data = table.match_request(&request).unwrap().unwrap();
    assert!(table.select_action(&data, &request).is_ok());

    let request = Request::get("/member/1/ChangePassword").unwrap();
    let data = table.match_request(&request).unwrap().unwrap();
    assert!(matches!(
        table.select_action(&data, &request),
        Err(SelectionError::NotFound(_))
    ));
}

// ============================================================================
// URL generation
// ============================================================================

fn pairs(items: &[(&str, &str)]) -> Vec<(String, Value)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), Value::from(*v)))
        .collect()
}

#[test]
fn test_generate_skips_ignore_routes() {
    let table = RouteTable::new()
        .with_route(Route::ignore("content/{*path_info}").unwrap())
        .with_route(default_route());

    let values = pairs(&[("controller", "Home"), ("action", "About")]);
    assert_eq!(table.generate_url(&values, None).as_deref(), Some("/Home/About"));
}

#[test]
fn test_generate_under_app_path() {
    let table = RouteTable::new().with_route(default_route());

    let values = pairs(&[("controller", "Home"), ("action", "Index")]);
    assert_eq!(table.generate_url(&values, Some("~/shop/")).as_deref(), Some("/shop/"));
}

#[test]
fn test_url_for_named_route() {
    let table = RouteTable::new()
        .with_route(default_route())
        .with_route(Route::new("docs", "docs/{*path}").unwrap());

    let values = pairs(&[("path", "guide/install")]);
    assert_eq!(table.url_for("docs", &values).as_deref(), Some("/docs/guide/install"));
    assert_eq!(table.url_for("missing", &values), None);
}

#[test]
fn test_generate_respects_constraints() {
    let table = RouteTable::new().with_route(
        Route::new("Product", "product/{id}")
            .unwrap()
            .with_constraint("id", Constraint::Int),
    );

    assert_eq!(
        table.generate_url(&pairs(&[("id", "12")]), None).as_deref(),
        Some("/product/12")
    );
    assert_eq!(table.generate_url(&pairs(&[("id", "abc")]), None), None);
}
