//! Controllers and route tables shared by the integration tests

#![allow(dead_code)]

use routeprobe::router::{Handler, Route, RouteTable};
use routeprobe::{controller, Method};

// ============================================================================
// Controllers
// ============================================================================

pub struct CustomerController;

#[controller]
impl CustomerController {
    pub fn get(&self, id: i32) -> String {
        format!("customer {}", id)
    }

    pub fn get_all(&self) -> Vec<String> {
        Vec::new()
    }

    #[verbs(PUT)]
    pub fn update(&self, id: i32) -> bool {
        id > 0
    }
}

pub struct MemberController;

#[controller]
impl MemberController {
    #[action(name = "ChangePassword")]
    pub fn change_password(&self, member_id: i32, new_password: &str) -> bool {
        member_id > 0 && !new_password.is_empty()
    }
}

pub struct HomeController;

#[controller]
impl HomeController {
    pub fn index(&self, id: Option<i32>) -> String {
        format!("home {:?}", id)
    }

    pub fn about(&self) -> &'static str {
        "about"
    }

    #[non_action]
    pub fn helper(&self) -> u8 {
        0
    }
}

pub struct FooController;

#[controller]
impl FooController {
    pub fn bar(&self, name: String, pony: String) -> String {
        format!("{} {}", name, pony)
    }
}

pub struct GetPostAttrController;

#[controller]
impl GetPostAttrController {
    #[verbs(GET, POST)]
    pub fn index(&self) -> &'static str {
        "index"
    }
}

// ============================================================================
// Handlers
// ============================================================================

pub struct TestHandlerOne;

pub struct TestHandlerTwo;

// ============================================================================
// Route tables
// ============================================================================

fn default_api() -> Route {
    Route::new("DefaultApi", "api/{controller}/{id}")
        .unwrap()
        .with_optional("id")
}

fn controllers(table: RouteTable) -> RouteTable {
    routeprobe::logging::init_test_logging();

    table
        .with_controller::<CustomerController>()
        .with_controller::<MemberController>()
        .with_controller::<HomeController>()
        .with_controller::<FooController>()
        .with_controller::<GetPostAttrController>()
}

/// `api/{controller}/{id}` with an optional id
pub fn api_routes() -> RouteTable {
    controllers(RouteTable::new().with_route(default_api()))
}

/// `api/{controller}/{id}` carrying [`TestHandlerOne`]
pub fn api_routes_with_handler() -> RouteTable {
    controllers(
        RouteTable::new().with_route(default_api().with_handler(Handler::of::<TestHandlerOne>())),
    )
}

/// `Member/{memberId}/ChangePassword`
pub fn member_routes() -> RouteTable {
    controllers(
        RouteTable::new().with_route(
            Route::new("Member_ChangePassword", "Member/{memberId}/ChangePassword")
                .unwrap()
                .with_default("controller", "Member")
                .with_default("action", "ChangePassword"),
        ),
    )
}

/// The default MVC route plus `Foo/Bar/Fish/{name}/{pony}`
pub fn web_routes() -> RouteTable {
    controllers(
        RouteTable::new()
            .with_route(
                Route::new("Default", "{controller}/{action}/{id}")
                    .unwrap()
                    .with_default("controller", "Home")
                    .with_default("action", "Index")
                    .with_optional("id"),
            )
            .with_route(
                Route::new("FooBarFishRoute", "Foo/Bar/Fish/{name}/{pony}")
                    .unwrap()
                    .with_default("controller", "Foo")
                    .with_default("action", "Bar"),
            ),
    )
}

/// An ignore route, an action-only route, then the default route
pub fn generation_routes() -> RouteTable {
    controllers(
        RouteTable::new()
            .with_route(Route::ignore("content/{*path_info}").unwrap())
            .with_route(
                Route::new("ActionOnly", "{action}/{id}")
                    .unwrap()
                    .with_default("controller", "Home")
                    .with_default("action", "Index")
                    .with_optional("id"),
            )
            .with_route(
                Route::new("Default", "{controller}/{action}/{id}")
                    .unwrap()
                    .with_default("controller", "Home")
                    .with_default("action", "Index")
                    .with_default("id", 32),
            ),
    )
}

/// `{controller}/{action}` limited to GET and POST by an HTTP method constraint
pub fn method_constrained_routes() -> RouteTable {
    controllers(
        RouteTable::new().with_route(
            Route::new("GetPost", "{controller}/{action}")
                .unwrap()
                .with_methods([Method::GET, Method::POST]),
        ),
    )
}
