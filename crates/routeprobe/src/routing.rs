use routeprobe_router::{
    Request, RouteData, RouteTable, RoutingError, SelectedAction, SelectionError, Value,
};

/// The routing machinery assertions run against
///
/// Implemented for [`RouteTable`]; other routers plug in by implementing the
/// three steps a request goes through.
pub trait RoutingConfig {
    /// Matches a request against the configured routes
    fn route_data(&self, request: &Request) -> Result<Option<RouteData>, RoutingError>;

    /// Picks the action a matched route dispatches to
    fn select_action(
        &self,
        data: &RouteData,
        request: &Request,
    ) -> Result<SelectedAction, SelectionError>;

    /// Synthesizes a url from route values under an optional application path
    fn generate_url(&self, values: &[(String, Value)], app_path: Option<&str>) -> Option<String>;
}

impl RoutingConfig for RouteTable {
    fn route_data(&self, request: &Request) -> Result<Option<RouteData>, RoutingError> {
        self.match_request(request)
    }

    fn select_action(
        &self,
        data: &RouteData,
        request: &Request,
    ) -> Result<SelectedAction, SelectionError> {
        RouteTable::select_action(self, data, request)
    }

    fn generate_url(&self, values: &[(String, Value)], app_path: Option<&str>) -> Option<String> {
        RouteTable::generate_url(self, values, app_path)
    }
}

impl<T: RoutingConfig + ?Sized> RoutingConfig for &T {
    fn route_data(&self, request: &Request) -> Result<Option<RouteData>, RoutingError> {
        (**self).route_data(request)
    }

    fn select_action(
        &self,
        data: &RouteData,
        request: &Request,
    ) -> Result<SelectedAction, SelectionError> {
        (**self).select_action(data, request)
    }

    fn generate_url(&self, values: &[(String, Value)], app_path: Option<&str>) -> Option<String> {
        (**self).generate_url(values, app_path)
    }
}
