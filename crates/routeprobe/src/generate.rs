use tracing::debug;

use crate::assert_engine::AssertEngine;
use crate::routing::RoutingConfig;
use crate::values::RouteValues;

/// Reverse direction: route values to url
pub struct UrlGenerator;

impl UrlGenerator {
    /// Url the routing configuration generates for `values`
    ///
    /// `app_path` is the application root of the current request, `/foo` for
    /// an application mounted at `http://site.com/foo`.
    pub fn generate(
        routes: &dyn RoutingConfig,
        app_path: Option<&str>,
        values: &RouteValues,
    ) -> Option<String> {
        routes.generate_url(&values.to_pairs(), app_path)
    }

    /// Reports when the generated url differs from `expected_url`
    ///
    /// Urls compare exactly. Returns whether they matched.
    pub fn assert_generates(
        engine: &dyn AssertEngine,
        routes: &dyn RoutingConfig,
        expected_url: &str,
        app_path: Option<&str>,
        values: &RouteValues,
    ) -> bool {
        match Self::generate(routes, app_path, values) {
            Some(generated) if generated == expected_url => true,
            Some(generated) => {
                debug!(%generated, expected = expected_url, "generated url differs");
                engine.are_equal(
                    expected_url,
                    &generated,
                    &format!(
                        "Generated url does not equal to expected url. Generated: '{}', expected: '{}'",
                        generated, expected_url
                    ),
                );
                false
            }
            None => {
                engine.fail(&format!(
                    "No url could be generated, expected: '{}'",
                    expected_url
                ));
                false
            }
        }
    }
}
