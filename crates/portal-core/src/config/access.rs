//! Route guard redirect targets.

use serde::{Deserialize, Serialize};

/// Routes the guards redirect to. These are admin-context paths; the
/// client context uses the same paths under the `/client` prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Target for role-module and action denials.
    #[serde(default = "default_forbidden")]
    pub forbidden_route: String,
    /// Target when the access directory could not be fetched.
    #[serde(default = "default_error")]
    pub error_route: String,
    /// Target for unauthenticated visitors of private routes.
    #[serde(default = "default_login")]
    pub login_route: String,
    /// Target for authenticated visitors of public routes.
    #[serde(default = "default_dashboard")]
    pub dashboard_route: String,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            forbidden_route: default_forbidden(),
            error_route: default_error(),
            login_route: default_login(),
            dashboard_route: default_dashboard(),
        }
    }
}

fn default_forbidden() -> String {
    "/forbidden".to_string()
}

fn default_error() -> String {
    "/server_error".to_string()
}

fn default_login() -> String {
    "/login".to_string()
}

fn default_dashboard() -> String {
    "/dashboard".to_string()
}
