//! The dashboard's route table.

use portal_core::config::AccessConfig;
use portal_entity::{Action, SlotName};

use super::table::{RouteDef, RouteTable};

/// Sign-in flow pages besides login, mounted under each slot's base path.
const AUTH_PAGES: [(&str, &str); 4] = [
    ("register", "/register"),
    ("forgot_password", "/forgot-password"),
    ("reset_password", "/reset-password"),
    ("register_success", "/register-success"),
];

/// Back-office pages: name, path, and the module permission they need.
const ADMIN_PAGES: [(&str, &str, Option<(&str, &str)>); 14] = [
    ("admin.user.list", "/user", Some(("Users", Action::VIEW))),
    ("admin.user.create", "/user/create", Some(("Users", Action::CREATE))),
    ("admin.user.edit", "/user/edit/:uuid", Some(("Users", Action::EDIT))),
    ("admin.user.view", "/user/view/:uuid", Some(("Users", Action::VIEW))),
    ("admin.user.profile", "/user/profile/:uuid", Some(("Users", Action::VIEW))),
    ("admin.module.list", "/module", Some(("Modules", Action::VIEW))),
    ("admin.module.children", "/module/:uuid", Some(("Modules", Action::VIEW))),
    ("admin.module.create", "/module/create", Some(("Modules", Action::CREATE))),
    ("admin.module.edit", "/module/edit/:uuid", Some(("Modules", Action::EDIT))),
    ("admin.module.view", "/module/view/:uuid", Some(("Modules", Action::VIEW))),
    ("admin.module.permission", "/module/permission", None),
    ("admin.module.permission.user", "/module/permission/:uuid", None),
    ("admin.module.permission.role", "/module/permission/role", None),
    ("admin.activity_logs", "/activity-logs", Some(("Activity Logs", Action::VIEW))),
];

impl RouteTable {
    /// Routes of the admin and client dashboards.
    ///
    /// Login, dashboard, forbidden, and error paths come from `config` and
    /// are mounted under the client base path for the client slot.
    pub fn dashboard(config: &AccessConfig) -> Self {
        let admin = SlotName::Admin;
        let client = SlotName::Client;
        let mut table = Self::new();

        for slot in SlotName::ALL {
            let login = ("login", config.login_route.as_str());
            for (name, path) in std::iter::once(login).chain(AUTH_PAGES) {
                table = table.with(RouteDef::public(
                    &format!("{slot}.{name}"),
                    slot,
                    &slot.scoped(path),
                ));
            }
        }

        table = table
            .with(RouteDef::private("admin.home", admin, "/"))
            .with(RouteDef::private("admin.dashboard", admin, &config.dashboard_route));
        for (name, path, permission) in ADMIN_PAGES {
            let route = RouteDef::private(name, admin, path);
            table = table.with(match permission {
                Some((module, action)) => route.protected(module, action),
                None => route,
            });
        }

        let client_dashboard = client.scoped(&config.dashboard_route);
        table = table
            .with(RouteDef::private("client.home", client, "/client"))
            .with(RouteDef::private("client.dashboard", client, &client_dashboard))
            .with(RouteDef::private("client.profile", client, "/client/profile/:uuid"));

        for slot in SlotName::ALL {
            let forbidden = slot.scoped(&config.forbidden_route);
            let server_error = slot.scoped(&config.error_route);
            table = table
                .with(RouteDef::private(&format!("{slot}.forbidden"), slot, &forbidden))
                .with(RouteDef::private(&format!("{slot}.server_error"), slot, &server_error))
                .with(RouteDef::private(&format!("{slot}.not_found"), slot, &slot.scoped("*")));
        }
        table
    }
}
