//! Integration tests for route guarding against a mock backend.

mod helpers;

use std::time::Duration;

use serde_json::json;

use helpers::{DirectoryReply, TestApp, directory};
use portal_auth::{AccessDenial, GuardOutcome, GuardState, ModuleGating};
use portal_entity::{PermissionRequest, SlotName};

#[tokio::test]
async fn test_bypass_role_renders_before_directory_loads() {
    let app = TestApp::new().await;
    app.account("root@example.com", "u-root", "super_admin", "tok-root");
    app.backend.directory("u-root", directory(&[], json!({})));
    app.backend.delay_directories(Duration::from_secs(2));
    app.login("root@example.com").await;

    let verdict = app.ctx.authorize("/user/edit/7").await;
    assert_eq!(verdict.route.as_deref(), Some("admin.user.edit"));
    assert_eq!(verdict.guard, Some(GuardState::Bypassed));
    assert_eq!(verdict.outcome, GuardOutcome::Render);
}

#[tokio::test]
async fn test_missing_action_redirects_to_forbidden() {
    let app = TestApp::new().await;
    app.account("ada@example.com", "u-1", "admin", "tok-1");
    app.backend
        .directory("u-1", directory(&["Users"], json!({ "users": ["view"] })));
    app.login("ada@example.com").await;

    let verdict = app.ctx.authorize_settled("/user/edit/7").await;
    assert_eq!(verdict.guard, Some(GuardState::DeniedNoPermission));
    assert_eq!(verdict.outcome, GuardOutcome::replace("/forbidden"));

    let listing = app.ctx.authorize_settled("/user").await;
    assert_eq!(listing.guard, Some(GuardState::Allowed));
    assert_eq!(listing.outcome, GuardOutcome::Render);
}

#[tokio::test]
async fn test_granted_action_is_allowed() {
    let app = TestApp::new().await;
    app.account("ada@example.com", "u-1", "admin", "tok-1");
    app.backend.directory(
        "u-1",
        directory(&["Users"], json!({ "users": ["view", "edit"] })),
    );
    app.login("ada@example.com").await;

    let verdict = app.ctx.authorize_settled("/user/edit/7").await;
    assert_eq!(verdict.guard, Some(GuardState::Allowed));
    assert_eq!(verdict.outcome, GuardOutcome::Render);
}

#[tokio::test]
async fn test_fetch_failure_redirects_to_error_route() {
    let app = TestApp::new().await;
    app.account("ada@example.com", "u-1", "admin", "tok-1");
    app.backend.directory("u-1", DirectoryReply::Status(500));
    app.login("ada@example.com").await;

    let verdict = app.ctx.authorize_settled("/user").await;
    assert_eq!(verdict.guard, Some(GuardState::DeniedFetchFailed));
    assert_eq!(verdict.outcome, GuardOutcome::replace("/server_error"));

    let notices = app.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].status, Some(500));
}

#[tokio::test]
async fn test_role_module_gate_applies_to_routes_only() {
    let app = TestApp::new().await;
    app.account("ada@example.com", "u-1", "admin", "tok-1");
    app.backend.directory(
        "u-1",
        directory(&["Users"], json!({ "users": ["view"], "modules": ["view"] })),
    );
    app.login("ada@example.com").await;

    let verdict = app.ctx.authorize_settled("/module").await;
    assert_eq!(verdict.guard, Some(GuardState::DeniedNoRoleModule));
    assert_eq!(verdict.outcome, GuardOutcome::replace("/forbidden"));

    let request = PermissionRequest::view("Modules");
    let gated = app
        .ctx
        .decide(SlotName::Admin, &request, ModuleGating::Enforced)
        .await;
    assert_eq!(gated.denial(), Some(AccessDenial::RoleModuleExcluded));
    let component = app
        .ctx
        .decide(SlotName::Admin, &request, ModuleGating::Skipped)
        .await;
    assert!(component.granted);
}

#[tokio::test]
async fn test_loading_shows_placeholder_then_settles() {
    let app = TestApp::new().await;
    app.account("ada@example.com", "u-1", "admin", "tok-1");
    app.backend.directory(
        "u-1",
        directory(&["Users"], json!({ "users": ["view"] })),
    );
    app.backend.delay_directories(Duration::from_millis(300));
    app.login("ada@example.com").await;

    let first = app.ctx.authorize("/user").await;
    assert_eq!(first.guard, Some(GuardState::Loading));
    assert_eq!(first.outcome, GuardOutcome::Placeholder);

    let settled = app.ctx.authorize_settled("/user").await;
    assert_eq!(settled.guard, Some(GuardState::Allowed));
}

#[tokio::test]
async fn test_concurrent_guards_share_one_fetch() {
    let app = TestApp::new().await;
    app.account("ada@example.com", "u-1", "admin", "tok-1");
    app.backend.directory(
        "u-1",
        directory(&["Users", "Modules"], json!({ "users": ["view"], "modules": ["view"] })),
    );
    app.backend.delay_directories(Duration::from_millis(100));
    app.login("ada@example.com").await;

    let (a, b, c) = tokio::join!(
        app.ctx.authorize_settled("/user"),
        app.ctx.authorize_settled("/module"),
        app.ctx.authorize_settled("/user/view/3"),
    );
    for verdict in [a, b, c] {
        assert_eq!(verdict.guard, Some(GuardState::Allowed), "{}", verdict.path);
    }
    assert_eq!(app.backend.fetches(), 1);

    app.ctx.authorize_settled("/user").await;
    assert_eq!(app.backend.fetches(), 1);
}

#[tokio::test]
async fn test_signed_out_visitor_is_sent_to_slot_login() {
    let app = TestApp::new().await;

    let admin = app.ctx.authorize("/user").await;
    assert_eq!(admin.slot, SlotName::Admin);
    assert_eq!(admin.guard, None);
    assert_eq!(admin.outcome, GuardOutcome::replace("/login"));

    let client = app.ctx.authorize("/client/dashboard").await;
    assert_eq!(client.slot, SlotName::Client);
    assert_eq!(client.outcome, GuardOutcome::replace("/client/login"));

    assert_eq!(app.ctx.authorize("/login").await.outcome, GuardOutcome::Render);
    assert_eq!(app.backend.fetches(), 0);
}

#[tokio::test]
async fn test_signed_in_visitor_skips_login_page() {
    let app = TestApp::new().await;
    app.account("cy@example.com", "c-1", "client", "tok-c");
    app.login("cy@example.com").await;

    let verdict = app.ctx.authorize("/client/login").await;
    assert_eq!(verdict.outcome, GuardOutcome::replace("/client/dashboard"));

    let admin_login = app.ctx.authorize("/login").await;
    assert_eq!(admin_login.outcome, GuardOutcome::Render);
}

#[tokio::test]
async fn test_unprotected_private_route_renders_without_fetch() {
    let app = TestApp::new().await;
    app.account("ada@example.com", "u-1", "admin", "tok-1");
    app.login("ada@example.com").await;

    let verdict = app.ctx.authorize("/module/permission/role").await;
    assert_eq!(verdict.route.as_deref(), Some("admin.module.permission.role"));
    assert_eq!(verdict.guard, None);
    assert_eq!(verdict.outcome, GuardOutcome::Render);
    assert_eq!(app.backend.fetches(), 0);
}

#[tokio::test]
async fn test_padded_uuid_settles() {
    let app = TestApp::new().await;
    app.account("ada@example.com", " u-1 ", "admin", "tok-1");
    app.backend
        .directory("u-1", directory(&["Users"], json!({ "users": ["view"] })));
    app.login("ada@example.com").await;

    let settled = app.ctx.authorize_settled("/user").await;
    assert_eq!(settled.guard, Some(GuardState::Allowed));
    assert_eq!(settled.outcome, GuardOutcome::Render);

    let again = app.ctx.authorize("/user").await;
    assert_eq!(again.guard, Some(GuardState::Allowed));
    assert_eq!(app.backend.fetches(), 1);
}

#[tokio::test]
async fn test_empty_permission_list_is_forbidden_not_error() {
    let app = TestApp::new().await;
    app.account("ada@example.com", "u-1", "admin", "tok-1");
    app.backend.directory(
        "u-1",
        DirectoryReply::Data(json!({ "roleModules": [], "permissions": [] })),
    );
    app.login("ada@example.com").await;

    let verdict = app.ctx.authorize_settled("/user").await;
    assert_eq!(verdict.guard, Some(GuardState::DeniedNoRoleModule));
    assert_eq!(verdict.outcome, GuardOutcome::replace("/forbidden"));
    assert!(app.notifier.notices().is_empty());
}
