//! Integration tests for the visible side navigation.

mod helpers;

use std::sync::atomic::Ordering;
use std::time::Duration;

use serde_json::{Value, json};

use helpers::{DirectoryReply, TestApp, directory};
use portal_auth::VisibleNavigation;

fn menu() -> Value {
    json!([
        { "id": 1, "name": "Dashboard", "url": "/dashboard", "icon": "home" },
        { "id": 2, "name": "Users", "url": "#", "children": [
            { "id": 3, "name": "Roles", "url": "/roles" },
            { "id": 4, "name": "Activity Logs", "url": "/activity-logs" }
        ]},
        { "id": "modules", "name": "Modules", "url": "/module" }
    ])
}

fn names(visible: &VisibleNavigation) -> Vec<String> {
    visible.nodes().iter().map(|n| n.name.clone()).collect()
}

#[tokio::test]
async fn test_signed_out_sees_empty_menu() {
    let app = TestApp::new().await;
    app.backend.menu(menu());

    let visible = app.ctx.navigation_settled("/").await;
    assert_eq!(visible, VisibleNavigation::Tree { nodes: Vec::new() });
    assert_eq!(app.backend.menu_fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_menu_filtered_by_view_permission() {
    let app = TestApp::new().await;
    app.backend.menu(menu());
    app.account("ada@example.com", "u-1", "admin", "tok-1");
    app.backend.directory(
        "u-1",
        directory(
            &["Dashboard", "Users", "Activity Logs"],
            json!({
                "Dashboard": ["view"],
                "Users": ["view"],
                "Roles": ["view"],
                "Activity Logs": ["view"],
                "Modules": ["view"]
            }),
        ),
    );
    app.login("ada@example.com").await;

    let visible = app.ctx.navigation_settled("/dashboard").await;
    assert_eq!(names(&visible), vec!["Dashboard", "Users"]);
    let children: Vec<&str> = visible.nodes()[1]
        .children
        .iter()
        .map(|n| n.name.as_str())
        .collect();
    assert_eq!(children, vec!["Activity Logs"]);
}

#[tokio::test]
async fn test_bypass_role_sees_full_menu() {
    let app = TestApp::new().await;
    app.backend.menu(menu());
    app.account("root@example.com", "u-root", "system_admin", "tok-root");
    app.backend.delay_directories(Duration::from_secs(2));
    app.login("root@example.com").await;

    let visible = app.ctx.navigation("/").await;
    assert_eq!(names(&visible), vec!["Dashboard", "Users", "Modules"]);
    assert_eq!(visible.nodes()[1].children.len(), 2);
}

#[tokio::test]
async fn test_placeholder_while_directory_loads() {
    let app = TestApp::new().await;
    app.backend.menu(menu());
    app.account("ada@example.com", "u-1", "admin", "tok-1");
    app.backend
        .directory("u-1", directory(&["Dashboard"], json!({ "dashboard": ["view"] })));
    app.backend.delay_directories(Duration::from_millis(300));
    app.login("ada@example.com").await;

    let first = app.ctx.navigation("/").await;
    assert_eq!(first, VisibleNavigation::Placeholder { rows: 3 });

    let settled = app.ctx.navigation_settled("/").await;
    assert_eq!(names(&settled), vec!["Dashboard"]);
}

#[tokio::test]
async fn test_failed_directory_hides_everything() {
    let app = TestApp::new().await;
    app.backend.menu(menu());
    app.account("ada@example.com", "u-1", "admin", "tok-1");
    app.backend.directory("u-1", DirectoryReply::Status(503));
    app.login("ada@example.com").await;

    let visible = app.ctx.navigation_settled("/").await;
    assert_eq!(visible, VisibleNavigation::Tree { nodes: Vec::new() });
}

#[tokio::test]
async fn test_menu_is_cached_per_slot() {
    let app = TestApp::new().await;
    app.backend.menu(menu());
    app.account("ada@example.com", "u-1", "admin", "tok-1");
    app.account("cy@example.com", "c-1", "client", "tok-c");
    app.backend.directory("u-1", directory(&["Dashboard"], json!({ "dashboard": ["view"] })));
    app.backend.directory("c-1", directory(&["Dashboard"], json!({ "dashboard": ["view"] })));
    app.login("ada@example.com").await;
    app.login("cy@example.com").await;

    app.ctx.navigation_settled("/").await;
    app.ctx.navigation_settled("/dashboard").await;
    assert_eq!(app.backend.menu_fetches.load(Ordering::SeqCst), 1);

    let client = app.ctx.navigation_settled("/client/dashboard").await;
    assert_eq!(names(&client), vec!["Dashboard"]);
    assert_eq!(app.backend.menu_fetches.load(Ordering::SeqCst), 2);
}
