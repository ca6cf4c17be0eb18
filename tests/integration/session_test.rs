//! Integration tests for the two identity slots.

mod helpers;

use serde_json::json;

use helpers::{TestApp, directory};
use portal_auth::{GuardOutcome, GuardState};
use portal_client::{Credentials, Notice};
use portal_core::error::ErrorKind;
use portal_core::traits::KeyValueStore;
use portal_entity::{Role, SlotName};
use portal_store::keys;

#[tokio::test]
async fn test_login_lands_in_role_slot() {
    let app = TestApp::new().await;
    app.account("ada@example.com", "u-1", "admin", "tok-a");
    app.account("cy@example.com", "c-1", "client", "tok-c");

    let admin = app.login("ada@example.com").await;
    assert_eq!(admin.slot, SlotName::Admin);
    assert_eq!(admin.redirect, "/dashboard");

    let client = app.login("cy@example.com").await;
    assert_eq!(client.slot, SlotName::Client);
    assert_eq!(client.redirect, "/client/dashboard");

    let slots = app.ctx.sessions().slots().await;
    assert_eq!(slots.get(SlotName::Admin).token.as_deref(), Some("tok-a"));
    assert_eq!(slots.get(SlotName::Client).token.as_deref(), Some("tok-c"));
    assert_eq!(slots.get(SlotName::Client).role, Some(Role::Client));
}

#[tokio::test]
async fn test_identity_follows_path() {
    let app = TestApp::new().await;
    app.account("ada@example.com", "u-1", "admin", "tok-a");
    app.login("ada@example.com").await;

    let admin = app.ctx.identity("/user/edit/3").await;
    assert_eq!(admin.auth_type, SlotName::Admin);
    assert!(admin.is_authenticated);
    assert_eq!(admin.display_name, "ada");

    let client = app.ctx.identity("/client/profile/3").await;
    assert!(client.is_client);
    assert!(!client.is_authenticated);
    assert_eq!(client.display_name, "Client");
    assert_eq!(client.role, Role::Client);
}

#[tokio::test]
async fn test_bad_credentials_leave_slots_empty() {
    let app = TestApp::new().await;
    app.account("ada@example.com", "u-1", "admin", "tok-a");

    let err = app
        .ctx
        .login(&Credentials {
            email: "ada@example.com".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);
    assert_eq!(
        app.notifier.notices(),
        vec![Notice::new("Invalid email or password", Some(401))]
    );

    let slots = app.ctx.sessions().slots().await;
    assert!(slots.get(SlotName::Admin).is_empty());
    assert!(slots.get(SlotName::Client).is_empty());
}

#[tokio::test]
async fn test_sessions_survive_restart() {
    let app = TestApp::new().await;
    app.account("ada@example.com", "u-1", "admin", "tok-a");
    app.login("ada@example.com").await;

    let stored = app.storage.get(&keys::auth_token(SlotName::Admin)).await.unwrap();
    assert_eq!(stored.as_deref(), Some("tok-a"));

    let rebooted = app.reboot().await;
    let admin = rebooted.sessions().slot(SlotName::Admin).await;
    assert!(admin.authenticated);
    assert_eq!(admin.uuid(), Some("u-1"));
    assert!(rebooted.sessions().slot(SlotName::Client).await.is_empty());
}

#[tokio::test]
async fn test_logout_clears_only_its_slot() {
    let app = TestApp::new().await;
    app.account("ada@example.com", "u-1", "admin", "tok-a");
    app.account("cy@example.com", "c-1", "client", "tok-c");
    app.login("ada@example.com").await;
    app.login("cy@example.com").await;

    let outcome = app.ctx.logout(SlotName::Client).await.unwrap();
    assert_eq!(outcome, GuardOutcome::replace("/client/login"));

    let logouts = app.backend.logouts.lock().unwrap().clone();
    assert_eq!(logouts, vec![("tok-c".to_string(), json!({ "role": "client" }))]);

    for key in keys::slot_keys(SlotName::Client) {
        assert_eq!(app.storage.get(&key).await.unwrap(), None, "{key}");
    }
    let slots = app.ctx.sessions().slots().await;
    assert!(slots.get(SlotName::Client).is_empty());
    assert_eq!(slots.get(SlotName::Admin).token.as_deref(), Some("tok-a"));
}

#[tokio::test]
async fn test_logout_of_empty_slot_skips_backend() {
    let app = TestApp::new().await;

    let outcome = app.ctx.logout(SlotName::Admin).await.unwrap();
    assert_eq!(outcome, GuardOutcome::replace("/login"));
    assert!(app.backend.logouts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_switching_user_refetches_directory() {
    let app = TestApp::new().await;
    app.account("ada@example.com", "u-1", "admin", "tok-a");
    app.account("bob@example.com", "u-2", "admin", "tok-b");
    app.backend
        .directory("u-1", directory(&["Users"], json!({ "users": ["view"] })));
    app.backend.directory("u-2", directory(&[], json!({})));

    app.login("ada@example.com").await;
    let first = app.ctx.authorize_settled("/user").await;
    assert_eq!(first.guard, Some(GuardState::Allowed));

    app.login("bob@example.com").await;
    let second = app.ctx.authorize_settled("/user").await;
    assert_eq!(second.guard, Some(GuardState::DeniedNoRoleModule));
    assert_eq!(app.backend.fetches(), 2);
}

#[tokio::test]
async fn test_slot_tokens_are_used_per_slot() {
    let app = TestApp::new().await;
    app.account("ada@example.com", "u-1", "admin", "tok-a");
    app.account("cy@example.com", "c-1", "client", "tok-c");
    app.login("ada@example.com").await;
    app.login("cy@example.com").await;

    app.ctx.logout(SlotName::Admin).await.unwrap();
    app.ctx.logout(SlotName::Client).await.unwrap();

    let bearers: Vec<String> = app
        .backend
        .logouts
        .lock()
        .unwrap()
        .iter()
        .map(|(bearer, _)| bearer.clone())
        .collect();
    assert_eq!(bearers, vec!["tok-a", "tok-c"]);
}

#[tokio::test]
async fn test_tokenless_login_refreshes_profile() {
    let app = TestApp::new().await;
    app.account("ada@example.com", "u-1", "admin", "tok-a");
    app.account("ada.renamed@example.com", "u-1", "admin", "");
    app.login("ada@example.com").await;

    let refreshed = app.login("ada.renamed@example.com").await;
    assert_eq!(refreshed.slot, SlotName::Admin);

    let admin = app.ctx.sessions().slot(SlotName::Admin).await;
    assert_eq!(admin.token.as_deref(), Some("tok-a"));
    assert_eq!(
        app.ctx.identity("/").await.display_name,
        "ada.renamed"
    );
}

#[tokio::test]
async fn test_tokenless_login_into_empty_slot_is_rejected() {
    let app = TestApp::new().await;
    app.account("ghost@example.com", "u-9", "admin", "");

    let err = app
        .ctx
        .login(&Credentials {
            email: "ghost@example.com".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(app.ctx.sessions().slot(SlotName::Admin).await.is_empty());
}
