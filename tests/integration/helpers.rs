//! Shared test helpers for integration tests.
//!
//! [`TestApp`] runs an in-process mock of the portal backend and wires a real
//! [`AccessContext`] (HTTP client, in-memory credential store) against it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use portal_auth::{AccessContext, LoginOutcome};
use portal_auth::session::SessionStore;
use portal_client::{Credentials, HttpClient, MemoryNotifier};
use portal_core::config::AppConfig;
use portal_store::StorageManager;
use portal_store::memory::MemoryStore;

/// How the backend answers a module-access request.
#[derive(Debug, Clone)]
pub enum DirectoryReply {
    /// `{status: true, data: ...}`
    Data(Value),
    /// A bare error status.
    Status(u16),
}

/// A backend account.
#[derive(Debug, Clone)]
pub struct Account {
    pub email: String,
    pub password: String,
    pub token: String,
    pub user: Value,
}

/// Mutable state of the mock backend.
#[derive(Debug, Default)]
pub struct Backend {
    accounts: Mutex<Vec<Account>>,
    directories: Mutex<HashMap<String, DirectoryReply>>,
    menu: Mutex<Value>,
    directory_delay: Mutex<Duration>,
    /// Number of module-access requests served.
    pub directory_fetches: AtomicUsize,
    /// Number of side-menu requests served.
    pub menu_fetches: AtomicUsize,
    /// `(bearer, body)` of every logout request.
    pub logouts: Mutex<Vec<(String, Value)>>,
}

impl Backend {
    /// Register an account.
    pub fn account(&self, email: &str, password: &str, token: &str, user: Value) {
        self.accounts.lock().unwrap().push(Account {
            email: email.to_string(),
            password: password.to_string(),
            token: token.to_string(),
            user,
        });
    }

    /// Answer module-access for `uuid` with `reply`.
    pub fn directory(&self, uuid: &str, reply: DirectoryReply) {
        self.directories
            .lock()
            .unwrap()
            .insert(uuid.to_string(), reply);
    }

    /// Serve `menu` as the side menu.
    pub fn menu(&self, menu: Value) {
        *self.menu.lock().unwrap() = menu;
    }

    /// Delay every module-access response.
    pub fn delay_directories(&self, delay: Duration) {
        *self.directory_delay.lock().unwrap() = delay;
    }

    pub fn fetches(&self) -> usize {
        self.directory_fetches.load(Ordering::SeqCst)
    }
}

fn bearer(headers: &HeaderMap) -> String {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default()
        .to_string()
}

async fn login(
    State(backend): State<Arc<Backend>>,
    Json(credentials): Json<Credentials>,
) -> (StatusCode, Json<Value>) {
    let found = backend
        .accounts
        .lock()
        .unwrap()
        .iter()
        .find(|a| a.email == credentials.email && a.password == credentials.password)
        .cloned();

    match found {
        Some(account) => (
            StatusCode::OK,
            Json(json!({
                "status": true,
                "data": { "user": account.user, "token": account.token }
            })),
        ),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "status": false, "message": "Invalid email or password" })),
        ),
    }
}

async fn logout(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    backend.logouts.lock().unwrap().push((bearer(&headers), body));
    Json(json!({ "status": true }))
}

async fn module_access(
    State(backend): State<Arc<Backend>>,
    Path(uuid): Path<String>,
) -> (StatusCode, Json<Value>) {
    backend.directory_fetches.fetch_add(1, Ordering::SeqCst);
    let delay = *backend.directory_delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let reply = backend.directories.lock().unwrap().get(&uuid).cloned();
    match reply {
        Some(DirectoryReply::Data(data)) => {
            (StatusCode::OK, Json(json!({ "status": true, "data": data })))
        }
        Some(DirectoryReply::Status(code)) => (
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Json(json!({ "status": false })),
        ),
        None => (StatusCode::OK, Json(json!({ "status": true, "data": null }))),
    }
}

async fn side_menu(State(backend): State<Arc<Backend>>) -> Json<Value> {
    backend.menu_fetches.fetch_add(1, Ordering::SeqCst);
    let menu = backend.menu.lock().unwrap().clone();
    Json(json!({ "status": true, "data": menu }))
}

/// Test application context
pub struct TestApp {
    /// The context under test
    pub ctx: AccessContext,
    /// The mock backend
    pub backend: Arc<Backend>,
    /// Notices raised by the HTTP client
    pub notifier: MemoryNotifier,
    /// Credential storage shared across reboots
    pub storage: Arc<StorageManager>,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Start a mock backend and a context wired to it.
    pub async fn new() -> Self {
        let backend = Arc::new(Backend::default());
        let router = Router::new()
            .route("/api/login", post(login))
            .route("/api/logout", post(logout))
            .route("/api/user-permissions/side-menu", get(side_menu))
            .route(
                "/api/user-permissions/{uuid}/module-access",
                get(module_access),
            )
            .with_state(Arc::clone(&backend));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Mock backend address");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Mock backend stopped");
        });

        let mut config = AppConfig::default();
        config.api.base_url = format!("http://{addr}/api/");
        config.api.timeout_seconds = 5;
        config.storage.provider = "memory".to_string();

        let storage = Arc::new(StorageManager::from_provider(Arc::new(MemoryStore::new())));
        let notifier = MemoryNotifier::new();
        let ctx = Self::context(&config, &storage, &notifier).await;

        Self {
            ctx,
            backend,
            notifier,
            storage,
            config,
        }
    }

    async fn context(
        config: &AppConfig,
        storage: &Arc<StorageManager>,
        notifier: &MemoryNotifier,
    ) -> AccessContext {
        let sessions = SessionStore::boot(Arc::clone(storage))
            .await
            .expect("Failed to boot sessions");
        let http = Arc::new(
            HttpClient::new(
                &config.api,
                Arc::new(sessions.clone()),
                Arc::new(notifier.clone()),
            )
            .expect("Failed to build HTTP client"),
        );
        AccessContext::new(config.clone(), sessions, http.clone(), http)
    }

    /// A fresh context over the same storage and backend, as after a restart.
    pub async fn reboot(&self) -> AccessContext {
        self.ctx.shutdown();
        Self::context(&self.config, &self.storage, &self.notifier).await
    }

    /// Register an account whose user record has `uuid` and `role`.
    pub fn account(&self, email: &str, uuid: &str, role: &str, token: &str) {
        self.backend.account(
            email,
            "secret",
            token,
            json!({ "uuid": uuid, "name": email.split('@').next().unwrap_or(email), "role": role }),
        );
    }

    /// Sign in as a registered account.
    pub async fn login(&self, email: &str) -> LoginOutcome {
        self.ctx
            .login(&Credentials {
                email: email.to_string(),
                password: "secret".to_string(),
            })
            .await
            .expect("Login failed")
    }
}

/// A module-access payload.
pub fn directory(role_modules: &[&str], permissions: Value) -> DirectoryReply {
    DirectoryReply::Data(json!({ "roleModules": role_modules, "permissions": permissions }))
}
