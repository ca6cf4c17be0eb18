//! reqwest implementation of the backend calls.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use portal_core::config::ApiConfig;
use portal_core::error::{AppError, ErrorKind};
use portal_core::result::AppResult;
use portal_entity::{
    AccessDirectory, ApiResponse, LoginPayload, ModuleAccessPayload, ModuleTreeNode, SlotName,
};

use crate::api::{AccessApi, AuthApi, Credentials};
use crate::notify::{self, Notice, Notifier};
use crate::token::TokenSource;

/// HTTP client for the portal backend.
///
/// Every request made on behalf of a slot carries that slot's bearer
/// credential. Transport failures are reported to the notifier before the
/// error is returned.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base: Url,
    tokens: Arc<dyn TokenSource>,
    notifier: Arc<dyn Notifier>,
}

impl HttpClient {
    /// Build a client from configuration.
    pub fn new(
        config: &ApiConfig,
        tokens: Arc<dyn TokenSource>,
        notifier: Arc<dyn Notifier>,
    ) -> AppResult<Self> {
        let mut base = Url::parse(&config.base_url).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid API base URL: {}", config.base_url),
                e,
            )
        })?;
        if base.cannot_be_a_base() {
            return Err(AppError::configuration(format!(
                "API base URL cannot carry paths: {}",
                config.base_url
            )));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            client,
            base,
            tokens,
            notifier,
        })
    }

    /// Base URL every endpoint is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| AppError::configuration("API base URL cannot carry paths"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn authorize(&self, request: RequestBuilder, slot: SlotName) -> RequestBuilder {
        match self.tokens.token_for(slot).await {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request, translating transport failures into notices and errors.
    async fn send(&self, request: RequestBuilder) -> AppResult<Response> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                self.notifier.notify(Notice::new(notify::NETWORK_ERROR, None));
                return Err(AppError::with_source(
                    ErrorKind::Network,
                    notify::NETWORK_ERROR,
                    e,
                ));
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let server_message = response
            .json::<ApiResponse<serde_json::Value>>()
            .await
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.trim().is_empty());
        warn!(status = status.as_u16(), message = ?server_message, "Backend request failed");
        Err(self.status_error(status, server_message))
    }

    fn status_error(&self, status: StatusCode, server_message: Option<String>) -> AppError {
        let code = Some(status.as_u16());
        match status {
            StatusCode::UNAUTHORIZED => {
                let message = server_message.unwrap_or_else(|| notify::UNAUTHORIZED.to_string());
                self.notifier.notify(Notice::new(message.clone(), code));
                AppError::authentication(message)
            }
            StatusCode::FORBIDDEN => {
                self.notifier.notify(Notice::new(notify::FORBIDDEN, code));
                AppError::authorization(server_message.unwrap_or_else(|| notify::FORBIDDEN.into()))
            }
            s if s.is_server_error() => {
                self.notifier.notify(Notice::new(notify::SERVER_ERROR, code));
                AppError::external_service(
                    server_message.unwrap_or_else(|| notify::SERVER_ERROR.into()),
                )
            }
            StatusCode::NOT_FOUND => AppError::not_found(
                server_message.unwrap_or_else(|| "Resource not found".to_string()),
            ),
            s => AppError::external_service(
                server_message.unwrap_or_else(|| format!("Request failed with status {s}")),
            ),
        }
    }

    /// Decode the envelope; `status: false` is an error, missing data is `None`.
    async fn decode<T: DeserializeOwned>(response: Response) -> AppResult<Option<T>> {
        let envelope: ApiResponse<T> = response.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::Serialization, "Malformed backend response", e)
        })?;
        if !envelope.status {
            return Err(AppError::external_service(
                envelope
                    .message
                    .unwrap_or_else(|| "Backend reported failure".to_string()),
            ));
        }
        Ok(envelope.data)
    }
}

#[async_trait]
impl AccessApi for HttpClient {
    async fn fetch_module_access(&self, slot: SlotName, uuid: &str) -> AppResult<AccessDirectory> {
        let url = self.endpoint(&["user-permissions", uuid, "module-access"])?;
        debug!(%slot, uuid, "Fetching access directory");

        let request = self.authorize(self.client.get(url), slot).await;
        let response = self.send(request).await?;
        let payload: Option<ModuleAccessPayload> = Self::decode(response).await?;
        Ok(payload.map(AccessDirectory::from).unwrap_or_default())
    }

    async fn fetch_side_menu(&self, slot: SlotName) -> AppResult<Vec<ModuleTreeNode>> {
        let url = self.endpoint(&["user-permissions", "side-menu"])?;
        debug!(%slot, "Fetching side menu");

        let request = self.authorize(self.client.get(url), slot).await;
        let response = self.send(request).await?;
        Ok(Self::decode(response).await?.unwrap_or_default())
    }
}

#[async_trait]
impl AuthApi for HttpClient {
    async fn login(&self, credentials: &Credentials) -> AppResult<LoginPayload> {
        let url = self.endpoint(&["login"])?;
        debug!(email = %credentials.email, "Signing in");

        let response = self.send(self.client.post(url).json(credentials)).await?;
        Self::decode(response)
            .await?
            .ok_or_else(|| AppError::external_service("Login response carried no session"))
    }

    async fn logout(&self, slot: SlotName) -> AppResult<()> {
        let url = self.endpoint(&["logout"])?;
        debug!(%slot, "Signing out");

        let request = self
            .authorize(self.client.post(url).json(&json!({ "role": slot.as_str() })), slot)
            .await;
        let response = self.send(request).await?;
        Self::decode::<serde_json::Value>(response).await?;
        Ok(())
    }
}
