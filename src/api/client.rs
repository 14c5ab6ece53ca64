use super::error::{error_text, AdminError, AdminOperation, ApiError, GenerateError};
use super::types::{
    AdminSession, AdminStats, CacheEntry, ImageResult, MindMapRequest, MindMapResponse,
    UserResponse,
};
use super::Backend;
use crate::session::Session;
use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// Cookie name the backend's session middleware uses when only a value is configured.
const DEFAULT_COOKIE_NAME: &str = "session";

pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, session_cookie: Option<&str>) -> Result<Self, ApiError> {
        let url: Url = base_url
            .parse()
            .map_err(|_| ApiError::InvalidUrl(base_url.to_string()))?;

        let jar = Arc::new(Jar::default());
        if let Some(cookie) = session_cookie.map(str::trim).filter(|c| !c.is_empty()) {
            let cookie = if cookie.contains('=') {
                cookie.to_string()
            } else {
                format!("{DEFAULT_COOKIE_NAME}={cookie}")
            };
            jar.add_cookie_str(&cookie, &url);
        }

        let client = Client::builder().cookie_provider(jar).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn admin_get<T: DeserializeOwned>(
        &self,
        operation: AdminOperation,
        path: &str,
    ) -> Result<T, AdminError> {
        debug!(%operation, path, "admin request");
        let response = self
            .client
            .get(self.endpoint(path))
            .send()
            .await
            .map_err(|e| admin_failure(operation, e))?;

        if !response.status().is_success() {
            return Err(admin_status_failure(operation, response.status()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| admin_failure(operation, e))
    }

    async fn admin_post(
        &self,
        operation: AdminOperation,
        path: &str,
        body: serde_json::Value,
    ) -> Result<(), AdminError> {
        debug!(%operation, path, "admin request");
        let response = self
            .client
            .post(self.endpoint(path))
            .json(&body)
            .send()
            .await
            .map_err(|e| admin_failure(operation, e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(admin_status_failure(operation, response.status()))
        }
    }
}

fn admin_failure(operation: AdminOperation, err: reqwest::Error) -> AdminError {
    warn!(%operation, error = %err, "admin request failed");
    AdminError::new(operation)
}

fn admin_status_failure(operation: AdminOperation, status: StatusCode) -> AdminError {
    warn!(%operation, status = status.as_u16(), "admin request rejected");
    AdminError::new(operation)
}

#[async_trait]
impl Backend for HttpBackend {
    async fn probe_session(&self) -> Result<Option<Session>, ApiError> {
        let response = self.client.get(self.endpoint("/user")).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            debug!("session probe: not logged in");
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_text(&body).unwrap_or_default(),
            });
        }

        let user: UserResponse = response.json().await?;
        debug!(email = %user.user.email, is_admin = user.is_admin, "session probe: logged in");
        Ok(Some(user.into()))
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint("/logout"))
            .json(&json!({}))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthenticated),
            status => Err(ApiError::Status {
                status: status.as_u16(),
                message: String::new(),
            }),
        }
    }

    fn login_url(&self) -> String {
        self.endpoint("/google-login")
    }

    async fn generate_mind_map(
        &self,
        request: &MindMapRequest,
    ) -> Result<MindMapResponse, GenerateError> {
        debug!(topic = %request.topic, mode = request.mode.as_str(), "generating mind map");
        let response = self
            .client
            .post(self.endpoint("/generate-mindmap"))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "generate request failed");
                GenerateError::Unknown(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<MindMapResponse>()
                .await
                .map_err(|e| GenerateError::Unknown(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        let err = GenerateError::classify(status.as_u16(), &body);
        warn!(status = status.as_u16(), error = %err, "generate request rejected");
        Err(err)
    }

    async fn fetch_related_images(&self, topic: &str) -> Vec<ImageResult> {
        let result = async {
            let response = self
                .client
                .get(self.endpoint("/related-images"))
                .query(&[("topic", topic)])
                .send()
                .await?
                .error_for_status()?;
            response.json::<Vec<ImageResult>>().await
        }
        .await;

        match result {
            Ok(images) => {
                debug!(topic, count = images.len(), "related images fetched");
                images
            }
            Err(e) => {
                warn!(topic, error = %e, "related images unavailable");
                Vec::new()
            }
        }
    }

    async fn list_sessions(&self) -> Result<Vec<AdminSession>, AdminError> {
        self.admin_get(AdminOperation::ListSessions, "/admin/sessions")
            .await
    }

    async fn list_cached_diagrams(&self) -> Result<Vec<CacheEntry>, AdminError> {
        self.admin_get(AdminOperation::ListCache, "/admin/cached-maps")
            .await
    }

    async fn admin_stats(&self) -> Result<AdminStats, AdminError> {
        self.admin_get(AdminOperation::Stats, "/admin/stats").await
    }

    async fn terminate_session(&self, email: &str) -> Result<(), AdminError> {
        self.admin_post(
            AdminOperation::TerminateSession,
            "/admin/terminate-session",
            json!({ "email": email }),
        )
        .await
    }

    async fn reset_usage(&self, email: &str) -> Result<(), AdminError> {
        self.admin_post(
            AdminOperation::ResetUsage,
            "/admin/reset-mindmaps",
            json!({ "email": email }),
        )
        .await
    }

    async fn clear_cache_entry(&self, entry: &CacheEntry) -> Result<(), AdminError> {
        self.admin_post(
            AdminOperation::ClearCache,
            "/admin/clear-cache",
            json!({ "topic": entry.topic, "map_type": entry.map_type }),
        )
        .await
    }

    async fn set_usage_limit(&self, email: &str, limit: u32) -> Result<(), AdminError> {
        self.admin_post(
            AdminOperation::SetLimit,
            "/admin/set-limit",
            json!({ "email": email, "limit": limit }),
        )
        .await
    }
}
