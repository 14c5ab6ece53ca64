use async_trait::async_trait;
use mindmap_tui::actions::{execute_action, Action};
use mindmap_tui::api::{
    AdminError, AdminOperation, AdminSession, AdminStats, ApiError, Backend, CacheEntry,
    GenerateError, ImageResult, MindMapRequest, MindMapResponse, SessionStatus,
};
use mindmap_tui::dispatch::run_effect;
use mindmap_tui::session::Session;
use mindmap_tui::{AppConfig, AppState, Effect};
use std::collections::VecDeque;
use std::sync::Mutex;

#[allow(dead_code)]
pub const CATS_SOURCE: &str = "mindmap\n  root((Cats))\n    Care\n      Food\n    Play";

/// Scripted backend that records every call it receives.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeBackend {
    pub session: Option<Session>,
    pub generate: Mutex<VecDeque<Result<MindMapResponse, GenerateError>>>,
    pub images: Vec<ImageResult>,
    pub sessions: Vec<AdminSession>,
    pub cache: Vec<CacheEntry>,
    pub fail_admin: bool,
    pub calls: Mutex<Vec<String>>,
    pub cleared: Mutex<Vec<CacheEntry>>,
}

#[allow(dead_code)]
impl FakeBackend {
    pub fn logged_in(is_admin: bool) -> Self {
        Self {
            session: Some(user("ada@example.com", is_admin)),
            ..Self::default()
        }
    }

    pub fn queue_generate(&self, result: Result<MindMapResponse, GenerateError>) {
        self.generate.lock().unwrap().push_back(result);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn admin_result(&self, operation: AdminOperation) -> Result<(), AdminError> {
        if self.fail_admin {
            Err(AdminError::new(operation))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn probe_session(&self) -> Result<Option<Session>, ApiError> {
        self.record("probe_session");
        Ok(self.session.clone())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.record("logout");
        Ok(())
    }

    fn login_url(&self) -> String {
        "http://backend.test/api/google-login".to_string()
    }

    async fn generate_mind_map(
        &self,
        request: &MindMapRequest,
    ) -> Result<MindMapResponse, GenerateError> {
        self.record(format!("generate:{}", request.topic));
        self.generate
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(MindMapResponse::from_source(CATS_SOURCE)))
    }

    async fn fetch_related_images(&self, topic: &str) -> Vec<ImageResult> {
        self.record(format!("images:{topic}"));
        self.images.clone()
    }

    async fn list_sessions(&self) -> Result<Vec<AdminSession>, AdminError> {
        self.record("list_sessions");
        self.admin_result(AdminOperation::ListSessions)?;
        Ok(self.sessions.clone())
    }

    async fn list_cached_diagrams(&self) -> Result<Vec<CacheEntry>, AdminError> {
        self.record("list_cached_diagrams");
        self.admin_result(AdminOperation::ListCache)?;
        Ok(self.cache.clone())
    }

    async fn admin_stats(&self) -> Result<AdminStats, AdminError> {
        self.record("admin_stats");
        self.admin_result(AdminOperation::Stats)?;
        Ok(AdminStats {
            total_users: self.sessions.len() as u32,
            online_users: self.sessions.iter().filter(|s| s.is_online()).count() as u32,
            total_mind_maps: 3,
        })
    }

    async fn terminate_session(&self, email: &str) -> Result<(), AdminError> {
        self.record(format!("terminate:{email}"));
        self.admin_result(AdminOperation::TerminateSession)
    }

    async fn reset_usage(&self, email: &str) -> Result<(), AdminError> {
        self.record(format!("reset:{email}"));
        self.admin_result(AdminOperation::ResetUsage)
    }

    async fn clear_cache_entry(&self, entry: &CacheEntry) -> Result<(), AdminError> {
        self.record(format!("clear:{}", entry.key()));
        self.cleared.lock().unwrap().push(entry.clone());
        self.admin_result(AdminOperation::ClearCache)
    }

    async fn set_usage_limit(&self, email: &str, limit: u32) -> Result<(), AdminError> {
        self.record(format!("limit:{email}:{limit}"));
        self.admin_result(AdminOperation::SetLimit)
    }
}

#[allow(dead_code)]
pub fn user(email: &str, is_admin: bool) -> Session {
    Session {
        email: email.to_string(),
        display_name: "Ada".to_string(),
        avatar_url: String::new(),
        is_admin,
        is_logged_in: true,
        daily_limit: Some(5),
    }
}

#[allow(dead_code)]
pub fn admin_row(email: &str, name: &str, used: u32, limit: u32, online: bool) -> AdminSession {
    AdminSession {
        email: email.to_string(),
        name: name.to_string(),
        ip: "10.0.0.1".to_string(),
        user_agent: "curl".to_string(),
        login_time: "2026-10-19 09:00".to_string(),
        last_active: "2026-10-19 09:30".to_string(),
        mind_maps_used: used,
        mind_map_limit: limit,
        status: if online {
            SessionStatus::Online
        } else {
            SessionStatus::Offline
        },
    }
}

/// Helper to create an app with a resolved session probe
#[allow(dead_code)]
pub fn create_test_app(session: Option<Session>) -> AppState {
    let config = AppConfig::default();
    let mut app = AppState::new(config);
    app.session.apply_probe(session);
    app
}

/// Applies `action`, then runs every effect it produces (and every effect
/// those completions produce) against `backend` until nothing is left.
#[allow(dead_code)]
pub async fn settle(app: &mut AppState, backend: &dyn Backend, action: Action) {
    let mut pending: VecDeque<Effect> = execute_action(action, app).unwrap().into();
    while let Some(effect) = pending.pop_front() {
        let completion = run_effect(backend, effect).await;
        pending.extend(execute_action(completion, app).unwrap());
    }
}
