use super::error::{AdminError, AdminOperation, ApiError, GenerateError};
use super::types::{
    AdminSession, AdminStats, CacheEntry, ImageResult, MapMode, MindMapRequest, MindMapResponse,
    SessionStatus,
};
use super::Backend;
use crate::session::Session;
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::sleep;

const GENERATE_DELAY: Duration = Duration::from_millis(1500);
const IMAGES_DELAY: Duration = Duration::from_millis(1000);

const MOCK_IMAGE_URLS: [&str; 4] = [
    "https://images.unsplash.com/photo-1499750310107-5fef28a66643",
    "https://images.unsplash.com/photo-1518770660439-4636190af475",
    "https://images.unsplash.com/photo-1454165804606-c3d57bc86b40",
    "https://images.unsplash.com/photo-1516321318423-f06f85e504b3",
];

#[derive(Debug, Default)]
struct MockAdminState {
    sessions: Vec<AdminSession>,
    cache: Vec<CacheEntry>,
}

/// Offline stand-in for the backend: canned diagrams, canned images, and an
/// in-memory admin view. Always logged in as a local admin.
pub struct MockBackend {
    generate_delay: Duration,
    images_delay: Duration,
    state: Mutex<MockAdminState>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self::with_delays(GENERATE_DELAY, IMAGES_DELAY)
    }

    pub fn with_delays(generate_delay: Duration, images_delay: Duration) -> Self {
        let sessions = vec![AdminSession {
            email: "local@offline".into(),
            name: "Local Admin".into(),
            ip: "127.0.0.1".into(),
            user_agent: "mindmap-tui".into(),
            login_time: String::new(),
            last_active: String::new(),
            mind_maps_used: 0,
            mind_map_limit: 5,
            status: SessionStatus::Online,
        }];

        Self {
            generate_delay,
            images_delay,
            state: Mutex::new(MockAdminState {
                sessions,
                cache: Vec::new(),
            }),
        }
    }

    fn with_state<T>(
        &self,
        operation: AdminOperation,
        f: impl FnOnce(&mut MockAdminState) -> T,
    ) -> Result<T, AdminError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| AdminError::new(operation))?;
        Ok(f(&mut state))
    }
}

/// Template diagram for each mode, rooted at the requested topic.
pub fn mock_diagram(request: &MindMapRequest) -> String {
    let topic = &request.topic;
    match request.mode {
        MapMode::Simple => format!(
            "mindmap
  root(({topic}))
    Key Concept 1
      Sub-concept 1.1
      Sub-concept 1.2
    Key Concept 2
      Sub-concept 2.1
      Sub-concept 2.2
    Key Concept 3
      Sub-concept 3.1
        Detail 3.1.1
        Detail 3.1.2
      Sub-concept 3.2"
        ),
        MapMode::Analogy => format!(
            "mindmap
  root(({topic}))
    Analogy[\"{topic} is like a Tree\"]
      Roots[\"Foundation/Origins\"]
        Basic principles
        Historical context
      Trunk[\"Core Concepts\"]
        Main theories
        Central ideas
      Branches[\"Applications\"]
        Field 1
        Field 2
        Field 3
      Leaves[\"Details/Examples\"]
        Example 1
        Example 2"
        ),
        MapMode::Text => format!(
            "mindmap
  root(({topic}))
    Main Point 1
      Supporting detail 1.1
      Supporting detail 1.2
    Main Point 2
      Supporting detail 2.1
        Evidence 2.1.1
        Evidence 2.1.2
      Supporting detail 2.2
    Main Point 3
      Supporting detail 3.1
      Supporting detail 3.2"
        ),
    }
}

pub fn mock_images(topic: &str) -> Vec<ImageResult> {
    MOCK_IMAGE_URLS
        .iter()
        .enumerate()
        .map(|(i, url)| ImageResult {
            url: url.to_string(),
            alt_text: format!("{topic} concept {}", i + 1),
        })
        .collect()
}

#[async_trait]
impl Backend for MockBackend {
    async fn probe_session(&self) -> Result<Option<Session>, ApiError> {
        Ok(Some(Session {
            email: "local@offline".into(),
            display_name: "Local Admin".into(),
            avatar_url: String::new(),
            is_admin: true,
            is_logged_in: true,
            daily_limit: None,
        }))
    }

    async fn logout(&self) -> Result<(), ApiError> {
        Ok(())
    }

    fn login_url(&self) -> String {
        "offline mode: no login required".to_string()
    }

    async fn generate_mind_map(
        &self,
        request: &MindMapRequest,
    ) -> Result<MindMapResponse, GenerateError> {
        sleep(self.generate_delay).await;
        let entry = CacheEntry::new(request.topic.clone(), request.mode.as_str()).normalized();
        if let Ok(mut state) = self.state.lock() {
            if !state.cache.contains(&entry) {
                state.cache.push(entry);
            }
        }
        Ok(MindMapResponse::from_source(mock_diagram(request)))
    }

    async fn fetch_related_images(&self, topic: &str) -> Vec<ImageResult> {
        sleep(self.images_delay).await;
        mock_images(topic)
    }

    async fn list_sessions(&self) -> Result<Vec<AdminSession>, AdminError> {
        self.with_state(AdminOperation::ListSessions, |s| s.sessions.clone())
    }

    async fn list_cached_diagrams(&self) -> Result<Vec<CacheEntry>, AdminError> {
        self.with_state(AdminOperation::ListCache, |s| s.cache.clone())
    }

    async fn admin_stats(&self) -> Result<AdminStats, AdminError> {
        self.with_state(AdminOperation::Stats, |s| AdminStats {
            total_users: s.sessions.len() as u32,
            online_users: s.sessions.iter().filter(|x| x.is_online()).count() as u32,
            total_mind_maps: s.sessions.iter().map(|x| x.mind_maps_used).sum(),
        })
    }

    async fn terminate_session(&self, email: &str) -> Result<(), AdminError> {
        self.with_state(AdminOperation::TerminateSession, |s| {
            s.sessions.retain(|x| x.email != email)
        })
    }

    async fn reset_usage(&self, email: &str) -> Result<(), AdminError> {
        self.with_state(AdminOperation::ResetUsage, |s| {
            for session in s.sessions.iter_mut().filter(|x| x.email == email) {
                session.mind_maps_used = 0;
            }
        })
    }

    async fn clear_cache_entry(&self, entry: &CacheEntry) -> Result<(), AdminError> {
        let removed = self.with_state(AdminOperation::ClearCache, |s| {
            let before = s.cache.len();
            s.cache.retain(|x| x != entry);
            before != s.cache.len()
        })?;

        if removed {
            Ok(())
        } else {
            Err(AdminError::new(AdminOperation::ClearCache))
        }
    }

    async fn set_usage_limit(&self, email: &str, limit: u32) -> Result<(), AdminError> {
        self.with_state(AdminOperation::SetLimit, |s| {
            for session in s.sessions.iter_mut().filter(|x| x.email == email) {
                session.mind_map_limit = limit;
            }
        })
    }
}
