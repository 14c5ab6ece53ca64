//! Runs the side effects requested by actions on the tokio runtime and feeds
//! their completions back to the UI loop as actions.

use crate::actions::Action;
use crate::api::{Backend, CacheEntry, MindMapRequest};
use crate::diagram::{parse_mindmap, RenderError};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ProbeSession,
    Logout,
    Generate { seq: u64, request: MindMapRequest },
    FetchImages { seq: u64, topic: String },
    RenderDiagram { render_id: u64, source: String },
    ListSessions,
    ListCache,
    FetchStats,
    TerminateSession(String),
    ResetUsage(String),
    /// `listed` is the entry as shown; `key` is what goes over the wire.
    ClearCache { listed: CacheEntry, key: CacheEntry },
    SetLimit { email: String, limit: u32 },
}

pub struct Dispatcher {
    backend: Arc<dyn Backend>,
    tx: UnboundedSender<Action>,
    handle: Handle,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn Backend>, tx: UnboundedSender<Action>, handle: Handle) -> Self {
        Self {
            backend,
            tx,
            handle,
        }
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    pub fn dispatch_all(&self, effects: Vec<Effect>) {
        for effect in effects {
            self.dispatch(effect);
        }
    }

    /// Each effect runs as its own task; nothing is awaited here.
    pub fn dispatch(&self, effect: Effect) -> JoinHandle<()> {
        debug!(?effect, "dispatching effect");
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();

        self.handle.spawn(async move {
            let action = run_effect(backend.as_ref(), effect).await;
            if tx.send(action).is_err() {
                debug!("completion dropped after shutdown");
            }
        })
    }
}

/// Performs one effect and returns the completion action for it.
pub async fn run_effect(backend: &dyn Backend, effect: Effect) -> Action {
    match effect {
        Effect::ProbeSession => {
            let session = match backend.probe_session().await {
                Ok(session) => session,
                Err(err) => {
                    warn!(error = %err, "session probe failed");
                    None
                }
            };
            Action::SessionProbed(session)
        }
        Effect::Logout => {
            if let Err(err) = backend.logout().await {
                warn!(error = %err, "logout request failed");
            }
            Action::LoggedOut
        }
        Effect::Generate { seq, request } => {
            let result = backend.generate_mind_map(&request).await;
            Action::GenerationFinished { seq, result }
        }
        Effect::FetchImages { seq, topic } => {
            let images = backend.fetch_related_images(&topic).await;
            Action::ImagesFetched { seq, images }
        }
        Effect::RenderDiagram { render_id, source } => {
            let result = render(source).await;
            Action::RenderFinished { render_id, result }
        }
        Effect::ListSessions => Action::SessionsLoaded(backend.list_sessions().await),
        Effect::ListCache => Action::CacheLoaded(backend.list_cached_diagrams().await),
        Effect::FetchStats => Action::StatsLoaded(backend.admin_stats().await),
        Effect::TerminateSession(email) => {
            let result = backend.terminate_session(&email).await;
            Action::SessionTerminated { email, result }
        }
        Effect::ResetUsage(email) => {
            let result = backend.reset_usage(&email).await;
            Action::UsageReset { email, result }
        }
        Effect::ClearCache { listed, key } => {
            let result = backend.clear_cache_entry(&key).await;
            Action::CacheCleared {
                entry: listed,
                result,
            }
        }
        Effect::SetLimit { email, limit } => {
            let result = backend.set_usage_limit(&email, limit).await;
            Action::LimitSet {
                email,
                limit,
                result,
            }
        }
    }
}

/// Parse and validate on the blocking pool.
async fn render(source: String) -> Result<crate::diagram::Diagram, RenderError> {
    tokio::task::spawn_blocking(move || parse_mindmap(&source))
        .await
        .map_err(|err| RenderError::Task(err.to_string()))?
}
