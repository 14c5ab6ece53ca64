use crate::admin::AdminPane;
use crate::api::{AdminError, AdminSession, AdminStats, CacheEntry};
use crate::app::AppState;
use crate::dispatch::Effect;
use tracing::{info, warn};

/// Fetches sessions, cache keys and stats in parallel.
pub fn load(app: &mut AppState) -> Vec<Effect> {
    app.admin.begin_sessions();
    app.admin.begin_cache();
    vec![Effect::ListSessions, Effect::ListCache, Effect::FetchStats]
}

pub fn refresh(app: &mut AppState) -> Vec<Effect> {
    if !app.session.can_access_admin() {
        return Vec::new();
    }
    load(app)
}

pub fn toggle_pane(app: &mut AppState) -> Vec<Effect> {
    app.admin.toggle_pane();
    Vec::new()
}

pub fn select_next(app: &mut AppState) -> Vec<Effect> {
    app.admin.select_next();
    Vec::new()
}

pub fn select_prev(app: &mut AppState) -> Vec<Effect> {
    app.admin.select_prev();
    Vec::new()
}

pub fn clear_filter(app: &mut AppState) -> Vec<Effect> {
    app.admin.set_filter("");
    Vec::new()
}

fn selected_email(app: &AppState) -> Option<String> {
    if !app.session.can_access_admin() || app.admin.pane != AdminPane::Sessions {
        return None;
    }
    app.admin.selected_session().map(|s| s.email.clone())
}

pub fn terminate_selected(app: &mut AppState) -> Vec<Effect> {
    let Some(email) = selected_email(app) else {
        return Vec::new();
    };
    if !app.admin.begin_terminate(&email) {
        return Vec::new();
    }
    vec![Effect::TerminateSession(email)]
}

pub fn reset_selected(app: &mut AppState) -> Vec<Effect> {
    let Some(email) = selected_email(app) else {
        return Vec::new();
    };
    if !app.admin.begin_reset(&email) {
        return Vec::new();
    }
    vec![Effect::ResetUsage(email)]
}

/// Applies a confirmed limit edit to the row it was started on. The edit is
/// dropped if that row has left the list in the meantime.
pub fn submit_limit(app: &mut AppState, email: String, input: &str) -> Vec<Effect> {
    if !app.session.can_access_admin() {
        return Vec::new();
    }
    if !app.admin.has_session(&email) {
        app.set_message(format!("{email} is no longer listed"));
        return Vec::new();
    }
    let limit = match input.trim().parse::<u32>() {
        Ok(limit) => limit,
        Err(_) => {
            app.set_message(format!("Invalid limit: {input:?}"));
            return Vec::new();
        }
    };
    if !app.admin.begin_set_limit(&email) {
        return Vec::new();
    }
    vec![Effect::SetLimit { email, limit }]
}

pub fn clear_selected_cache(app: &mut AppState) -> Vec<Effect> {
    if !app.session.can_access_admin() || app.admin.pane != AdminPane::Cache {
        return Vec::new();
    }
    let Some(listed) = app.admin.selected_cache_entry().cloned() else {
        return Vec::new();
    };
    match app.admin.begin_clear(&listed) {
        Some(key) => vec![Effect::ClearCache { listed, key }],
        None => Vec::new(),
    }
}

// Completions

pub fn sessions_loaded(
    app: &mut AppState,
    result: Result<Vec<AdminSession>, AdminError>,
) -> Vec<Effect> {
    if let Err(err) = &result {
        warn!(error = %err, "session list failed");
    }
    app.admin.finish_sessions(result);
    Vec::new()
}

pub fn cache_loaded(app: &mut AppState, result: Result<Vec<CacheEntry>, AdminError>) -> Vec<Effect> {
    if let Err(err) = &result {
        warn!(error = %err, "cache list failed");
    }
    app.admin.finish_cache(result);
    Vec::new()
}

pub fn stats_loaded(app: &mut AppState, result: Result<AdminStats, AdminError>) -> Vec<Effect> {
    app.admin.finish_stats(result);
    Vec::new()
}

pub fn session_terminated(
    app: &mut AppState,
    email: &str,
    result: Result<(), AdminError>,
) -> Vec<Effect> {
    if result.is_ok() {
        info!(%email, "session terminated");
    }
    app.admin.finish_terminate(email, result);
    Vec::new()
}

pub fn usage_reset(app: &mut AppState, email: &str, result: Result<(), AdminError>) -> Vec<Effect> {
    if result.is_ok() {
        info!(%email, "usage reset");
    }
    app.admin.finish_reset(email, result);
    Vec::new()
}

pub fn cache_cleared(
    app: &mut AppState,
    entry: &CacheEntry,
    result: Result<(), AdminError>,
) -> Vec<Effect> {
    if result.is_ok() {
        info!(key = %entry.key(), "cache entry cleared");
    }
    app.admin.finish_clear(entry, result);
    Vec::new()
}

pub fn limit_set(
    app: &mut AppState,
    email: &str,
    limit: u32,
    result: Result<(), AdminError>,
) -> Vec<Effect> {
    if result.is_ok() {
        info!(%email, limit, "usage limit changed");
    }
    app.admin.finish_set_limit(email, limit, result);
    Vec::new()
}
