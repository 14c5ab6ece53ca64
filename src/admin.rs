use crate::api::{AdminError, AdminSession, AdminStats, CacheEntry};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminPane {
    #[default]
    Sessions,
    Cache,
}

/// State behind the admin route. Lists come from the backend; every command
/// is applied locally only after the backend confirms it.
#[derive(Debug, Default)]
pub struct AdminDashboard {
    sessions: Vec<AdminSession>,
    pub sessions_loading: bool,
    pub sessions_error: Option<String>,

    cache: Vec<CacheEntry>,
    pub cache_loading: bool,
    pub cache_error: Option<String>,

    stats: Option<AdminStats>,
    pub stats_error: Option<String>,

    filter: String,

    terminating: HashSet<String>,
    resetting: HashSet<String>,
    limiting: HashSet<String>,
    clearing: HashSet<CacheEntry>,
    limit_target: Option<String>,

    pub pane: AdminPane,
    pub selected_row: usize,
    pub selected_tile: usize,
}

impl AdminDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    // Fetches

    pub fn begin_sessions(&mut self) {
        self.sessions_loading = true;
    }

    pub fn finish_sessions(&mut self, result: Result<Vec<AdminSession>, AdminError>) {
        self.sessions_loading = false;
        match result {
            Ok(sessions) => {
                self.sessions = sessions;
                self.sessions_error = None;
                self.clamp_selection();
            }
            Err(err) => self.sessions_error = Some(err.to_string()),
        }
    }

    pub fn begin_cache(&mut self) {
        self.cache_loading = true;
    }

    pub fn finish_cache(&mut self, result: Result<Vec<CacheEntry>, AdminError>) {
        self.cache_loading = false;
        match result {
            Ok(cache) => {
                self.cache = cache;
                self.cache_error = None;
                self.clamp_selection();
            }
            Err(err) => self.cache_error = Some(err.to_string()),
        }
    }

    pub fn finish_stats(&mut self, result: Result<AdminStats, AdminError>) {
        match result {
            Ok(stats) => {
                self.stats = Some(stats);
                self.stats_error = None;
            }
            Err(err) => self.stats_error = Some(err.to_string()),
        }
    }

    pub fn stats(&self) -> Option<&AdminStats> {
        self.stats.as_ref()
    }

    pub fn sessions(&self) -> &[AdminSession] {
        &self.sessions
    }

    pub fn cache(&self) -> &[CacheEntry] {
        &self.cache
    }

    // Filter

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
        self.clamp_selection();
    }

    pub fn filtered_sessions(&self) -> Vec<&AdminSession> {
        let needle = self.filter.to_lowercase();
        self.sessions.iter().filter(|s| s.matches(&needle)).collect()
    }

    /// (online, offline) over the filtered list.
    pub fn status_counts(&self) -> (usize, usize) {
        let filtered = self.filtered_sessions();
        let online = filtered.iter().filter(|s| s.is_online()).count();
        (online, filtered.len() - online)
    }

    // Per-row commands

    pub fn is_terminating(&self, email: &str) -> bool {
        self.terminating.contains(email)
    }

    pub fn is_resetting(&self, email: &str) -> bool {
        self.resetting.contains(email)
    }

    pub fn is_setting_limit(&self, email: &str) -> bool {
        self.limiting.contains(email)
    }

    pub fn is_clearing(&self, entry: &CacheEntry) -> bool {
        self.clearing.contains(entry)
    }

    /// Returns false when a terminate for this row is already in flight.
    pub fn begin_terminate(&mut self, email: &str) -> bool {
        self.terminating.insert(email.to_string())
    }

    pub fn finish_terminate(&mut self, email: &str, result: Result<(), AdminError>) {
        self.terminating.remove(email);
        match result {
            Ok(()) => {
                self.sessions.retain(|s| s.email != email);
                self.clamp_selection();
            }
            Err(err) => self.sessions_error = Some(err.to_string()),
        }
    }

    pub fn begin_reset(&mut self, email: &str) -> bool {
        self.resetting.insert(email.to_string())
    }

    pub fn finish_reset(&mut self, email: &str, result: Result<(), AdminError>) {
        self.resetting.remove(email);
        match result {
            Ok(()) => self.update_row(email, |s| s.mind_maps_used = 0),
            Err(err) => self.sessions_error = Some(err.to_string()),
        }
    }

    pub fn begin_set_limit(&mut self, email: &str) -> bool {
        self.limiting.insert(email.to_string())
    }

    pub fn finish_set_limit(&mut self, email: &str, limit: u32, result: Result<(), AdminError>) {
        self.limiting.remove(email);
        match result {
            Ok(()) => self.update_row(email, |s| s.mind_map_limit = limit),
            Err(err) => self.sessions_error = Some(err.to_string()),
        }
    }

    /// Row whose limit is being edited, fixed when the edit starts.
    pub fn limit_target(&self) -> Option<&str> {
        self.limit_target.as_deref()
    }

    pub fn set_limit_target(&mut self, email: Option<String>) {
        self.limit_target = email;
    }

    pub fn take_limit_target(&mut self) -> Option<String> {
        self.limit_target.take()
    }

    pub fn has_session(&self, email: &str) -> bool {
        self.sessions.iter().any(|s| s.email == email)
    }

    fn update_row(&mut self, email: &str, f: impl Fn(&mut AdminSession)) {
        self.sessions
            .iter_mut()
            .filter(|s| s.email == email)
            .for_each(f);
    }

    /// Marks the tile as in flight and returns the key to send, normalized the
    /// way the backend stores it. `None` if a clear is already running.
    pub fn begin_clear(&mut self, entry: &CacheEntry) -> Option<CacheEntry> {
        self.clearing
            .insert(entry.clone())
            .then(|| entry.normalized())
    }

    /// `entry` is the tile as listed, not the normalized key.
    pub fn finish_clear(&mut self, entry: &CacheEntry, result: Result<(), AdminError>) {
        self.clearing.remove(entry);
        match result {
            Ok(()) => {
                self.cache.retain(|e| e != entry);
                self.cache_error = None;
                self.clamp_selection();
            }
            Err(_) => {
                self.cache_error = Some(format!(
                    "Failed to clear cache for {}_{}",
                    entry.topic, entry.map_type
                ));
            }
        }
    }

    // Selection

    pub fn toggle_pane(&mut self) {
        self.pane = match self.pane {
            AdminPane::Sessions => AdminPane::Cache,
            AdminPane::Cache => AdminPane::Sessions,
        };
    }

    pub fn select_next(&mut self) {
        match self.pane {
            AdminPane::Sessions => self.selected_row += 1,
            AdminPane::Cache => self.selected_tile += 1,
        }
        self.clamp_selection();
    }

    pub fn select_prev(&mut self) {
        match self.pane {
            AdminPane::Sessions => self.selected_row = self.selected_row.saturating_sub(1),
            AdminPane::Cache => self.selected_tile = self.selected_tile.saturating_sub(1),
        }
    }

    pub fn selected_session(&self) -> Option<&AdminSession> {
        self.filtered_sessions().get(self.selected_row).copied()
    }

    pub fn selected_cache_entry(&self) -> Option<&CacheEntry> {
        self.cache.get(self.selected_tile)
    }

    fn clamp_selection(&mut self) {
        let rows = self.filtered_sessions().len();
        self.selected_row = self.selected_row.min(rows.saturating_sub(1));
        self.selected_tile = self.selected_tile.min(self.cache.len().saturating_sub(1));
    }
}
