//! Backend access: the [`Backend`] seam, its HTTP implementation and the
//! offline mock.

mod client;
mod error;
mod mock;
mod types;

pub use client::HttpBackend;
pub use error::{
    error_text, is_rate_limit_message, AdminError, AdminOperation, ApiError, GenerateError,
};
pub use mock::MockBackend;
pub use types::*;

use crate::session::Session;
use async_trait::async_trait;

/// Every call goes out with the session cookie attached.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `Ok(None)` means the backend answered "not logged in".
    async fn probe_session(&self) -> Result<Option<Session>, ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;

    /// Where the user has to go in a browser to sign in.
    fn login_url(&self) -> String;

    async fn generate_mind_map(
        &self,
        request: &MindMapRequest,
    ) -> Result<MindMapResponse, GenerateError>;

    /// Never fails; an unreachable image search yields an empty set.
    async fn fetch_related_images(&self, topic: &str) -> Vec<ImageResult>;

    async fn list_sessions(&self) -> Result<Vec<AdminSession>, AdminError>;

    async fn list_cached_diagrams(&self) -> Result<Vec<CacheEntry>, AdminError>;

    async fn admin_stats(&self) -> Result<AdminStats, AdminError>;

    async fn terminate_session(&self, email: &str) -> Result<(), AdminError>;

    async fn reset_usage(&self, email: &str) -> Result<(), AdminError>;

    /// `entry` is sent as given; callers normalize it first.
    async fn clear_cache_entry(&self, entry: &CacheEntry) -> Result<(), AdminError>;

    async fn set_usage_limit(&self, email: &str, limit: u32) -> Result<(), AdminError>;
}
