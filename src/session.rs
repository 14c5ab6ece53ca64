use crate::api::UserResponse;

/// The signed-in user as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub email: String,
    pub display_name: String,
    pub avatar_url: String,
    pub is_admin: bool,
    pub is_logged_in: bool,
    pub daily_limit: Option<u32>,
}

impl From<UserResponse> for Session {
    fn from(response: UserResponse) -> Self {
        Self {
            email: response.user.email,
            display_name: response.user.name,
            avatar_url: response.user.picture,
            is_admin: response.is_admin,
            is_logged_in: true,
            daily_limit: response.limit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeStatus {
    #[default]
    Pending,
    Resolved,
}

/// Holds the probed session. Only a completed server probe can grant admin access.
#[derive(Debug, Default)]
pub struct SessionStore {
    session: Option<Session>,
    probe: ProbeStatus,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_probe(&mut self) {
        self.probe = ProbeStatus::Pending;
    }

    pub fn apply_probe(&mut self, result: Option<Session>) {
        self.session = result;
        self.probe = ProbeStatus::Resolved;
    }

    pub fn clear(&mut self) {
        self.session = None;
    }

    pub fn current(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.probe == ProbeStatus::Pending
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_logged_in)
    }

    pub fn is_admin(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_admin)
    }

    pub fn can_access_admin(&self) -> bool {
        self.probe == ProbeStatus::Resolved && self.is_logged_in() && self.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::UserInfo;

    fn admin_response() -> UserResponse {
        UserResponse {
            user: UserInfo {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                picture: "https://example.com/ada.png".into(),
            },
            is_admin: true,
            limit: Some(5),
        }
    }

    #[test]
    fn test_new_store_is_pending_and_logged_out() {
        let store = SessionStore::new();
        assert!(store.is_pending());
        assert!(!store.is_logged_in());
        assert!(!store.can_access_admin());
    }

    #[test]
    fn test_admin_access_requires_resolved_probe() {
        let mut store = SessionStore::new();
        store.apply_probe(Some(admin_response().into()));
        assert!(store.can_access_admin());

        store.begin_probe();
        assert!(!store.can_access_admin());
    }

    #[test]
    fn test_failed_probe_clears_session() {
        let mut store = SessionStore::new();
        store.apply_probe(Some(admin_response().into()));
        store.apply_probe(None);
        assert!(!store.is_logged_in());
        assert!(!store.is_admin());
    }

    #[test]
    fn test_non_admin_cannot_access_admin() {
        let mut response = admin_response();
        response.is_admin = false;
        let mut store = SessionStore::new();
        store.apply_probe(Some(response.into()));
        assert!(store.is_logged_in());
        assert!(!store.can_access_admin());
    }

    #[test]
    fn test_logout_clears_session() {
        let mut store = SessionStore::new();
        store.apply_probe(Some(admin_response().into()));
        store.clear();
        assert!(store.current().is_none());
    }
}
