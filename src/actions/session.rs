use super::admin;
use super::clipboard::copy_to_clipboard;
use crate::app::{AppState, Route};
use crate::dispatch::Effect;
use crate::session::Session;
use tracing::info;

pub fn go_to_generator(app: &mut AppState) -> Vec<Effect> {
    app.route = Route::Generator;
    Vec::new()
}

/// Entering the dashboard loads it, but only for a confirmed admin. While the
/// probe is pending the load waits for [`session_probed`].
pub fn go_to_admin(app: &mut AppState) -> Vec<Effect> {
    app.route = Route::Admin;
    if app.session.can_access_admin() {
        admin::load(app)
    } else {
        Vec::new()
    }
}

pub fn login(app: &mut AppState) -> Vec<Effect> {
    let url = app.login_url.clone();
    copy_to_clipboard(app, url.clone(), "Login URL");
    app.set_message(format!("Open {url} in a browser, then press R"));
    Vec::new()
}

pub fn refresh_session(app: &mut AppState) -> Vec<Effect> {
    app.session.begin_probe();
    vec![Effect::ProbeSession]
}

pub fn logout(_app: &mut AppState) -> Vec<Effect> {
    vec![Effect::Logout]
}

pub fn session_probed(app: &mut AppState, result: Option<Session>) -> Vec<Effect> {
    match &result {
        Some(session) => info!(email = %session.email, admin = session.is_admin, "session resolved"),
        None => info!("no active session"),
    }
    app.session.apply_probe(result);

    if app.route == Route::Admin && app.session.can_access_admin() {
        admin::load(app)
    } else {
        Vec::new()
    }
}

pub fn logged_out(app: &mut AppState) -> Vec<Effect> {
    app.session.clear();
    app.route = Route::Generator;
    app.set_message("Logged out");
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn create_test_app() -> AppState {
        AppState::new(AppConfig::default()).with_login_url("http://localhost:5000/api/google-login")
    }

    fn session(is_admin: bool) -> Session {
        Session {
            email: "ada@example.com".into(),
            display_name: "Ada".into(),
            avatar_url: String::new(),
            is_admin,
            is_logged_in: true,
            daily_limit: None,
        }
    }

    #[test]
    fn test_admin_route_waits_for_probe() {
        let mut app = create_test_app();

        assert!(go_to_admin(&mut app).is_empty());
        assert_eq!(app.route, Route::Admin);

        let effects = session_probed(&mut app, Some(session(true)));
        assert_eq!(
            effects,
            vec![Effect::ListSessions, Effect::ListCache, Effect::FetchStats]
        );
    }

    #[test]
    fn test_non_admin_gets_no_admin_calls() {
        let mut app = create_test_app();
        app.route = Route::Admin;

        assert!(session_probed(&mut app, Some(session(false))).is_empty());
        assert!(go_to_admin(&mut app).is_empty());
    }

    #[test]
    fn test_refresh_marks_probe_pending() {
        let mut app = create_test_app();
        session_probed(&mut app, Some(session(true)));

        assert_eq!(refresh_session(&mut app), vec![Effect::ProbeSession]);
        assert!(app.session.is_pending());
        assert!(!app.session.can_access_admin());
    }

    #[test]
    fn test_login_copies_url() {
        let mut app = create_test_app();
        login(&mut app);
        assert_eq!(
            app.clipboard.as_deref(),
            Some("http://localhost:5000/api/google-login")
        );
    }

    #[test]
    fn test_logged_out_returns_to_generator() {
        let mut app = create_test_app();
        session_probed(&mut app, Some(session(true)));
        app.route = Route::Admin;

        logged_out(&mut app);
        assert_eq!(app.route, Route::Generator);
        assert!(!app.session.is_logged_in());
    }
}
