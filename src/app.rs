use crate::admin::AdminDashboard;
use crate::config::AppConfig;
use crate::diagram::DiagramView;
use crate::flow::RequestFlow;
use crate::gallery::Gallery;
use crate::session::SessionStore;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    #[default]
    Generator,
    Admin,
}

/// Text inputs that can take the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Topic,
    Text,
    Filter,
    Limit,
}

impl InputField {
    pub fn label(&self) -> &'static str {
        match self {
            InputField::Topic => "Topic",
            InputField::Text => "Text",
            InputField::Filter => "Search",
            InputField::Limit => "Daily limit",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    Editing {
        field: InputField,
        buffer: String,
        cursor_pos: usize,
    },
    Help,
}

/// Which generator panel receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Form,
    Diagram,
    Gallery,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Form => Focus::Diagram,
            Focus::Diagram => Focus::Gallery,
            Focus::Gallery => Focus::Form,
        }
    }
}

pub struct AppState {
    pub running: bool,
    pub mode: AppMode,
    pub route: Route,
    pub focus: Focus,
    pub config: AppConfig,

    pub session: SessionStore,
    pub flow: RequestFlow,
    pub diagram: DiagramView,
    pub gallery: Gallery,
    pub admin: AdminDashboard,

    /// Browser hand-off address for signing in.
    pub login_url: String,

    pub terminal_width: u16,
    pub terminal_height: u16,

    // Message for status line
    pub message: Option<String>,

    pub clipboard: Option<String>,

    // Spinner frame, advanced by the UI loop
    pub tick: usize,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let diagram = DiagramView::new(config.zoom_range(), config.layout_params());

        Self {
            running: true,
            mode: AppMode::Normal,
            route: config.start_route,
            focus: Focus::default(),
            session: SessionStore::new(),
            flow: RequestFlow::new(),
            diagram,
            gallery: Gallery::new(),
            admin: AdminDashboard::new(),
            login_url: String::new(),
            terminal_width: 80,
            terminal_height: 24,
            message: None,
            clipboard: None,
            tick: 0,
            config,
        }
    }

    pub fn with_login_url(mut self, url: impl Into<String>) -> Self {
        self.login_url = url.into();
        self
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, AppMode::Editing { .. })
    }

    /// The loading indicator covers both the request and the render after it.
    pub fn diagram_loading(&self) -> bool {
        self.flow.is_busy() || self.diagram.is_rendering()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_uses_config() {
        let config = AppConfig {
            start_route: Route::Admin,
            max_zoom: 2.0,
            ..AppConfig::default()
        };
        let app = AppState::new(config).with_login_url("http://localhost:5000/api/google-login");

        assert!(app.running);
        assert_eq!(app.route, Route::Admin);
        assert_eq!(app.diagram.zoom_range().max, 2.0);
        assert_eq!(app.focus, Focus::Form);
        assert!(app.session.is_pending());
        assert!(!app.diagram_loading());
    }

    #[test]
    fn test_focus_cycles() {
        assert_eq!(Focus::Form.next().next().next(), Focus::Form);
    }
}
