mod admin;
mod clipboard;
mod editing;
mod form;
mod gallery;
mod help;
mod session;
mod view;

use crate::api::{
    AdminError, AdminSession, AdminStats, CacheEntry, GenerateError, ImageResult, MindMapResponse,
};
use crate::app::{AppState, InputField};
use crate::diagram::{Diagram, Direction, RenderError};
use crate::dispatch::Effect;
use crate::session::Session;
use anyhow::Result;

pub use clipboard::{copy_to_clipboard, read_clipboard};
pub use editing::char_to_byte_index;

#[derive(Debug, Clone)]
pub enum Action {
    // Application control
    Quit,
    Resize(u16, u16),
    Tick,

    // Routing and focus
    GoToGenerator,
    GoToAdmin,
    CycleFocus,

    // Session
    Login,
    RefreshSession,
    Logout,

    // Form
    EditField(InputField),
    CycleMode,
    Submit,
    DismissRateLimit,

    // Editing
    TypeChar(char),
    Backspace,
    Delete,
    MoveCursorLeft,
    MoveCursorRight,
    MoveCursorHome,
    MoveCursorEnd,
    MoveCursorWordLeft,
    MoveCursorWordRight,
    DeleteWordBackward,
    DeleteToEnd,
    DeleteToStart,
    PasteAtCursor,
    ConfirmEdit,
    CancelEdit,

    // Diagram
    SelectNode(Direction),
    Pan(Direction),
    ZoomIn,
    ZoomOut,
    ResetView,
    ToggleCollapse,
    ExpandAll,
    ExportSource,
    ExportPages,
    CopySource,

    // Gallery and lightbox
    GalleryNext,
    GalleryPrev,
    OpenLightbox,
    CloseLightbox,
    LightboxNext,
    LightboxPrev,
    LightboxZoomIn,
    LightboxZoomOut,
    CopyImageUrl,

    // Admin dashboard
    AdminRefresh,
    AdminTogglePane,
    AdminSelectNext,
    AdminSelectPrev,
    ClearFilter,
    TerminateSelected,
    ResetSelected,
    ClearSelectedCache,

    // Help
    ShowHelp,
    CloseHelp,

    // Completions from the dispatcher
    SessionProbed(Option<Session>),
    LoggedOut,
    GenerationFinished {
        seq: u64,
        result: Result<MindMapResponse, GenerateError>,
    },
    ImagesFetched {
        seq: u64,
        images: Vec<ImageResult>,
    },
    RenderFinished {
        render_id: u64,
        result: Result<Diagram, RenderError>,
    },
    SessionsLoaded(Result<Vec<AdminSession>, AdminError>),
    CacheLoaded(Result<Vec<CacheEntry>, AdminError>),
    StatsLoaded(Result<AdminStats, AdminError>),
    SessionTerminated {
        email: String,
        result: Result<(), AdminError>,
    },
    UsageReset {
        email: String,
        result: Result<(), AdminError>,
    },
    CacheCleared {
        entry: CacheEntry,
        result: Result<(), AdminError>,
    },
    LimitSet {
        email: String,
        limit: u32,
        result: Result<(), AdminError>,
    },
}

/// Applies one action to the state and returns the side effects it asks for.
pub fn execute_action(action: Action, app: &mut AppState) -> Result<Vec<Effect>> {
    let effects = match action {
        Action::Quit => {
            app.running = false;
            Vec::new()
        }
        Action::Resize(width, height) => {
            app.terminal_width = width;
            app.terminal_height = height;
            Vec::new()
        }
        Action::Tick => {
            app.tick = app.tick.wrapping_add(1);
            Vec::new()
        }

        // Routing
        Action::GoToGenerator => session::go_to_generator(app),
        Action::GoToAdmin => session::go_to_admin(app),
        Action::CycleFocus => {
            app.focus = app.focus.next();
            Vec::new()
        }

        // Session
        Action::Login => session::login(app),
        Action::RefreshSession => session::refresh_session(app),
        Action::Logout => session::logout(app),
        Action::SessionProbed(result) => session::session_probed(app, result),
        Action::LoggedOut => session::logged_out(app),

        // Form
        Action::EditField(field) => {
            editing::start_editing(app, field);
            Vec::new()
        }
        Action::CycleMode => form::cycle_mode(app),
        Action::Submit => form::submit(app),
        Action::DismissRateLimit => form::dismiss_rate_limit(app),
        Action::GenerationFinished { seq, result } => form::generation_finished(app, seq, result),
        Action::ImagesFetched { seq, images } => gallery::images_fetched(app, seq, images),
        Action::RenderFinished { render_id, result } => {
            view::render_finished(app, render_id, result)
        }

        // Diagram
        Action::SelectNode(direction) => view::select_node(app, direction),
        Action::Pan(direction) => view::pan(app, direction),
        Action::ZoomIn => view::zoom_in(app),
        Action::ZoomOut => view::zoom_out(app),
        Action::ResetView => view::reset_view(app),
        Action::ToggleCollapse => view::toggle_collapse(app),
        Action::ExpandAll => view::expand_all(app),
        Action::ExportSource => view::export_source(app),
        Action::ExportPages => view::export_pages(app),
        Action::CopySource => view::copy_source(app),

        // Gallery
        Action::GalleryNext => gallery::select_next(app),
        Action::GalleryPrev => gallery::select_prev(app),
        Action::OpenLightbox => gallery::open_lightbox(app),
        Action::CloseLightbox => gallery::close_lightbox(app),
        Action::LightboxNext => gallery::lightbox_next(app),
        Action::LightboxPrev => gallery::lightbox_prev(app),
        Action::LightboxZoomIn => gallery::lightbox_zoom_in(app),
        Action::LightboxZoomOut => gallery::lightbox_zoom_out(app),
        Action::CopyImageUrl => gallery::copy_image_url(app),

        // Admin
        Action::AdminRefresh => admin::refresh(app),
        Action::AdminTogglePane => admin::toggle_pane(app),
        Action::AdminSelectNext => admin::select_next(app),
        Action::AdminSelectPrev => admin::select_prev(app),
        Action::ClearFilter => admin::clear_filter(app),
        Action::TerminateSelected => admin::terminate_selected(app),
        Action::ResetSelected => admin::reset_selected(app),
        Action::ClearSelectedCache => admin::clear_selected_cache(app),
        Action::SessionsLoaded(result) => admin::sessions_loaded(app, result),
        Action::CacheLoaded(result) => admin::cache_loaded(app, result),
        Action::StatsLoaded(result) => admin::stats_loaded(app, result),
        Action::SessionTerminated { email, result } => {
            admin::session_terminated(app, &email, result)
        }
        Action::UsageReset { email, result } => admin::usage_reset(app, &email, result),
        Action::CacheCleared { entry, result } => admin::cache_cleared(app, &entry, result),
        Action::LimitSet {
            email,
            limit,
            result,
        } => admin::limit_set(app, &email, limit, result),

        // Help
        Action::ShowHelp => {
            help::show_help(app);
            Vec::new()
        }
        Action::CloseHelp => {
            help::close_help(app);
            Vec::new()
        }

        // Editing. Only confirming can reach the network.
        Action::ConfirmEdit => editing::confirm_edit(app),
        edit => {
            editing::apply(app, edit);
            Vec::new()
        }
    };
    Ok(effects)
}
