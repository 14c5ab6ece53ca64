mod admin;
pub mod canvas;
pub mod constants;
mod diagram;
mod gallery;
mod generator;
mod help;
mod status_line;

use crate::actions::char_to_byte_index;
use crate::app::{AppMode, AppState, InputField, Route};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use admin::AdminRenderer;
use diagram::DiagramRenderer;
use gallery::GalleryRenderer;
use generator::GeneratorRenderer;
use help::HelpRenderer;
use status_line::StatusLineRenderer;

const FORM_WIDTH: u16 = 42;
const GALLERY_HEIGHT: u16 = 7;

pub fn render(frame: &mut Frame, app: &mut AppState) {
    // Update terminal size
    let size = frame.area();
    app.terminal_width = size.width;
    app.terminal_height = size.height;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(size);

    render_header(frame, app, chunks[0]);

    match (&app.mode, app.route) {
        (AppMode::Help, _) => HelpRenderer::render(frame, chunks[1]),
        (_, Route::Generator) => render_generator(frame, app, chunks[1]),
        (_, Route::Admin) => AdminRenderer::render(frame, app, chunks[1]),
    }

    StatusLineRenderer::render(frame, app, chunks[2]);
}

fn render_generator(frame: &mut Frame, app: &mut AppState, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(FORM_WIDTH), Constraint::Min(10)])
        .split(area);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(GALLERY_HEIGHT)])
        .split(columns[1]);

    GeneratorRenderer::render(frame, app, columns[0]);
    DiagramRenderer::render(frame, app, right[0]);
    GalleryRenderer::render(frame, app, right[1]);

    if app.gallery.lightbox().is_some() {
        GalleryRenderer::render_lightbox(frame, app, columns[1]);
    }
}

fn render_header(frame: &mut Frame, app: &AppState, area: Rect) {
    let tab = |label: &'static str, active: bool| {
        if active {
            Span::styled(
                label,
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(label, Style::default().fg(Color::Gray))
        }
    };

    let user = if app.session.is_pending() {
        "checking session...".to_string()
    } else {
        match app.session.current() {
            Some(session) if session.is_admin => format!("{} (admin)", session.email),
            Some(session) => session.email.clone(),
            None => "not logged in (L to log in)".to_string(),
        }
    };

    let line = Line::from(vec![
        Span::styled(" Mind Map AI ", Style::default().add_modifier(Modifier::BOLD)),
        tab(" 1 Generator ", app.route == Route::Generator),
        Span::raw(" "),
        tab(" 2 Admin ", app.route == Route::Admin),
        Span::raw("  "),
        Span::styled(user, Style::default().fg(Color::DarkGray)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Border style for a panel, highlighted when it holds the focus.
pub(crate) fn panel_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub(crate) fn spinner(tick: usize) -> char {
    constants::SPINNER_FRAMES[tick % constants::SPINNER_FRAMES.len()]
}

/// The buffer with the cursor indicator inserted at a character position.
pub(crate) fn with_cursor(buffer: &str, cursor_pos: usize) -> String {
    let at = char_to_byte_index(buffer, cursor_pos);
    let mut display = String::with_capacity(buffer.len() + 4);
    display.push_str(&buffer[..at]);
    display.push(constants::CURSOR_INDICATOR);
    display.push_str(&buffer[at..]);
    display
}

/// The live buffer when `field` is being edited, otherwise `None`.
pub(crate) fn editing_buffer(app: &AppState, field: InputField) -> Option<String> {
    match &app.mode {
        AppMode::Editing {
            field: editing,
            buffer,
            cursor_pos,
        } if *editing == field => Some(with_cursor(buffer, *cursor_pos)),
        _ => None,
    }
}
