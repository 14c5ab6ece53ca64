use crate::actions::Action;
use crate::app::{AppMode, AppState, Focus, InputField, Route};
use crate::diagram::Direction;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

pub fn handle_events(app: &AppState) -> Result<Option<Action>> {
    if event::poll(Duration::from_millis(10))? {
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                return Ok(handle_key_event(app, key));
            }
            Event::Resize(width, height) => return Ok(Some(Action::Resize(width, height))),
            _ => {}
        }
    }
    Ok(None)
}

pub fn handle_key_event(app: &AppState, key: KeyEvent) -> Option<Action> {
    match &app.mode {
        AppMode::Editing { .. } => handle_editing_mode(key),
        AppMode::Help => handle_help_mode(key),
        AppMode::Normal => handle_global(key).or_else(|| match app.route {
            Route::Generator => handle_generator(app, key),
            Route::Admin => handle_admin(key),
        }),
    }
}

fn handle_global(key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    match (key.code, key.modifiers) {
        (Char('q'), KeyModifiers::NONE) | (Char('c'), KeyModifiers::CONTROL) => Some(Action::Quit),
        (Char('?'), _) => Some(Action::ShowHelp),

        // Routes
        (Char('1'), KeyModifiers::NONE) => Some(Action::GoToGenerator),
        (Char('2'), KeyModifiers::NONE) => Some(Action::GoToAdmin),

        // Session
        (Char('L'), KeyModifiers::SHIFT) => Some(Action::Login),
        (Char('R'), KeyModifiers::SHIFT) => Some(Action::RefreshSession),
        (Char('O'), KeyModifiers::SHIFT) => Some(Action::Logout),

        _ => None,
    }
}

fn handle_generator(app: &AppState, key: KeyEvent) -> Option<Action> {
    if app.gallery.lightbox().is_some() {
        return handle_lightbox(key);
    }

    match (key.code, key.modifiers) {
        (KeyCode::Tab, _) => return Some(Action::CycleFocus),
        (KeyCode::Esc, _) => return Some(Action::DismissRateLimit),
        _ => {}
    }

    match app.focus {
        Focus::Form => handle_form(key),
        Focus::Diagram => handle_diagram(key),
        Focus::Gallery => handle_gallery(key),
    }
}

fn handle_form(key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    match (key.code, key.modifiers) {
        (Char('t'), KeyModifiers::NONE) | (Char('i'), KeyModifiers::NONE) => {
            Some(Action::EditField(InputField::Topic))
        }
        (Char('x'), KeyModifiers::NONE) => Some(Action::EditField(InputField::Text)),
        (Char('m'), KeyModifiers::NONE) => Some(Action::CycleMode),
        (Enter, _) => Some(Action::Submit),
        _ => None,
    }
}

fn handle_diagram(key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    match (key.code, key.modifiers) {
        // Selection
        (Char('h'), KeyModifiers::NONE) | (Left, KeyModifiers::NONE) => {
            Some(Action::SelectNode(Direction::Left))
        }
        (Char('j'), KeyModifiers::NONE) | (Down, KeyModifiers::NONE) => {
            Some(Action::SelectNode(Direction::Down))
        }
        (Char('k'), KeyModifiers::NONE) | (Up, KeyModifiers::NONE) => {
            Some(Action::SelectNode(Direction::Up))
        }
        (Char('l'), KeyModifiers::NONE) | (Right, KeyModifiers::NONE) => {
            Some(Action::SelectNode(Direction::Right))
        }

        // Panning. Shifted letters are taken by the session keys.
        (Left, KeyModifiers::SHIFT) => Some(Action::Pan(Direction::Left)),
        (Down, KeyModifiers::SHIFT) => Some(Action::Pan(Direction::Down)),
        (Up, KeyModifiers::SHIFT) => Some(Action::Pan(Direction::Up)),
        (Right, KeyModifiers::SHIFT) => Some(Action::Pan(Direction::Right)),

        // Zoom
        (Char('+'), _) | (Char('='), KeyModifiers::NONE) => Some(Action::ZoomIn),
        (Char('-'), KeyModifiers::NONE) => Some(Action::ZoomOut),
        (Char('0'), KeyModifiers::NONE) => Some(Action::ResetView),

        // Collapsing
        (Char(' '), KeyModifiers::NONE) => Some(Action::ToggleCollapse),
        (Char('b'), KeyModifiers::NONE) => Some(Action::ExpandAll),

        // Export
        (Char('e'), KeyModifiers::NONE) => Some(Action::ExportSource),
        (Char('E'), KeyModifiers::SHIFT) => Some(Action::ExportPages),
        (Char('y'), KeyModifiers::NONE) => Some(Action::CopySource),

        _ => None,
    }
}

fn handle_gallery(key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    match (key.code, key.modifiers) {
        (Char('h'), KeyModifiers::NONE) | (Left, _) => Some(Action::GalleryPrev),
        (Char('l'), KeyModifiers::NONE) | (Right, _) => Some(Action::GalleryNext),
        (Enter, _) => Some(Action::OpenLightbox),
        (Char('y'), KeyModifiers::NONE) => Some(Action::CopyImageUrl),
        _ => None,
    }
}

fn handle_lightbox(key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    match (key.code, key.modifiers) {
        (Esc, _) | (Enter, _) => Some(Action::CloseLightbox),
        (Char('h'), KeyModifiers::NONE) | (Left, _) => Some(Action::LightboxPrev),
        (Char('l'), KeyModifiers::NONE) | (Right, _) => Some(Action::LightboxNext),
        (Char('+'), _) | (Char('='), KeyModifiers::NONE) => Some(Action::LightboxZoomIn),
        (Char('-'), KeyModifiers::NONE) => Some(Action::LightboxZoomOut),
        (Char('y'), KeyModifiers::NONE) => Some(Action::CopyImageUrl),
        _ => None,
    }
}

fn handle_admin(key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    match (key.code, key.modifiers) {
        (Char('r'), KeyModifiers::NONE) => Some(Action::AdminRefresh),
        (Tab, _) => Some(Action::AdminTogglePane),
        (Char('j'), KeyModifiers::NONE) | (Down, _) => Some(Action::AdminSelectNext),
        (Char('k'), KeyModifiers::NONE) | (Up, _) => Some(Action::AdminSelectPrev),

        // Filter
        (Char('/'), KeyModifiers::NONE) => Some(Action::EditField(InputField::Filter)),
        (Esc, _) => Some(Action::ClearFilter),

        // Row and tile commands
        (Char('X'), KeyModifiers::SHIFT) => Some(Action::TerminateSelected),
        (Char('u'), KeyModifiers::NONE) => Some(Action::ResetSelected),
        (Char('e'), KeyModifiers::NONE) => Some(Action::EditField(InputField::Limit)),
        (Char('d'), KeyModifiers::NONE) => Some(Action::ClearSelectedCache),

        _ => None,
    }
}

fn handle_editing_mode(key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    match (key.code, key.modifiers) {
        // Basic editing
        (Esc, _) => Some(Action::CancelEdit),
        (Enter, KeyModifiers::ALT) => Some(Action::TypeChar('\n')),
        (Enter, _) => Some(Action::ConfirmEdit),
        (Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => Some(Action::TypeChar(c)),

        // Deletion
        (Backspace, KeyModifiers::NONE) => Some(Action::Backspace),
        (Backspace, KeyModifiers::CONTROL) | (Backspace, KeyModifiers::ALT) => {
            Some(Action::DeleteWordBackward)
        }
        (Char('w'), KeyModifiers::CONTROL) => Some(Action::DeleteWordBackward),
        (Delete, KeyModifiers::NONE) => Some(Action::Delete),
        (Char('k'), KeyModifiers::CONTROL) => Some(Action::DeleteToEnd),
        (Char('u'), KeyModifiers::CONTROL) => Some(Action::DeleteToStart),

        // Movement
        (Left, KeyModifiers::NONE) => Some(Action::MoveCursorLeft),
        (Right, KeyModifiers::NONE) => Some(Action::MoveCursorRight),
        (Left, KeyModifiers::CONTROL) | (Left, KeyModifiers::ALT) => {
            Some(Action::MoveCursorWordLeft)
        }
        (Right, KeyModifiers::CONTROL) | (Right, KeyModifiers::ALT) => {
            Some(Action::MoveCursorWordRight)
        }
        (Char('b'), KeyModifiers::ALT) => Some(Action::MoveCursorWordLeft),
        (Char('f'), KeyModifiers::ALT) => Some(Action::MoveCursorWordRight),
        (Home, _) | (Char('a'), KeyModifiers::CONTROL) => Some(Action::MoveCursorHome),
        (End, _) | (Char('e'), KeyModifiers::CONTROL) => Some(Action::MoveCursorEnd),

        // Clipboard
        (Char('v'), KeyModifiers::CONTROL) => Some(Action::PasteAtCursor),

        _ => None,
    }
}

fn handle_help_mode(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseHelp),
        _ => None,
    }
}
