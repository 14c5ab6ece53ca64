use super::clipboard::read_clipboard;
use super::Action;
use crate::app::{AppMode, AppState, InputField};
use crate::dispatch::Effect;

// The cursor counts characters, not bytes.
pub fn char_to_byte_index(buffer: &str, char_pos: usize) -> usize {
    buffer
        .char_indices()
        .nth(char_pos)
        .map_or(buffer.len(), |(i, _)| i)
}

fn char_len(buffer: &str) -> usize {
    buffer.chars().count()
}

fn char_at(buffer: &str, char_pos: usize) -> Option<char> {
    buffer.chars().nth(char_pos)
}

pub fn start_editing(app: &mut AppState, field: InputField) {
    let buffer = match field {
        InputField::Topic => app.flow.form.topic.clone(),
        InputField::Text => app.flow.form.text.clone(),
        InputField::Filter => app.admin.filter().to_string(),
        InputField::Limit => {
            let Some((email, limit)) = app
                .admin
                .selected_session()
                .map(|s| (s.email.clone(), s.mind_map_limit))
            else {
                return;
            };
            // The row is pinned now; the selection may shift under a refresh
            app.admin.set_limit_target(Some(email));
            limit.to_string()
        }
    };
    let cursor_pos = char_len(&buffer);

    app.mode = AppMode::Editing {
        field,
        buffer,
        cursor_pos,
    };
}

/// Runs a buffer-editing action against the active input.
pub fn apply(app: &mut AppState, action: Action) {
    match action {
        Action::TypeChar(c) => type_char(app, c),
        Action::Backspace => backspace(app),
        Action::Delete => delete_char(app),
        Action::MoveCursorLeft => move_cursor_left(app),
        Action::MoveCursorRight => move_cursor_right(app),
        Action::MoveCursorHome => move_cursor_home(app),
        Action::MoveCursorEnd => move_cursor_end(app),
        Action::MoveCursorWordLeft => move_cursor_word_left(app),
        Action::MoveCursorWordRight => move_cursor_word_right(app),
        Action::DeleteWordBackward => delete_word_backward(app),
        Action::DeleteToEnd => delete_to_end(app),
        Action::DeleteToStart => delete_to_start(app),
        Action::PasteAtCursor => paste_at_cursor(app),
        Action::CancelEdit => cancel_edit(app),
        _ => return,
    }
    sync_live_filter(app);
}

// The session filter narrows the table while typing.
fn sync_live_filter(app: &mut AppState) {
    if let AppMode::Editing {
        field: InputField::Filter,
        buffer,
        ..
    } = &app.mode
    {
        let filter = buffer.clone();
        app.admin.set_filter(filter);
    }
}

pub fn type_char(app: &mut AppState, c: char) {
    if let AppMode::Editing {
        field,
        buffer,
        cursor_pos,
    } = &mut app.mode
    {
        if *field == InputField::Limit && !c.is_ascii_digit() {
            return;
        }
        if c == '\n' && *field != InputField::Text {
            return;
        }
        let at = char_to_byte_index(buffer, *cursor_pos);
        buffer.insert(at, c);
        *cursor_pos += 1;
    }
}

pub fn backspace(app: &mut AppState) {
    if let AppMode::Editing {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        if *cursor_pos > 0 {
            *cursor_pos -= 1;
            let at = char_to_byte_index(buffer, *cursor_pos);
            buffer.remove(at);
        }
    }
}

pub fn delete_char(app: &mut AppState) {
    if let AppMode::Editing {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        if *cursor_pos < char_len(buffer) {
            let at = char_to_byte_index(buffer, *cursor_pos);
            buffer.remove(at);
        }
    }
}

pub fn move_cursor_left(app: &mut AppState) {
    if let AppMode::Editing { cursor_pos, .. } = &mut app.mode {
        *cursor_pos = cursor_pos.saturating_sub(1);
    }
}

pub fn move_cursor_right(app: &mut AppState) {
    if let AppMode::Editing {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        if *cursor_pos < char_len(buffer) {
            *cursor_pos += 1;
        }
    }
}

pub fn move_cursor_home(app: &mut AppState) {
    if let AppMode::Editing { cursor_pos, .. } = &mut app.mode {
        *cursor_pos = 0;
    }
}

pub fn move_cursor_end(app: &mut AppState) {
    if let AppMode::Editing {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        *cursor_pos = char_len(buffer);
    }
}

fn word_start_before(buffer: &str, mut pos: usize) -> usize {
    while pos > 0 && char_at(buffer, pos - 1) == Some(' ') {
        pos -= 1;
    }
    while pos > 0 && char_at(buffer, pos - 1) != Some(' ') {
        pos -= 1;
    }
    pos
}

pub fn move_cursor_word_left(app: &mut AppState) {
    if let AppMode::Editing {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        *cursor_pos = word_start_before(buffer, *cursor_pos);
    }
}

pub fn move_cursor_word_right(app: &mut AppState) {
    if let AppMode::Editing {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        let len = char_len(buffer);

        while *cursor_pos < len && char_at(buffer, *cursor_pos) != Some(' ') {
            *cursor_pos += 1;
        }
        while *cursor_pos < len && char_at(buffer, *cursor_pos) == Some(' ') {
            *cursor_pos += 1;
        }
    }
}

pub fn delete_word_backward(app: &mut AppState) {
    if let AppMode::Editing {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        let start = word_start_before(buffer, *cursor_pos);
        let range = char_to_byte_index(buffer, start)..char_to_byte_index(buffer, *cursor_pos);
        buffer.replace_range(range, "");
        *cursor_pos = start;
    }
}

pub fn delete_to_end(app: &mut AppState) {
    if let AppMode::Editing {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        let at = char_to_byte_index(buffer, *cursor_pos);
        buffer.truncate(at);
    }
}

pub fn delete_to_start(app: &mut AppState) {
    if let AppMode::Editing {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        let at = char_to_byte_index(buffer, *cursor_pos);
        buffer.replace_range(..at, "");
        *cursor_pos = 0;
    }
}

pub fn paste_at_cursor(app: &mut AppState) {
    let Some(content) = read_clipboard(app) else {
        return;
    };

    if let AppMode::Editing {
        field,
        buffer,
        cursor_pos,
    } = &mut app.mode
    {
        // The text field is the only multi-line input
        let cleaned = if *field == InputField::Text {
            content.replace('\r', "")
        } else {
            content
                .replace('\n', " ")
                .replace('\r', "")
                .replace('\t', "  ")
        };
        let cleaned: String = if *field == InputField::Limit {
            cleaned.chars().filter(|c| c.is_ascii_digit()).collect()
        } else {
            cleaned
        };

        let at = char_to_byte_index(buffer, *cursor_pos);
        buffer.insert_str(at, &cleaned);
        *cursor_pos += char_len(&cleaned);
    }
}

/// Writes the buffer back to its field. A confirmed limit goes straight to
/// the backend.
pub fn confirm_edit(app: &mut AppState) -> Vec<Effect> {
    let AppMode::Editing { field, buffer, .. } = std::mem::replace(&mut app.mode, AppMode::Normal)
    else {
        return Vec::new();
    };

    match field {
        InputField::Topic => {
            app.flow.form.topic = buffer;
            app.flow.mark_edited();
            Vec::new()
        }
        InputField::Text => {
            app.flow.form.text = buffer;
            app.flow.mark_edited();
            Vec::new()
        }
        InputField::Filter => {
            app.admin.set_filter(buffer);
            Vec::new()
        }
        InputField::Limit => match app.admin.take_limit_target() {
            Some(email) => super::admin::submit_limit(app, email, &buffer),
            None => Vec::new(),
        },
    }
}

// A live filter keeps whatever was typed before cancelling.
pub fn cancel_edit(app: &mut AppState) {
    app.mode = AppMode::Normal;
    app.admin.set_limit_target(None);
}
