use crate::app::{AppMode, AppState, Route};
use crate::ui::constants::STATUS_EDIT_PREFIX;
use crate::ui::with_cursor;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Paragraph,
    Frame,
};

// Status line renderer
pub struct StatusLineRenderer;

impl StatusLineRenderer {
    pub fn render(frame: &mut Frame, app: &AppState, area: Rect) {
        let (content, style) = Self::get_content_and_style(app, area);
        frame.render_widget(Paragraph::new(content).style(style), area);
    }

    fn get_content_and_style(app: &AppState, area: Rect) -> (String, Style) {
        match &app.mode {
            AppMode::Normal => Self::render_normal_mode(app),
            AppMode::Editing {
                field,
                buffer,
                cursor_pos,
            } => Self::render_edit_mode(field.label(), buffer, *cursor_pos, area.width),
            AppMode::Help => Self::render_help_mode(),
        }
    }

    fn render_normal_mode(app: &AppState) -> (String, Style) {
        if let Some(msg) = &app.message {
            let style = Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD);
            return (msg.clone(), style);
        }

        let content = match app.route {
            Route::Generator => format!(
                "{} | {} | ? for help",
                app.flow.form.mode.label(),
                match app.diagram.diagram() {
                    Some(diagram) => format!("{} nodes", diagram.node_count()),
                    None => "no diagram".to_string(),
                }
            ),
            Route::Admin => "admin | ? for help".to_string(),
        };
        (content, Style::default().fg(Color::Gray).bg(Color::Black))
    }

    fn render_edit_mode(label: &str, buffer: &str, cursor_pos: usize, width: u16) -> (String, Style) {
        let prefix = format!("{STATUS_EDIT_PREFIX}{label}: ");
        let available_width = (width as usize).saturating_sub(prefix.chars().count() + 1);

        // Keep the cursor in view on long single-line input
        let flat: String = buffer.replace('\n', "⏎");
        let start = cursor_pos.saturating_sub(available_width.saturating_sub(1));
        let visible: String = flat.chars().skip(start).take(available_width).collect();

        let mut display = prefix;
        display.push_str(&with_cursor(&visible, cursor_pos - start));

        let style = Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        (display, style)
    }

    fn render_help_mode() -> (String, Style) {
        let style = Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        (String::from("Press ESC or q to close help"), style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_mode_shows_cursor() {
        let (content, _) = StatusLineRenderer::render_edit_mode("Topic", "Cats", 2, 80);
        assert_eq!(content, "Edit: Topic: Ca▌ts");
    }

    #[test]
    fn test_edit_mode_scrolls_long_input() {
        let buffer = "x".repeat(100);
        let (content, _) = StatusLineRenderer::render_edit_mode("Topic", &buffer, 100, 30);
        assert!(content.ends_with('▌'));
        assert!(content.chars().count() <= 30);
    }
}
