use super::canvas::BufferCanvas;
use super::{panel_style, spinner};
use crate::app::{AppState, Focus};
use crate::diagram::{DiagramPainter, RenderStatus};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub const EMPTY_TITLE: &str = "No Mind Map Generated Yet";
pub const EMPTY_HINT: &str = "Enter a topic and press Enter to create your mind map.";

// Diagram panel: empty, loading, failed or the drawn map
pub struct DiagramRenderer;

impl DiagramRenderer {
    pub fn render(frame: &mut Frame, app: &mut AppState, area: Rect) {
        let title = if app.diagram.diagram().is_some() {
            format!(" Generated Mind Map  {:.0}% ", app.diagram.zoom() * 100.0)
        } else {
            " Mind Map ".to_string()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(panel_style(app.focus == Focus::Diagram))
            .title(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        // Pan, zoom and export all work against the visible container
        app.diagram.set_viewport_size(inner.width, inner.height);

        if app.diagram_loading() {
            let text = format!("{} Generating mind map...", spinner(app.tick));
            Self::render_centered(frame, inner, vec![Line::from(text)]);
            return;
        }

        match app.diagram.status() {
            RenderStatus::Failed(message) => {
                let lines = vec![
                    Line::from(Span::styled(
                        "Error",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(message.clone(), Style::default().fg(Color::Red))),
                ];
                Self::render_centered(frame, inner, lines);
            }
            RenderStatus::Rendered => Self::render_map(frame, app, inner),
            RenderStatus::Empty | RenderStatus::Rendering => {
                let lines = vec![
                    Line::from(Span::styled(
                        EMPTY_TITLE,
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(EMPTY_HINT, Style::default().fg(Color::DarkGray))),
                ];
                Self::render_centered(frame, inner, lines);
            }
        }
    }

    fn render_map(frame: &mut Frame, app: &AppState, area: Rect) {
        let (Some(diagram), Some(layout)) = (app.diagram.diagram(), app.diagram.layout()) else {
            return;
        };

        let mut canvas = BufferCanvas::new(area.width as usize, area.height as usize);
        DiagramPainter::new(
            diagram,
            &layout,
            (app.diagram.viewport_left, app.diagram.viewport_top),
        )
        .with_active(app.diagram.active)
        .paint(&mut canvas);

        frame.render_widget(Paragraph::new(canvas.to_lines()), area);
    }

    fn render_centered(frame: &mut Frame, area: Rect, lines: Vec<Line<'_>>) {
        let top = area.height.saturating_sub(lines.len() as u16) / 2;
        let area = Rect {
            y: area.y + top,
            height: area.height.saturating_sub(top),
            ..area
        };
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}
