use super::panel_style;
use crate::app::{AppState, Focus};
use crate::gallery::{EMPTY_MESSAGE, PLACEHOLDER_TILES};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const TILE_WIDTH: u16 = 18;

// Image size in the lightbox at 1x, in cells
const LIGHTBOX_BASE_WIDTH: f64 = 32.0;
const LIGHTBOX_BASE_HEIGHT: f64 = 8.0;

// Related images strip and its lightbox
pub struct GalleryRenderer;

impl GalleryRenderer {
    pub fn render(frame: &mut Frame, app: &AppState, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(panel_style(app.focus == Focus::Gallery))
            .title(" Related Images ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if app.gallery.is_loading() {
            Self::render_placeholders(frame, inner);
        } else if app.gallery.images().is_empty() {
            let paragraph =
                Paragraph::new(EMPTY_MESSAGE).style(Style::default().fg(Color::DarkGray));
            frame.render_widget(paragraph, inner);
        } else {
            Self::render_tiles(frame, app, inner);
        }
    }

    fn tile_areas(area: Rect, count: usize) -> Vec<Rect> {
        let fit = (area.width / TILE_WIDTH).max(1) as usize;
        let constraints = vec![Constraint::Length(TILE_WIDTH); count.min(fit)];
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area)
            .to_vec()
    }

    fn render_placeholders(frame: &mut Frame, area: Rect) {
        for tile in Self::tile_areas(area, PLACEHOLDER_TILES) {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray));
            let paragraph = Paragraph::new("░░░░░░░░░░░░")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(paragraph, tile);
        }
    }

    fn render_tiles(frame: &mut Frame, app: &AppState, area: Rect) {
        let images = app.gallery.images();
        let tiles = Self::tile_areas(area, images.len());

        // Scroll so the selected tile stays visible
        let first = app.gallery.selected.saturating_sub(tiles.len().saturating_sub(1));

        for (tile, (index, image)) in tiles.iter().zip(images.iter().enumerate().skip(first)) {
            let selected = index == app.gallery.selected;
            let border = if selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(format!(" {} ", index + 1));
            let paragraph = Paragraph::new(image.alt_text.as_str())
                .block(block)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, *tile);
        }
    }

    /// Drawn over `area` while an image is open.
    pub fn render_lightbox(frame: &mut Frame, app: &AppState, area: Rect) {
        let (Some(lightbox), Some(image)) = (app.gallery.lightbox(), app.gallery.lightbox_image())
        else {
            return;
        };

        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(
                " {} ({}/{}) ",
                image.alt_text,
                lightbox.index + 1,
                app.gallery.images().len()
            ))
            .title_bottom(format!(" {}%  +/- zoom  h/l prev/next  y copy URL  Esc close ", lightbox.zoom_percent()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(inner);

        let url = Paragraph::new(Line::from(Span::styled(
            image.url.as_str(),
            Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
        )));
        frame.render_widget(url, rows[0]);

        // The image itself cannot be drawn; its frame scales with the zoom
        let width = ((LIGHTBOX_BASE_WIDTH * lightbox.zoom()).round() as u16).min(rows[1].width);
        let height = ((LIGHTBOX_BASE_HEIGHT * lightbox.zoom()).round() as u16).min(rows[1].height);
        let picture = Rect {
            x: rows[1].x + (rows[1].width - width) / 2,
            y: rows[1].y + (rows[1].height - height) / 2,
            width,
            height,
        };
        let frame_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));
        let caption = Paragraph::new(image.alt_text.as_str())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(frame_block);
        frame.render_widget(caption, picture);
    }
}
