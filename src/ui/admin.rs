use super::{editing_buffer, spinner};
use crate::admin::AdminPane;
use crate::app::{AppState, InputField};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

pub const ACCESS_DENIED: &str = "Access Denied";

fn muted() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn error_style() -> Style {
    Style::default().fg(Color::Red)
}

// Admin route: stats, filter, sessions table and cache tiles
pub struct AdminRenderer;

impl AdminRenderer {
    pub fn render(frame: &mut Frame, app: &AppState, area: Rect) {
        if app.session.is_pending() {
            let text = format!("{} Checking access...", spinner(app.tick));
            frame.render_widget(Paragraph::new(text).style(muted()), area);
            return;
        }
        if !app.session.can_access_admin() {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                ACCESS_DENIED,
                error_style().add_modifier(Modifier::BOLD),
            )))
            .alignment(ratatui::layout::Alignment::Center);
            frame.render_widget(paragraph, area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(8),
            ])
            .split(area);

        Self::render_summary(frame, app, chunks[0]);
        Self::render_filter(frame, app, chunks[1]);
        Self::render_sessions(frame, app, chunks[2]);
        Self::render_cache(frame, app, chunks[3]);
    }

    fn render_summary(frame: &mut Frame, app: &AppState, area: Rect) {
        let admin = &app.admin;
        let (online, offline) = admin.status_counts();

        let mut first = vec![
            Span::styled("Admin Dashboard  ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(
                "Active Users: {}  ({online} online / {offline} offline)",
                admin.filtered_sessions().len()
            )),
        ];
        if let Some(stats) = admin.stats() {
            first.push(Span::styled(
                format!(
                    "   total users {}  online {}  mind maps {}",
                    stats.total_users, stats.online_users, stats.total_mind_maps
                ),
                muted(),
            ));
        }

        let second = match &admin.stats_error {
            Some(err) => Line::from(Span::styled(err.clone(), error_style())),
            None => Line::from(Span::styled(
                "r refresh  Tab switch pane  / search  X terminate  u reset  e set limit  d clear cache",
                muted(),
            )),
        };

        frame.render_widget(Paragraph::new(vec![Line::from(first), second]), area);
    }

    fn render_filter(frame: &mut Frame, app: &AppState, area: Rect) {
        let line = match editing_buffer(app, InputField::Filter) {
            Some(buffer) => Line::from(vec![
                Span::raw("Search: "),
                Span::styled(buffer, Style::default().fg(Color::Black).bg(Color::Cyan)),
            ]),
            None if app.admin.filter().is_empty() => {
                Line::from(Span::styled("Search by email, name, or IP... (/)", muted()))
            }
            None => Line::from(format!("Search: {}", app.admin.filter())),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_sessions(frame: &mut Frame, app: &AppState, area: Rect) {
        let admin = &app.admin;
        let focused = admin.pane == AdminPane::Sessions;
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(super::panel_style(focused))
            .title(" Sessions ");
        if let Some(err) = &admin.sessions_error {
            block = block.title_bottom(Span::styled(format!(" {err} "), error_style()));
        }

        if admin.sessions_loading {
            frame.render_widget(Paragraph::new("Loading sessions...").style(muted()).block(block), area);
            return;
        }
        let sessions = admin.filtered_sessions();
        if sessions.is_empty() {
            frame.render_widget(
                Paragraph::new("No matching sessions found.").style(muted()).block(block),
                area,
            );
            return;
        }

        let header = Row::new(["Email", "Name", "IP", "Login", "Usage", "Status", "Actions"])
            .style(Style::default().add_modifier(Modifier::BOLD));

        let editing_limit = editing_buffer(app, InputField::Limit);
        let rows: Vec<Row> = sessions
            .iter()
            .map(|session| {
                let usage = match &editing_limit {
                    Some(buffer) if admin.limit_target() == Some(session.email.as_str()) => {
                        format!("{}/{buffer}", session.mind_maps_used)
                    }
                    _ if admin.is_setting_limit(&session.email) => "Saving...".to_string(),
                    _ => format!("{}/{}", session.mind_maps_used, session.mind_map_limit),
                };
                let status_style = if session.is_online() {
                    Style::default().fg(Color::Green)
                } else {
                    muted()
                };
                let terminate = if admin.is_terminating(&session.email) {
                    "Terminating..."
                } else {
                    "Terminate"
                };
                let reset = if admin.is_resetting(&session.email) {
                    "Resetting..."
                } else {
                    "Reset"
                };

                let row = Row::new(vec![
                    Cell::from(session.email.clone()),
                    Cell::from(session.name.clone()),
                    Cell::from(session.ip.clone()),
                    Cell::from(session.login_time.clone()),
                    Cell::from(usage),
                    Cell::from(Span::styled(
                        format!("● {}", session.status.as_str()),
                        status_style,
                    )),
                    Cell::from(format!("{terminate} | {reset}")),
                ]);
                if session.limit_reached() {
                    row.style(Style::default().fg(Color::Red))
                } else {
                    row
                }
            })
            .collect();

        let widths = [
            Constraint::Min(20),
            Constraint::Length(14),
            Constraint::Length(15),
            Constraint::Length(19),
            Constraint::Length(9),
            Constraint::Length(10),
            Constraint::Length(28),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(if focused {
                Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            });

        let mut state = TableState::default().with_selected(Some(admin.selected_row));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_cache(frame: &mut Frame, app: &AppState, area: Rect) {
        let admin = &app.admin;
        let focused = admin.pane == AdminPane::Cache;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(super::panel_style(focused))
            .title(format!(" Cached Mind Maps ({}) ", admin.cache().len()));

        let mut lines = Vec::new();
        if let Some(err) = &admin.cache_error {
            lines.push(Line::from(Span::styled(err.clone(), error_style())));
        }

        let tiles: Vec<Span> = admin
            .cache()
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let action = if admin.is_clearing(entry) { "Clearing..." } else { "Clear" };
                let text = format!(" {} ({}) [{action}] ", entry.topic, entry.map_type);
                if focused && i == admin.selected_tile {
                    Span::styled(text, Style::default().fg(Color::Black).bg(Color::Yellow))
                } else {
                    Span::raw(text)
                }
            })
            .collect();

        if !tiles.is_empty() {
            lines.push(Line::from(tiles));
        } else if !admin.cache_loading {
            lines.push(Line::from(Span::styled("No cached maps.", muted())));
        }
        if admin.cache_loading {
            lines.push(Line::from(Span::styled("Loading cache...", muted())));
        }

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}
