use super::{editing_buffer, panel_style, spinner};
use crate::api::MapMode;
use crate::app::{AppState, Focus, InputField};
use crate::flow::FlowState;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub const LOGIN_CARD_TITLE: &str = "Log in to Generate Mind Maps";
pub const LIMIT_BANNER: &str = "Limit Reached: You've hit your daily free mind map limit. \
     Please try again tomorrow or contact support for more access.";

fn muted() -> Style {
    Style::default().fg(Color::DarkGray)
}

// Form panel of the generator route
pub struct GeneratorRenderer;

impl GeneratorRenderer {
    pub fn render(frame: &mut Frame, app: &AppState, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(panel_style(app.focus == Focus::Form))
            .title(" Create Mind Map ");

        let lines = if app.session.is_logged_in() {
            Self::form_lines(app)
        } else if app.session.is_pending() {
            vec![Line::from(format!("{} Checking session...", spinner(app.tick)))]
        } else {
            Self::login_card()
        };

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn login_card() -> Vec<Line<'static>> {
        vec![
            Line::from(Span::styled(
                LOGIN_CARD_TITLE,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("You need to log in to start generating professional mind maps."),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    " L ",
                    Style::default().fg(Color::White).bg(Color::Blue),
                ),
                Span::raw(" Sign in with Google"),
            ]),
            Line::from(Span::styled(
                "then R to refresh the session",
                muted(),
            )),
        ]
    }

    fn form_lines(app: &AppState) -> Vec<Line<'static>> {
        let form = &app.flow.form;
        let label_style = Style::default().add_modifier(Modifier::BOLD);
        let mut lines = Vec::new();

        // Mode selector
        lines.push(Line::from(Span::styled("Mind Map Type (m)", label_style)));
        for mode in MapMode::ALL {
            let marker = if mode == form.mode { "(•)" } else { "( )" };
            lines.push(Line::from(format!(" {marker} {}", mode.label())));
        }
        lines.push(Line::from(Span::styled(
            form.mode.description(),
            muted(),
        )));
        lines.push(Line::from(""));

        // Topic
        lines.push(Line::from(Span::styled("Topic (t)", label_style)));
        lines.push(Self::field_line(
            app,
            InputField::Topic,
            &form.topic,
            "e.g. Solar System",
        ));

        if form.mode == MapMode::Text {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("Text (x, Alt+Enter for newline)", label_style)));
            let text = editing_buffer(app, InputField::Text).unwrap_or_else(|| form.text.clone());
            if text.is_empty() {
                lines.push(Line::from(Span::styled(
                    " Paste or type the text to analyze",
                    muted(),
                )));
            } else {
                lines.extend(text.lines().map(|l| Line::from(format!(" {l}"))));
            }
        }

        lines.push(Line::from(""));
        lines.push(Self::submit_line(app));

        match app.flow.state() {
            FlowState::RateLimited => {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    LIMIT_BANNER,
                    Style::default().fg(Color::Black).bg(Color::Yellow),
                )));
                lines.push(Line::from(Span::styled("Esc to dismiss", muted())));
            }
            FlowState::Failed(message) => {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    message.clone(),
                    Style::default().fg(Color::Red),
                )));
            }
            _ => {}
        }

        if let Some(limit) = app.session.current().and_then(|s| s.daily_limit) {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("Daily limit: {limit} mind maps"),
                muted(),
            )));
        }

        lines
    }

    fn field_line(app: &AppState, field: InputField, value: &str, placeholder: &str) -> Line<'static> {
        if let Some(buffer) = editing_buffer(app, field) {
            return Line::from(Span::styled(
                format!(" {buffer}"),
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ));
        }
        if value.is_empty() {
            Line::from(Span::styled(format!(" {placeholder}"), muted()))
        } else {
            Line::from(format!(" {value}"))
        }
    }

    fn submit_line(app: &AppState) -> Line<'static> {
        if app.flow.is_busy() {
            Line::from(Span::styled(
                format!(" {} Generating... ", spinner(app.tick)),
                Style::default().fg(Color::White).bg(Color::DarkGray),
            ))
        } else {
            Line::from(Span::styled(
                " Enter  Generate Mind Map ",
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            ))
        }
    }
}
