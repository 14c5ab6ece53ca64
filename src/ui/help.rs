use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct HelpSection {
    pub title: &'static str,
    pub items: &'static [(&'static str, &'static str)],
}

pub const SECTIONS: &[HelpSection] = &[
    HelpSection {
        title: "Global:",
        items: &[
            ("1/2  ", "Generator / Admin"),
            ("L    ", "Log in (copies the login URL)"),
            ("R    ", "Refresh session"),
            ("O    ", "Log out"),
            ("?    ", "Help"),
            ("q    ", "Quit"),
        ],
    },
    HelpSection {
        title: "Generator:",
        items: &[
            ("⇥    ", "Cycle focus: form, diagram, images"),
            ("t/x  ", "Edit topic / text"),
            ("m    ", "Cycle mind map type"),
            ("⏎    ", "Generate"),
            ("Esc  ", "Dismiss limit banner"),
        ],
    },
    HelpSection {
        title: "Diagram:",
        items: &[
            ("hjkl ", "Select node"),
            ("⇧+←→ ", "Pan"),
            ("+/-  ", "Zoom"),
            ("0    ", "Reset view"),
            ("␣/b  ", "Toggle branch / expand all"),
            ("e/E  ", "Export source / pages"),
            ("y    ", "Copy source"),
        ],
    },
    HelpSection {
        title: "Images:",
        items: &[
            ("h/l  ", "Select image"),
            ("⏎    ", "Open / close lightbox"),
            ("+/-  ", "Lightbox zoom"),
            ("y    ", "Copy image URL"),
        ],
    },
    HelpSection {
        title: "Admin:",
        items: &[
            ("r    ", "Refresh"),
            ("⇥    ", "Sessions / cache"),
            ("/    ", "Search (Esc clears)"),
            ("X    ", "Terminate session"),
            ("u    ", "Reset usage"),
            ("e    ", "Set daily limit"),
            ("d    ", "Clear cache entry"),
        ],
    },
];

pub struct HelpRenderer;

impl HelpRenderer {
    pub fn render(frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(" Help ");
        let paragraph = Paragraph::new(Self::build_help_text())
            .block(block)
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, area);
    }

    fn build_help_text() -> Vec<Line<'static>> {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let mut lines = vec![Line::from(Span::styled("Mind Map AI Help", bold)), Line::from("")];

        for section in SECTIONS {
            lines.push(Line::from(Span::styled(section.title, bold)));
            for (key, desc) in section.items {
                lines.push(Line::from(format!("  {key} {desc}")));
            }
            lines.push(Line::from(""));
        }

        lines.push(Line::from("Press ESC or q to close help"));
        lines
    }
}
