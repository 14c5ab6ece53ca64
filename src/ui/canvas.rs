use crate::ui::constants::{CharBuffer, StyleBuffer};
use ratatui::{
    style::Style,
    text::{Line, Span},
};

// Buffer canvas for drawing characters and styles
pub struct BufferCanvas {
    pub char_buffer: CharBuffer,
    pub style_buffer: StyleBuffer,
    pub width: usize,
    pub height: usize,
}

impl BufferCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            char_buffer: vec![vec![' '; width]; height],
            style_buffer: vec![vec![Style::default(); width]; height],
            width,
            height,
        }
    }

    pub fn set_char(&mut self, x: usize, y: usize, ch: char) {
        if self.in_bounds(x, y) {
            self.char_buffer[y][x] = ch;
        }
    }

    pub fn get_char(&self, x: usize, y: usize) -> Option<char> {
        self.char_buffer.get(y).and_then(|row| row.get(x)).copied()
    }

    pub fn draw_text(&mut self, x: usize, y: usize, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            self.set_char(x + i, y, ch);
        }
    }

    pub fn draw_styled_text(&mut self, x: usize, y: usize, text: &str, style: Style) {
        for (i, ch) in text.chars().enumerate() {
            if self.in_bounds(x + i, y) {
                self.char_buffer[y][x + i] = ch;
                self.style_buffer[y][x + i] = style;
            }
        }
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        y < self.height && x < self.width
    }

    pub fn to_lines(&self) -> Vec<Line<'_>> {
        let mut lines = Vec::new();

        for (y, row) in self.char_buffer.iter().enumerate() {
            let mut spans = Vec::new();
            let mut current_style = Style::default();
            let mut current_text = String::new();

            for (x, &ch) in row.iter().enumerate() {
                let style = self.style_buffer[y][x];
                if style != current_style {
                    if !current_text.is_empty() {
                        spans.push(Span::styled(current_text.clone(), current_style));
                        current_text.clear();
                    }
                    current_style = style;
                }
                current_text.push(ch);
            }

            if !current_text.is_empty() {
                spans.push(Span::styled(current_text, current_style));
            }

            lines.push(Line::from(spans));
        }

        lines
    }

    /// Plain-text rows with trailing blanks trimmed.
    pub fn to_plain_rows(&self) -> Vec<String> {
        self.char_buffer
            .iter()
            .map(|row| row.iter().collect::<String>().trim_end().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_canvas() {
        let mut canvas = BufferCanvas::new(20, 5);

        canvas.set_char(5, 2, 'X');
        assert_eq!(canvas.get_char(5, 2), Some('X'));

        canvas.draw_text(0, 0, "Hello");
        assert_eq!(&canvas.char_buffer[0][0..5], ['H', 'e', 'l', 'l', 'o']);

        // Out of bounds writes are dropped
        canvas.set_char(25, 2, 'Y');
        canvas.set_char(5, 10, 'Z');
        assert_eq!(canvas.get_char(25, 2), None);

        assert!(canvas.in_bounds(5, 2));
        assert!(!canvas.in_bounds(20, 2));
        assert!(!canvas.in_bounds(5, 5));
    }

    #[test]
    fn test_plain_rows_trim_trailing_space() {
        let mut canvas = BufferCanvas::new(10, 2);
        canvas.draw_text(2, 1, "hi");
        assert_eq!(canvas.to_plain_rows(), ["", "  hi"]);
    }
}
