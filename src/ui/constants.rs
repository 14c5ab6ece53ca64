use ratatui::style::Style;

// Type aliases for clarity
pub type CharBuffer = Vec<Vec<char>>;
pub type StyleBuffer = Vec<Vec<Style>>;

// Constants for rendering
pub const CURSOR_INDICATOR: char = '▌';
pub const NODE_MIDDLE_Y_OFFSET: f64 = 0.6;
pub const VERTICAL_CONNECTOR_OFFSET: f64 = 1.0;
pub const MIDDLE_CONNECTOR_Y_OFFSET: f64 = 0.2;
pub const STATUS_EDIT_PREFIX: &str = "Edit: ";
pub const SPINNER_FRAMES: [char; 4] = ['|', '/', '-', '\\'];

// Connection line constants
pub mod connections {
    pub const SINGLE: &str = "─────";
    pub const MULTI: &str = "────";
    pub const COLLAPSED: &str = " [+]";
}

// Junction characters
pub mod junction {
    pub const VERTICAL: char = '│';
    pub const TOP_CORNER: char = '╭';
    pub const BOTTOM_CORNER: char = '╰';
    pub const TOP_RIGHT: char = '╮';
    pub const BOTTOM_RIGHT: char = '╯';
    pub const MIDDLE_RIGHT: char = '┤';
    pub const CROSS: char = '┼';
    pub const TOP_TEE: char = '┬';
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::NODE_CONNECTION_SPACING;

    #[test]
    fn test_connection_line_constants() {
        assert_eq!(connections::SINGLE.chars().filter(|&c| c == '─').count(), 5);
        assert_eq!(connections::MULTI.chars().filter(|&c| c == '─').count(), 4);
        assert!(!connections::SINGLE.contains(' '));
        assert!(!connections::MULTI.contains(' '));
    }

    #[test]
    fn test_connection_total_length() {
        // One blank cell after the parent, then the connector.
        let expected = NODE_CONNECTION_SPACING as usize - 1;
        assert_eq!(connections::SINGLE.chars().count(), expected);
    }
}
