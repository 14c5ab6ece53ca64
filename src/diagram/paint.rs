use super::layout::{LayoutEngine, LayoutNode};
use super::model::Diagram;
use crate::ui::canvas::BufferCanvas;
use crate::ui::constants::{
    connections, junction, MIDDLE_CONNECTOR_Y_OFFSET, NODE_MIDDLE_Y_OFFSET,
    VERTICAL_CONNECTOR_OFFSET,
};
use indextree::NodeId;
use ratatui::style::{Color, Modifier, Style};

/// Draws a laid-out diagram onto a canvas, offset by the viewport origin.
/// Shared by the terminal view and the paged export.
pub struct DiagramPainter<'a> {
    diagram: &'a Diagram,
    layout: &'a LayoutEngine,
    left: f64,
    top: f64,
    active: Option<NodeId>,
}

impl<'a> DiagramPainter<'a> {
    pub fn new(diagram: &'a Diagram, layout: &'a LayoutEngine, origin: (f64, f64)) -> Self {
        Self {
            diagram,
            layout,
            left: origin.0,
            top: origin.1,
            active: None,
        }
    }

    pub fn with_active(mut self, active: Option<NodeId>) -> Self {
        self.active = active;
        self
    }

    pub fn paint(&self, canvas: &mut BufferCanvas) {
        // Connections first, labels on top
        self.draw_node_connections(canvas, self.diagram.root);
        self.draw_node_content(canvas, self.diagram.root);
    }

    fn draw_node_content(&self, canvas: &mut BufferCanvas, node_id: NodeId) {
        let Some(node_layout) = self.layout.nodes.get(&node_id) else {
            return;
        };

        let x = self.viewport_x(node_layout.x);
        let y = self.viewport_y(node_layout.y + node_layout.yo);
        let style = self.node_style(node_id);

        for (i, line) in node_layout.lines.iter().enumerate() {
            let line_y = y + i as i32;
            if x >= 0 && line_y >= 0 {
                canvas.draw_styled_text(x as usize, line_y as usize, line, style);
            }
        }

        for child_id in self.diagram.visible_children(node_id) {
            self.draw_node_content(canvas, child_id);
        }
    }

    fn node_style(&self, node_id: NodeId) -> Style {
        if Some(node_id) == self.active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else if node_id == self.diagram.root {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    }

    fn draw_node_connections(&self, canvas: &mut BufferCanvas, node_id: NodeId) {
        let Some(node) = self.diagram.node(node_id) else {
            return;
        };
        let Some(node_layout) = self.layout.nodes.get(&node_id) else {
            return;
        };

        let has_children = !self.diagram.children(node_id).is_empty();
        let visible_children = self.diagram.visible_children(node_id);
        let node_middle_y = calculate_middle_y(node_layout);

        if node.is_collapsed && has_children {
            self.draw_collapsed_indicator(canvas, node_layout);
        } else if visible_children.len() == 1 {
            self.draw_single_child_connection(canvas, node_layout, node_middle_y, visible_children[0]);
        } else if visible_children.len() > 1 {
            self.draw_multi_child_connections(canvas, node_layout, node_middle_y, &visible_children);
        }

        for child_id in visible_children {
            self.draw_node_connections(canvas, child_id);
        }
    }

    fn viewport_x(&self, x: f64) -> i32 {
        (x - self.left) as i32
    }

    fn viewport_y(&self, y: f64) -> i32 {
        (y - self.top) as i32
    }

    fn put_text(canvas: &mut BufferCanvas, x: i32, y: i32, text: &str) {
        if x >= 0 && y >= 0 {
            canvas.draw_text(x as usize, y as usize, text);
        }
    }

    fn put_char(canvas: &mut BufferCanvas, x: i32, y: i32, ch: char) {
        if x >= 0 && y >= 0 {
            canvas.set_char(x as usize, y as usize, ch);
        }
    }

    fn draw_collapsed_indicator(&self, canvas: &mut BufferCanvas, node_layout: &LayoutNode) {
        let x = self.viewport_x(node_layout.x + node_layout.w);
        let y = self.viewport_y(node_layout.y + node_layout.yo);
        Self::put_text(canvas, x, y, connections::COLLAPSED);
    }

    fn draw_single_child_connection(
        &self,
        canvas: &mut BufferCanvas,
        node_layout: &LayoutNode,
        parent_middle_y: i32,
        child_id: NodeId,
    ) {
        let Some(child_layout) = self.layout.nodes.get(&child_id) else {
            return;
        };

        let child_middle_y = calculate_middle_y(child_layout);
        let x = self.viewport_x(node_layout.x + node_layout.w + 1.0);
        let y = self.viewport_y(parent_middle_y.min(child_middle_y) as f64);
        Self::put_text(canvas, x, y, connections::SINGLE);

        if parent_middle_y != child_middle_y {
            self.draw_vertical_connection(canvas, child_layout, parent_middle_y, child_middle_y);
        }
    }

    fn draw_multi_child_connections(
        &self,
        canvas: &mut BufferCanvas,
        node_layout: &LayoutNode,
        middle_y: i32,
        children: &[NodeId],
    ) {
        let (top_child, top_y, bottom_child, bottom_y) = self.find_extremes(children);

        let Some(top_child_layout) = self.layout.nodes.get(&top_child) else {
            return;
        };

        let x = self.viewport_x(node_layout.x + node_layout.w + 1.0);
        let py = self.viewport_y(middle_y as f64);
        Self::put_text(canvas, x, py, connections::MULTI);

        let vert_x = self.viewport_x(top_child_layout.x - VERTICAL_CONNECTOR_OFFSET);
        for y in top_y..bottom_y {
            Self::put_char(canvas, vert_x, self.viewport_y(y as f64), junction::VERTICAL);
        }

        self.draw_child_connectors(canvas, vert_x, children, top_child, bottom_child);
        Self::fix_junction(canvas, vert_x, py);
    }

    fn draw_vertical_connection(
        &self,
        canvas: &mut BufferCanvas,
        child_layout: &LayoutNode,
        y1: i32,
        y2: i32,
    ) {
        let vert_x = self.viewport_x(child_layout.x - VERTICAL_CONNECTOR_OFFSET);

        for y in y1.min(y2)..y1.max(y2) {
            Self::put_char(canvas, vert_x, self.viewport_y(y as f64), junction::VERTICAL);
        }

        let corner = if y2 > y1 {
            junction::BOTTOM_CORNER
        } else {
            junction::TOP_CORNER
        };
        Self::put_char(canvas, vert_x, self.viewport_y(y2 as f64), corner);

        let corner = if y2 > y1 {
            junction::TOP_RIGHT
        } else {
            junction::BOTTOM_RIGHT
        };
        Self::put_char(canvas, vert_x, self.viewport_y(y1.min(y2) as f64), corner);
    }

    fn draw_child_connectors(
        &self,
        canvas: &mut BufferCanvas,
        vert_x: i32,
        children: &[NodeId],
        top_child: NodeId,
        bottom_child: NodeId,
    ) {
        if let Some(top_layout) = self.layout.nodes.get(&top_child) {
            let y = self.viewport_y(top_layout.y + top_layout.yo);
            Self::put_text(canvas, vert_x, y, "╭──");
        }

        if let Some(bottom_layout) = self.layout.nodes.get(&bottom_child) {
            let y = self.viewport_y(bottom_layout.y + bottom_layout.yo);
            Self::put_text(canvas, vert_x, y, "╰──");
        }

        for &child_id in children {
            if child_id == top_child || child_id == bottom_child {
                continue;
            }
            if let Some(child_layout) = self.layout.nodes.get(&child_id) {
                let cy = (child_layout.y + child_layout.yo + child_layout.lh / 2.0
                    - MIDDLE_CONNECTOR_Y_OFFSET) as i32;
                Self::put_text(canvas, vert_x, self.viewport_y(cy as f64), "├──");
            }
        }
    }

    fn fix_junction(canvas: &mut BufferCanvas, x: i32, y: i32) {
        if x < 0 || y < 0 {
            return;
        }
        let Some(existing) = canvas.get_char(x as usize, y as usize) else {
            return;
        };
        let replacement = match existing {
            '│' => junction::MIDDLE_RIGHT,
            '╭' => junction::TOP_TEE,
            '├' => junction::CROSS,
            _ => existing,
        };
        canvas.set_char(x as usize, y as usize, replacement);
    }

    fn find_extremes(&self, children: &[NodeId]) -> (NodeId, i32, NodeId, i32) {
        let mut top_y = i32::MAX;
        let mut bottom_y = i32::MIN;
        let mut top_child = children[0];
        let mut bottom_child = children[0];

        for &child_id in children {
            if let Some(child_layout) = self.layout.nodes.get(&child_id) {
                let child_y = (child_layout.y + child_layout.yo) as i32;
                if child_y < top_y {
                    top_y = child_y;
                    top_child = child_id;
                }
                if child_y > bottom_y {
                    bottom_y = child_y;
                    bottom_child = child_id;
                }
            }
        }

        (top_child, top_y, bottom_child, bottom_y)
    }
}

fn calculate_middle_y(node_layout: &LayoutNode) -> i32 {
    (node_layout.y + node_layout.yo + node_layout.lh / 2.0 - NODE_MIDDLE_Y_OFFSET).round() as i32
}
