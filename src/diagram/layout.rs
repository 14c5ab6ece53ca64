use super::model::Diagram;
use indextree::NodeId;
use std::collections::HashMap;
use unicode_width::UnicodeWidthStr;

/// Ratio threshold for when text should wrap (1.3 = 130% of max width)
const WRAP_THRESHOLD_RATIO: f32 = 1.3;

/// Left padding for the root node
const LEFT_PADDING: usize = 1;

/// Narrowest a zoomed-out label column may get.
const MIN_WRAP_WIDTH: usize = 8;

/// Space allocated for connection lines between parent and child nodes
pub const NODE_CONNECTION_SPACING: f64 = 6.0;

/// Sizing knobs for one layout pass, already scaled by the current zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub max_parent_node_width: usize,
    pub max_leaf_node_width: usize,
    pub line_spacing: usize,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            max_parent_node_width: 25,
            max_leaf_node_width: 40,
            line_spacing: 1,
        }
    }
}

impl LayoutParams {
    /// Zooming widens the label columns and the gaps between rows.
    pub fn scaled(&self, zoom: f64) -> Self {
        let width = |w: usize| ((w as f64 * zoom).round() as usize).max(MIN_WRAP_WIDTH);
        Self {
            max_parent_node_width: width(self.max_parent_node_width),
            max_leaf_node_width: width(self.max_leaf_node_width),
            line_spacing: (self.line_spacing as f64 * zoom).floor() as usize,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayoutNode {
    // Position
    pub x: f64,
    pub y: f64,
    // Dimensions
    pub w: f64,  // Width
    pub h: f64,  // Height
    pub lh: f64, // Line height (number of text lines)
    // Offsets
    pub yo: f64, // Y offset for vertical centering
    pub lines: Vec<String>,
}

pub struct LayoutEngine {
    pub nodes: HashMap<NodeId, LayoutNode>,
    pub map_width: f64,
    pub map_height: f64,
    pub map_top: f64,
    pub map_bottom: f64,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            map_width: 0.0,
            map_height: 0.0,
            map_top: 0.0,
            map_bottom: 0.0,
        }
    }

    pub fn calculate_layout(diagram: &Diagram, params: &LayoutParams) -> Self {
        let mut engine = Self::new();
        let root_id = diagram.root;

        // First pass: calculate widths and line heights
        engine.calculate_x_and_lh(diagram, params, root_id, 0.0);

        // Second pass: calculate heights
        engine.calculate_h(diagram, params, root_id);

        // Third pass: calculate y positions
        engine.calculate_y(diagram, params, root_id, 0.0);

        engine
    }

    fn calculate_x_and_lh(
        &mut self,
        diagram: &Diagram,
        params: &LayoutParams,
        node_id: NodeId,
        parent_x: f64,
    ) {
        let Some(node) = diagram.node(node_id) else {
            return;
        };

        let x = if node_id == diagram.root {
            LEFT_PADDING as f64
        } else {
            let parent_width = diagram
                .parent(node_id)
                .and_then(|parent| self.nodes.get(&parent))
                .map(|p| p.w)
                .unwrap_or(0.0);

            parent_x + parent_width + NODE_CONNECTION_SPACING
        };

        let children = diagram.visible_children(node_id);
        let max_width = if children.is_empty() {
            params.max_leaf_node_width
        } else {
            params.max_parent_node_width
        };

        let label = node.label();
        let lines = if label.width() as f32 > WRAP_THRESHOLD_RATIO * max_width as f32 {
            wrap_text(&label, max_width)
        } else {
            vec![label]
        };
        let w = lines.iter().map(|l| l.width()).max().unwrap_or(0) as f64;
        let lh = lines.len() as f64;

        self.nodes.insert(
            node_id,
            LayoutNode {
                x,
                y: 0.0,
                w,
                h: 0.0,
                lh,
                yo: 0.0,
                lines,
            },
        );

        self.map_width = self.map_width.max(x + w);

        for child_id in children {
            self.calculate_x_and_lh(diagram, params, child_id, x);
        }
    }

    fn calculate_h(&mut self, diagram: &Diagram, params: &LayoutParams, node_id: NodeId) -> f64 {
        let children = diagram.visible_children(node_id);
        let spacing = params.line_spacing as f64;
        let own_height = self
            .nodes
            .get(&node_id)
            .map(|layout| layout.lh + spacing)
            .unwrap_or(spacing);

        let h = if children.is_empty() {
            own_height
        } else {
            let children_height: f64 = children
                .iter()
                .map(|child_id| self.calculate_h(diagram, params, *child_id))
                .sum();
            children_height.max(own_height)
        };

        if let Some(layout) = self.nodes.get_mut(&node_id) {
            layout.h = h;
        }

        h
    }

    fn calculate_y(
        &mut self,
        diagram: &Diagram,
        params: &LayoutParams,
        node_id: NodeId,
        current_y: f64,
    ) {
        if let Some(layout) = self.nodes.get_mut(&node_id) {
            layout.y = current_y;
            layout.yo = ((layout.h - layout.lh) / 2.0).round();
        }

        if let Some(layout) = self.nodes.get(&node_id) {
            self.map_bottom = self
                .map_bottom
                .max(current_y + layout.lh + params.line_spacing as f64);
            self.map_top = self.map_top.min(current_y);
        }

        let mut child_y = current_y;
        for child_id in diagram.visible_children(node_id) {
            self.calculate_y(diagram, params, child_id, child_y);
            if let Some(child_layout) = self.nodes.get(&child_id) {
                child_y += child_layout.h;
            }
        }

        self.map_height = self.map_bottom - self.map_top;
    }

    /// Top-left cell of the node's first text line.
    pub fn anchor(&self, node_id: NodeId) -> Option<(f64, f64)> {
        self.nodes
            .get(&node_id)
            .map(|layout| (layout.x, layout.y + layout.yo))
    }

    pub fn get_visible_nodes(&self, viewport: (f64, f64, f64, f64)) -> Vec<NodeId> {
        let (vp_left, vp_top, vp_right, vp_bottom) = viewport;

        self.nodes
            .iter()
            .filter_map(|(id, layout)| {
                let is_visible = layout.x + layout.w >= vp_left
                    && layout.x <= vp_right
                    && layout.y + layout.yo + layout.lh >= vp_top
                    && layout.y + layout.yo <= vp_bottom;

                is_visible.then_some(*id)
            })
            .collect()
    }
}

/// Wrap text to fit within a maximum width, breaking at word boundaries
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;

    for word in words {
        let word_width = word.width();
        let needs_space = !current_line.is_empty();
        let space_width = if needs_space { 1 } else { 0 };

        if current_width > 0 && current_width + space_width + word_width > max_width {
            lines.push(current_line);
            current_line = word.to_string();
            current_width = word_width;
        } else {
            if needs_space {
                current_line.push(' ');
                current_width += 1;
            }
            current_line.push_str(word);
            current_width += word_width;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::model::Node;
    use indextree::Arena;

    fn sample() -> Diagram {
        let mut tree = Arena::new();
        let root = tree.new_node(Node::new("Root"));
        let child1 = tree.new_node(Node::new("Child 1"));
        let child2 = tree.new_node(Node::new("Child 2"));
        let grandchild = tree.new_node(Node::new("Grandchild"));
        root.append(child1, &mut tree);
        root.append(child2, &mut tree);
        child2.append(grandchild, &mut tree);
        Diagram { tree, root }
    }

    #[test]
    fn test_calculate_layout_simple_tree() {
        let diagram = sample();
        let layout = LayoutEngine::calculate_layout(&diagram, &LayoutParams::default());

        assert_eq!(layout.nodes.len(), 4);
        assert_eq!(layout.nodes[&diagram.root].x, LEFT_PADDING as f64);
        assert!(layout.map_width > 0.0);
        assert!(layout.map_height > 0.0);
    }

    #[test]
    fn test_child_spacing() {
        let diagram = sample();
        let layout = LayoutEngine::calculate_layout(&diagram, &LayoutParams::default());
        let children = diagram.children(diagram.root);

        let root = &layout.nodes[&diagram.root];
        let first = &layout.nodes[&children[0]];
        let second = &layout.nodes[&children[1]];

        assert_eq!(first.x, root.x + root.w + NODE_CONNECTION_SPACING);
        assert_eq!(first.x, second.x);
        assert!(second.y > first.y);
    }

    #[test]
    fn test_collapsed_branch_is_not_laid_out() {
        let mut diagram = sample();
        let child2 = diagram.children(diagram.root)[1];
        if let Some(node) = diagram.node_mut(child2) {
            node.is_collapsed = true;
        }

        let layout = LayoutEngine::calculate_layout(&diagram, &LayoutParams::default());
        assert_eq!(layout.nodes.len(), 3);
    }

    #[test]
    fn test_long_labels_wrap() {
        let mut tree = Arena::new();
        let root = tree.new_node(Node::new(
            "A rather long root label that certainly exceeds the parent width",
        ));
        let leaf = tree.new_node(Node::new("leaf"));
        root.append(leaf, &mut tree);
        let diagram = Diagram { tree, root };

        let layout = LayoutEngine::calculate_layout(&diagram, &LayoutParams::default());
        let root_layout = &layout.nodes[&root];
        assert!(root_layout.lh > 1.0);
        assert!(root_layout.w <= 25.0);
    }

    #[test]
    fn test_zoom_scales_params() {
        let params = LayoutParams::default();
        let out = params.scaled(0.5);
        assert_eq!(out.line_spacing, 0);
        assert_eq!(out.max_parent_node_width, 13);

        let zoomed = params.scaled(2.0);
        assert_eq!(zoomed.line_spacing, 2);
        assert_eq!(zoomed.max_leaf_node_width, 80);
    }

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("This is a very long line that should be wrapped", 15);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.width() <= 15);
        }
        assert_eq!(wrap_text("SingleWord", 20), ["SingleWord"]);
    }

    #[test]
    fn test_get_visible_nodes() {
        let diagram = sample();
        let layout = LayoutEngine::calculate_layout(&diagram, &LayoutParams::default());

        let everything = layout.get_visible_nodes((0.0, 0.0, 500.0, 500.0));
        assert_eq!(everything.len(), 4);

        let only_root_column = layout.get_visible_nodes((0.0, 0.0, 4.0, 500.0));
        assert_eq!(only_root_column, vec![diagram.root]);
    }
}
