use indextree::{Arena, NodeId};

/// Outline drawn around a node label, one per Mermaid mindmap shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeShape {
    #[default]
    Default,
    Square,
    Rounded,
    Circle,
    Bang,
    Cloud,
    Hexagon,
}

impl NodeShape {
    /// Opening and closing decoration in the terminal rendering.
    pub fn frame(&self) -> (&'static str, &'static str) {
        match self {
            NodeShape::Default => ("", ""),
            NodeShape::Square => ("[", "]"),
            NodeShape::Rounded => ("(", ")"),
            NodeShape::Circle => ("((", "))"),
            NodeShape::Bang => ("!", "!"),
            NodeShape::Cloud => ("~", "~"),
            NodeShape::Hexagon => ("<", ">"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub title: String,
    pub shape: NodeShape,
    pub is_collapsed: bool,
}

impl Node {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            shape: NodeShape::Default,
            is_collapsed: false,
        }
    }

    pub fn with_shape(mut self, shape: NodeShape) -> Self {
        self.shape = shape;
        self
    }

    /// Title inside its shape frame.
    pub fn label(&self) -> String {
        let (open, close) = self.shape.frame();
        format!("{open}{}{close}", self.title)
    }
}

/// A parsed mind map: one root, children in source order.
#[derive(Debug, Clone)]
pub struct Diagram {
    pub tree: Arena<Node>,
    pub root: NodeId,
}

impl Diagram {
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.tree.get(id).map(|n| n.get())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.tree.get_mut(id).map(|n| n.get_mut())
    }

    pub fn node_count(&self) -> usize {
        self.root.descendants(&self.tree).count()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree.get(id).and_then(|n| n.parent())
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        id.children(&self.tree).collect()
    }

    /// Children that take part in layout; a collapsed node shows none.
    pub fn visible_children(&self, id: NodeId) -> Vec<NodeId> {
        match self.node(id) {
            Some(node) if !node.is_collapsed => self.children(id),
            _ => Vec::new(),
        }
    }

    /// Indented outline of the subtree, two spaces per level.
    pub fn outline(&self, id: NodeId) -> String {
        let mut out = String::new();
        for edge in id.traverse(&self.tree) {
            if let indextree::NodeEdge::Start(node_id) = edge {
                let depth = node_id.ancestors(&self.tree).count() - id.ancestors(&self.tree).count();
                if let Some(node) = self.node(node_id) {
                    out.push_str(&"  ".repeat(depth));
                    out.push_str(&node.title);
                    out.push('\n');
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Diagram {
        let mut tree = Arena::new();
        let root = tree.new_node(Node::new("Root").with_shape(NodeShape::Circle));
        let a = tree.new_node(Node::new("A"));
        let b = tree.new_node(Node::new("B").with_shape(NodeShape::Square));
        let b1 = tree.new_node(Node::new("B1"));
        root.append(a, &mut tree);
        root.append(b, &mut tree);
        b.append(b1, &mut tree);
        Diagram { tree, root }
    }

    #[test]
    fn test_label_uses_shape_frame() {
        assert_eq!(Node::new("x").label(), "x");
        assert_eq!(Node::new("x").with_shape(NodeShape::Square).label(), "[x]");
        assert_eq!(Node::new("x").with_shape(NodeShape::Hexagon).label(), "<x>");
    }

    #[test]
    fn test_collapsed_node_hides_children() {
        let mut diagram = sample();
        let b = diagram.children(diagram.root)[1];
        assert_eq!(diagram.visible_children(b).len(), 1);

        if let Some(node) = diagram.node_mut(b) {
            node.is_collapsed = true;
        }
        assert!(diagram.visible_children(b).is_empty());
        assert_eq!(diagram.children(b).len(), 1);
    }

    #[test]
    fn test_outline() {
        let diagram = sample();
        assert_eq!(diagram.node_count(), 4);
        assert_eq!(diagram.outline(diagram.root), "Root\n  A\n  B\n    B1\n");
    }
}
