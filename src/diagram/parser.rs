use super::model::{Diagram, Node, NodeShape};
use indextree::{Arena, NodeId};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static RE_NODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?P<id>[^()\[\]{}\s"]*)(?:\(\((?P<circle>.*)\)\)|\)\)(?P<bang>.*)\(\(|\{\{(?P<hexagon>.*)\}\}|\((?P<rounded>.*)\)|\)(?P<cloud>.*)\(|\[(?P<square>.*)\])$"#,
    )
    .expect("valid regex")
});
static RE_SHAPE_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^[^()\[\]{}\s"]*[(\[{)]"#).expect("valid regex"));
static RE_CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*:::.*$").expect("valid regex"));
static RE_QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#""[^"]*""#).expect("valid regex"));
static RE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid regex"));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("diagram source is empty")]
    Empty,
    #[error("expected a `mindmap` header, found `{0}`")]
    MissingHeader(String),
    #[error("line {line}: unbalanced node shape in `{text}`")]
    UnbalancedShape { line: usize, text: String },
    #[error("line {line}: a mind map has exactly one root")]
    MultipleRoots { line: usize },
    #[error("mind map has no nodes")]
    NoNodes,
    #[error("render task failed: {0}")]
    Task(String),
}

/// Parses Mermaid `mindmap` source. Indentation defines the hierarchy; the
/// first node is the root and every later node must be indented past it.
pub fn parse_mindmap(source: &str) -> Result<Diagram, RenderError> {
    let mut lines = meaningful_lines(source).into_iter();

    let (_, header) = lines.next().ok_or(RenderError::Empty)?;
    if header.trim() != "mindmap" {
        return Err(RenderError::MissingHeader(header.trim().to_string()));
    }

    let mut tree = Arena::new();
    let mut root: Option<(NodeId, usize)> = None;
    let mut level_stack: Vec<(NodeId, usize)> = Vec::new();

    for (line_no, line) in lines {
        let trimmed = line.trim();

        // Decorations attach to the previous node and carry nothing we draw.
        if trimmed.starts_with("::icon(") || trimmed.starts_with(":::") {
            continue;
        }

        let indent = line.len() - line.trim_start().len();
        let node = parse_node(&RE_CLASS.replace(trimmed, ""), line_no)?;

        match root {
            None => {
                let id = tree.new_node(node);
                root = Some((id, indent));
                level_stack.push((id, indent));
            }
            Some((_, root_indent)) if indent <= root_indent => {
                return Err(RenderError::MultipleRoots { line: line_no });
            }
            Some(_) => {
                while level_stack.len() > 1
                    && level_stack.last().is_some_and(|&(_, level)| level >= indent)
                {
                    level_stack.pop();
                }
                let Some(&(parent, _)) = level_stack.last() else {
                    return Err(RenderError::MultipleRoots { line: line_no });
                };
                let id = tree.new_node(node);
                parent.append(id, &mut tree);
                level_stack.push((id, indent));
            }
        }
    }

    let (root, _) = root.ok_or(RenderError::NoNodes)?;
    Ok(Diagram { tree, root })
}

/// Non-blank lines with 1-based numbers, minus comments, code fences and
/// front matter. Tabs count as two spaces.
fn meaningful_lines(source: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut in_front_matter = false;
    let mut seen_content = false;

    for (i, raw) in source.lines().enumerate() {
        let line = raw.trim_end().replace('\t', "  ");
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with("%%") || trimmed.starts_with("```") {
            continue;
        }
        if trimmed == "---" && (in_front_matter || !seen_content) {
            in_front_matter = !in_front_matter;
            continue;
        }
        if in_front_matter {
            continue;
        }

        seen_content = true;
        out.push((i + 1, line));
    }

    out
}

fn parse_node(text: &str, line: usize) -> Result<Node, RenderError> {
    let opens_shape = RE_SHAPE_START.is_match(text);
    let unbalanced = || RenderError::UnbalancedShape {
        line,
        text: text.to_string(),
    };

    if opens_shape && !delimiters_balanced(text) {
        return Err(unbalanced());
    }

    let Some(caps) = RE_NODE.captures(text) else {
        if opens_shape {
            return Err(unbalanced());
        }
        return Ok(Node::new(clean_label(text)));
    };

    let shapes = [
        ("circle", NodeShape::Circle),
        ("bang", NodeShape::Bang),
        ("hexagon", NodeShape::Hexagon),
        ("rounded", NodeShape::Rounded),
        ("cloud", NodeShape::Cloud),
        ("square", NodeShape::Square),
    ];

    let id = caps.name("id").map_or("", |m| m.as_str());
    let (label, shape) = shapes
        .iter()
        .find_map(|(group, shape)| caps.name(group).map(|m| (m.as_str(), *shape)))
        .unwrap_or((id, NodeShape::Default));

    let mut title = clean_label(label);
    if title.is_empty() {
        title = id.to_string();
    }

    Ok(Node::new(title).with_shape(shape))
}

/// Bracket pairs must match outside quoted text. Bang `))x((` and cloud
/// `)x(` shapes balance by count too.
fn delimiters_balanced(text: &str) -> bool {
    let unquoted = RE_QUOTED.replace_all(text, "");
    let count = |c: char| unquoted.chars().filter(|&x| x == c).count();
    count('(') == count(')') && count('[') == count(']') && count('{') == count('}')
}

fn clean_label(label: &str) -> String {
    let label = label.trim();
    let label = label
        .strip_prefix('"')
        .and_then(|l| l.strip_suffix('"'))
        .unwrap_or(label);
    let label = label
        .strip_prefix('`')
        .and_then(|l| l.strip_suffix('`'))
        .unwrap_or(label);

    RE_BREAK
        .replace_all(label, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(diagram: &Diagram, id: NodeId) -> Vec<String> {
        diagram
            .children(id)
            .into_iter()
            .filter_map(|c| diagram.node(c).map(|n| n.title.clone()))
            .collect()
    }

    #[test]
    fn test_parse_simple_hierarchy() {
        let source = "mindmap\n  root((Cats))\n    Behaviour\n      Purring\n    Care\n";
        let diagram = parse_mindmap(source).unwrap();

        let root = diagram.node(diagram.root).unwrap();
        assert_eq!(root.title, "Cats");
        assert_eq!(root.shape, NodeShape::Circle);
        assert_eq!(titles(&diagram, diagram.root), ["Behaviour", "Care"]);

        let behaviour = diagram.children(diagram.root)[0];
        assert_eq!(titles(&diagram, behaviour), ["Purring"]);
    }

    #[test]
    fn test_parse_shapes_and_quotes() {
        let source = r#"mindmap
  root((Topic))
    a[Square]
    b(Rounded)
    c{{Hexagon}}
    d))Bang((
    e)Cloud(
    Analogy["Topic is like a Tree"]
"#;
        let diagram = parse_mindmap(source).unwrap();
        let shapes: Vec<_> = diagram
            .children(diagram.root)
            .into_iter()
            .filter_map(|c| diagram.node(c).map(|n| (n.title.clone(), n.shape)))
            .collect();

        assert_eq!(
            shapes,
            vec![
                ("Square".to_string(), NodeShape::Square),
                ("Rounded".to_string(), NodeShape::Rounded),
                ("Hexagon".to_string(), NodeShape::Hexagon),
                ("Bang".to_string(), NodeShape::Bang),
                ("Cloud".to_string(), NodeShape::Cloud),
                ("Topic is like a Tree".to_string(), NodeShape::Square),
            ]
        );
    }

    #[test]
    fn test_skips_comments_fences_and_decorations() {
        let source = "```mermaid\nmindmap\n%% generated\n\troot((Sun))\n\t\tLight<br/>and heat\n\t\t::icon(fa fa-sun)\n\t\tGravity:::big\n```\n";
        let diagram = parse_mindmap(source).unwrap();
        assert_eq!(titles(&diagram, diagram.root), ["Light and heat", "Gravity"]);
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(parse_mindmap("  \n\n").unwrap_err(), RenderError::Empty);
    }

    #[test]
    fn test_missing_header() {
        let err = parse_mindmap("graph TD\n  A-->B").unwrap_err();
        assert_eq!(err, RenderError::MissingHeader("graph TD".into()));
    }

    #[test]
    fn test_header_without_nodes() {
        assert_eq!(parse_mindmap("mindmap\n").unwrap_err(), RenderError::NoNodes);
    }

    #[test]
    fn test_second_root_is_rejected() {
        let err = parse_mindmap("mindmap\n  A\n    B\n  C\n").unwrap_err();
        assert_eq!(err, RenderError::MultipleRoots { line: 4 });
    }

    #[test]
    fn test_unbalanced_shape() {
        let err = parse_mindmap("mindmap\n  root((Cats)\n").unwrap_err();
        assert!(matches!(err, RenderError::UnbalancedShape { line: 2, .. }));
    }

    #[test]
    fn test_plain_text_with_parentheses_is_a_label() {
        let diagram = parse_mindmap("mindmap\n  Root\n    Sub concept (optional)\n").unwrap();
        assert_eq!(titles(&diagram, diagram.root), ["Sub concept (optional)"]);
    }

    #[test]
    fn test_uneven_indentation_attaches_to_nearest_parent() {
        let source = "mindmap\n  Root\n      Deep\n    Shallower\n";
        let diagram = parse_mindmap(source).unwrap();
        assert_eq!(titles(&diagram, diagram.root), ["Deep", "Shallower"]);
    }
}
