use super::layout::{LayoutEngine, LayoutParams};
use super::model::Diagram;
use super::parser::RenderError;
use indextree::NodeId;
use tracing::{debug, warn};

pub const RENDER_FAILED_MESSAGE: &str =
    "Failed to render mind map. Please check your input and try again.";

// Weight factor for prioritizing vertical movement over horizontal
const VERTICAL_WEIGHT: f64 = 15.0;

// Cells kept between the active node and the viewport edge
const VISIBILITY_MARGIN: f64 = 2.0;

const PAN_STEP_X: f64 = 8.0;
const PAN_STEP_Y: f64 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub enum RenderStatus {
    Empty,
    Rendering,
    Rendered,
    Failed(String),
}

/// Allowed zoom factors and the increment between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self {
            min: 0.5,
            max: 3.0,
            step: 0.1,
        }
    }
}

impl ZoomRange {
    pub fn clamp(&self, zoom: f64) -> f64 {
        // Two decimals keep repeated steps from drifting
        ((zoom * 100.0).round() / 100.0).clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    pub render_id: u64,
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

pub struct DiagramView {
    status: RenderStatus,
    source: Option<String>,
    diagram: Option<Diagram>,
    pub active: Option<NodeId>,
    zoom: f64,
    range: ZoomRange,
    base_params: LayoutParams,
    pub viewport_left: f64,
    pub viewport_top: f64,
    pub viewport_width: u16,
    pub viewport_height: u16,
    next_render_id: u64,
    pending: Option<u64>,
}

impl Default for DiagramView {
    fn default() -> Self {
        Self::new(ZoomRange::default(), LayoutParams::default())
    }
}

impl DiagramView {
    pub fn new(range: ZoomRange, base_params: LayoutParams) -> Self {
        Self {
            status: RenderStatus::Empty,
            source: None,
            diagram: None,
            active: None,
            zoom: range.clamp(1.0),
            range,
            base_params,
            viewport_left: 0.0,
            viewport_top: 0.0,
            viewport_width: 80,
            viewport_height: 24,
            next_render_id: 0,
            pending: None,
        }
    }

    pub fn status(&self) -> &RenderStatus {
        &self.status
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn diagram(&self) -> Option<&Diagram> {
        self.diagram.as_ref()
    }

    pub fn is_rendering(&self) -> bool {
        self.pending.is_some()
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn zoom_range(&self) -> ZoomRange {
        self.range
    }

    /// Starts a render of new source under a fresh id. Any earlier render
    /// still running is superseded.
    pub fn begin_render(&mut self, source: impl Into<String>) -> RenderJob {
        self.next_render_id += 1;
        let render_id = self.next_render_id;
        let source = source.into();

        self.pending = Some(render_id);
        self.status = RenderStatus::Rendering;
        self.source = Some(source.clone());

        debug!(render_id, "render started");
        RenderJob { render_id, source }
    }

    /// Applies a render completion. Returns false when the id is stale.
    pub fn finish_render(&mut self, render_id: u64, result: Result<Diagram, RenderError>) -> bool {
        if self.pending != Some(render_id) {
            debug!(render_id, latest = ?self.pending, "ignoring stale render");
            return false;
        }
        self.pending = None;

        match result {
            Ok(diagram) => {
                debug!(render_id, nodes = diagram.node_count(), "render finished");
                self.active = Some(diagram.root);
                self.diagram = Some(diagram);
                self.status = RenderStatus::Rendered;
                self.reset_transform();
            }
            Err(err) => {
                warn!(render_id, error = %err, "render failed");
                self.diagram = None;
                self.active = None;
                self.status = RenderStatus::Failed(RENDER_FAILED_MESSAGE.to_string());
            }
        }
        true
    }

    pub fn params(&self) -> LayoutParams {
        self.base_params.scaled(self.zoom)
    }

    pub fn layout(&self) -> Option<LayoutEngine> {
        self.diagram
            .as_ref()
            .map(|diagram| LayoutEngine::calculate_layout(diagram, &self.params()))
    }

    pub fn set_viewport_size(&mut self, width: u16, height: u16) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + self.range.step);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - self.range.step);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = self.range.clamp(zoom);
        self.ensure_active_visible();
    }

    /// Back to 1x at the origin with the root selected.
    pub fn reset_transform(&mut self) {
        self.zoom = self.range.clamp(1.0);
        self.viewport_left = 0.0;
        self.viewport_top = 0.0;
        if let Some(diagram) = &self.diagram {
            self.active = Some(diagram.root);
        }
    }

    pub fn pan(&mut self, direction: Direction) {
        let (dx, dy) = match direction {
            Direction::Up => (0.0, -PAN_STEP_Y),
            Direction::Down => (0.0, PAN_STEP_Y),
            Direction::Left => (-PAN_STEP_X, 0.0),
            Direction::Right => (PAN_STEP_X, 0.0),
        };
        self.viewport_left = (self.viewport_left + dx).max(0.0);
        self.viewport_top = (self.viewport_top + dy).max(0.0);
    }

    pub fn toggle_collapse(&mut self) -> bool {
        let (Some(active), Some(diagram)) = (self.active, self.diagram.as_mut()) else {
            return false;
        };
        if active.children(&diagram.tree).next().is_none() {
            return false;
        }
        if let Some(node) = diagram.node_mut(active) {
            node.is_collapsed = !node.is_collapsed;
        }
        true
    }

    pub fn expand_all(&mut self) {
        if let Some(diagram) = self.diagram.as_mut() {
            for node in diagram.tree.iter_mut() {
                node.get_mut().is_collapsed = false;
            }
        }
    }

    pub fn select(&mut self, direction: Direction) {
        let Some(active) = self.active else {
            return;
        };
        let Some(layout) = self.layout() else {
            return;
        };
        let Some(diagram) = self.diagram.as_ref() else {
            return;
        };

        let next = match direction {
            Direction::Left => diagram.parent(active),
            Direction::Right => diagram.visible_children(active).into_iter().min_by(|a, b| {
                let ay = layout.anchor(*a).map_or(0.0, |(_, y)| y);
                let by = layout.anchor(*b).map_or(0.0, |(_, y)| y);
                ay.total_cmp(&by)
            }),
            Direction::Up => sibling_in_direction(diagram, &layout, active, -1.0)
                .or_else(|| nearest_in_direction(&layout, active, -1.0)),
            Direction::Down => sibling_in_direction(diagram, &layout, active, 1.0)
                .or_else(|| nearest_in_direction(&layout, active, 1.0)),
        };

        if let Some(next) = next {
            self.active = Some(next);
            self.ensure_active_visible();
        }
    }

    pub fn ensure_active_visible(&mut self) {
        let Some(active) = self.active else {
            return;
        };
        let Some(layout) = self.layout() else {
            return;
        };
        let Some(node_layout) = layout.nodes.get(&active) else {
            return;
        };

        let node_x = node_layout.x;
        let node_y = node_layout.y + node_layout.yo;
        let node_right = node_x + node_layout.w;
        let node_bottom = node_y + node_layout.lh;
        let width = self.viewport_width as f64;
        let height = self.viewport_height as f64;

        if node_x < self.viewport_left + VISIBILITY_MARGIN {
            self.viewport_left = (node_x - VISIBILITY_MARGIN).max(0.0);
        } else if node_right > self.viewport_left + width - VISIBILITY_MARGIN {
            self.viewport_left = (node_right - width + VISIBILITY_MARGIN).max(0.0);
        }

        if node_y < self.viewport_top + VISIBILITY_MARGIN {
            self.viewport_top = (node_y - VISIBILITY_MARGIN).max(0.0);
        } else if node_bottom > self.viewport_top + height - VISIBILITY_MARGIN {
            self.viewport_top = (node_bottom - height + VISIBILITY_MARGIN).max(0.0);
        }
    }
}

fn node_center(layout: &LayoutEngine, node_id: NodeId) -> Option<(f64, f64)> {
    layout.nodes.get(&node_id).map(|node| {
        (
            node.x + node.w / 2.0,
            node.y + node.yo + node.lh / 2.0,
        )
    })
}

fn sibling_in_direction(
    diagram: &Diagram,
    layout: &LayoutEngine,
    active: NodeId,
    direction_y: f64,
) -> Option<NodeId> {
    let parent = diagram.parent(active)?;
    let (_, current_y) = layout.anchor(active)?;

    diagram
        .visible_children(parent)
        .into_iter()
        .filter(|&id| id != active)
        .filter_map(|id| layout.anchor(id).map(|(_, y)| (id, y - current_y)))
        .filter(|(_, dy)| dy * direction_y > 0.0)
        .min_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
        .map(|(id, _)| id)
}

fn nearest_in_direction(layout: &LayoutEngine, active: NodeId, direction_y: f64) -> Option<NodeId> {
    let (current_x, current_y) = node_center(layout, active)?;

    layout
        .nodes
        .keys()
        .filter(|&&id| id != active)
        .filter_map(|&id| {
            let (x, y) = node_center(layout, id)?;
            let (dx, dy) = (x - current_x, y - current_y);
            (dy * direction_y > 0.0).then(|| (id, (dy * VERTICAL_WEIGHT).powi(2) + dx.powi(2)))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::parse_mindmap;

    const SOURCE: &str = "mindmap\n  root((Cats))\n    Care\n      Food\n    Play\n";

    fn rendered() -> DiagramView {
        let mut view = DiagramView::default();
        let job = view.begin_render(SOURCE);
        assert!(view.finish_render(job.render_id, parse_mindmap(&job.source)));
        view
    }

    fn title(view: &DiagramView) -> String {
        let diagram = view.diagram().unwrap();
        diagram.node(view.active.unwrap()).unwrap().title.clone()
    }

    #[test]
    fn test_starts_empty() {
        let view = DiagramView::default();
        assert_eq!(view.status(), &RenderStatus::Empty);
        assert!(view.layout().is_none());
        assert_eq!(view.zoom(), 1.0);
    }

    #[test]
    fn test_render_lifecycle() {
        let mut view = DiagramView::default();
        let job = view.begin_render(SOURCE);
        assert_eq!(view.status(), &RenderStatus::Rendering);
        assert!(view.is_rendering());

        assert!(view.finish_render(job.render_id, parse_mindmap(&job.source)));
        assert_eq!(view.status(), &RenderStatus::Rendered);
        assert_eq!(title(&view), "Cats");
        assert_eq!(view.source(), Some(SOURCE));
    }

    #[test]
    fn test_stale_render_is_ignored() {
        let mut view = DiagramView::default();
        let first = view.begin_render("mindmap\n  A\n");
        let second = view.begin_render("mindmap\n  B\n");

        assert!(!view.finish_render(first.render_id, parse_mindmap(&first.source)));
        assert!(view.is_rendering());

        assert!(view.finish_render(second.render_id, parse_mindmap(&second.source)));
        assert_eq!(title(&view), "B");
    }

    #[test]
    fn test_failed_render_shows_error_state() {
        let mut view = rendered();
        let job = view.begin_render("not a mindmap");
        view.finish_render(job.render_id, parse_mindmap(&job.source));

        assert_eq!(
            view.status(),
            &RenderStatus::Failed(RENDER_FAILED_MESSAGE.to_string())
        );
        assert!(view.diagram().is_none());
    }

    #[test]
    fn test_zoom_is_bounded_and_steps_cleanly() {
        let mut view = rendered();
        view.zoom_in();
        view.zoom_in();
        assert_eq!(view.zoom(), 1.2);

        for _ in 0..50 {
            view.zoom_in();
        }
        assert_eq!(view.zoom(), 3.0);

        for _ in 0..50 {
            view.zoom_out();
        }
        assert_eq!(view.zoom(), 0.5);
    }

    #[test]
    fn test_reset_restores_transform() {
        let mut view = rendered();
        view.zoom_in();
        view.pan(Direction::Right);
        view.pan(Direction::Down);
        view.select(Direction::Right);

        view.reset_transform();
        assert_eq!(view.zoom(), 1.0);
        assert_eq!((view.viewport_left, view.viewport_top), (0.0, 0.0));
        assert_eq!(title(&view), "Cats");
    }

    #[test]
    fn test_pan_never_goes_negative() {
        let mut view = rendered();
        view.pan(Direction::Left);
        view.pan(Direction::Up);
        assert_eq!((view.viewport_left, view.viewport_top), (0.0, 0.0));

        view.pan(Direction::Right);
        assert_eq!(view.viewport_left, PAN_STEP_X);
    }

    #[test]
    fn test_navigation() {
        let mut view = rendered();
        view.select(Direction::Right);
        assert_eq!(title(&view), "Care");

        view.select(Direction::Down);
        assert_eq!(title(&view), "Play");

        view.select(Direction::Up);
        assert_eq!(title(&view), "Care");

        view.select(Direction::Right);
        assert_eq!(title(&view), "Food");

        view.select(Direction::Left);
        view.select(Direction::Left);
        assert_eq!(title(&view), "Cats");
    }

    #[test]
    fn test_toggle_collapse_only_for_branches() {
        let mut view = rendered();
        assert!(view.toggle_collapse());
        assert_eq!(view.layout().unwrap().nodes.len(), 1);

        view.expand_all();
        assert_eq!(view.layout().unwrap().nodes.len(), 4);

        view.select(Direction::Right);
        view.select(Direction::Down);
        assert!(!view.toggle_collapse());
    }
}
