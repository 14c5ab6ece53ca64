//! Mermaid mindmap rendering: parse, lay out left-to-right, paint onto a
//! character canvas, and export.

pub mod export;
mod layout;
mod model;
mod paint;
mod parser;
mod view;

pub use layout::{wrap_text, LayoutEngine, LayoutNode, LayoutParams, NODE_CONNECTION_SPACING};
pub use model::{Diagram, Node, NodeShape};
pub use paint::DiagramPainter;
pub use parser::{parse_mindmap, RenderError};
pub use view::{DiagramView, Direction, RenderJob, RenderStatus, ZoomRange, RENDER_FAILED_MESSAGE};
