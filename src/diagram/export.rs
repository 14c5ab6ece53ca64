use super::layout::LayoutEngine;
use super::paint::DiagramPainter;
use super::view::{DiagramView, RenderStatus};
use crate::ui::canvas::BufferCanvas;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const SOURCE_FILE_NAME: &str = "mindmap.mmd";
pub const PAGES_FILE_NAME: &str = "mindmap-pages.txt";

const PAGE_BREAK: &str = "\x0c\n";

/// Writes the diagram source as-is to `<dir>/mindmap.mmd`. Only the source
/// of the diagram on screen is written; a render still in progress blocks it.
pub fn export_source(view: &DiagramView, dir: &Path) -> Result<PathBuf> {
    if view.is_rendering() {
        return Err(anyhow!("Mind map is still rendering"));
    }
    let source = view
        .source()
        .filter(|_| *view.status() == RenderStatus::Rendered)
        .ok_or_else(|| anyhow!("No mind map to export"))?;

    let path = dir.join(SOURCE_FILE_NAME);
    write_file(&path, source)?;
    info!(path = %path.display(), "exported diagram source");
    Ok(path)
}

/// Rasterizes the visible part of the diagram at `scale` times the current
/// zoom and writes it as pages of `page_height` rows to
/// `<dir>/mindmap-pages.txt`.
pub fn export_pages(view: &DiagramView, dir: &Path, scale: f64, page_height: usize) -> Result<PathBuf> {
    let rows = rasterize(view, scale)?;
    let document = paginate(&rows, page_height);

    let path = dir.join(PAGES_FILE_NAME);
    write_file(&path, &document)?;
    info!(path = %path.display(), rows = rows.len(), "exported diagram pages");
    Ok(path)
}

/// Plain rows of the visible container drawn at `scale`.
pub fn rasterize(view: &DiagramView, scale: f64) -> Result<Vec<String>> {
    let diagram = view
        .diagram()
        .ok_or_else(|| anyhow!("No mind map to export"))?;

    let params = view.params().scaled(scale);
    let layout = LayoutEngine::calculate_layout(diagram, &params);

    let width = (view.viewport_width as f64 * scale).ceil() as usize;
    let height = (view.viewport_height as f64 * scale).ceil() as usize;
    let origin = (view.viewport_left * scale, view.viewport_top * scale);

    let mut canvas = BufferCanvas::new(width, height);
    DiagramPainter::new(diagram, &layout, origin).paint(&mut canvas);

    let mut rows = canvas.to_plain_rows();
    while rows.last().is_some_and(|row| row.is_empty()) {
        rows.pop();
    }
    Ok(rows)
}

/// Splits rows into form-feed separated pages, each with a header line.
pub fn paginate(rows: &[String], page_height: usize) -> String {
    let page_height = page_height.max(1);
    let pages: Vec<&[String]> = if rows.is_empty() {
        vec![rows]
    } else {
        rows.chunks(page_height).collect()
    };
    let total = pages.len();

    pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            let mut text = format!("Mind map page {} of {}\n\n", i + 1, total);
            for row in page.iter() {
                text.push_str(row);
                text.push('\n');
            }
            text
        })
        .collect::<Vec<_>>()
        .join(PAGE_BREAK)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create export directory {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::parse_mindmap;
    use tempfile::TempDir;

    fn rendered(source: &str) -> DiagramView {
        let mut view = DiagramView::default();
        let job = view.begin_render(source);
        view.finish_render(job.render_id, parse_mindmap(&job.source));
        view
    }

    #[test]
    fn test_export_source_waits_for_pending_render() {
        let dir = TempDir::new().unwrap();
        let mut view = rendered("mindmap\n  root((Cats))\n");
        view.begin_render("mindmap\n  root((Dogs))\n");

        let err = export_source(&view, dir.path()).unwrap_err();
        assert_eq!(err.to_string(), "Mind map is still rendering");
        assert!(!dir.path().join(SOURCE_FILE_NAME).exists());
    }

    #[test]
    fn test_export_source_writes_raw_text() {
        let dir = TempDir::new().unwrap();
        let source = "mindmap\n  root((Cats))\n    Care\n";
        let view = rendered(source);

        let path = export_source(&view, dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), SOURCE_FILE_NAME);
        assert_eq!(fs::read_to_string(path).unwrap(), source);
    }

    #[test]
    fn test_export_without_diagram_fails() {
        let dir = TempDir::new().unwrap();
        let view = DiagramView::default();
        assert!(export_source(&view, dir.path()).is_err());
        assert!(export_pages(&view, dir.path(), 2.0, 40).is_err());
    }

    #[test]
    fn test_export_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("out").join("maps");
        let view = rendered("mindmap\n  Cats\n");

        let path = export_pages(&view, &nested, 2.0, 40).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_rasterize_upscales() {
        let view = rendered("mindmap\n  Cats\n    Care\n    Play\n");
        let normal = rasterize(&view, 1.0).unwrap();
        let doubled = rasterize(&view, 2.0).unwrap();

        assert!(normal.join("\n").contains("Cats"));
        assert!(doubled.join("\n").contains("Play"));
        assert!(doubled.len() > normal.len());
    }

    #[test]
    fn test_paginate() {
        let rows: Vec<String> = (1..=5).map(|i| format!("row {i}")).collect();
        let document = paginate(&rows, 2);

        let pages: Vec<&str> = document.split(PAGE_BREAK).collect();
        assert_eq!(pages.len(), 3);
        assert!(pages[0].starts_with("Mind map page 1 of 3\n\nrow 1\nrow 2\n"));
        assert_eq!(pages[2], "Mind map page 3 of 3\n\nrow 5\n");
    }

    #[test]
    fn test_paginate_empty_still_has_a_page() {
        assert_eq!(paginate(&[], 10), "Mind map page 1 of 1\n\n");
    }
}
