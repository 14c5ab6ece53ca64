use super::clipboard::copy_to_clipboard;
use crate::app::AppState;
use crate::diagram::export;
use crate::diagram::{Diagram, Direction, RenderError, RenderStatus};
use crate::dispatch::Effect;
use std::path::PathBuf;
use tracing::warn;

pub fn render_finished(
    app: &mut AppState,
    render_id: u64,
    result: Result<Diagram, RenderError>,
) -> Vec<Effect> {
    app.diagram.finish_render(render_id, result);
    Vec::new()
}

pub fn select_node(app: &mut AppState, direction: Direction) -> Vec<Effect> {
    app.diagram.select(direction);
    Vec::new()
}

pub fn pan(app: &mut AppState, direction: Direction) -> Vec<Effect> {
    app.diagram.pan(direction);
    Vec::new()
}

pub fn zoom_in(app: &mut AppState) -> Vec<Effect> {
    app.diagram.zoom_in();
    show_zoom(app);
    Vec::new()
}

pub fn zoom_out(app: &mut AppState) -> Vec<Effect> {
    app.diagram.zoom_out();
    show_zoom(app);
    Vec::new()
}

fn show_zoom(app: &mut AppState) {
    let percent = (app.diagram.zoom() * 100.0).round();
    app.set_message(format!("Zoom {percent}%"));
}

pub fn reset_view(app: &mut AppState) -> Vec<Effect> {
    app.diagram.reset_transform();
    Vec::new()
}

pub fn toggle_collapse(app: &mut AppState) -> Vec<Effect> {
    app.diagram.toggle_collapse();
    Vec::new()
}

pub fn expand_all(app: &mut AppState) -> Vec<Effect> {
    app.diagram.expand_all();
    Vec::new()
}

fn report_export(app: &mut AppState, result: anyhow::Result<PathBuf>) {
    match result {
        Ok(path) => app.set_message(format!("Exported to {}", path.display())),
        Err(err) => {
            warn!(error = %err, "export failed");
            app.set_message(format!("Export failed: {err}"));
        }
    }
}

pub fn export_source(app: &mut AppState) -> Vec<Effect> {
    let result = export::export_source(&app.diagram, &app.config.export_dir);
    report_export(app, result);
    Vec::new()
}

pub fn export_pages(app: &mut AppState) -> Vec<Effect> {
    let result = export::export_pages(
        &app.diagram,
        &app.config.export_dir,
        app.config.export_scale,
        app.config.page_height,
    );
    report_export(app, result);
    Vec::new()
}

pub fn copy_source(app: &mut AppState) -> Vec<Effect> {
    let shown = *app.diagram.status() == RenderStatus::Rendered;
    match app.diagram.source().filter(|_| shown).map(str::to_string) {
        Some(source) => copy_to_clipboard(app, source, "Diagram source"),
        None => app.set_message("No mind map to copy"),
    }
    Vec::new()
}
