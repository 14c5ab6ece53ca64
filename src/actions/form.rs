use crate::api::{GenerateError, MindMapResponse};
use crate::app::{AppState, Focus};
use crate::dispatch::Effect;
use crate::flow::{Resolution, SubmitOutcome};
use tracing::info;

pub fn cycle_mode(app: &mut AppState) -> Vec<Effect> {
    app.flow.form.mode = app.flow.form.mode.next();
    app.flow.mark_edited();
    app.set_message(app.flow.form.mode.label());
    Vec::new()
}

/// The submit key does nothing while a generation is in flight.
pub fn submit(app: &mut AppState) -> Vec<Effect> {
    if app.flow.is_busy() {
        return Vec::new();
    }
    match app.flow.submit(app.session.is_logged_in()) {
        SubmitOutcome::Ignored => {
            app.set_message("Enter a topic first");
            Vec::new()
        }
        SubmitOutcome::Rejected => Vec::new(),
        SubmitOutcome::Started(submission) => {
            app.clear_message();
            vec![Effect::Generate {
                seq: submission.seq,
                request: submission.request,
            }]
        }
    }
}

pub fn dismiss_rate_limit(app: &mut AppState) -> Vec<Effect> {
    app.flow.dismiss_rate_limit();
    Vec::new()
}

/// A successful generation starts the render and the image search together.
pub fn generation_finished(
    app: &mut AppState,
    seq: u64,
    result: Result<MindMapResponse, GenerateError>,
) -> Vec<Effect> {
    match app.flow.resolve(seq, result) {
        Resolution::Rendered { topic, source } => {
            info!(%topic, "mind map generated");
            let job = app.diagram.begin_render(source);
            let images_seq = app.gallery.begin_fetch();
            app.focus = Focus::Diagram;

            vec![
                Effect::RenderDiagram {
                    render_id: job.render_id,
                    source: job.source,
                },
                Effect::FetchImages {
                    seq: images_seq,
                    topic,
                },
            ]
        }
        Resolution::Stale | Resolution::Failed | Resolution::RateLimited => Vec::new(),
    }
}
