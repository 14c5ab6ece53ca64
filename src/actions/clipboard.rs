use crate::app::AppState;
use clipboard::{ClipboardContext, ClipboardProvider};
use tracing::debug;

/// Keeps `text` in the internal register and mirrors it to the system
/// clipboard when one is available.
pub fn copy_to_clipboard(app: &mut AppState, text: String, label: &str) {
    app.clipboard = Some(text.clone());

    // Try to copy to system clipboard
    match ClipboardContext::new() {
        Ok(mut ctx) => {
            if let Err(err) = ctx.set_contents(text) {
                debug!(error = %err, "system clipboard rejected contents");
            }
        }
        Err(err) => debug!(error = %err, "no system clipboard"),
    }

    app.set_message(format!("{label} copied"));
}

/// System clipboard first, then the internal register.
pub fn read_clipboard(app: &AppState) -> Option<String> {
    ClipboardContext::new()
        .ok()
        .and_then(|mut ctx| ctx.get_contents().ok())
        .filter(|contents| !contents.is_empty())
        .or_else(|| app.clipboard.clone())
}
