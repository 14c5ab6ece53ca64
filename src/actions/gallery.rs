use super::clipboard::copy_to_clipboard;
use crate::api::ImageResult;
use crate::app::AppState;
use crate::dispatch::Effect;

pub fn images_fetched(app: &mut AppState, seq: u64, images: Vec<ImageResult>) -> Vec<Effect> {
    app.gallery.apply(seq, images);
    Vec::new()
}

pub fn select_next(app: &mut AppState) -> Vec<Effect> {
    app.gallery.select_next();
    Vec::new()
}

pub fn select_prev(app: &mut AppState) -> Vec<Effect> {
    app.gallery.select_prev();
    Vec::new()
}

pub fn open_lightbox(app: &mut AppState) -> Vec<Effect> {
    if !app.gallery.open_selected() {
        app.set_message("No image selected");
    }
    Vec::new()
}

pub fn close_lightbox(app: &mut AppState) -> Vec<Effect> {
    app.gallery.close();
    Vec::new()
}

pub fn lightbox_next(app: &mut AppState) -> Vec<Effect> {
    app.gallery.next_image();
    Vec::new()
}

pub fn lightbox_prev(app: &mut AppState) -> Vec<Effect> {
    app.gallery.prev_image();
    Vec::new()
}

pub fn lightbox_zoom_in(app: &mut AppState) -> Vec<Effect> {
    app.gallery.zoom_in();
    Vec::new()
}

pub fn lightbox_zoom_out(app: &mut AppState) -> Vec<Effect> {
    app.gallery.zoom_out();
    Vec::new()
}

/// Copies the lightbox image, or the selected tile when no lightbox is open.
pub fn copy_image_url(app: &mut AppState) -> Vec<Effect> {
    let url = app
        .gallery
        .lightbox_image()
        .or_else(|| app.gallery.selected_image())
        .map(|image| image.url.clone());

    if let Some(url) = url {
        copy_to_clipboard(app, url, "Image URL");
    }
    Vec::new()
}
