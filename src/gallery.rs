use crate::api::ImageResult;
use tracing::debug;

/// Tiles shown while a fetch is outstanding.
pub const PLACEHOLDER_TILES: usize = 4;
pub const EMPTY_MESSAGE: &str = "No related images found.";

// Lightbox zoom, in percent.
const MIN_ZOOM: u16 = 50;
const MAX_ZOOM: u16 = 300;
const ZOOM_STEP: u16 = 20;
const DEFAULT_ZOOM: u16 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lightbox {
    pub index: usize,
    zoom_percent: u16,
}

impl Lightbox {
    fn new(index: usize) -> Self {
        Self {
            index,
            zoom_percent: DEFAULT_ZOOM,
        }
    }

    pub fn zoom(&self) -> f64 {
        f64::from(self.zoom_percent) / 100.0
    }

    pub fn zoom_percent(&self) -> u16 {
        self.zoom_percent
    }
}

#[derive(Debug, Default)]
pub struct Gallery {
    images: Vec<ImageResult>,
    loading: bool,
    latest_seq: u64,
    pub selected: usize,
    lightbox: Option<Lightbox>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn images(&self) -> &[ImageResult] {
        &self.images
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_empty(&self) -> bool {
        !self.loading && self.images.is_empty()
    }

    /// Starts a fetch for a new topic. The returned sequence number must come
    /// back with the result.
    pub fn begin_fetch(&mut self) -> u64 {
        self.latest_seq += 1;
        self.loading = true;
        self.images.clear();
        self.selected = 0;
        self.lightbox = None;
        self.latest_seq
    }

    /// Replaces the working set. Results for an older topic are dropped.
    pub fn apply(&mut self, seq: u64, images: Vec<ImageResult>) -> bool {
        if seq != self.latest_seq {
            debug!(seq, latest = self.latest_seq, "ignoring stale image set");
            return false;
        }
        self.images = images;
        self.loading = false;
        self.selected = 0;
        true
    }

    pub fn select_next(&mut self) {
        if !self.images.is_empty() {
            self.selected = (self.selected + 1).min(self.images.len() - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_image(&self) -> Option<&ImageResult> {
        self.images.get(self.selected)
    }

    pub fn lightbox(&self) -> Option<&Lightbox> {
        self.lightbox.as_ref()
    }

    pub fn lightbox_image(&self) -> Option<&ImageResult> {
        self.lightbox.and_then(|lb| self.images.get(lb.index))
    }

    pub fn open(&mut self, index: usize) -> bool {
        if index >= self.images.len() {
            return false;
        }
        self.selected = index;
        self.lightbox = Some(Lightbox::new(index));
        true
    }

    pub fn open_selected(&mut self) -> bool {
        self.open(self.selected)
    }

    pub fn close(&mut self) {
        self.lightbox = None;
    }

    pub fn next_image(&mut self) {
        if let Some(lb) = self.lightbox {
            if lb.index + 1 < self.images.len() {
                self.open(lb.index + 1);
            }
        }
    }

    pub fn prev_image(&mut self) {
        if let Some(lb) = self.lightbox {
            if lb.index > 0 {
                self.open(lb.index - 1);
            }
        }
    }

    pub fn zoom_in(&mut self) {
        if let Some(lb) = self.lightbox.as_mut() {
            lb.zoom_percent = (lb.zoom_percent + ZOOM_STEP).min(MAX_ZOOM);
        }
    }

    pub fn zoom_out(&mut self) {
        if let Some(lb) = self.lightbox.as_mut() {
            lb.zoom_percent = lb.zoom_percent.saturating_sub(ZOOM_STEP).max(MIN_ZOOM);
        }
    }

    pub fn reset_zoom(&mut self) {
        if let Some(lb) = self.lightbox.as_mut() {
            lb.zoom_percent = DEFAULT_ZOOM;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(n: usize) -> Vec<ImageResult> {
        (1..=n)
            .map(|i| ImageResult {
                url: format!("https://img.example/{i}.jpg"),
                alt_text: format!("image {i}"),
            })
            .collect()
    }

    fn loaded(n: usize) -> Gallery {
        let mut gallery = Gallery::new();
        let seq = gallery.begin_fetch();
        gallery.apply(seq, images(n));
        gallery
    }

    #[test]
    fn test_fetch_lifecycle() {
        let mut gallery = Gallery::new();
        let seq = gallery.begin_fetch();
        assert!(gallery.is_loading());
        assert!(!gallery.is_empty());

        assert!(gallery.apply(seq, Vec::new()));
        assert!(gallery.is_empty());
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let mut gallery = Gallery::new();
        let old = gallery.begin_fetch();
        let new = gallery.begin_fetch();
        assert!(gallery.apply(new, images(2)));
        assert!(!gallery.apply(old, images(4)));
        assert_eq!(gallery.images().len(), 2);
    }

    #[test]
    fn test_zoom_is_bounded() {
        let mut gallery = loaded(2);
        assert!(gallery.open(0));
        for _ in 0..20 {
            gallery.zoom_in();
        }
        assert_eq!(gallery.lightbox().map(|l| l.zoom()), Some(3.0));
        for _ in 0..20 {
            gallery.zoom_out();
        }
        assert_eq!(gallery.lightbox().map(|l| l.zoom()), Some(0.5));
    }

    #[test]
    fn test_zoom_resets_on_change_and_close() {
        let mut gallery = loaded(3);
        gallery.open(0);
        gallery.zoom_in();
        gallery.next_image();
        let lightbox = gallery.lightbox().copied();
        assert_eq!(lightbox.map(|l| (l.index, l.zoom_percent())), Some((1, 100)));

        gallery.zoom_in();
        gallery.close();
        gallery.open(1);
        assert_eq!(gallery.lightbox().map(|l| l.zoom_percent()), Some(100));
    }

    #[test]
    fn test_open_out_of_range() {
        let mut gallery = loaded(1);
        assert!(!gallery.open(3));
        assert!(gallery.lightbox().is_none());
    }
}
