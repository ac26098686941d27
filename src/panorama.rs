//! Drag-to-pan panorama viewer.
//!
//! The "360°" tour is a horizontally tiled background image whose offset
//! follows the pointer. Offsets are unbounded; the tiling makes it wrap
//! visually, and the arithmetic wraps at the i32 edges the same way.

/// Panorama image shown by every reserve's virtual tour.
pub const PANORAMA_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1509316975850-ff9c5deb0cd9?q=80&w=3000&auto=format&fit=crop";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanoramaViewer {
    open: bool,
    offset: i32,
    dragging: bool,
    anchor: i32,
}

impl PanoramaViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Opens the viewer. The offset resets only on a closed -> open edge.
    pub fn open(&mut self) {
        if !self.open {
            self.offset = 0;
        }
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.dragging = false;
    }

    /// Pointer down (mouse or first touch) at `pointer_x`.
    pub fn begin_drag(&mut self, pointer_x: i32) {
        self.dragging = true;
        self.anchor = pointer_x.wrapping_sub(self.offset);
    }

    /// Pointer move. Ignored unless a drag is in progress.
    pub fn continue_drag(&mut self, pointer_x: i32) {
        if !self.dragging {
            return;
        }
        self.offset = pointer_x.wrapping_sub(self.anchor);
    }

    /// Pointer up, leave, or touch end.
    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// CSS `background-position` for the current offset.
    pub fn background_position(&self) -> String {
        format!("{}px center", self.offset)
    }
}
