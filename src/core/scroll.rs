//! Scroll-driven parallax state.

use std::cell::Cell;

/// Scroll offset relative to the cover height, clamped to `[0, 1]`.
pub fn scroll_progress(scroll_y: f64, cover_height: f64) -> f64 {
    let h = cover_height.max(1.0);
    let offset = scroll_y / h;
    if offset.is_nan() {
        return 0.0;
    }
    offset.clamp(0.0, 1.0)
}

/// Formats the value written to the style variable.
pub fn format_progress(progress: f64) -> String {
    let s = format!("{progress:.4}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Single-flight gate for animation-frame batching: at most one frame
/// request is outstanding no matter how many scroll events arrive.
#[derive(Debug, Default)]
pub struct FrameGate {
    pending: Cell<bool>,
}

impl FrameGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the caller should request a frame.
    pub fn try_schedule(&self) -> bool {
        !self.pending.replace(true)
    }

    /// Called from the frame callback once the update ran.
    pub fn complete(&self) {
        self.pending.set(false);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }
}

/// Holds the currently bound listener handle.
///
/// Installing a new handle drops the previous one first; handles unregister
/// themselves on drop, so rebinding never accumulates listeners.
#[derive(Debug)]
pub struct ListenerSlot<H> {
    current: Option<H>,
}

impl<H> Default for ListenerSlot<H> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<H> ListenerSlot<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the previous handle, then bind `make()`'s result.
    pub fn replace_with<F>(&mut self, make: F) -> &H
    where
        F: FnOnce() -> H,
    {
        self.current = None;
        self.current.insert(make())
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn is_bound(&self) -> bool {
        self.current.is_some()
    }

    pub fn get(&self) -> Option<&H> {
        self.current.as_ref()
    }
}
