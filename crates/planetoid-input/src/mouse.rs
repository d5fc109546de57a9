//! Mouse-look accumulation and cursor capture.
//!
//! While the cursor is captured the camera is steered by raw device motion;
//! while it is free (settings mode) motion is ignored so the pointer can be
//! used for other things.

use glam::Vec2;
use tracing::{debug, warn};
use winit::window::{CursorGrabMode, Window};

/// Whether the cursor drives the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorMode {
    /// Hidden and grabbed; motion turns the camera.
    #[default]
    Captured,
    /// Visible and released.
    Free,
}

impl CursorMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Captured => Self::Free,
            Self::Free => Self::Captured,
        }
    }
}

/// Look delta gathered between frames.
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    mode: CursorMode,
    position: Vec2,
    delta: Vec2,
    cursor_in_window: bool,
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `CursorMoved` event. Only tracks position; look input comes from raw
    /// motion.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        self.position = Vec2::new(x as f32, y as f32);
    }

    /// `DeviceEvent::MouseMotion`. Dropped unless the cursor is captured.
    pub fn on_raw_motion(&mut self, dx: f64, dy: f64) {
        if self.mode == CursorMode::Captured {
            self.delta += Vec2::new(dx as f32, dy as f32);
        }
    }

    pub fn on_cursor_entered(&mut self) {
        self.cursor_in_window = true;
    }

    pub fn on_cursor_left(&mut self) {
        self.cursor_in_window = false;
    }

    /// Switch cursor mode and apply grab and visibility to `window`.
    ///
    /// Locked grab is tried first; platforms without it get Confined.
    pub fn set_mode(&mut self, window: &Window, mode: CursorMode) {
        self.set_mode_flag(mode);
        match mode {
            CursorMode::Captured => {
                let grab = window
                    .set_cursor_grab(CursorGrabMode::Locked)
                    .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
                if let Err(e) = grab {
                    warn!("Cursor grab unavailable: {e}");
                }
                window.set_cursor_visible(false);
            }
            CursorMode::Free => {
                if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                    warn!("Failed to release cursor: {e}");
                }
                window.set_cursor_visible(true);
            }
        }
    }

    /// Update the mode without touching a window.
    pub fn set_mode_flag(&mut self, mode: CursorMode) {
        if self.mode != mode {
            debug!(?mode, "Cursor mode changed");
        }
        self.mode = mode;
        self.delta = Vec2::ZERO;
    }

    /// Take the accumulated look delta, leaving zero behind.
    pub fn take_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.delta)
    }

    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    #[must_use]
    pub fn mode(&self) -> CursorMode {
        self.mode
    }

    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.mode == CursorMode::Captured
    }

    /// Cursor position in physical window pixels.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[must_use]
    pub fn is_cursor_in_window(&self) -> bool {
        self.cursor_in_window
    }
}
