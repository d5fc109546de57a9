//! Frame rate shown in the window title.

use std::time::Duration;

/// FPS is recomputed once per window of this length.
pub const FPS_WINDOW: Duration = Duration::from_millis(500);

/// Averages frame rate over [`FPS_WINDOW`] and remembers the last frame time.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    window_elapsed: Duration,
    window_frames: u32,
    fps: f32,
    last_frame: Duration,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame. Returns true when the average was refreshed.
    pub fn record(&mut self, frame_time: Duration) -> bool {
        self.last_frame = frame_time;
        self.window_elapsed += frame_time;
        self.window_frames += 1;
        if self.window_elapsed < FPS_WINDOW {
            return false;
        }
        self.fps = self.window_frames as f32 / self.window_elapsed.as_secs_f32();
        self.window_elapsed = Duration::ZERO;
        self.window_frames = 0;
        true
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn frame_time_ms(&self) -> f32 {
        self.last_frame.as_secs_f32() * 1000.0
    }

    /// `"60.0 FPS (16.67 ms)"`.
    pub fn summary(&self) -> String {
        format!("{:.1} FPS ({:.2} ms)", self.fps, self.frame_time_ms())
    }
}
