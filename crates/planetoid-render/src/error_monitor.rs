//! Counting sink for uncaptured GPU errors.
//!
//! wgpu's default handler panics on the first validation error. The monitor
//! replaces it with one that logs each error and counts it, so a bad shader
//! edit or oversized buffer costs a frame instead of the process.

use std::fmt::Display;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Clone, Debug, Default)]
pub struct GpuErrorMonitor {
    pending: Arc<AtomicUsize>,
    total: Arc<AtomicUsize>,
}

impl GpuErrorMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a monitor and register it as `device`'s uncaptured-error handler.
    pub fn install(device: &wgpu::Device) -> Self {
        let monitor = Self::new();
        let sink = monitor.clone();
        device.on_uncaptured_error(Arc::new(move |error: wgpu::Error| sink.record(&error)));
        monitor
    }

    pub fn record(&self, error: &dyn Display) {
        log::error!("GPU error: {error}");
        self.pending.fetch_add(1, Ordering::Relaxed);
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    /// Reset the per-frame count, logging a summary when it was non-zero.
    /// Returns the number of errors since the previous call.
    pub fn end_frame(&self) -> usize {
        let count = self.pending.swap(0, Ordering::Relaxed);
        if count > 0 {
            log::warn!("{count} GPU error(s) this frame");
        }
        count
    }

    /// Errors recorded since creation.
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }
}
