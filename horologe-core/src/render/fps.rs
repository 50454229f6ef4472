//! Frame-rate measurement

/// Length of one measurement window
pub const FPS_WINDOW_MS: u64 = 1000;

/// Frame counter over a rolling one-second window
///
/// Produces one FPS value per window. The value is an integer so the
/// FPS region only redraws when the whole-number rate changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameRateSample {
    frame_counter: u32,
    window_start: Option<u64>,
    fps: u32,
}

impl FrameRateSample {
    /// Create a sample whose first window opens on the first frame
    pub const fn new() -> Self {
        Self {
            frame_counter: 0,
            window_start: None,
            fps: 0,
        }
    }

    /// Create a sample with the first window already open at `now_ms`
    pub const fn starting_at(now_ms: u64) -> Self {
        Self {
            frame_counter: 0,
            window_start: Some(now_ms),
            fps: 0,
        }
    }

    /// Count one frame
    ///
    /// Returns the new FPS value when this frame closed a window.
    pub fn record_frame(&mut self, now_ms: u64) -> Option<u32> {
        let start = *self.window_start.get_or_insert(now_ms);
        self.frame_counter = self.frame_counter.saturating_add(1);

        let elapsed = now_ms.saturating_sub(start);
        if elapsed < FPS_WINDOW_MS {
            return None;
        }

        let fps = u64::from(self.frame_counter) * 1000 / elapsed;
        self.fps = u32::try_from(fps).unwrap_or(u32::MAX);
        self.frame_counter = 0;
        self.window_start = Some(now_ms);
        Some(self.fps)
    }

    /// Most recent completed measurement (0 before the first window closes)
    pub const fn fps(&self) -> u32 {
        self.fps
    }

    /// Frames counted in the open window
    pub const fn frame_counter(&self) -> u32 {
        self.frame_counter
    }
}
