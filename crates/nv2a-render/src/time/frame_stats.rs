use std::time::{Duration, Instant};

/// Frames averaged per report.
pub const AVERAGE_FRAMES: u32 = 60;

/// Reported rates never drop below this.
pub const MIN_REPORTED_FPS: f32 = 5.0;

/// Render-time statistics across presents.
///
/// A frame is timed from [`FrameStats::begin_frame`] (right after the
/// previous present returned) to [`FrameStats::end_frame`] (before waiting
/// for vertical blank), so the vblank wait is excluded. Every
/// [`AVERAGE_FRAMES`] frames the average is folded into [`FrameStats::fps`].
#[derive(Debug, Clone)]
pub struct FrameStats {
    frame_start: Option<Instant>,
    accumulated: Duration,
    frames: u32,
    fps: f32,
    reports: u64,
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            frame_start: None,
            accumulated: Duration::ZERO,
            frames: 0,
            fps: 0.0,
            reports: 0,
        }
    }

    pub fn begin_frame(&mut self) {
        self.begin_frame_at(Instant::now());
    }

    pub fn begin_frame_at(&mut self, now: Instant) {
        self.frame_start = Some(now);
    }

    /// Records the frame started by the last `begin_frame`.
    ///
    /// Returns `true` when this frame completed an averaging window and
    /// [`FrameStats::fps`] changed. Without a matching begin nothing is recorded.
    pub fn end_frame(&mut self) -> bool {
        self.end_frame_at(Instant::now())
    }

    pub fn end_frame_at(&mut self, now: Instant) -> bool {
        let Some(start) = self.frame_start.take() else {
            return false;
        };
        self.accumulated += now.saturating_duration_since(start);
        self.frames += 1;
        if self.frames < AVERAGE_FRAMES {
            return false;
        }

        let secs = self.accumulated.as_secs_f32();
        if secs > 0.0 {
            self.fps = (AVERAGE_FRAMES as f32 / secs).max(MIN_REPORTED_FPS);
            self.reports += 1;
        }
        self.frames = 0;
        self.accumulated = Duration::ZERO;
        secs > 0.0
    }

    /// Last computed rate; zero until the first window completes.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Number of completed averaging windows.
    #[inline]
    pub fn reports(&self) -> u64 {
        self.reports
    }

    /// Overlay text for the current rate.
    pub fn label(&self) -> String {
        format!("FPS: {:.2}", self.fps)
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}
