//! Time subsystem.
//!
//! Frame pacing is fixed by the vertical blank, so the interesting number is
//! how long a frame takes to render, not how often it is shown. `FrameStats`
//! measures that and turns it into a theoretical frame rate.

mod frame_stats;

pub use frame_stats::{FrameStats, AVERAGE_FRAMES, MIN_REPORTED_FPS};
