//! Device collaborators.
//!
//! The renderer never touches hardware directly. It talks to:
//! - a [`PushBuffer`] that accepts method words and exposes GPU progress
//! - a [`NativeMemory`] allocator for contiguous, GPU-visible memory
//!
//! [`SoftDevice`] implements both in software for tests and tooling.

mod encoder;
mod memory;
pub mod nv097;
mod soft;

pub use encoder::{decode_methods, header, MethodCall, PushEncoder};
pub use memory::{MemoryBlock, NativeMemory};
pub use soft::{SoftDevice, SoftStats};

use crate::coords::Rect;
use crate::format::{PixelFormat, SurfaceFormat};

/// Display mode the push-buffer library scans out.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VideoMode {
    pub width: u32,
    pub height: u32,
    /// 15, 16 or 32.
    pub bpp: u32,
}

impl VideoMode {
    pub const fn new(width: u32, height: u32, bpp: u32) -> Self {
        Self { width, height, bpp }
    }

    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        (self.bpp as usize).div_ceil(8)
    }

    /// Bytes per back-buffer row.
    #[inline]
    pub const fn pitch(self) -> usize {
        self.width as usize * self.bytes_per_pixel()
    }

    /// Surface format the display uses for this depth.
    #[inline]
    pub const fn surface_format(self) -> SurfaceFormat {
        SurfaceFormat::for_video_depth(self.bpp)
    }

    /// Portable layout of back-buffer pixels.
    #[inline]
    pub const fn pixel_format(self) -> PixelFormat {
        self.surface_format().pixel_format()
    }

    #[inline]
    pub const fn bounds(self) -> Rect {
        Rect::from_size(self.width, self.height)
    }
}

/// Command submission and frame pacing of the push-buffer library.
pub trait PushBuffer {
    fn video_mode(&self) -> VideoMode;

    /// Selects the colour format of the back buffers before rendering starts.
    fn set_color_format(&mut self, format: SurfaceFormat);

    fn color_format(&self) -> SurfaceFormat;

    /// Submits one begin/end scope of encoded method words.
    fn submit(&mut self, words: &[u32]);

    /// Whether the GPU still has queued commands.
    fn is_busy(&mut self) -> bool;

    /// Whether a finished frame is still waiting to be flipped.
    fn frame_pending(&mut self) -> bool;

    fn wait_for_vblank(&mut self);

    /// Rewinds the push-buffer write pointer for the next frame.
    fn reset(&mut self);

    fn erase_depth_stencil(&mut self, rect: Rect);

    /// CPU view of the back buffer, `video_mode().pitch()` bytes per row.
    fn back_buffer_pixels(&self) -> &[u8];

    /// Makes GPU writes to the framebuffer visible to the CPU.
    fn flush_framebuffer(&mut self);

    /// Replaces the text overlay. Devices without one ignore it.
    fn draw_debug_text(&mut self, _text: &str) {}
}

/// Everything the renderer needs from the platform.
pub trait Device: PushBuffer + NativeMemory {}

impl<T: PushBuffer + NativeMemory> Device for T {}
