//! Portable → native format translation.
//!
//! Two allowlists are kept apart on purpose: the texture sampler accepts more
//! layouts than the colour surface (render target / back buffer) can write.

use crate::error::{RenderError, Result};

use super::PixelFormat;

/// Native texel format codes (value of the texture format register's colour field).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum TexelFormat {
    A1r5g5b5Swizzled = 0x02,
    X1r5g5b5Swizzled = 0x03,
    A4r4g4b4Swizzled = 0x04,
    R5g6b5Swizzled = 0x05,
    A8r8g8b8Swizzled = 0x06,
    X8r8g8b8Swizzled = 0x07,
    A1r5g5b5 = 0x10,
    R5g6b5 = 0x11,
    A8r8g8b8 = 0x12,
    X1r5g5b5 = 0x1C,
    A4r4g4b4 = 0x1D,
    X8r8g8b8 = 0x1E,
    A8b8g8r8Swizzled = 0x3A,
    R8g8b8a8Swizzled = 0x3C,
    A8b8g8r8 = 0x3F,
    R8g8b8a8 = 0x41,
}

impl TexelFormat {
    #[inline]
    pub const fn code(self) -> u32 {
        self as u32
    }

    pub const fn is_swizzled(self) -> bool {
        matches!(
            self,
            TexelFormat::A1r5g5b5Swizzled
                | TexelFormat::X1r5g5b5Swizzled
                | TexelFormat::A4r4g4b4Swizzled
                | TexelFormat::R5g6b5Swizzled
                | TexelFormat::A8r8g8b8Swizzled
                | TexelFormat::X8r8g8b8Swizzled
                | TexelFormat::A8b8g8r8Swizzled
                | TexelFormat::R8g8b8a8Swizzled
        )
    }
}

/// Native colour surface formats (value of the surface format register's colour field).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum SurfaceFormat {
    X1r5g5b5 = 0x01,
    R5g6b5 = 0x03,
    A8r8g8b8 = 0x08,
}

impl SurfaceFormat {
    #[inline]
    pub const fn code(self) -> u32 {
        self as u32
    }

    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            SurfaceFormat::X1r5g5b5 | SurfaceFormat::R5g6b5 => 2,
            SurfaceFormat::A8r8g8b8 => 4,
        }
    }

    /// Surface format the display uses for a given video mode depth.
    pub const fn for_video_depth(bpp: u32) -> SurfaceFormat {
        match bpp {
            15 => SurfaceFormat::X1r5g5b5,
            16 => SurfaceFormat::R5g6b5,
            _ => SurfaceFormat::A8r8g8b8,
        }
    }

    /// Portable format matching the surface's memory layout.
    pub const fn pixel_format(self) -> PixelFormat {
        match self {
            SurfaceFormat::X1r5g5b5 => PixelFormat::Xrgb1555,
            SurfaceFormat::R5g6b5 => PixelFormat::Rgb565,
            SurfaceFormat::A8r8g8b8 => PixelFormat::Argb8888,
        }
    }

    pub fn from_code(code: u32) -> Option<SurfaceFormat> {
        match code {
            0x01 => Some(SurfaceFormat::X1r5g5b5),
            0x03 => Some(SurfaceFormat::R5g6b5),
            0x08 => Some(SurfaceFormat::A8r8g8b8),
            _ => None,
        }
    }
}

/// Maps a portable format to the sampler's native texel format.
///
/// `tiled` selects the swizzled variant. Returns the native code together
/// with the bytes per pixel of the stored texel.
pub fn texture_format(format: PixelFormat, tiled: bool) -> Result<(TexelFormat, usize)> {
    let pick = |swizzled, linear| if tiled { swizzled } else { linear };
    let native = match format {
        PixelFormat::Argb1555 => pick(TexelFormat::A1r5g5b5Swizzled, TexelFormat::A1r5g5b5),
        PixelFormat::Xrgb1555 => pick(TexelFormat::X1r5g5b5Swizzled, TexelFormat::X1r5g5b5),
        PixelFormat::Rgb565 => pick(TexelFormat::R5g6b5Swizzled, TexelFormat::R5g6b5),
        PixelFormat::Argb4444 => pick(TexelFormat::A4r4g4b4Swizzled, TexelFormat::A4r4g4b4),
        PixelFormat::Argb8888 => pick(TexelFormat::A8r8g8b8Swizzled, TexelFormat::A8r8g8b8),
        PixelFormat::Xrgb8888 => pick(TexelFormat::X8r8g8b8Swizzled, TexelFormat::X8r8g8b8),
        PixelFormat::Rgba8888 => pick(TexelFormat::R8g8b8a8Swizzled, TexelFormat::R8g8b8a8),
        PixelFormat::Abgr8888 => pick(TexelFormat::A8b8g8r8Swizzled, TexelFormat::A8b8g8r8),
        PixelFormat::Bgra8888 | PixelFormat::Rgb24 | PixelFormat::Index8 => {
            return Err(RenderError::UnsupportedFormat(format));
        }
    };
    Ok((native, format.bytes_per_pixel()))
}

/// Maps a portable format to a colour surface format usable as a render target.
pub fn surface_format(format: PixelFormat) -> Result<(SurfaceFormat, usize)> {
    match format {
        PixelFormat::Rgb565 => Ok((SurfaceFormat::R5g6b5, 2)),
        PixelFormat::Xrgb8888 | PixelFormat::Argb8888 => Ok((SurfaceFormat::A8r8g8b8, 4)),
        _ => Err(RenderError::UnsupportedTargetFormat(format)),
    }
}

/// Formats accepted by [`texture_format`], in preference order.
pub const SUPPORTED_TEXTURE_FORMATS: [PixelFormat; 8] = [
    PixelFormat::Rgb565,
    PixelFormat::Argb8888,
    PixelFormat::Xrgb8888,
    PixelFormat::Rgba8888,
    PixelFormat::Abgr8888,
    PixelFormat::Argb4444,
    PixelFormat::Argb1555,
    PixelFormat::Xrgb1555,
];
