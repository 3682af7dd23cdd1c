use crate::arena::align_up;
use crate::config::{MIN_TEXTURE_BYTES, TARGET_PITCH_ALIGNMENT};
use crate::coords::Vec2;
use crate::error::{RenderError, Result};
use crate::format::{surface_format, texture_format, PixelFormat, TexelFormat};

use super::TextureAccess;

/// Memory layout chosen for a texture before anything is allocated.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextureLayout {
    pub native: TexelFormat,
    pub bytes_per_pixel: usize,
    pub tiled: bool,
    pub backing_width: u32,
    pub backing_height: u32,
    pub pitch: usize,
    pub alloc_size: usize,
    /// Multiplier taking caller UVs (0..1) into the sampler's coordinate space.
    pub uv_scale: Vec2,
}

impl TextureLayout {
    /// Plans storage for a `width × height` texture.
    ///
    /// Static textures are sampled often and rewritten rarely, so they are
    /// tiled into a power-of-two backing store and addressed with normalized
    /// coordinates. Streaming and target textures stay linear (lockable,
    /// renderable) and are addressed in texels. Target rows are padded to the
    /// surface pitch alignment.
    pub fn plan(
        format: PixelFormat,
        access: TextureAccess,
        width: u32,
        height: u32,
        max_size: u32,
    ) -> Result<TextureLayout> {
        if width == 0 || height == 0 || width > max_size || height > max_size {
            return Err(RenderError::InvalidTextureSize { width, height });
        }

        if access == TextureAccess::Target {
            surface_format(format).map_err(|_| RenderError::UnsupportedTargetFormat(format))?;
        }

        let tiled = access == TextureAccess::Static;
        let (native, bytes_per_pixel) = texture_format(format, tiled)?;

        let (backing_width, backing_height) = if tiled {
            (width.next_power_of_two(), height.next_power_of_two())
        } else {
            (width, height)
        };

        let mut pitch = backing_width as usize * bytes_per_pixel;
        if access == TextureAccess::Target {
            pitch = align_up(pitch, TARGET_PITCH_ALIGNMENT);
        }

        let alloc_size = (pitch * backing_height as usize).max(MIN_TEXTURE_BYTES);

        let uv_scale = if tiled {
            Vec2::new(
                (width - 1) as f32 / backing_width as f32,
                (height - 1) as f32 / backing_height as f32,
            )
        } else {
            Vec2::new(width as f32, height as f32)
        };

        Ok(TextureLayout {
            native,
            bytes_per_pixel,
            tiled,
            backing_width,
            backing_height,
            pitch,
            alloc_size,
            uv_scale,
        })
    }
}
