use std::fmt;

use crate::coords::{Rect, Vec2};
use crate::device::{nv097, MemoryBlock};
use crate::error::{RenderError, Result};
use crate::format::{convert_pixels, PixelFormat, TexelFormat};
use crate::swizzle::{swizzle_rect, unswizzle_rect};

use super::TextureLayout;

/// Opaque handle naming a live texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TextureId(pub(crate) u32);

impl TextureId {
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How the caller intends to use a texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TextureAccess {
    /// Uploaded rarely, sampled often. Stored tiled.
    Static,
    /// Rewritten every frame through locks. Stored linear.
    Streaming,
    /// Rendered into. Stored linear with an aligned pitch.
    Target,
}

/// Sampling filter requested by a draw.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum ScaleMode {
    Nearest,
    #[default]
    Linear,
    PixelArt,
}

impl ScaleMode {
    /// Native min/mag filter value.
    #[inline]
    pub const fn filter_code(self) -> u32 {
        match self {
            ScaleMode::Linear => nv097::TEXTURE_FILTER_LINEAR,
            ScaleMode::Nearest | ScaleMode::PixelArt => nv097::TEXTURE_FILTER_NEAREST,
        }
    }
}

/// Texture coordinate wrapping for one axis.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum AddressMode {
    #[default]
    Clamp,
    Wrap,
}

impl AddressMode {
    #[inline]
    pub const fn code(self) -> u32 {
        match self {
            AddressMode::Clamp => nv097::TEXTURE_ADDRESS_CLAMP_TO_EDGE,
            AddressMode::Wrap => nv097::TEXTURE_ADDRESS_WRAP,
        }
    }
}

/// Read-only description of a texture.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextureInfo {
    pub id: TextureId,
    pub format: PixelFormat,
    pub access: TextureAccess,
    pub width: u32,
    pub height: u32,
    pub pitch: usize,
    pub tiled: bool,
    pub native_format: TexelFormat,
    pub physical_address: u32,
}

/// A texture and its native storage.
///
/// `filter`, `address_u` and `address_v` mirror what was last programmed
/// into the sampler for this texture so redundant state can be skipped.
#[derive(Debug)]
pub struct Texture {
    pub(crate) id: TextureId,
    pub(crate) block: MemoryBlock,
    pub(crate) format: PixelFormat,
    pub(crate) access: TextureAccess,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) layout: TextureLayout,
    pub(crate) filter: ScaleMode,
    pub(crate) address_u: AddressMode,
    pub(crate) address_v: AddressMode,
}

impl Texture {
    pub(crate) fn new(
        id: TextureId,
        block: MemoryBlock,
        format: PixelFormat,
        access: TextureAccess,
        width: u32,
        height: u32,
        layout: TextureLayout,
    ) -> Self {
        Self {
            id,
            block,
            format,
            access,
            width,
            height,
            layout,
            filter: ScaleMode::default(),
            address_u: AddressMode::default(),
            address_v: AddressMode::default(),
        }
    }

    #[inline]
    pub fn id(&self) -> TextureId {
        self.id
    }

    #[inline]
    pub fn is_tiled(&self) -> bool {
        self.layout.tiled
    }

    #[inline]
    pub fn pitch(&self) -> usize {
        self.layout.pitch
    }

    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        self.layout.bytes_per_pixel
    }

    #[inline]
    pub fn uv_scale(&self) -> Vec2 {
        self.layout.uv_scale
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    pub fn physical_address(&self) -> u32 {
        self.block.physical_address()
    }

    pub fn info(&self) -> TextureInfo {
        TextureInfo {
            id: self.id,
            format: self.format,
            access: self.access,
            width: self.width,
            height: self.height,
            pitch: self.layout.pitch,
            tiled: self.layout.tiled,
            native_format: self.layout.native,
            physical_address: self.block.physical_address(),
        }
    }

    /// Checks that `rect` is non-negative and inside the texture.
    pub(crate) fn check_rect(&self, rect: Rect) -> Result<()> {
        if rect.fits_within(self.width, self.height) {
            Ok(())
        } else {
            Err(RenderError::InvalidRect {
                x: rect.x,
                y: rect.y,
                w: rect.w,
                h: rect.h,
                bound_w: self.width,
                bound_h: self.height,
            })
        }
    }

    /// Byte offset of the texel at `(x, y)` in linear storage.
    #[inline]
    pub(crate) fn linear_offset(&self, x: i32, y: i32) -> usize {
        y as usize * self.layout.pitch + x as usize * self.layout.bytes_per_pixel
    }

    /// Writes `pixels` (rows `src_pitch` bytes apart) into `rect` of `storage`.
    ///
    /// Linear storage is a plain row copy. Tiled storage is re-swizzled: a
    /// full-size rect goes straight in, a partial one is composited into an
    /// unswizzled copy of the whole image first.
    pub(crate) fn write_rect(&self, storage: &mut [u8], rect: Rect, pixels: &[u8], src_pitch: usize) -> Result<()> {
        self.check_rect(rect)?;
        if rect.is_empty() {
            return Ok(());
        }

        let bpp = self.layout.bytes_per_pixel;
        let (w, h) = (rect.w as usize, rect.h as usize);
        let row = w * bpp;
        let needed = (h - 1) * src_pitch.max(row) + row;
        if src_pitch < row || pixels.len() < needed {
            return Err(RenderError::InvalidPixelBuffer { needed, got: pixels.len(), pitch: src_pitch });
        }

        if !self.layout.tiled {
            let start = self.linear_offset(rect.x, rect.y);
            return convert_pixels(
                w,
                h,
                self.format,
                pixels,
                src_pitch,
                self.format,
                &mut storage[start..],
                self.layout.pitch,
            );
        }

        let (tw, th) = (self.width as usize, self.height as usize);
        if rect == self.bounds() {
            swizzle_rect(pixels, tw, th, src_pitch, storage, bpp);
            return Ok(());
        }

        let full_pitch = tw * bpp;
        let mut scratch = vec![0u8; full_pitch * th];
        unswizzle_rect(storage, tw, th, &mut scratch, full_pitch, bpp);
        for y in 0..h {
            let src = &pixels[y * src_pitch..y * src_pitch + row];
            let at = (rect.y as usize + y) * full_pitch + rect.x as usize * bpp;
            scratch[at..at + row].copy_from_slice(src);
        }
        swizzle_rect(&scratch, tw, th, full_pitch, storage, bpp);
        Ok(())
    }

    /// Copies the logical image out of `storage` as tightly packed rows.
    pub(crate) fn read_linear(&self, storage: &[u8]) -> Vec<u8> {
        let bpp = self.layout.bytes_per_pixel;
        let (w, h) = (self.width as usize, self.height as usize);
        let row = w * bpp;
        let mut out = vec![0u8; row * h];
        if self.layout.tiled {
            unswizzle_rect(storage, w, h, &mut out, row, bpp);
        } else {
            for (y, dst) in out.chunks_exact_mut(row).enumerate() {
                let at = y * self.layout.pitch;
                dst.copy_from_slice(&storage[at..at + row]);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texture(access: TextureAccess, w: u32, h: u32) -> (Texture, Vec<u8>) {
        let layout = TextureLayout::plan(PixelFormat::Argb4444, access, w, h, 4096).unwrap();
        let storage = vec![0u8; layout.alloc_size];
        let block = MemoryBlock::new(0x0100_0000, layout.alloc_size);
        (Texture::new(TextureId(1), block, PixelFormat::Argb4444, access, w, h, layout), storage)
    }

    fn gradient(w: usize, h: usize) -> Vec<u8> {
        (0..w * h).flat_map(|i| (i as u16).to_le_bytes()).collect()
    }

    // ── linear ────────────────────────────────────────────────────────────

    #[test]
    fn linear_subrect_lands_at_pitch_offsets() {
        let (tex, mut storage) = texture(TextureAccess::Streaming, 8, 4);
        tex.write_rect(&mut storage, Rect::new(2, 1, 2, 2), &[1, 0, 2, 0, 3, 0, 4, 0], 4)
            .unwrap();
        assert_eq!(&storage[16 + 4..16 + 8], &[1, 0, 2, 0]);
        assert_eq!(&storage[32 + 4..32 + 8], &[3, 0, 4, 0]);
        assert_eq!(storage[16], 0);
    }

    // ── tiled ─────────────────────────────────────────────────────────────

    #[test]
    fn tiled_full_update_reads_back() {
        let (tex, mut storage) = texture(TextureAccess::Static, 6, 5);
        let img = gradient(6, 5);
        tex.write_rect(&mut storage, tex.bounds(), &img, 12).unwrap();
        assert_ne!(&storage[..img.len()], &img[..]);
        assert_eq!(tex.read_linear(&storage), img);
    }

    #[test]
    fn tiled_partial_update_composites() {
        let (tex, mut storage) = texture(TextureAccess::Static, 6, 5);
        let img = gradient(6, 5);
        tex.write_rect(&mut storage, tex.bounds(), &img, 12).unwrap();

        let patch = [0xEE; 2 * 2 * 2];
        tex.write_rect(&mut storage, Rect::new(3, 2, 2, 2), &patch, 4).unwrap();

        let back = tex.read_linear(&storage);
        for y in 0..5 {
            for x in 0..6 {
                let at = (y * 6 + x) * 2;
                let inside = (3..5).contains(&x) && (2..4).contains(&y);
                let expected = if inside { [0xEE, 0xEE] } else { [img[at], img[at + 1]] };
                assert_eq!([back[at], back[at + 1]], expected, "texel {x},{y}");
            }
        }
    }

    // ── validation ────────────────────────────────────────────────────────

    #[test]
    fn out_of_bounds_rect_is_rejected() {
        let (tex, mut storage) = texture(TextureAccess::Streaming, 8, 4);
        let err = tex.write_rect(&mut storage, Rect::new(6, 0, 4, 1), &[0; 8], 8).unwrap_err();
        assert!(matches!(err, RenderError::InvalidRect { bound_w: 8, .. }));
    }

    #[test]
    fn short_source_is_rejected() {
        let (tex, mut storage) = texture(TextureAccess::Streaming, 8, 4);
        let err = tex.write_rect(&mut storage, Rect::new(0, 0, 4, 2), &[0; 10], 8).unwrap_err();
        assert!(matches!(err, RenderError::InvalidPixelBuffer { got: 10, pitch: 8, .. }));
    }

    #[test]
    fn filter_codes() {
        assert_eq!(ScaleMode::PixelArt.filter_code(), ScaleMode::Nearest.filter_code());
        assert_ne!(ScaleMode::Linear.filter_code(), ScaleMode::Nearest.filter_code());
    }
}
