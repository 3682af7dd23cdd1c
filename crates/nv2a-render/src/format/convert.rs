use crate::error::{RenderError, Result};

use super::PixelFormat;

/// Straight-alpha RGBA with 8 bits per channel.
pub type Rgba8 = [u8; 4];

#[inline]
fn expand(v: u32, bits: u32) -> u8 {
    // Replicate high bits into the low bits so full scale maps to 255.
    let v = v & ((1 << bits) - 1);
    ((v << (8 - bits)) | (v >> (2 * bits).saturating_sub(8))) as u8
}

#[inline]
fn read_u16(px: &[u8]) -> u32 {
    u16::from_le_bytes([px[0], px[1]]) as u32
}

#[inline]
fn read_u32(px: &[u8]) -> u32 {
    u32::from_le_bytes([px[0], px[1], px[2], px[3]])
}

/// Decodes one pixel into straight RGBA.
///
/// `px` must hold at least `format.bytes_per_pixel()` bytes.
pub fn decode_pixel(format: PixelFormat, px: &[u8]) -> Result<Rgba8> {
    let rgba = match format {
        PixelFormat::Argb1555 | PixelFormat::Xrgb1555 => {
            let v = read_u16(px);
            let a = if format == PixelFormat::Xrgb1555 || v & 0x8000 != 0 { 255 } else { 0 };
            [expand(v >> 10, 5), expand(v >> 5, 5), expand(v, 5), a]
        }
        PixelFormat::Rgb565 => {
            let v = read_u16(px);
            [expand(v >> 11, 5), expand(v >> 5, 6), expand(v, 5), 255]
        }
        PixelFormat::Argb4444 => {
            let v = read_u16(px);
            [expand(v >> 8, 4), expand(v >> 4, 4), expand(v, 4), expand(v >> 12, 4)]
        }
        PixelFormat::Argb8888 | PixelFormat::Xrgb8888 => {
            let [b, g, r, a] = read_u32(px).to_le_bytes();
            let a = if format == PixelFormat::Xrgb8888 { 255 } else { a };
            [r, g, b, a]
        }
        PixelFormat::Rgba8888 => {
            let [a, b, g, r] = read_u32(px).to_le_bytes();
            [r, g, b, a]
        }
        PixelFormat::Abgr8888 => {
            let [r, g, b, a] = read_u32(px).to_le_bytes();
            [r, g, b, a]
        }
        PixelFormat::Bgra8888 => {
            let [a, r, g, b] = read_u32(px).to_le_bytes();
            [r, g, b, a]
        }
        PixelFormat::Rgb24 => [px[0], px[1], px[2], 255],
        PixelFormat::Index8 => return Err(RenderError::UnsupportedFormat(format)),
    };
    Ok(rgba)
}

/// Encodes straight RGBA into `out` (which must hold `format.bytes_per_pixel()` bytes).
pub fn encode_pixel(format: PixelFormat, [r, g, b, a]: Rgba8, out: &mut [u8]) -> Result<()> {
    let (r, g, b, a) = (r as u32, g as u32, b as u32, a as u32);
    match format {
        PixelFormat::Argb1555 | PixelFormat::Xrgb1555 => {
            let alpha = if format == PixelFormat::Xrgb1555 || a >= 128 { 0x8000 } else { 0 };
            let v = alpha | ((r >> 3) << 10) | ((g >> 3) << 5) | (b >> 3);
            out[..2].copy_from_slice(&(v as u16).to_le_bytes());
        }
        PixelFormat::Rgb565 => {
            let v = ((r >> 3) << 11) | ((g >> 2) << 5) | (b >> 3);
            out[..2].copy_from_slice(&(v as u16).to_le_bytes());
        }
        PixelFormat::Argb4444 => {
            let v = ((a >> 4) << 12) | ((r >> 4) << 8) | ((g >> 4) << 4) | (b >> 4);
            out[..2].copy_from_slice(&(v as u16).to_le_bytes());
        }
        PixelFormat::Argb8888 => out[..4].copy_from_slice(&[b as u8, g as u8, r as u8, a as u8]),
        PixelFormat::Xrgb8888 => out[..4].copy_from_slice(&[b as u8, g as u8, r as u8, 0xFF]),
        PixelFormat::Rgba8888 => out[..4].copy_from_slice(&[a as u8, b as u8, g as u8, r as u8]),
        PixelFormat::Abgr8888 => out[..4].copy_from_slice(&[r as u8, g as u8, b as u8, a as u8]),
        PixelFormat::Bgra8888 => out[..4].copy_from_slice(&[a as u8, r as u8, g as u8, b as u8]),
        PixelFormat::Rgb24 => out[..3].copy_from_slice(&[r as u8, g as u8, b as u8]),
        PixelFormat::Index8 => return Err(RenderError::UnsupportedFormat(format)),
    }
    Ok(())
}

/// Packs a straight ARGB clear value into `format`, as the device does when filling a surface.
pub fn pack_argb(format: PixelFormat, argb: u32) -> Result<Vec<u8>> {
    let [b, g, r, a] = argb.to_le_bytes();
    let mut out = vec![0u8; format.bytes_per_pixel()];
    encode_pixel(format, [r, g, b, a], &mut out)?;
    Ok(out)
}

/// Copies a `width × height` block between two pitched buffers, converting formats.
///
/// Identical formats degrade to a row copy.
#[allow(clippy::too_many_arguments)]
pub fn convert_pixels(
    width: usize,
    height: usize,
    src_format: PixelFormat,
    src: &[u8],
    src_pitch: usize,
    dst_format: PixelFormat,
    dst: &mut [u8],
    dst_pitch: usize,
) -> Result<()> {
    let src_bpp = src_format.bytes_per_pixel();
    let dst_bpp = dst_format.bytes_per_pixel();
    let src_row = width * src_bpp;
    let dst_row = width * dst_bpp;

    if height == 0 || width == 0 {
        return Ok(());
    }
    let src_needed = (height - 1) * src_pitch + src_row;
    let dst_needed = (height - 1) * dst_pitch + dst_row;
    if src.len() < src_needed {
        return Err(RenderError::InvalidPixelBuffer { needed: src_needed, got: src.len(), pitch: src_pitch });
    }
    if dst.len() < dst_needed {
        return Err(RenderError::InvalidPixelBuffer { needed: dst_needed, got: dst.len(), pitch: dst_pitch });
    }

    for y in 0..height {
        let s = &src[y * src_pitch..y * src_pitch + src_row];
        let d = &mut dst[y * dst_pitch..y * dst_pitch + dst_row];
        if src_format == dst_format {
            d.copy_from_slice(s);
            continue;
        }
        for (sp, dp) in s.chunks_exact(src_bpp).zip(d.chunks_exact_mut(dst_bpp)) {
            encode_pixel(dst_format, decode_pixel(src_format, sp)?, dp)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba8 = [255, 0, 0, 255];
    const TEAL: Rgba8 = [0, 128, 128, 255];

    fn roundtrip(format: PixelFormat, rgba: Rgba8) -> Rgba8 {
        let mut buf = vec![0u8; format.bytes_per_pixel()];
        encode_pixel(format, rgba, &mut buf).unwrap();
        decode_pixel(format, &buf).unwrap()
    }

    #[test]
    fn full_scale_channels_survive_every_format() {
        for format in PixelFormat::ALL {
            if format == PixelFormat::Index8 {
                continue;
            }
            assert_eq!(roundtrip(format, RED), RED, "{format}");
        }
    }

    #[test]
    fn argb8888_byte_order() {
        let mut buf = [0u8; 4];
        encode_pixel(PixelFormat::Argb8888, [0x11, 0x22, 0x33, 0x44], &mut buf).unwrap();
        assert_eq!(u32::from_le_bytes(buf), 0x4411_2233);
    }

    #[test]
    fn rgb565_quantizes_mid_tones() {
        let back = roundtrip(PixelFormat::Rgb565, TEAL);
        assert_eq!(back[0], 0);
        assert!((back[1] as i32 - 128).abs() <= 4);
        assert!((back[2] as i32 - 128).abs() <= 8);
    }

    #[test]
    fn xrgb_formats_read_opaque() {
        let buf = [0u8; 4];
        assert_eq!(decode_pixel(PixelFormat::Xrgb8888, &buf).unwrap()[3], 255);
        assert_eq!(decode_pixel(PixelFormat::Xrgb1555, &buf[..2]).unwrap()[3], 255);
    }

    #[test]
    fn index8_is_not_convertible() {
        assert!(decode_pixel(PixelFormat::Index8, &[0]).is_err());
    }

    #[test]
    fn convert_respects_pitches() {
        // 2x2 ARGB8888 with an 12-byte source pitch into RGB565 with a 6-byte pitch.
        let mut src = vec![0u8; 24];
        for (i, px) in [[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255], [255, 255, 255, 255]]
            .iter()
            .enumerate()
        {
            let off = (i / 2) * 12 + (i % 2) * 4;
            encode_pixel(PixelFormat::Argb8888, *px, &mut src[off..]).unwrap();
        }
        let mut dst = vec![0xAAu8; 12];
        convert_pixels(2, 2, PixelFormat::Argb8888, &src, 12, PixelFormat::Rgb565, &mut dst, 6)
            .unwrap();

        assert_eq!(u16::from_le_bytes([dst[0], dst[1]]), 0xF800);
        assert_eq!(u16::from_le_bytes([dst[2], dst[3]]), 0x07E0);
        assert_eq!(u16::from_le_bytes([dst[6], dst[7]]), 0x001F);
        assert_eq!(u16::from_le_bytes([dst[8], dst[9]]), 0xFFFF);
        // Row padding is untouched.
        assert_eq!(&dst[4..6], &[0xAA, 0xAA]);
    }

    #[test]
    fn convert_rejects_short_buffers() {
        let src = [0u8; 4];
        let mut dst = [0u8; 16];
        assert_eq!(
            convert_pixels(2, 2, PixelFormat::Argb8888, &src, 8, PixelFormat::Argb8888, &mut dst, 8),
            Err(RenderError::InvalidPixelBuffer { needed: 16, got: 4, pitch: 8 })
        );
        assert_eq!(
            convert_pixels(2, 2, PixelFormat::Argb8888, &dst.clone(), 8, PixelFormat::Rgb565, &mut dst[..5], 4),
            Err(RenderError::InvalidPixelBuffer { needed: 8, got: 5, pitch: 4 })
        );
    }

    #[test]
    fn pack_argb_targets_surface_layout() {
        assert_eq!(pack_argb(PixelFormat::Rgb565, 0xFF00_FF00).unwrap(), vec![0xE0, 0x07]);
        assert_eq!(
            pack_argb(PixelFormat::Argb8888, 0x8011_2233).unwrap(),
            vec![0x33, 0x22, 0x11, 0x80]
        );
    }
}
