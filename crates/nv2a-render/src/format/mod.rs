//! Pixel formats: the portable enum, its native translation, and CPU-side conversion.

mod convert;
mod native;
mod pixel;

pub use convert::{convert_pixels, decode_pixel, encode_pixel, pack_argb, Rgba8};
pub use native::{
    surface_format, texture_format, SurfaceFormat, TexelFormat, SUPPORTED_TEXTURE_FORMATS,
};
pub use pixel::PixelFormat;
