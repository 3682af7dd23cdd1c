/// Portable pixel formats understood by the backend.
///
/// Names describe the packed 16/32-bit value from the most significant
/// channel down (`Argb8888` is `0xAARRGGBB` stored little-endian), except
/// `Rgb24`, which is three bytes in R, G, B memory order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PixelFormat {
    Argb1555,
    Xrgb1555,
    Rgb565,
    Argb4444,
    Argb8888,
    Xrgb8888,
    Rgba8888,
    Abgr8888,
    Bgra8888,
    Rgb24,
    Index8,
}

impl PixelFormat {
    /// Storage size of one pixel in bytes.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Index8 => 1,
            PixelFormat::Argb1555
            | PixelFormat::Xrgb1555
            | PixelFormat::Rgb565
            | PixelFormat::Argb4444 => 2,
            PixelFormat::Rgb24 => 3,
            PixelFormat::Argb8888
            | PixelFormat::Xrgb8888
            | PixelFormat::Rgba8888
            | PixelFormat::Abgr8888
            | PixelFormat::Bgra8888 => 4,
        }
    }

    /// Significant bits per pixel, padding bits excluded.
    #[inline]
    pub const fn bits_per_pixel(self) -> u32 {
        match self {
            PixelFormat::Index8 => 8,
            PixelFormat::Argb1555 | PixelFormat::Rgb565 | PixelFormat::Argb4444 => 16,
            PixelFormat::Xrgb1555 => 15,
            PixelFormat::Rgb24 | PixelFormat::Xrgb8888 => 24,
            PixelFormat::Argb8888
            | PixelFormat::Rgba8888
            | PixelFormat::Abgr8888
            | PixelFormat::Bgra8888 => 32,
        }
    }

    #[inline]
    pub const fn has_alpha(self) -> bool {
        matches!(
            self,
            PixelFormat::Argb1555
                | PixelFormat::Argb4444
                | PixelFormat::Argb8888
                | PixelFormat::Rgba8888
                | PixelFormat::Abgr8888
                | PixelFormat::Bgra8888
        )
    }

    pub const fn name(self) -> &'static str {
        match self {
            PixelFormat::Argb1555 => "ARGB1555",
            PixelFormat::Xrgb1555 => "XRGB1555",
            PixelFormat::Rgb565 => "RGB565",
            PixelFormat::Argb4444 => "ARGB4444",
            PixelFormat::Argb8888 => "ARGB8888",
            PixelFormat::Xrgb8888 => "XRGB8888",
            PixelFormat::Rgba8888 => "RGBA8888",
            PixelFormat::Abgr8888 => "ABGR8888",
            PixelFormat::Bgra8888 => "BGRA8888",
            PixelFormat::Rgb24 => "RGB24",
            PixelFormat::Index8 => "INDEX8",
        }
    }

    /// Every format this enum can name.
    pub const ALL: [PixelFormat; 11] = [
        PixelFormat::Argb1555,
        PixelFormat::Xrgb1555,
        PixelFormat::Rgb565,
        PixelFormat::Argb4444,
        PixelFormat::Argb8888,
        PixelFormat::Xrgb8888,
        PixelFormat::Rgba8888,
        PixelFormat::Abgr8888,
        PixelFormat::Bgra8888,
        PixelFormat::Rgb24,
        PixelFormat::Index8,
    ];
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
