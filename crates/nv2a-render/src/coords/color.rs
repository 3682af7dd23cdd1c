/// Straight-alpha floating point colour, channels nominally in `[0, 1]`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl FColor {
    pub const WHITE: FColor = FColor::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: FColor = FColor::new(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: FColor = FColor::new(0.0, 0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    /// Packs into the vertex colour word: R in the low byte, then G, B, A.
    ///
    /// `color_scale` multiplies RGB only. Each channel saturates at 255;
    /// negative and NaN inputs become 0.
    #[inline]
    pub fn pack_vertex(self, color_scale: f32) -> u32 {
        let r = quantize(self.r * color_scale);
        let g = quantize(self.g * color_scale);
        let b = quantize(self.b * color_scale);
        let a = quantize(self.a);
        r | (g << 8) | (b << 16) | (a << 24)
    }

    /// Packs as `0xAARRGGBB`, the layout of the surface clear value.
    #[inline]
    pub fn pack_argb(self) -> u32 {
        (quantize(self.a) << 24) | (quantize(self.r) << 16) | (quantize(self.g) << 8) | quantize(self.b)
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[inline]
fn quantize(v: f32) -> u32 {
    // Float → int casts saturate: NaN and negatives land on 0.
    ((v * 255.0) as u32).min(255)
}
