//! Linear ↔ tiled texel reordering.
//!
//! The sampler reads tiled textures in Morton order: the byte offset of texel
//! `(x, y)` interleaves the bits of `x` and `y` (x first) for as long as both
//! axes still have bits, then continues with the remaining bits of the longer
//! axis. The tiled image always covers the power-of-two enclosing size of
//! the logical image; texels outside the logical rectangle are padding and are
//! never written.

/// Bit masks selecting which address bits belong to x and which to y.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct Masks {
    x: u32,
    y: u32,
}

impl Masks {
    fn new(width: usize, height: usize) -> Self {
        let (mut x, mut y) = (0u32, 0u32);
        let mut bit = 1usize;
        let mut mask_bit = 1u32;
        loop {
            let mut done = true;
            if bit < width {
                x |= mask_bit;
                mask_bit <<= 1;
                done = false;
            }
            if bit < height {
                y |= mask_bit;
                mask_bit <<= 1;
                done = false;
            }
            bit <<= 1;
            if done {
                break;
            }
        }
        Self { x, y }
    }

    #[inline]
    fn offset(self, x: usize, y: usize) -> usize {
        (deposit(self.x, x as u32) | deposit(self.y, y as u32)) as usize
    }
}

/// Scatters the low bits of `value` into the set bits of `mask`, lowest first.
#[inline]
fn deposit(mask: u32, mut value: u32) -> u32 {
    let mut out = 0;
    let mut m = mask;
    while m != 0 && value != 0 {
        let lowest = m & m.wrapping_neg();
        if value & 1 != 0 {
            out |= lowest;
        }
        value >>= 1;
        m &= m - 1;
    }
    out
}

/// Bytes needed to hold the tiled form of a `width × height` image.
pub fn tiled_size(width: usize, height: usize, bytes_per_pixel: usize) -> usize {
    width.next_power_of_two() * height.next_power_of_two() * bytes_per_pixel
}

/// Reorders a linear image (`src_pitch` bytes per row) into tiled order in `dst`.
///
/// # Panics
/// Panics if `src` is shorter than the pitched image or `dst` is shorter than
/// [`tiled_size`].
pub fn swizzle_rect(
    src: &[u8],
    width: usize,
    height: usize,
    src_pitch: usize,
    dst: &mut [u8],
    bytes_per_pixel: usize,
) {
    if width == 0 || height == 0 {
        return;
    }
    let masks = Masks::new(width, height);
    let row = width * bytes_per_pixel;
    for y in 0..height {
        let line = &src[y * src_pitch..y * src_pitch + row];
        for (x, texel) in line.chunks_exact(bytes_per_pixel).enumerate() {
            let at = masks.offset(x, y) * bytes_per_pixel;
            dst[at..at + bytes_per_pixel].copy_from_slice(texel);
        }
    }
}

/// Inverse of [`swizzle_rect`]: writes a linear image with `dst_pitch` bytes per row.
///
/// Bytes of `dst` between the end of a row and the next pitch boundary are
/// left untouched.
pub fn unswizzle_rect(
    src: &[u8],
    width: usize,
    height: usize,
    dst: &mut [u8],
    dst_pitch: usize,
    bytes_per_pixel: usize,
) {
    if width == 0 || height == 0 {
        return;
    }
    let masks = Masks::new(width, height);
    let row = width * bytes_per_pixel;
    for y in 0..height {
        let line = &mut dst[y * dst_pitch..y * dst_pitch + row];
        for (x, texel) in line.chunks_exact_mut(bytes_per_pixel).enumerate() {
            let at = masks.offset(x, y) * bytes_per_pixel;
            texel.copy_from_slice(&src[at..at + bytes_per_pixel]);
        }
    }
}
