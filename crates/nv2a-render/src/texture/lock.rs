/// Write access to a locked region of a linear texture.
///
/// `pixels()` starts at the locked rectangle's top-left texel; rows are
/// [`pitch`](Self::pitch) bytes apart and the slice runs to the end of the
/// texture's storage. Dropping the guard (or calling [`unlock`](Self::unlock))
/// ends the lock.
#[derive(Debug)]
pub struct TextureLock<'a> {
    pixels: &'a mut [u8],
    pitch: usize,
}

impl<'a> TextureLock<'a> {
    pub(crate) fn new(pixels: &'a mut [u8], pitch: usize) -> Self {
        Self { pixels, pitch }
    }

    #[inline]
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &*self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut *self.pixels
    }

    /// Mutable row `y` of the locked region, `len` bytes long.
    pub fn row_mut(&mut self, y: usize, len: usize) -> Option<&mut [u8]> {
        let start = y.checked_mul(self.pitch)?;
        self.pixels.get_mut(start..start.checked_add(len)?)
    }

    pub fn unlock(self) {}
}
