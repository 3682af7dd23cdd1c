/// Axis-aligned rectangle in integer surface pixels (top-left origin).
///
/// Width and height are signed so upstream input can be carried as-is;
/// [`Rect::is_empty`] treats non-positive sizes as empty.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    #[inline]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle anchored at the origin covering a `width × height` surface.
    #[inline]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    /// Far horizontal edge, saturating at `i32::MAX`.
    #[inline]
    pub const fn right(self) -> i32 {
        self.x.saturating_add(self.w)
    }

    #[inline]
    pub const fn bottom(self) -> i32 {
        self.y.saturating_add(self.h)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Geometric intersection.
    ///
    /// Disjoint or touching rectangles produce an empty rectangle positioned at
    /// the overlap's top-left corner with zero size.
    #[inline]
    pub fn intersect(self, other: Rect) -> Rect {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        Rect::new(x0, y0, span(x0, x1), span(y0, y1))
    }

    /// Clamps into `[0, width] × [0, height]`.
    ///
    /// The origin is clamped first, then the extent is shortened so the
    /// rectangle never crosses the far edges. Negative sizes become zero.
    #[inline]
    pub fn clamp_to(self, width: u32, height: u32) -> Rect {
        let (bw, bh) = (width as i32, height as i32);
        let x = self.x.clamp(0, bw);
        let y = self.y.clamp(0, bh);
        let w = self.w.max(0).min(bw - x);
        let h = self.h.max(0).min(bh - y);
        Rect::new(x, y, w, h)
    }

    /// Whether `self` lies entirely within a `width × height` surface.
    #[inline]
    pub fn fits_within(self, width: u32, height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.w >= 0
            && self.h >= 0
            && self.x as i64 + self.w as i64 <= width as i64
            && self.y as i64 + self.h as i64 <= height as i64
    }
}

/// Length of `[from, to)`, zero when inverted, saturating at `i32::MAX`.
#[inline]
fn span(from: i32, to: i32) -> i32 {
    (to as i64 - from as i64).clamp(0, i32::MAX as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: i32, y: i32, w: i32, h: i32) -> Rect {
        Rect::new(x, y, w, h)
    }

    // ── intersect ─────────────────────────────────────────────────────────

    #[test]
    fn intersect_overlapping() {
        assert_eq!(r(0, 0, 10, 10).intersect(r(5, 5, 10, 10)), r(5, 5, 5, 5));
    }

    #[test]
    fn intersect_contained() {
        let inner = r(10, 10, 20, 20);
        assert_eq!(r(0, 0, 100, 100).intersect(inner), inner);
    }

    #[test]
    fn intersect_is_symmetric() {
        let a = r(-4, 3, 17, 9);
        let b = r(2, -1, 8, 30);
        assert_eq!(a.intersect(b), b.intersect(a));
    }

    #[test]
    fn intersect_disjoint_is_empty() {
        let i = r(0, 0, 5, 5).intersect(r(20, 20, 5, 5));
        assert!(i.is_empty());
        assert_eq!((i.w, i.h), (0, 0));
    }

    #[test]
    fn intersect_touching_edge_is_empty() {
        assert!(r(0, 0, 10, 10).intersect(r(10, 0, 10, 10)).is_empty());
    }

    // ── clamp_to ──────────────────────────────────────────────────────────

    #[test]
    fn clamp_inside_is_identity() {
        let rect = r(10, 20, 30, 40);
        assert_eq!(rect.clamp_to(640, 480), rect);
    }

    #[test]
    fn clamp_negative_origin() {
        // Origin moves to 0; the width is limited by the far edge only.
        assert_eq!(r(-10, -5, 50, 50).clamp_to(640, 480), r(0, 0, 50, 50));
    }

    #[test]
    fn clamp_overhanging_far_edge() {
        assert_eq!(r(600, 460, 100, 100).clamp_to(640, 480), r(600, 460, 40, 20));
    }

    #[test]
    fn clamp_past_far_edge_is_empty() {
        let c = r(700, 10, 10, 10).clamp_to(640, 480);
        assert_eq!(c, r(640, 10, 0, 10));
        assert!(c.is_empty());
    }

    #[test]
    fn clamp_negative_size_becomes_zero() {
        assert_eq!(r(5, 5, -3, 4).clamp_to(64, 64), r(5, 5, 0, 4));
    }

    // ── fits_within ───────────────────────────────────────────────────────

    #[test]
    fn fits_within_edges() {
        assert!(r(0, 0, 64, 64).fits_within(64, 64));
        assert!(!r(1, 0, 64, 64).fits_within(64, 64));
        assert!(!r(-1, 0, 4, 4).fits_within(64, 64));
    }

    #[test]
    fn fits_within_rejects_far_edge_past_i32() {
        assert!(!r(i32::MAX, 0, 1, 1).fits_within(64, 64));
        assert!(!r(1, 0, i32::MAX, 1).fits_within(64, 64));
        assert!(!r(0, i32::MAX, 1, i32::MAX).fits_within(u32::MAX, u32::MAX));
    }

    // ── overflow ──────────────────────────────────────────────────────────

    #[test]
    fn far_edges_saturate() {
        assert_eq!(r(i32::MAX, 0, 1, 1).right(), i32::MAX);
        assert_eq!(r(0, 100, 0, i32::MAX).bottom(), i32::MAX);
    }

    #[test]
    fn intersect_with_huge_extent_stays_bounded() {
        let i = r(100, 0, i32::MAX, 10).intersect(r(0, 0, 640, 480));
        assert_eq!(i, r(100, 0, 540, 10));
    }

    #[test]
    fn intersect_wide_span_saturates_width() {
        let i = r(-10, 0, i32::MAX, 1).intersect(r(-20, 0, i32::MAX, 1));
        assert_eq!(i, r(-10, 0, i32::MAX, 1));
    }

    #[test]
    fn huge_clip_clamps_to_surface() {
        let c = r(100, 0, i32::MAX, 10).intersect(r(0, 0, 640, 480)).clamp_to(640, 480);
        assert_eq!(c, r(100, 0, 540, 10));
    }
}
