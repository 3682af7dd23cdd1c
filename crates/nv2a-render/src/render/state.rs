use crate::coords::{FColor, Rect};
use crate::texture::TextureId;

use super::BlendMode;

/// Which register-combiner program is loaded.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CombinerMode {
    /// Output is the interpolated vertex colour.
    Unlit,
    /// Output is texture stage 0 modulated by the vertex colour.
    Textured,
}

/// Last-known device state, used to skip redundant method submissions.
///
/// `None` in a cached field means "unknown": the next draw must emit it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    pub viewport: Rect,
    pub clip_rect: Rect,
    pub draw_color: FColor,
    pub blend: Option<BlendMode>,
    pub texture: Option<TextureId>,
    pub combiner: Option<CombinerMode>,
    pub scissor: Option<Rect>,
    /// Bound render target; `None` is the back buffer.
    pub target: Option<TextureId>,
}

impl RenderState {
    /// State right after the init sequence on a `bounds`-sized back buffer.
    pub fn new(bounds: Rect) -> Self {
        Self {
            viewport: bounds,
            clip_rect: bounds,
            draw_color: FColor::WHITE,
            blend: Some(BlendMode::Blend),
            texture: None,
            combiner: Some(CombinerMode::Unlit),
            scissor: Some(bounds),
            target: None,
        }
    }

    /// Forgets everything that is cached on the device.
    ///
    /// Viewport, clip and target stay: they describe what the caller asked
    /// for, not what was emitted.
    pub fn invalidate(&mut self) {
        self.blend = None;
        self.texture = None;
        self.combiner = None;
        self.scissor = None;
    }

    /// Scissor for the current viewport and clip inside a `width × height` target.
    pub fn effective_scissor(&self, width: u32, height: u32) -> Rect {
        self.viewport.intersect(self.clip_rect).clamp_to(width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scissor_is_clamped_intersection() {
        let mut s = RenderState::new(Rect::from_size(640, 480));
        s.viewport = Rect::new(-20, 100, 400, 500);
        s.clip_rect = Rect::new(10, 50, 1000, 200);
        assert_eq!(s.effective_scissor(640, 480), Rect::new(10, 100, 370, 150));
    }

    #[test]
    fn scissor_shrinks_to_smaller_target() {
        let s = RenderState::new(Rect::from_size(640, 480));
        assert_eq!(s.effective_scissor(64, 32), Rect::new(0, 0, 64, 32));
    }

    #[test]
    fn invalidate_keeps_requested_geometry() {
        let mut s = RenderState::new(Rect::from_size(640, 480));
        s.invalidate();
        assert_eq!(s.viewport, Rect::from_size(640, 480));
        assert_eq!(s.blend, None);
        assert_eq!(s.scissor, None);
    }
}
