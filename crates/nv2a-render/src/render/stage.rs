//! Geometry staging: turns caller-side attribute arrays into packed vertex records.
//!
//! Everything here is validated before a single arena byte is reserved, so a
//! rejected draw leaves the arena untouched.

use crate::coords::{FColor, Vec2};
use crate::error::{RenderError, Result};
use crate::texture::{AddressMode, ScaleMode, TextureId};

use super::vertex::{ColorVertex, PointVertex, TexturedVertex};
use super::BlendMode;

/// Optional index buffer of a geometry draw.
#[derive(Debug, Copy, Clone, Default)]
pub enum Indices<'a> {
    #[default]
    None,
    U8(&'a [u8]),
    U16(&'a [u16]),
    U32(&'a [u32]),
}

impl Indices<'_> {
    /// Vertices drawn when `vertices` attributes are supplied.
    pub fn draw_count(&self, vertices: usize) -> usize {
        match self {
            Indices::None => vertices,
            Indices::U8(i) => i.len(),
            Indices::U16(i) => i.len(),
            Indices::U32(i) => i.len(),
        }
    }

    #[inline]
    fn get(&self, n: usize) -> usize {
        match self {
            Indices::None => n,
            Indices::U8(i) => i[n] as usize,
            Indices::U16(i) => i[n] as usize,
            Indices::U32(i) => i[n] as usize,
        }
    }

    fn max(&self) -> Option<usize> {
        match self {
            Indices::None => None,
            Indices::U8(i) => i.iter().max().map(|&v| v as usize),
            Indices::U16(i) => i.iter().max().map(|&v| v as usize),
            Indices::U32(i) => i.iter().max().map(|&v| v as usize),
        }
    }
}

/// A triangle-list draw as the caller describes it.
///
/// `xy`, `colors` and (when textured) `uv` are parallel arrays. Positions
/// are multiplied by `scale`; colours have `color_scale` applied to RGB.
#[derive(Debug, Copy, Clone)]
pub struct GeometryInput<'a> {
    pub texture: Option<TextureId>,
    pub xy: &'a [Vec2],
    pub colors: &'a [FColor],
    pub uv: &'a [Vec2],
    pub indices: Indices<'a>,
    pub scale: Vec2,
    pub color_scale: f32,
    pub blend: BlendMode,
    pub filter: ScaleMode,
    pub address_u: AddressMode,
    pub address_v: AddressMode,
}

impl<'a> GeometryInput<'a> {
    /// Untextured, non-indexed geometry with unit scales and straight alpha blending.
    pub fn new(xy: &'a [Vec2], colors: &'a [FColor]) -> Self {
        Self {
            texture: None,
            xy,
            colors,
            uv: &[],
            indices: Indices::None,
            scale: Vec2::splat(1.0),
            color_scale: 1.0,
            blend: BlendMode::Blend,
            filter: ScaleMode::Linear,
            address_u: AddressMode::Clamp,
            address_v: AddressMode::Clamp,
        }
    }

    pub fn textured(mut self, texture: TextureId, uv: &'a [Vec2]) -> Self {
        self.texture = Some(texture);
        self.uv = uv;
        self
    }

    pub fn indexed(mut self, indices: Indices<'a>) -> Self {
        self.indices = indices;
        self
    }

    pub fn scaled(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn color_scale(mut self, color_scale: f32) -> Self {
        self.color_scale = color_scale;
        self
    }

    pub fn blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }

    pub fn filter(mut self, filter: ScaleMode) -> Self {
        self.filter = filter;
        self
    }

    pub fn address(mut self, u: AddressMode, v: AddressMode) -> Self {
        self.address_u = u;
        self.address_v = v;
        self
    }

    #[inline]
    pub fn draw_count(&self) -> usize {
        self.indices.draw_count(self.xy.len())
    }

    /// Checks attribute lengths, finite positions and index range.
    pub fn validate(&self) -> Result<()> {
        let n = self.xy.len();
        if self.colors.len() != n {
            return Err(RenderError::InvalidGeometry(format!(
                "{} colours for {n} positions",
                self.colors.len()
            )));
        }
        if self.texture.is_some() && self.uv.len() != n {
            return Err(RenderError::InvalidGeometry(format!(
                "{} texture coordinates for {n} positions",
                self.uv.len()
            )));
        }
        if let Some(at) = self.xy.iter().position(|p| !p.is_finite()) {
            return Err(RenderError::InvalidGeometry(format!("position {at} is not finite")));
        }
        if let Some(max) = self.indices.max() {
            if max >= n {
                return Err(RenderError::InvalidGeometry(format!(
                    "index {max} out of range for {n} vertices"
                )));
            }
        }
        Ok(())
    }
}

/// Packs an untextured draw. Call [`GeometryInput::validate`] first.
pub(crate) fn stage_colored(input: &GeometryInput<'_>) -> Vec<ColorVertex> {
    (0..input.draw_count())
        .map(|n| {
            let j = input.indices.get(n);
            ColorVertex {
                pos: input.xy[j].scale(input.scale).to_array(),
                color: input.colors[j].pack_vertex(input.color_scale),
            }
        })
        .collect()
}

/// Packs a textured draw, mapping UVs into the sampler's coordinate space.
pub(crate) fn stage_textured(input: &GeometryInput<'_>, uv_scale: Vec2) -> Vec<TexturedVertex> {
    (0..input.draw_count())
        .map(|n| {
            let j = input.indices.get(n);
            TexturedVertex {
                pos: input.xy[j].scale(input.scale).to_array(),
                color: input.colors[j].pack_vertex(input.color_scale),
                uv: input.uv[j].scale(uv_scale).to_array(),
            }
        })
        .collect()
}

pub(crate) fn stage_points(points: &[Vec2]) -> Vec<PointVertex> {
    points.iter().map(|p| PointVertex { pos: p.to_array() }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri() -> ([Vec2; 3], [FColor; 3]) {
        (
            [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)],
            [FColor::WHITE, FColor::new(1.0, 0.0, 0.0, 1.0), FColor::TRANSPARENT],
        )
    }

    // ── validation ────────────────────────────────────────────────────────

    #[test]
    fn mismatched_colours_are_rejected() {
        let (xy, colors) = tri();
        let input = GeometryInput::new(&xy, &colors[..2]);
        assert!(matches!(input.validate(), Err(RenderError::InvalidGeometry(_))));
    }

    #[test]
    fn missing_uv_for_textured_draw_is_rejected() {
        let (xy, colors) = tri();
        let input = GeometryInput::new(&xy, &colors).textured(TextureId(1), &[]);
        assert!(input.validate().is_err());
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let (xy, colors) = tri();
        let input = GeometryInput::new(&xy, &colors).indexed(Indices::U16(&[0, 1, 3]));
        assert!(matches!(input.validate(), Err(RenderError::InvalidGeometry(_))));
    }

    #[test]
    fn non_finite_position_is_rejected() {
        let (mut xy, colors) = tri();
        xy[1].x = f32::NAN;
        assert!(matches!(
            GeometryInput::new(&xy, &colors).validate(),
            Err(RenderError::InvalidGeometry(_))
        ));
    }

    // ── packing ───────────────────────────────────────────────────────────

    #[test]
    fn indices_resolve_before_packing() {
        let (xy, colors) = tri();
        let input = GeometryInput::new(&xy, &colors)
            .indexed(Indices::U8(&[2, 2, 1, 0]))
            .scaled(Vec2::new(2.0, 3.0));
        input.validate().unwrap();
        let v = stage_colored(&input);
        assert_eq!(v.len(), 4);
        assert_eq!(v[0].pos, [0.0, 30.0]);
        assert_eq!(v[0].color, 0);
        assert_eq!(v[2].pos, [20.0, 0.0]);
        assert_eq!(v[2].color, 0xFF00_00FF);
    }

    #[test]
    fn uv_uses_texture_scale() {
        let (xy, colors) = tri();
        let uv = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.5, 1.0)];
        let input = GeometryInput::new(&xy, &colors).textured(TextureId(1), &uv);
        let v = stage_textured(&input, Vec2::new(63.0 / 64.0, 31.0 / 32.0));
        assert_eq!(v[1].uv, [63.0 / 64.0, 0.0]);
        assert_eq!(v[2].uv, [0.5 * 63.0 / 64.0, 31.0 / 32.0]);
    }

    #[test]
    fn u32_indices_count_draws() {
        let idx = [0u32, 1, 2, 2, 1, 0];
        assert_eq!(Indices::U32(&idx).draw_count(3), 6);
        assert_eq!(Indices::None.draw_count(3), 3);
    }
}
