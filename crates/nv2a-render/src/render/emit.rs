//! Typed method emitters.
//!
//! Each function appends one logical state change to a [`PushEncoder`]. No
//! caching happens here; callers decide when a change is needed.

use crate::coords::{FColor, Rect};
use crate::device::nv097::{self, CombinerInput, Primitive, VertexType};
use crate::device::PushEncoder;
use crate::texture::{AddressMode, ScaleMode, Texture};

use super::state::CombinerMode;
use super::vertex::VertexLayout;
use super::BlendMode;

const IDENTITY: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// Texture stage used for all sampling.
const STAGE: u32 = 0;

#[inline]
const fn texture_reg(method: u32) -> u32 {
    method + STAGE * nv097::TEXTURE_STAGE_STRIDE
}

// ── raster state ──────────────────────────────────────────────────────────

/// Window clip covering `rect`.
pub(crate) fn scissor(enc: &mut PushEncoder, rect: Rect) {
    enc.push1(nv097::SET_WINDOW_CLIP_TYPE, 0)
        .push1(nv097::SET_WINDOW_CLIP_HORIZONTAL, nv097::span(rect.x as u32, rect.w as u32))
        .push1(nv097::SET_WINDOW_CLIP_VERTICAL, nv097::span(rect.y as u32, rect.h as u32));
}

pub(crate) fn viewport_offset(enc: &mut PushEncoder, x: f32, y: f32) {
    enc.push_f32(nv097::SET_VIEWPORT_OFFSET, &[x, y, 0.0, 0.0]);
}

pub(crate) fn blend(enc: &mut PushEncoder, mode: BlendMode) {
    let (src, dst) = mode.factors();
    enc.push1(nv097::SET_BLEND_FUNC_SFACTOR, src as u32)
        .push1(nv097::SET_BLEND_FUNC_DFACTOR, dst as u32)
        .push1(nv097::SET_BLEND_EQUATION, nv097::FUNC_ADD);
}

/// Constant diffuse colour used when no colour stream is bound.
pub(crate) fn draw_color(enc: &mut PushEncoder, color: FColor) {
    enc.push_f32(nv097::SET_VERTEX_DATA4F_DIFFUSE, &color.to_array());
}

/// Fills `bounds` of the bound colour surface with `argb`.
pub(crate) fn clear(enc: &mut PushEncoder, bounds: Rect, argb: u32) {
    enc.push1(nv097::SET_CLEAR_RECT_HORIZONTAL, nv097::span(bounds.x as u32, bounds.w as u32))
        .push1(nv097::SET_CLEAR_RECT_VERTICAL, nv097::span(bounds.y as u32, bounds.h as u32))
        .push1(nv097::SET_COLOR_CLEAR_VALUE, argb)
        .push1(nv097::CLEAR_SURFACE, nv097::CLEAR_SURFACE_COLOR);
}

/// Drains the pipeline before the CPU touches the framebuffer.
pub(crate) fn idle_barrier(enc: &mut PushEncoder) {
    enc.push1(nv097::NO_OPERATION, 0).push1(nv097::WAIT_FOR_IDLE, 0);
}

// ── combiners ─────────────────────────────────────────────────────────────

/// Loads a single-stage combiner setup writing `A*B` of stage 0 to the output.
pub(crate) fn combiner_init(enc: &mut PushEncoder) {
    enc.push1(nv097::SET_SHADER_OTHER_STAGE_INPUT, 0)
        .push1(nv097::SET_SHADER_STAGE_PROGRAM, nv097::SHADER_PROGRAM_NONE)
        .push1(nv097::SET_COMBINER_COLOR_OCW, nv097::combiner_ocw(0x4))
        .push1(nv097::SET_COMBINER_ALPHA_OCW, nv097::combiner_ocw(0x4))
        .push1(nv097::SET_COMBINER_CONTROL, 1)
        .push1(nv097::SET_COMBINER_SPECULAR_FOG_CW0, 0x04)
        .push1(nv097::SET_COMBINER_SPECULAR_FOG_CW1, 0x14 << 8);
}

/// Selects which inputs feed stage 0.
pub(crate) fn combiner(enc: &mut PushEncoder, mode: CombinerMode) {
    let diffuse = CombinerInput::new(nv097::COMBINER_SRC_DIFFUSE, false, nv097::COMBINER_MAP_IDENTITY);
    let zero = CombinerInput::ZERO;

    let (program, a, b) = match mode {
        CombinerMode::Unlit => (nv097::SHADER_PROGRAM_NONE, diffuse, CombinerInput::ONE),
        CombinerMode::Textured => {
            let texel = CombinerInput::new(nv097::COMBINER_SRC_TEXTURE0, false, nv097::COMBINER_MAP_IDENTITY);
            (nv097::SHADER_PROGRAM_2D_PROJECTIVE, texel, diffuse)
        }
    };

    enc.push1(nv097::SET_SHADER_OTHER_STAGE_INPUT, 0)
        .push1(nv097::SET_SHADER_STAGE_PROGRAM, program)
        .push1(nv097::SET_COMBINER_COLOR_ICW, nv097::combiner_icw(a, b, zero, zero))
        .push1(
            nv097::SET_COMBINER_ALPHA_ICW,
            nv097::combiner_icw(a.with_alpha(), b.with_alpha(), zero.with_alpha(), zero.with_alpha()),
        );
}

// ── textures ──────────────────────────────────────────────────────────────

pub(crate) fn texture_filter(enc: &mut PushEncoder, filter: ScaleMode) {
    let code = filter.filter_code();
    enc.push1(texture_reg(nv097::SET_TEXTURE_FILTER), nv097::texture_filter(code, code));
}

pub(crate) fn texture_address(enc: &mut PushEncoder, u: AddressMode, v: AddressMode) {
    enc.push1(texture_reg(nv097::SET_TEXTURE_ADDRESS), nv097::texture_address(u.code(), v.code()));
}

/// Points stage 0 at `texture` and programs its sampling state.
pub(crate) fn bind_texture(enc: &mut PushEncoder, texture: &Texture, filter: ScaleMode, u: AddressMode, v: AddressMode) {
    let layout = &texture.layout;
    let (log_u, log_v) = if layout.tiled {
        (layout.backing_width.trailing_zeros(), layout.backing_height.trailing_zeros())
    } else {
        (0, 0)
    };

    enc.push1(texture_reg(nv097::SET_TEXTURE_OFFSET), texture.physical_address())
        .push1(
            texture_reg(nv097::SET_TEXTURE_FORMAT),
            nv097::texture_format(layout.native.code(), log_u, log_v),
        );
    texture_address(enc, u, v);
    enc.push1(texture_reg(nv097::SET_TEXTURE_CONTROL0), nv097::TEXTURE_CONTROL0_ENABLE)
        .push1(texture_reg(nv097::SET_TEXTURE_CONTROL1), nv097::texture_control1(layout.pitch as u32))
        .push1(
            texture_reg(nv097::SET_TEXTURE_IMAGE_RECT),
            nv097::texture_image_rect(texture.width, texture.height),
        );
    texture_filter(enc, filter);
}

// ── vertex arrays ─────────────────────────────────────────────────────────

/// Disables every vertex attribute stream.
pub(crate) fn clear_attribute_pointers(enc: &mut PushEncoder) {
    let count = nv097::ATTRIBUTE_COUNT as usize;
    let disabled = nv097::vertex_array_format(VertexType::Float, 0, 0);
    enc.push(nv097::SET_VERTEX_DATA_ARRAY_FORMAT, &vec![disabled; count])
        .push(nv097::SET_VERTEX_DATA_ARRAY_OFFSET, &vec![0; count]);
}

/// Enables the streams of `V` reading records at `base`.
pub(crate) fn attribute_pointers<V: VertexLayout>(enc: &mut PushEncoder, base: u32) {
    let stride = V::stride();
    for attr in V::ATTRIBUTES {
        enc.push1(
            nv097::SET_VERTEX_DATA_ARRAY_FORMAT + attr.slot * 4,
            nv097::vertex_array_format(attr.ty, attr.size, stride),
        )
        .push1(nv097::SET_VERTEX_DATA_ARRAY_OFFSET + attr.slot * 4, base + attr.offset);
    }
}

/// Draws `count` vertices from the bound arrays in batches of [`nv097::MAX_BATCH`].
pub(crate) fn draw_arrays(enc: &mut PushEncoder, primitive: Primitive, count: u32) {
    enc.push1(nv097::SET_BEGIN_END, primitive as u32);
    let mut start = 0;
    while start < count {
        let batch = (count - start).min(nv097::MAX_BATCH);
        enc.push1(nv097::DRAW_ARRAYS, nv097::draw_arrays(start, batch));
        start += batch;
    }
    enc.push1(nv097::SET_BEGIN_END, Primitive::End as u32);
}

// ── surfaces ──────────────────────────────────────────────────────────────

/// Colour surface registers for a render-target switch.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct SurfaceBinding {
    pub dma_channel: u32,
    pub address: u32,
    pub pitch: u32,
    pub zeta_pitch: u32,
    pub width: u32,
    pub height: u32,
    pub format: u32,
}

pub(crate) fn bind_surface(enc: &mut PushEncoder, s: SurfaceBinding) {
    enc.push1(nv097::WAIT_FOR_IDLE, 0)
        .push1(nv097::SET_CONTEXT_DMA_COLOR, s.dma_channel)
        .push1(nv097::SET_SURFACE_PITCH, nv097::surface_pitch(s.pitch, s.zeta_pitch))
        .push1(nv097::SET_SURFACE_COLOR_OFFSET, s.address)
        .push1(nv097::SET_SURFACE_CLIP_HORIZONTAL, nv097::span(0, s.width))
        .push1(nv097::SET_SURFACE_CLIP_VERTICAL, nv097::span(0, s.height))
        .push1(nv097::SET_SURFACE_FORMAT, nv097::surface_format(s.format));
}

// ── init ──────────────────────────────────────────────────────────────────

/// Puts the fixed-function pipeline into the 2D state the renderer assumes:
/// unlit combiner, straight alpha blending, no depth, lighting, culling or
/// texgen, identity transforms, and a full-surface viewport and scissor.
pub(crate) fn init_state(enc: &mut PushEncoder, bounds: Rect) {
    combiner_init(enc);
    combiner(enc, CombinerMode::Unlit);

    enc.push_bool(nv097::SET_BLEND_ENABLE, true)
        .push_bool(nv097::SET_DEPTH_TEST_ENABLE, false);
    blend(enc, BlendMode::Blend);
    enc.push1(nv097::SET_DEPTH_FUNC, nv097::DEPTH_FUNC_LEQUAL)
        .push1(nv097::SET_SKIN_MODE, nv097::SKIN_MODE_OFF)
        .push_bool(nv097::SET_NORMALIZATION_ENABLE, false)
        .push_bool(nv097::SET_LIGHTING_ENABLE, false)
        .push_bool(nv097::SET_CULL_FACE_ENABLE, false)
        .push1(nv097::SET_CLEAR_RECT_VERTICAL, nv097::span(0, bounds.h as u32))
        .push1(nv097::SET_CLEAR_RECT_HORIZONTAL, nv097::span(0, bounds.w as u32));

    for stage in 0..nv097::TEXTURE_STAGES {
        let texgen = stage * nv097::TEXGEN_STAGE_STRIDE;
        enc.push1(nv097::SET_TEXGEN_S + texgen, nv097::TEXGEN_DISABLE)
            .push1(nv097::SET_TEXGEN_T + texgen, nv097::TEXGEN_DISABLE)
            .push1(nv097::SET_TEXGEN_R + texgen, nv097::TEXGEN_DISABLE)
            .push1(nv097::SET_TEXGEN_Q + texgen, nv097::TEXGEN_DISABLE)
            .push_bool(nv097::SET_TEXTURE_MATRIX_ENABLE + stage * 4, false)
            .push_f32(nv097::SET_TEXTURE_MATRIX + stage * nv097::TEXTURE_MATRIX_STRIDE, &IDENTITY);
    }

    for weight in 0..nv097::WEIGHT_COUNT {
        let at = weight * nv097::MODEL_VIEW_STRIDE;
        enc.push_f32(nv097::SET_MODEL_VIEW_MATRIX + at, &IDENTITY)
            .push_f32(nv097::SET_INVERSE_MODEL_VIEW_MATRIX + at, &IDENTITY);
    }

    enc.push1(
        nv097::SET_TRANSFORM_EXECUTION_MODE,
        nv097::transform_execution_mode(nv097::TRANSFORM_MODE_FIXED, nv097::TRANSFORM_RANGE_PRIVATE),
    )
    .push_f32(nv097::SET_PROJECTION_MATRIX, &IDENTITY)
    .push_f32(nv097::SET_COMPOSITE_MATRIX, &IDENTITY);
    viewport_offset(enc, 0.0, 0.0);
    enc.push_f32(nv097::SET_VIEWPORT_SCALE, &[1.0, 1.0, 1.0, 1.0]);
    scissor(enc, bounds);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::decode_methods;
    use crate::render::vertex::TexturedVertex;

    fn methods(enc: &PushEncoder) -> Vec<u32> {
        decode_methods(enc.words()).unwrap().into_iter().map(|c| c.method).collect()
    }

    #[test]
    fn draw_arrays_batches_by_256() {
        let mut enc = PushEncoder::new();
        draw_arrays(&mut enc, Primitive::Triangles, 600);
        let calls = decode_methods(enc.words()).unwrap();
        let batches: Vec<(u32, u32)> = calls
            .iter()
            .filter(|c| c.method == nv097::DRAW_ARRAYS)
            .map(|c| nv097::unpack_draw_arrays(c.args[0]))
            .collect();
        assert_eq!(batches, vec![(0, 256), (256, 256), (512, 88)]);
        assert_eq!(calls.first().unwrap().args, vec![Primitive::Triangles as u32]);
        assert_eq!(calls.last().unwrap().args, vec![0]);
    }

    #[test]
    fn textured_pointers_cover_three_streams() {
        let mut enc = PushEncoder::new();
        attribute_pointers::<TexturedVertex>(&mut enc, 0x0200_0000);
        let calls = decode_methods(enc.words()).unwrap();
        let offsets: Vec<u32> = calls
            .iter()
            .filter(|c| (nv097::SET_VERTEX_DATA_ARRAY_OFFSET..nv097::SET_VERTEX_DATA_ARRAY_FORMAT).contains(&c.method))
            .map(|c| c.args[0])
            .collect();
        assert_eq!(offsets, vec![0x0200_0000, 0x0200_0008, 0x0200_000C]);
    }

    #[test]
    fn blend_emits_factors_and_equation() {
        let mut enc = PushEncoder::new();
        blend(&mut enc, BlendMode::Add);
        assert_eq!(
            methods(&enc),
            vec![nv097::SET_BLEND_FUNC_SFACTOR, nv097::SET_BLEND_FUNC_DFACTOR, nv097::SET_BLEND_EQUATION]
        );
    }

    #[test]
    fn init_ends_with_full_scissor() {
        let mut enc = PushEncoder::new();
        init_state(&mut enc, Rect::from_size(640, 480));
        let calls = decode_methods(enc.words()).unwrap();
        let h = calls.iter().rfind(|c| c.method == nv097::SET_WINDOW_CLIP_HORIZONTAL).unwrap();
        assert_eq!(h.args, vec![nv097::span(0, 640)]);
        assert!(calls.iter().any(|c| c.method == nv097::SET_BLEND_ENABLE && c.args == [1]));
    }
}
