//! Kelvin (NV097) 3D class: method addresses and field packing.
//!
//! Only the subset the renderer emits is listed. Values that pack several
//! fields into one word get a small helper so call sites never shift bits by
//! hand.

/// Subchannel the 3D object is bound to.
pub const SUBCH_3D: u32 = 0;

pub const NO_OPERATION: u32 = 0x0100;
pub const WAIT_FOR_IDLE: u32 = 0x0110;
pub const SET_CONTEXT_DMA_COLOR: u32 = 0x0194;

pub const SET_SURFACE_CLIP_HORIZONTAL: u32 = 0x0200;
pub const SET_SURFACE_CLIP_VERTICAL: u32 = 0x0204;
pub const SET_SURFACE_FORMAT: u32 = 0x0208;
pub const SET_SURFACE_PITCH: u32 = 0x020C;
pub const SET_SURFACE_COLOR_OFFSET: u32 = 0x0210;

pub const SET_COMBINER_ALPHA_ICW: u32 = 0x0260;
pub const SET_COMBINER_SPECULAR_FOG_CW0: u32 = 0x0288;
pub const SET_COMBINER_SPECULAR_FOG_CW1: u32 = 0x028C;

pub const SET_WINDOW_CLIP_TYPE: u32 = 0x02B4;
pub const SET_WINDOW_CLIP_HORIZONTAL: u32 = 0x02C0;
pub const SET_WINDOW_CLIP_VERTICAL: u32 = 0x02E0;

pub const SET_BLEND_ENABLE: u32 = 0x0304;
pub const SET_CULL_FACE_ENABLE: u32 = 0x0308;
pub const SET_DEPTH_TEST_ENABLE: u32 = 0x030C;
pub const SET_LIGHTING_ENABLE: u32 = 0x0314;
pub const SET_SKIN_MODE: u32 = 0x0328;
pub const SET_BLEND_FUNC_SFACTOR: u32 = 0x0344;
pub const SET_BLEND_FUNC_DFACTOR: u32 = 0x0348;
pub const SET_BLEND_EQUATION: u32 = 0x0350;
pub const SET_DEPTH_FUNC: u32 = 0x0354;
pub const SET_NORMALIZATION_ENABLE: u32 = 0x03A4;

pub const SET_TEXGEN_S: u32 = 0x03C0;
pub const SET_TEXGEN_T: u32 = 0x03C4;
pub const SET_TEXGEN_R: u32 = 0x03C8;
pub const SET_TEXGEN_Q: u32 = 0x03CC;
/// Stride between the texgen registers of consecutive stages.
pub const TEXGEN_STAGE_STRIDE: u32 = 0x10;
pub const SET_TEXTURE_MATRIX_ENABLE: u32 = 0x0420;

pub const SET_PROJECTION_MATRIX: u32 = 0x0440;
pub const SET_MODEL_VIEW_MATRIX: u32 = 0x0480;
pub const SET_INVERSE_MODEL_VIEW_MATRIX: u32 = 0x0580;
pub const SET_COMPOSITE_MATRIX: u32 = 0x0680;
/// Stride between the model-view matrices of consecutive skinning weights.
pub const MODEL_VIEW_STRIDE: u32 = 0x40;
pub const WEIGHT_COUNT: u32 = 4;
pub const SET_TEXTURE_MATRIX: u32 = 0x06C0;
/// Stride between the 4x4 matrices of consecutive texture stages.
pub const TEXTURE_MATRIX_STRIDE: u32 = 0x40;

pub const SET_VIEWPORT_OFFSET: u32 = 0x0A20;
pub const SET_COMBINER_ALPHA_OCW: u32 = 0x0AA0;
pub const SET_COMBINER_COLOR_ICW: u32 = 0x0AC0;
pub const SET_VIEWPORT_SCALE: u32 = 0x0AF0;

pub const SET_VERTEX_DATA_ARRAY_OFFSET: u32 = 0x1720;
pub const SET_VERTEX_DATA_ARRAY_FORMAT: u32 = 0x1760;
pub const SET_BEGIN_END: u32 = 0x17FC;
pub const DRAW_ARRAYS: u32 = 0x1810;
pub const SET_VERTEX_DATA4F_DIFFUSE: u32 = 0x1A30;

pub const SET_TEXTURE_OFFSET: u32 = 0x1B00;
pub const SET_TEXTURE_FORMAT: u32 = 0x1B04;
pub const SET_TEXTURE_ADDRESS: u32 = 0x1B08;
pub const SET_TEXTURE_CONTROL0: u32 = 0x1B0C;
pub const SET_TEXTURE_CONTROL1: u32 = 0x1B10;
pub const SET_TEXTURE_FILTER: u32 = 0x1B14;
pub const SET_TEXTURE_IMAGE_RECT: u32 = 0x1B1C;
/// Stride between the texture registers of consecutive stages.
pub const TEXTURE_STAGE_STRIDE: u32 = 0x40;

pub const SET_ZSTENCIL_CLEAR_VALUE: u32 = 0x1D8C;
pub const SET_COLOR_CLEAR_VALUE: u32 = 0x1D90;
pub const CLEAR_SURFACE: u32 = 0x1D94;
pub const SET_CLEAR_RECT_HORIZONTAL: u32 = 0x1D98;
pub const SET_CLEAR_RECT_VERTICAL: u32 = 0x1D9C;

pub const SET_COMBINER_COLOR_OCW: u32 = 0x1E40;
pub const SET_COMBINER_CONTROL: u32 = 0x1E60;
pub const SET_SHADER_STAGE_PROGRAM: u32 = 0x1E70;
pub const SET_SHADER_OTHER_STAGE_INPUT: u32 = 0x1E78;
pub const SET_TRANSFORM_EXECUTION_MODE: u32 = 0x1E94;

/// Texture stages the fixed-function pipeline exposes.
pub const TEXTURE_STAGES: u32 = 4;
/// Vertex attribute slots.
pub const ATTRIBUTE_COUNT: u32 = 16;

/// Maximum vertices per `DRAW_ARRAYS` word (count is stored minus one in 8 bits).
pub const MAX_BATCH: u32 = 256;

// ── colour DMA contexts ───────────────────────────────────────────────────

/// Scan-out surfaces owned by the push-buffer library.
pub const DMA_CHANNEL_PIXEL_RENDERER: u32 = 9;
/// Whole-memory context used for render-target textures.
pub const DMA_CHANNEL_3D_3: u32 = 11;

// ── enums ─────────────────────────────────────────────────────────────────

pub const FUNC_ADD: u32 = 0x8006;
pub const DEPTH_FUNC_LEQUAL: u32 = 0x0203;
pub const TEXGEN_DISABLE: u32 = 0;
pub const SKIN_MODE_OFF: u32 = 0;

pub const TRANSFORM_MODE_FIXED: u32 = 0;
pub const TRANSFORM_RANGE_PRIVATE: u32 = 1;

#[inline]
pub const fn transform_execution_mode(mode: u32, range: u32) -> u32 {
    (mode & 0x3) | (range << 2)
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u32)]
pub enum BlendFactor {
    Zero = 0x0000,
    One = 0x0001,
    SrcColor = 0x0300,
    OneMinusSrcColor = 0x0301,
    SrcAlpha = 0x0302,
    OneMinusSrcAlpha = 0x0303,
    DstAlpha = 0x0304,
    OneMinusDstAlpha = 0x0305,
    DstColor = 0x0306,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u32)]
pub enum Primitive {
    End = 0,
    Points = 1,
    Lines = 2,
    LineStrip = 3,
    Triangles = 5,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u32)]
pub enum VertexType {
    UnsignedByteD3d = 0,
    Float = 2,
    UnsignedByteOgl = 4,
}

/// Vertex attribute slots used by the fixed-function pipeline.
pub mod slot {
    pub const POSITION: u32 = 0;
    pub const DIFFUSE: u32 = 3;
    pub const TEXCOORD0: u32 = 9;
}

pub const TEXTURE_FILTER_NEAREST: u32 = 1;
pub const TEXTURE_FILTER_LINEAR: u32 = 2;
pub const TEXTURE_CONVOLUTION_GAUSSIAN: u32 = 2;

pub const TEXTURE_ADDRESS_WRAP: u32 = 1;
pub const TEXTURE_ADDRESS_CLAMP_TO_EDGE: u32 = 3;

pub const TEXTURE_CONTROL0_ENABLE: u32 = 1 << 30;

pub const SURFACE_FORMAT_ZETA_Z24S8: u32 = 2;
pub const SURFACE_FORMAT_TYPE_PITCH: u32 = 1;

pub const SHADER_PROGRAM_NONE: u32 = 0;
pub const SHADER_PROGRAM_2D_PROJECTIVE: u32 = 1;

/// `CLEAR_SURFACE` bits selecting all four colour channels.
pub const CLEAR_SURFACE_COLOR: u32 = 0xF0;
/// `CLEAR_SURFACE` bits selecting depth and stencil.
pub const CLEAR_SURFACE_ZETA: u32 = 0x03;

// ── field packing ─────────────────────────────────────────────────────────

/// Position in the low half, extent in the high half.
///
/// Used by surface clip, window clip and clear rect registers alike.
#[inline]
pub const fn span(pos: u32, extent: u32) -> u32 {
    (pos & 0xFFFF) | ((extent & 0xFFFF) << 16)
}

/// Inverse of [`span`].
#[inline]
pub const fn unspan(word: u32) -> (u32, u32) {
    (word & 0xFFFF, word >> 16)
}

#[inline]
pub const fn surface_pitch(color: u32, zeta: u32) -> u32 {
    (color & 0xFFFF) | ((zeta & 0xFFFF) << 16)
}

#[inline]
pub const fn surface_format(color: u32) -> u32 {
    (color & 0xF) | (SURFACE_FORMAT_ZETA_Z24S8 << 4) | (SURFACE_FORMAT_TYPE_PITCH << 8)
}

/// Colour format code of a `SET_SURFACE_FORMAT` word.
#[inline]
pub const fn surface_format_color(word: u32) -> u32 {
    word & 0xF
}

/// 2D, single mip level texture in DMA context A.
#[inline]
pub const fn texture_format(color: u32, log2_width: u32, log2_height: u32) -> u32 {
    const CONTEXT_DMA_A: u32 = 1;
    const DIMENSIONALITY_2D: u32 = 2;
    const MIPMAP_LEVELS: u32 = 1;
    CONTEXT_DMA_A
        | (DIMENSIONALITY_2D << 4)
        | ((color & 0xFF) << 8)
        | (MIPMAP_LEVELS << 16)
        | ((log2_width & 0xF) << 20)
        | ((log2_height & 0xF) << 24)
}

#[inline]
pub const fn texture_address(u: u32, v: u32) -> u32 {
    (u & 0xF) | ((v & 0xF) << 8) | (TEXTURE_ADDRESS_CLAMP_TO_EDGE << 16)
}

#[inline]
pub const fn texture_control1(pitch: u32) -> u32 {
    pitch << 16
}

#[inline]
pub const fn texture_image_rect(width: u32, height: u32) -> u32 {
    (width << 16) | (height & 0xFFFF)
}

#[inline]
pub const fn texture_filter(min: u32, mag: u32) -> u32 {
    (TEXTURE_CONVOLUTION_GAUSSIAN << 13) | ((min & 0xFF) << 16) | ((mag & 0xF) << 24)
}

/// Min and mag filter fields of a `SET_TEXTURE_FILTER` word.
#[inline]
pub const fn texture_filter_fields(word: u32) -> (u32, u32) {
    ((word >> 16) & 0xFF, (word >> 24) & 0xF)
}

#[inline]
pub const fn vertex_array_format(ty: VertexType, size: u32, stride: u32) -> u32 {
    (ty as u32) | ((size & 0xF) << 4) | (stride << 8)
}

/// One `DRAW_ARRAYS` word: up to [`MAX_BATCH`] vertices starting at `start`.
#[inline]
pub const fn draw_arrays(start: u32, count: u32) -> u32 {
    ((count - 1) << 24) | (start & 0x00FF_FFFF)
}

/// Inverse of [`draw_arrays`]: `(start, count)`.
#[inline]
pub const fn unpack_draw_arrays(word: u32) -> (u32, u32) {
    (word & 0x00FF_FFFF, (word >> 24) + 1)
}

/// One register-combiner input: source register, alpha-channel select and mapping.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CombinerInput {
    pub source: u32,
    pub alpha: bool,
    pub map: u32,
}

impl CombinerInput {
    pub const ZERO: Self = Self::new(0x0, false, 0x0);
    /// Zero register through the invert mapping, i.e. constant one.
    pub const ONE: Self = Self::new(0x0, false, 0x1);

    #[inline]
    pub const fn new(source: u32, alpha: bool, map: u32) -> Self {
        Self { source, alpha, map }
    }

    #[inline]
    pub const fn with_alpha(self) -> Self {
        Self { alpha: true, ..self }
    }

    #[inline]
    const fn bits(self) -> u32 {
        (self.source & 0xF) | ((self.alpha as u32) << 4) | ((self.map & 0x7) << 5)
    }
}

pub const COMBINER_SRC_DIFFUSE: u32 = 0x4;
pub const COMBINER_SRC_TEXTURE0: u32 = 0x8;
pub const COMBINER_MAP_IDENTITY: u32 = 0x6;

/// Input control word: `A*B + C*D` operand selection.
#[inline]
pub const fn combiner_icw(a: CombinerInput, b: CombinerInput, c: CombinerInput, d: CombinerInput) -> u32 {
    (a.bits() << 24) | (b.bits() << 16) | (c.bits() << 8) | d.bits()
}

/// Output control word writing `A*B` to `ab_dst`.
#[inline]
pub const fn combiner_ocw(ab_dst: u32) -> u32 {
    (ab_dst & 0xF) << 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_arrays_word_roundtrips_full_batch() {
        let w = draw_arrays(512, MAX_BATCH);
        assert_eq!(w >> 24, 0xFF);
        assert_eq!(unpack_draw_arrays(w), (512, 256));
    }

    #[test]
    fn span_packs_position_low() {
        assert_eq!(span(10, 640), 10 | (640 << 16));
        assert_eq!(unspan(span(3, 7)), (3, 7));
    }

    #[test]
    fn combiner_icw_places_operands() {
        let diffuse = CombinerInput::new(COMBINER_SRC_DIFFUSE, false, COMBINER_MAP_IDENTITY);
        let w = combiner_icw(diffuse, CombinerInput::ONE, CombinerInput::ZERO, CombinerInput::ZERO);
        assert_eq!(w >> 24, 0x4 | (0x6 << 5));
        assert_eq!((w >> 16) & 0xFF, 0x1 << 5);
        assert_eq!(w & 0xFFFF, 0);
    }

    #[test]
    fn texture_format_fields() {
        let w = texture_format(0x06, 6, 5);
        assert_eq!((w >> 8) & 0xFF, 0x06);
        assert_eq!((w >> 20) & 0xF, 6);
        assert_eq!((w >> 24) & 0xF, 5);
    }
}
