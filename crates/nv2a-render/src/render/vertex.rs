//! Vertex records as the GPU reads them out of the arena.
//!
//! Colour is packed into one word (R in the low byte) to keep records small.

use bytemuck::{Pod, Zeroable};

use crate::device::nv097::{slot, VertexType};

/// Attribute stream inside a vertex record.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct Attribute {
    pub slot: u32,
    pub ty: VertexType,
    pub size: u32,
    pub offset: u32,
}

const POSITION: Attribute = Attribute { slot: slot::POSITION, ty: VertexType::Float, size: 2, offset: 0 };
const DIFFUSE: Attribute = Attribute { slot: slot::DIFFUSE, ty: VertexType::UnsignedByteOgl, size: 4, offset: 8 };
const TEXCOORD0: Attribute = Attribute { slot: slot::TEXCOORD0, ty: VertexType::Float, size: 2, offset: 12 };

/// Layout description shared by the record types.
pub(crate) trait VertexLayout: Pod {
    const ATTRIBUTES: &'static [Attribute];

    #[inline]
    fn stride() -> u32 {
        std::mem::size_of::<Self>() as u32
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub pos: [f32; 2],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub pos: [f32; 2],
    pub color: u32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TexturedVertex {
    pub pos: [f32; 2],
    pub color: u32,
    pub uv: [f32; 2],
}

impl VertexLayout for PointVertex {
    const ATTRIBUTES: &'static [Attribute] = &[POSITION];
}

impl VertexLayout for ColorVertex {
    const ATTRIBUTES: &'static [Attribute] = &[POSITION, DIFFUSE];
}

impl VertexLayout for TexturedVertex {
    const ATTRIBUTES: &'static [Attribute] = &[POSITION, DIFFUSE, TEXCOORD0];
}
