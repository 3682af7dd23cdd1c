use crate::coords::{FColor, Rect};
use crate::render::BlendMode;
use crate::texture::{AddressMode, ScaleMode, TextureId};

/// Vertices staged in the arena for an untextured point or line draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DrawCall {
    /// Byte offset of the first vertex in the arena.
    pub first: usize,
    /// Vertex count.
    pub count: usize,
    pub blend: BlendMode,
}

/// Triangle-list draw, optionally textured.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GeometryCall {
    pub texture: Option<TextureId>,
    pub first: usize,
    pub count: usize,
    pub blend: BlendMode,
    pub filter: ScaleMode,
    pub address_u: AddressMode,
    pub address_v: AddressMode,
}

/// One entry of the frame's command stream.
///
/// `SetClipRect(None)` disables clipping (the clip becomes the whole target).
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RenderCommand {
    SetViewport(Rect),
    SetClipRect(Option<Rect>),
    SetDrawColor(FColor),
    Clear(FColor),
    DrawPoints(DrawCall),
    DrawLines(DrawCall),
    DrawGeometry(GeometryCall),
    Present,
    NoOp,
}
