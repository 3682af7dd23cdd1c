//! Executes a [`CommandList`](crate::scene::CommandList) against the device, skipping state the
//! hardware already holds.

use crate::coords::{FColor, Rect};
use crate::device::nv097::Primitive;
use crate::device::{Device, PushEncoder};
use crate::error::Result;
use crate::scene::{DrawCall, GeometryCall, RenderCommand};
use crate::texture::TextureStore;

use super::emit;
use super::state::{CombinerMode, RenderState};
use super::vertex::{ColorVertex, PointVertex, TexturedVertex, VertexLayout};
use super::BlendMode;

/// What the caller must do after a command ran.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Step {
    Continue,
    /// The command was a present; frame pacing lives with the arena owner.
    Present,
}

/// Borrowed view of the renderer pieces one command touches.
pub(crate) struct Interpreter<'a, D: Device> {
    pub device: &'a mut D,
    pub state: &'a mut RenderState,
    pub textures: &'a mut TextureStore,
    /// Physical address of arena offset zero.
    pub vertex_base: u32,
}

impl<D: Device> Interpreter<'_, D> {
    pub fn execute(&mut self, command: &RenderCommand) -> Result<Step> {
        match command {
            RenderCommand::SetViewport(rect) => self.set_viewport(*rect),
            RenderCommand::SetClipRect(clip) => self.set_clip_rect(*clip),
            RenderCommand::SetDrawColor(color) => self.set_draw_color(*color),
            RenderCommand::Clear(color) => self.clear(*color),
            RenderCommand::DrawPoints(call) => self.draw_unlit::<PointVertex>(call, Primitive::Points),
            RenderCommand::DrawLines(call) => self.draw_unlit::<PointVertex>(call, Primitive::LineStrip),
            RenderCommand::DrawGeometry(call) => self.draw_geometry(call)?,
            RenderCommand::Present => return Ok(Step::Present),
            RenderCommand::NoOp => {}
        }
        Ok(Step::Continue)
    }

    fn set_viewport(&mut self, rect: Rect) {
        if self.state.viewport == rect {
            return;
        }
        self.state.viewport = rect;
        let size = self.target_size();

        let mut enc = PushEncoder::new();
        emit::viewport_offset(&mut enc, rect.x as f32, rect.y as f32);
        sync_scissor(&mut enc, self.state, size);
        self.submit(enc);
    }

    fn set_clip_rect(&mut self, clip: Option<Rect>) {
        let (w, h) = self.target_size();
        let clip = clip.unwrap_or(Rect::from_size(w, h));
        if self.state.clip_rect == clip {
            return;
        }
        self.state.clip_rect = clip;

        let mut enc = PushEncoder::new();
        sync_scissor(&mut enc, self.state, (w, h));
        self.submit(enc);
    }

    fn set_draw_color(&mut self, color: FColor) {
        self.state.draw_color = color;
        let mut enc = PushEncoder::new();
        emit::draw_color(&mut enc, color);
        self.submit(enc);
    }

    fn clear(&mut self, color: FColor) {
        let (w, h) = self.target_size();
        let mut enc = PushEncoder::new();
        emit::clear(&mut enc, Rect::from_size(w, h), color.pack_argb());
        self.submit(enc);
    }

    fn draw_unlit<V: VertexLayout>(&mut self, call: &DrawCall, primitive: Primitive) {
        if call.count == 0 {
            return;
        }
        let mut enc = PushEncoder::new();
        self.apply_blend(&mut enc, call.blend);
        self.apply_combiner(&mut enc, CombinerMode::Unlit);
        self.draw_arrays::<V>(&mut enc, call.first, call.count, primitive);
        self.submit(enc);
    }

    fn draw_geometry(&mut self, call: &GeometryCall) -> Result<()> {
        if call.count == 0 {
            return Ok(());
        }
        let mut enc = PushEncoder::new();

        let Some(id) = call.texture else {
            self.apply_blend(&mut enc, call.blend);
            self.apply_combiner(&mut enc, CombinerMode::Unlit);
            self.draw_arrays::<ColorVertex>(&mut enc, call.first, call.count, Primitive::Triangles);
            self.submit(enc);
            return Ok(());
        };

        // Resolve first so a stale handle emits nothing.
        self.textures.get(id)?;
        self.apply_blend(&mut enc, call.blend);
        self.apply_combiner(&mut enc, CombinerMode::Textured);

        let texture = self.textures.get_mut(id)?;
        if self.state.texture != Some(id) {
            emit::bind_texture(&mut enc, texture, call.filter, call.address_u, call.address_v);
            self.state.texture = Some(id);
        } else {
            if texture.filter != call.filter {
                emit::texture_filter(&mut enc, call.filter);
            }
            if (texture.address_u, texture.address_v) != (call.address_u, call.address_v) {
                emit::texture_address(&mut enc, call.address_u, call.address_v);
            }
        }
        texture.filter = call.filter;
        texture.address_u = call.address_u;
        texture.address_v = call.address_v;

        self.draw_arrays::<TexturedVertex>(&mut enc, call.first, call.count, Primitive::Triangles);
        self.submit(enc);
        Ok(())
    }

    fn apply_blend(&mut self, enc: &mut PushEncoder, mode: BlendMode) {
        if self.state.blend != Some(mode) {
            log::debug!("blend -> {mode:?}");
            emit::blend(enc, mode);
            self.state.blend = Some(mode);
        }
    }

    fn apply_combiner(&mut self, enc: &mut PushEncoder, mode: CombinerMode) {
        if self.state.combiner != Some(mode) {
            log::debug!("combiner -> {mode:?}");
            emit::combiner(enc, mode);
            self.state.combiner = Some(mode);
        }
    }

    fn draw_arrays<V: VertexLayout>(&self, enc: &mut PushEncoder, first: usize, count: usize, primitive: Primitive) {
        emit::clear_attribute_pointers(enc);
        emit::attribute_pointers::<V>(enc, self.vertex_base + first as u32);
        emit::draw_arrays(enc, primitive, count as u32);
    }

    fn target_size(&self) -> (u32, u32) {
        target_size(&*self.device, &*self.state, &*self.textures)
    }

    fn submit(&mut self, enc: PushEncoder) {
        if !enc.is_empty() {
            self.device.submit(enc.words());
        }
    }
}

/// Dimensions of the bound colour surface.
pub(crate) fn target_size<D: Device>(device: &D, state: &RenderState, textures: &TextureStore) -> (u32, u32) {
    state
        .target
        .and_then(|id| textures.get(id).ok())
        .map(|t| (t.width, t.height))
        .unwrap_or_else(|| {
            let mode = device.video_mode();
            (mode.width, mode.height)
        })
}

/// Emits the scissor for the current viewport and clip if it moved.
pub(crate) fn sync_scissor(enc: &mut PushEncoder, state: &mut RenderState, (w, h): (u32, u32)) {
    let scissor = state.effective_scissor(w, h);
    if state.scissor != Some(scissor) {
        log::debug!("scissor -> {scissor:?}");
        emit::scissor(enc, scissor);
        state.scissor = Some(scissor);
    }
}
