use crate::coords::{FColor, Rect};

use super::{DrawCall, GeometryCall, RenderCommand};

/// Ordered commands for one frame.
///
/// The interpreter borrows the list immutably, so it cannot change while it
/// runs. Call [`clear`](Self::clear) to reuse the allocation next frame.
#[derive(Debug, Default, Clone)]
pub struct CommandList {
    commands: Vec<RenderCommand>,
}

impl CommandList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    #[inline]
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[inline]
    pub fn push(&mut self, cmd: RenderCommand) -> &mut Self {
        self.commands.push(cmd);
        self
    }

    pub fn set_viewport(&mut self, rect: Rect) -> &mut Self {
        self.push(RenderCommand::SetViewport(rect))
    }

    pub fn set_clip_rect(&mut self, rect: Option<Rect>) -> &mut Self {
        self.push(RenderCommand::SetClipRect(rect))
    }

    pub fn set_draw_color(&mut self, color: FColor) -> &mut Self {
        self.push(RenderCommand::SetDrawColor(color))
    }

    pub fn clear_target(&mut self, color: FColor) -> &mut Self {
        self.push(RenderCommand::Clear(color))
    }

    pub fn draw_points(&mut self, call: DrawCall) -> &mut Self {
        self.push(RenderCommand::DrawPoints(call))
    }

    pub fn draw_lines(&mut self, call: DrawCall) -> &mut Self {
        self.push(RenderCommand::DrawLines(call))
    }

    pub fn draw_geometry(&mut self, call: GeometryCall) -> &mut Self {
        self.push(RenderCommand::DrawGeometry(call))
    }

    pub fn present(&mut self) -> &mut Self {
        self.push(RenderCommand::Present)
    }

    pub fn no_op(&mut self) -> &mut Self {
        self.push(RenderCommand::NoOp)
    }
}

impl<'a> IntoIterator for &'a CommandList {
    type Item = &'a RenderCommand;
    type IntoIter = std::slice::Iter<'a, RenderCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
