use std::collections::HashMap;

use crate::error::{RenderError, Result};

use super::{Texture, TextureId};

/// Live textures keyed by handle. Handles are never reused.
#[derive(Debug, Default)]
pub struct TextureStore {
    textures: HashMap<TextureId, Texture>,
    next_id: u32,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves the next handle.
    pub fn next_id(&mut self) -> TextureId {
        self.next_id += 1;
        TextureId(self.next_id)
    }

    pub fn insert(&mut self, texture: Texture) {
        self.textures.insert(texture.id, texture);
    }

    pub fn get(&self, id: TextureId) -> Result<&Texture> {
        self.textures.get(&id).ok_or(RenderError::InvalidTexture(id.0))
    }

    pub fn get_mut(&mut self, id: TextureId) -> Result<&mut Texture> {
        self.textures.get_mut(&id).ok_or(RenderError::InvalidTexture(id.0))
    }

    pub fn remove(&mut self, id: TextureId) -> Result<Texture> {
        self.textures.remove(&id).ok_or(RenderError::InvalidTexture(id.0))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Removes every texture, e.g. to free their memory on shutdown.
    pub fn drain(&mut self) -> impl Iterator<Item = Texture> + '_ {
        self.textures.drain().map(|(_, t)| t)
    }
}
