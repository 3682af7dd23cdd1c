//! nv2a-render crate.
//!
//! Render backend for a fixed-function GPU fed through a push buffer. The
//! crate owns texture storage, a frame-synchronized vertex arena, a cache of
//! emitted device state, and the replay of recorded draw commands. The
//! device itself sits behind the traits in [`device`].

pub mod arena;
pub mod config;
pub mod coords;
pub mod device;
pub mod format;
pub mod logging;
pub mod render;
pub mod scene;
pub mod swizzle;
pub mod texture;
pub mod time;

mod error;
mod renderer;

pub use config::RendererConfig;
pub use error::{RenderError, Result};
pub use renderer::{PixelSurface, Renderer, RendererSlot};
