//! Render command stream.
//!
//! The upstream framework records commands (state changes and draw calls
//! pointing at staged vertices) into a [`CommandList`]; the renderer replays
//! them once per frame.

mod cmd;
mod list;

pub use cmd::{DrawCall, GeometryCall, RenderCommand};
pub use list::CommandList;
