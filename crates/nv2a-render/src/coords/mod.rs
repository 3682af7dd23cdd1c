//! Geometry and colour types shared by the renderer and its callers.
//!
//! Surface space:
//! - integer pixels for viewports, clip rects, and texture rectangles
//! - origin top-left, +X right, +Y down
//!
//! Vertex positions stay in floating point and are scaled into surface
//! pixels while staging.

mod color;
mod rect;
mod vec2;

pub use color::FColor;
pub use rect::Rect;
pub use vec2::Vec2;
