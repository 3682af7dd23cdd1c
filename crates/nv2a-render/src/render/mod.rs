//! Draw path: vertex staging, cached render state and method emission.
//!
//! Convention:
//! - positions are in pixels of the bound surface (top-left origin, +Y down)
//! - the transform pipeline is identity, so staged positions are final
//! - colours reach the GPU as one packed word per vertex

mod blend;
mod emit;
mod interp;
mod stage;
mod state;
mod vertex;

pub use blend::BlendMode;
pub use stage::{GeometryInput, Indices};
pub use state::{CombinerMode, RenderState};
pub use vertex::{ColorVertex, PointVertex, TexturedVertex};

pub(crate) use emit::{bind_surface, idle_barrier, init_state, SurfaceBinding};
pub(crate) use interp::{sync_scissor, target_size, Interpreter, Step};
pub(crate) use stage::{stage_colored, stage_points, stage_textured};
