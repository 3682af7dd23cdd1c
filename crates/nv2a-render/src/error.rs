use crate::format::PixelFormat;

/// Errors surfaced by the render backend.
///
/// Every variant is local to the failing call. The only failure that tears
/// anything down is an allocation failure inside [`crate::RendererSlot::create`],
/// which aborts construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// The portable pixel format has no native texel mapping.
    #[error("unsupported texture format ({})", .0.name())]
    UnsupportedFormat(PixelFormat),

    /// The format can be sampled but cannot be bound as a colour surface.
    #[error("unsupported render target format ({})", .0.name())]
    UnsupportedTargetFormat(PixelFormat),

    /// Native contiguous memory could not be allocated.
    #[error("out of native memory (requested {requested} bytes)")]
    OutOfMemory { requested: usize },

    /// A vertex allocation would overwrite data the GPU may still read.
    #[error(
        "vertex arena exhausted: requested {requested} bytes, {in_flight} of {capacity} bytes in flight"
    )]
    ArenaExhausted {
        requested: usize,
        in_flight: usize,
        capacity: usize,
    },

    /// The device has no way to perform the requested operation.
    #[error("operation not supported: {0}")]
    Unsupported(&'static str),

    /// A renderer already exists for this slot.
    #[error("a renderer is already active for this device")]
    AlreadyCreated,

    /// The texture handle does not name a live texture.
    #[error("invalid texture handle {0}")]
    InvalidTexture(u32),

    #[error("invalid texture size {width}x{height}")]
    InvalidTextureSize { width: u32, height: u32 },

    /// A rectangle falls outside the texture or surface it addresses.
    #[error("rectangle {x},{y} {w}x{h} is outside the {bound_w}x{bound_h} surface")]
    InvalidRect {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        bound_w: u32,
        bound_h: u32,
    },

    /// Tiled textures have no linear region to expose.
    #[error("texture {0} is tiled and cannot be locked")]
    NotLockable(u32),

    /// A push-buffer scope ended in the middle of a method's data words.
    #[error("malformed push buffer at word {offset}")]
    MalformedPushBuffer { offset: usize },

    /// A pixel buffer is shorter than its rows and pitch require.
    #[error("pixel buffer holds {got} bytes at pitch {pitch}, needs {needed}")]
    InvalidPixelBuffer { needed: usize, got: usize, pitch: usize },

    /// Vertex attributes or indices do not describe valid geometry.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}

pub type Result<T, E = RenderError> = std::result::Result<T, E>;
