//! Renderer configuration.

/// Environment variable overriding [`RendererConfig::vertex_buffer_size`].
pub const VERTEX_BUFFER_SIZE_ENV: &str = "NV2A_VERTEX_BUFFER_SIZE";

/// Environment variable overriding [`RendererConfig::show_fps`].
pub const SHOW_FPS_ENV: &str = "NV2A_SHOW_FPS";

/// Every texture block is padded to at least this many bytes.
pub const MIN_TEXTURE_BYTES: usize = 4096;

/// Row pitch alignment of render-target textures.
pub const TARGET_PITCH_ALIGNMENT: usize = 64;

/// Renderer creation parameters.
///
/// Defaults match a stock console setup: a 1 MiB vertex arena shared by the
/// three frames in flight and the largest texture the sampler addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    /// Bytes of contiguous memory reserved for staged vertices.
    pub vertex_buffer_size: usize,
    /// Draw an FPS counter through the device's debug text each present.
    pub show_fps: bool,
    /// Largest accepted texture width or height.
    pub max_texture_size: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            vertex_buffer_size: 1024 * 1024,
            show_fps: false,
            max_texture_size: 4096,
        }
    }
}

impl RendererConfig {
    /// Defaults overridden by `NV2A_VERTEX_BUFFER_SIZE` and `NV2A_SHOW_FPS`.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`. Unparseable values are logged and ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(VERTEX_BUFFER_SIZE_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(size) if size > 0 => self.vertex_buffer_size = size,
                _ => log::warn!("ignoring {VERTEX_BUFFER_SIZE_ENV}={raw:?}: expected a positive byte count"),
            }
        }

        if let Some(raw) = lookup(SHOW_FPS_ENV) {
            match parse_flag(&raw) {
                Some(flag) => self.show_fps = flag,
                None => log::warn!("ignoring {SHOW_FPS_ENV}={raw:?}: expected 0/1/true/false"),
            }
        }

        self
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
