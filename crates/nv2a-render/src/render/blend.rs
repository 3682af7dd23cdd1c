use crate::device::nv097::BlendFactor;

/// Framebuffer blend operation of a draw.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum BlendMode {
    /// Overwrite: `dst = src`.
    None,
    /// Straight alpha: `dst = src * a + dst * (1 - a)`.
    #[default]
    Blend,
    /// Premultiplied alpha: `dst = src + dst * (1 - a)`.
    BlendPremultiplied,
    /// Additive: `dst = src * a + dst`.
    Add,
    AddPremultiplied,
    /// Colour modulate: `dst = src * dst`.
    Mod,
    /// Colour multiply: `dst = src * dst + dst * (1 - a)`.
    Mul,
}

impl BlendMode {
    /// `(source, destination)` factors; the equation is always add.
    pub const fn factors(self) -> (BlendFactor, BlendFactor) {
        match self {
            BlendMode::None => (BlendFactor::One, BlendFactor::Zero),
            BlendMode::Blend => (BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha),
            BlendMode::BlendPremultiplied => (BlendFactor::One, BlendFactor::OneMinusSrcAlpha),
            BlendMode::Add => (BlendFactor::SrcAlpha, BlendFactor::One),
            BlendMode::AddPremultiplied => (BlendFactor::One, BlendFactor::One),
            BlendMode::Mod => (BlendFactor::Zero, BlendFactor::SrcColor),
            BlendMode::Mul => (BlendFactor::DstColor, BlendFactor::OneMinusSrcAlpha),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_initial_hardware_state() {
        assert_eq!(
            BlendMode::default().factors(),
            (BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha)
        );
    }

    #[test]
    fn overwrite_ignores_destination() {
        assert_eq!(BlendMode::None.factors(), (BlendFactor::One, BlendFactor::Zero));
    }
}
