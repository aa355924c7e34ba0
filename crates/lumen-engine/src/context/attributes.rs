/// GPU selection hint.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum PowerPreference {
    #[default]
    Default,
    LowPower,
    HighPerformance,
}

/// Creation attributes of a rendering context.
///
/// All toggles are accepted and reported back through
/// [`GlCtx::attributes`](super::GlCtx::attributes). The drawing surface itself
/// is always created with the fixed off-screen config (RGBA8, depth 24,
/// stencil 8); only the size passed alongside these attributes changes it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ContextAttributes {
    pub alpha: bool,
    pub depth: bool,
    pub stencil: bool,
    pub antialias: bool,
    pub premultiplied_alpha: bool,
    pub preserve_drawing_buffer: bool,
    pub power_preference: PowerPreference,
    pub fail_if_major_performance_caveat: bool,
}

impl Default for ContextAttributes {
    fn default() -> Self {
        Self {
            alpha: true,
            depth: true,
            stencil: false,
            antialias: true,
            premultiplied_alpha: true,
            preserve_drawing_buffer: false,
            power_preference: PowerPreference::Default,
            fail_if_major_performance_caveat: false,
        }
    }
}
