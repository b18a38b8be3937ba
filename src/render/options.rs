//! Rendering options for dictionary output.

/// Anthy frequency weight written when none is configured.
pub const DEFAULT_WEIGHT: u32 = 500;

/// Options for record rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Frequency weight written after the Anthy/Canna part-of-speech tag.
    /// Default: 500
    pub weight: u32,

    /// Whether to format records in parallel.
    pub parallel: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            weight: DEFAULT_WEIGHT,
            parallel: true,
        }
    }
}

impl RenderOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Anthy/Canna frequency weight.
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    /// Disables parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}
