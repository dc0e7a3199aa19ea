//! Analysis options and configuration.

/// Options for semantic analysis.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Fallback font family used when a span's font maps to nothing
    pub fallback_font: String,

    /// Whether to process pages in parallel (results are identical either
    /// way; pages are merged back in page order)
    pub parallel: bool,
}

impl AnalyzeOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback font family.
    pub fn with_fallback_font(mut self, font: impl Into<String>) -> Self {
        self.fallback_font = font.into();
        self
    }

    /// Enable or disable parallel page processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel page processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            fallback_font: "Arial".to_string(),
            parallel: true,
        }
    }
}
