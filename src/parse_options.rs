//! Parsing options for dictionary input.

/// Options for controlling record parsing.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// How to handle malformed records and unknown part-of-speech labels.
    pub error_mode: ErrorMode,

    /// Whether to parse lines in parallel.
    pub parallel: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            parallel: true,
        }
    }
}

impl ParseOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets lenient error handling (report and continue).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Sets strict error handling (fail on the first diagnostic).
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Disables parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Returns true if any diagnostic aborts the conversion.
    pub fn is_strict(&self) -> bool {
        matches!(self.error_mode, ErrorMode::Strict)
    }
}

/// How to handle per-record problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Skip malformed records, default unknown labels, and keep going.
    #[default]
    Lenient,
    /// Fail on the first malformed record or unknown label.
    Strict,
}
