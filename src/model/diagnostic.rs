//! Per-record diagnostics.

use serde::{Deserialize, Serialize};

/// A recoverable problem found while parsing one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// The line has no word field; the line is skipped.
    IncorrectRecord {
        /// Offending line, trimmed
        line: String,
    },
    /// The part-of-speech tag is not in the table; the record is kept with
    /// the default noun label.
    UnknownPartOfSpeech {
        /// Offending line, trimmed
        line: String,
        /// Tag as written in the source
        label: String,
    },
}

impl Diagnostic {
    /// Returns the line the diagnostic refers to.
    pub fn line(&self) -> &str {
        match self {
            Diagnostic::IncorrectRecord { line } => line,
            Diagnostic::UnknownPartOfSpeech { line, .. } => line,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::IncorrectRecord { line } => write!(f, "{}: incorrect record", line),
            Diagnostic::UnknownPartOfSpeech { line, label } => {
                write!(f, "{}: unknown part-of-speech: {}", line, label)
            }
        }
    }
}

/// Ordered collector for diagnostics.
///
/// Parsing pushes onto a collector owned by the caller, who decides where the
/// messages end up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Returns the number of collected diagnostics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the first diagnostic, if any.
    pub fn first(&self) -> Option<&Diagnostic> {
        self.entries.first()
    }

    /// Iterates over diagnostics in the order they were reported.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Consumes the collector.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let incorrect = Diagnostic::IncorrectRecord {
            line: "あ".to_string(),
        };
        assert_eq!(incorrect.to_string(), "あ: incorrect record");

        let unknown = Diagnostic::UnknownPartOfSpeech {
            line: "あ\tAPPLE\tXX".to_string(),
            label: "XX".to_string(),
        };
        assert_eq!(
            unknown.to_string(),
            "あ\tAPPLE\tXX: unknown part-of-speech: XX"
        );
        assert_eq!(unknown.line(), "あ\tAPPLE\tXX");
    }

    #[test]
    fn test_collector_preserves_order() {
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());

        diagnostics.push(Diagnostic::IncorrectRecord {
            line: "1".to_string(),
        });
        diagnostics.extend([Diagnostic::IncorrectRecord {
            line: "2".to_string(),
        }]);

        assert_eq!(diagnostics.len(), 2);
        let lines: Vec<&str> = diagnostics.iter().map(Diagnostic::line).collect();
        assert_eq!(lines, ["1", "2"]);
        assert_eq!(diagnostics.first().map(Diagnostic::line), Some("1"));
    }
}
