//! Part-of-speech (hinshi) vocabulary table.
//!
//! The table has one row per canonical part-of-speech and one whitespace
//! separated column per [`Dialect`] in [`Dialect::COLUMNS`] order; the first
//! column holds the canonical label. From it two maps per dialect are derived:
//!
//! - **forward**: dialect label → canonical label (used when parsing)
//! - **reverse**: canonical label → dialect label (used when rendering)
//!
//! A cell starting with `*` is skipped when its column is the key side of a
//! map. Only the text before the first `/` of a cell is used.

use crate::error::{Error, Result};
use crate::format::Dialect;
use log::{debug, warn};
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

/// Table bundled with the library.
const BUILTIN_TABLE: &str = include_str!("../data/hinshi");

/// Marks a cell that is not read as a lookup key.
const WILDCARD: char = '*';

/// Separates alternative spellings within a cell.
const ALTERNATIVE: char = '/';

static BUILTIN: OnceLock<Vocabulary> = OnceLock::new();

/// Forward and reverse part-of-speech maps for every dialect.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    forward: HashMap<Dialect, HashMap<String, String>>,
    reverse: HashMap<Dialect, HashMap<String, String>>,
}

/// A table row with its 1-based line number.
struct Row<'a> {
    line: usize,
    cells: Vec<&'a str>,
}

impl Vocabulary {
    /// Returns the bundled table, parsed once per process.
    pub fn builtin() -> Result<&'static Vocabulary> {
        if let Some(vocabulary) = BUILTIN.get() {
            return Ok(vocabulary);
        }
        let vocabulary = Self::parse(BUILTIN_TABLE)?;
        Ok(BUILTIN.get_or_init(|| vocabulary))
    }

    /// Loads a table from a file.
    ///
    /// A missing file is an error; there is no fallback to the bundled table.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::VocabularyNotFound(path.to_path_buf()));
            }
            Err(err) => return Err(err.into()),
        };
        debug!("loading part-of-speech table from {}", path.display());
        Self::parse(&text)
    }

    /// Parses table text.
    pub fn parse(text: &str) -> Result<Self> {
        let rows = read_rows(text)?;
        let mut vocabulary = Self::default();

        for (column, dialect) in Dialect::COLUMNS.into_iter().enumerate() {
            vocabulary
                .forward
                .insert(dialect, build_map(&rows, column, 0));
            vocabulary
                .reverse
                .insert(dialect, build_map(&rows, 0, column));
        }

        debug!(
            "part-of-speech table: {} rows, {} canonical labels",
            rows.len(),
            vocabulary.len()
        );
        Ok(vocabulary)
    }

    /// Maps a dialect label to its canonical label.
    pub fn forward(&self, dialect: Dialect, label: &str) -> Option<&str> {
        self.forward
            .get(&dialect)
            .and_then(|map| map.get(label))
            .map(String::as_str)
    }

    /// Maps a canonical label to the dialect's label.
    pub fn reverse(&self, dialect: Dialect, canonical: &str) -> Option<&str> {
        self.reverse
            .get(&dialect)
            .and_then(|map| map.get(canonical))
            .map(String::as_str)
    }

    /// Returns the labels a dialect accepts on input, sorted.
    pub fn labels(&self, dialect: Dialect) -> Vec<&str> {
        let mut labels: Vec<&str> = self
            .forward
            .get(&dialect)
            .map(|map| map.keys().map(String::as_str).collect())
            .unwrap_or_default();
        labels.sort_unstable();
        labels
    }

    /// Returns the number of canonical labels.
    pub fn len(&self) -> usize {
        self.reverse
            .get(&Dialect::Generic)
            .map_or(0, HashMap::len)
    }

    /// Returns true if the table has no canonical labels.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn read_rows(text: &str) -> Result<Vec<Row<'_>>> {
    let mut rows = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let cells: Vec<&str> = line.split_whitespace().collect();
        if cells.len() < Dialect::COLUMNS.len() {
            return Err(Error::Vocabulary {
                line: index + 1,
                message: format!(
                    "expected {} columns, found {}",
                    Dialect::COLUMNS.len(),
                    cells.len()
                ),
            });
        }

        rows.push(Row {
            line: index + 1,
            cells,
        });
    }

    Ok(rows)
}

/// Builds a `from` column → `to` column map.
///
/// A key seen twice maps to the value from its last row.
fn build_map(rows: &[Row<'_>], from: usize, to: usize) -> HashMap<String, String> {
    let mut map = HashMap::with_capacity(rows.len());

    for row in rows {
        let key = row.cells[from];
        if key.starts_with(WILDCARD) {
            continue;
        }

        let key = cell_value(key);
        let value = cell_value(row.cells[to]);
        if let Some(previous) = map.insert(key.to_string(), value.to_string()) {
            if to == 0 && previous != value {
                warn!(
                    "part-of-speech table line {}: {:?} in column {} now maps to {:?} instead of {:?}",
                    row.line,
                    key,
                    from + 1,
                    value,
                    previous
                );
            }
        }
    }

    map
}

/// Strips the wildcard marker and alternative spellings.
fn cell_value(cell: &str) -> &str {
    let cell = cell.trim_start_matches(WILDCARD);
    cell.split_once(ALTERNATIVE).map_or(cell, |(head, _)| head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
# generic mozc anthy atok msime wnn
名詞     名詞     T35  名詞/普通名詞 名詞   名詞

固有名詞 固有名詞 *T35 固有一般      固有名詞 固有名詞
*名詞    *名詞    名詞 *名詞         *名詞  *名詞
";

    #[test]
    fn test_forward_and_reverse() {
        let vocabulary = Vocabulary::parse(SAMPLE).unwrap();

        assert_eq!(vocabulary.forward(Dialect::Anthy, "T35"), Some("名詞"));
        assert_eq!(vocabulary.reverse(Dialect::Anthy, "名詞"), Some("T35"));
        assert_eq!(vocabulary.forward(Dialect::Atok, "名詞"), Some("名詞"));
        assert_eq!(vocabulary.reverse(Dialect::Atok, "名詞"), Some("名詞"));
        assert_eq!(vocabulary.forward(Dialect::Generic, "固有名詞"), Some("固有名詞"));
        assert_eq!(vocabulary.len(), 2);
    }

    #[test]
    fn test_wildcard_excludes_key_side_only() {
        let vocabulary = Vocabulary::parse(SAMPLE).unwrap();

        // "*T35" is not an anthy key for 固有名詞...
        assert_eq!(vocabulary.forward(Dialect::Anthy, "T35"), Some("名詞"));
        // ...but is still written for it
        assert_eq!(vocabulary.reverse(Dialect::Anthy, "固有名詞"), Some("T35"));
        // Alias row: readable as anthy input, never written
        assert_eq!(vocabulary.forward(Dialect::Anthy, "名詞"), Some("名詞"));
        assert_eq!(vocabulary.forward(Dialect::Mozc, "*名詞"), None);
    }

    #[test]
    fn test_alternatives_are_dropped() {
        let vocabulary = Vocabulary::parse(SAMPLE).unwrap();
        assert_eq!(vocabulary.forward(Dialect::Atok, "普通名詞"), None);
        assert_eq!(vocabulary.forward(Dialect::Atok, "名詞/普通名詞"), None);
    }

    #[test]
    fn test_short_row_is_an_error() {
        let result = Vocabulary::parse("# header\n名詞 名詞 T35\n");
        match result {
            Err(Error::Vocabulary { line, .. }) => assert_eq!(line, 2),
            _ => panic!("Expected Vocabulary error for a short row"),
        }
    }

    #[test]
    fn test_duplicate_forward_key_last_row_wins() {
        let text = "名詞 名詞 T35 名詞 名詞 名詞\n固有名詞 固有名詞 KK 固有一般 固有名詞 名詞\n";
        let vocabulary = Vocabulary::parse(text).unwrap();

        assert_eq!(vocabulary.forward(Dialect::Wnn, "名詞"), Some("固有名詞"));
        assert_eq!(vocabulary.reverse(Dialect::Wnn, "名詞"), Some("名詞"));
        assert_eq!(vocabulary.reverse(Dialect::Wnn, "固有名詞"), Some("名詞"));
        assert_eq!(vocabulary.forward(Dialect::Anthy, "T35"), Some("名詞"));
        assert_eq!(vocabulary.len(), 2);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hinshi");
        match Vocabulary::load(&path) {
            Err(Error::VocabularyNotFound(missing)) => assert_eq!(missing, path),
            _ => panic!("Expected VocabularyNotFound error"),
        }
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let vocabulary = Vocabulary::load(file.path()).unwrap();
        assert_eq!(vocabulary.reverse(Dialect::Wnn, "固有名詞"), Some("固有名詞"));
    }

    #[test]
    fn test_builtin_table() {
        let vocabulary = Vocabulary::builtin().unwrap();
        assert!(!vocabulary.is_empty());

        // Every canonical label is writable in every dialect
        for canonical in vocabulary.labels(Dialect::Generic) {
            for dialect in Dialect::COLUMNS {
                assert!(
                    vocabulary.reverse(dialect, canonical).is_some(),
                    "{} has no {} label",
                    canonical,
                    dialect
                );
            }
        }

        assert_eq!(vocabulary.reverse(Dialect::Anthy, "名詞"), Some("T35"));
        assert_eq!(vocabulary.forward(Dialect::Msime, "さ変名詞"), Some("名詞サ変"));
        assert_eq!(vocabulary.reverse(Dialect::Wnn, "姓"), Some("人名"));
        assert!(std::ptr::eq(vocabulary, Vocabulary::builtin().unwrap()));
    }
}
