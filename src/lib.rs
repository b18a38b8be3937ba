//! # userdic
//!
//! Converts Japanese input-method user dictionaries between engines.
//!
//! Every entry is a (reading, word, part-of-speech) triple, but each engine
//! orders the fields differently, uses its own delimiter, text encoding and
//! part-of-speech vocabulary. Input is parsed into canonical [`Record`]s
//! using a shared part-of-speech table ([`Vocabulary`]) and rendered from
//! them, so any format converts to any other.
//!
//! ## Supported Formats
//!
//! - **mozc** / **google**: Mozc and Google Japanese Input (tab separated, UTF-8)
//! - **anthy** / **canna**: `reading #TAG*500 word` (UTF-8 / EUC-JP)
//! - **atok**: ATOK word list (UTF-16 with BOM, CRLF)
//! - **msime**: Microsoft IME text dictionary (UTF-16LE with BOM, CRLF)
//! - **wnn**: Wnn text dictionary (EUC-JP)
//! - **apple**: macOS/iOS text replacement property list (with `apple` feature)
//! - **generic**: tab separated with canonical part-of-speech labels
//!
//! ## Quick Start
//!
//! ```
//! use userdic::{convert, DictFormat, Vocabulary};
//!
//! let vocabulary = Vocabulary::builtin()?;
//! let input = "\u{FEFF}てすと #名詞*500 テスト\n";
//!
//! let conversion = convert(DictFormat::Anthy, DictFormat::Mozc, input.as_bytes(), vocabulary)?;
//! assert_eq!(conversion.bytes, "てすと\tテスト\t名詞\n".as_bytes());
//! # Ok::<(), userdic::Error>(())
//! ```
//!
//! ## Features
//!
//! - `apple` (default): Apple property list support

pub mod decode;
pub mod encoding;
pub mod error;
pub mod format;
pub mod kana;
pub mod model;
pub mod parse;
pub mod parse_options;
pub mod render;
pub mod vocabulary;

#[cfg(feature = "apple")]
pub mod plist;

// Re-exports
pub use encoding::TextEncoding;
pub use error::{Error, Result};
pub use format::{Dialect, DictFormat};
pub use model::{Diagnostic, Diagnostics, Record};
pub use parse_options::{ErrorMode, ParseOptions};
pub use render::RenderOptions;
pub use vocabulary::Vocabulary;

use log::debug;

/// Parsed dictionary input.
#[derive(Debug, Clone)]
pub struct Loaded {
    /// Canonical records, in input order
    pub records: Vec<Record>,
    /// Per-record problems, in input order
    pub diagnostics: Diagnostics,
    /// Encoding the input was decoded with; `None` for the lossy fallback
    pub encoding: Option<TextEncoding>,
}

/// Result of a conversion.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Encoded output file
    pub bytes: Vec<u8>,
    /// Per-record problems found in the input
    pub diagnostics: Diagnostics,
    /// Number of records written
    pub record_count: usize,
    /// Encoding the input was decoded with
    pub encoding: Option<TextEncoding>,
}

/// Decodes and parses a dictionary file.
pub fn load_records(
    format: DictFormat,
    data: &[u8],
    vocabulary: &Vocabulary,
    options: &ParseOptions,
) -> Result<Loaded> {
    let decoded = decode::decode(format, data)?;
    let mut diagnostics = Diagnostics::new();
    let records = parse::parse_lines(
        format.dialect(),
        &decoded.lines,
        vocabulary,
        options,
        &mut diagnostics,
    )?;

    Ok(Loaded {
        records,
        diagnostics,
        encoding: decoded.encoding,
    })
}

/// Formats and encodes records as a dictionary file.
pub fn dump_records(
    format: DictFormat,
    records: &[Record],
    vocabulary: &Vocabulary,
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    let lines = render::render_lines(format.dialect(), records, vocabulary, options)?;
    render::encode(format, &lines)
}

/// Converts a dictionary file with default options.
///
/// # Example
///
/// ```
/// use userdic::{convert, DictFormat, Vocabulary};
///
/// let input = "\u{FEFF}あ\tAPPLE\tXX\n";
/// let conversion = convert(DictFormat::Mozc, DictFormat::Generic, input.as_bytes(), Vocabulary::builtin()?)?;
///
/// // Unknown tags are reported and replaced by the noun label
/// assert_eq!(conversion.diagnostics.len(), 1);
/// assert_eq!(conversion.bytes, "あ\tAPPLE\t名詞\n".as_bytes());
/// # Ok::<(), userdic::Error>(())
/// ```
pub fn convert(
    from: DictFormat,
    to: DictFormat,
    data: &[u8],
    vocabulary: &Vocabulary,
) -> Result<Conversion> {
    convert_with(
        from,
        to,
        data,
        vocabulary,
        &ParseOptions::default(),
        &RenderOptions::default(),
    )
}

fn convert_with(
    from: DictFormat,
    to: DictFormat,
    data: &[u8],
    vocabulary: &Vocabulary,
    parse_options: &ParseOptions,
    render_options: &RenderOptions,
) -> Result<Conversion> {
    let loaded = load_records(from, data, vocabulary, parse_options)?;
    let bytes = dump_records(to, &loaded.records, vocabulary, render_options)?;
    debug!(
        "converted {} records from {} to {} ({} diagnostics)",
        loaded.records.len(),
        from,
        to,
        loaded.diagnostics.len()
    );

    Ok(Conversion {
        bytes,
        record_count: loaded.records.len(),
        diagnostics: loaded.diagnostics,
        encoding: loaded.encoding,
    })
}

/// Builder for configuring dictionary conversion.
///
/// # Example
///
/// ```
/// use userdic::{DictFormat, Userdic};
///
/// let conversion = Userdic::new()
///     .with_weight(100)
///     .sequential()
///     .convert(DictFormat::Generic, DictFormat::Anthy, "\u{FEFF}てすと\tテスト\t名詞\n".as_bytes())?;
///
/// assert_eq!(conversion.bytes, "てすと #T35*100 テスト\n".as_bytes());
/// # Ok::<(), userdic::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Userdic {
    vocabulary: Option<Vocabulary>,
    parse_options: ParseOptions,
    render_options: RenderOptions,
}

impl Default for Userdic {
    fn default() -> Self {
        Self::new()
    }
}

impl Userdic {
    /// Creates a new builder using the bundled part-of-speech table.
    pub fn new() -> Self {
        Self {
            vocabulary: None,
            parse_options: ParseOptions::default(),
            render_options: RenderOptions::default(),
        }
    }

    /// Uses `vocabulary` instead of the bundled table.
    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = Some(vocabulary);
        self
    }

    /// Fails on the first malformed record or unknown part-of-speech.
    pub fn strict(mut self) -> Self {
        self.parse_options = self.parse_options.strict();
        self
    }

    /// Reports malformed records and unknown part-of-speech labels as
    /// diagnostics and keeps going (the default).
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Sets the Anthy/Canna frequency weight.
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.render_options = self.render_options.with_weight(weight);
        self
    }

    /// Disables parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parse_options = self.parse_options.sequential();
        self.render_options = self.render_options.sequential();
        self
    }

    fn vocabulary(&self) -> Result<&Vocabulary> {
        match &self.vocabulary {
            Some(vocabulary) => Ok(vocabulary),
            None => Vocabulary::builtin(),
        }
    }

    /// Decodes and parses a dictionary file.
    pub fn read(&self, from: DictFormat, data: &[u8]) -> Result<Loaded> {
        load_records(from, data, self.vocabulary()?, &self.parse_options)
    }

    /// Formats and encodes records.
    pub fn write(&self, to: DictFormat, records: &[Record]) -> Result<Vec<u8>> {
        dump_records(to, records, self.vocabulary()?, &self.render_options)
    }

    /// Converts a dictionary file from one format to another.
    ///
    /// The output is built completely before it is returned, so a failure
    /// never yields partial output.
    pub fn convert(&self, from: DictFormat, to: DictFormat, data: &[u8]) -> Result<Conversion> {
        convert_with(
            from,
            to,
            data,
            self.vocabulary()?,
            &self.parse_options,
            &self.render_options,
        )
    }
}
