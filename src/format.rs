//! Dictionary format identifiers and their static descriptors.
//!
//! A [`DictFormat`] is resolved once into a [`FormatDescriptor`] that carries
//! everything the pipeline needs to know about it: the [`Dialect`] used to
//! parse and render records, the encodings to probe on input, and the
//! encoding, newline convention and header used on output.

use crate::encoding::{OutputEncoding, TextEncoding, DEFAULT_PROBE, MSIME_PROBE};
use crate::error::{Error, Result};
use std::str::FromStr;

/// Supported dictionary formats, as named on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DictFormat {
    /// Mozc user dictionary (tab separated)
    Mozc,
    /// Google Japanese Input; same as Mozc
    Google,
    /// Anthy private dictionary (space separated, `#TAG*weight`)
    Anthy,
    /// Canna; same records as Anthy, EUC-JP on output
    Canna,
    /// ATOK word list (UTF-16, CRLF)
    Atok,
    /// Microsoft IME text dictionary (UTF-16LE with BOM, CRLF)
    Msime,
    /// Wnn text dictionary (EUC-JP)
    Wnn,
    /// Apple text replacement property list
    Apple,
    /// Tab separated with canonical part-of-speech labels
    Generic,
}

impl DictFormat {
    /// Every supported format.
    pub const ALL: [DictFormat; 9] = [
        DictFormat::Mozc,
        DictFormat::Google,
        DictFormat::Anthy,
        DictFormat::Canna,
        DictFormat::Atok,
        DictFormat::Msime,
        DictFormat::Wnn,
        DictFormat::Apple,
        DictFormat::Generic,
    ];

    /// Returns the identifier of the format.
    pub fn name(self) -> &'static str {
        match self {
            DictFormat::Mozc => "mozc",
            DictFormat::Google => "google",
            DictFormat::Anthy => "anthy",
            DictFormat::Canna => "canna",
            DictFormat::Atok => "atok",
            DictFormat::Msime => "msime",
            DictFormat::Wnn => "wnn",
            DictFormat::Apple => "apple",
            DictFormat::Generic => "generic",
        }
    }

    /// Returns a short human readable description.
    pub fn description(self) -> &'static str {
        match self {
            DictFormat::Mozc => "Mozc user dictionary",
            DictFormat::Google => "Google Japanese Input (alias of mozc)",
            DictFormat::Anthy => "Anthy private dictionary",
            DictFormat::Canna => "Canna dictionary (anthy records, EUC-JP)",
            DictFormat::Atok => "ATOK word list",
            DictFormat::Msime => "Microsoft IME text dictionary",
            DictFormat::Wnn => "Wnn text dictionary",
            DictFormat::Apple => "Apple text replacement property list",
            DictFormat::Generic => "Tab separated, canonical part-of-speech",
        }
    }

    /// Returns the record dialect shared by this format and its aliases.
    pub fn dialect(self) -> Dialect {
        self.descriptor().dialect
    }

    /// Returns the static descriptor of the format.
    pub fn descriptor(self) -> &'static FormatDescriptor {
        match self {
            DictFormat::Mozc | DictFormat::Google => &MOZC,
            DictFormat::Anthy => &ANTHY,
            DictFormat::Canna => &CANNA,
            DictFormat::Atok => &ATOK,
            DictFormat::Msime => &MSIME,
            DictFormat::Wnn => &WNN,
            DictFormat::Apple => &APPLE,
            DictFormat::Generic => &GENERIC,
        }
    }
}

impl std::fmt::Display for DictFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DictFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        DictFormat::ALL
            .into_iter()
            .find(|format| format.name() == name)
            .ok_or_else(|| Error::UnsupportedFormat(s.to_string()))
    }
}

/// Record-level behaviour shared by a format and its aliases.
///
/// Every dialect except [`Dialect::Apple`] owns a column of the
/// part-of-speech table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Generic,
    Mozc,
    Anthy,
    Atok,
    Msime,
    Wnn,
    Apple,
}

impl Dialect {
    /// Dialects in part-of-speech table column order.
    pub const COLUMNS: [Dialect; 6] = [
        Dialect::Generic,
        Dialect::Mozc,
        Dialect::Anthy,
        Dialect::Atok,
        Dialect::Msime,
        Dialect::Wnn,
    ];

    /// Returns the table column holding this dialect's labels.
    pub fn column(self) -> Option<usize> {
        Self::COLUMNS.iter().position(|&dialect| dialect == self)
    }

    /// Returns the name of the dialect.
    pub fn name(self) -> &'static str {
        match self {
            Dialect::Generic => "generic",
            Dialect::Mozc => "mozc",
            Dialect::Anthy => "anthy",
            Dialect::Atok => "atok",
            Dialect::Msime => "msime",
            Dialect::Wnn => "wnn",
            Dialect::Apple => "apple",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Container of a dictionary file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Encoded text, one record per line
    Lines,
    /// Property list (XML or binary) of `phrase`/`shortcut` groups
    PropertyList,
}

/// Line terminator written on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Newline {
    Lf,
    CrLf,
}

impl Newline {
    /// Returns the terminator text.
    pub fn as_str(self) -> &'static str {
        match self {
            Newline::Lf => "\n",
            Newline::CrLf => "\r\n",
        }
    }
}

/// Header lines synthesized before the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Header {
    None,
    /// Microsoft IME dictionary tool banner
    Msime,
    /// ATOK word list banner
    Atok,
    /// Wnn comment and record total
    Wnn,
}

impl Header {
    /// Returns the header lines for a dictionary of `record_count` records.
    pub fn lines(self, record_count: usize) -> Vec<String> {
        match self {
            Header::None => Vec::new(),
            Header::Msime => vec!["!Microsoft IME Dictionary Tool".to_string()],
            Header::Atok => vec!["!!ATOK_TANGO_TEXT_HEADER_1".to_string()],
            Header::Wnn => vec!["\\comment".to_string(), format!("\\total {}", record_count)],
        }
    }
}

/// Static knowledge about one dictionary format.
#[derive(Debug)]
pub struct FormatDescriptor {
    /// Record dialect
    pub dialect: Dialect,
    /// File container
    pub layout: Layout,
    /// Encodings tried in order when decoding input
    pub probe: &'static [TextEncoding],
    /// Encoding used when writing output
    pub encoding: OutputEncoding,
    /// Line terminator used when writing output
    pub newline: Newline,
    /// Header written before the records
    pub header: Header,
}

impl FormatDescriptor {
    const fn lines(
        dialect: Dialect,
        probe: &'static [TextEncoding],
        encoding: OutputEncoding,
        newline: Newline,
        header: Header,
    ) -> Self {
        Self {
            dialect,
            layout: Layout::Lines,
            probe,
            encoding,
            newline,
            header,
        }
    }
}

static GENERIC: FormatDescriptor = FormatDescriptor::lines(
    Dialect::Generic,
    DEFAULT_PROBE,
    OutputEncoding::Utf8,
    Newline::Lf,
    Header::None,
);

static MOZC: FormatDescriptor = FormatDescriptor::lines(
    Dialect::Mozc,
    DEFAULT_PROBE,
    OutputEncoding::Utf8,
    Newline::Lf,
    Header::None,
);

static ANTHY: FormatDescriptor = FormatDescriptor::lines(
    Dialect::Anthy,
    DEFAULT_PROBE,
    OutputEncoding::Utf8,
    Newline::Lf,
    Header::None,
);

static CANNA: FormatDescriptor = FormatDescriptor::lines(
    Dialect::Anthy,
    DEFAULT_PROBE,
    OutputEncoding::EucJp,
    Newline::Lf,
    Header::None,
);

static ATOK: FormatDescriptor = FormatDescriptor::lines(
    Dialect::Atok,
    DEFAULT_PROBE,
    OutputEncoding::Utf16LeBom,
    Newline::CrLf,
    Header::Atok,
);

static MSIME: FormatDescriptor = FormatDescriptor::lines(
    Dialect::Msime,
    MSIME_PROBE,
    OutputEncoding::Utf16LeBom,
    Newline::CrLf,
    Header::Msime,
);

static WNN: FormatDescriptor = FormatDescriptor::lines(
    Dialect::Wnn,
    DEFAULT_PROBE,
    OutputEncoding::EucJp,
    Newline::Lf,
    Header::Wnn,
);

static APPLE: FormatDescriptor = FormatDescriptor {
    dialect: Dialect::Apple,
    layout: Layout::PropertyList,
    probe: &[],
    encoding: OutputEncoding::Utf8,
    newline: Newline::Lf,
    header: Header::None,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_identifiers() {
        for format in DictFormat::ALL {
            assert_eq!(format.name().parse::<DictFormat>().unwrap(), format);
        }
        assert_eq!(" MSIME ".parse::<DictFormat>().unwrap(), DictFormat::Msime);
    }

    #[test]
    fn test_parse_unknown_identifier() {
        match "skk".parse::<DictFormat>() {
            Err(Error::UnsupportedFormat(name)) => assert_eq!(name, "skk"),
            _ => panic!("Expected UnsupportedFormat error"),
        }
    }

    #[test]
    fn test_aliases_share_dialect() {
        assert_eq!(DictFormat::Google.dialect(), Dialect::Mozc);
        assert_eq!(DictFormat::Canna.dialect(), Dialect::Anthy);
        // Canna keeps its own output encoding
        assert_eq!(DictFormat::Anthy.descriptor().encoding, OutputEncoding::Utf8);
        assert_eq!(DictFormat::Canna.descriptor().encoding, OutputEncoding::EucJp);
    }

    #[test]
    fn test_msime_probes_utf8_before_legacy() {
        let probe = DictFormat::Msime.descriptor().probe;
        assert_eq!(
            probe,
            [
                TextEncoding::Utf16Le,
                TextEncoding::Utf8,
                TextEncoding::ShiftJis,
                TextEncoding::EucJp
            ]
        );
        assert_eq!(DictFormat::Wnn.descriptor().probe.last(), Some(&TextEncoding::Utf8));
    }

    #[test]
    fn test_dialect_columns() {
        assert_eq!(Dialect::Generic.column(), Some(0));
        assert_eq!(Dialect::Wnn.column(), Some(5));
        assert_eq!(Dialect::Apple.column(), None);
    }

    #[test]
    fn test_headers() {
        assert!(Header::None.lines(3).is_empty());
        assert_eq!(Header::Wnn.lines(3), ["\\comment", "\\total 3"]);
        assert_eq!(DictFormat::Msime.descriptor().newline.as_str(), "\r\n");
    }
}
