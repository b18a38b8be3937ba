//! Dialect-specific line parsing into canonical records.

use crate::error::{Error, Result};
use crate::format::Dialect;
use crate::kana::normalize_kana;
use crate::model::{Diagnostic, Diagnostics, Record, DEFAULT_PART_OF_SPEECH};
use crate::parse_options::ParseOptions;
use crate::vocabulary::Vocabulary;
use log::debug;
use rayon::prelude::*;
use std::borrow::Cow;

/// Field separators some ATOK exports use instead of tabs.
const ATOK_DELIMITERS: &[char] = &['､', '，', ','];

/// Outcome of parsing one line.
///
/// Both fields are `None` for lines that carry no data (blank lines,
/// comments, headers).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineParse {
    /// Parsed record, if the line holds one
    pub record: Option<Record>,
    /// Problem found on the line
    pub diagnostic: Option<Diagnostic>,
}

impl LineParse {
    fn skipped() -> Self {
        Self::default()
    }

    fn rejected(diagnostic: Diagnostic) -> Self {
        Self {
            record: None,
            diagnostic: Some(diagnostic),
        }
    }
}

/// Raw fields of a line, before part-of-speech lookup.
struct Fields {
    pronunciation: String,
    word: Option<String>,
    label: Option<String>,
}

/// Parses one line of `dialect` input.
pub fn parse_line(dialect: Dialect, line: &str, vocabulary: &Vocabulary) -> LineParse {
    let line = line.trim().trim_start_matches('\u{FEFF}');
    if line.is_empty() || line.starts_with('!') || line.starts_with('\\') {
        return LineParse::skipped();
    }

    let fields = match dialect {
        Dialect::Generic | Dialect::Mozc | Dialect::Msime | Dialect::Wnn => split_tabbed(line),
        Dialect::Atok => split_atok(line),
        Dialect::Anthy => split_anthy(line),
        Dialect::Apple => {
            let [pronunciation, word] = take_fields(line.split('\t'));
            Fields {
                pronunciation: pronunciation.unwrap_or_default().to_string(),
                word: word.map(str::to_string),
                label: None,
            }
        }
    };

    let Some(word) = fields.word else {
        return LineParse::rejected(Diagnostic::IncorrectRecord {
            line: line.to_string(),
        });
    };

    if dialect == Dialect::Apple {
        return LineParse {
            record: Some(Record::noun(fields.pronunciation, word)),
            diagnostic: None,
        };
    }

    let label = fields.label.unwrap_or_default();
    match vocabulary.forward(dialect, &label) {
        Some(canonical) => LineParse {
            record: Some(Record::new(fields.pronunciation, word, canonical)),
            diagnostic: None,
        },
        None => LineParse {
            record: Some(Record::new(
                fields.pronunciation,
                word,
                DEFAULT_PART_OF_SPEECH,
            )),
            diagnostic: Some(Diagnostic::UnknownPartOfSpeech {
                line: line.to_string(),
                label,
            }),
        },
    }
}

/// Parses every line, in order.
///
/// Diagnostics are appended to `diagnostics`. Under strict error handling
/// the first diagnostic is returned as [`Error::Rejected`] instead.
pub fn parse_lines(
    dialect: Dialect,
    lines: &[String],
    vocabulary: &Vocabulary,
    options: &ParseOptions,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<Record>> {
    let parsed: Vec<LineParse> = if options.parallel {
        lines
            .par_iter()
            .map(|line| parse_line(dialect, line, vocabulary))
            .collect()
    } else {
        lines
            .iter()
            .map(|line| parse_line(dialect, line, vocabulary))
            .collect()
    };

    let mut records = Vec::with_capacity(parsed.len());
    for LineParse { record, diagnostic } in parsed {
        if let Some(diagnostic) = diagnostic {
            if options.is_strict() {
                return Err(Error::Rejected(diagnostic));
            }
            diagnostics.push(diagnostic);
        }
        records.extend(record);
    }

    debug!(
        "parsed {} records from {} {} lines",
        records.len(),
        lines.len(),
        dialect
    );
    Ok(records)
}

/// Takes the first `N` fields; missing ones are `None`, extra ones dropped.
fn take_fields<'a, const N: usize>(mut fields: impl Iterator<Item = &'a str>) -> [Option<&'a str>; N] {
    std::array::from_fn(|_| fields.next())
}

fn split_tabbed(line: &str) -> Fields {
    let [pronunciation, word, label] = take_fields(line.split('\t'));
    Fields {
        pronunciation: pronunciation.unwrap_or_default().to_string(),
        word: word.map(str::to_string),
        label: label.map(str::to_string),
    }
}

/// `reading<TAB>word<TAB>label[*]`, comma separated when no tab is present.
fn split_atok(line: &str) -> Fields {
    let line: Cow<'_, str> = if line.contains('\t') {
        Cow::Borrowed(line)
    } else {
        Cow::Owned(line.replace(ATOK_DELIMITERS, "\t"))
    };

    let mut fields = split_tabbed(&line);
    fields.pronunciation = normalize_kana(&fields.pronunciation);
    fields.label = fields
        .label
        .map(|label| label.trim_end_matches('*').to_string());
    fields
}

/// `reading #LABEL*weight word`, whitespace separated.
fn split_anthy(line: &str) -> Fields {
    let [pronunciation, tag, word] = take_fields(line.split_whitespace());
    let label = tag.map(|tag| {
        let tag = tag.replace('#', "");
        match tag.split_once('*') {
            Some((label, _weight)) => label.to_string(),
            None => tag,
        }
    });

    Fields {
        pronunciation: pronunciation.unwrap_or_default().to_string(),
        word: word.map(str::to_string),
        label,
    }
}
