//! Record rendering and output encoding.

mod encode;
mod options;

pub use encode::encode;
pub use options::{RenderOptions, DEFAULT_WEIGHT};

use crate::error::{Error, Result};
use crate::format::Dialect;
use crate::model::Record;
use crate::vocabulary::Vocabulary;
use rayon::prelude::*;

/// Formats one record as a line of `dialect` output.
///
/// Fails if the record's part-of-speech has no label in the dialect.
pub fn format_record(
    dialect: Dialect,
    record: &Record,
    vocabulary: &Vocabulary,
    options: &RenderOptions,
) -> Result<String> {
    if dialect == Dialect::Apple {
        return Ok(format!("{}\t{}", record.pronunciation, record.word));
    }

    let label = vocabulary
        .reverse(dialect, &record.part_of_speech)
        .ok_or_else(|| Error::UnrepresentablePartOfSpeech {
            format: dialect.name().to_string(),
            label: record.part_of_speech.clone(),
        })?;

    let line = match dialect {
        Dialect::Anthy => format!(
            "{} #{}*{} {}",
            record.pronunciation, label, options.weight, record.word
        ),
        _ => format!("{}\t{}\t{}", record.pronunciation, record.word, label),
    };
    Ok(line)
}

/// Formats every record, in order. Stops at the first failure.
pub fn render_lines(
    dialect: Dialect,
    records: &[Record],
    vocabulary: &Vocabulary,
    options: &RenderOptions,
) -> Result<Vec<String>> {
    if options.parallel {
        records
            .par_iter()
            .map(|record| format_record(dialect, record, vocabulary, options))
            .collect()
    } else {
        records
            .iter()
            .map(|record| format_record(dialect, record, vocabulary, options))
            .collect()
    }
}
