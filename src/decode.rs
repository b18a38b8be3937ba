//! Raw input bytes to text lines.

use crate::encoding::{decode_text, TextEncoding};
use crate::error::Result;
use crate::format::{DictFormat, Layout};

/// Decoded dictionary input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedInput {
    /// Lines with terminators removed
    pub lines: Vec<String>,
    /// Encoding that decoded the input, if any strict decode succeeded
    pub encoding: Option<TextEncoding>,
}

/// Decodes raw input of `format` into lines.
///
/// Text formats are decoded with the format's probe order and split on any
/// of `\r\n`, `\r` and `\n`. Property lists are flattened into
/// `shortcut<TAB>phrase` lines.
pub fn decode(format: DictFormat, data: &[u8]) -> Result<DecodedInput> {
    let descriptor = format.descriptor();

    match descriptor.layout {
        Layout::Lines => {
            let decoded = decode_text(data, descriptor.probe);
            Ok(DecodedInput {
                lines: split_lines(&decoded.text),
                encoding: decoded.encoding,
            })
        }
        Layout::PropertyList => decode_property_list(data),
    }
}

#[cfg(feature = "apple")]
fn decode_property_list(data: &[u8]) -> Result<DecodedInput> {
    let lines = crate::plist::read_shortcuts(data)?
        .into_iter()
        .map(|entry| format!("{}\t{}", entry.shortcut, entry.phrase))
        .collect();

    Ok(DecodedInput {
        lines,
        encoding: Some(TextEncoding::Utf8),
    })
}

#[cfg(not(feature = "apple"))]
fn decode_property_list(_data: &[u8]) -> Result<DecodedInput> {
    Err(crate::error::Error::UnsupportedFormat(
        "Apple property lists require 'apple' feature".to_string(),
    ))
}

/// Splits text into lines, accepting every newline convention.
///
/// A trailing terminator does not produce an empty last line.
pub fn split_lines(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    normalized.lines().map(str::to_string).collect()
}
