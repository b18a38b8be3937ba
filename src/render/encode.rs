//! Output lines to raw bytes.

use crate::error::{Error, Result};
use crate::format::{DictFormat, Layout};
use log::debug;

/// Encodes formatted lines as a `format` file.
///
/// Line formats get the format's header, newline convention (including a
/// trailing newline) and encoding. For property lists each line must be
/// `shortcut<TAB>phrase`.
pub fn encode(format: DictFormat, lines: &[String]) -> Result<Vec<u8>> {
    let descriptor = format.descriptor();

    match descriptor.layout {
        Layout::Lines => {
            let newline = descriptor.newline.as_str();
            let header = descriptor.header.lines(lines.len());

            let mut text = String::new();
            for line in header.iter().chain(lines) {
                text.push_str(line);
                text.push_str(newline);
            }

            let bytes = descriptor.encoding.encode(&text);
            debug!(
                "encoded {} lines as {} ({} bytes)",
                lines.len(),
                format,
                bytes.len()
            );
            Ok(bytes)
        }
        Layout::PropertyList => encode_property_list(lines),
    }
}

#[cfg(feature = "apple")]
fn encode_property_list(lines: &[String]) -> Result<Vec<u8>> {
    use crate::plist::{write_shortcuts, Shortcut};

    let shortcuts = lines
        .iter()
        .map(|line| {
            let (shortcut, phrase) = line
                .split_once('\t')
                .ok_or_else(|| Error::InvalidData(format!("expected reading and word: {}", line)))?;
            Ok(Shortcut {
                phrase: phrase.to_string(),
                shortcut: shortcut.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    write_shortcuts(&shortcuts)
}

#[cfg(not(feature = "apple"))]
fn encode_property_list(_lines: &[String]) -> Result<Vec<u8>> {
    Err(Error::UnsupportedFormat(
        "Apple property lists require 'apple' feature".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_mozc_is_plain_utf8() {
        let bytes = encode(DictFormat::Mozc, &lines(&["あ\tア\t名詞"])).unwrap();
        assert_eq!(bytes, "あ\tア\t名詞\n".as_bytes());
    }

    #[test]
    fn test_empty_output_has_only_header() {
        assert!(encode(DictFormat::Generic, &[]).unwrap().is_empty());

        let bytes = encode(DictFormat::Wnn, &[]).unwrap();
        assert_eq!(bytes, b"\\comment\n\\total 0\n");
    }

    #[test]
    fn test_msime_header_and_encoding() {
        let bytes = encode(DictFormat::Msime, &lines(&["a\tb\tc"])).unwrap();

        let mut expected = vec![0xFF, 0xFE];
        for unit in "!Microsoft IME Dictionary Tool\r\na\tb\tc\r\n".encode_utf16() {
            expected.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_wnn_total_and_euc_jp() {
        let bytes = encode(DictFormat::Wnn, &lines(&["あ\tア\t名詞", "い\tイ\t名詞"])).unwrap();
        let (text, _, had_errors) = encoding_rs::EUC_JP.decode(&bytes);
        assert!(!had_errors);
        assert_eq!(text, "\\comment\n\\total 2\nあ\tア\t名詞\nい\tイ\t名詞\n");
    }

    #[test]
    fn test_canna_is_euc_jp_anthy_is_utf8() {
        let line = lines(&["あ #T35*500 ア"]);
        assert_eq!(encode(DictFormat::Anthy, &line).unwrap(), "あ #T35*500 ア\n".as_bytes());
        assert_eq!(
            encode(DictFormat::Canna, &line).unwrap(),
            [0xA4, 0xA2, b' ', b'#', b'T', b'3', b'5', b'*', b'5', b'0', b'0', b' ', 0xA5, 0xA2, b'\n']
        );
    }

    #[cfg(feature = "apple")]
    #[test]
    fn test_property_list_requires_two_fields() {
        let result = encode(DictFormat::Apple, &lines(&["no tab"]));
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }
}
