//! Text encodings: input probing and output serialization.
//!
//! Dictionary exports rarely say which encoding they use, and several
//! encodings accept the same bytes. Input is decoded by trying an ordered list
//! of candidates per format and accepting the first strict decode; if none
//! succeeds the input is decoded as UTF-8 with replacement characters, so
//! decoding never fails.

use encoding_rs::{EncoderResult, Encoding, EUC_JP, SHIFT_JIS, UTF_16BE, UTF_16LE, UTF_8};
use log::{debug, warn};

/// Candidate encodings for dictionary input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
    /// Shift_JIS as written by Windows (CP932)
    ShiftJis,
    EucJp,
}

/// Probe order used by most formats.
pub const DEFAULT_PROBE: &[TextEncoding] = &[
    TextEncoding::Utf16Le,
    TextEncoding::ShiftJis,
    TextEncoding::EucJp,
    TextEncoding::Utf8,
];

/// Probe order for Microsoft IME, whose exports are either UTF-16LE or
/// UTF-8 without a BOM.
pub const MSIME_PROBE: &[TextEncoding] = &[
    TextEncoding::Utf16Le,
    TextEncoding::Utf8,
    TextEncoding::ShiftJis,
    TextEncoding::EucJp,
];

impl TextEncoding {
    fn encoding(self) -> &'static Encoding {
        match self {
            TextEncoding::Utf8 => UTF_8,
            TextEncoding::Utf16Le => UTF_16LE,
            TextEncoding::Utf16Be => UTF_16BE,
            TextEncoding::ShiftJis => SHIFT_JIS,
            TextEncoding::EucJp => EUC_JP,
        }
    }

    fn from_encoding(encoding: &'static Encoding) -> Option<Self> {
        [
            TextEncoding::Utf8,
            TextEncoding::Utf16Le,
            TextEncoding::Utf16Be,
            TextEncoding::ShiftJis,
            TextEncoding::EucJp,
        ]
        .into_iter()
        .find(|candidate| candidate.encoding() == encoding)
    }

    /// Returns the WHATWG name of the encoding.
    pub fn name(self) -> &'static str {
        self.encoding().name()
    }

    /// Decodes `data`, failing on any malformed or unmappable sequence.
    pub fn decode_strict(self, data: &[u8]) -> Option<String> {
        self.encoding()
            .decode_without_bom_handling_and_without_replacement(data)
            .map(|text| text.into_owned())
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoded input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    /// Decoded text, BOM removed
    pub text: String,
    /// Encoding that decoded the input; `None` if the lossy fallback was used
    pub encoding: Option<TextEncoding>,
}

/// Decodes dictionary input.
///
/// A byte-order mark selects its encoding directly. Otherwise the `probe`
/// candidates are tried in order and the first strict decode wins. UTF-16
/// accepts almost any even-length buffer without unpaired surrogates, so
/// BOM-less 8-bit text of even length usually resolves to UTF-16LE.
pub fn decode_text(data: &[u8], probe: &[TextEncoding]) -> DecodedText {
    if let Some((encoding, bom_length)) = Encoding::for_bom(data) {
        if let Some(candidate) = TextEncoding::from_encoding(encoding) {
            if let Some(text) = candidate.decode_strict(&data[bom_length..]) {
                debug!("decoded input as {} (byte-order mark)", candidate);
                return DecodedText {
                    text,
                    encoding: Some(candidate),
                };
            }
        }
    }

    for &candidate in probe {
        if let Some(text) = candidate.decode_strict(data) {
            debug!("decoded input as {}", candidate);
            return DecodedText {
                text,
                encoding: Some(candidate),
            };
        }
    }

    warn!(
        "input is not valid in any of {} candidate encodings, decoding as UTF-8 with replacement",
        probe.len()
    );
    let (text, _) = UTF_8.decode_with_bom_removal(data);
    DecodedText {
        text: text.into_owned(),
        encoding: None,
    }
}

/// Encodings written on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEncoding {
    Utf8,
    /// UTF-16 little endian preceded by a byte-order mark
    Utf16LeBom,
    /// EUC-JP, `?` for unmappable characters
    EucJp,
}

impl OutputEncoding {
    /// Encodes `text`. Never fails; unrepresentable characters are replaced.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            OutputEncoding::Utf8 => text.as_bytes().to_vec(),
            OutputEncoding::Utf16LeBom => encode_utf16le_with_bom(text),
            OutputEncoding::EucJp => encode_lossy(EUC_JP, text),
        }
    }
}

// encoding_rs only encodes to ASCII-compatible encodings.
fn encode_utf16le_with_bom(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 + text.len() * 2);
    out.extend_from_slice(&[0xFF, 0xFE]);
    for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    out
}

/// Encodes with `?` in place of unmappable characters.
///
/// `Encoding::encode` would write HTML numeric character references instead,
/// which no input method reads back as text.
fn encode_lossy(encoding: &'static Encoding, text: &str) -> Vec<u8> {
    let mut encoder = encoding.new_encoder();
    let mut out = Vec::with_capacity(text.len());
    let mut remaining = text;

    loop {
        let needed = encoder
            .max_buffer_length_from_utf8_without_replacement(remaining.len())
            .unwrap_or(remaining.len() * 4 + 16);
        let start = out.len();
        out.resize(start + needed, 0);

        let (result, read, written) =
            encoder.encode_from_utf8_without_replacement(remaining, &mut out[start..], true);
        out.truncate(start + written);
        remaining = &remaining[read..];

        match result {
            EncoderResult::InputEmpty => break,
            EncoderResult::OutputFull => {}
            EncoderResult::Unmappable(_) => out.push(b'?'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bom_selects_encoding() {
        let data = [0xEF, 0xBB, 0xBF, b'a', b'\t', b'b'];
        let decoded = decode_text(&data, DEFAULT_PROBE);
        assert_eq!(decoded.text, "a\tb");
        assert_eq!(decoded.encoding, Some(TextEncoding::Utf8));

        let data = [0xFE, 0xFF, 0x30, 0x42];
        let decoded = decode_text(&data, DEFAULT_PROBE);
        assert_eq!(decoded.text, "あ");
        assert_eq!(decoded.encoding, Some(TextEncoding::Utf16Be));
    }

    #[test]
    fn test_bomless_utf16le() {
        // "あ\tア" in UTF-16LE
        let data = [0x42, 0x30, 0x09, 0x00, 0xA2, 0x30];
        let decoded = decode_text(&data, DEFAULT_PROBE);
        assert_eq!(decoded.text, "あ\tア");
        assert_eq!(decoded.encoding, Some(TextEncoding::Utf16Le));
    }

    #[test]
    fn test_first_clean_decode_wins() {
        // Even length Shift_JIS without NUL bytes is also valid UTF-16LE
        let (data, _, _) = SHIFT_JIS.encode("てすと\tテスト\t名詞\r\n");
        assert_eq!(data.len() % 2, 0);
        assert!(!data.contains(&0));

        let decoded = decode_text(&data, DEFAULT_PROBE);
        assert_eq!(decoded.encoding, Some(TextEncoding::Utf16Le));
        assert_eq!(Some(decoded.text), TextEncoding::Utf16Le.decode_strict(&data));
    }

    #[test]
    fn test_shift_jis_input() {
        // Odd length rules out UTF-16
        let (data, _, _) = SHIFT_JIS.encode("てすと\tテスト\t名詞\n");
        assert_eq!(data.len() % 2, 1);

        let decoded = decode_text(&data, DEFAULT_PROBE);
        assert_eq!(decoded.text, "てすと\tテスト\t名詞\n");
        assert_eq!(decoded.encoding, Some(TextEncoding::ShiftJis));
    }

    #[test]
    fn test_euc_jp_input() {
        let (data, _, _) = EUC_JP.encode("てすと\tテスト\t名詞\n");
        let decoded = decode_text(&data, DEFAULT_PROBE);
        assert_eq!(decoded.text, "てすと\tテスト\t名詞\n");
        assert_eq!(decoded.encoding, Some(TextEncoding::EucJp));
    }

    #[test]
    fn test_utf8_without_bom() {
        let data = "てすと\tテスト\t名詞\n".as_bytes();
        let decoded = decode_text(data, DEFAULT_PROBE);
        assert_eq!(decoded.text, "てすと\tテスト\t名詞\n");
        assert_eq!(decoded.encoding, Some(TextEncoding::Utf8));
    }

    #[test]
    fn test_lossy_fallback() {
        // Odd length, invalid in every legacy encoding and in UTF-8
        let data = [0xFF, 0xFF, 0xFF];
        let decoded = decode_text(&data, DEFAULT_PROBE);
        assert_eq!(decoded.encoding, None);
        assert_eq!(decoded.text, "\u{FFFD}\u{FFFD}\u{FFFD}");
    }

    #[test]
    fn test_encode_utf16le_with_bom() {
        let bytes = OutputEncoding::Utf16LeBom.encode("あ\r\n");
        assert_eq!(bytes, [0xFF, 0xFE, 0x42, 0x30, 0x0D, 0x00, 0x0A, 0x00]);
    }

    #[test]
    fn test_encode_euc_jp_replaces_unmappable() {
        let bytes = OutputEncoding::EucJp.encode("あ😀b");
        assert_eq!(bytes, [0xA4, 0xA2, b'?', b'b']);
    }
}
