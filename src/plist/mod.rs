//! Apple text replacement property lists.
//!
//! macOS and iOS exchange text replacements as a property list whose root is
//! an array of dictionaries, each with a `phrase` (the word) and a `shortcut`
//! (the reading). Other keys are ignored on input and never written. Both XML
//! and binary (`bplist00`) lists are read; output is always XML.

mod binary;

use crate::error::{Error, Result};
use log::debug;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

const PHRASE_KEY: &str = "phrase";
const SHORTCUT_KEY: &str = "shortcut";

const DOCTYPE: &str =
    r#"plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd""#;

const BINARY_MAGIC: &[u8] = b"bplist00";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// One text replacement entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shortcut {
    /// Replacement text (the word)
    pub phrase: String,
    /// Typed text (the reading)
    pub shortcut: String,
}

/// Property list value, reduced to what shortcut extraction needs.
#[derive(Debug)]
enum Value {
    Array(Vec<Value>),
    Dict(Vec<(String, Value)>),
    String(String),
    Other,
}

impl Value {
    fn into_shortcut(self) -> Option<Shortcut> {
        let Value::Dict(entries) = self else {
            return None;
        };

        let mut shortcut = Shortcut::default();
        for (key, value) in entries {
            let Value::String(text) = value else {
                continue;
            };
            match key.as_str() {
                PHRASE_KEY => shortcut.phrase = text,
                SHORTCUT_KEY => shortcut.shortcut = text,
                _ => {}
            }
        }
        Some(shortcut)
    }
}

/// Reads the entries of an XML or binary property list.
///
/// Array items that are not dictionaries are skipped, and a missing `phrase`
/// or `shortcut` key reads as an empty string. A root that is not an array
/// yields no entries.
pub fn read_shortcuts(data: &[u8]) -> Result<Vec<Shortcut>> {
    let root = if data.starts_with(BINARY_MAGIC) {
        debug!("reading binary property list");
        Some(binary::read_root(data)?)
    } else {
        let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
        read_root(&mut Reader::from_reader(data))?
    };

    let shortcuts: Vec<Shortcut> = match root {
        Some(Value::Array(items)) => items.into_iter().filter_map(Value::into_shortcut).collect(),
        _ => Vec::new(),
    };
    debug!("property list: {} entries", shortcuts.len());
    Ok(shortcuts)
}

/// Finds the first value, looking inside `<plist>`.
fn read_root(reader: &mut Reader<&[u8]>) -> Result<Option<Value>> {
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = get_local_name(&e);
                if name != "plist" {
                    return parse_value(reader, &name).map(Some);
                }
            }
            Event::Empty(e) => {
                let name = get_local_name(&e);
                if name != "plist" {
                    return Ok(Some(empty_value(&name)));
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Parses the element whose start tag `name` was just read.
fn parse_value(reader: &mut Reader<&[u8]>, name: &str) -> Result<Value> {
    match name {
        "array" => {
            let mut items = Vec::new();
            while let Some(item) = next_child(reader)? {
                items.push(item.1);
            }
            Ok(Value::Array(items))
        }
        "dict" => {
            let mut entries = Vec::new();
            let mut key: Option<String> = None;
            while let Some((name, value)) = next_child(reader)? {
                match (name.as_str(), value) {
                    ("key", Value::String(text)) => key = Some(text),
                    (_, value) => {
                        if let Some(key) = key.take() {
                            entries.push((key, value));
                        }
                    }
                }
            }
            Ok(Value::Dict(entries))
        }
        "string" | "key" => read_text(reader).map(Value::String),
        _ => {
            read_text(reader)?;
            Ok(Value::Other)
        }
    }
}

/// Reads the next child element of a container, or `None` at its end tag.
fn next_child(reader: &mut Reader<&[u8]>) -> Result<Option<(String, Value)>> {
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = get_local_name(&e);
                let value = parse_value(reader, &name)?;
                return Ok(Some((name, value)));
            }
            Event::Empty(e) => {
                let name = get_local_name(&e);
                let value = empty_value(&name);
                return Ok(Some((name, value)));
            }
            Event::End(_) => return Ok(None),
            Event::Eof => return Err(Error::XmlParse("unexpected end of property list".to_string())),
            _ => {}
        }
    }
}

fn empty_value(name: &str) -> Value {
    match name {
        "array" => Value::Array(Vec::new()),
        "dict" => Value::Dict(Vec::new()),
        "string" | "key" => Value::String(String::new()),
        _ => Value::Other,
    }
}

/// Collects the text of the current element up to its end tag.
fn read_text(reader: &mut Reader<&[u8]>) -> Result<String> {
    let mut text = String::new();
    let mut depth = 1usize;

    loop {
        match reader.read_event()? {
            Event::Text(t) if depth == 1 => {
                let s = t.unescape().map_err(|e| Error::XmlParse(e.to_string()))?;
                text.push_str(&s);
            }
            Event::CData(c) if depth == 1 => {
                text.push_str(&String::from_utf8_lossy(&c));
            }
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Eof => return Err(Error::XmlParse("unexpected end of property list".to_string())),
            _ => {}
        }
    }

    Ok(text)
}

fn get_local_name(e: &BytesStart) -> String {
    std::str::from_utf8(e.local_name().as_ref())
        .unwrap_or("")
        .to_string()
}

/// Writes entries as an XML property list, in order.
pub fn write_shortcuts(shortcuts: &[Shortcut]) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b'\t', 1);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::DocType(BytesText::from_escaped(DOCTYPE)))?;
    writer.write_event(Event::Start(
        BytesStart::new("plist").with_attributes([("version", "1.0")]),
    ))?;

    if shortcuts.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new("array")))?;
    } else {
        writer.write_event(Event::Start(BytesStart::new("array")))?;
        for shortcut in shortcuts {
            writer.write_event(Event::Start(BytesStart::new("dict")))?;
            write_entry(&mut writer, PHRASE_KEY, &shortcut.phrase)?;
            write_entry(&mut writer, SHORTCUT_KEY, &shortcut.shortcut)?;
            writer.write_event(Event::End(BytesEnd::new("dict")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("array")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("plist")))?;

    let mut out = writer.into_inner();
    out.push(b'\n');
    Ok(out)
}

fn write_entry(writer: &mut Writer<Vec<u8>>, key: &str, value: &str) -> Result<()> {
    write_text_element(writer, "key", key)?;
    write_text_element(writer, "string", value)
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<array>
	<dict>
		<key>phrase</key>
		<string>テスト</string>
		<key>shortcut</key>
		<string>てすと</string>
	</dict>
	<dict>
		<key>shortcut</key>
		<string>あんど</string>
		<key>timestamp</key>
		<date>2020-01-01T00:00:00Z</date>
		<key>phrase</key>
		<string>A &amp; B</string>
	</dict>
	<string>not a dict</string>
	<dict>
		<key>phrase</key>
		<string/>
	</dict>
</array>
</plist>
"#;

    #[test]
    fn test_read_shortcuts() {
        let shortcuts = read_shortcuts(SAMPLE.as_bytes()).unwrap();
        assert_eq!(shortcuts.len(), 3);
        assert_eq!(shortcuts[0].phrase, "テスト");
        assert_eq!(shortcuts[0].shortcut, "てすと");
        assert_eq!(shortcuts[1].phrase, "A & B");
        assert_eq!(shortcuts[1].shortcut, "あんど");
        assert_eq!(shortcuts[2], Shortcut::default());
    }

    #[test]
    fn test_non_array_root_is_empty() {
        let xml = r#"<?xml version="1.0"?><plist version="1.0"><dict><key>a</key><string>b</string></dict></plist>"#;
        assert!(read_shortcuts(xml.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_binary_and_xml_read_alike() {
        let binary = binary::tests::shortcut_list(&[("テスト", "てすと"), ("A & B", "あんど")]);
        let shortcuts = read_shortcuts(&binary).unwrap();
        assert_eq!(shortcuts, read_shortcuts(SAMPLE.as_bytes()).unwrap()[..2]);
    }

    #[test]
    fn test_truncated_plist_is_an_error() {
        let xml = "<plist><array><dict><key>phrase</key>";
        assert!(matches!(
            read_shortcuts(xml.as_bytes()),
            Err(Error::XmlParse(_))
        ));
    }

    #[test]
    fn test_write_shortcuts() {
        let shortcuts = vec![Shortcut {
            phrase: "A<B>".to_string(),
            shortcut: "えー".to_string(),
        }];
        let xml = String::from_utf8(write_shortcuts(&shortcuts).unwrap()).unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains("<!DOCTYPE plist PUBLIC"));
        assert!(xml.contains(r#"<plist version="1.0">"#));
        assert!(xml.contains("<key>phrase</key>"));
        assert!(xml.contains("<string>A&lt;B&gt;</string>"));
        assert!(xml.contains("<string>えー</string>"));
        assert!(xml.ends_with("</plist>\n"));

        assert_eq!(read_shortcuts(xml.as_bytes()).unwrap(), shortcuts);
    }

    #[test]
    fn test_write_empty_list() {
        let xml = String::from_utf8(write_shortcuts(&[]).unwrap()).unwrap();
        assert!(xml.contains("<array/>"));
        assert!(read_shortcuts(xml.as_bytes()).unwrap().is_empty());
    }
}
