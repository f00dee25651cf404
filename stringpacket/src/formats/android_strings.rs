//! Support for Android `strings.xml` localization format.
//!
//! Singular `<string>` elements are read as entries. Other resources such as
//! `<plurals>` and `<string-array>` are carried as raw XML so that rewriting
//! a file keeps them. Inline markup nested inside a string is kept as literal
//! text, and a comment right before a resource is attached to it.

use quick_xml::{
    Reader, Writer,
    escape::minimal_escape,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use std::io::{BufRead, Write};

use crate::{error::Error, traits::Parser, types::StringEntry};

const INDENT: &str = "    ";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Format {
    pub strings: Vec<StringResource>,
    /// Resources other than `<string>`, written after the strings.
    pub others: Vec<RawResource>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringResource {
    pub name: String,
    pub value: String,
    pub comment: Option<String>,
    pub translatable: Option<bool>,
}

/// A top-level element kept verbatim, e.g. `<plurals name="apples">…</plurals>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResource {
    pub comment: Option<String>,
    pub xml: String,
}

impl Format {
    pub fn from_entries(entries: Vec<StringEntry>) -> Self {
        Self {
            strings: entries.into_iter().map(StringResource::from).collect(),
            others: Vec::new(),
        }
    }

    /// Converts into entries, dropping strings marked `translatable="false"`.
    pub fn into_entries(self) -> Vec<StringEntry> {
        self.split_translatable().0
    }

    /// Separates translatable strings from everything that stays out of the
    /// packet: strings marked `translatable="false"` and non-string resources.
    pub fn split_translatable(self) -> (Vec<StringEntry>, Format) {
        let (fixed, translatable): (Vec<_>, Vec<_>) = self
            .strings
            .into_iter()
            .partition(|sr| sr.translatable == Some(false));
        for sr in &fixed {
            tracing::debug!(name = %sr.name, "skipping non-translatable string");
        }
        (
            translatable.into_iter().map(StringEntry::from).collect(),
            Format {
                strings: fixed,
                others: self.others,
            },
        )
    }

    /// Appends the strings and raw resources of `other`.
    pub fn extend(&mut self, other: &Format) {
        self.strings.extend(other.strings.iter().cloned());
        self.others.extend(other.others.iter().cloned());
    }
}

impl From<StringEntry> for StringResource {
    fn from(entry: StringEntry) -> Self {
        StringResource {
            name: entry.name,
            value: entry.value,
            comment: entry.comment.filter(|c| !c.is_empty()),
            translatable: None,
        }
    }
}

impl From<StringResource> for StringEntry {
    fn from(sr: StringResource) -> Self {
        StringEntry {
            name: sr.name,
            value: sr.value,
            comment: sr.comment,
        }
    }
}

impl Parser for Format {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);
        // Leading and trailing spaces inside a <string> are significant.
        xml_reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut resources = Vec::new();
        let mut others = Vec::new();
        let mut last_comment: Option<String> = None;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) if e.name().as_ref() == b"string" => {
                    let mut sr = parse_string_resource(e, &mut xml_reader)?;
                    sr.comment = last_comment.take();
                    resources.push(sr);
                }
                Ok(Event::Empty(ref e)) if e.name().as_ref() == b"string" => {
                    let (name, translatable) = parse_attributes(e)?;
                    resources.push(StringResource {
                        name,
                        value: String::new(),
                        comment: last_comment.take(),
                        translatable,
                    });
                }
                Ok(Event::Comment(ref e)) => {
                    let text = String::from_utf8_lossy(e).trim().to_string();
                    last_comment = (!text.is_empty()).then_some(text);
                }
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                    if e.name().as_ref() == b"resources" =>
                {
                    last_comment = None;
                }
                Ok(Event::Start(ref e)) => {
                    let xml = capture_element(e, &mut xml_reader)?;
                    others.push(RawResource {
                        comment: last_comment.take(),
                        xml,
                    });
                }
                Ok(Event::Empty(ref e)) => {
                    let mut out = Writer::new(Vec::new());
                    out.write_event(Event::Empty(e.borrow()))?;
                    others.push(RawResource {
                        comment: last_comment.take(),
                        xml: String::from_utf8_lossy(&out.into_inner()).into_owned(),
                    });
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(Error::XmlParse(e)),
            }
            buf.clear();
        }
        Ok(Format {
            strings: resources,
            others,
        })
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new(&mut writer);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;

        xml_writer.write_event(Event::Start(BytesStart::new("resources")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;

        for sr in &self.strings {
            write_comment(&mut xml_writer, sr.comment.as_deref())?;

            let mut elem = BytesStart::new("string");
            elem.push_attribute(("name", sr.name.as_str()));
            if let Some(trans) = sr.translatable {
                elem.push_attribute(("translatable", if trans { "true" } else { "false" }));
            }

            xml_writer.write_event(Event::Text(BytesText::new(INDENT)))?;
            xml_writer.write_event(Event::Start(elem))?;
            // Only `<` and `&` are escaped, so inline tags come out as `&lt;b>`.
            xml_writer.write_event(Event::Text(BytesText::from_escaped(minimal_escape(
                &sr.value,
            ))))?;
            xml_writer.write_event(Event::End(BytesEnd::new("string")))?;
            xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        }

        for raw in &self.others {
            write_comment(&mut xml_writer, raw.comment.as_deref())?;
            xml_writer.write_event(Event::Text(BytesText::new(INDENT)))?;
            xml_writer.write_event(Event::Text(BytesText::from_escaped(raw.xml.as_str())))?;
            xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new("resources")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        Ok(())
    }
}

fn write_comment<W: Write>(
    xml_writer: &mut Writer<W>,
    comment: Option<&str>,
) -> Result<(), Error> {
    if let Some(comment) = comment.filter(|c| !c.is_empty()) {
        xml_writer.write_event(Event::Text(BytesText::new(INDENT)))?;
        let body = format!(" {} ", comment.replace("--", "- -"));
        xml_writer.write_event(Event::Comment(BytesText::from_escaped(body)))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
    }
    Ok(())
}

/// Re-serializes the element opened by `start`, up to its matching end tag.
fn capture_element<R: BufRead>(
    start: &BytesStart,
    xml_reader: &mut Reader<R>,
) -> Result<String, Error> {
    let mut out = Writer::new(Vec::new());
    out.write_event(Event::Start(start.borrow()))?;

    let mut buf = Vec::new();
    let mut depth = 0usize;
    loop {
        let event = xml_reader.read_event_into(&mut buf).map_err(Error::XmlParse)?;
        let done = match &event {
            Event::Start(_) => {
                depth += 1;
                false
            }
            Event::End(_) if depth == 0 => true,
            Event::End(_) => {
                depth -= 1;
                false
            }
            Event::Eof => return Err(Error::InvalidResource("Unexpected EOF".to_string())),
            _ => false,
        };
        out.write_event(event)?;
        if done {
            break;
        }
        buf.clear();
    }
    Ok(String::from_utf8_lossy(&out.into_inner()).into_owned())
}

fn parse_attributes(e: &BytesStart) -> Result<(String, Option<bool>), Error> {
    let mut name = None;
    let mut translatable = None;

    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|e| Error::DataMismatch(e.to_string()))?;
        match attr.key.as_ref() {
            b"name" => name = Some(attr.unescape_value()?.to_string()),
            b"translatable" => {
                let v = attr.unescape_value()?.to_string();
                translatable = Some(v == "true");
            }
            _ => {}
        }
    }
    let name =
        name.ok_or_else(|| Error::InvalidResource("string tag missing 'name'".to_string()))?;
    Ok((name, translatable))
}

fn parse_string_resource<R: BufRead>(
    e: &BytesStart,
    xml_reader: &mut Reader<R>,
) -> Result<StringResource, Error> {
    let (name, translatable) = parse_attributes(e)?;

    let mut buf = Vec::new();
    let mut value = String::new();
    let mut depth = 0usize;
    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Text(t)) => value.push_str(&t.unescape().map_err(Error::XmlParse)?),
            Ok(Event::CData(t)) => value.push_str(&String::from_utf8_lossy(&t)),
            Ok(Event::Start(inner)) => {
                depth += 1;
                value.push('<');
                value.push_str(&String::from_utf8_lossy(&inner));
                value.push('>');
            }
            Ok(Event::Empty(inner)) => {
                value.push('<');
                value.push_str(&String::from_utf8_lossy(&inner));
                value.push_str("/>");
            }
            Ok(Event::End(end)) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                value.push_str("</");
                value.push_str(&String::from_utf8_lossy(end.name().as_ref()));
                value.push('>');
            }
            Ok(Event::Eof) => return Err(Error::InvalidResource("Unexpected EOF".to_string())),
            Ok(_) => (),
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }
    Ok(StringResource {
        name,
        value,
        comment: None,
        translatable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Parser;

    #[test]
    fn test_parse_basic_strings_xml() {
        let xml = r#"
        <resources>
            <string name="hello">Hello</string>
            <string name="bye" translatable="false">Goodbye</string>
            <string name="empty"></string>
            <string name="self_closed"/>
        </resources>
        "#;
        let format = Format::from_str(xml).unwrap();
        assert_eq!(format.strings.len(), 4);
        assert_eq!(format.strings[0].name, "hello");
        assert_eq!(format.strings[0].value, "Hello");
        assert_eq!(format.strings[0].translatable, None);
        assert_eq!(format.strings[1].translatable, Some(false));
        assert_eq!(format.strings[2].value, "");
        assert_eq!(format.strings[3].name, "self_closed");

        let entries = format.into_entries();
        assert_eq!(
            entries.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
            vec!["hello", "empty", "self_closed"]
        );
    }

    #[test]
    fn test_escaped_markup_is_unescaped() {
        let xml = r#"<resources>
            <string name="to_withdraw">To &lt;b>withdraw from this study&lt;/b>, you’ll need the following info:</string>
        </resources>"#;
        let format = Format::from_str(xml).unwrap();
        assert_eq!(
            format.strings[0].value,
            "To <b>withdraw from this study</b>, you’ll need the following info:"
        );
    }

    #[test]
    fn test_nested_markup_kept_literally() {
        let xml = r#"<resources><string name="bold">Tap <b>here</b> now</string></resources>"#;
        let format = Format::from_str(xml).unwrap();
        assert_eq!(format.strings[0].value, "Tap <b>here</b> now");
    }

    #[test]
    fn test_whitespace_inside_value_is_kept() {
        let xml = r#"<resources><string name="pad"> padded </string></resources>"#;
        let format = Format::from_str(xml).unwrap();
        assert_eq!(format.strings[0].value, " padded ");
    }

    #[test]
    fn test_comment_attaches_to_next_string() {
        let xml = r#"
        <resources>
            <!-- Shown on the welcome screen -->
            <string name="welcome">Welcome</string>
            <string name="next">Next</string>
        </resources>
        "#;
        let entries = Format::from_str(xml).unwrap().into_entries();
        assert_eq!(entries[0].comment.as_deref(), Some("Shown on the welcome screen"));
        assert_eq!(entries[1].comment, None);
    }

    #[test]
    fn test_plurals_kept_out_of_strings() {
        let xml = r#"
        <resources>
            <string name="hello">Hello</string>
            <!-- Fruit counter -->
            <plurals name="apples">
                <item quantity="one">One apple</item>
                <item quantity="other">%d apples &amp; more</item>
            </plurals>
            <string-array name="days"><item>Mon</item><item>Tue</item></string-array>
        </resources>
        "#;
        let format = Format::from_str(xml).unwrap();
        assert_eq!(format.strings.len(), 1);
        assert_eq!(format.strings[0].name, "hello");
        assert_eq!(format.strings[0].comment, None);

        assert_eq!(format.others.len(), 2);
        assert_eq!(format.others[0].comment.as_deref(), Some("Fruit counter"));
        assert!(format.others[0].xml.starts_with(r#"<plurals name="apples">"#));
        assert!(format.others[0].xml.contains("%d apples &amp; more</item>"));
        assert!(format.others[0].xml.ends_with("</plurals>"));
        assert_eq!(
            format.others[1].xml,
            r#"<string-array name="days"><item>Mon</item><item>Tue</item></string-array>"#
        );
    }

    #[test]
    fn test_other_resources_survive_rewrite() {
        let xml = r#"<resources>
    <plurals name="apples"><item quantity="other">%d apples</item></plurals>
    <string name="hello">Hello</string>
</resources>"#;
        let out = String::from_utf8(Format::from_str(xml).unwrap().to_bytes().unwrap()).unwrap();
        assert!(out.contains(
            "    <string name=\"hello\">Hello</string>\n    <plurals name=\"apples\"><item quantity=\"other\">%d apples</item></plurals>\n</resources>\n"
        ));
        let reparsed = Format::from_str(&out).unwrap();
        assert_eq!(reparsed.others.len(), 1);
        assert_eq!(reparsed.strings.len(), 1);
    }

    #[test]
    fn test_missing_name_attribute() {
        let xml = r#"
        <resources>
            <string>No name attr</string>
        </resources>
        "#;
        let result = Format::from_str(xml);
        assert!(result.is_err());
        let err = format!("{:?}", result.unwrap_err());
        assert!(err.contains("missing 'name'"));
    }

    #[test]
    fn test_writer_output_layout() {
        let format = Format::from_entries(vec![
            StringEntry::new("app_name", "Mobile Toolbox"),
            StringEntry::new(
                "to_withdraw",
                "To <b>withdraw from this study</b>, you’ll need the following info:",
            ),
        ]);
        let out = String::from_utf8(format.to_bytes().unwrap()).unwrap();
        let expected = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<resources>\n    <string name=\"app_name\">Mobile Toolbox</string>\n    <string name=\"to_withdraw\">To &lt;b>withdraw from this study&lt;/b>, you’ll need the following info:</string>\n</resources>\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_round_trip_with_comments() {
        let format = Format::from_entries(vec![
            StringEntry::new("greet", "Hi & welcome").with_comment("Greeting"),
            StringEntry::new("bye", "Bye"),
        ]);
        let out = String::from_utf8(format.to_bytes().unwrap()).unwrap();
        assert!(out.contains("<!-- Greeting -->"));
        let reparsed = Format::from_str(&out).unwrap().into_entries();
        assert_eq!(reparsed[0], StringEntry::new("greet", "Hi & welcome").with_comment("Greeting"));
        assert_eq!(reparsed[1], StringEntry::new("bye", "Bye"));
    }
}
