//! A small XML writer that escapes every attribute value exactly once.
//!
//! Values are always taken raw from the model and escaped on the way out.
//! Nothing here ever reads back serialized XML.

use std::borrow::Cow;

use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, Event, attributes::Attribute},
    name::QName,
};

/// Escapes `value` for use inside a double-quoted XML attribute.
///
/// The five markup characters become entity references. Newline, carriage
/// return and tab become character references so attribute-value
/// normalization keeps them. Other characters XML 1.0 cannot carry are
/// replaced with U+FFFD.
///
/// # Examples
///
/// ```
/// use stratus::export::escape_attr;
///
/// assert_eq!(escape_attr(r#"<a & "b">"#), "&lt;a &amp; &quot;b&quot;&gt;");
/// assert_eq!(escape_attr("x\ny"), "x&#10;y");
/// assert_eq!(escape_attr("&amp;"), "&amp;amp;");
/// ```
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            ch if is_xml_char(ch) => out.push(ch),
            _ => out.push(char::REPLACEMENT_CHARACTER),
        }
    }
    out
}

/// The `Char` production of XML 1.0.
fn is_xml_char(ch: char) -> bool {
    matches!(ch,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

/// Streams nested elements into a string through [`quick_xml::Writer`].
///
/// Attribute values are escaped here and handed to `quick_xml` as-is, so the
/// newline references survive.
pub(crate) struct XmlWriter {
    writer: Writer<Vec<u8>>,
    open: Vec<&'static str>,
}

impl XmlWriter {
    /// Starts a document with the XML declaration.
    pub(crate) fn new() -> Self {
        let mut writer = Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
            open: Vec::new(),
        };
        writer.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)));
        writer
    }

    /// Opens an element that will receive children.
    pub(crate) fn open(&mut self, name: &'static str, attrs: &[(&str, &str)]) {
        self.write(Event::Start(start_tag(name, attrs)));
        self.open.push(name);
    }

    /// Writes a self-closing element.
    pub(crate) fn empty(&mut self, name: &'static str, attrs: &[(&str, &str)]) {
        self.write(Event::Empty(start_tag(name, attrs)));
    }

    /// Closes the innermost open element.
    pub(crate) fn close(&mut self) {
        if let Some(name) = self.open.pop() {
            self.write(Event::End(BytesEnd::new(name)));
        }
    }

    /// Closes every open element and returns the document.
    pub(crate) fn finish(mut self) -> String {
        while !self.open.is_empty() {
            self.close();
        }
        String::from_utf8_lossy(&self.writer.into_inner()).into_owned()
    }

    fn write(&mut self, event: Event<'_>) {
        self.writer
            .write_event(event)
            .expect("Writing to a Vec buffer is infallible");
    }
}

fn start_tag<'a>(name: &'a str, attrs: &[(&'a str, &str)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(name);
    for (key, value) in attrs {
        start.push_attribute(Attribute {
            key: QName(key.as_bytes()),
            value: Cow::Owned(escape_attr(value).into_bytes()),
        });
    }
    start
}
