// crates/topology-rs-xml/src/stream.rs

//! Thin, position-aware wrappers over `quick-xml`.
//!
//! `XmlStreamReader` turns the raw event stream into structural boundaries
//! (element start, element end, end of document) with resolved namespaces.
//! `XmlStreamWriter` offers nested element scopes with attribute writes, the
//! shape subsystem writers expect.

use crate::error::DomainXmlError;
use core::fmt;
use quick_xml::NsReader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::name::{PrefixDeclaration, ResolveResult};

/// A position in the input document. Lines and columns are 1-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    /// Byte offset from the start of the input.
    pub offset: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// An attribute with its namespace resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    /// `None` for unprefixed attributes.
    pub namespace: Option<String>,
    pub local_name: String,
    pub value: String,
}

/// A prefixed namespace declaration, `xmlns:prefix="uri"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDeclaration {
    pub prefix: String,
    pub uri: String,
}

/// An element start with its namespace and attributes resolved.
///
/// Namespace declarations are not listed as attributes. Prefixed ones are
/// kept in `namespaces`; the default namespace is reported as `namespace`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartElement {
    pub namespace: Option<String>,
    pub local_name: String,
    pub attributes: Vec<XmlAttribute>,
    pub namespaces: Vec<NamespaceDeclaration>,
    pub location: Location,
}

impl StartElement {
    pub fn name(&self) -> &str {
        &self.local_name
    }

    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }
}

/// The next structural boundary in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Start(StartElement),
    End(Location),
    Eof(Location),
}

/// Reads structural boundaries from a document held in memory.
pub struct XmlStreamReader<'a> {
    input: &'a str,
    reader: NsReader<&'a [u8]>,
    // Incremental line/column tracking; offsets only move forward.
    cursor: Location,
}

impl<'a> XmlStreamReader<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut reader = NsReader::from_str(input);
        let config = reader.config_mut();
        config.trim_text(true);
        config.expand_empty_elements = true;
        Self {
            input,
            reader,
            cursor: Location {
                line: 1,
                column: 1,
                offset: 0,
            },
        }
    }

    /// The position the reader has reached.
    pub fn location(&mut self) -> Location {
        let offset = self.reader.buffer_position() as usize;
        self.location_at(offset)
    }

    /// Advances to the next element start, element end, or end of document.
    pub fn next_tag(&mut self) -> Result<Tag, DomainXmlError> {
        loop {
            let location = self.next_markup_location();
            let (resolved, event) = self.reader.read_resolved_event()?;
            let namespace = namespace_of(resolved);
            match event {
                Event::Start(start) => {
                    let local_name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                    let (attributes, namespaces) = self.read_attributes(&start)?;
                    return Ok(Tag::Start(StartElement {
                        namespace,
                        local_name,
                        attributes,
                        namespaces,
                        location,
                    }));
                }
                Event::End(_) => return Ok(Tag::End(location)),
                Event::Eof => return Ok(Tag::Eof(location)),
                Event::Text(text) => {
                    if text.iter().all(u8::is_ascii_whitespace) {
                        continue;
                    }
                    return Err(DomainXmlError::UnexpectedContent { location });
                }
                Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_) => continue,
                _ => return Err(DomainXmlError::UnexpectedContent { location }),
            }
        }
    }

    /// Returns the next child element of the current element, or `None` once
    /// the current element's end tag has been consumed.
    pub fn next_child(&mut self) -> Result<Option<StartElement>, DomainXmlError> {
        match self.next_tag()? {
            Tag::Start(element) => Ok(Some(element)),
            Tag::End(_) => Ok(None),
            Tag::Eof(location) => Err(DomainXmlError::UnexpectedEof { location }),
        }
    }

    /// Consumes the end tag of an element that must not have children.
    pub fn require_no_content(&mut self) -> Result<(), DomainXmlError> {
        match self.next_child()? {
            None => Ok(()),
            Some(child) => Err(DomainXmlError::UnexpectedElement {
                name: child.local_name,
                location: child.location,
            }),
        }
    }

    /// Consumes everything up to and including the end tag of the current element.
    pub fn skip_element(&mut self) -> Result<(), DomainXmlError> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.next_tag()? {
                Tag::Start(_) => depth += 1,
                Tag::End(_) => depth -= 1,
                Tag::Eof(location) => return Err(DomainXmlError::UnexpectedEof { location }),
            }
        }
        Ok(())
    }

    fn read_attributes(
        &self,
        start: &BytesStart<'_>,
    ) -> Result<(Vec<XmlAttribute>, Vec<NamespaceDeclaration>), DomainXmlError> {
        let mut result = Vec::new();
        let mut namespaces = Vec::new();
        // Duplicates are reported by the grammar with a position, not by quick-xml.
        let mut attributes = start.attributes();
        attributes.with_checks(false);
        for attr in attributes {
            let attr = attr?;
            match attr.key.as_namespace_binding() {
                Some(PrefixDeclaration::Named(prefix)) => {
                    namespaces.push(NamespaceDeclaration {
                        prefix: String::from_utf8_lossy(prefix).into_owned(),
                        uri: attr
                            .unescape_value()
                            .map_err(quick_xml::Error::from)?
                            .into_owned(),
                    });
                    continue;
                }
                Some(PrefixDeclaration::Default) => continue,
                None => {}
            }
            let (resolved, local) = self.reader.resolve_attribute(attr.key);
            let namespace = namespace_of(resolved);
            let local_name = String::from_utf8_lossy(local.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(quick_xml::Error::from)?
                .into_owned();
            result.push(XmlAttribute {
                namespace,
                local_name,
                value,
            });
        }
        Ok((result, namespaces))
    }

    /// Location of the next `<`, skipping whitespace left by the previous event.
    fn next_markup_location(&mut self) -> Location {
        let mut offset = self.reader.buffer_position() as usize;
        let bytes = self.input.as_bytes();
        while offset < bytes.len() && bytes[offset].is_ascii_whitespace() {
            offset += 1;
        }
        self.location_at(offset)
    }

    fn location_at(&mut self, offset: usize) -> Location {
        let offset = offset.min(self.input.len());
        if offset < self.cursor.offset {
            return self.cursor;
        }
        for byte in self.input.as_bytes()[self.cursor.offset..offset].iter() {
            if *byte == b'\n' {
                self.cursor.line += 1;
                self.cursor.column = 1;
            } else if !is_utf8_continuation(*byte) {
                // Columns count characters, not bytes.
                self.cursor.column += 1;
            }
        }
        self.cursor.offset = offset;
        self.cursor
    }
}

fn is_utf8_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

fn namespace_of(resolved: ResolveResult<'_>) -> Option<String> {
    match resolved {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        // Undeclared prefixes never match a grammar namespace.
        ResolveResult::Unbound | ResolveResult::Unknown(_) => None,
    }
}

/// Writes a document through nested element scopes.
///
/// A start tag stays open for attributes until a child element, an end tag or
/// the end of the document is written; a start tag closed without content is
/// written as an empty element.
pub struct XmlStreamWriter {
    writer: Writer<Vec<u8>>,
    pending: Option<BytesStart<'static>>,
    open: Vec<String>,
}

impl XmlStreamWriter {
    pub fn new(indent_char: u8, indent_size: usize) -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), indent_char, indent_size),
            pending: None,
            open: Vec::new(),
        }
    }

    pub fn write_start_document(&mut self) -> Result<(), DomainXmlError> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(())
    }

    pub fn write_start_element(&mut self, name: &str) -> Result<(), DomainXmlError> {
        self.flush_pending()?;
        self.pending = Some(BytesStart::new(name.to_string()));
        self.open.push(name.to_string());
        Ok(())
    }

    /// Writes a self-closing element with the given attributes.
    pub fn write_empty_element(
        &mut self,
        name: &str,
        attributes: &[(&str, &str)],
    ) -> Result<(), DomainXmlError> {
        self.write_start_element(name)?;
        for (key, value) in attributes {
            self.write_attribute(key, value)?;
        }
        self.write_end_element()
    }

    pub fn write_attribute(&mut self, name: &str, value: &str) -> Result<(), DomainXmlError> {
        let start = self.pending.as_mut().ok_or_else(|| {
            DomainXmlError::Io(std::io::Error::other(format!(
                "attribute '{}' written outside a start tag",
                name
            )))
        })?;
        start.push_attribute((name, value));
        Ok(())
    }

    pub fn write_default_namespace(&mut self, uri: &str) -> Result<(), DomainXmlError> {
        self.write_attribute("xmlns", uri)
    }

    pub fn write_end_element(&mut self) -> Result<(), DomainXmlError> {
        let name = self.open.pop().ok_or_else(|| {
            DomainXmlError::Io(std::io::Error::other("end element without an open element"))
        })?;
        match self.pending.take() {
            Some(start) => self.writer.write_event(Event::Empty(start))?,
            None => self.writer.write_event(Event::End(BytesEnd::new(name)))?,
        }
        Ok(())
    }

    /// Closes every element that is still open.
    pub fn write_end_document(&mut self) -> Result<(), DomainXmlError> {
        while !self.open.is_empty() {
            self.write_end_element()?;
        }
        Ok(())
    }

    pub fn into_string(mut self) -> Result<String, DomainXmlError> {
        self.write_end_document()?;
        String::from_utf8(self.writer.into_inner())
            .map_err(|e| DomainXmlError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }

    fn flush_pending(&mut self) -> Result<(), DomainXmlError> {
        if let Some(start) = self.pending.take() {
            self.writer.write_event(Event::Start(start))?;
        }
        Ok(())
    }
}
