use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tempfile::Builder;

use crate::domain::Alias;
use crate::error::MetadataError;

const INDENT_SIZE: usize = 2;

/// A node of an output document: ordered attributes, ordered children and
/// optional text content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: Option<String>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// First direct child with the given tag.
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Follows a `/`-separated chain of direct-child tags.
    pub fn find_path(&self, path: &str) -> Option<&Element> {
        path.split('/')
            .try_fold(self, |element, segment| element.find(segment))
    }

    pub fn to_pretty_xml(&self) -> Result<String, MetadataError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_SIZE);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(xml_error)?;
        write_element(&mut writer, self)?;
        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        String::from_utf8(bytes).map_err(xml_error)
    }
}

fn write_element<W: io::Write>(
    writer: &mut Writer<W>,
    element: &Element,
) -> Result<(), MetadataError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() && element.text.is_none() {
        return writer.write_event(Event::Empty(start)).map_err(xml_error);
    }

    writer.write_event(Event::Start(start)).map_err(xml_error)?;
    if let Some(text) = &element.text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_error)?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(xml_error)
}

fn xml_error(err: impl fmt::Display) -> MetadataError {
    MetadataError::Xml(err.to_string())
}

/// Serializes `root` and replaces `path` in one step; nothing is left behind
/// at `path` if serialization or the write fails.
pub fn write_document(path: &Path, root: &Element) -> Result<(), MetadataError> {
    let content = root.to_pretty_xml()?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|err| MetadataError::Filesystem(err.to_string()))?;
    let mut temp = Builder::new()
        .prefix(".ena-xml")
        .tempfile_in(parent)
        .map_err(|err| MetadataError::Filesystem(err.to_string()))?;
    temp.write_all(content.as_bytes())
        .map_err(|err| MetadataError::Filesystem(err.to_string()))?;
    if let Some(permissions) = document_permissions(path) {
        temp.as_file()
            .set_permissions(permissions)
            .map_err(|err| MetadataError::Filesystem(err.to_string()))?;
    }
    temp.persist(path)
        .map_err(|err| MetadataError::Filesystem(err.to_string()))?;
    tracing::info!(path = %path.display(), root = root.name(), "wrote document");
    Ok(())
}

/// An overwritten document keeps its mode; a new one gets 0644 instead of the
/// 0600 a temp file is created with.
#[cfg(unix)]
fn document_permissions(path: &Path) -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;

    let permissions = fs::metadata(path)
        .map(|meta| meta.permissions())
        .unwrap_or_else(|_| fs::Permissions::from_mode(0o644));
    Some(permissions)
}

#[cfg(not(unix))]
fn document_permissions(path: &Path) -> Option<fs::Permissions> {
    fs::metadata(path).ok().map(|meta| meta.permissions())
}

/// Collects the `alias` of every `SAMPLE` directly under the root of a
/// sample document, in document order.
pub fn read_sample_aliases(path: &Path) -> Result<Vec<Alias>, MetadataError> {
    if !path.exists() {
        return Err(MetadataError::InputNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)
        .map_err(|err| MetadataError::Filesystem(format!("read {}: {err}", path.display())))?;
    parse_sample_aliases(&content)
}

pub fn parse_sample_aliases(content: &str) -> Result<Vec<Alias>, MetadataError> {
    let mut reader = Reader::from_str(content);
    let mut aliases = Vec::new();
    let mut depth = 0usize;
    let mut seen = 0usize;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(start) => {
                inspect_element(&start, depth, &mut seen, &mut aliases)?;
                depth += 1;
            }
            Event::Empty(start) => inspect_element(&start, depth, &mut seen, &mut aliases)?,
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(aliases)
}

fn inspect_element(
    start: &BytesStart<'_>,
    depth: usize,
    seen: &mut usize,
    aliases: &mut Vec<Alias>,
) -> Result<(), MetadataError> {
    let name = start.name();
    if depth == 0 {
        if name.as_ref() != b"SAMPLE_SET" {
            tracing::warn!(
                root = %String::from_utf8_lossy(name.as_ref()),
                "unexpected root element in sample document"
            );
        }
        return Ok(());
    }
    if depth != 1 || name.as_ref() != b"SAMPLE" {
        return Ok(());
    }

    *seen += 1;
    let alias = start
        .try_get_attribute("alias")
        .map_err(xml_error)?
        .map(|attr| attr.unescape_value().map(|value| value.into_owned()))
        .transpose()
        .map_err(xml_error)?
        .unwrap_or_default();
    let alias = alias
        .parse::<Alias>()
        .map_err(|_| MetadataError::MissingSampleAlias { index: *seen })?;
    aliases.push(alias);
    Ok(())
}
