//! Tree builder: XML text to a linked, fingerprinted [`Document`].
//!
//! Tokenization is delegated to `quick-xml`'s namespace-aware reader. The
//! builder keeps a stack of open elements: start tags allocate a node and
//! register it with the enclosing element, character data (text and CDATA,
//! entities already unescaped) accumulates on the innermost open element, and
//! end tags record the element's raw inner markup. Comments, processing
//! instructions and the DOCTYPE contribute nothing.
//!
//! Once the whole input is consumed, a single walk assigns every child its
//! parent link, and the root fingerprint is computed before the document is
//! returned.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{PrefixDeclaration, ResolveResult};
use quick_xml::reader::NsReader;
use tracing::debug;

use crate::document::Document;
use crate::error::{ParseError, ParseResult};
use crate::node::{Attribute, NodeData, NodeId, XMLNS};

/// An element whose end tag has not been seen yet.
struct OpenElement {
    id: NodeId,
    /// Byte offset just past the start tag.
    content_start: usize,
    text: String,
}

/// Parse `source` into a fully annotated [`Document`].
pub fn build(source: &str) -> ParseResult<Document> {
    let bytes = source.as_bytes();
    let mut reader = NsReader::from_str(source);
    reader.config_mut().trim_text(false);

    let mut nodes: Vec<NodeData> = Vec::new();
    let mut open: Vec<OpenElement> = Vec::new();

    loop {
        let event_start = reader.buffer_position() as usize;
        let event = reader
            .read_event()
            .map_err(|e| ParseError::at(bytes, reader.error_position() as usize, e.to_string()))?;

        match event {
            Event::Start(start) => {
                let id = push_element(&reader, &start, &mut nodes, &open, bytes, event_start)?;
                open.push(OpenElement {
                    id,
                    content_start: reader.buffer_position() as usize,
                    text: String::new(),
                });
            }
            Event::Empty(start) => {
                push_element(&reader, &start, &mut nodes, &open, bytes, event_start)?;
            }
            Event::End(_) => {
                let element = open
                    .pop()
                    .ok_or_else(|| ParseError::at(bytes, event_start, "unexpected end tag"))?;
                let data = &mut nodes[element.id.index()];
                data.text = element.text.trim().to_string();
                data.raw_content = source[element.content_start..event_start].to_string();
            }
            Event::Text(text) => {
                let value = text
                    .unescape()
                    .map_err(|e| ParseError::at(bytes, event_start, e.to_string()))?;
                append_text(&mut open, &value, bytes, event_start)?;
            }
            Event::CData(cdata) => {
                let raw = cdata.into_inner();
                let value = String::from_utf8_lossy(&raw);
                append_text(&mut open, &value, bytes, event_start)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(element) = open.last() {
        let name = &nodes[element.id.index()].name;
        return Err(ParseError::at(
            bytes,
            bytes.len(),
            format!("unclosed element <{name}>"),
        ));
    }
    if nodes.is_empty() {
        return Err(ParseError::at(bytes, bytes.len(), "no root element"));
    }

    let document = link_parents(Document::from_nodes(nodes));
    let root = document.root().fingerprint();
    debug!(nodes = document.len(), root = %root, "built XML document");

    Ok(document)
}

/// Allocate a node for `start` and register it with the enclosing element.
fn push_element(
    reader: &NsReader<&[u8]>,
    start: &BytesStart<'_>,
    nodes: &mut Vec<NodeData>,
    open: &[OpenElement],
    bytes: &[u8],
    offset: usize,
) -> ParseResult<NodeId> {
    let id = NodeId(nodes.len());
    match open.last() {
        Some(parent) => nodes[parent.id.index()].children.push(id),
        None if !nodes.is_empty() => {
            return Err(ParseError::at(bytes, offset, "multiple root elements"));
        }
        None => {}
    }

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| ParseError::at(bytes, offset, e.to_string()))?;
        let value = attr
            .unescape_value()
            .map_err(|e| ParseError::at(bytes, offset, e.to_string()))?
            .into_owned();
        let attribute = match attr.key.as_namespace_binding() {
            Some(PrefixDeclaration::Default) => Attribute::new(XMLNS, "", value),
            Some(PrefixDeclaration::Named(prefix)) => Attribute::new(lossy(prefix), XMLNS, value),
            None => {
                let (namespace, local) = reader.resolve_attribute(attr.key);
                Attribute::new(lossy(local.as_ref()), namespace_uri(namespace), value)
            }
        };
        attributes.push(attribute);
    }

    let (namespace, local) = reader.resolve_element(start.name());
    nodes.push(NodeData {
        name: lossy(local.as_ref()),
        namespace: namespace_uri(namespace),
        attributes,
        ..NodeData::default()
    });

    Ok(id)
}

fn append_text(
    open: &mut [OpenElement],
    value: &str,
    bytes: &[u8],
    offset: usize,
) -> ParseResult<()> {
    match open.last_mut() {
        Some(element) => {
            element.text.push_str(value);
            Ok(())
        }
        None if value.trim().is_empty() => Ok(()),
        None => Err(ParseError::at(
            bytes,
            offset,
            "character data outside the root element",
        )),
    }
}

/// Assign every child its parent link in one pre-order walk.
fn link_parents(mut document: Document) -> Document {
    let mut links = Vec::with_capacity(document.len());
    document.walk(|node| {
        links.extend(node.children().map(|child| (child.id(), node.id())));
        true
    });
    for (child, parent) in links {
        document.data_mut(child).parent = Some(parent);
    }
    document
}

/// Namespace URI of a resolved name. An undeclared prefix is kept verbatim.
fn namespace_uri(result: ResolveResult<'_>) -> String {
    match result {
        ResolveResult::Bound(namespace) => lossy(namespace.as_ref()),
        ResolveResult::Unknown(prefix) => lossy(&prefix),
        ResolveResult::Unbound => String::new(),
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
