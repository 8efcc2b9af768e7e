//! manifest/parse.rs
//! Build a `Manifest` arena from XML bytes.
//!
//! Each `quick-xml` event becomes one node carrying its raw markup, so the
//! serializer can reproduce the input exactly.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::manifest::tree::Manifest;
use crate::manifest::types::{ManifestError, NodeId, NodeKind};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

impl Manifest {
    /// Parse a manifest. Text is not trimmed; every byte is kept.
    pub fn parse(bytes: &[u8]) -> Result<Self, ManifestError> {
        let (bom, body) = match bytes.strip_prefix(UTF8_BOM) {
            Some(rest) => (true, rest),
            None => (false, bytes),
        };

        let mut reader = Reader::from_reader(body);
        reader.config_mut().trim_text(false);

        let mut doc = Manifest { bom, ..Manifest::default() };
        let mut open: Vec<NodeId> = Vec::new();

        loop {
            let event = reader.read_event().map_err(|source| ManifestError::Xml {
                position: reader.buffer_position() as u64,
                source,
            })?;
            let parent = open.last().copied();

            #[allow(unreachable_patterns)]
            match event {
                Event::Start(e) => {
                    let kind = NodeKind::Element {
                        name: utf8(e.name().as_ref())?,
                        raw_start: utf8(&e)?,
                        self_closing: false,
                        children: Vec::new(),
                    };
                    let id = doc.push_node(kind, parent);
                    open.push(id);
                }
                Event::Empty(e) => {
                    let kind = NodeKind::Element {
                        name: utf8(e.name().as_ref())?,
                        raw_start: utf8(&e)?,
                        self_closing: true,
                        children: Vec::new(),
                    };
                    doc.push_node(kind, parent);
                }
                Event::End(e) => {
                    let name = utf8(e.name().as_ref())?;
                    match open.pop() {
                        Some(id) if doc.name(id) == Some(name.as_str()) => {}
                        _ => return Err(ManifestError::UnbalancedEnd(name)),
                    }
                }
                Event::Text(t) => {
                    doc.push_node(NodeKind::Text(utf8(&t)?), parent);
                }
                Event::CData(t) => {
                    doc.push_node(NodeKind::CData(utf8(&t)?), parent);
                }
                Event::Comment(t) => {
                    doc.push_node(NodeKind::Comment(utf8(&t)?), parent);
                }
                Event::Decl(d) => {
                    doc.push_node(NodeKind::Decl(utf8(&d)?), parent);
                }
                Event::PI(p) => {
                    doc.push_node(NodeKind::Pi(utf8(&p)?), parent);
                }
                Event::DocType(t) => {
                    doc.push_node(NodeKind::DocType(utf8(&t)?), parent);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(&id) = open.last() {
            return Err(ManifestError::Unclosed(
                doc.name(id).unwrap_or_default().to_string(),
            ));
        }
        if doc.root().is_none() {
            return Err(ManifestError::NoRoot);
        }
        Ok(doc)
    }
}

#[inline]
fn utf8(raw: &[u8]) -> Result<String, ManifestError> {
    Ok(std::str::from_utf8(raw)?.to_string())
}
