//! manifest/serialize.rs
//! Write a `Manifest` back to bytes.
//!
//! Untouched nodes are emitted from their raw markup, so a parse/serialize
//! cycle with no mutation returns the input unchanged.

use std::fmt::Write as _;

use crate::manifest::tree::Manifest;
use crate::manifest::types::{NodeId, NodeKind};

impl Manifest {
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = String::new();
        if self.bom {
            out.push('\u{FEFF}');
        }
        for &id in &self.top {
            self.write_node(id, &mut out);
        }
        out.into_bytes()
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match &self.node(id).kind {
            NodeKind::Element { name, raw_start, self_closing, children } => {
                if *self_closing && children.is_empty() {
                    let _ = write!(out, "<{}/>", raw_start);
                    return;
                }
                let _ = write!(out, "<{}>", raw_start);
                for &c in children {
                    self.write_node(c, out);
                }
                let _ = write!(out, "</{}>", name);
            }
            NodeKind::Text(raw) => out.push_str(raw),
            NodeKind::CData(raw) => {
                let _ = write!(out, "<![CDATA[{}]]>", raw);
            }
            NodeKind::Comment(raw) => {
                let _ = write!(out, "<!--{}-->", raw);
            }
            NodeKind::Decl(raw) | NodeKind::Pi(raw) => {
                let _ = write!(out, "<?{}?>", raw);
            }
            NodeKind::DocType(raw) => {
                let _ = write!(out, "<!DOCTYPE {}>", raw);
            }
        }
    }
}
