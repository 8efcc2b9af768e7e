// ## 📂 File: `src/manifest/tree.rs`

//! manifest/tree.rs
//! Owned node arena for the scatter manifest.
//!
//! Design notes:
//! - Nodes live in one `Vec<Node>` and refer to each other by `NodeId`.
//! - Children are ordered index lists; nothing is reordered by mutation.
//! - Replacing an element's text detaches the old text nodes. Detached nodes
//!   stay in the arena but are unreachable from `top`, so they never serialize.

use std::borrow::Cow;

use quick_xml::escape::{escape, unescape};

use crate::constants::elements;
use crate::manifest::types::{
    parse_flag, ManifestError, Node, NodeId, NodeKind, PartitionRecord,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub(crate) nodes: Vec<Node>,
    /// Document-level nodes in order (declaration, whitespace, root, trailing comments).
    pub(crate) top: Vec<NodeId>,
    /// Input started with a UTF-8 byte order mark.
    pub(crate) bom: bool,
}

impl Manifest {
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn push_node(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { kind, parent });
        match parent {
            Some(p) => {
                if let NodeKind::Element { children, self_closing, .. } = &mut self.nodes[p.0].kind {
                    children.push(id);
                    *self_closing = false;
                }
            }
            None => self.top.push(id),
        }
        id
    }

    /// First element at document level.
    pub fn root(&self) -> Option<NodeId> {
        self.top.iter().copied().find(|&id| self.is_element(id))
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.node(id).kind, NodeKind::Element { .. })
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.node(id).kind {
            NodeKind::Element { children, .. } => children,
            _ => &[],
        }
    }

    /// First direct child element named `name`.
    pub fn child_element(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&c| self.name(c) == Some(name))
    }

    /// All elements in document order.
    pub fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.top.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if self.is_element(id) {
                out.push(id);
                stack.extend(self.children(id).iter().rev().copied());
            }
        }
        out
    }

    /// Unescaped text content of an element (direct text and CDATA children).
    pub fn text(&self, id: NodeId) -> Result<String, ManifestError> {
        let mut out = String::new();
        for &c in self.children(id) {
            match &self.node(c).kind {
                NodeKind::Text(raw) => {
                    let value = unescape(raw).map_err(|e| ManifestError::Escape {
                        element: self.name(id).unwrap_or_default().to_string(),
                        detail: e.to_string(),
                    })?;
                    out.push_str(&value);
                }
                NodeKind::CData(raw) => out.push_str(raw),
                _ => {}
            }
        }
        Ok(out)
    }

    /// Replace the text content of an element with `value` (escaped on write).
    pub fn set_text(&mut self, id: NodeId, value: &str) {
        let escaped: Cow<'_, str> = escape(value);
        let text = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind: NodeKind::Text(escaped.into_owned()),
            parent: Some(id),
        });

        let nodes = &self.nodes;
        let keep: Vec<NodeId> = self
            .children(id)
            .iter()
            .copied()
            .filter(|&c| !matches!(nodes[c.0].kind, NodeKind::Text(_) | NodeKind::CData(_)))
            .collect();

        if let NodeKind::Element { children, self_closing, .. } = &mut self.nodes[id.0].kind {
            *children = keep;
            children.push(text);
            *self_closing = false;
        }
    }

    /// Append a new empty child element at the end of `parent`, indented like
    /// the existing children when they are laid out one per line.
    pub fn append_element(&mut self, parent: NodeId, name: &str) -> NodeId {
        let children = self.children(parent).to_vec();
        let indent = children
            .first()
            .and_then(|&c| self.whitespace(c))
            .filter(|ws| ws.contains('\n'))
            .map(str::to_string);
        let trailing = children.last().copied().filter(|&c| self.whitespace(c).is_some());

        let mut inserted = Vec::with_capacity(2);
        if let Some(indent) = indent {
            inserted.push(self.detached(NodeKind::Text(indent), parent));
        }
        let element = self.detached(
            NodeKind::Element {
                name: name.to_string(),
                raw_start: name.to_string(),
                self_closing: true,
                children: Vec::new(),
            },
            parent,
        );
        inserted.push(element);

        if let NodeKind::Element { children, self_closing, .. } = &mut self.nodes[parent.0].kind {
            // Keep the closing-tag indentation last.
            let at = match trailing {
                Some(_) => children.len() - 1,
                None => children.len(),
            };
            children.splice(at..at, inserted);
            *self_closing = false;
        }
        element
    }

    fn detached(&mut self, kind: NodeKind, parent: NodeId) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { kind, parent: Some(parent) });
        id
    }

    fn whitespace(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Text(t) if !t.is_empty() && t.chars().all(char::is_whitespace) => Some(t),
            _ => None,
        }
    }

    /// All `partition_index` elements in document order.
    pub fn partition_ids(&self) -> Vec<NodeId> {
        self.elements()
            .into_iter()
            .filter(|&id| self.name(id) == Some(elements::PARTITION_RECORD))
            .collect()
    }

    /// Partition name of a record, trimmed. Empty when the child is missing.
    pub fn partition_name(&self, record: NodeId) -> Result<String, ManifestError> {
        match self.child_element(record, elements::PARTITION_NAME) {
            Some(n) => Ok(self.text(n)?.trim().to_string()),
            None => Ok(String::new()),
        }
    }

    /// Every record whose partition name equals `name`, ignoring ASCII case.
    pub fn find_partitions(&self, name: &str) -> Result<Vec<NodeId>, ManifestError> {
        let wanted = name.trim();
        let mut out = Vec::new();
        for id in self.partition_ids() {
            if self.partition_name(id)?.eq_ignore_ascii_case(wanted) {
                out.push(id);
            }
        }
        Ok(out)
    }

    /// First record named `name` (case-insensitive).
    pub fn find_partition(&self, name: &str) -> Result<Option<NodeId>, ManifestError> {
        Ok(self.find_partitions(name)?.into_iter().next())
    }

    /// Typed view of a record's well-known fields.
    pub fn record(&self, id: NodeId) -> Result<PartitionRecord, ManifestError> {
        let field = |name: &str| -> Result<Option<String>, ManifestError> {
            self.child_element(id, name).map(|c| self.text(c)).transpose()
        };
        Ok(PartitionRecord {
            id,
            partition_name: self.partition_name(id)?,
            file_name: field(elements::FILE_NAME)?.map(|s| s.trim().to_string()),
            is_download: field(elements::IS_DOWNLOAD)?.as_deref().and_then(parse_flag),
            is_upgradable: field(elements::IS_UPGRADABLE)?.as_deref().and_then(parse_flag),
        })
    }

    /// Typed views of all records, in document order.
    pub fn records(&self) -> Result<Vec<PartitionRecord>, ManifestError> {
        self.partition_ids().into_iter().map(|id| self.record(id)).collect()
    }
}
