// ## 📂 File: `src/manifest/types.rs`

use thiserror::Error;

/// Index of a node inside a `Manifest` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// One node of the document. Markup is kept as the raw text between the
/// delimiters so untouched nodes serialize back byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element {
        name: String,
        /// Tag content between `<` and `>` (or `/>`): name plus attributes, verbatim.
        raw_start: String,
        /// Written as `<raw/>` while it has no children.
        self_closing: bool,
        children: Vec<NodeId>,
    },
    /// Character data, still escaped.
    Text(String),
    CData(String),
    Comment(String),
    /// `<?xml ...?>` body.
    Decl(String),
    /// Processing instruction body.
    Pi(String),
    DocType(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
}

/// Read-only view of one partition record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionRecord {
    pub id: NodeId,
    pub partition_name: String,
    pub file_name: Option<String>,
    pub is_download: Option<bool>,
    pub is_upgradable: Option<bool>,
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("malformed XML at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("manifest is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("invalid escape in text of <{element}>: {detail}")]
    Escape { element: String, detail: String },

    #[error("unexpected closing tag </{0}>")]
    UnbalancedEnd(String),

    #[error("element <{0}> is never closed")]
    Unclosed(String),

    #[error("document has no root element")]
    NoRoot,
}

/// Parse a boolean-as-text flag (`true`/`false`, any case, surrounding space ignored).
pub fn parse_flag(text: &str) -> Option<bool> {
    let t = text.trim();
    if t.eq_ignore_ascii_case("true") {
        Some(true)
    } else if t.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
