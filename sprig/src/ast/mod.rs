use std::collections::{BTreeMap, HashMap};

/// A top-level unit of a sprig program.
/// The node set is closed; compilation dispatches over these two variants.
#[derive(Debug, Clone)]
pub enum Node {
    /// A `$name { ... }` block. Merges assignments into the context and
    /// produces no output.
    Variables(VariableBlock),
    /// A `tagname attrs { ... }` block, rendered as an HTML element.
    Tag(TagBlock),
}

/// A block that defines variables with `key = value` lines.
#[derive(Debug, Clone)]
pub struct VariableBlock {
    /// Parsed assignments. Insertion order is irrelevant; duplicate keys
    /// keep the last value.
    pub assignments: HashMap<String, String>,
}

/// A generic HTML block (head, body, section, div, ...).
///
/// Content lines stay un-parsed until compilation; nested bracket bodies
/// are reconstructed into fresh child TagBlocks at compile time.
#[derive(Debug, Clone)]
pub struct TagBlock {
    /// The element name, first token of the block header.
    pub name: String,
    /// Attributes from the header. Sorted iteration keeps emission
    /// deterministic.
    pub attributes: BTreeMap<String, String>,
    /// Raw content lines, non-empty and whitespace-trimmed.
    pub lines: Vec<String>,
}
