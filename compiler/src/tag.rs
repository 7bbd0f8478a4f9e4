use std::collections::BTreeMap;

use sprig::ast::TagBlock;
use sprig::parser::header::parse_header;

use crate::context::Context;

/// Render a tag block to an HTML fragment.
///
/// Walks the content lines with a cursor. A line ending in `[` opens a
/// nested bracket block: the preceding text is parsed as a header and the
/// following lines are collected with a depth counter (a line ending in
/// `[` increments, a line exactly `]` decrements, collection stops at
/// zero with the terminator consumed but not included). The collected
/// lines become a fresh child TagBlock compiled with the same context.
/// Any other line is inline content, compiled through the colon-nesting
/// pass and indented by two spaces.
///
/// A nested block whose `[` is never terminated absorbs every remaining
/// line of the parent; that is defined behavior, not an error.
pub fn compile_tag(block: &TagBlock, context: &Context) -> String {
    let mut html = String::new();
    html.push('<');
    html.push_str(&block.name);
    html.push_str(&render_attributes(&block.attributes, context));
    html.push_str(">\n");

    let mut i = 0;
    while i < block.lines.len() {
        let line = block.lines[i].trim();

        if let Some(header) = line.strip_suffix('[') {
            let (name, attributes) = parse_header(header.trim());

            let mut child_lines = Vec::new();
            let mut depth = 1usize;
            i += 1;
            while i < block.lines.len() {
                let inner = block.lines[i].trim();
                if inner.ends_with('[') {
                    depth += 1;
                } else if inner == "]" {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                child_lines.push(inner.to_string());
                i += 1;
            }

            let child = TagBlock {
                name,
                attributes,
                lines: child_lines,
            };
            html.push_str(&compile_tag(&child, context));
            i += 1; // past the terminating `]`, or past the end
        } else {
            html.push_str("  ");
            html.push_str(&compile_inline(line, context));
            html.push('\n');
            i += 1;
        }
    }

    html.push_str("</");
    html.push_str(&block.name);
    html.push_str(">\n");
    html
}

/// Compile one inline content line, expanding `tag: rest` colon nesting.
///
/// The first colon outside quoted spans splits the line into a tag header
/// and its content. Quoted trailing content is a terminal leaf: the quotes
/// are stripped, escapes undone, and no further colon recursion happens on
/// that branch. Unquoted content recurses, allowing arbitrarily deep
/// single-line nesting. A line with no eligible colon is literal content.
///
/// Pure over (line, context): no hidden state.
pub fn compile_inline(line: &str, context: &Context) -> String {
    let Some(colon) = find_unquoted_colon(line) else {
        return context.interpolate(line);
    };

    let tag_part = line[..colon].trim();
    let rest = line[colon + 1..].trim();

    let (name, attributes) = parse_header(tag_part);
    let attrs = render_attributes(&attributes, context);

    if let Some(content) = quoted_leaf(rest) {
        let content = content.replace("\\\"", "\"").replace("\\'", "'");
        let content = context.interpolate(&content);
        format!("<{name}{attrs}>{content}</{name}>")
    } else {
        let inner = compile_inline(rest, context);
        format!("<{name}{attrs}>{inner}</{name}>")
    }
}

/// Render ` key="value"` pairs with interpolated values, in sorted key
/// order.
fn render_attributes(attributes: &BTreeMap<String, String>, context: &Context) -> String {
    let mut out = String::new();
    for (key, value) in attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&context.interpolate(value));
        out.push('"');
    }
    out
}

/// Byte index of the first colon outside single- or double-quoted spans.
/// `'` toggles only outside a double-quoted span and symmetrically for
/// `"`; a colon counts only when neither flag is set. Keeps colons inside
/// quoted attribute values (URLs, prose) literal.
fn find_unquoted_colon(line: &str) -> Option<usize> {
    let mut in_single = false;
    let mut in_double = false;

    for (idx, c) in line.char_indices() {
        match c {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            ':' if !in_single && !in_double => return Some(idx),
            _ => {}
        }
    }

    None
}

/// If the text is fully wrapped in one pair of matching quote characters,
/// return the inner text.
fn quoted_leaf(rest: &str) -> Option<&str> {
    let bytes = rest.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        Some(&rest[1..rest.len() - 1])
    } else {
        None
    }
}
