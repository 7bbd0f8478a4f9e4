pub mod header;
mod structural;

use std::collections::HashMap;

use tracing::debug;

use crate::Program;
use crate::ast::{Node, TagBlock, VariableBlock};
use crate::parser::header::{parse_header, strip_matching_quotes};

/// Parser entry point.
pub struct Parser {
    source: String,
    verbose: bool,
}

impl Parser {
    /// `verbose` gates debug-level tracing of extracted blocks; it never
    /// affects the parsed result.
    pub fn new(source: String, verbose: bool) -> Self {
        Parser { source, verbose }
    }

    /// Parse the source text into a complete Program.
    ///
    /// This never fails: malformed input degrades silently (comment lines
    /// and text outside blocks are skipped, malformed attribute tokens and
    /// assignment lines are dropped).
    pub fn parse(&self) -> Program {
        let mut nodes = Vec::new();

        for block in structural::extract_blocks(&self.source) {
            if self.verbose {
                debug!(header = %block.header, opener = %block.opener, "found block");
            }
            let lines = split_body_lines(&block.body);

            if block.header.starts_with('$') {
                let assignments = parse_assignments(&lines);
                if self.verbose {
                    debug!(count = assignments.len(), "variable block");
                }
                nodes.push(Node::Variables(VariableBlock { assignments }));
            } else {
                let (name, attributes) = parse_header(&block.header);
                if self.verbose {
                    debug!(tag = %name, lines = lines.len(), "tag block");
                }
                nodes.push(Node::Tag(TagBlock {
                    name,
                    attributes,
                    lines,
                }));
            }
        }

        Program { nodes }
    }
}

/// Split a block body into non-empty, whitespace-trimmed lines.
fn split_body_lines(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `key = value` lines from a variable block.
///
/// The first `=` splits; both sides are trimmed and one layer of matching
/// quotes is stripped from the value. Lines without `=` are skipped.
fn parse_assignments(lines: &[String]) -> HashMap<String, String> {
    let mut assignments = HashMap::new();
    for line in lines {
        if let Some((key, value)) = line.split_once('=') {
            assignments.insert(
                key.trim().to_string(),
                strip_matching_quotes(value.trim()).to_string(),
            );
        }
    }
    assignments
}
