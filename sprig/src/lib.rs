pub mod ast;
pub mod parser;

use crate::ast::Node;

/// A parsed sprig program.
#[derive(Debug, Clone)]
pub struct Program {
    /// Top-level nodes in document order.
    pub nodes: Vec<Node>,
}
