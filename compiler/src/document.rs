use sprig::Program;
use sprig::ast::Node;

use crate::context::Context;
use crate::tag;

/// Leading comment identifying the compiler.
const HEADER_COMMENT: &str = "<!--Compiled with sprig.-->";
/// Trailing end-of-document marker.
const FOOTER_COMMENT: &str = "<!--EOF-->";

/// Walks the AST in document order and emits one HTML document.
///
/// Owns the variable context for the pass: variable blocks merge into it,
/// tag blocks read from it, and a reference always sees the value assigned
/// by the most recent preceding variable block.
pub struct Compiler {
    context: Context,
}

impl Compiler {
    pub fn new() -> Self {
        Compiler {
            context: Context::new(),
        }
    }

    /// Compile a program into a complete HTML document.
    ///
    /// Consumes the compiler: the context lives for exactly one pass and
    /// cannot be reused across compilations.
    pub fn compile(mut self, program: &Program) -> String {
        let mut html = String::new();
        html.push_str(HEADER_COMMENT);
        html.push('\n');
        html.push_str("<!DOCTYPE html>\n<html>\n");
        for node in &program.nodes {
            html.push_str(&self.compile_node(node));
        }
        html.push_str("</html>\n");
        html.push_str(FOOTER_COMMENT);
        html
    }

    /// Dispatch over the closed node set.
    fn compile_node(&mut self, node: &Node) -> String {
        match node {
            Node::Variables(vars) => {
                self.context.merge(&vars.assignments);
                String::new()
            }
            Node::Tag(block) => tag::compile_tag(block, &self.context),
        }
    }
}

/// Compile a parsed program with a fresh context.
pub fn compile_document(program: &Program) -> String {
    Compiler::new().compile(program)
}
