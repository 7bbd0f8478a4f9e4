pub mod context;
pub mod document;
pub mod tag;

pub use context::Context;
pub use document::{Compiler, compile_document};
