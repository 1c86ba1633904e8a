//! `nox-compile`: compiler for the nox menu-layout format.
//!
//! nox is a human-friendly, indentation-structured description of a game
//! menu-panel layout. This crate compiles it one way into the verbose,
//! tag-heavy markup the engine's UI runtime consumes, where runtime-computed
//! property values become flat accumulator operation sequences (`<copy>`,
//! `<add>`, `<div>`, …) that the engine evaluates left to right at render
//! time.
//!
//! The pipeline is a pure, single-pass batch transform: block parser, header
//! classifier, value classifier, expression compiler, emitter. It is
//! fail-fast: the first error aborts the run with its line and column, and
//! no partial output is ever produced.
//!
//! # Quick start
//!
//! ```
//! let xml = nox_compile::compile("menu name=\"main\":\n    x: 0\n").unwrap();
//! assert_eq!(xml, "<menu name=\"main\">\n\t<x>0</x>\n</menu>\n");
//! ```

pub mod error;
pub mod expr;
pub mod header;
pub mod lines;
pub mod parse;
pub mod render_xml;
pub mod types;
pub mod value;

pub use error::CompileError;
pub use parse::parse;
pub use types::*;

/// Compile nox source text into engine markup.
pub fn compile(source: &str) -> Result<String, CompileError> {
    Ok(parse(source)?.to_xml())
}

impl Document {
    /// Render this document as engine markup text.
    pub fn to_xml(&self) -> String {
        render_xml::to_xml(self)
    }
}
