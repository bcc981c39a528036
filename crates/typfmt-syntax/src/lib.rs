//! Lossless syntax trees for Typst documents.
//!
//! [`parse`] turns any input, valid or not, into a [`SyntaxNode`] tree whose
//! leaves concatenate back to the exact source. Syntax errors are recorded as
//! `Error` nodes inside the tree instead of aborting the parse.

/// Terminal rendering of syntax errors.
pub mod diagnostics;
/// Token and node kinds.
pub mod kind;
/// Mode-aware tokenizer for markup and code.
pub mod lexer;
/// The syntax tree.
pub mod node;
/// Recursive descent parser producing a lossless tree.
pub mod parser;

pub use diagnostics::{Diagnostic, render_diagnostics};
pub use kind::SyntaxKind;
pub use node::{Span, SyntaxError, SyntaxNode};
pub use parser::parse;
