//! Parse sessions for cascara languages.
//!
//! A [`Parser`] borrows an immutable `Language` bundle (tables built by
//! `cascara-core`), runs the lexer DFA and external scanner against a
//! source string, and drives the shift/reduce loop to an owned [`Tree`].
//! Malformed input yields a tree with ERROR and MISSING nodes rather than
//! an error; see [`error::ParseError`] for the protocol-level failures
//! that *are* reported.

mod error;
mod lexer;
mod parser;
mod trace;
mod tree;

#[cfg(test)]
mod lexer_tests;

pub use error::ParseError;
pub use parser::Parser;
pub use trace::{NoopTracer, PrintTracer, Tracer};
pub use tree::{Node, NodeRef, Span, Tree};
