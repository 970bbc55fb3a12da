//! CSS with `µ` metavariables for the cascara runtime.
//!
//! The language bundle is assembled from three hand-authored pieces: the
//! token registry and lexer DFA in [`tokens`], the grammar transcription in
//! [`grammar`], and the whitespace descendant-combinator scanner in
//! [`scanner`]. Tables are built once per process on first use and shared
//! read-only across sessions.

mod grammar;
mod scanner;
mod tokens;

use std::sync::OnceLock;

use cascara_core::{Language, build_language};
use cascara_runtime::{ParseError, Parser, Tree};

static LANGUAGE: OnceLock<Language> = OnceLock::new();

/// The CSS language bundle.
pub fn language() -> &'static Language {
    LANGUAGE.get_or_init(|| {
        // The grammar is a compile-time fixture; a build failure is an
        // authoring bug, not a runtime condition.
        build_language(
            &grammar::rules(),
            &tokens::terminals(),
            tokens::lex_table(),
            Some(scanner::create),
        )
        .unwrap_or_else(|error| panic!("css grammar failed to build: {error}"))
    })
}

/// Parse a stylesheet. Malformed input still yields a tree, with ERROR and
/// MISSING nodes marking the damage; see `Tree::has_error`.
pub fn parse(source: &str) -> Result<Tree<'static>, ParseError> {
    Ok(Parser::new(language())?.parse(source))
}
