//! Shared data model for the cascara parser: symbols, grammar descriptions,
//! lexer and parse table artifacts, and the table construction pass.
//!
//! A language crate declares its terminals and lexer DFA, transcribes its
//! grammar with the combinators in [`grammar`], and calls
//! [`build::build_language`] to obtain an immutable [`Language`] bundle. The
//! runtime crate drives sessions against that bundle.

pub mod build;
pub mod grammar;
pub mod language;
pub mod lex;
pub mod parse;
pub mod symbol;

#[cfg(test)]
mod grammar_tests;

pub use build::{GrammarError, build_language};
pub use language::{
    ExternalScanner, LANGUAGE_ABI_VERSION, Language, LanguageError, MIN_COMPATIBLE_ABI_VERSION,
    ScanCursor, ScannerFactory, ScannerStateError,
};
pub use lex::{
    CharRange, Keyword, LexMode, LexModeId, LexState, LexStateId, LexTable, LexTransition,
    TerminalDecl,
};
pub use parse::{
    Action, AliasStep, FieldStep, ParseState, ParseTable, ProductionId, ProductionInfo, RowRef,
    StateId,
};
pub use symbol::{FieldId, FieldTable, Symbol, SymbolInfo, SymbolKind, SymbolSet, SymbolTable};
