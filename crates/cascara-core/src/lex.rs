//! Lexer table artifacts.
//!
//! A `LexTable` is a character-level DFA plus the side tables the runtime
//! driver needs: entry modes, keyword reinterpretation, and external-terminal
//! declarations. States are hand-authored per language; the driver that runs
//! them lives in the runtime crate.

use serde::{Deserialize, Serialize};

use crate::symbol::{Symbol, SymbolSet};

pub type LexStateId = u16;
pub type LexModeId = u16;

/// Inclusive code point range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharRange {
    pub lo: char,
    pub hi: char,
}

impl CharRange {
    pub const fn new(lo: char, hi: char) -> CharRange {
        CharRange { lo, hi }
    }

    pub const fn single(c: char) -> CharRange {
        CharRange { lo: c, hi: c }
    }

    pub fn contains(&self, c: char) -> bool {
        self.lo <= c && c <= self.hi
    }
}

/// One outgoing edge of a DFA state. Edges are tried in order; the first
/// range match wins.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LexTransition {
    pub ranges: Vec<CharRange>,
    pub target: LexStateId,
    /// Skip edges consume the character without starting a token
    /// (whitespace before a token). They reset the pending token start.
    pub skip: bool,
}

/// DFA state. `accept` marks the token recognized upon *entering* the state;
/// the driver keeps advancing while edges match and rewinds to the latest
/// acceptable accept (maximal munch).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LexState {
    pub transitions: Vec<LexTransition>,
    pub accept: Option<Symbol>,
    /// Best-effort accept when input ends in this state (unterminated
    /// strings and comments).
    pub eof_accept: Option<Symbol>,
}

impl LexState {
    /// First edge matching `c`, as `(target, skip)`.
    pub fn step(&self, c: char) -> Option<(LexStateId, bool)> {
        self.transitions
            .iter()
            .find(|t| t.ranges.iter().any(|r| r.contains(c)))
            .map(|t| (t.target, t.skip))
    }
}

/// Ordered list of entry states to attempt. Mode 0 is the default; other
/// modes front-load context-restricted entries (immediate unit suffixes).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LexMode {
    pub entries: Vec<LexStateId>,
}

/// Keyword reinterpretation: when the DFA yields `base` and the lexeme is
/// exactly `text` and `symbol` is valid in the requesting state, the token
/// is relabeled `symbol`. This is how contextual words (`from`, `and`) and
/// specific at-keywords (`@media`) coexist with the general tokens.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Keyword {
    pub text: String,
    pub base: Symbol,
    pub symbol: Symbol,
}

/// A terminal declaration, in symbol-id order starting right after the
/// builtins. The table construction pass turns these into `SymbolInfo`s.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TerminalDecl {
    pub name: String,
    pub named: bool,
    pub visible: bool,
    /// Recognized by the external scanner, not the DFA.
    pub external: bool,
}

impl TerminalDecl {
    /// Anonymous visible token (punctuation, operators, keywords).
    pub fn anonymous(name: &str) -> TerminalDecl {
        TerminalDecl {
            name: name.to_owned(),
            named: false,
            visible: true,
            external: false,
        }
    }

    /// Named leaf node.
    pub fn named(name: &str) -> TerminalDecl {
        TerminalDecl {
            name: name.to_owned(),
            named: true,
            visible: true,
            external: false,
        }
    }
}

/// The complete lexical artifact for a language.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LexTable {
    pub states: Vec<LexState>,
    pub modes: Vec<LexMode>,
    /// `(terminal, mode)`: the first entry whose terminal is valid in a parse
    /// state selects that state's mode; otherwise mode 0.
    pub mode_select: Vec<(Symbol, LexModeId)>,
    pub keywords: Vec<Keyword>,
}

impl LexTable {
    pub fn mode_for(&self, valid: &SymbolSet) -> LexModeId {
        for (symbol, mode) in &self.mode_select {
            if valid.contains(*symbol) {
                return *mode;
            }
        }
        0
    }

    /// Bases whose tokens must survive valid-set filtering because one of
    /// their keywords is valid (the keyword is only discoverable after the
    /// full lexeme is known).
    pub fn live_keyword_bases(&self, valid: &SymbolSet) -> Vec<Symbol> {
        let mut bases = Vec::new();
        for kw in &self.keywords {
            if valid.contains(kw.symbol) && !bases.contains(&kw.base) {
                bases.push(kw.base);
            }
        }
        bases
    }
}
