//! The descendant-combinator scanner.
//!
//! Whitespace between two selector terms *is* the combinator, and whether a
//! whitespace run means anything depends on parser context the DFA never
//! sees. The session communicates that context through the valid-symbol
//! set: this scanner runs ahead of the DFA, consumes a whitespace run, and
//! emits the combinator only when the combinator is currently a legal
//! continuation and the next character can begin another selector.

use cascara_core::{ExternalScanner, ScanCursor, ScannerStateError, Symbol, SymbolSet};

use crate::tokens::DESCENDANT;

/// Stateless: everything the decision needs arrives per call, so nothing
/// crosses token boundaries and the persisted form is empty.
struct DescendantScanner;

pub(crate) fn create() -> Box<dyn ExternalScanner> {
    Box::new(DescendantScanner)
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{c}')
}

fn starts_selector(c: char) -> bool {
    c.is_ascii_alphabetic()
        || matches!(
            c,
            '_' | '-' | '.' | '#' | ':' | '*' | '&' | '[' | 'µ' | '"' | '\''
        )
}

impl ExternalScanner for DescendantScanner {
    fn scan(&mut self, cursor: &mut dyn ScanCursor, valid: &SymbolSet) -> Option<Symbol> {
        if !valid.contains(DESCENDANT) {
            return None;
        }
        let mut consumed = false;
        while cursor.lookahead().is_some_and(is_space) {
            cursor.advance();
            consumed = true;
        }
        if !consumed {
            return None;
        }
        cursor.mark_end();
        if cursor.lookahead().is_some_and(starts_selector) {
            Some(DESCENDANT)
        } else {
            None
        }
    }

    fn serialize(&self) -> Vec<u8> {
        Vec::new()
    }

    fn deserialize(&mut self, bytes: &[u8]) -> Result<(), ScannerStateError> {
        if bytes.is_empty() {
            Ok(())
        } else {
            Err(ScannerStateError {
                reason: format!("expected an empty snapshot, got {} bytes", bytes.len()),
            })
        }
    }
}
