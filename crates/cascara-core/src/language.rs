//! The `Language` bundle and the external scanner boundary.

use thiserror::Error;

use crate::lex::LexTable;
use crate::parse::ParseTable;
use crate::symbol::{FieldId, FieldTable, Symbol, SymbolSet, SymbolTable};

/// Table layout revision. Bumped whenever the artifact types change shape;
/// sessions refuse languages built for another revision.
pub const LANGUAGE_ABI_VERSION: u32 = 1;
/// Oldest revision the current runtime still understands.
pub const MIN_COMPATIBLE_ABI_VERSION: u32 = 1;

/// Constructor for a per-session external scanner. Teardown is `Drop`.
pub type ScannerFactory = fn() -> Box<dyn ExternalScanner>;

/// Everything a parse session needs to know about one language. Immutable
/// once built; shared freely across sessions.
#[derive(Clone, Debug)]
pub struct Language {
    pub name: String,
    pub abi_version: u32,
    pub symbols: SymbolTable,
    pub fields: FieldTable,
    pub lex: LexTable,
    pub parse: ParseTable,
    /// Terminals attached out-of-band wherever they appear.
    pub extras: Vec<Symbol>,
    /// Terminals owned by the external scanner.
    pub externals: Vec<Symbol>,
    pub start_symbol: Symbol,
    pub scanner: Option<ScannerFactory>,
}

impl Language {
    pub fn verify_abi(&self) -> Result<(), LanguageError> {
        if self.abi_version < MIN_COMPATIBLE_ABI_VERSION || self.abi_version > LANGUAGE_ABI_VERSION
        {
            return Err(LanguageError::IncompatibleVersion {
                found: self.abi_version,
                min: MIN_COMPATIBLE_ABI_VERSION,
                max: LANGUAGE_ABI_VERSION,
            });
        }
        Ok(())
    }

    pub fn symbol_named(&self, name: &str) -> Option<Symbol> {
        self.symbols.lookup(name)
    }

    pub fn field_id(&self, name: &str) -> Option<FieldId> {
        self.fields.id(name)
    }

    pub fn is_extra(&self, symbol: Symbol) -> bool {
        self.extras.contains(&symbol)
    }
}

#[derive(Debug, Error)]
pub enum LanguageError {
    #[error("incompatible language ABI version {found} (supported {min}..={max})")]
    IncompatibleVersion { found: u32, min: u32, max: u32 },
}

/// Restore handed the scanner bytes it cannot make sense of.
#[derive(Debug, Error)]
#[error("corrupt external scanner state: {reason}")]
pub struct ScannerStateError {
    pub reason: String,
}

/// The lexer cursor as seen by an external scanner. Characters advanced over
/// become part of the emitted token up to the last `mark_end`.
pub trait ScanCursor {
    fn lookahead(&self) -> Option<char>;
    fn advance(&mut self);
    fn mark_end(&mut self);
}

/// Hand-written recognizer for context-sensitive terminals.
///
/// `scan` runs before the DFA whenever one of the scanner's terminals is
/// valid. Returning `None` must leave no observable effect; the session
/// rewinds the cursor. State round-trips through `serialize`/`deserialize`
/// so a session can be snapshotted.
pub trait ExternalScanner {
    fn scan(&mut self, cursor: &mut dyn ScanCursor, valid: &SymbolSet) -> Option<Symbol>;
    fn serialize(&self) -> Vec<u8>;
    fn deserialize(&mut self, bytes: &[u8]) -> Result<(), ScannerStateError>;
}
