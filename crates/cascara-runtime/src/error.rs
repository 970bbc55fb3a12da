//! Session-level errors. Malformed *input* never errors (it yields a tree
//! with ERROR and MISSING nodes); these cover the protocol edges.

use cascara_core::{LanguageError, ScannerStateError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Language(#[from] LanguageError),
    #[error(transparent)]
    ScannerState(#[from] ScannerStateError),
    #[error("language has no external scanner")]
    NoScanner,
}
