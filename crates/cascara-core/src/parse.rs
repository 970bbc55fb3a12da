//! Parse table artifacts.
//!
//! Shift/reduce actions keyed by `(state, symbol)`. Hot states carry a dense
//! row indexed by symbol id; the long tail shares one sorted pool of
//! `(symbol, action)` pairs, with identical rows deduplicated, looked up by
//! per-state offset.

use serde::{Deserialize, Serialize};

use crate::grammar::Assoc;
use crate::lex::LexModeId;
use crate::symbol::{FieldId, Symbol, SymbolSet};

pub type StateId = u16;
pub type ProductionId = u16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Shift(StateId),
    Reduce {
        production: ProductionId,
        /// Structural frames to pop; equals the production's arity.
        pop: u16,
    },
    Accept,
}

/// Where a state's actions live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowRef {
    /// Index into [`ParseTable::dense`].
    Dense(u32),
    /// Slice of [`ParseTable::sparse`].
    Sparse { offset: u32, len: u32 },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParseState {
    pub row: RowRef,
    /// Lex mode to use when requesting the next token in this state.
    pub lex_mode: LexModeId,
    /// Consult the external scanner before the DFA.
    pub external: bool,
    /// Terminals (including extras) this state can consume next.
    pub valid: SymbolSet,
}

/// Field assignment for one right-hand-side position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStep {
    pub child: u16,
    pub field: FieldId,
    /// The child is an invisible helper; the field is re-exposed on the
    /// grandchildren when the helper is flattened.
    pub inherited: bool,
}

/// Context alias for one right-hand-side position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasStep {
    pub child: u16,
    pub symbol: Symbol,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProductionInfo {
    pub lhs: Symbol,
    pub arity: u16,
    /// Sorted by `child`.
    pub fields: Vec<FieldStep>,
    /// Sorted by `child`.
    pub aliases: Vec<AliasStep>,
}

impl ProductionInfo {
    pub fn field_for(&self, child: u16) -> Option<&FieldStep> {
        self.fields.iter().find(|f| f.child == child)
    }

    pub fn alias_for(&self, child: u16) -> Option<Symbol> {
        self.aliases
            .iter()
            .find(|a| a.child == child)
            .map(|a| a.symbol)
    }
}

/// Conflict-resolution metadata kept per production for diagnostics; the
/// runtime never consults it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionPrec {
    pub value: i32,
    pub assoc: Assoc,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParseTable {
    pub states: Vec<ParseState>,
    pub dense: Vec<Vec<Option<Action>>>,
    pub sparse: Vec<(Symbol, Action)>,
    pub productions: Vec<ProductionInfo>,
    pub start_state: StateId,
}

impl ParseTable {
    pub fn action(&self, state: StateId, symbol: Symbol) -> Option<Action> {
        match self.states[state as usize].row {
            RowRef::Dense(i) => self.dense[i as usize]
                .get(symbol.as_usize())
                .copied()
                .flatten(),
            RowRef::Sparse { offset, len } => {
                let row = &self.sparse[offset as usize..(offset + len) as usize];
                row.binary_search_by_key(&symbol, |(s, _)| *s)
                    .ok()
                    .map(|i| row[i].1)
            }
        }
    }

    /// All `(symbol, action)` entries of a state in ascending symbol order.
    pub fn row_entries(&self, state: StateId) -> Vec<(Symbol, Action)> {
        match self.states[state as usize].row {
            RowRef::Dense(i) => self.dense[i as usize]
                .iter()
                .enumerate()
                .filter_map(|(s, a)| a.map(|a| (Symbol::from_raw(s as u16), a)))
                .collect(),
            RowRef::Sparse { offset, len } => {
                self.sparse[offset as usize..(offset + len) as usize].to_vec()
            }
        }
    }
}
