//! Symbol identities shared by the lexer, the parse tables, and the tree.
//!
//! Every terminal, non-terminal, and alias a language knows about is assigned
//! a dense `Symbol` id. Two ids are reserved: 0 for end-of-input and 1 for
//! the ERROR symbol used by recovery.

use std::num::NonZeroU16;

use serde::{Deserialize, Serialize};

/// Dense symbol id. Stable for the lifetime of a `Language`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Symbol(u16);

impl Symbol {
    /// End-of-input pseudo-terminal.
    pub const END: Symbol = Symbol(0);
    /// Recovery container symbol.
    pub const ERROR: Symbol = Symbol(1);
    /// Number of reserved builtin ids.
    pub const BUILTIN_COUNT: u16 = 2;

    pub const fn from_raw(raw: u16) -> Symbol {
        Symbol(raw)
    }

    pub const fn as_u16(self) -> u16 {
        self.0
    }

    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// What role a symbol plays in the grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolKind {
    /// Terminal produced by the lexer DFA.
    Terminal,
    /// Terminal produced by the external scanner.
    External,
    /// Non-terminal with productions.
    NonTerminal,
    /// Alias-only symbol; appears in trees, never on the parse stack.
    Auxiliary,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub name: String,
    pub kind: SymbolKind,
    /// Named nodes appear in s-expressions; anonymous tokens do not.
    pub named: bool,
    /// Invisible symbols are flattened out of the tree.
    pub visible: bool,
}

/// All symbols of a language, indexed by `Symbol` id.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SymbolTable {
    infos: Vec<SymbolInfo>,
}

impl SymbolTable {
    /// Table pre-seeded with the end-of-input and ERROR builtins.
    pub fn with_builtins() -> Self {
        let mut table = SymbolTable::default();
        table.push(SymbolInfo {
            name: "end".to_owned(),
            kind: SymbolKind::Terminal,
            named: false,
            visible: false,
        });
        table.push(SymbolInfo {
            name: "ERROR".to_owned(),
            kind: SymbolKind::Auxiliary,
            named: true,
            visible: true,
        });
        table
    }

    pub fn push(&mut self, info: SymbolInfo) -> Symbol {
        let id = self.infos.len();
        debug_assert!(id <= u16::MAX as usize, "symbol table overflow");
        self.infos.push(info);
        Symbol(id as u16)
    }

    pub fn get(&self, symbol: Symbol) -> &SymbolInfo {
        &self.infos[symbol.as_usize()]
    }

    pub fn name(&self, symbol: Symbol) -> &str {
        &self.infos[symbol.as_usize()].name
    }

    pub fn is_named(&self, symbol: Symbol) -> bool {
        self.infos[symbol.as_usize()].named
    }

    pub fn is_visible(&self, symbol: Symbol) -> bool {
        self.infos[symbol.as_usize()].visible
    }

    pub fn kind(&self, symbol: Symbol) -> SymbolKind {
        self.infos[symbol.as_usize()].kind
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// First symbol with the given name, if any.
    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.infos
            .iter()
            .position(|info| info.name == name)
            .map(|i| Symbol(i as u16))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &SymbolInfo)> {
        self.infos
            .iter()
            .enumerate()
            .map(|(i, info)| (Symbol(i as u16), info))
    }
}

/// Field identifier; 1-based so `Option<FieldId>` stays two bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldId(NonZeroU16);

impl FieldId {
    pub fn from_index(index: usize) -> FieldId {
        debug_assert!(index < u16::MAX as usize);
        FieldId(NonZeroU16::new(index as u16 + 1).unwrap())
    }

    pub fn index(self) -> usize {
        self.0.get() as usize - 1
    }
}

/// Interned field names for a language.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FieldTable {
    names: Vec<String>,
}

impl FieldTable {
    pub fn intern(&mut self, name: &str) -> FieldId {
        if let Some(i) = self.names.iter().position(|n| n == name) {
            return FieldId::from_index(i);
        }
        self.names.push(name.to_owned());
        FieldId::from_index(self.names.len() - 1)
    }

    pub fn id(&self, name: &str) -> Option<FieldId> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(FieldId::from_index)
    }

    pub fn name(&self, id: FieldId) -> &str {
        &self.names[id.index()]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Bitset over symbol ids, used to tell the lexer and the external scanner
/// which terminals the current parse state can consume.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolSet {
    words: Vec<u64>,
}

impl SymbolSet {
    pub fn new() -> Self {
        SymbolSet::default()
    }

    pub fn insert(&mut self, symbol: Symbol) {
        let (word, bit) = (symbol.as_usize() / 64, symbol.as_usize() % 64);
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1 << bit;
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        let (word, bit) = (symbol.as_usize() / 64, symbol.as_usize() % 64);
        self.words.get(word).is_some_and(|w| w & (1 << bit) != 0)
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    pub fn intersects(&self, other: &SymbolSet) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .any(|(a, b)| a & b != 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.words.iter().enumerate().flat_map(|(wi, word)| {
            (0..64)
                .filter(move |bit| word & (1u64 << bit) != 0)
                .map(move |bit| Symbol((wi * 64 + bit) as u16))
        })
    }
}

impl FromIterator<Symbol> for SymbolSet {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        let mut set = SymbolSet::new();
        for s in iter {
            set.insert(s);
        }
        set
    }
}
