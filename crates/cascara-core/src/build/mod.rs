//! Table construction: grammar description in, `Language` out.
//!
//! Lowering expands the rule tree into flat productions (hidden helper
//! non-terminals for repetition, in-place expansion for choice and option),
//! then the LR(1) pass in [`lr`] turns productions into action tables.
//!
//! # Design: conflict policy
//! Conflicts are resolved deterministically, never reported as ambiguity:
//! higher production precedence wins; at equal precedence a left-associative
//! reduce beats the shift; otherwise shift wins. Competing reduces at equal
//! precedence go to the earliest-declared production.

use std::collections::HashMap;

use indexmap::IndexMap;
use thiserror::Error;

use crate::grammar::{Assoc, Grammar, Rule};
use crate::language::{Language, LANGUAGE_ABI_VERSION, ScannerFactory};
use crate::lex::{LexTable, TerminalDecl};
use crate::parse::{
    Action, AliasStep, FieldStep, ParseState, ParseTable, ProductionInfo, ProductionPrec, RowRef,
};
use crate::symbol::{FieldId, FieldTable, Symbol, SymbolInfo, SymbolKind, SymbolSet, SymbolTable};

mod lr;

#[cfg(test)]
mod build_tests;

#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("grammar has no rules")]
    Empty,
    #[error("duplicate rule `{0}`")]
    DuplicateRule(String),
    #[error("rule `{rule}` references unknown name `{name}`")]
    UnknownReference { rule: String, name: String },
    #[error("rule `{rule}`: field and alias annotations need a single content symbol")]
    AnnotatedSequence { rule: String },
    #[error("extra `{0}` is not a declared terminal")]
    UnknownExtra(String),
    #[error("external `{0}` is not declared as an external terminal")]
    UnknownExternal(String),
}

/// One flattened production with per-position annotations.
#[derive(Clone, Debug)]
pub(crate) struct Prod {
    pub lhs: Symbol,
    pub rhs: Vec<Symbol>,
    pub notes: Vec<ChildNote>,
    pub prec: ProductionPrec,
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ChildNote {
    pub field: Option<FieldId>,
    pub alias: Option<Symbol>,
}

#[derive(Clone, Debug)]
struct Elem {
    symbol: Symbol,
    note: ChildNote,
}

#[derive(Clone, Debug)]
struct Alt {
    elems: Vec<Elem>,
    prec: Option<(i32, Assoc)>,
}

struct Lowering<'g> {
    grammar: &'g Grammar,
    symbols: SymbolTable,
    fields: FieldTable,
    terminals: IndexMap<String, Symbol>,
    nonterminals: IndexMap<String, Symbol>,
    alias_symbols: IndexMap<(String, bool), Symbol>,
    prods: Vec<Prod>,
    current_rule: String,
    helper_count: usize,
}

impl<'g> Lowering<'g> {
    fn new(grammar: &'g Grammar, decls: &[TerminalDecl]) -> Result<Self, GrammarError> {
        let mut symbols = SymbolTable::with_builtins();
        let mut terminals = IndexMap::new();
        for decl in decls {
            let symbol = symbols.push(SymbolInfo {
                name: decl.name.clone(),
                kind: if decl.external {
                    SymbolKind::External
                } else {
                    SymbolKind::Terminal
                },
                named: decl.named,
                visible: decl.visible,
            });
            terminals.insert(decl.name.clone(), symbol);
        }

        let mut nonterminals = IndexMap::new();
        for (name, _) in &grammar.rules {
            if nonterminals.contains_key(name) {
                return Err(GrammarError::DuplicateRule(name.clone()));
            }
            let hidden = name.starts_with('_');
            let symbol = symbols.push(SymbolInfo {
                name: name.clone(),
                kind: SymbolKind::NonTerminal,
                named: !hidden,
                visible: !hidden,
            });
            nonterminals.insert(name.clone(), symbol);
        }

        Ok(Lowering {
            grammar,
            symbols,
            fields: FieldTable::default(),
            terminals,
            nonterminals,
            alias_symbols: IndexMap::new(),
            prods: Vec::new(),
            current_rule: String::new(),
            helper_count: 0,
        })
    }

    fn run(mut self) -> Result<Self, GrammarError> {
        for (name, rule) in &self.grammar.rules {
            self.current_rule = name.clone();
            self.helper_count = 0;
            let lhs = self.nonterminals[name.as_str()];
            let alts = self.lower(rule, None, None)?;
            for alt in alts {
                self.push_prod(lhs, alt);
            }
        }
        Ok(self)
    }

    fn push_prod(&mut self, lhs: Symbol, alt: Alt) {
        let (value, assoc) = alt.prec.unwrap_or((0, Assoc::None));
        self.prods.push(Prod {
            lhs,
            rhs: alt.elems.iter().map(|e| e.symbol).collect(),
            notes: alt.elems.iter().map(|e| e.note).collect(),
            prec: ProductionPrec { value, assoc },
        });
    }

    fn alias_symbol(&mut self, name: &str, named: bool) -> Symbol {
        if named {
            if let Some(symbol) = self.nonterminals.get(name) {
                return *symbol;
            }
        }
        if let Some(symbol) = self.terminals.get(name) {
            return *symbol;
        }
        let key = (name.to_owned(), named);
        if let Some(symbol) = self.alias_symbols.get(&key) {
            return *symbol;
        }
        let symbol = self.symbols.push(SymbolInfo {
            name: name.to_owned(),
            kind: SymbolKind::Auxiliary,
            named,
            visible: true,
        });
        self.alias_symbols.insert(key, symbol);
        symbol
    }

    fn helper(&mut self) -> Symbol {
        let base = self.current_rule.trim_start_matches('_');
        let name = format!("_{}_repeat{}", base, self.helper_count + 1);
        self.helper_count += 1;
        let symbol = self.symbols.push(SymbolInfo {
            name,
            kind: SymbolKind::NonTerminal,
            named: false,
            visible: false,
        });
        symbol
    }

    fn lower(
        &mut self,
        rule: &Rule,
        field: Option<FieldId>,
        alias: Option<Symbol>,
    ) -> Result<Vec<Alt>, GrammarError> {
        match rule {
            Rule::Blank => Ok(vec![Alt {
                elems: Vec::new(),
                prec: None,
            }]),
            Rule::Terminal(name) => {
                let symbol = self.terminals.get(name.as_str()).copied().ok_or_else(|| {
                    GrammarError::UnknownReference {
                        rule: self.current_rule.clone(),
                        name: name.clone(),
                    }
                })?;
                Ok(vec![Alt {
                    elems: vec![Elem {
                        symbol,
                        note: ChildNote { field, alias },
                    }],
                    prec: None,
                }])
            }
            Rule::NonTerminal(name) => {
                let symbol = self
                    .nonterminals
                    .get(name.as_str())
                    .copied()
                    .ok_or_else(|| GrammarError::UnknownReference {
                        rule: self.current_rule.clone(),
                        name: name.clone(),
                    })?;
                Ok(vec![Alt {
                    elems: vec![Elem {
                        symbol,
                        note: ChildNote { field, alias },
                    }],
                    prec: None,
                }])
            }
            Rule::Seq(items) => {
                if let [single] = items.as_slice() {
                    return self.lower(single, field, alias);
                }
                if field.is_some() || alias.is_some() {
                    return Err(GrammarError::AnnotatedSequence {
                        rule: self.current_rule.clone(),
                    });
                }
                let mut acc = vec![Alt {
                    elems: Vec::new(),
                    prec: None,
                }];
                for item in items {
                    let frags = self.lower(item, None, None)?;
                    let mut next = Vec::with_capacity(acc.len() * frags.len());
                    for a in &acc {
                        for b in &frags {
                            let mut elems = a.elems.clone();
                            elems.extend(b.elems.iter().cloned());
                            next.push(Alt {
                                elems,
                                prec: a.prec.or(b.prec),
                            });
                        }
                    }
                    acc = next;
                }
                Ok(acc)
            }
            Rule::Choice(members) => {
                let mut alts = Vec::new();
                for member in members {
                    alts.extend(self.lower(member, field, alias)?);
                }
                Ok(alts)
            }
            Rule::Optional(inner) => {
                let mut alts = self.lower(inner, field, alias)?;
                alts.push(Alt {
                    elems: Vec::new(),
                    prec: None,
                });
                Ok(alts)
            }
            Rule::Repeat(inner) => self.lower_repeat(inner, field, alias, true),
            Rule::Repeat1(inner) => self.lower_repeat(inner, field, alias, false),
            Rule::Field { name, content } => {
                let id = self.fields.intern(name);
                self.lower(content, Some(id), alias)
            }
            Rule::Alias {
                content,
                name,
                named,
            } => {
                let symbol = self.alias_symbol(name, *named);
                self.lower(content, field, Some(symbol))
            }
            Rule::Prec {
                value,
                assoc,
                content,
            } => {
                let mut alts = self.lower(content, field, alias)?;
                for alt in &mut alts {
                    if alt.prec.is_none() {
                        alt.prec = Some((*value, *assoc));
                    }
                }
                Ok(alts)
            }
        }
    }

    /// Left-recursive helper non-terminal for repetition. The element's
    /// field annotation is pushed into the helper's productions so it lands
    /// on each repeated child; the helper position itself records the field
    /// as inherited.
    fn lower_repeat(
        &mut self,
        inner: &Rule,
        field: Option<FieldId>,
        alias: Option<Symbol>,
        allow_empty: bool,
    ) -> Result<Vec<Alt>, GrammarError> {
        if alias.is_some() {
            return Err(GrammarError::AnnotatedSequence {
                rule: self.current_rule.clone(),
            });
        }
        let helper = self.helper();
        let element_alts = self.lower(inner, field, None)?;
        if allow_empty {
            self.push_prod(
                helper,
                Alt {
                    elems: Vec::new(),
                    prec: None,
                },
            );
        } else {
            for alt in &element_alts {
                self.push_prod(helper, alt.clone());
            }
        }
        for alt in &element_alts {
            let mut elems = vec![Elem {
                symbol: helper,
                note: ChildNote::default(),
            }];
            elems.extend(alt.elems.iter().cloned());
            self.push_prod(
                helper,
                Alt {
                    elems,
                    prec: None,
                },
            );
        }
        Ok(vec![Alt {
            elems: vec![Elem {
                symbol: helper,
                note: ChildNote { field, alias: None },
            }],
            prec: None,
        }])
    }
}

/// Construct a complete `Language` from a grammar, its terminal
/// declarations, and its lexer table.
pub fn build_language(
    grammar: &Grammar,
    terminals: &[TerminalDecl],
    lex: LexTable,
    scanner: Option<ScannerFactory>,
) -> Result<Language, GrammarError> {
    if grammar.rules.is_empty() {
        return Err(GrammarError::Empty);
    }
    let lowering = Lowering::new(grammar, terminals)?.run()?;
    let start_symbol = lowering.nonterminals[grammar.rules[0].0.as_str()];
    let Lowering {
        symbols,
        fields,
        terminals: terminal_map,
        prods,
        ..
    } = lowering;

    let mut extras = Vec::new();
    for name in &grammar.extras {
        let symbol = terminal_map
            .get(name.as_str())
            .copied()
            .ok_or_else(|| GrammarError::UnknownExtra(name.clone()))?;
        extras.push(symbol);
    }
    let mut externals = Vec::new();
    for name in &grammar.externals {
        let symbol = terminal_map
            .get(name.as_str())
            .copied()
            .filter(|s| symbols.kind(*s) == SymbolKind::External)
            .ok_or_else(|| GrammarError::UnknownExternal(name.clone()))?;
        externals.push(symbol);
    }

    let rows = lr::build_automaton(&prods, start_symbol, &symbols);

    let mut table = ParseTable {
        states: Vec::with_capacity(rows.len()),
        dense: Vec::new(),
        sparse: Vec::new(),
        productions: prods
            .iter()
            .map(|p| ProductionInfo {
                lhs: p.lhs,
                arity: p.rhs.len() as u16,
                fields: p
                    .notes
                    .iter()
                    .enumerate()
                    .filter_map(|(i, note)| {
                        note.field.map(|field| FieldStep {
                            child: i as u16,
                            field,
                            inherited: !symbols.is_visible(p.rhs[i]),
                        })
                    })
                    .collect(),
                aliases: p
                    .notes
                    .iter()
                    .enumerate()
                    .filter_map(|(i, note)| {
                        note.alias.map(|symbol| AliasStep {
                            child: i as u16,
                            symbol,
                        })
                    })
                    .collect(),
            })
            .collect(),
        start_state: 0,
    };

    let mut shared_rows: HashMap<Vec<(Symbol, Action)>, (u32, u32)> = HashMap::new();
    for row in &rows {
        let entries: Vec<(Symbol, Action)> = row.iter().map(|(s, a)| (*s, *a)).collect();

        let mut valid = SymbolSet::new();
        let mut external = false;
        for (symbol, _) in &entries {
            match symbols.kind(*symbol) {
                SymbolKind::Terminal => valid.insert(*symbol),
                SymbolKind::External => {
                    valid.insert(*symbol);
                    external = true;
                }
                _ => {}
            }
        }
        for extra in &extras {
            valid.insert(*extra);
        }
        let lex_mode = lex.mode_for(&valid);

        // A state earns a dense row when it carries a sizable share of all
        // symbols; everything else goes through the shared sparse pool.
        let row_ref = if entries.len() * 4 >= symbols.len() {
            table.dense.push(dense_row(&entries, symbols.len()));
            RowRef::Dense(table.dense.len() as u32 - 1)
        } else {
            let (offset, len) = *shared_rows.entry(entries.clone()).or_insert_with(|| {
                let offset = table.sparse.len() as u32;
                table.sparse.extend(entries.iter().copied());
                (offset, entries.len() as u32)
            });
            RowRef::Sparse { offset, len }
        };

        table.states.push(ParseState {
            row: row_ref,
            lex_mode,
            external,
            valid,
        });
    }

    Ok(Language {
        name: grammar.name.clone(),
        abi_version: LANGUAGE_ABI_VERSION,
        symbols,
        fields,
        lex,
        parse: table,
        extras,
        externals,
        start_symbol,
        scanner,
    })
}

fn dense_row(entries: &[(Symbol, Action)], width: usize) -> Vec<Option<Action>> {
    let mut row = vec![None; width];
    for (symbol, action) in entries {
        row[symbol.as_usize()] = Some(*action);
    }
    row
}
