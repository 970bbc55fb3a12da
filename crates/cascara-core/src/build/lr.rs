//! Canonical LR(1) item-set construction.
//!
//! Produces one action row per state, with goto entries for non-terminals
//! encoded as ordinary `Shift` actions in the same row. Iteration is over
//! ordered sets throughout, so state numbering and conflict resolution are
//! reproducible run to run.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::grammar::Assoc;
use crate::parse::{Action, StateId};
use crate::symbol::{Symbol, SymbolKind, SymbolSet, SymbolTable};

use super::Prod;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Item {
    prod: u16,
    dot: u16,
    la: Symbol,
}

struct Builder<'a> {
    prods: &'a [Prod],
    symbols: &'a SymbolTable,
    /// Right-hand side of the synthetic augmented start production, whose
    /// id is `prods.len()`.
    aug_rhs: [Symbol; 1],
    prods_by_lhs: Vec<Vec<u16>>,
    nullable: Vec<bool>,
    first: Vec<SymbolSet>,
}

impl<'a> Builder<'a> {
    fn aug_id(&self) -> u16 {
        self.prods.len() as u16
    }

    fn rhs(&self, prod: u16) -> &[Symbol] {
        if prod == self.aug_id() {
            &self.aug_rhs
        } else {
            &self.prods[prod as usize].rhs
        }
    }

    fn is_nonterminal(&self, symbol: Symbol) -> bool {
        self.symbols.kind(symbol) == SymbolKind::NonTerminal
    }

    fn compute_first(&mut self) {
        let n = self.symbols.len();
        self.nullable = vec![false; n];
        self.first = vec![SymbolSet::new(); n];
        for (symbol, info) in self.symbols.iter() {
            if info.kind != SymbolKind::NonTerminal {
                self.first[symbol.as_usize()].insert(symbol);
            }
        }
        let mut changed = true;
        while changed {
            changed = false;
            for prod in self.prods {
                let lhs = prod.lhs.as_usize();
                let mut all_nullable = true;
                let mut additions = Vec::new();
                for symbol in &prod.rhs {
                    for s in self.first[symbol.as_usize()].iter() {
                        if !self.first[lhs].contains(s) {
                            additions.push(s);
                        }
                    }
                    if !self.nullable[symbol.as_usize()] {
                        all_nullable = false;
                        break;
                    }
                }
                for s in additions {
                    self.first[lhs].insert(s);
                    changed = true;
                }
                if all_nullable && !self.nullable[lhs] {
                    self.nullable[lhs] = true;
                    changed = true;
                }
            }
        }
    }

    /// FIRST of a symbol sequence followed by `la`.
    fn first_of(&self, seq: &[Symbol], la: Symbol) -> Vec<Symbol> {
        let mut out = BTreeSet::new();
        let mut all_nullable = true;
        for symbol in seq {
            out.extend(self.first[symbol.as_usize()].iter());
            if !self.nullable[symbol.as_usize()] {
                all_nullable = false;
                break;
            }
        }
        if all_nullable {
            out.insert(la);
        }
        out.into_iter().collect()
    }

    fn closure(&self, mut items: BTreeSet<Item>) -> BTreeSet<Item> {
        let mut queue: Vec<Item> = items.iter().copied().collect();
        while let Some(item) = queue.pop() {
            let rhs = self.rhs(item.prod);
            let Some(&next) = rhs.get(item.dot as usize) else {
                continue;
            };
            if !self.is_nonterminal(next) {
                continue;
            }
            let lookaheads = self.first_of(&rhs[item.dot as usize + 1..], item.la);
            for &prod in &self.prods_by_lhs[next.as_usize()] {
                for &la in &lookaheads {
                    let new = Item { prod, dot: 0, la };
                    if items.insert(new) {
                        queue.push(new);
                    }
                }
            }
        }
        items
    }
}

/// Build the action rows. State 0 is the start state.
pub(crate) fn build_automaton(
    prods: &[Prod],
    start: Symbol,
    symbols: &SymbolTable,
) -> Vec<BTreeMap<Symbol, Action>> {
    let mut prods_by_lhs = vec![Vec::new(); symbols.len()];
    for (i, prod) in prods.iter().enumerate() {
        prods_by_lhs[prod.lhs.as_usize()].push(i as u16);
    }
    let mut builder = Builder {
        prods,
        symbols,
        aug_rhs: [start],
        prods_by_lhs,
        nullable: Vec::new(),
        first: Vec::new(),
    };
    builder.compute_first();

    let mut initial = BTreeSet::new();
    initial.insert(Item {
        prod: builder.aug_id(),
        dot: 0,
        la: Symbol::END,
    });
    let initial = builder.closure(initial);

    let mut states: Vec<BTreeSet<Item>> = vec![initial.clone()];
    let mut index: HashMap<BTreeSet<Item>, StateId> = HashMap::new();
    index.insert(initial, 0);
    let mut transitions: Vec<BTreeMap<Symbol, StateId>> = Vec::new();

    let mut cursor = 0;
    while cursor < states.len() {
        let state = states[cursor].clone();
        let mut by_symbol: BTreeMap<Symbol, BTreeSet<Item>> = BTreeMap::new();
        for item in &state {
            if let Some(&next) = builder.rhs(item.prod).get(item.dot as usize) {
                by_symbol.entry(next).or_default().insert(Item {
                    prod: item.prod,
                    dot: item.dot + 1,
                    la: item.la,
                });
            }
        }
        let mut outgoing = BTreeMap::new();
        for (symbol, kernel) in by_symbol {
            let closed = builder.closure(kernel);
            let id = match index.get(&closed) {
                Some(&id) => id,
                None => {
                    let id = states.len() as StateId;
                    index.insert(closed.clone(), id);
                    states.push(closed);
                    id
                }
            };
            outgoing.insert(symbol, id);
        }
        transitions.push(outgoing);
        cursor += 1;
    }

    states
        .iter()
        .zip(transitions.iter())
        .map(|(state, outgoing)| resolve_state(&builder, state, outgoing))
        .collect()
}

fn resolve_state(
    builder: &Builder<'_>,
    state: &BTreeSet<Item>,
    outgoing: &BTreeMap<Symbol, StateId>,
) -> BTreeMap<Symbol, Action> {
    // Reduces grouped by lookahead; an Accept for the augmented production.
    let mut reduces: BTreeMap<Symbol, Vec<u16>> = BTreeMap::new();
    let mut accept_on_end = false;
    for item in state {
        if (item.dot as usize) < builder.rhs(item.prod).len() {
            continue;
        }
        if item.prod == builder.aug_id() {
            accept_on_end = true;
        } else {
            let entry = reduces.entry(item.la).or_default();
            if !entry.contains(&item.prod) {
                entry.push(item.prod);
            }
        }
    }

    let mut row = BTreeMap::new();
    let symbols: BTreeSet<Symbol> = outgoing
        .keys()
        .copied()
        .chain(reduces.keys().copied())
        .collect();
    for symbol in symbols {
        if accept_on_end && symbol == Symbol::END {
            row.insert(symbol, Action::Accept);
            continue;
        }
        let shift = outgoing.get(&symbol).copied();
        let best_reduce = reduces.get(&symbol).map(|candidates| {
            let mut best = candidates[0];
            for &p in &candidates[1..] {
                let (bp, pp) = (
                    builder.prods[best as usize].prec.value,
                    builder.prods[p as usize].prec.value,
                );
                if pp > bp || (pp == bp && p < best) {
                    best = p;
                }
            }
            best
        });
        let action = match (shift, best_reduce) {
            (Some(target), None) => Action::Shift(target),
            (None, Some(p)) => reduce_action(builder, p),
            (Some(target), Some(p)) => {
                let shift_prec = state
                    .iter()
                    .filter(|item| {
                        item.prod != builder.aug_id()
                            && builder.rhs(item.prod).get(item.dot as usize) == Some(&symbol)
                    })
                    .map(|item| builder.prods[item.prod as usize].prec.value)
                    .max()
                    .unwrap_or(0);
                let reduce_prec = builder.prods[p as usize].prec;
                if reduce_prec.value > shift_prec
                    || (reduce_prec.value == shift_prec && reduce_prec.assoc == Assoc::Left)
                {
                    reduce_action(builder, p)
                } else {
                    Action::Shift(target)
                }
            }
            (None, None) => unreachable!("symbol came from a shift or reduce entry"),
        };
        row.insert(symbol, action);
    }
    if accept_on_end && !row.contains_key(&Symbol::END) {
        row.insert(Symbol::END, Action::Accept);
    }
    row
}

fn reduce_action(builder: &Builder<'_>, prod: u16) -> Action {
    Action::Reduce {
        production: prod,
        pop: builder.prods[prod as usize].rhs.len() as u16,
    }
}
