//! The parse session.
//!
//! A shift/reduce loop over a state stack and a parallel node stack. Extra
//! tokens (comments) and ERROR containers are pushed as transparent entries
//! that repeat the state below them; reduces pop exactly the production's
//! arity in structural frames and carry interleaved transparent entries
//! into the parent.
//!
//! # Design: recovery
//! Three tiers, in order. A lexical dead-end consumes one code point as an
//! error leaf. An unexpected token first tries to insert a single
//! zero-width MISSING terminal: the lowest-numbered valid terminal whose
//! simulated shift makes the real lookahead consumable within a bounded
//! number of steps. Failing that, frames are popped back to the nearest
//! state that can consume the lookahead, or the token is swallowed; either
//! way the debris accumulates into an ERROR node attached where parsing
//! resumes.

use cascara_core::{
    Action, ExternalScanner, Language, StateId, Symbol, SymbolKind,
};

use crate::error::ParseError;
use crate::lexer::{Lexed, Lexer, Token};
use crate::trace::{NoopTracer, Tracer};
use crate::tree::{Node, Span, Tree};

/// Step budget for one simulated insertion probe.
const MAX_SIM_STEPS: usize = 64;
/// Consecutive MISSING insertions allowed without consuming input.
const MAX_MISSING_STREAK: u8 = 4;
/// Hard step budget per token; exceeding it means a malformed table.
const TOKEN_FUEL: usize = 100_000;

pub struct Parser<'l> {
    language: &'l Language,
    scanner: Option<Box<dyn ExternalScanner>>,
}

impl<'l> Parser<'l> {
    /// Checks table-layout compatibility and instantiates the language's
    /// external scanner, if any.
    pub fn new(language: &'l Language) -> Result<Self, ParseError> {
        language.verify_abi()?;
        Ok(Parser {
            language,
            scanner: language.scanner.map(|create| create()),
        })
    }

    pub fn language(&self) -> &'l Language {
        self.language
    }

    /// Parse to a tree. Never fails: malformed input is represented with
    /// ERROR and MISSING nodes.
    pub fn parse(&mut self, source: &str) -> Tree<'l> {
        self.parse_traced(source, &mut NoopTracer)
    }

    pub fn parse_traced(&mut self, source: &str, tracer: &mut dyn Tracer) -> Tree<'l> {
        let mut session = Session {
            language: self.language,
            lexer: Lexer::new(source, &self.language.lex),
            scanner: self.scanner.as_mut(),
            tracer,
            states: vec![self.language.parse.start_state],
            nodes: Vec::new(),
            trivia: Vec::new(),
            last_end: 0,
            error_buf: Vec::new(),
            missing_streak: 0,
        };
        let (root, trivia) = session.run();
        Tree::new(self.language, source.to_owned(), root, trivia)
    }

    /// Snapshot of the external scanner's persisted state.
    pub fn scanner_state(&self) -> Result<Vec<u8>, ParseError> {
        self.scanner
            .as_ref()
            .map(|s| s.serialize())
            .ok_or(ParseError::NoScanner)
    }

    pub fn restore_scanner_state(&mut self, bytes: &[u8]) -> Result<(), ParseError> {
        let scanner = self.scanner.as_mut().ok_or(ParseError::NoScanner)?;
        scanner.deserialize(bytes)?;
        Ok(())
    }
}

struct Session<'p, 's, 'l> {
    language: &'l Language,
    lexer: Lexer<'s, 'l>,
    scanner: Option<&'p mut Box<dyn ExternalScanner>>,
    tracer: &'p mut dyn Tracer,
    /// Always one longer than `nodes`.
    states: Vec<StateId>,
    nodes: Vec<Node>,
    trivia: Vec<Span>,
    /// End of the last consumed token; gaps up to the next token are trivia.
    last_end: usize,
    /// Tokens and popped frames awaiting attachment as an ERROR node.
    error_buf: Vec<Node>,
    missing_streak: u8,
}

impl Session<'_, '_, '_> {
    fn run(&mut self) -> (Node, Vec<Span>) {
        loop {
            let state = self.top_state();
            let Some(token) = self.read_token(state) else {
                continue;
            };
            if self.drive_token(token) {
                break;
            }
        }
        let root = self.assemble_root();
        (root, std::mem::take(&mut self.trivia))
    }

    fn top_state(&self) -> StateId {
        *self.states.last().expect("state stack is never empty")
    }

    fn action(&self, state: StateId, symbol: Symbol) -> Option<Action> {
        self.language.parse.action(state, symbol)
    }

    /// Next lookahead. `None` means a lexical dead-end was consumed as an
    /// error leaf and the caller should re-read.
    fn read_token(&mut self, state: StateId) -> Option<Token> {
        let language = self.language;
        let meta = &language.parse.states[state as usize];

        if meta.external {
            if let Some(scanner) = self.scanner.as_mut() {
                let start = self.lexer.pos();
                self.lexer.set_mark(start);
                if let Some(symbol) = scanner.scan(&mut self.lexer, &meta.valid) {
                    let end = self.lexer.mark();
                    self.lexer.set_pos(end);
                    let token = Token { symbol, start, end };
                    self.note_consumed(token.start, token.end);
                    self.tracer.token(symbol, Span::new(start, end));
                    return Some(token);
                }
                self.lexer.set_pos(start);
            }
        }

        match self.lexer.next_token(meta.lex_mode, &meta.valid) {
            Lexed::Token(token) => {
                self.note_consumed(token.start, token.end);
                self.tracer
                    .token(token.symbol, Span::new(token.start, token.end));
                Some(token)
            }
            Lexed::Eof => {
                let len = self.lexer.len();
                self.note_consumed(len, len);
                Some(Token {
                    symbol: Symbol::END,
                    start: len,
                    end: len,
                })
            }
            Lexed::Stuck { start } => {
                let (s, e) = self.lexer.error_advance(start);
                self.note_consumed(s, e);
                let leaf = Node::leaf(Symbol::ERROR, Span::new(s, e));
                self.tracer.skipped(Symbol::ERROR, Span::new(s, e));
                if self.error_buf.is_empty() {
                    self.push_transparent(leaf);
                } else {
                    self.error_buf.push(leaf);
                }
                None
            }
        }
    }

    fn note_consumed(&mut self, start: usize, end: usize) {
        if start > self.last_end {
            self.trivia.push(Span::new(self.last_end, start));
        }
        self.last_end = self.last_end.max(end);
    }

    /// Run the action loop for one lookahead. Returns true once accepted.
    fn drive_token(&mut self, token: Token) -> bool {
        // Extras bypass the tables entirely when the state has no use for
        // them as grammar symbols.
        if self.language.is_extra(token.symbol)
            && self.action(self.top_state(), token.symbol).is_none()
        {
            let mut leaf = Node::leaf(token.symbol, Span::new(token.start, token.end));
            leaf.extra = true;
            if self.error_buf.is_empty() {
                self.push_transparent(leaf);
            } else {
                self.error_buf.push(leaf);
            }
            return false;
        }

        let mut fuel = TOKEN_FUEL;
        loop {
            fuel -= 1;
            if fuel == 0 {
                self.wrap_all_into_error();
                return true;
            }
            let state = self.top_state();
            let action = self.action(state, token.symbol);
            if action.is_some() && !self.error_buf.is_empty() {
                self.flush_error_buf();
            }
            match action {
                Some(Action::Shift(next)) => {
                    let leaf = Node::leaf(token.symbol, Span::new(token.start, token.end));
                    self.nodes.push(leaf);
                    self.states.push(next);
                    self.tracer.shift(next, token.symbol);
                    self.missing_streak = 0;
                    return false;
                }
                Some(Action::Reduce { production, pop }) => {
                    self.reduce(production, pop);
                }
                Some(Action::Accept) => {
                    self.tracer.accept();
                    return true;
                }
                None => {
                    if self.error_buf.is_empty()
                        && self.missing_streak < MAX_MISSING_STREAK
                        && let Some(insert) = self.find_missing(state, token.symbol)
                    {
                        self.insert_missing(insert);
                        self.missing_streak += 1;
                        continue;
                    }
                    if self.pop_to_ancestor(token.symbol) {
                        continue;
                    }
                    if token.symbol == Symbol::END {
                        self.wrap_all_into_error();
                        return true;
                    }
                    let leaf = Node::leaf(token.symbol, Span::new(token.start, token.end));
                    self.tracer
                        .skipped(token.symbol, Span::new(token.start, token.end));
                    self.error_buf.push(leaf);
                    return false;
                }
            }
        }
    }

    fn push_transparent(&mut self, node: Node) {
        let state = self.top_state();
        self.states.push(state);
        self.nodes.push(node);
    }

    fn pop_entry(&mut self) -> Node {
        self.states.pop();
        self.nodes.pop().expect("pop on empty node stack")
    }

    fn reduce(&mut self, production: u16, pop: u16) {
        let language = self.language;
        let info = &language.parse.productions[production as usize];

        // Transparent entries above the last structural child follow the
        // reduced node, not precede it.
        let mut trailing = Vec::new();
        if pop > 0 {
            while self.nodes.last().is_some_and(Node::is_transparent) {
                trailing.push(self.pop_entry());
            }
        }

        let mut popped = Vec::new();
        let mut need = pop;
        while need > 0 {
            let node = self.pop_entry();
            if !node.is_transparent() {
                need -= 1;
            }
            popped.push(node);
        }
        popped.reverse();

        let mut children = Vec::new();
        let mut struct_idx: u16 = 0;
        for mut node in popped {
            if node.is_transparent() {
                children.push(node);
                continue;
            }
            if let Some(alias) = info.alias_for(struct_idx) {
                node.alias = Some(alias);
            }
            if let Some(step) = info.field_for(struct_idx) {
                node.field = Some(step.field);
            }
            struct_idx += 1;

            let invisible = node.alias.is_none()
                && !node.is_missing()
                && !node.is_error()
                && !language.symbols.is_visible(node.symbol());
            if invisible {
                if node.children().is_empty() {
                    // Zero-visibility token (the descendant combinator):
                    // its consumed text becomes trivia.
                    if !node.span().is_empty() {
                        self.trivia.push(node.span());
                    }
                } else {
                    let field = node.field_id();
                    for mut child in std::mem::take(&mut node.children) {
                        if child.field_id().is_none() {
                            child.field = field;
                        }
                        children.push(child);
                    }
                }
            } else {
                children.push(node);
            }
        }

        let child_count = children.len();
        let parent = Node::interior(info.lhs, children, self.last_end);

        let state = self.top_state();
        let Some(Action::Shift(next)) = self.action(state, info.lhs) else {
            // A goto always exists for a well-formed table; salvage by
            // treating the orphaned node as debris.
            self.error_buf.push(parent);
            return;
        };
        self.states.push(next);
        self.nodes.push(parent);
        self.tracer.reduce(production, info.lhs, child_count);

        for node in trailing.into_iter().rev() {
            self.push_transparent(node);
        }
    }

    /// LR stack with transparent entries filtered out; what reduces
    /// actually operate on.
    fn structural_states(&self) -> Vec<StateId> {
        let mut sim = Vec::with_capacity(self.states.len());
        sim.push(self.states[0]);
        for (i, node) in self.nodes.iter().enumerate() {
            if !node.is_transparent() {
                sim.push(self.states[i + 1]);
            }
        }
        sim
    }

    /// Smallest valid terminal whose insertion lets `lookahead` through.
    fn find_missing(&self, state: StateId, lookahead: Symbol) -> Option<Symbol> {
        for (symbol, _) in self.language.parse.row_entries(state) {
            if symbol == Symbol::END
                || self.language.is_extra(symbol)
                || self.language.symbols.kind(symbol) != SymbolKind::Terminal
            {
                continue;
            }
            let mut sim = self.structural_states();
            if self.sim_drive(&mut sim, symbol) && self.sim_drive(&mut sim, lookahead) {
                return Some(symbol);
            }
        }
        None
    }

    /// Feed one symbol through a simulated stack until it shifts (or the
    /// grammar accepts). Bounded; false on any dead end.
    fn sim_drive(&self, sim: &mut Vec<StateId>, symbol: Symbol) -> bool {
        for _ in 0..MAX_SIM_STEPS {
            let Some(&top) = sim.last() else { return false };
            match self.action(top, symbol) {
                Some(Action::Shift(next)) => {
                    sim.push(next);
                    return true;
                }
                Some(Action::Accept) => return true,
                Some(Action::Reduce { production, pop }) => {
                    if sim.len() <= pop as usize {
                        return false;
                    }
                    sim.truncate(sim.len() - pop as usize);
                    let lhs = self.language.parse.productions[production as usize].lhs;
                    let Some(&top) = sim.last() else { return false };
                    match self.action(top, lhs) {
                        Some(Action::Shift(next)) => sim.push(next),
                        _ => return false,
                    }
                }
                None => return false,
            }
        }
        false
    }

    fn insert_missing(&mut self, symbol: Symbol) {
        self.tracer.missing(symbol);
        let node = Node::missing_leaf(symbol, self.last_end);
        loop {
            let state = self.top_state();
            match self.action(state, symbol) {
                Some(Action::Shift(next)) => {
                    self.nodes.push(node);
                    self.states.push(next);
                    return;
                }
                Some(Action::Reduce { production, pop }) => {
                    self.reduce(production, pop);
                }
                _ => return,
            }
        }
    }

    /// Pop frames until some enclosing state can consume `symbol`; the
    /// popped frames become part of the pending ERROR node.
    fn pop_to_ancestor(&mut self, symbol: Symbol) -> bool {
        for k in (0..self.states.len() - 1).rev() {
            if self.action(self.states[k], symbol).is_some() {
                let popped = self.nodes.split_off(k);
                self.states.truncate(k + 1);
                self.error_buf.extend(popped);
                return true;
            }
        }
        false
    }

    fn flush_error_buf(&mut self) {
        let debris = std::mem::take(&mut self.error_buf);
        if debris.is_empty() {
            return;
        }
        let error = Node::error(debris, self.last_end);
        self.push_transparent(error);
    }

    /// Last-resort recovery at end of input: everything on the stack
    /// becomes one ERROR child of the root.
    fn wrap_all_into_error(&mut self) {
        let mut debris = std::mem::take(&mut self.nodes);
        debris.extend(std::mem::take(&mut self.error_buf));
        self.states.truncate(1);
        if debris.is_empty() {
            return;
        }
        let error = Node::error(debris, self.last_end);
        self.push_transparent(error);
    }

    fn assemble_root(&mut self) -> Node {
        self.flush_error_buf();
        let mut nodes = std::mem::take(&mut self.nodes);
        let len = self.lexer.len();

        let children = match nodes
            .iter()
            .position(|n| !n.is_transparent() && n.symbol() == self.language.start_symbol)
        {
            Some(idx) => {
                let mut after = nodes.split_off(idx);
                let mut root_node = after.remove(0);
                let mut children = nodes;
                children.append(&mut root_node.children);
                children.append(&mut after);
                children
            }
            None => nodes,
        };

        let mut root = Node::interior(self.language.start_symbol, children, 0);
        root.span = Span::new(0, len);
        root
    }
}
