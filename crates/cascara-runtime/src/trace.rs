//! Session observability.
//!
//! The session reports its steps through a `Tracer`. `NoopTracer` keeps the
//! hot path free of formatting; `PrintTracer` narrates to stderr with
//! resolved symbol names.

use cascara_core::{Language, ProductionId, StateId, Symbol};

use crate::tree::Span;

pub trait Tracer {
    fn token(&mut self, _symbol: Symbol, _span: Span) {}
    fn shift(&mut self, _state: StateId, _symbol: Symbol) {}
    fn reduce(&mut self, _production: ProductionId, _lhs: Symbol, _children: usize) {}
    fn missing(&mut self, _symbol: Symbol) {}
    fn skipped(&mut self, _symbol: Symbol, _span: Span) {}
    fn accept(&mut self) {}
}

/// Does nothing; the default for `Parser::parse`.
pub struct NoopTracer;

impl Tracer for NoopTracer {}

/// Narrates every step to stderr.
pub struct PrintTracer<'l> {
    language: &'l Language,
}

impl<'l> PrintTracer<'l> {
    pub fn new(language: &'l Language) -> Self {
        PrintTracer { language }
    }

    fn name(&self, symbol: Symbol) -> &str {
        self.language.symbols.name(symbol)
    }
}

impl Tracer for PrintTracer<'_> {
    fn token(&mut self, symbol: Symbol, span: Span) {
        eprintln!("token  {} @ {}..{}", self.name(symbol), span.start, span.end);
    }

    fn shift(&mut self, state: StateId, symbol: Symbol) {
        eprintln!("shift  {} -> state {state}", self.name(symbol));
    }

    fn reduce(&mut self, production: ProductionId, lhs: Symbol, children: usize) {
        eprintln!(
            "reduce p{production} -> {} ({children} children)",
            self.name(lhs)
        );
    }

    fn missing(&mut self, symbol: Symbol) {
        eprintln!("insert MISSING {}", self.name(symbol));
    }

    fn skipped(&mut self, symbol: Symbol, span: Span) {
        eprintln!(
            "skip   {} @ {}..{}",
            self.name(symbol),
            span.start,
            span.end
        );
    }

    fn accept(&mut self) {
        eprintln!("accept");
    }
}
