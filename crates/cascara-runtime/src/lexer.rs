//! The DFA driver.
//!
//! Maximal munch with context filtering: while edges match we keep
//! advancing and remember the latest accept whose token the requesting
//! parse state can actually consume, then rewind to it. Accepts outside
//! the valid set are kept as a fallback so an out-of-place token still
//! reaches the parser (recovery deals with it) instead of degrading into
//! per-character error leaves. Keyword reinterpretation runs on the final
//! lexeme.

use cascara_core::{LexModeId, LexTable, ScanCursor, Symbol, SymbolSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Token {
    pub symbol: Symbol,
    pub start: usize,
    pub end: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Lexed {
    Token(Token),
    /// Input exhausted (possibly after trailing whitespace).
    Eof,
    /// No token starts at `start`; one code point should be consumed as an
    /// error leaf.
    Stuck { start: usize },
}

pub(crate) struct Lexer<'s, 'l> {
    src: &'s str,
    table: &'l LexTable,
    pos: usize,
    mark: usize,
}

impl<'s, 'l> Lexer<'s, 'l> {
    pub fn new(src: &'s str, table: &'l LexTable) -> Self {
        Lexer {
            src,
            table,
            pos: 0,
            mark: 0,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn mark(&self) -> usize {
        self.mark
    }

    pub fn set_mark(&mut self, mark: usize) {
        self.mark = mark;
    }

    pub fn len(&self) -> usize {
        self.src.len()
    }

    /// Consume one code point starting at `start` as an error leaf.
    pub fn error_advance(&mut self, start: usize) -> (usize, usize) {
        let width = self.src[start..]
            .chars()
            .next()
            .map_or(0, |c| c.len_utf8());
        self.pos = start + width;
        (start, self.pos)
    }

    pub fn next_token(&mut self, mode: LexModeId, valid: &SymbolSet) -> Lexed {
        let origin = self.pos;
        let live_bases = self.table.live_keyword_bases(valid);
        let entries = self.table.modes[mode as usize].entries.clone();
        let mut stuck_at = origin;

        for entry in entries {
            self.pos = origin;
            let mut token_start = origin;
            let mut state = entry;
            let mut best: Option<(Symbol, usize)> = None;
            let mut fallback: Option<(Symbol, usize)> = None;
            let mut hit_eof = false;

            loop {
                let Some(c) = self.src[self.pos..].chars().next() else {
                    if let Some(symbol) = self.table.states[state as usize].eof_accept {
                        fallback = Some((symbol, self.pos));
                        if valid.contains(symbol) || live_bases.contains(&symbol) {
                            best = Some((symbol, self.pos));
                        }
                    }
                    hit_eof = true;
                    break;
                };
                let Some((target, skip)) = self.table.states[state as usize].step(c) else {
                    break;
                };
                self.pos += c.len_utf8();
                if skip {
                    token_start = self.pos;
                }
                state = target;
                if let Some(symbol) = self.table.states[state as usize].accept {
                    fallback = Some((symbol, self.pos));
                    if valid.contains(symbol) || live_bases.contains(&symbol) {
                        best = Some((symbol, self.pos));
                    }
                }
            }

            if let Some((mut symbol, end)) = best.or(fallback) {
                let lexeme = &self.src[token_start..end];
                for kw in &self.table.keywords {
                    if kw.base == symbol && kw.text == lexeme && valid.contains(kw.symbol) {
                        symbol = kw.symbol;
                        break;
                    }
                }
                self.pos = end;
                return Lexed::Token(Token {
                    symbol,
                    start: token_start,
                    end,
                });
            }
            if hit_eof && token_start == self.pos {
                self.pos = self.src.len();
                return Lexed::Eof;
            }
            stuck_at = token_start;
        }

        self.pos = origin;
        Lexed::Stuck { start: stuck_at }
    }
}

impl ScanCursor for Lexer<'_, '_> {
    fn lookahead(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.src[self.pos..].chars().next() {
            self.pos += c.len_utf8();
        }
    }

    fn mark_end(&mut self) {
        self.mark = self.pos;
    }
}
