use cascara_core::{
    CharRange, Keyword, LexMode, LexState, LexTable, LexTransition, Symbol, SymbolSet,
};

use crate::lexer::{Lexed, Lexer, Token};

const WORD: Symbol = Symbol::from_raw(2);
const NUM: Symbol = Symbol::from_raw(3);
const EQ: Symbol = Symbol::from_raw(4);
const EQEQ: Symbol = Symbol::from_raw(5);
const COMMENT: Symbol = Symbol::from_raw(6);
const IF: Symbol = Symbol::from_raw(7);

fn tr(ranges: &[(char, char)], target: u16) -> LexTransition {
    LexTransition {
        ranges: ranges.iter().map(|&(lo, hi)| CharRange::new(lo, hi)).collect(),
        target,
        skip: false,
    }
}

fn skip_tr(ranges: &[(char, char)], target: u16) -> LexTransition {
    LexTransition {
        skip: true,
        ..tr(ranges, target)
    }
}

fn accept(symbol: Symbol, transitions: Vec<LexTransition>) -> LexState {
    LexState {
        transitions,
        accept: Some(symbol),
        eof_accept: None,
    }
}

fn table() -> LexTable {
    let entry = LexState {
        transitions: vec![
            skip_tr(&[(' ', ' '), ('\t', '\t'), ('\n', '\n')], 0),
            tr(&[('a', 'z')], 1),
            tr(&[('0', '9')], 2),
            tr(&[('=', '=')], 3),
            tr(&[('#', '#')], 5),
        ],
        accept: None,
        eof_accept: None,
    };
    LexTable {
        states: vec![
            entry,
            accept(WORD, vec![tr(&[('a', 'z')], 1)]),
            accept(NUM, vec![tr(&[('0', '9')], 2)]),
            accept(EQ, vec![tr(&[('=', '=')], 4)]),
            accept(EQEQ, vec![]),
            accept(
                COMMENT,
                vec![tr(&[('\u{0}', '\t'), ('\u{b}', '\u{10ffff}')], 5)],
            ),
        ],
        modes: vec![LexMode { entries: vec![0] }],
        mode_select: vec![],
        keywords: vec![Keyword {
            text: "if".to_owned(),
            base: WORD,
            symbol: IF,
        }],
    }
}

fn valid(symbols: &[Symbol]) -> SymbolSet {
    symbols.iter().copied().collect()
}

fn lex_all(src: &str, valid: &SymbolSet) -> Vec<Token> {
    let table = table();
    let mut lexer = Lexer::new(src, &table);
    let mut out = Vec::new();
    loop {
        match lexer.next_token(0, valid) {
            Lexed::Token(t) => out.push(t),
            Lexed::Eof => return out,
            Lexed::Stuck { .. } => panic!("unexpected dead end"),
        }
    }
}

#[test]
fn longest_token_wins() {
    let v = valid(&[WORD, EQ, EQEQ]);
    let tokens = lex_all("a == b", &v);
    assert_eq!(
        tokens,
        vec![
            Token { symbol: WORD, start: 0, end: 1 },
            Token { symbol: EQEQ, start: 2, end: 4 },
            Token { symbol: WORD, start: 5, end: 6 },
        ]
    );
}

#[test]
fn valid_set_trims_the_munch() {
    // `==` exists but is not consumable; the shorter `=` is.
    let v = valid(&[EQ]);
    let tokens = lex_all("==", &v);
    assert_eq!(
        tokens,
        vec![
            Token { symbol: EQ, start: 0, end: 1 },
            Token { symbol: EQ, start: 1, end: 2 },
        ]
    );
}

#[test]
fn invalid_tokens_still_surface_for_recovery() {
    let v = valid(&[WORD]);
    let tokens = lex_all("=", &v);
    assert_eq!(tokens, vec![Token { symbol: EQ, start: 0, end: 1 }]);
}

#[test]
fn keywords_reinterpret_by_lexeme_and_validity() {
    let v = valid(&[WORD, IF]);
    assert_eq!(lex_all("if", &v)[0].symbol, IF);
    assert_eq!(lex_all("iffy", &v)[0].symbol, WORD);

    // Keyword invalid in this state: the base token stands.
    let v = valid(&[WORD]);
    assert_eq!(lex_all("if", &v)[0].symbol, WORD);

    // Base invalid but keyword valid: the word must still lex so the
    // keyword can be discovered.
    let v = valid(&[IF]);
    assert_eq!(lex_all("if", &v)[0].symbol, IF);
}

#[test]
fn whitespace_only_input_reaches_eof() {
    let v = valid(&[WORD]);
    assert!(lex_all("   \n\t ", &v).is_empty());
}

#[test]
fn dead_end_reports_the_offending_position() {
    let table = table();
    let v = valid(&[WORD]);
    let mut lexer = Lexer::new("  !x", &table);
    match lexer.next_token(0, &v) {
        Lexed::Stuck { start } => assert_eq!(start, 2),
        other => panic!("expected a dead end, got {other:?}"),
    }
    let (s, e) = lexer.error_advance(2);
    assert_eq!((s, e), (2, 3));
    match lexer.next_token(0, &v) {
        Lexed::Token(t) => assert_eq!((t.symbol, t.start, t.end), (WORD, 3, 4)),
        other => panic!("expected a token, got {other:?}"),
    }
}

#[test]
fn comments_lex_to_end_of_line() {
    let v = valid(&[WORD, COMMENT]);
    let tokens = lex_all("a # trailing note", &v);
    assert_eq!(tokens[0].symbol, WORD);
    assert_eq!(tokens[1].symbol, COMMENT);
    assert_eq!(tokens[1].end, 17);
}
