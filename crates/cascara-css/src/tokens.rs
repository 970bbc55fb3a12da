//! The CSS token registry and its lexer DFA.
//!
//! Terminal ids are the declaration index plus the two builtins, so the
//! constants below must stay in lockstep with [`terminals`]. The DFA is
//! hand-authored: one entry state for the default mode plus a second mode
//! whose first entry recognizes an immediate unit suffix (`10px` vs
//! `10 px`). Specific at-keywords (`@media`) and contextual words (`from`,
//! `and`, `selector`) are not DFA states; they ride on the keyword table
//! and get relabeled from `at_keyword`/`identifier` when valid.

use cascara_core::{
    CharRange, Keyword, LexMode, LexState, LexStateId, LexTable, LexTransition, Symbol,
    TerminalDecl,
};

pub(crate) const IDENTIFIER: Symbol = Symbol::from_raw(2);
pub(crate) const AT_KEYWORD: Symbol = Symbol::from_raw(3);
pub(crate) const COMMENT: Symbol = Symbol::from_raw(4);
pub(crate) const METAVARIABLE: Symbol = Symbol::from_raw(5);
pub(crate) const STRING_VALUE: Symbol = Symbol::from_raw(6);
pub(crate) const INTEGER_TOKEN: Symbol = Symbol::from_raw(7);
pub(crate) const FLOAT_TOKEN: Symbol = Symbol::from_raw(8);
pub(crate) const UNIT: Symbol = Symbol::from_raw(9);
pub(crate) const IMPORTANT: Symbol = Symbol::from_raw(10);
pub(crate) const DESCENDANT: Symbol = Symbol::from_raw(11);
pub(crate) const DOT: Symbol = Symbol::from_raw(12);
pub(crate) const COMMA: Symbol = Symbol::from_raw(13);
pub(crate) const COLON: Symbol = Symbol::from_raw(14);
pub(crate) const COLON_COLON: Symbol = Symbol::from_raw(15);
pub(crate) const SEMICOLON: Symbol = Symbol::from_raw(16);
pub(crate) const LBRACE: Symbol = Symbol::from_raw(17);
pub(crate) const RBRACE: Symbol = Symbol::from_raw(18);
pub(crate) const LPAREN: Symbol = Symbol::from_raw(19);
pub(crate) const RPAREN: Symbol = Symbol::from_raw(20);
pub(crate) const HASH: Symbol = Symbol::from_raw(21);
pub(crate) const STAR: Symbol = Symbol::from_raw(22);
pub(crate) const AMPERSAND: Symbol = Symbol::from_raw(23);
pub(crate) const GREATER: Symbol = Symbol::from_raw(24);
pub(crate) const TILDE: Symbol = Symbol::from_raw(25);
pub(crate) const PLUS: Symbol = Symbol::from_raw(26);
pub(crate) const LBRACKET: Symbol = Symbol::from_raw(27);
pub(crate) const RBRACKET: Symbol = Symbol::from_raw(28);
pub(crate) const EQUAL: Symbol = Symbol::from_raw(29);
pub(crate) const TILDE_EQUAL: Symbol = Symbol::from_raw(30);
pub(crate) const CARET_EQUAL: Symbol = Symbol::from_raw(31);
pub(crate) const PIPE_EQUAL: Symbol = Symbol::from_raw(32);
pub(crate) const STAR_EQUAL: Symbol = Symbol::from_raw(33);
pub(crate) const DOLLAR_EQUAL: Symbol = Symbol::from_raw(34);
pub(crate) const AT_IMPORT: Symbol = Symbol::from_raw(35);
pub(crate) const AT_MEDIA: Symbol = Symbol::from_raw(36);
pub(crate) const AT_CHARSET: Symbol = Symbol::from_raw(37);
pub(crate) const AT_NAMESPACE: Symbol = Symbol::from_raw(38);
pub(crate) const AT_KEYFRAMES: Symbol = Symbol::from_raw(39);
pub(crate) const AT_SUPPORTS: Symbol = Symbol::from_raw(40);
pub(crate) const KW_FROM: Symbol = Symbol::from_raw(41);
pub(crate) const KW_TO: Symbol = Symbol::from_raw(42);
pub(crate) const KW_AND: Symbol = Symbol::from_raw(43);
pub(crate) const KW_OR: Symbol = Symbol::from_raw(44);
pub(crate) const KW_NOT: Symbol = Symbol::from_raw(45);
pub(crate) const KW_ONLY: Symbol = Symbol::from_raw(46);
pub(crate) const KW_SELECTOR: Symbol = Symbol::from_raw(47);
pub(crate) const DIVIDE: Symbol = Symbol::from_raw(48);
pub(crate) const MINUS: Symbol = Symbol::from_raw(49);
pub(crate) const COLOR_VALUE: Symbol = Symbol::from_raw(50);

pub(crate) fn terminals() -> Vec<TerminalDecl> {
    let external = TerminalDecl {
        name: "_descendant_operator".to_owned(),
        named: false,
        visible: false,
        external: true,
    };
    let mut decls = vec![
        TerminalDecl::named("identifier"),
        TerminalDecl::named("at_keyword"),
        TerminalDecl::named("comment"),
        TerminalDecl::named("metavariable"),
        TerminalDecl::named("string_value"),
        TerminalDecl::anonymous("_integer_token"),
        TerminalDecl::anonymous("_float_token"),
        TerminalDecl::named("unit"),
        TerminalDecl::named("important"),
        external,
    ];
    for text in [
        ".", ",", ":", "::", ";", "{", "}", "(", ")", "#", "*", "&", ">", "~", "+", "[", "]",
        "=", "~=", "^=", "|=", "*=", "$=", "@import", "@media", "@charset", "@namespace",
        "@keyframes", "@supports", "from", "to", "and", "or", "not", "only", "selector",
        "/", "-",
    ] {
        decls.push(TerminalDecl::anonymous(text));
    }
    decls.push(TerminalDecl::named("color_value"));
    decls
}

fn edge(ranges: &[(char, char)], target: LexStateId) -> LexTransition {
    LexTransition {
        ranges: ranges.iter().map(|&(lo, hi)| CharRange::new(lo, hi)).collect(),
        target,
        skip: false,
    }
}

fn one(c: char, target: LexStateId) -> LexTransition {
    edge(&[(c, c)], target)
}

fn plain(transitions: Vec<LexTransition>) -> LexState {
    LexState {
        transitions,
        accept: None,
        eof_accept: None,
    }
}

fn accepting(symbol: Symbol, transitions: Vec<LexTransition>) -> LexState {
    LexState {
        transitions,
        accept: Some(symbol),
        eof_accept: None,
    }
}

/// A state inside an unterminated string or comment: accepts best-effort
/// when the input ends here.
fn open_ended(eof: Symbol, transitions: Vec<LexTransition>) -> LexState {
    LexState {
        transitions,
        accept: None,
        eof_accept: Some(eof),
    }
}

fn keyword(text: &str, base: Symbol, symbol: Symbol) -> Keyword {
    Keyword {
        text: text.to_owned(),
        base,
        symbol,
    }
}

pub(crate) fn lex_table() -> LexTable {
    const ENTRY: u16 = 0;
    const IDENT: u16 = 1;
    const DASH: u16 = 2;
    const AT_SIGN: u16 = 3;
    const AT_NAME: u16 = 4;
    const MU_START: u16 = 5;
    const MU_NAME: u16 = 6;
    const MU_DOT1: u16 = 7;
    const MU_DOT2: u16 = 8;
    const MU_DOTS: u16 = 9;
    const SQ_BODY: u16 = 10;
    const SQ_ESC: u16 = 11;
    const STR_CLOSE: u16 = 12;
    const DQ_BODY: u16 = 13;
    const DQ_ESC: u16 = 14;
    const SLASH: u16 = 15;
    const COMMENT_BODY: u16 = 16;
    const COMMENT_STAR: u16 = 17;
    const COMMENT_CLOSE: u16 = 18;
    const INT: u16 = 19;
    const FRAC_DOT: u16 = 20;
    const EXP_MARK: u16 = 21;
    const FRAC: u16 = 22;
    const EXP_MINUS: u16 = 23;
    const EXP: u16 = 24;
    const PLUS_ST: u16 = 25;
    const DOT_ST: u16 = 26;
    const COLON_ST: u16 = 27;
    const COLON2_ST: u16 = 28;
    const STAR_ST: u16 = 29;
    const STAR_EQ_ST: u16 = 30;
    const TILDE_ST: u16 = 31;
    const TILDE_EQ_ST: u16 = 32;
    const CARET_ST: u16 = 33;
    const CARET_EQ_ST: u16 = 34;
    const PIPE_ST: u16 = 35;
    const PIPE_EQ_ST: u16 = 36;
    const DOLLAR_ST: u16 = 37;
    const DOLLAR_EQ_ST: u16 = 38;
    const EQUAL_ST: u16 = 39;
    const BANG: u16 = 40;
    const IMPORTANT_END: u16 = 49;
    const COMMA_ST: u16 = 50;
    const SEMI_ST: u16 = 51;
    const LBRACE_ST: u16 = 52;
    const RBRACE_ST: u16 = 53;
    const LPAREN_ST: u16 = 54;
    const RPAREN_ST: u16 = 55;
    const HASH_ST: u16 = 56;
    const AMP_ST: u16 = 57;
    const GT_ST: u16 = 58;
    const LBRACKET_ST: u16 = 59;
    const RBRACKET_ST: u16 = 60;
    const UNIT_ENTRY: u16 = 61;
    const UNIT_BODY: u16 = 62;

    let ident_start = &[('a', 'z'), ('A', 'Z'), ('_', '_')];
    let ident_continue = &[('a', 'z'), ('A', 'Z'), ('0', '9'), ('_', '_'), ('-', '-')];
    let at_continue = &[('a', 'z'), ('A', 'Z'), ('_', '_'), ('-', '-')];
    let digits = &[('0', '9')];
    let unit_chars = &[('a', 'z'), ('A', 'Z'), ('%', '%')];
    let hex_digits = &[('0', '9'), ('a', 'f'), ('A', 'F')];

    let entry = plain(vec![
        LexTransition {
            skip: true,
            ..edge(
                &[
                    (' ', ' '),
                    ('\t', '\t'),
                    ('\n', '\n'),
                    ('\r', '\r'),
                    ('\u{c}', '\u{c}'),
                ],
                ENTRY,
            )
        },
        edge(ident_start, IDENT),
        one('-', DASH),
        one('@', AT_SIGN),
        one('µ', MU_START),
        one('\'', SQ_BODY),
        one('"', DQ_BODY),
        one('/', SLASH),
        edge(digits, INT),
        one('+', PLUS_ST),
        one('.', DOT_ST),
        one(':', COLON_ST),
        one('*', STAR_ST),
        one('~', TILDE_ST),
        one('^', CARET_ST),
        one('|', PIPE_ST),
        one('$', DOLLAR_ST),
        one('=', EQUAL_ST),
        one('!', BANG),
        one(',', COMMA_ST),
        one(';', SEMI_ST),
        one('{', LBRACE_ST),
        one('}', RBRACE_ST),
        one('(', LPAREN_ST),
        one(')', RPAREN_ST),
        one('#', HASH_ST),
        one('&', AMP_ST),
        one('>', GT_ST),
        one('[', LBRACKET_ST),
        one(']', RBRACKET_ST),
    ]);

    let states = vec![
        /* 0 */ entry,
        /* 1 */ accepting(IDENTIFIER, vec![edge(ident_continue, IDENT)]),
        // `-` may open an identifier (`-webkit-`, `--var`) or a signed
        // number; on its own it is the subtraction operator.
        /* 2 */
        accepting(
            MINUS,
            vec![
                edge(&[('a', 'z'), ('A', 'Z'), ('_', '_'), ('-', '-')], IDENT),
                edge(digits, INT),
            ],
        ),
        /* 3 */ plain(vec![edge(at_continue, AT_NAME)]),
        /* 4 */ accepting(AT_KEYWORD, vec![edge(at_continue, AT_NAME)]),
        // `µname`, `µ_`, or the spread form `µ...`.
        /* 5 */
        plain(vec![edge(ident_start, MU_NAME), one('.', MU_DOT1)]),
        /* 6 */
        accepting(
            METAVARIABLE,
            vec![edge(&[('a', 'z'), ('A', 'Z'), ('0', '9'), ('_', '_')], MU_NAME)],
        ),
        /* 7 */ plain(vec![one('.', MU_DOT2)]),
        /* 8 */ plain(vec![one('.', MU_DOTS)]),
        /* 9 */ accepting(METAVARIABLE, vec![]),
        // Single-quoted string: no raw newline, backslash escapes anything.
        /* 10 */
        open_ended(
            STRING_VALUE,
            vec![
                one('\'', STR_CLOSE),
                one('\\', SQ_ESC),
                edge(
                    &[
                        ('\u{0}', '\t'),
                        ('\u{b}', '&'),
                        ('(', '['),
                        (']', '\u{10ffff}'),
                    ],
                    SQ_BODY,
                ),
            ],
        ),
        /* 11 */ open_ended(STRING_VALUE, vec![edge(&[('\u{0}', '\u{10ffff}')], SQ_BODY)]),
        /* 12 */ accepting(STRING_VALUE, vec![]),
        /* 13 */
        open_ended(
            STRING_VALUE,
            vec![
                one('"', STR_CLOSE),
                one('\\', DQ_ESC),
                edge(
                    &[
                        ('\u{0}', '\t'),
                        ('\u{b}', '!'),
                        ('#', '['),
                        (']', '\u{10ffff}'),
                    ],
                    DQ_BODY,
                ),
            ],
        ),
        /* 14 */ open_ended(STRING_VALUE, vec![edge(&[('\u{0}', '\u{10ffff}')], DQ_BODY)]),
        // `/` is the division operator unless `*` follows and a comment
        // outruns it.
        /* 15 */ accepting(DIVIDE, vec![one('*', COMMENT_BODY)]),
        /* 16 */
        open_ended(
            COMMENT,
            vec![
                one('*', COMMENT_STAR),
                edge(&[('\u{0}', ')'), ('+', '\u{10ffff}')], COMMENT_BODY),
            ],
        ),
        /* 17 */
        open_ended(
            COMMENT,
            vec![
                one('/', COMMENT_CLOSE),
                one('*', COMMENT_STAR),
                edge(&[('\u{0}', ')'), ('+', '.'), ('0', '\u{10ffff}')], COMMENT_BODY),
            ],
        ),
        /* 18 */ accepting(COMMENT, vec![]),
        // Digits, then an optional fraction and exponent.
        /* 19 */
        accepting(
            INTEGER_TOKEN,
            vec![
                edge(digits, INT),
                one('.', FRAC_DOT),
                edge(&[('e', 'e'), ('E', 'E')], EXP_MARK),
            ],
        ),
        /* 20 */ plain(vec![edge(digits, FRAC)]),
        /* 21 */ plain(vec![edge(digits, EXP), one('-', EXP_MINUS)]),
        /* 22 */
        accepting(
            FLOAT_TOKEN,
            vec![edge(digits, FRAC), edge(&[('e', 'e'), ('E', 'E')], EXP_MARK)],
        ),
        /* 23 */ plain(vec![edge(digits, EXP)]),
        /* 24 */ accepting(FLOAT_TOKEN, vec![edge(digits, EXP)]),
        // `+` is the adjacent-sibling combinator until digits follow.
        /* 25 */
        accepting(PLUS, vec![edge(digits, INT), one('.', FRAC_DOT)]),
        // `.` is the class-selector dot until digits follow (`.5em`).
        /* 26 */
        accepting(DOT, vec![edge(digits, FRAC)]),
        /* 27 */ accepting(COLON, vec![one(':', COLON2_ST)]),
        /* 28 */ accepting(COLON_COLON, vec![]),
        /* 29 */ accepting(STAR, vec![one('=', STAR_EQ_ST)]),
        /* 30 */ accepting(STAR_EQUAL, vec![]),
        /* 31 */ accepting(TILDE, vec![one('=', TILDE_EQ_ST)]),
        /* 32 */ accepting(TILDE_EQUAL, vec![]),
        /* 33 */ plain(vec![one('=', CARET_EQ_ST)]),
        /* 34 */ accepting(CARET_EQUAL, vec![]),
        /* 35 */ plain(vec![one('=', PIPE_EQ_ST)]),
        /* 36 */ accepting(PIPE_EQUAL, vec![]),
        /* 37 */ plain(vec![one('=', DOLLAR_EQ_ST)]),
        /* 38 */ accepting(DOLLAR_EQUAL, vec![]),
        /* 39 */ accepting(EQUAL, vec![]),
        // The `!important` literal, one character per state.
        /* 40 */ plain(vec![one('i', 41)]),
        /* 41 */ plain(vec![one('m', 42)]),
        /* 42 */ plain(vec![one('p', 43)]),
        /* 43 */ plain(vec![one('o', 44)]),
        /* 44 */ plain(vec![one('r', 45)]),
        /* 45 */ plain(vec![one('t', 46)]),
        /* 46 */ plain(vec![one('a', 47)]),
        /* 47 */ plain(vec![one('n', 48)]),
        /* 48 */ plain(vec![one('t', IMPORTANT_END)]),
        /* 49 */ accepting(IMPORTANT, vec![]),
        /* 50 */ accepting(COMMA, vec![]),
        /* 51 */ accepting(SEMICOLON, vec![]),
        /* 52 */ accepting(LBRACE, vec![]),
        /* 53 */ accepting(RBRACE, vec![]),
        /* 54 */ accepting(LPAREN, vec![]),
        /* 55 */ accepting(RPAREN, vec![]),
        /* 56 */ accepting(HASH, vec![edge(hex_digits, 63)]),
        /* 57 */ accepting(AMPERSAND, vec![]),
        /* 58 */ accepting(GREATER, vec![]),
        /* 59 */ accepting(LBRACKET, vec![]),
        /* 60 */ accepting(RBRACKET, vec![]),
        // Unit suffixes must touch the number; no skip edges here.
        /* 61 */ plain(vec![edge(unit_chars, UNIT_BODY)]),
        /* 62 */ accepting(UNIT, vec![edge(unit_chars, UNIT_BODY)]),
        // Hex colors: three to eight digits immediately after the `#`.
        // Shorter runs rewind to the plain `#` accept above.
        /* 63 */ plain(vec![edge(hex_digits, 64)]),
        /* 64 */ plain(vec![edge(hex_digits, 65)]),
        /* 65 */ accepting(COLOR_VALUE, vec![edge(hex_digits, 66)]),
        /* 66 */ accepting(COLOR_VALUE, vec![edge(hex_digits, 67)]),
        /* 67 */ accepting(COLOR_VALUE, vec![edge(hex_digits, 68)]),
        /* 68 */ accepting(COLOR_VALUE, vec![edge(hex_digits, 69)]),
        /* 69 */ accepting(COLOR_VALUE, vec![edge(hex_digits, 70)]),
        /* 70 */ accepting(COLOR_VALUE, vec![]),
    ];

    LexTable {
        states,
        modes: vec![
            LexMode { entries: vec![ENTRY] },
            LexMode {
                entries: vec![UNIT_ENTRY, ENTRY],
            },
        ],
        mode_select: vec![(UNIT, 1)],
        keywords: vec![
            keyword("@import", AT_KEYWORD, AT_IMPORT),
            keyword("@media", AT_KEYWORD, AT_MEDIA),
            keyword("@charset", AT_KEYWORD, AT_CHARSET),
            keyword("@namespace", AT_KEYWORD, AT_NAMESPACE),
            keyword("@keyframes", AT_KEYWORD, AT_KEYFRAMES),
            keyword("@supports", AT_KEYWORD, AT_SUPPORTS),
            keyword("from", IDENTIFIER, KW_FROM),
            keyword("to", IDENTIFIER, KW_TO),
            keyword("and", IDENTIFIER, KW_AND),
            keyword("or", IDENTIFIER, KW_OR),
            keyword("not", IDENTIFIER, KW_NOT),
            keyword("only", IDENTIFIER, KW_ONLY),
            keyword("selector", IDENTIFIER, KW_SELECTOR),
        ],
    }
}
