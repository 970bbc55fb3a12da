use crate::grammar::*;
use crate::language::Language;
use crate::lex::{LexMode, LexTable, TerminalDecl};
use crate::parse::Action;
use crate::symbol::{Symbol, SymbolKind};

use super::{GrammarError, build_language};

fn empty_lex() -> LexTable {
    LexTable {
        states: Vec::new(),
        modes: vec![LexMode { entries: vec![0] }],
        mode_select: Vec::new(),
        keywords: Vec::new(),
    }
}

fn decls() -> Vec<TerminalDecl> {
    vec![
        TerminalDecl::named("word"),
        TerminalDecl::anonymous("("),
        TerminalDecl::anonymous(")"),
        TerminalDecl::anonymous("+"),
    ]
}

fn list_grammar() -> Grammar {
    Grammar {
        name: "lists".to_owned(),
        rules: vec![
            ("doc".to_owned(), repeat(field("item", rule_ref("list")))),
            (
                "list".to_owned(),
                seq(vec![
                    term("("),
                    repeat(field("x", term("word"))),
                    term(")"),
                ]),
            ),
        ],
        extras: vec![],
        externals: vec![],
    }
}

/// Token-level LR driver over raw symbols; enough to check that the
/// generated actions carry a sentence to Accept.
fn drive(language: &Language, tokens: &[Symbol]) -> bool {
    let mut stack = vec![language.parse.start_state];
    let mut i = 0;
    for _ in 0..10_000 {
        let la = tokens.get(i).copied().unwrap_or(Symbol::END);
        match language.parse.action(*stack.last().unwrap(), la) {
            Some(Action::Shift(s)) => {
                stack.push(s);
                i += 1;
            }
            Some(Action::Reduce { production, pop }) => {
                for _ in 0..pop {
                    stack.pop();
                }
                let lhs = language.parse.productions[production as usize].lhs;
                match language.parse.action(*stack.last().unwrap(), lhs) {
                    Some(Action::Shift(s)) => stack.push(s),
                    _ => return false,
                }
            }
            Some(Action::Accept) => return true,
            None => return false,
        }
    }
    false
}

#[test]
fn builds_and_accepts_a_sentence() {
    let language = build_language(&list_grammar(), &decls(), empty_lex(), None).unwrap();
    language.verify_abi().unwrap();

    let word = language.symbol_named("word").unwrap();
    let lparen = language.symbol_named("(").unwrap();
    let rparen = language.symbol_named(")").unwrap();

    assert!(drive(&language, &[lparen, word, word, rparen]));
    assert!(drive(&language, &[lparen, rparen, lparen, word, rparen]));
    assert!(drive(&language, &[]));
    assert!(!drive(&language, &[lparen, word]));
    assert!(!drive(&language, &[word]));
}

#[test]
fn repeat_helpers_are_hidden_and_fields_inherited() {
    let language = build_language(&list_grammar(), &decls(), empty_lex(), None).unwrap();
    let list = language.symbol_named("list").unwrap();
    let helper = language.symbol_named("_list_repeat1").unwrap();
    assert_eq!(language.symbols.kind(helper), SymbolKind::NonTerminal);
    assert!(!language.symbols.is_visible(helper));

    let info = language
        .parse
        .productions
        .iter()
        .find(|p| p.lhs == list)
        .unwrap();
    assert_eq!(info.arity, 3);
    let step = info.field_for(1).unwrap();
    assert_eq!(language.fields.name(step.field), "x");
    assert!(step.inherited);

    // The repeated element itself carries the field directly.
    let element = language
        .parse
        .productions
        .iter()
        .find(|p| p.lhs == helper && p.arity == 2)
        .unwrap();
    let step = element.field_for(1).unwrap();
    assert_eq!(language.fields.name(step.field), "x");
    assert!(!step.inherited);
}

#[test]
fn left_associativity_prefers_reduce() {
    let grammar = Grammar {
        name: "sums".to_owned(),
        rules: vec![(
            "expr".to_owned(),
            choice(vec![
                prec_left(1, seq(vec![rule_ref("expr"), term("+"), rule_ref("expr")])),
                term("word"),
            ]),
        )],
        extras: vec![],
        externals: vec![],
    };
    let language = build_language(&grammar, &decls(), empty_lex(), None).unwrap();
    let word = language.symbol_named("word").unwrap();
    let plus = language.symbol_named("+").unwrap();
    assert!(drive(&language, &[word, plus, word, plus, word]));

    // Somewhere a completed sum competes with shifting another `+`;
    // left associativity must pick the reduce.
    let sum_prod = language
        .parse
        .productions
        .iter()
        .position(|p| p.arity == 3)
        .unwrap() as u16;
    let saw_reduce = (0..language.parse.states.len() as u16).any(|state| {
        matches!(
            language.parse.action(state, plus),
            Some(Action::Reduce { production, .. }) if production == sum_prod
        )
    });
    assert!(saw_reduce);
}

#[test]
fn alias_to_an_existing_rule_reuses_its_symbol() {
    let grammar = Grammar {
        name: "aliased".to_owned(),
        rules: vec![
            (
                "doc".to_owned(),
                choice(vec![
                    rule_ref("pair"),
                    alias(term("word"), "pair", true),
                ]),
            ),
            (
                "pair".to_owned(),
                seq(vec![term("("), term(")")]),
            ),
        ],
        extras: vec![],
        externals: vec![],
    };
    let language = build_language(&grammar, &decls(), empty_lex(), None).unwrap();
    let pair = language.symbol_named("pair").unwrap();
    let doc = language.symbol_named("doc").unwrap();
    let aliased = language
        .parse
        .productions
        .iter()
        .find(|p| p.lhs == doc && !p.aliases.is_empty())
        .unwrap();
    assert_eq!(aliased.alias_for(0), Some(pair));
}

#[test]
fn unknown_references_are_reported() {
    let grammar = Grammar {
        name: "broken".to_owned(),
        rules: vec![("doc".to_owned(), rule_ref("ghost"))],
        extras: vec![],
        externals: vec![],
    };
    let err = build_language(&grammar, &decls(), empty_lex(), None).unwrap_err();
    assert!(matches!(err, GrammarError::UnknownReference { ref name, .. } if name == "ghost"));

    let grammar = Grammar {
        name: "dup".to_owned(),
        rules: vec![
            ("doc".to_owned(), term("word")),
            ("doc".to_owned(), term("word")),
        ],
        extras: vec![],
        externals: vec![],
    };
    assert!(matches!(
        build_language(&grammar, &decls(), empty_lex(), None),
        Err(GrammarError::DuplicateRule(_))
    ));
}

#[test]
fn sparse_and_dense_rows_agree_with_their_entries() {
    let language = build_language(&list_grammar(), &decls(), empty_lex(), None).unwrap();
    for state in 0..language.parse.states.len() as u16 {
        for (symbol, action) in language.parse.row_entries(state) {
            assert_eq!(language.parse.action(state, symbol), Some(action));
        }
    }
}
