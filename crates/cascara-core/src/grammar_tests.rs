use crate::grammar::*;

fn sample() -> Grammar {
    Grammar {
        name: "toy".to_owned(),
        rules: vec![
            (
                "doc".to_owned(),
                repeat(field("item", rule_ref("pair"))),
            ),
            (
                "pair".to_owned(),
                seq(vec![
                    field("key", alias(term("word"), "key_name", true)),
                    term("="),
                    field("value", term("word")),
                ]),
            ),
        ],
        extras: vec!["comment".to_owned()],
        externals: vec![],
    }
}

#[test]
fn round_trips_through_json() {
    let grammar = sample();
    let json = serde_json::to_string(&grammar).unwrap();
    let back: Grammar = serde_json::from_str(&json).unwrap();
    assert_eq!(back.name, "toy");
    assert_eq!(back.rules.len(), 2);
    assert_eq!(back.extras, vec!["comment".to_owned()]);
    assert_eq!(back.rules[1].1, grammar.rules[1].1);
}

#[test]
fn optional_extras_default_when_absent() {
    let grammar: Grammar = serde_json::from_str(
        r#"{ "name": "tiny", "rules": [["doc", { "Terminal": "word" }]] }"#,
    )
    .unwrap();
    assert!(grammar.extras.is_empty());
    assert!(grammar.externals.is_empty());
    assert_eq!(grammar.rules[0].1, term("word"));
}

#[test]
fn combinators_build_the_expected_shapes() {
    let rule = prec_left(2, seq(vec![rule_ref("e"), term("+"), rule_ref("e")]));
    let Rule::Prec {
        value,
        assoc,
        content,
    } = rule
    else {
        panic!("expected a precedence wrapper");
    };
    assert_eq!(value, 2);
    assert_eq!(assoc, Assoc::Left);
    assert!(matches!(*content, Rule::Seq(ref items) if items.len() == 3));
}
