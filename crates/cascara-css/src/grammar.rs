//! The CSS grammar with `µ` metavariables.
//!
//! Metavariables are plain terminals usable wherever a selector, value,
//! query, or block item may appear. Two departures from stock CSS parsing
//! fall out of the deterministic automaton: bare declarations are block-only
//! (so `a:hover { }` at the top level is a pseudo-class selector, while
//! inside a block `a:` always opens a declaration), and the catch-all raw
//! value token is out; a bare identifier in value position is reported as
//! `plain_value` through an alias instead.

use cascara_core::grammar::{
    alias, choice, field, optional, prec, prec_left, repeat, repeat1, rule_ref, seq, term,
    Grammar, Rule,
};

fn sep1(separator: Rule, item: Rule) -> Rule {
    seq(vec![item.clone(), repeat(seq(vec![separator, item]))])
}

fn sep(separator: Rule, item: Rule) -> Rule {
    optional(sep1(separator, item))
}

/// A bare identifier presented under a context-specific kind.
fn ident_as(name: &str) -> Rule {
    alias(term("identifier"), name, true)
}

fn r(name: &str, rule: Rule) -> (String, Rule) {
    (name.to_owned(), rule)
}

pub(crate) fn rules() -> Grammar {
    Grammar {
        name: "css".to_owned(),
        rules: vec![
            r("stylesheet", repeat(field("items", rule_ref("_top_level_item")))),
            r(
                "_top_level_item",
                choice(vec![
                    rule_ref("rule_set"),
                    rule_ref("import_statement"),
                    rule_ref("media_statement"),
                    rule_ref("charset_statement"),
                    rule_ref("namespace_statement"),
                    rule_ref("keyframes_statement"),
                    rule_ref("supports_statement"),
                    rule_ref("at_rule"),
                ]),
            ),
            // Statements
            r(
                "import_statement",
                seq(vec![
                    term("@import"),
                    field("value", rule_ref("_value")),
                    sep(term(","), field("from", rule_ref("_query"))),
                    term(";"),
                ]),
            ),
            r(
                "media_statement",
                seq(vec![
                    term("@media"),
                    sep1(term(","), field("media_type", rule_ref("_query"))),
                    field("body", rule_ref("block")),
                ]),
            ),
            r(
                "charset_statement",
                seq(vec![
                    term("@charset"),
                    field("charset", rule_ref("_value")),
                    term(";"),
                ]),
            ),
            r(
                "namespace_statement",
                seq(vec![
                    term("@namespace"),
                    optional(field("namespace", ident_as("namespace_name"))),
                    field(
                        "value",
                        choice(vec![term("string_value"), rule_ref("call_expression")]),
                    ),
                    term(";"),
                ]),
            ),
            r(
                "keyframes_statement",
                seq(vec![
                    field("annotation", term("@keyframes")),
                    field("name", ident_as("keyframes_name")),
                    field("blocks", rule_ref("keyframe_block_list")),
                ]),
            ),
            r(
                "keyframe_block_list",
                seq(vec![
                    term("{"),
                    field("keyframes", repeat(rule_ref("keyframe_block"))),
                    term("}"),
                ]),
            ),
            r(
                "keyframe_block",
                seq(vec![
                    field(
                        "offset",
                        choice(vec![
                            rule_ref("from"),
                            rule_ref("to"),
                            rule_ref("integer_value"),
                        ]),
                    ),
                    field("body", rule_ref("block")),
                ]),
            ),
            r("from", term("from")),
            r("to", term("to")),
            r(
                "supports_statement",
                seq(vec![
                    term("@supports"),
                    field("feature", rule_ref("_query")),
                    field("body", rule_ref("block")),
                ]),
            ),
            r(
                "at_rule",
                seq(vec![
                    field("rule", term("at_keyword")),
                    sep(term(","), field("query", rule_ref("_query"))),
                    choice(vec![term(";"), field("body", rule_ref("block"))]),
                ]),
            ),
            // Rule sets
            r(
                "rule_set",
                seq(vec![
                    field("selectors", rule_ref("selectors")),
                    field("body", rule_ref("block")),
                ]),
            ),
            r(
                "selectors",
                sep1(term(","), field("selectors", rule_ref("_selector"))),
            ),
            r(
                "block",
                seq(vec![
                    term("{"),
                    field("item", repeat(rule_ref("_block_item"))),
                    optional(field(
                        "declaration",
                        alias(rule_ref("last_declaration"), "declaration", true),
                    )),
                    term("}"),
                ]),
            ),
            r(
                "_block_item",
                choice(vec![
                    rule_ref("declaration"),
                    rule_ref("rule_set"),
                    rule_ref("import_statement"),
                    rule_ref("media_statement"),
                    rule_ref("charset_statement"),
                    rule_ref("namespace_statement"),
                    rule_ref("keyframes_statement"),
                    rule_ref("supports_statement"),
                    rule_ref("at_rule"),
                    term("metavariable"),
                ]),
            ),
            // Selectors
            r(
                "_selector",
                choice(vec![
                    rule_ref("universal_selector"),
                    ident_as("tag_name"),
                    rule_ref("class_selector"),
                    rule_ref("nesting_selector"),
                    rule_ref("pseudo_class_selector"),
                    rule_ref("pseudo_element_selector"),
                    rule_ref("id_selector"),
                    rule_ref("attribute_selector"),
                    term("string_value"),
                    rule_ref("child_selector"),
                    rule_ref("descendant_selector"),
                    rule_ref("sibling_selector"),
                    rule_ref("adjacent_sibling_selector"),
                    term("metavariable"),
                ]),
            ),
            r("nesting_selector", term("&")),
            r("universal_selector", term("*")),
            // Binds tighter than the combinators so `a b.c` reads as
            // `a (b.c)`.
            r(
                "class_selector",
                prec(
                    1,
                    seq(vec![
                        optional(field("selector", rule_ref("_selector"))),
                        term("."),
                        field("class", ident_as("class_name")),
                    ]),
                ),
            ),
            r(
                "pseudo_class_selector",
                seq(vec![
                    optional(field("selector", rule_ref("_selector"))),
                    term(":"),
                    field("class", ident_as("class_name")),
                    optional(field(
                        "arguments",
                        alias(rule_ref("pseudo_class_arguments"), "arguments", true),
                    )),
                ]),
            ),
            r(
                "pseudo_element_selector",
                seq(vec![
                    optional(field("selector", rule_ref("_selector"))),
                    term("::"),
                    field("name", ident_as("tag_name")),
                    optional(field(
                        "arguments",
                        alias(rule_ref("pseudo_element_arguments"), "arguments", true),
                    )),
                ]),
            ),
            r(
                "id_selector",
                seq(vec![
                    optional(field("selector", rule_ref("_selector"))),
                    term("#"),
                    field("name", ident_as("id_name")),
                ]),
            ),
            r("equal", term("=")),
            r("contains_word_equal", term("~=")),
            r("starts_with_equal", term("^=")),
            r("dash_equal", term("|=")),
            r("contains_equal", term("*=")),
            r("ends_equal", term("$=")),
            r(
                "attribute_selector",
                seq(vec![
                    optional(field("selector", rule_ref("_selector"))),
                    term("["),
                    field("attribute", ident_as("attribute_name")),
                    optional(seq(vec![
                        field(
                            "selector_type",
                            choice(vec![
                                rule_ref("equal"),
                                rule_ref("contains_word_equal"),
                                rule_ref("starts_with_equal"),
                                rule_ref("dash_equal"),
                                rule_ref("contains_equal"),
                                rule_ref("ends_equal"),
                            ]),
                        ),
                        field("value", rule_ref("_value")),
                    ])),
                    term("]"),
                ]),
            ),
            r(
                "child_selector",
                prec_left(
                    0,
                    seq(vec![
                        field("parent", rule_ref("_selector")),
                        term(">"),
                        field("child", rule_ref("_selector")),
                    ]),
                ),
            ),
            r(
                "descendant_selector",
                prec_left(
                    0,
                    seq(vec![
                        field("ancestor", rule_ref("_selector")),
                        term("_descendant_operator"),
                        field("descendant", rule_ref("_selector")),
                    ]),
                ),
            ),
            r(
                "sibling_selector",
                prec_left(
                    0,
                    seq(vec![
                        field("sibling", rule_ref("_selector")),
                        term("~"),
                        field("primary", rule_ref("_selector")),
                    ]),
                ),
            ),
            r(
                "adjacent_sibling_selector",
                prec_left(
                    0,
                    seq(vec![
                        field("first", rule_ref("_selector")),
                        term("+"),
                        field("second", rule_ref("_selector")),
                    ]),
                ),
            ),
            r(
                "pseudo_class_arguments",
                seq(vec![
                    term("("),
                    sep(
                        term(","),
                        field(
                            "arguments",
                            choice(vec![rule_ref("_selector"), repeat1(rule_ref("_value"))]),
                        ),
                    ),
                    term(")"),
                ]),
            ),
            r(
                "pseudo_element_arguments",
                seq(vec![
                    term("("),
                    sep(
                        term(","),
                        field(
                            "arguments",
                            choice(vec![rule_ref("_selector"), repeat1(rule_ref("_value"))]),
                        ),
                    ),
                    term(")"),
                ]),
            ),
            // Declarations
            r(
                "declaration",
                seq(vec![
                    field("name", ident_as("property_name")),
                    term(":"),
                    field("values", rule_ref("_value")),
                    repeat(seq(vec![
                        optional(term(",")),
                        field("values", rule_ref("_value")),
                    ])),
                    optional(field("important", term("important"))),
                    term(";"),
                ]),
            ),
            // The final declaration of a block may omit its semicolon.
            r(
                "last_declaration",
                prec(
                    1,
                    seq(vec![
                        field("name", ident_as("property_name")),
                        term(":"),
                        field("values", rule_ref("_value")),
                        repeat(seq(vec![
                            optional(term(",")),
                            field("values", rule_ref("_value")),
                        ])),
                        optional(field("important", term("important"))),
                    ]),
                ),
            ),
            // Media queries
            r(
                "_query",
                choice(vec![
                    ident_as("keyword_query"),
                    rule_ref("feature_query"),
                    rule_ref("binary_query"),
                    rule_ref("unary_query"),
                    rule_ref("selector_query"),
                    rule_ref("parenthesized_query"),
                    term("metavariable"),
                ]),
            ),
            r(
                "feature_query",
                seq(vec![
                    term("("),
                    field("name", ident_as("feature_name")),
                    term(":"),
                    field("value", repeat1(rule_ref("_value"))),
                    term(")"),
                ]),
            ),
            r(
                "parenthesized_query",
                seq(vec![term("("), field("query", rule_ref("_query")), term(")")]),
            ),
            r("and", term("and")),
            r("or", term("or")),
            r(
                "binary_query",
                prec_left(
                    0,
                    seq(vec![
                        rule_ref("_query"),
                        field("operator", choice(vec![rule_ref("and"), rule_ref("or")])),
                        field("query", rule_ref("_query")),
                    ]),
                ),
            ),
            r("not", term("not")),
            r("only", term("only")),
            r(
                "unary_query",
                prec(
                    1,
                    seq(vec![
                        field("operator", choice(vec![rule_ref("not"), rule_ref("only")])),
                        field("query", rule_ref("_query")),
                    ]),
                ),
            ),
            r(
                "selector_query",
                seq(vec![
                    term("selector"),
                    term("("),
                    field("selector", rule_ref("_selector")),
                    term(")"),
                ]),
            ),
            // Property values
            r(
                "_value",
                prec(
                    -1,
                    choice(vec![
                        ident_as("plain_value"),
                        term("color_value"),
                        rule_ref("integer_value"),
                        rule_ref("float_value"),
                        term("string_value"),
                        rule_ref("binary_expression"),
                        rule_ref("parenthesized_value"),
                        rule_ref("call_expression"),
                        term("metavariable"),
                    ]),
                ),
            ),
            r(
                "parenthesized_value",
                seq(vec![term("("), field("value", rule_ref("_value")), term(")")]),
            ),
            r(
                "integer_value",
                seq(vec![term("_integer_token"), optional(term("unit"))]),
            ),
            r(
                "float_value",
                seq(vec![term("_float_token"), optional(term("unit"))]),
            ),
            r(
                "call_expression",
                seq(vec![
                    field("name", ident_as("function_name")),
                    field("arguments", rule_ref("arguments")),
                ]),
            ),
            r(
                "arguments",
                seq(vec![
                    term("("),
                    sep(
                        choice(vec![term(","), term(";")]),
                        field("values", repeat1(rule_ref("_value"))),
                    ),
                    term(")"),
                ]),
            ),
            r("plus", term("+")),
            r("minus", term("-")),
            r("times", term("*")),
            r("divide", term("/")),
            // Shorthand arithmetic, `12px/1.5` above all. Operators between
            // two values; a signed number (`-5px`) lexes as one token and
            // never reaches here.
            r(
                "binary_expression",
                prec_left(
                    0,
                    seq(vec![
                        field("left", rule_ref("_value")),
                        field(
                            "operator",
                            choice(vec![
                                rule_ref("plus"),
                                rule_ref("minus"),
                                rule_ref("times"),
                                rule_ref("divide"),
                            ]),
                        ),
                        field("right", rule_ref("_value")),
                    ]),
                ),
            ),
        ],
        extras: vec!["comment".to_owned()],
        externals: vec!["_descendant_operator".to_owned()],
    }
}
