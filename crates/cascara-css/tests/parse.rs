use cascara_css::parse;
use indoc::indoc;
use insta::assert_snapshot;

fn sexp(source: &str) -> String {
    let tree = parse(source).expect("language is compatible");
    assert!(!tree.has_error(), "unexpected errors in {source:?}");
    tree.sexp()
}

#[test]
fn rule_set_with_one_declaration() {
    assert_snapshot!(
        sexp("a { color: red; }"),
        @"(stylesheet items: (rule_set selectors: (selectors selectors: (tag_name)) body: (block item: (declaration name: (property_name) values: (plain_value)))))"
    );
}

#[test]
fn final_declaration_may_omit_the_semicolon() {
    assert_snapshot!(
        sexp("a { color: red }"),
        @"(stylesheet items: (rule_set selectors: (selectors selectors: (tag_name)) body: (block declaration: (declaration name: (property_name) values: (plain_value)))))"
    );
}

#[test]
fn numeric_values_and_units() {
    assert_snapshot!(
        sexp("a { margin: 0 auto; padding: 1.5em 2em; }"),
        @"(stylesheet items: (rule_set selectors: (selectors selectors: (tag_name)) body: (block item: (declaration name: (property_name) values: (integer_value) values: (plain_value)) item: (declaration name: (property_name) values: (float_value (unit)) values: (integer_value (unit))))))"
    );
}

#[test]
fn important_declarations() {
    assert_snapshot!(
        sexp("a { color: red !important; }"),
        @"(stylesheet items: (rule_set selectors: (selectors selectors: (tag_name)) body: (block item: (declaration name: (property_name) values: (plain_value) important: (important)))))"
    );
}

#[test]
fn selector_list_fields_stay_stable_as_the_list_grows() {
    for (source, expected) in [
        ("a {}", vec!["a"]),
        ("a, b {}", vec!["a", "b"]),
        ("a, b, c, d, e {}", vec!["a", "b", "c", "d", "e"]),
    ] {
        let tree = parse(source).unwrap();
        assert!(!tree.has_error(), "{source:?}");
        let rule_set = tree.root().child(0).unwrap();
        let selectors = rule_set.child_by_field("selectors").unwrap();
        let entries = selectors.children_by_field("selectors");
        let texts: Vec<&str> = entries.iter().map(|s| s.text()).collect();
        assert_eq!(texts, expected, "{source:?}");
    }
}

#[test]
fn identifier_aliases_follow_context() {
    assert_snapshot!(
        sexp(".foo {}"),
        @"(stylesheet items: (rule_set selectors: (selectors selectors: (class_selector class: (class_name))) body: (block)))"
    );
    assert_snapshot!(
        sexp("#foo {}"),
        @"(stylesheet items: (rule_set selectors: (selectors selectors: (id_selector name: (id_name))) body: (block)))"
    );
    // The same spelling in property position reads as a property name.
    let tree = parse("a { foo: bar; }").unwrap();
    let declaration = tree
        .root()
        .child(0)
        .unwrap()
        .child_by_field("body")
        .unwrap()
        .child_by_field("item")
        .unwrap();
    let name = declaration.child_by_field("name").unwrap();
    assert_eq!(name.kind(), "property_name");
    assert_eq!(name.text(), "foo");
}

#[test]
fn compound_selectors_chain_leftward() {
    assert_snapshot!(
        sexp("a.b:hover {}"),
        @"(stylesheet items: (rule_set selectors: (selectors selectors: (pseudo_class_selector selector: (class_selector selector: (tag_name) class: (class_name)) class: (class_name))) body: (block)))"
    );
}

#[test]
fn combinator_selectors() {
    assert_snapshot!(
        sexp("a > b {}"),
        @"(stylesheet items: (rule_set selectors: (selectors selectors: (child_selector parent: (tag_name) child: (tag_name))) body: (block)))"
    );
    assert_snapshot!(
        sexp("a b {}"),
        @"(stylesheet items: (rule_set selectors: (selectors selectors: (descendant_selector ancestor: (tag_name) descendant: (tag_name))) body: (block)))"
    );
    assert_snapshot!(
        sexp("a + b {}"),
        @"(stylesheet items: (rule_set selectors: (selectors selectors: (adjacent_sibling_selector first: (tag_name) second: (tag_name))) body: (block)))"
    );
    assert_snapshot!(
        sexp("a ~ b {}"),
        @"(stylesheet items: (rule_set selectors: (selectors selectors: (sibling_selector sibling: (tag_name) primary: (tag_name))) body: (block)))"
    );
}

#[test]
fn universal_and_nesting_selectors() {
    assert_snapshot!(
        sexp("* {}"),
        @"(stylesheet items: (rule_set selectors: (selectors selectors: (universal_selector)) body: (block)))"
    );
    assert_snapshot!(
        sexp("&:hover {}"),
        @"(stylesheet items: (rule_set selectors: (selectors selectors: (pseudo_class_selector selector: (nesting_selector) class: (class_name))) body: (block)))"
    );
}

#[test]
fn pseudo_elements_and_pseudo_class_arguments() {
    assert_snapshot!(
        sexp("a::before {}"),
        @"(stylesheet items: (rule_set selectors: (selectors selectors: (pseudo_element_selector selector: (tag_name) name: (tag_name))) body: (block)))"
    );
    assert_snapshot!(
        sexp("a:not(.b) {}"),
        @"(stylesheet items: (rule_set selectors: (selectors selectors: (pseudo_class_selector selector: (tag_name) class: (class_name) arguments: (arguments arguments: (class_selector class: (class_name))))) body: (block)))"
    );
    assert_snapshot!(
        sexp("a:nth(2) {}"),
        @"(stylesheet items: (rule_set selectors: (selectors selectors: (pseudo_class_selector selector: (tag_name) class: (class_name) arguments: (arguments arguments: (integer_value)))) body: (block)))"
    );
}

#[test]
fn attribute_selectors_name_their_operator() {
    assert_snapshot!(
        sexp(r#"a[href^="https"] {}"#),
        @r#"(stylesheet items: (rule_set selectors: (selectors selectors: (attribute_selector selector: (tag_name) attribute: (attribute_name) selector_type: (starts_with_equal) value: (string_value))) body: (block)))"#
    );
    assert_snapshot!(
        sexp("a[checked] {}"),
        @"(stylesheet items: (rule_set selectors: (selectors selectors: (attribute_selector selector: (tag_name) attribute: (attribute_name))) body: (block)))"
    );
}

#[test]
fn metavariables_stand_in_for_selectors_values_and_block_items() {
    assert_snapshot!(
        sexp("µs { color: µv; }"),
        @"(stylesheet items: (rule_set selectors: (selectors selectors: (metavariable)) body: (block item: (declaration name: (property_name) values: (metavariable)))))"
    );
    assert_snapshot!(
        sexp("a { µ... }"),
        @"(stylesheet items: (rule_set selectors: (selectors selectors: (tag_name)) body: (block item: (metavariable))))"
    );
}

#[test]
fn media_statements_parse_their_query_language() {
    assert_snapshot!(
        sexp("@media screen and (min-width: 30em) { }"),
        @"(stylesheet items: (media_statement media_type: (binary_query (keyword_query) operator: (and) query: (feature_query name: (feature_name) value: (integer_value (unit)))) body: (block)))"
    );
    assert_snapshot!(
        sexp("@media only screen { }"),
        @"(stylesheet items: (media_statement media_type: (unary_query operator: (only) query: (keyword_query)) body: (block)))"
    );
}

#[test]
fn import_charset_and_namespace_statements() {
    assert_snapshot!(
        sexp(r#"@import "base.css";"#),
        @"(stylesheet items: (import_statement value: (string_value)))"
    );
    assert_snapshot!(
        sexp(r#"@import "a.css" screen, print;"#),
        @"(stylesheet items: (import_statement value: (string_value) from: (keyword_query) from: (keyword_query)))"
    );
    assert_snapshot!(
        sexp(r#"@charset "utf-8";"#),
        @"(stylesheet items: (charset_statement charset: (string_value)))"
    );
    assert_snapshot!(
        sexp(r#"@namespace svg url("http://www.w3.org/2000/svg");"#),
        @"(stylesheet items: (namespace_statement namespace: (namespace_name) value: (call_expression name: (function_name) arguments: (arguments values: (string_value)))))"
    );
}

#[test]
fn keyframes_with_offsets() {
    let source = indoc! {"
        @keyframes fade {
          from { opacity: 0 }
          to { opacity: 1 }
        }
    "};
    assert_snapshot!(
        sexp(source),
        @"(stylesheet items: (keyframes_statement name: (keyframes_name) blocks: (keyframe_block_list keyframes: (keyframe_block offset: (from) body: (block declaration: (declaration name: (property_name) values: (integer_value)))) keyframes: (keyframe_block offset: (to) body: (block declaration: (declaration name: (property_name) values: (integer_value)))))))"
    );
    assert_snapshot!(
        sexp("@keyframes grow { 0% { } }"),
        @"(stylesheet items: (keyframes_statement name: (keyframes_name) blocks: (keyframe_block_list keyframes: (keyframe_block offset: (integer_value (unit)) body: (block)))))"
    );
}

#[test]
fn supports_and_generic_at_rules() {
    assert_snapshot!(
        sexp("@supports selector(a) { }"),
        @"(stylesheet items: (supports_statement feature: (selector_query selector: (tag_name)) body: (block)))"
    );
    assert_snapshot!(
        sexp("@layer base;"),
        @"(stylesheet items: (at_rule rule: (at_keyword) query: (keyword_query)))"
    );
}

#[test]
fn rule_sets_nest() {
    let source = indoc! {"
        a {
          b {
            color: red
          }
        }
    "};
    assert_snapshot!(
        sexp(source),
        @"(stylesheet items: (rule_set selectors: (selectors selectors: (tag_name)) body: (block item: (rule_set selectors: (selectors selectors: (tag_name)) body: (block declaration: (declaration name: (property_name) values: (plain_value)))))))"
    );
}

#[test]
fn hex_colors_in_value_position() {
    assert_snapshot!(
        sexp("a { color: #fff; }"),
        @"(stylesheet items: (rule_set selectors: (selectors selectors: (tag_name)) body: (block item: (declaration name: (property_name) values: (color_value)))))"
    );
    assert_snapshot!(
        sexp("a { border: 1px solid #ff0000aa; }"),
        @"(stylesheet items: (rule_set selectors: (selectors selectors: (tag_name)) body: (block item: (declaration name: (property_name) values: (integer_value (unit)) values: (plain_value) values: (color_value)))))"
    );
    // The same spelling in selector position is still an id selector.
    assert_snapshot!(
        sexp("#fff {}"),
        @"(stylesheet items: (rule_set selectors: (selectors selectors: (id_selector name: (id_name))) body: (block)))"
    );
}

#[test]
fn slash_shorthand_and_value_arithmetic() {
    assert_snapshot!(
        sexp("a { font: 12px/1.5 serif; }"),
        @"(stylesheet items: (rule_set selectors: (selectors selectors: (tag_name)) body: (block item: (declaration name: (property_name) values: (binary_expression left: (integer_value (unit)) operator: (divide) right: (float_value)) values: (plain_value)))))"
    );
    assert_snapshot!(
        sexp("a { width: 100 - 20; }"),
        @"(stylesheet items: (rule_set selectors: (selectors selectors: (tag_name)) body: (block item: (declaration name: (property_name) values: (binary_expression left: (integer_value) operator: (minus) right: (integer_value))))))"
    );
    // Operators associate leftward.
    assert_snapshot!(
        sexp("a { z-index: 1 + 2 + 3; }"),
        @"(stylesheet items: (rule_set selectors: (selectors selectors: (tag_name)) body: (block item: (declaration name: (property_name) values: (binary_expression left: (binary_expression left: (integer_value) operator: (plus) right: (integer_value)) operator: (plus) right: (integer_value))))))"
    );
    // A signed number is one token, not a subtraction.
    let tree = parse("a { margin: 10px -5px; }").unwrap();
    assert!(!tree.has_error());
    let values = tree
        .root()
        .child(0)
        .unwrap()
        .child_by_field("body")
        .unwrap()
        .child_by_field("item")
        .unwrap()
        .children_by_field("values");
    let kinds: Vec<&str> = values.iter().map(|v| v.kind()).collect();
    assert_eq!(kinds, ["integer_value", "integer_value"]);
}

#[test]
fn call_expressions_in_value_position() {
    assert_snapshot!(
        sexp(r#"a { background: url("x.png"); }"#),
        @"(stylesheet items: (rule_set selectors: (selectors selectors: (tag_name)) body: (block item: (declaration name: (property_name) values: (call_expression name: (function_name) arguments: (arguments values: (string_value)))))))"
    );
}
