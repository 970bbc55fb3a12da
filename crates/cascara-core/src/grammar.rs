//! Grammar authoring model.
//!
//! A `Grammar` is the declarative input to the table construction pass in
//! [`crate::build`]. Rules reference terminals and other rules by name;
//! terminals themselves are declared alongside the lexer DFA.

use serde::{Deserialize, Serialize};

/// Operator associativity attached by [`Rule::Prec`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Assoc {
    #[default]
    None,
    Left,
    Right,
}

/// One node of a rule body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Rule {
    /// Epsilon.
    Blank,
    /// Terminal reference by declared name.
    Terminal(String),
    /// Reference to another rule by name.
    NonTerminal(String),
    /// Members in order.
    Seq(Vec<Rule>),
    /// First applicable alternative.
    Choice(Vec<Rule>),
    /// Zero or more.
    Repeat(Box<Rule>),
    /// One or more.
    Repeat1(Box<Rule>),
    /// Zero or one.
    Optional(Box<Rule>),
    /// Attach a field name to the content's position in the parent node.
    Field { name: String, content: Box<Rule> },
    /// Present the content under a different node kind.
    Alias {
        content: Box<Rule>,
        name: String,
        named: bool,
    },
    /// Conflict-resolution precedence for the productions below.
    Prec {
        value: i32,
        assoc: Assoc,
        content: Box<Rule>,
    },
}

/// A named grammar: rule list plus the lexical side channels.
///
/// The first rule is the start rule. Rule order is semantic: when two
/// completed productions compete for the same lookahead at equal precedence,
/// the earlier-declared production wins.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Grammar {
    pub name: String,
    /// Production rules, preserving definition order.
    pub rules: Vec<(String, Rule)>,
    /// Terminal names valid between any two tokens (comments).
    #[serde(default)]
    pub extras: Vec<String>,
    /// Terminal names recognized by the external scanner.
    #[serde(default)]
    pub externals: Vec<String>,
}

pub fn seq(rules: Vec<Rule>) -> Rule {
    Rule::Seq(rules)
}

pub fn choice(rules: Vec<Rule>) -> Rule {
    Rule::Choice(rules)
}

pub fn repeat(rule: Rule) -> Rule {
    Rule::Repeat(Box::new(rule))
}

pub fn repeat1(rule: Rule) -> Rule {
    Rule::Repeat1(Box::new(rule))
}

pub fn optional(rule: Rule) -> Rule {
    Rule::Optional(Box::new(rule))
}

pub fn field(name: &str, content: Rule) -> Rule {
    Rule::Field {
        name: name.to_owned(),
        content: Box::new(content),
    }
}

pub fn alias(content: Rule, name: &str, named: bool) -> Rule {
    Rule::Alias {
        content: Box::new(content),
        name: name.to_owned(),
        named,
    }
}

pub fn prec(value: i32, content: Rule) -> Rule {
    Rule::Prec {
        value,
        assoc: Assoc::None,
        content: Box::new(content),
    }
}

pub fn prec_left(value: i32, content: Rule) -> Rule {
    Rule::Prec {
        value,
        assoc: Assoc::Left,
        content: Box::new(content),
    }
}

pub fn prec_right(value: i32, content: Rule) -> Rule {
    Rule::Prec {
        value,
        assoc: Assoc::Right,
        content: Box::new(content),
    }
}

/// Terminal reference.
pub fn term(name: &str) -> Rule {
    Rule::Terminal(name.to_owned())
}

/// Rule reference.
pub fn rule_ref(name: &str) -> Rule {
    Rule::NonTerminal(name.to_owned())
}
