//! Owned syntax trees.
//!
//! A `Tree` holds the root node, a copy of the source text, and the trivia
//! spans (skipped whitespace and flattened zero-visibility tokens). Node
//! spans plus trivia spans tile the input exactly, even for malformed input.

use cascara_core::{FieldId, Language, Symbol};

/// Byte range into the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Span {
        Span {
            start: start as u32,
            end: end as u32,
        }
    }

    pub fn empty(at: usize) -> Span {
        Span::new(at, at)
    }

    pub fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }

    pub fn merge(&self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) symbol: Symbol,
    /// Context alias; when set, the node reports this kind instead.
    pub(crate) alias: Option<Symbol>,
    pub(crate) field: Option<FieldId>,
    pub(crate) span: Span,
    pub(crate) missing: bool,
    pub(crate) extra: bool,
    pub(crate) children: Vec<Node>,
}

impl Node {
    pub(crate) fn leaf(symbol: Symbol, span: Span) -> Node {
        Node {
            symbol,
            alias: None,
            field: None,
            span,
            missing: false,
            extra: false,
            children: Vec::new(),
        }
    }

    pub(crate) fn missing_leaf(symbol: Symbol, at: usize) -> Node {
        Node {
            missing: true,
            ..Node::leaf(symbol, Span::empty(at))
        }
    }

    pub(crate) fn error(children: Vec<Node>, fallback_at: usize) -> Node {
        let span = children
            .iter()
            .map(|c| c.span)
            .reduce(|a, b| a.merge(b))
            .unwrap_or_else(|| Span::empty(fallback_at));
        Node {
            symbol: Symbol::ERROR,
            alias: None,
            field: None,
            span,
            missing: false,
            extra: false,
            children,
        }
    }

    pub(crate) fn interior(symbol: Symbol, children: Vec<Node>, fallback_at: usize) -> Node {
        let span = children
            .iter()
            .map(|c| c.span)
            .reduce(|a, b| a.merge(b))
            .unwrap_or_else(|| Span::empty(fallback_at));
        Node {
            symbol,
            alias: None,
            field: None,
            span,
            missing: false,
            extra: false,
            children,
        }
    }

    /// Extras and ERROR containers sit on the parse stack without
    /// participating in any production.
    pub(crate) fn is_transparent(&self) -> bool {
        self.extra || self.symbol == Symbol::ERROR
    }

    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    /// The kind symbol the node presents as (alias-aware).
    pub fn effective_symbol(&self) -> Symbol {
        self.alias.unwrap_or(self.symbol)
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn field_id(&self) -> Option<FieldId> {
        self.field
    }

    pub fn is_missing(&self) -> bool {
        self.missing
    }

    pub fn is_extra(&self) -> bool {
        self.extra
    }

    pub fn is_error(&self) -> bool {
        self.symbol == Symbol::ERROR
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

pub struct Tree<'l> {
    language: &'l Language,
    source: String,
    root: Node,
    trivia: Vec<Span>,
}

impl<'l> Tree<'l> {
    pub(crate) fn new(
        language: &'l Language,
        source: String,
        root: Node,
        trivia: Vec<Span>,
    ) -> Tree<'l> {
        Tree {
            language,
            source,
            root,
            trivia,
        }
    }

    pub fn language(&self) -> &'l Language {
        self.language
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> NodeRef<'_, 'l> {
        NodeRef {
            tree: self,
            node: &self.root,
        }
    }

    /// Skipped whitespace and flattened invisible tokens, in source order.
    pub fn trivia(&self) -> &[Span] {
        &self.trivia
    }

    pub fn has_error(&self) -> bool {
        fn walk(node: &Node) -> bool {
            node.is_error() || node.is_missing() || node.children.iter().any(walk)
        }
        walk(&self.root)
    }

    pub fn sexp(&self) -> String {
        self.root().sexp()
    }
}

/// A node bound to its tree, for name and text resolution.
#[derive(Clone, Copy)]
pub struct NodeRef<'a, 'l> {
    tree: &'a Tree<'l>,
    node: &'a Node,
}

impl<'a, 'l> NodeRef<'a, 'l> {
    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn kind(&self) -> &'a str {
        self.tree.language.symbols.name(self.node.effective_symbol())
    }

    pub fn span(&self) -> Span {
        self.node.span
    }

    pub fn text(&self) -> &'a str {
        &self.tree.source[self.node.span.range()]
    }

    pub fn is_named(&self) -> bool {
        self.node.is_error()
            || self
                .tree
                .language
                .symbols
                .is_named(self.node.effective_symbol())
    }

    pub fn is_missing(&self) -> bool {
        self.node.missing
    }

    pub fn is_extra(&self) -> bool {
        self.node.extra
    }

    pub fn is_error(&self) -> bool {
        self.node.is_error()
    }

    pub fn field_name(&self) -> Option<&'a str> {
        self.node
            .field
            .map(|id| self.tree.language.fields.name(id))
    }

    pub fn child_count(&self) -> usize {
        self.node.children.len()
    }

    pub fn child(&self, i: usize) -> Option<NodeRef<'a, 'l>> {
        self.node.children.get(i).map(|node| NodeRef {
            tree: self.tree,
            node,
        })
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a, 'l>> + '_ {
        let tree = self.tree;
        self.node
            .children
            .iter()
            .map(move |node| NodeRef { tree, node })
    }

    pub fn named_children(&self) -> Vec<NodeRef<'a, 'l>> {
        self.children().filter(|c| c.is_named()).collect()
    }

    pub fn child_by_field(&self, name: &str) -> Option<NodeRef<'a, 'l>> {
        let id = self.tree.language.field_id(name)?;
        self.children().find(|c| c.node.field == Some(id))
    }

    pub fn children_by_field(&self, name: &str) -> Vec<NodeRef<'a, 'l>> {
        match self.tree.language.field_id(name) {
            Some(id) => self
                .children()
                .filter(|c| c.node.field == Some(id))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Named-node s-expression with field prefixes, tree-sitter style.
    pub fn sexp(&self) -> String {
        let mut out = String::new();
        self.write_sexp(&mut out);
        out
    }

    fn write_sexp(&self, out: &mut String) {
        if self.node.missing {
            out.push_str("(MISSING ");
            let symbols = &self.tree.language.symbols;
            let kind = symbols.name(self.node.effective_symbol());
            if symbols.is_named(self.node.effective_symbol()) {
                out.push_str(kind);
            } else {
                out.push('"');
                out.push_str(kind);
                out.push('"');
            }
            out.push(')');
            return;
        }
        out.push('(');
        out.push_str(self.kind());
        for child in self.children() {
            if !(child.is_named() || child.is_missing()) {
                continue;
            }
            out.push(' ');
            if let Some(field) = child.field_name() {
                out.push_str(field);
                out.push_str(": ");
            }
            child.write_sexp(out);
        }
        out.push(')');
    }
}
