use crate::lexer::Spanned;

/// Concrete parse tree: what was written, before any folding into nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct CstFile {
    pub banner: Option<String>,
    pub statements: Vec<Statement>,
}

/// Something that can appear in value position or inside a list.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Leaf(Spanned),
    List {
        count: Option<Spanned>,
        items: Vec<Item>,
    },
    Dimensions(Vec<Spanned>),
    Dict(DictBlock),
    /// `key=value` argument of a function-object call.
    KeyValue {
        key: Spanned,
        value: Box<Item>,
    },
}

/// `head... { body }`; an empty head is an anonymous dict.
#[derive(Debug, Clone, PartialEq)]
pub struct DictBlock {
    pub head: Vec<Item>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `key item item ... ;`
    Assign { key: Spanned, items: Vec<Item> },
    Dict(DictBlock),
    /// `key [#directive] #{ ... #};`
    Code {
        key: Spanned,
        directive: Option<Spanned>,
        code: Spanned,
    },
    /// Bare `$macro` line.
    Macro(Spanned),
    /// A list with no key, as in `polyMesh/points`.
    IsolatedList(Item),
    /// `#include "file"` and other line directives.
    Directive { directive: Spanned, content: String },
    /// `#includeFunc name ( args )` spanning several lines.
    Call {
        directive: Spanned,
        name: Spanned,
        args: Vec<Vec<Item>>,
    },
    /// `#remove` followed by a list.
    Remove { directive: Spanned, list: Item },
    Conditional {
        directive: Spanned,
        condition: String,
        then_body: Vec<Statement>,
        else_body: Option<Vec<Statement>>,
    },
}
