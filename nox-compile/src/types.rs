use std::fmt;

use serde::{Deserialize, Serialize};

/// A compiled nox document.
///
/// Holds the ordered sequence of top-level nodes. Normally exactly one root
/// element, but bare top-level properties are legal and render as standalone
/// tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub nodes: Vec<Node>,
}

/// A child of an element (or of the document root): structural or scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Node {
    Element(Element),
    Property(Property),
}

/// A structural node: a UI widget or grouping construct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    /// Insertion order preserved; the emitter reproduces attribute order
    /// verbatim, so this is a Vec rather than a map.
    pub attrs: Vec<(String, String)>,
    /// Interleaving of child elements and properties is preserved.
    pub children: Vec<Node>,
}

/// A scalar key/value assignment attached to an element.
///
/// Properties never have children; the parser rejects indented content
/// following a property line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: Value,
}

/// Classified inline value of a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Value {
    /// `&name;`, a fixed runtime literal, passed through unevaluated.
    Entity { name: String },
    /// Numeric literal; source text is kept verbatim.
    Number { text: String },
    /// Bare text with `\.` escapes already decoded.
    StringLiteral { text: String },
    /// Arithmetic chain compiled to the target's accumulator sequence.
    Expression { expr: Expr },
}

/// An expression as a left-to-right accumulator chain.
///
/// `first` seeds the accumulator; each `(operator, operand)` pair then applies
/// in source order. There is no precedence grouping; the target runtime
/// evaluates its operation tags exactly this way, so source order is the
/// semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub first: Operand,
    pub rest: Vec<(Operator, Operand)>,
}

/// A single expression operand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Operand {
    /// Numeric literal, text kept verbatim.
    Literal { text: String },
    /// `src().trait`, a runtime trait lookup, resolved by the engine at
    /// render time, never by this compiler.
    Trait { src: TraitSource, name: String },
}

/// The object a trait access reads from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TraitSource {
    /// `me()`: the element the property belongs to.
    Own,
    /// `parent()`: the containing element.
    Container,
    /// `name()`: another element referenced by name.
    Named { name: String },
}

impl TraitSource {
    /// The call form used in both source and output, e.g. `parent()`.
    pub fn call(&self) -> String {
        match self {
            TraitSource::Own => "me()".to_string(),
            TraitSource::Container => "parent()".to_string(),
            TraitSource::Named { name } => format!("{name}()"),
        }
    }
}

/// Arithmetic operator between the accumulator and the next operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Add,
    Sub,
    Mult,
    Div,
}

impl Operator {
    /// Output tag name for this operation.
    pub fn tag(self) -> &'static str {
        match self {
            Operator::Add => "add",
            Operator::Sub => "sub",
            Operator::Mult => "mult",
            Operator::Div => "div",
        }
    }

    /// The source symbol this operator was read from.
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mult => '*',
            Operator::Div => '/',
        }
    }
}

/// 1-based source position, reported with every error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

impl Pos {
    pub fn new(line: usize, column: usize) -> Self {
        Pos { line, column }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}
