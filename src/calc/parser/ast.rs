//! Parse tree for the calculator language
//!
//! The tree is built bottom-up: every parsing routine returns the node it
//! built and its caller folds it into its own node. Nothing is mutated after
//! it has been returned. Textual forms live in [`super::ast_sexpr`].
//!
//! Malformed input still yields a tree. The degenerate pieces are
//! [`Expr::Missing`], an empty name, and a condition without an operator.

use serde::Serialize;
use std::fmt;

/// Root of a parsed program
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Statement {
    Assign { target: String, value: Expr },
    Read { target: String },
    Write { value: Expr },
    If { condition: Condition, body: Vec<Statement> },
    While { condition: Condition, body: Vec<Statement> },
}

impl Statement {
    pub fn assign(target: impl Into<String>, value: Expr) -> Self {
        Statement::Assign {
            target: target.into(),
            value,
        }
    }

    pub fn read(target: impl Into<String>) -> Self {
        Statement::Read {
            target: target.into(),
        }
    }

    pub fn write(value: Expr) -> Self {
        Statement::Write { value }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Condition {
    pub op: Option<RelOp>,
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Condition {
    pub fn new(op: RelOp, lhs: Expr, rhs: Expr) -> Self {
        Self {
            op: Some(op),
            lhs,
            rhs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expr {
    Id { name: String },
    Literal { text: String },
    /// A parenthesized expression
    Group { inner: Box<Expr> },
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Stands in for an operand that could not be parsed
    Missing,
}

impl Expr {
    pub fn id(name: impl Into<String>) -> Self {
        Expr::Id { name: name.into() }
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Expr::Literal { text: text.into() }
    }

    pub fn group(inner: Expr) -> Self {
        Expr::Group {
            inner: Box::new(inner),
        }
    }

    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RelOp {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "<>")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">=")]
    Ge,
}

impl RelOp {
    /// Map a `rule` token's lexeme to its operator. `==` is accepted as `=`.
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        match lexeme {
            "=" | "==" => Some(RelOp::Eq),
            "<>" => Some(RelOp::Ne),
            "<" => Some(RelOp::Lt),
            ">" => Some(RelOp::Gt),
            "<=" => Some(RelOp::Le),
            ">=" => Some(RelOp::Ge),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            RelOp::Eq => "=",
            RelOp::Ne => "<>",
            RelOp::Lt => "<",
            RelOp::Gt => ">",
            RelOp::Le => "<=",
            RelOp::Ge => ">=",
        }
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
