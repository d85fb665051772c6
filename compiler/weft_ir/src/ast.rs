//! Expression tree.
//!
//! Built once by the parser and never mutated. Function bodies are held in
//! `Arc` so closures created at runtime share the tree instead of copying it.

use std::fmt;
use std::sync::Arc;

use crate::{BinaryOp, Fixity, Name, Span, UnaryOp};

/// An expression node with its source span.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    /// The empty tuple, which evaluates to "no value".
    pub fn empty(span: Span) -> Self {
        Expr::new(ExprKind::Tuple(Vec::new()), span)
    }

    /// Identifier name if this node is a bare identifier.
    pub fn as_ident(&self) -> Option<&Name> {
        match &self.kind {
            ExprKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// Render as an S-expression, for tooling and tests.
    pub fn to_sexpr(&self) -> String {
        self.to_string()
    }
}

/// Which calling convention a function literal uses.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FunctionStyle {
    /// `fun(...)` and `->`: parameters overlay the captured scope and new
    /// definitions write through to it.
    Expression,
    /// `fun{...}`: the body runs in its own local scope.
    Block,
}

impl FunctionStyle {
    pub fn has_own_context(self) -> bool {
        matches!(self, FunctionStyle::Block)
    }
}

/// A function literal. Shared by every closure created from it.
#[derive(Debug, PartialEq)]
pub struct FunctionLiteral {
    pub params: Vec<Name>,
    pub body: Expr,
    pub style: FunctionStyle,
}

/// One fragment of an interpolated string.
#[derive(Clone, Debug, PartialEq)]
pub enum InterpolationPart {
    Text(Arc<str>),
    Expr(Expr),
}

/// Definition forms usable as assignment targets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DefineKind {
    /// `def(a, ...)`: reassignable bindings.
    Value,
    /// `val(a, ...)`: constant bindings.
    Constant,
}

impl DefineKind {
    pub fn from_keyword(name: &str) -> Option<DefineKind> {
        match name {
            "def" => Some(DefineKind::Value),
            "val" => Some(DefineKind::Constant),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            DefineKind::Value => "def",
            DefineKind::Constant => "val",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Ident(Name),
    /// Numeric literal text.
    Number(Name),
    Bool(bool),
    Null,
    Str(Arc<str>),
    Interpolated(Vec<InterpolationPart>),
    /// `(a, b, ...)`; the empty tuple is the "no value" sentinel.
    Tuple(Vec<Expr>),
    Paren(Box<Expr>),
    /// `;`-separated sequence yielding its last value.
    Block(Vec<Expr>),
    If {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Option<Box<Expr>>,
    },
    While {
        cond: Box<Expr>,
        body: Box<Expr>,
    },
    Function(Arc<FunctionLiteral>),
    /// `def(a, b)` / `val(a)`; bare or as an assignment target.
    Define {
        kind: DefineKind,
        names: Vec<Name>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        fixity: Fixity,
        operand: Box<Expr>,
    },
    Member {
        target: Box<Expr>,
        name: Name,
    },
    Call {
        target: Box<Expr>,
        args: Vec<Expr>,
    },
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for item in items {
        write!(f, " {item}")?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Ident(name) | ExprKind::Number(name) => write!(f, "{name}"),
            ExprKind::Bool(b) => write!(f, "{b}"),
            ExprKind::Null => f.write_str("null"),
            ExprKind::Str(s) => write!(f, "{s:?}"),
            ExprKind::Interpolated(parts) => {
                f.write_str("(str")?;
                for part in parts {
                    match part {
                        InterpolationPart::Text(t) => write!(f, " {t:?}")?,
                        InterpolationPart::Expr(e) => write!(f, " {e}")?,
                    }
                }
                f.write_str(")")
            }
            ExprKind::Tuple(items) => {
                f.write_str("(tuple")?;
                write_list(f, items)?;
                f.write_str(")")
            }
            ExprKind::Paren(inner) => write!(f, "{inner}"),
            ExprKind::Block(items) => {
                f.write_str("(block")?;
                write_list(f, items)?;
                f.write_str(")")
            }
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                write!(f, "(if {cond} {then_branch}")?;
                if let Some(e) = else_branch {
                    write!(f, " {e}")?;
                }
                f.write_str(")")
            }
            ExprKind::While { cond, body } => write!(f, "(while {cond} {body})"),
            ExprKind::Function(func) => {
                let tag = match func.style {
                    FunctionStyle::Expression => "fun",
                    FunctionStyle::Block => "fun{}",
                };
                write!(f, "({tag} (")?;
                for (i, p) in func.params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ") {})", func.body)
            }
            ExprKind::Define { kind, names } => {
                write!(f, "({}", kind.keyword())?;
                for n in names {
                    write!(f, " {n}")?;
                }
                f.write_str(")")
            }
            ExprKind::Binary { op, left, right } => write!(f, "({op} {left} {right})"),
            ExprKind::Unary {
                op,
                fixity: Fixity::Prefix,
                operand,
            } => write!(f, "({op} {operand})"),
            ExprKind::Unary {
                op,
                fixity: Fixity::Postfix,
                operand,
            } => write!(f, "(post{op} {operand})"),
            ExprKind::Member { target, name } => write!(f, "(. {target} {name})"),
            ExprKind::Call { target, args } => {
                write!(f, "(call {target}")?;
                write_list(f, args)?;
                f.write_str(")")
            }
        }
    }
}
