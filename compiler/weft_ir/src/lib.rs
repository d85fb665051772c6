//! Shared front-end data for the Weft scripting language.
//!
//! - [`Span`]: byte ranges into the script source
//! - [`Name`]: shared identifier text
//! - [`Token`] / [`TokenKind`]: lexer output
//! - [`Expr`] / [`ExprKind`]: the immutable expression tree
//! - [`BinaryOp`] / [`UnaryOp`] and the [`prec`] table

mod ast;
mod name;
mod ops;
mod span;
mod token;

pub use ast::{
    DefineKind, Expr, ExprKind, FunctionLiteral, FunctionStyle, InterpolationPart,
};
pub use name::Name;
pub use ops::{prec, Assoc, BinaryOp, Fixity, UnaryOp};
pub use span::Span;
pub use token::{StrLiteral, StrPart, Token, TokenKind};
