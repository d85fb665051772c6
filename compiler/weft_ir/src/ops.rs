//! Operators and the precedence table.
//!
//! Lower precedence numbers bind tighter. The parser folds an operator into
//! the running expression only while its precedence fits the current limit.

use std::fmt;

/// Operator precedence levels.
pub mod prec {
    /// Call `(` and member access `.`.
    pub const POSTFIX_ACCESS: u8 = 1;
    /// Postfix `++` / `--`.
    pub const POSTFIX_STEP: u8 = 2;
    /// Prefix `++ -- + - !`.
    pub const PREFIX: u8 = 3;
    pub const MULTIPLICATIVE: u8 = 4;
    pub const ADDITIVE: u8 = 5;
    pub const RELATIONAL: u8 = 7;
    pub const EQUALITY: u8 = 8;
    pub const AND: u8 = 12;
    pub const OR: u8 = 13;
    /// Reserved for `?` / `:`, which are not parsed.
    pub const CONDITIONAL: u8 = 14;
    /// Assignment `=` and lambda `->`.
    pub const ASSIGN: u8 = 15;
    /// Loosest limit: a whole expression.
    pub const LOWEST: u8 = ASSIGN;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

/// Binary operators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,
    NotEq,
    And,
    Or,
    Assign,
}

impl BinaryOp {
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => prec::MULTIPLICATIVE,
            BinaryOp::Add | BinaryOp::Sub => prec::ADDITIVE,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::LtEq | BinaryOp::GtEq => prec::RELATIONAL,
            BinaryOp::Eq | BinaryOp::NotEq => prec::EQUALITY,
            BinaryOp::And => prec::AND,
            BinaryOp::Or => prec::OR,
            BinaryOp::Assign => prec::ASSIGN,
        }
    }

    pub fn assoc(self) -> Assoc {
        match self {
            BinaryOp::Assign => Assoc::Right,
            _ => Assoc::Left,
        }
    }

    /// Whether the operator evaluates its right operand only on demand.
    pub fn is_short_circuit(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Assign => "=",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

/// Unary operators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
    Increment,
    Decrement,
}

impl UnaryOp {
    /// `++` and `--` write back to their operand.
    pub fn is_step(self) -> bool {
        matches!(self, UnaryOp::Increment | UnaryOp::Decrement)
    }

    pub fn as_symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
            UnaryOp::Increment => "++",
            UnaryOp::Decrement => "--",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

/// Whether a unary operator was written before or after its operand.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Fixity {
    Prefix,
    Postfix,
}
