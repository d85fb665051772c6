//! Operators that can follow an operand.

use weft_ir::{prec, Assoc, BinaryOp, TokenKind, UnaryOp};

/// An operator the climbing loop can fold into the running expression.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum InfixOp {
    Binary(BinaryOp),
    Call,
    Member,
    PostfixStep(UnaryOp),
    Lambda,
    /// `?` or `:`, recognised only to be rejected.
    Conditional,
}

impl InfixOp {
    pub(super) fn from_token(kind: &TokenKind) -> Option<InfixOp> {
        Some(match kind {
            TokenKind::Star => InfixOp::Binary(BinaryOp::Mul),
            TokenKind::Slash => InfixOp::Binary(BinaryOp::Div),
            TokenKind::Percent => InfixOp::Binary(BinaryOp::Rem),
            TokenKind::Plus => InfixOp::Binary(BinaryOp::Add),
            TokenKind::Minus => InfixOp::Binary(BinaryOp::Sub),
            TokenKind::Lt => InfixOp::Binary(BinaryOp::Lt),
            TokenKind::Gt => InfixOp::Binary(BinaryOp::Gt),
            TokenKind::LtEq => InfixOp::Binary(BinaryOp::LtEq),
            TokenKind::GtEq => InfixOp::Binary(BinaryOp::GtEq),
            TokenKind::EqEq => InfixOp::Binary(BinaryOp::Eq),
            TokenKind::NotEq => InfixOp::Binary(BinaryOp::NotEq),
            TokenKind::AmpAmp => InfixOp::Binary(BinaryOp::And),
            TokenKind::PipePipe => InfixOp::Binary(BinaryOp::Or),
            TokenKind::Eq => InfixOp::Binary(BinaryOp::Assign),
            TokenKind::LParen => InfixOp::Call,
            TokenKind::Dot => InfixOp::Member,
            TokenKind::PlusPlus => InfixOp::PostfixStep(UnaryOp::Increment),
            TokenKind::MinusMinus => InfixOp::PostfixStep(UnaryOp::Decrement),
            TokenKind::Arrow => InfixOp::Lambda,
            TokenKind::Question | TokenKind::Colon => InfixOp::Conditional,
            _ => return None,
        })
    }

    pub(super) fn precedence(self) -> u8 {
        match self {
            InfixOp::Binary(op) => op.precedence(),
            InfixOp::Call | InfixOp::Member => prec::POSTFIX_ACCESS,
            InfixOp::PostfixStep(_) => prec::POSTFIX_STEP,
            InfixOp::Lambda => prec::ASSIGN,
            InfixOp::Conditional => prec::CONDITIONAL,
        }
    }

    pub(super) fn assoc(self) -> Assoc {
        match self {
            InfixOp::Binary(op) => op.assoc(),
            InfixOp::Lambda => Assoc::Right,
            _ => Assoc::Left,
        }
    }

    /// Limit for parsing the right operand of this operator.
    pub(super) fn right_limit(self) -> u8 {
        let p = self.precedence();
        match self.assoc() {
            Assoc::Right => p,
            Assoc::Left => p - 1,
        }
    }
}

/// Prefix operator for a token, if any.
pub(super) fn prefix_op(kind: &TokenKind) -> Option<UnaryOp> {
    match kind {
        TokenKind::Minus => Some(UnaryOp::Neg),
        TokenKind::Plus => Some(UnaryOp::Plus),
        TokenKind::Bang => Some(UnaryOp::Not),
        TokenKind::PlusPlus => Some(UnaryOp::Increment),
        TokenKind::MinusMinus => Some(UnaryOp::Decrement),
        _ => None,
    }
}
