// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use enum_map::Enum;

/// The largest [`Operator::arity`] of any operator.
pub const MAX_ARITY: usize = 2;

/// Every operator and function understood by expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
pub enum Operator {
    /// Unary minus. Never typed by the user, `-` is rewritten to this by
    /// [`normalize_unary_minus`](crate::normalize_unary_minus) where needed.
    Neg,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Sqrt,
    Cos,
    Sin,
    Tan,
    Floor,
    Ceil,
    Round,
    /// `R(a, b)`, a uniformly random value between `a` and `b`.
    Rand,
    /// `L(a, b)`, a value between `a` and `b` based on the index of the
    /// evaluation out of the count of evaluations.
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

impl Operator {
    /// The operator's name as it's written in expressions.
    pub const fn name(self) -> &'static str {
        match self {
            Operator::Neg => "_",
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Mod => "%",
            Operator::Pow => "^",
            Operator::Sqrt => "sqrt",
            Operator::Cos => "cos",
            Operator::Sin => "sin",
            Operator::Tan => "tan",
            Operator::Floor => "floor",
            Operator::Ceil => "ceil",
            Operator::Round => "round",
            Operator::Rand => "R",
            Operator::Linear => "L",
        }
    }

    /// Looks up the operator written as `name`, if there is one.
    pub fn from_name(name: &str) -> Option<Operator> {
        (0..Operator::LENGTH)
            .map(Operator::from_usize)
            .find(|op| op.name() == name)
    }

    /// Higher binds tighter.
    pub const fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 2,
            Operator::Mul | Operator::Div | Operator::Mod => 3,
            Operator::Sqrt
            | Operator::Cos
            | Operator::Sin
            | Operator::Tan
            | Operator::Floor
            | Operator::Ceil
            | Operator::Round
            | Operator::Rand
            | Operator::Linear => 4,
            Operator::Pow | Operator::Neg => 5,
        }
    }

    /// How many operands the operator consumes when evaluated.
    pub const fn arity(self) -> usize {
        match self {
            Operator::Neg
            | Operator::Sqrt
            | Operator::Cos
            | Operator::Sin
            | Operator::Tan
            | Operator::Floor
            | Operator::Ceil
            | Operator::Round => 1,
            Operator::Add
            | Operator::Sub
            | Operator::Mul
            | Operator::Div
            | Operator::Mod
            | Operator::Pow
            | Operator::Rand
            | Operator::Linear => 2,
        }
    }

    pub const fn associativity(self) -> Associativity {
        match self {
            Operator::Pow | Operator::Neg => Associativity::Right,
            _ => Associativity::Left,
        }
    }

    /// Returns true for the functions whose result depends on the context of
    /// the evaluation (randomness or the index) rather than just the operands.
    ///
    /// Expressions containing these are never treated as constants, and their
    /// closing parenthesis pops them off the operator stack during
    /// [`to_postfix`](crate::to_postfix).
    pub const fn is_delayed_function(self) -> bool {
        matches!(self, Operator::Rand | Operator::Linear)
    }
}
