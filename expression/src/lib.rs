// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Small arithmetic expressions for user-authored numeric parameters, e.g.
//! `R(1, 2) * 10` for a particle's random speed, or `+=0.5` for "the current
//! value plus a half".
//!
//! Expressions are compiled into an [`Expression`] (a postfix program) once,
//! and then evaluated with an [`Evaluator`] as many times as needed, each time
//! with a different bound value (`x`, `v` or `f`), index (`#`) and count.
//! [`Evaluator::try_evaluate`] is the entry point for when the expression might
//! just be a constant.
//!
//! Supported syntax:
//! - `+ - * / % ^` and parentheses, `^` grouping to the right.
//! - `sqrt cos sin tan floor ceil round` with one argument, e.g. `sin(x)`.
//! - `R(a, b)`: a uniformly random value between `a` and `b`.
//! - `L(a, b)`: ramps from `a` to `b` as the index goes from 0 to `count - 1`.
//! - Numbers may use `,` as the decimal separator and have an `f`, `d` or `l`
//!   suffix. `pi` is a number too.
//! - A leading `+=`, `-=`, `*=` or `/=` applies the rest of the expression to
//!   the bound value.
//!
//! Evaluation failures are reported as [`None`] (or [`Evaluated::Invalid`]),
//! with the details logged at the debug level via [`tracing`].

mod evaluator;
mod expression;
mod literal;
mod number;
mod operator;
mod postfix;
mod random;
mod token;

pub use evaluator::{Evaluated, Evaluator, DEFAULT_SEED};
pub use expression::Expression;
pub use literal::parse_number;
pub use number::Number;
pub use operator::{Associativity, Operator, MAX_ARITY};
pub use postfix::to_postfix;
pub use random::Pcg32;
pub use token::{normalize_unary_minus, preprocess, tokenize, Token, Tokens, Variable};
