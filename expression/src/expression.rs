// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use core::{
    convert::Infallible,
    fmt::{self, Display},
    str::FromStr,
};

use tracing::trace;

use crate::{
    postfix::to_postfix,
    token::{normalize_unary_minus, preprocess, tokenize, Token, Tokens},
};

/// A compiled expression, ready to be evaluated any number of times with
/// [`Evaluator::evaluate`](crate::Evaluator::evaluate).
///
/// Immutable after compilation, so one can be shared between e.g. all the
/// particles of a particle system.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    postfix: Vec<Token>,
    has_variables: bool,
}

impl Expression {
    /// Compiles the source into a postfix program. This never fails, problems
    /// with the expression are only detected when it's evaluated.
    pub fn compile(source: &str) -> Expression {
        let Tokens {
            mut tokens,
            has_variables,
        } = tokenize(&preprocess(source));
        normalize_unary_minus(&mut tokens);
        let postfix = to_postfix(tokens);

        let expression = Expression {
            source: source.to_string(),
            postfix,
            has_variables,
        };
        trace!(
            "Compiled {:?} into \"{}\" (variables: {}).",
            expression.source,
            expression,
            has_variables,
        );
        expression
    }

    /// True if the result depends on the evaluation context: the bound value,
    /// the index, or randomness. Otherwise the expression is a constant.
    pub fn has_variables(&self) -> bool {
        self.has_variables
    }

    /// The program, in the order it's evaluated.
    pub fn postfix(&self) -> &[Token] {
        &self.postfix
    }

    /// The string this expression was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl FromStr for Expression {
    type Err = Infallible;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Ok(Expression::compile(source))
    }
}

/// Writes out the postfix program, tokens separated by spaces.
impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.postfix.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}
