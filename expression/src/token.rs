// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use core::fmt::{self, Display};

use crate::{literal::parse_number, operator::Operator};

/// A lexical unit of an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Operator(Operator),
    OpenParen,
    CloseParen,
    Comma,
    Variable(Variable),
    Number(f64),
    /// A run of characters that isn't anything else. Evaluating a program
    /// containing one of these always fails.
    Unknown(String),
}

/// The context-dependent values an expression can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
    /// `x`, `v` or `f`: the value passed in by whoever evaluates the
    /// expression.
    Value,
    /// `#`: the index of the evaluation, see [`Operator::Linear`].
    Index,
}

/// The result of [`tokenize`].
#[derive(Debug, Clone, PartialEq)]
pub struct Tokens {
    pub tokens: Vec<Token>,
    /// True if any of the tokens is a [`Variable`] or a delayed function (see
    /// [`Operator::is_delayed_function`]).
    pub has_variables: bool,
}

impl Token {
    /// Classifies a run of characters produced by the tokenizer.
    pub fn classify(run: &str) -> Token {
        match run {
            "(" => Token::OpenParen,
            ")" => Token::CloseParen,
            "," => Token::Comma,
            "x" | "v" | "f" => Token::Variable(Variable::Value),
            "#" => Token::Variable(Variable::Index),
            _ => {
                if let Some(op) = Operator::from_name(run) {
                    Token::Operator(op)
                } else if let Some(number) = parse_number(run) {
                    Token::Number(number)
                } else {
                    Token::Unknown(run.to_string())
                }
            }
        }
    }

    /// Operators and punctuation, i.e. anything that isn't a value.
    pub fn is_command(&self) -> bool {
        matches!(
            self,
            Token::Operator(_) | Token::OpenParen | Token::CloseParen | Token::Comma
        )
    }

    fn binds_context(&self) -> bool {
        match self {
            Token::Variable(_) => true,
            Token::Operator(op) => op.is_delayed_function(),
            _ => false,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Operator(op) => f.write_str(op.name()),
            Token::OpenParen => f.write_str("("),
            Token::CloseParen => f.write_str(")"),
            Token::Comma => f.write_str(","),
            Token::Variable(Variable::Value) => f.write_str("x"),
            Token::Variable(Variable::Index) => f.write_str("#"),
            Token::Number(number) => write!(f, "{number}"),
            Token::Unknown(run) => f.write_str(run),
        }
    }
}

/// Characters which always make up a token of their own.
fn is_symbol(c: char) -> bool {
    matches!(c, '(' | ')' | ',') || is_operator_symbol(c)
}

/// Characters which are operators on their own (as opposed to punctuation).
/// Letters never are, so `R` and `L` only work as separate words.
fn is_operator_symbol(c: char) -> bool {
    let mut name = [0; 4];
    !c.is_alphabetic() && Operator::from_name(c.encode_utf8(&mut name)).is_some()
}

/// Cleans up user input before tokenizing.
///
/// Surrounding whitespace and a single trailing operator (e.g. from an
/// expression that's still being typed) are removed, and a leading compound
/// assignment is expanded: `+=3` becomes `x+(3)`.
pub fn preprocess(source: &str) -> String {
    let mut source = source.trim();
    if let Some(last) = source.chars().next_back() {
        if is_operator_symbol(last) {
            source = &source[..source.len() - last.len_utf8()];
        }
    }

    match source.as_bytes() {
        [op @ (b'+' | b'-' | b'*' | b'/'), b'=', ..] => {
            format!("x{}({})", *op as char, &source[2..])
        }
        _ => source.to_string(),
    }
}

/// Splits the source into tokens.
///
/// Symbols (parentheses, commas and single-character operators) are always
/// their own tokens, whitespace separates tokens, and everything else is
/// collected into runs, so function names like `sqrt` need to be separated
/// from their surroundings by whitespace or symbols.
pub fn tokenize(source: &str) -> Tokens {
    let mut tokens = Vec::new();
    let mut run_start = None;

    for (i, c) in source.char_indices() {
        let symbol = is_symbol(c);
        if symbol || c.is_whitespace() {
            if let Some(start) = run_start.take() {
                tokens.push(Token::classify(&source[start..i]));
            }
            if symbol {
                tokens.push(Token::classify(&source[i..i + c.len_utf8()]));
            }
        } else if run_start.is_none() {
            run_start = Some(i);
        }
    }
    if let Some(start) = run_start {
        tokens.push(Token::classify(&source[start..]));
    }

    let has_variables = tokens.iter().any(Token::binds_context);
    Tokens {
        tokens,
        has_variables,
    }
}

/// Rewrites each `-` which is in a unary position into [`Operator::Neg`].
///
/// A minus is unary if it's the first token, or if it follows any command
/// other than a closing parenthesis.
pub fn normalize_unary_minus(tokens: &mut [Token]) {
    for i in 0..tokens.len() {
        if tokens[i] != Token::Operator(Operator::Sub) {
            continue;
        }
        let unary = match i.checked_sub(1) {
            None => true,
            Some(previous) => {
                let previous = &tokens[previous];
                previous.is_command() && *previous != Token::CloseParen
            }
        };
        if unary {
            tokens[i] = Token::Operator(Operator::Neg);
        }
    }
}
