// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::{
    operator::{Associativity, Operator},
    token::Token,
};

/// Reorders infix tokens into postfix (reverse Polish) order with the
/// shunting-yard algorithm.
///
/// Never fails: mismatched parentheses and misplaced operators simply end up
/// in the output in a way that makes evaluation fail later.
pub fn to_postfix(tokens: Vec<Token>) -> Vec<Token> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for token in tokens {
        match token {
            Token::OpenParen => stack.push(token),

            Token::CloseParen => {
                while let Some(top) = stack.pop() {
                    if top == Token::OpenParen {
                        break;
                    }
                    output.push(top);
                }
                // The parenthesis closed the argument list of R(a,b) or L(a,b)
                if matches!(stack.last(), Some(Token::Operator(op)) if op.is_delayed_function()) {
                    output.extend(stack.pop());
                }
            }

            // Flush the previous argument, but keep the parenthesis for the
            // rest of the argument list.
            Token::Comma => {
                while stack.last().is_some_and(|top| *top != Token::OpenParen) {
                    output.extend(stack.pop());
                }
            }

            Token::Operator(incoming) => {
                while let Some(&Token::Operator(top)) = stack.last() {
                    if !needs_to_pop(top, incoming) {
                        break;
                    }
                    output.extend(stack.pop());
                }
                stack.push(token);
            }

            Token::Variable(_) | Token::Number(_) | Token::Unknown(_) => output.push(token),
        }
    }

    output.extend(stack.into_iter().rev());
    output
}

/// Returns true if `top` should be evaluated before `incoming`.
fn needs_to_pop(top: Operator, incoming: Operator) -> bool {
    match incoming.associativity() {
        Associativity::Left => incoming.precedence() <= top.precedence(),
        Associativity::Right => incoming.precedence() < top.precedence(),
    }
}
