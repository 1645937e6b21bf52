// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use arrayvec::ArrayVec;
use tracing::debug;

use crate::{
    expression::Expression,
    literal::parse_number,
    number::Number,
    operator::{Operator, MAX_ARITY},
    random::Pcg32,
    token::{Token, Variable},
};

/// The seed of [`Evaluator::new`].
pub const DEFAULT_SEED: u64 = 0x853c_49e6_748f_ea9b;

/// The outcome of [`Evaluator::try_evaluate`].
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluated<T> {
    /// The expression is a constant, and this is its value.
    Constant(T),
    /// The expression depends on the evaluation context, so it was compiled
    /// but not evaluated. Evaluate it later with [`Evaluator::evaluate`].
    Deferred(Expression),
    /// The expression is a constant, but it could not be evaluated.
    Invalid,
}

/// Evaluates expressions. Owns the random number generator used by `R(a,b)`.
///
/// The generator is the only state, so evaluating the same expressions in the
/// same order after [`Evaluator::set_random_state`] reproduces the same
/// results.
#[derive(Debug, Clone)]
pub struct Evaluator {
    rng: Pcg32,
}

impl Evaluator {
    pub fn new() -> Evaluator {
        Evaluator::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u64) -> Evaluator {
        Evaluator {
            rng: Pcg32::new(seed),
        }
    }

    /// Reseeds the random number generator.
    pub fn set_random_state(&mut self, seed: u64) {
        self.rng.reset(seed);
    }

    /// Evaluates the expression.
    ///
    /// - `value`: substituted for the variables `x`, `v` and `f`.
    /// - `index` and `count`: which evaluation out of how many this is. `#`
    ///   evaluates to `index`, and `L(a,b)` ramps from `a` at index 0 to `b`
    ///   at index `count - 1`.
    ///
    /// Returns None if the expression is malformed.
    pub fn evaluate<T: Number>(
        &mut self,
        expression: &Expression,
        value: T,
        index: u32,
        count: u32,
    ) -> Option<T> {
        let context = Context {
            value: value.to_f64(),
            index,
            count,
        };
        run(expression.postfix(), &context, &mut self.rng).map(T::from_f64)
    }

    /// Evaluates the expression right away if it's a constant.
    ///
    /// Plain numbers are parsed directly without compiling anything. Other
    /// constant expressions are evaluated with the default value, index 0 and
    /// count 1.
    pub fn try_evaluate<T: Number>(&mut self, source: &str) -> Evaluated<T> {
        if let Some(number) = parse_number(source.trim()) {
            return Evaluated::Constant(T::from_f64(number));
        }

        let expression = Expression::compile(source);
        if expression.has_variables() {
            return Evaluated::Deferred(expression);
        }

        match self.evaluate(&expression, T::default(), 0, 1) {
            Some(value) => Evaluated::Constant(value),
            None => Evaluated::Invalid,
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new()
    }
}

struct Context {
    value: f64,
    index: u32,
    count: u32,
}

enum Slot {
    Value(f64),
    /// Punctuation left in the program by unbalanced parentheses. Operators
    /// can't take their operands from beyond one of these.
    Marker,
}

fn run(program: &[Token], context: &Context, rng: &mut Pcg32) -> Option<f64> {
    let mut stack: Vec<Slot> = Vec::with_capacity(program.len());

    for token in program {
        match token {
            Token::Operator(op) => {
                let mut operands = ArrayVec::<f64, MAX_ARITY>::new();
                while operands.len() < op.arity() {
                    let Some(&Slot::Value(operand)) = stack.last() else {
                        break;
                    };
                    stack.pop();
                    operands.push(operand);
                }
                if operands.len() < op.arity() {
                    debug!(
                        "Operator {} needs {} operands, found {}.",
                        op.name(),
                        op.arity(),
                        operands.len(),
                    );
                    return None;
                }
                operands.reverse();
                let result = apply(*op, &operands, context, rng);
                stack.push(Slot::Value(result));
            }
            Token::Variable(Variable::Value) => stack.push(Slot::Value(context.value)),
            Token::Variable(Variable::Index) => stack.push(Slot::Value(context.index as f64)),
            Token::Number(number) => stack.push(Slot::Value(*number)),
            Token::Unknown(literal) => {
                debug!("Could not parse {literal:?} as a number.");
                return None;
            }
            Token::OpenParen | Token::CloseParen | Token::Comma => stack.push(Slot::Marker),
        }
    }

    match stack.as_slice() {
        [Slot::Value(result)] => Some(*result),
        _ => {
            debug!(
                "Expected the program to result in one value, ended up with {} slots.",
                stack.len(),
            );
            None
        }
    }
}

/// Applies the operator, `operands` having exactly [`Operator::arity`] values
/// in left-to-right order.
fn apply(op: Operator, operands: &[f64], context: &Context, rng: &mut Pcg32) -> f64 {
    let a = operands[0];
    let b = operands.get(1).copied().unwrap_or_default();
    match op {
        Operator::Neg => -a,
        Operator::Add => a + b,
        Operator::Sub => a - b,
        Operator::Mul => a * b,
        Operator::Div => a / b,
        Operator::Mod => a % b,
        Operator::Pow => a.powf(b),
        Operator::Sqrt if a <= 0.0 => 0.0,
        Operator::Sqrt => a.sqrt(),
        Operator::Cos => a.cos(),
        Operator::Sin => a.sin(),
        Operator::Tan => a.tan(),
        Operator::Floor => a.floor(),
        Operator::Ceil => a.ceil(),
        Operator::Round => a.round_ties_even(),
        Operator::Rand => {
            let t = rng.next_u24() as f64 / 0xFF_FFFF as f64;
            lerp(a, b, t)
        }
        Operator::Linear => {
            let count = context.count.max(1);
            let t = if count < 2 {
                0.5
            } else {
                context.index as f64 / (count - 1) as f64
            };
            lerp(a, b, t)
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use core::f64::consts::PI;

    use crate::expression::Expression;

    use super::{Evaluated, Evaluator};

    fn constant(source: &str) -> f64 {
        match Evaluator::new().try_evaluate::<f64>(source) {
            Evaluated::Constant(value) => value,
            other => panic!("{source:?} should be a constant, got {other:?}"),
        }
    }

    fn is_invalid(source: &str) -> bool {
        matches!(
            Evaluator::new().try_evaluate::<f64>(source),
            Evaluated::Invalid,
        )
    }

    #[test]
    fn plain_literals() {
        assert_eq!(2.75, constant("2,75f"));
        assert_eq!(2.5, constant(" 2.5d "));
        assert_eq!(42.0, constant("42"));
        assert_eq!(PI, constant("pi"));
        assert_eq!(0.0, constant(""));
    }

    #[test]
    fn operator_precedence() {
        assert_eq!(14.0, constant("2+3*4"));
        assert_eq!(512.0, constant("2^3^2"));
        assert_eq!(20.0, constant("(2+3)*4"));
        assert_eq!(2.0, constant("8/2/2"));
        assert_eq!(2.0 * PI, constant("2 * pi"));
    }

    #[test]
    fn unary_minus() {
        assert_eq!(-12.0, constant("3*-4"));
        assert_eq!(-7.0, constant("-3-4"));
        assert_eq!(3.0, constant("--3"));
        assert_eq!(-1.0, constant("3-4"));
        assert_eq!(-9.0, constant("-3^2"));
    }

    #[test]
    fn functions() {
        assert_eq!(0.0, constant("sqrt(-4)"));
        assert_eq!(0.0, constant("sqrt(0)"));
        assert_eq!(3.0, constant("sqrt(9)"));
        assert_eq!(0.0, constant("sin(0)"));
        assert_eq!(1.0, constant("cos(0)"));
        assert_eq!(0.0, constant("tan(0)"));
        assert_eq!(2.0, constant("floor(2.7)"));
        assert_eq!(-2.0, constant("floor(-1.5)"));
        assert_eq!(3.0, constant("ceil(2.1)"));
        assert_eq!(5.0, constant("sqrt(16) + 1"));
    }

    #[test]
    fn round_ties_to_even() {
        assert_eq!(2.0, constant("round(2.5)"));
        assert_eq!(4.0, constant("round(3.5)"));
        assert_eq!(-2.0, constant("round(-2.5)"));
        assert_eq!(3.0, constant("round(2.6)"));
    }

    #[test]
    fn remainder_follows_the_dividend() {
        assert_eq!(1.0, constant("7 % 3"));
        assert_eq!(-1.0, constant("-7 % 3"));
        assert_eq!(1.0, constant("7 % -3"));
        assert_eq!(0.5, constant("2.5 % 1"));
    }

    #[test]
    fn trailing_operator_is_ignored() {
        assert_eq!(2.0, constant("2 +"));
        assert_eq!(6.0, constant("2 * 3 *"));
    }

    #[test]
    fn malformed_expressions_fail() {
        assert!(is_invalid("+"));
        assert!(is_invalid("*"));
        assert!(is_invalid("(1"));
        assert!(is_invalid("1 2"));
        assert!(is_invalid("abc + 1"));
        assert!(is_invalid("sqrt()"));
        assert!(is_invalid("2sqrt(4)"));
        assert!(
            is_invalid("2 * 1e-5"),
            "the exponent's minus should split the literal",
        );
    }

    #[test]
    fn special_float_words_fail() {
        assert!(is_invalid("nan"));
        assert!(is_invalid("inf"));
        assert!(is_invalid("1 + Infinity"));
        let mut evaluator = Evaluator::new();
        let expression = Expression::compile("x * nan");
        assert_eq!(None, evaluator.evaluate(&expression, 2.0, 0, 1));
    }

    #[test]
    fn operators_stop_at_unclosed_parentheses() {
        assert_eq!("1 2 ( +", Expression::compile("1+(2").to_string());
        assert!(is_invalid("1+(2"));
        assert!(is_invalid("1*(-2"));
    }

    #[test]
    fn compound_assignment() {
        let mut evaluator = Evaluator::new();
        let add = Expression::compile("+=5");
        assert_eq!(Some(15.0), evaluator.evaluate(&add, 10.0, 0, 1));
        let mul = Expression::compile("*=2");
        assert_eq!(Some(20.0), evaluator.evaluate(&mul, 10.0, 0, 1));
        let sub = Expression::compile("-= 1 + 1");
        assert_eq!(Some(8.0), evaluator.evaluate(&sub, 10.0, 0, 1));
        let div = Expression::compile("/=4");
        assert_eq!(Some(2.5), evaluator.evaluate(&div, 10.0, 0, 1));
    }

    #[test]
    fn variables_are_deferred() {
        let mut evaluator = Evaluator::new();
        let Evaluated::Deferred(expression) = evaluator.try_evaluate::<f64>("x+1") else {
            panic!("x+1 should not be a constant");
        };
        assert_eq!(Some(11.0), evaluator.evaluate(&expression, 10.0, 0, 1));
        assert_eq!(Evaluated::Constant(4.0), evaluator.try_evaluate("3+1"));
        assert!(matches!(
            evaluator.try_evaluate::<f64>("R(1, 2)"),
            Evaluated::Deferred(_),
        ));
    }

    #[test]
    fn compiled_expressions_are_reusable() {
        let mut evaluator = Evaluator::new();
        let expression = Expression::compile("x*2");
        assert_eq!(Some(10.0), evaluator.evaluate(&expression, 5.0, 0, 1));
        assert_eq!(Some(6.0), evaluator.evaluate(&expression, 3.0, 0, 1));
        assert_eq!(Some(10.0), evaluator.evaluate(&expression, 5.0, 0, 1));
        assert_eq!(Some(-4), evaluator.evaluate(&expression, -2, 0, 1));
    }

    #[test]
    fn all_value_variables_are_the_same() {
        let mut evaluator = Evaluator::new();
        let expression = Expression::compile("x + v + f");
        assert_eq!(Some(6.0), evaluator.evaluate(&expression, 2.0, 0, 1));
    }

    #[test]
    fn index_variable() {
        let mut evaluator = Evaluator::new();
        let expression = Expression::compile("# * 2");
        assert_eq!(Some(6.0), evaluator.evaluate(&expression, 0.0, 3, 10));
    }

    #[test]
    fn linear_ramp() {
        let mut evaluator = Evaluator::new();
        let expression = Expression::compile("L(0,10)");
        let ramp: Vec<f64> = (0..5)
            .map(|index| evaluator.evaluate(&expression, 0.0, index, 5).unwrap())
            .collect();
        assert_eq!(vec![0.0, 2.5, 5.0, 7.5, 10.0], ramp);

        assert_eq!(Some(5.0), evaluator.evaluate(&expression, 0.0, 0, 1));
        assert_eq!(
            Some(5.0),
            evaluator.evaluate(&expression, 0.0, 0, 0),
            "count should be clamped to at least one",
        );
    }

    #[test]
    fn random_range_is_reproducible() {
        let expression = Expression::compile("R(0,1)");
        let draws = |seed| {
            let mut evaluator = Evaluator::new();
            evaluator.set_random_state(seed);
            (0..100)
                .map(|_| evaluator.evaluate(&expression, 0.0, 0, 1).unwrap())
                .collect::<Vec<f64>>()
        };

        let first = draws(1337);
        let second = draws(1337);
        assert_eq!(first, second);
        assert!(first.iter().all(|draw| (0.0..=1.0).contains(draw)));
        assert_ne!(first, draws(1338));
    }

    #[test]
    fn random_range_scales_to_bounds() {
        let mut evaluator = Evaluator::with_seed(5);
        let expression = Expression::compile("R(10, 20)");
        for _ in 0..100 {
            let draw = evaluator.evaluate(&expression, 0.0, 0, 1).unwrap();
            assert!((10.0..=20.0).contains(&draw), "{draw} out of bounds");
        }
        let degenerate = Expression::compile("R(3, 3)");
        assert_eq!(Some(3.0), evaluator.evaluate(&degenerate, 0.0, 0, 1));
    }

    #[test]
    fn narrowing() {
        let mut evaluator = Evaluator::new();
        assert_eq!(Evaluated::Constant(7), evaluator.try_evaluate::<i32>("7.9"));
        assert_eq!(Evaluated::Constant(-2), evaluator.try_evaluate::<i64>("-5 / 2"));
        assert_eq!(Evaluated::Constant(0), evaluator.try_evaluate::<u64>("1 - 6"));
        assert_eq!(Evaluated::Constant(0.5), evaluator.try_evaluate::<f32>("1 / 2"));
    }
}
