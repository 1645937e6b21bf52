// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use core::f64::consts::PI;

/// Parses a numeric literal as written in expressions.
///
/// On top of the usual decimal syntax, this accepts `,` as the decimal
/// separator, a single trailing `f`, `d` or `l` type suffix after a digit (e.g.
/// `1.5f`), and `pi` in any case. The empty string parses as zero. Words like
/// `inf` and `nan` are not numbers.
pub fn parse_number(literal: &str) -> Option<f64> {
    let literal = literal.replace(',', ".").to_lowercase();
    if literal.is_empty() {
        return Some(0.0);
    }
    if literal == "pi" {
        return Some(PI);
    }
    if !is_decimal(&literal) {
        return None;
    }
    literal_without_suffix(&literal).parse().ok()
}

/// Checks that the digits start right after the optional sign, which rules out
/// everything `f64::from_str` accepts on top of plain decimals.
fn is_decimal(literal: &str) -> bool {
    let unsigned = literal.strip_prefix(['+', '-']).unwrap_or(literal);
    unsigned
        .bytes()
        .next()
        .is_some_and(|first| first.is_ascii_digit() || first == b'.')
}

fn literal_without_suffix(literal: &str) -> &str {
    let bytes = literal.as_bytes();
    match bytes {
        [.., digit, b'f' | b'd' | b'l'] if digit.is_ascii_digit() => &literal[..literal.len() - 1],
        _ => literal,
    }
}

#[cfg(test)]
mod tests {
    use core::f64::consts::PI;

    use super::parse_number;

    #[test]
    fn plain_decimals() {
        assert_eq!(Some(3.0), parse_number("3"));
        assert_eq!(Some(-0.25), parse_number("-0.25"));
        assert_eq!(Some(1500.0), parse_number("1.5e3"));
        assert_eq!(Some(0.5), parse_number(".5"));
    }

    #[test]
    fn suffixes_and_commas() {
        assert_eq!(Some(2.75), parse_number("2,75f"));
        assert_eq!(Some(2.5), parse_number("2.5D"));
        assert_eq!(Some(7.0), parse_number("7l"));
        assert_eq!(None, parse_number("f"), "a lone suffix is not a number");
        assert_eq!(None, parse_number("1.5ff"));
        assert_eq!(None, parse_number("x"));
    }

    #[test]
    fn pi_in_any_case() {
        assert_eq!(Some(PI), parse_number("pi"));
        assert_eq!(Some(PI), parse_number("PI"));
        assert_eq!(Some(PI), parse_number("Pi"));
    }

    #[test]
    fn special_floats_are_not_numbers() {
        assert_eq!(None, parse_number("inf"));
        assert_eq!(None, parse_number("-inf"));
        assert_eq!(None, parse_number("nan"));
        assert_eq!(None, parse_number("NaN"));
        assert_eq!(None, parse_number("Infinity"));
        assert_eq!(None, parse_number("+infinity"));
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(Some(0.0), parse_number(""));
    }
}
