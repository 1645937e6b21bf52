// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

/// Numeric types expressions can be evaluated as.
///
/// Expressions are always evaluated in `f64`, the bound value is widened into
/// it and the result narrowed back out of it.
pub trait Number: Copy + Default {
    fn to_f64(self) -> f64;
    /// Converts the result of an evaluation, truncating towards zero for
    /// integer types.
    fn from_f64(value: f64) -> Self;
}

impl Number for f64 {
    fn to_f64(self) -> f64 {
        self
    }
    fn from_f64(value: f64) -> Self {
        value
    }
}

impl Number for f32 {
    fn to_f64(self) -> f64 {
        self as f64
    }
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Number for i32 {
    fn to_f64(self) -> f64 {
        self as f64
    }
    fn from_f64(value: f64) -> Self {
        value as i32
    }
}

impl Number for i64 {
    fn to_f64(self) -> f64 {
        self as f64
    }
    fn from_f64(value: f64) -> Self {
        value as i64
    }
}

impl Number for u64 {
    fn to_f64(self) -> f64 {
        self as f64
    }
    fn from_f64(value: f64) -> Self {
        // Negative results are clamped to zero rather than wrapping around.
        value.max(0.0) as u64
    }
}
