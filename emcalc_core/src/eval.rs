//! # Numeric Evaluator
//!
//! Substitutes numeric bindings into a solved expression and reduces it to
//! a double-precision value. Substitution is simultaneous - every variable
//! node reads from the same immutable map, so binding order cannot affect
//! the result.
//!
//! Undefined real-valued operations (division by zero, even roots or
//! fractional powers of negatives, logarithms of non-positives) fail with
//! a `Domain` error carrying the offending sub-expression, rather than
//! propagating NaN or infinity into the result.

use std::collections::HashMap;

use crate::errors::{CalcError, CalcResult};
use crate::expr::Expr;
use crate::format;

/// Reduce `expr` to a finite number under `inputs`.
pub fn evaluate(expr: &Expr, inputs: &HashMap<String, f64>) -> CalcResult<f64> {
    let value = reduce(expr, inputs)?;
    if !value.is_finite() {
        return Err(CalcError::domain(
            format::pretty(expr),
            "evaluation produced a non-finite value",
        ));
    }
    Ok(value)
}

fn reduce(expr: &Expr, inputs: &HashMap<String, f64>) -> CalcResult<f64> {
    match expr {
        Expr::Number(n) => Ok(*n),
        Expr::Variable(name) => inputs.get(name).copied().ok_or_else(|| {
            CalcError::invalid_input(name, "", "missing required binding")
        }),
        Expr::Add(a, b) => Ok(reduce(a, inputs)? + reduce(b, inputs)?),
        Expr::Sub(a, b) => Ok(reduce(a, inputs)? - reduce(b, inputs)?),
        Expr::Mul(a, b) => Ok(reduce(a, inputs)? * reduce(b, inputs)?),
        Expr::Div(a, b) => {
            let denominator = reduce(b, inputs)?;
            if denominator == 0.0 {
                return Err(CalcError::domain(format::pretty(expr), "division by zero"));
            }
            Ok(reduce(a, inputs)? / denominator)
        }
        Expr::Pow(a, b) => {
            let base = reduce(a, inputs)?;
            let exponent = reduce(b, inputs)?;
            if base < 0.0 && exponent.fract() != 0.0 {
                return Err(CalcError::domain(
                    format::pretty(expr),
                    "fractional power of a negative value",
                ));
            }
            if base == 0.0 && exponent < 0.0 {
                return Err(CalcError::domain(
                    format::pretty(expr),
                    "zero raised to a negative power",
                ));
            }
            Ok(base.powf(exponent))
        }
        Expr::Neg(a) => Ok(-reduce(a, inputs)?),
        Expr::Sqrt(a) => {
            let radicand = reduce(a, inputs)?;
            if radicand < 0.0 {
                return Err(CalcError::domain(
                    format::pretty(expr),
                    "square root of a negative value",
                ));
            }
            Ok(radicand.sqrt())
        }
        Expr::Log(a) => {
            let argument = reduce(a, inputs)?;
            if argument <= 0.0 {
                return Err(CalcError::domain(
                    format::pretty(expr),
                    "logarithm of a non-positive value",
                ));
            }
            Ok(argument.ln())
        }
        Expr::Exp(a) => Ok(reduce(a, inputs)?.exp()),
    }
}

/// Parse a user-supplied text field into a finite number, naming the
/// variable on failure. This is the boundary where non-numeric text,
/// empty fields and NaN/infinity are rejected, before any solving.
pub fn parse_input(variable: &str, text: &str) -> CalcResult<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CalcError::invalid_input(variable, text, "value is empty"));
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| CalcError::invalid_input(variable, text, "not a number"))?;
    if !value.is_finite() {
        return Err(CalcError::invalid_input(
            variable,
            text,
            "value must be finite",
        ));
    }
    Ok(value)
}
