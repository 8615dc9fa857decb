//! # Presentation Formatting
//!
//! Renders expression trees and solve results for display. The core never
//! calls into windowing or clipboard facilities; these functions produce
//! strings that the presentation layer shows as-is.
//!
//! Two renderings are provided: a plain-text form used in terminals and in
//! error diagnostics, and a LaTeX form for typeset display. The numeric
//! result line uses the fixed 4-decimal display precision; the underlying
//! value keeps full f64 precision.

use crate::expr::Expr;

/// Display precision for formatted results, in decimal places.
pub const RESULT_DECIMALS: usize = 4;

/// Plain-text rendering with minimal parentheses.
pub fn pretty(expr: &Expr) -> String {
    fn pp(ctx: u8, expr: &Expr) -> String {
        match expr {
            Expr::Variable(v) => v.clone(),
            Expr::Number(n) => show_number(*n),

            Expr::Add(a, b) => {
                let s_a = pp(1, a);
                let (neg_b, b_inner) = split_neg(b);
                let s_b = pp(2, &b_inner);
                let body = format!("{s_a} {} {s_b}", if neg_b { "-" } else { "+" });
                bracket(ctx, 1, body)
            }

            Expr::Sub(a, b) => {
                let s_a = pp(1, a);
                let (neg_b, b_inner) = split_neg(b);
                let s_b = pp(2, &b_inner);
                let body = format!("{s_a} {} {s_b}", if neg_b { "+" } else { "-" });
                bracket(ctx, 1, body)
            }

            Expr::Mul(a, b) => {
                let body = format!("{}*{}", pp(2, a), pp(2, b));
                bracket(ctx, 2, body)
            }

            Expr::Div(a, b) => {
                let body = format!("{}/{}", pp(2, a), pp(3, b));
                bracket(ctx, 2, body)
            }

            Expr::Pow(a, b) => bracket(ctx, 3, format!("{}^{}", pp(4, a), pp(4, b))),

            Expr::Neg(a) => {
                let (is_neg, inner) = split_neg(a);
                if is_neg {
                    pp(ctx, &inner)
                } else {
                    format!("-{}", pp(4, &inner))
                }
            }

            Expr::Sqrt(a) => format!("sqrt({})", pp(0, a)),
            Expr::Log(a) => format!("log({})", pp(0, a)),
            Expr::Exp(a) => format!("exp({})", pp(0, a)),
        }
    }

    pp(0, expr)
}

/// LaTeX rendering for typeset display.
///
/// Greek variable names from the catalog are mapped onto their LaTeX
/// commands; everything else is emitted verbatim.
pub fn latex(expr: &Expr) -> String {
    fn pp(ctx: u8, expr: &Expr) -> String {
        match expr {
            Expr::Variable(v) => latex_symbol(v),
            Expr::Number(n) => show_number(*n),

            Expr::Add(a, b) => {
                let body = format!("{} + {}", pp(1, a), pp(2, b));
                group(ctx, 1, body)
            }

            Expr::Sub(a, b) => {
                let body = format!("{} - {}", pp(1, a), pp(2, b));
                group(ctx, 1, body)
            }

            Expr::Mul(a, b) => {
                let body = format!("{} \\cdot {}", pp(2, a), pp(2, b));
                group(ctx, 2, body)
            }

            // \frac never needs outer parentheses
            Expr::Div(a, b) => format!("\\frac{{{}}}{{{}}}", pp(0, a), pp(0, b)),

            Expr::Pow(a, b) => format!("{{{}}}^{{{}}}", pp(4, a), pp(0, b)),

            Expr::Neg(a) => format!("-{}", pp(4, a)),

            Expr::Sqrt(a) => format!("\\sqrt{{{}}}", pp(0, a)),
            Expr::Log(a) => format!("\\log\\left({}\\right)", pp(0, a)),
            Expr::Exp(a) => format!("e^{{{}}}", pp(0, a)),
        }
    }

    fn group(ctx: u8, prec: u8, body: String) -> String {
        if prec < ctx {
            format!("\\left({body}\\right)")
        } else {
            body
        }
    }

    pp(0, expr)
}

fn latex_symbol(name: &str) -> String {
    let mut out = String::new();
    for c in name.chars() {
        match c {
            'ρ' => out.push_str("\\rho "),
            'ν' => out.push_str("\\nu "),
            'σ' => out.push_str("\\sigma "),
            'Φ' => out.push_str("\\Phi "),
            'Δ' => out.push_str("\\Delta "),
            'δ' => out.push_str("\\delta "),
            other => out.push(other),
        }
    }
    out.trim_end().to_string()
}

fn split_neg(expr: &Expr) -> (bool, Expr) {
    match expr {
        Expr::Neg(inner) => (true, *inner.clone()),
        Expr::Number(n) if *n < 0.0 => (true, Expr::Number(-n)),
        other => (false, other.clone()),
    }
}

fn bracket(ctx: u8, prec: u8, body: String) -> String {
    if prec < ctx {
        format!("({body})")
    } else {
        body
    }
}

// Integral values print without a trailing ".0" so trees read like the
// catalog source ("2*neff", not "2.0*neff").
fn show_number(n: f64) -> String {
    if n == n.trunc() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Plain-text equation string `"<target> = <expr>"`.
pub fn equation(target: &str, expr: &Expr) -> String {
    format!("{} = {}", target, pretty(expr))
}

/// LaTeX equation string `"<target> = <expr>"`.
pub fn equation_latex(target: &str, expr: &Expr) -> String {
    format!("{} = {}", latex_symbol(target), latex(expr))
}

/// Result line shown to the user: `"<target> = <value, 4 decimals> <unit>"`.
/// The unit label is omitted when empty.
pub fn result_line(target: &str, value: f64, unit: &str) -> String {
    if unit.is_empty() {
        format!("{target} = {value:.prec$}", prec = RESULT_DECIMALS)
    } else {
        format!("{target} = {value:.prec$} {unit}", prec = RESULT_DECIMALS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;

    #[test]
    fn test_pretty_round_trips_catalog_style() {
        let e = parse_expr("t", "4.2 + 2.0*neff*sqrt(Qcal)*ρ").unwrap();
        assert_eq!(pretty(&e), "4.2 + 2*neff*sqrt(Qcal)*ρ");
    }

    #[test]
    fn test_pretty_parenthesizes_by_precedence() {
        let e = parse_expr("t", "(a + b)/c").unwrap();
        assert_eq!(pretty(&e), "(a + b)/c");

        let e = parse_expr("t", "a + b/c").unwrap();
        assert_eq!(pretty(&e), "a + b/c");

        let e = parse_expr("t", "(a/b)^2").unwrap();
        assert_eq!(pretty(&e), "(a/b)^2");
    }

    #[test]
    fn test_latex_fraction_and_sqrt() {
        let e = parse_expr("t", "sqrt(Qcal)/ρ").unwrap();
        assert_eq!(latex(&e), "\\frac{\\sqrt{Qcal}}{\\rho}");
    }

    #[test]
    fn test_result_line_precision() {
        assert_eq!(result_line("D", 128.90774, "km/s"), "D = 128.9077 km/s");
        assert_eq!(result_line("neff", 1.0, ""), "neff = 1.0000");
    }

    #[test]
    fn test_equation_string() {
        let e = parse_expr("t", "ρ0*D^2/4.0").unwrap();
        assert_eq!(equation("P", &e), "P = ρ0*D^2/4");
    }
}
