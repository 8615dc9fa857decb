//! Expression grammar parser.
//!
//! Parses catalog expression strings into [`Expr`] trees. The grammar covers
//! exactly what the catalog's empirical formulas need: decimal literals,
//! variable names, `+ - * / ^`, unary minus, parentheses and the functions
//! `sqrt`, `log`, `exp`.
//!
//! Identifiers are Unicode-aware: the catalog names variables like `ρ`,
//! `Φ` and `νσtot2` after the symbols used in the source literature.

use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while, take_while1};
use nom::character::complete::{char, digit0, digit1, multispace0};
use nom::combinator::{all_consuming, map, recognize};
use nom::error::VerboseError;
use nom::multi::fold_many0;
use nom::sequence::{delimited, pair, preceded, tuple};

use crate::errors::{CalcError, CalcResult};
use crate::expr::Expr;

/// Parse a complete expression string. `equation_id` is only used to label
/// the error; parse failures are catalog-authoring defects.
pub fn parse_expr(equation_id: &str, input: &str) -> CalcResult<Expr> {
    match all_consuming(ws(parse_add_sub))(input) {
        Ok((_, expr)) => Ok(expr),
        Err(e) => Err(CalcError::expression_parse(equation_id, format!("{e:?}"))),
    }
}

fn parse_add_sub(input: &str) -> IResult<&str, Expr, VerboseError<&str>> {
    let (rest, init) = parse_mul_div(input)?;
    fold_many0(
        pair(ws(alt((char('+'), char('-')))), parse_mul_div),
        move || init.clone(),
        |acc, (op, rhs)| match op {
            '+' => Expr::Add(acc.boxed(), rhs.boxed()),
            '-' => Expr::Sub(acc.boxed(), rhs.boxed()),
            _ => unreachable!(),
        },
    )(rest)
}

fn parse_mul_div(input: &str) -> IResult<&str, Expr, VerboseError<&str>> {
    let (rest, init) = parse_pow(input)?;
    fold_many0(
        pair(ws(alt((char('*'), char('/')))), parse_pow),
        move || init.clone(),
        |acc, (op, rhs)| match op {
            '*' => Expr::Mul(acc.boxed(), rhs.boxed()),
            '/' => Expr::Div(acc.boxed(), rhs.boxed()),
            _ => unreachable!(),
        },
    )(rest)
}

// Right-associative: a^b^c parses as a^(b^c).
fn parse_pow(input: &str) -> IResult<&str, Expr, VerboseError<&str>> {
    let (rest, base) = parse_unary(input)?;
    if let Ok((next, exp)) = preceded(ws(char('^')), parse_pow)(rest) {
        Ok((next, Expr::Pow(base.boxed(), exp.boxed())))
    } else {
        Ok((rest, base))
    }
}

fn parse_unary(input: &str) -> IResult<&str, Expr, VerboseError<&str>> {
    if let Ok((rest, expr)) = preceded(ws(char('-')), parse_unary)(input) {
        Ok((rest, Expr::Neg(expr.boxed())))
    } else {
        parse_primary(input)
    }
}

fn parse_primary(input: &str) -> IResult<&str, Expr, VerboseError<&str>> {
    alt((parse_parens, parse_function, parse_number, parse_identifier))(input)
}

fn parse_parens(input: &str) -> IResult<&str, Expr, VerboseError<&str>> {
    delimited(ws(char('(')), parse_add_sub, ws(char(')')))(input)
}

fn parse_number(input: &str) -> IResult<&str, Expr, VerboseError<&str>> {
    map(
        ws(recognize(alt((
            // 1.5 / 1.
            recognize(tuple((digit1, char('.'), digit0))),
            // .5
            recognize(pair(char('.'), digit1)),
            recognize(digit1),
        )))),
        |s: &str| Expr::Number(s.parse().unwrap_or(0.0)),
    )(input)
}

fn parse_identifier(input: &str) -> IResult<&str, Expr, VerboseError<&str>> {
    map(identifier, |s: &str| Expr::Variable(s.to_string()))(input)
}

// Unicode letter followed by letters, digits or underscores.
fn identifier(input: &str) -> IResult<&str, &str, VerboseError<&str>> {
    ws(recognize(pair(
        take_while1(|c: char| c.is_alphabetic()),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    )))(input)
}

fn parse_function(input: &str) -> IResult<&str, Expr, VerboseError<&str>> {
    // Function names require a parenthesized argument, so `sqrtx` still
    // parses as an identifier.
    let (rest, (name, arg)) = pair(
        ws(alt((tag("sqrt"), tag("log"), tag("exp")))),
        delimited(ws(char('(')), parse_add_sub, ws(char(')'))),
    )(input)?;

    let expr = match name {
        "sqrt" => Expr::Sqrt(arg.boxed()),
        "log" => Expr::Log(arg.boxed()),
        "exp" => Expr::Exp(arg.boxed()),
        _ => unreachable!(),
    };

    Ok((rest, expr))
}

fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O, VerboseError<&'a str>>
where
    F: FnMut(&'a str) -> IResult<&'a str, O, VerboseError<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}
