//! Expression tree definitions and helpers.
//!
//! Catalog expressions are parsed once into this tree; both the symbolic
//! solver and the numeric evaluator walk it instead of re-reading text.

use std::collections::BTreeSet;
use std::fmt;

/// Algebraic expression over named variables and real literals.
///
/// The grammar is deliberately small: the catalog's empirical formulas only
/// combine terms with `+ - * / ^` and the unary functions `sqrt`, `log`
/// (natural) and `exp`. `Exp` is also what isolation produces when it
/// inverts `Log`.
#[derive(Clone, PartialEq, Debug)]
pub enum Expr {
    Number(f64),
    Variable(String),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
    Sqrt(Box<Expr>),
    Log(Box<Expr>),
    Exp(Box<Expr>),
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Variable(name.into())
    }

    pub fn number(value: f64) -> Self {
        Expr::Number(value)
    }

    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    pub fn as_variable(&self) -> Option<&str> {
        if let Expr::Variable(name) = self {
            Some(name)
        } else {
            None
        }
    }

    /// True if `name` occurs anywhere in the tree.
    pub fn contains_var(&self, name: &str) -> bool {
        self.count_var(name) > 0
    }

    /// Number of occurrences of `name` in the tree. The solver requires
    /// exactly one occurrence of the target to invert the relation.
    pub fn count_var(&self, name: &str) -> usize {
        match self {
            Expr::Number(_) => 0,
            Expr::Variable(v) => usize::from(v == name),
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Div(a, b)
            | Expr::Pow(a, b) => a.count_var(name) + b.count_var(name),
            Expr::Neg(a) | Expr::Sqrt(a) | Expr::Log(a) | Expr::Exp(a) => a.count_var(name),
        }
    }

    /// Collect the distinct variable names occurring in the tree.
    pub fn free_variables(&self) -> BTreeSet<String> {
        fn walk(expr: &Expr, out: &mut BTreeSet<String>) {
            match expr {
                Expr::Number(_) => {}
                Expr::Variable(v) => {
                    out.insert(v.clone());
                }
                Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Div(a, b)
                | Expr::Pow(a, b) => {
                    walk(a, out);
                    walk(b, out);
                }
                Expr::Neg(a) | Expr::Sqrt(a) | Expr::Log(a) | Expr::Exp(a) => walk(a, out),
            }
        }
        let mut out = BTreeSet::new();
        walk(self, &mut out);
        out
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::format::pretty(self))
    }
}

pub fn add(a: Expr, b: Expr) -> Expr {
    Expr::Add(a.boxed(), b.boxed())
}

pub fn sub(a: Expr, b: Expr) -> Expr {
    Expr::Sub(a.boxed(), b.boxed())
}

pub fn mul(a: Expr, b: Expr) -> Expr {
    Expr::Mul(a.boxed(), b.boxed())
}

pub fn div(a: Expr, b: Expr) -> Expr {
    Expr::Div(a.boxed(), b.boxed())
}

pub fn pow(base: Expr, exp: Expr) -> Expr {
    Expr::Pow(base.boxed(), exp.boxed())
}

pub fn neg(a: Expr) -> Expr {
    Expr::Neg(a.boxed())
}

pub fn sqrt(a: Expr) -> Expr {
    Expr::Sqrt(a.boxed())
}

pub fn log(a: Expr) -> Expr {
    Expr::Log(a.boxed())
}

pub fn exp(a: Expr) -> Expr {
    Expr::Exp(a.boxed())
}
