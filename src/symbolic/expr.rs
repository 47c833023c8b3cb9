//! Expression tree for single-variable models
//!
//! Expressions are kept in a canonical shape once simplified:
//! - sums and products are n-ary and flattened
//! - subtraction is a sum with a `-1` coefficient
//! - division is a product with a negative power
//! - a product carries at most one numeric coefficient, in first position

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use super::simplify::simplify;

/// A named free variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variable(&'static str);

impl Variable {
    pub const fn new(name: &'static str) -> Self {
        Variable(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

/// Elapsed time. Every model in the catalog is a function of `t >= 0` only.
pub const TIME: Variable = Variable::new("t");

/// Elementary functions understood by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Func {
    Exp,
    Ln,
    Asinh,
}

impl Func {
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Func::Exp => x.exp(),
            Func::Ln => x.ln(),
            Func::Asinh => x.asinh(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Func::Exp => "exp",
            Func::Ln => "ln",
            Func::Asinh => "asinh",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Const(f64),
    Var(Variable),
    Add(Vec<Expr>),
    Mul(Vec<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Call(Func, Box<Expr>),
}

impl Expr {
    pub fn constant(value: f64) -> Self {
        Expr::Const(value)
    }

    pub fn var(var: Variable) -> Self {
        Expr::Var(var)
    }

    pub fn zero() -> Self {
        Expr::Const(0.0)
    }

    pub fn one() -> Self {
        Expr::Const(1.0)
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(c) if *c == 0.0)
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Const(c) if *c == 1.0)
    }

    pub fn as_const(&self) -> Option<f64> {
        match self {
            Expr::Const(c) => Some(*c),
            _ => None,
        }
    }

    /// Whether `var` occurs anywhere in the tree
    pub fn contains_var(&self, var: Variable) -> bool {
        match self {
            Expr::Const(_) => false,
            Expr::Var(v) => *v == var,
            Expr::Add(terms) | Expr::Mul(terms) => terms.iter().any(|e| e.contains_var(var)),
            Expr::Pow(base, exp) => base.contains_var(var) || exp.contains_var(var),
            Expr::Call(_, arg) => arg.contains_var(var),
        }
    }

    pub fn pow(self, exp: Expr) -> Expr {
        Expr::Pow(Box::new(self), Box::new(exp))
    }

    pub fn powf(self, exp: f64) -> Expr {
        self.pow(Expr::Const(exp))
    }

    pub fn sqrt(self) -> Expr {
        self.powf(0.5)
    }

    pub fn recip(self) -> Expr {
        self.powf(-1.0)
    }

    pub fn exp(self) -> Expr {
        Expr::Call(Func::Exp, Box::new(self))
    }

    pub fn ln(self) -> Expr {
        Expr::Call(Func::Ln, Box::new(self))
    }

    pub fn asinh(self) -> Expr {
        Expr::Call(Func::Asinh, Box::new(self))
    }

    /// Canonical simplified form of this expression
    pub fn simplified(&self) -> Expr {
        simplify(self)
    }

    /// Evaluate with every variable bound to `t`
    pub fn eval(&self, t: f64) -> f64 {
        match self {
            Expr::Const(c) => *c,
            Expr::Var(_) => t,
            Expr::Add(terms) => terms.iter().map(|e| e.eval(t)).sum(),
            Expr::Mul(factors) => factors.iter().map(|e| e.eval(t)).product(),
            Expr::Pow(base, exp) => power(base.eval(t), exp.eval(t)),
            Expr::Call(func, arg) => func.apply(arg.eval(t)),
        }
    }
}

/// `base^exp` with the special cases shared by the tree evaluator and the bytecode VM
pub(crate) fn power(base: f64, exp: f64) -> f64 {
    if exp == 0.5 {
        base.sqrt()
    } else if exp == -1.0 {
        1.0 / base
    } else if let Some(n) = small_integer(exp) {
        base.powi(n)
    } else {
        base.powf(exp)
    }
}

pub(crate) fn small_integer(x: f64) -> Option<i32> {
    if x.fract() == 0.0 && x.abs() <= i32::MAX as f64 {
        Some(x as i32)
    } else {
        None
    }
}

/// Format a number the way it is displayed in expressions: integers without a
/// decimal point, everything else with at most four decimals.
pub fn format_number(x: f64) -> String {
    if x == 0.0 {
        return "0".to_string();
    }
    if x.fract() == 0.0 && x.abs() < 1e15 {
        return format!("{:.0}", x);
    }
    let text = format!("{:.4}", x);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

// ============================================================================
// Operator sugar (builds unsimplified trees)
// ============================================================================

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Const(value)
    }
}

impl From<Variable> for Expr {
    fn from(var: Variable) -> Self {
        Expr::Var(var)
    }
}

impl Add for Expr {
    type Output = Expr;
    fn add(self, rhs: Expr) -> Expr {
        Expr::Add(vec![self, rhs])
    }
}

impl Sub for Expr {
    type Output = Expr;
    fn sub(self, rhs: Expr) -> Expr {
        Expr::Add(vec![self, -rhs])
    }
}

impl Mul for Expr {
    type Output = Expr;
    fn mul(self, rhs: Expr) -> Expr {
        Expr::Mul(vec![self, rhs])
    }
}

impl Div for Expr {
    type Output = Expr;
    fn div(self, rhs: Expr) -> Expr {
        Expr::Mul(vec![self, rhs.recip()])
    }
}

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::Mul(vec![Expr::Const(-1.0), self])
    }
}

// ============================================================================
// Plain-text display
// ============================================================================

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(c) if *c == std::f64::consts::PI => write!(f, "pi"),
            Expr::Const(c) => write!(f, "{}", format_number(*c)),
            Expr::Var(v) => write!(f, "{}", v.name()),
            Expr::Add(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    match (i, negated(term)) {
                        (0, Some(pos)) => write!(f, "-{}", Grouped(&pos))?,
                        (0, None) => write!(f, "{}", term)?,
                        (_, Some(pos)) => write!(f, " - {}", Grouped(&pos))?,
                        (_, None) => write!(f, " + {}", term)?,
                    }
                }
                Ok(())
            }
            Expr::Mul(factors) => {
                for (i, factor) in factors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "*")?;
                    }
                    write!(f, "{}", Grouped(factor))?;
                }
                Ok(())
            }
            Expr::Pow(base, exp) => match exp.as_const() {
                Some(e) if e == 0.5 => write!(f, "sqrt({})", base),
                _ => write!(f, "{}^{}", Grouped(base), Grouped(exp)),
            },
            Expr::Call(func, arg) => write!(f, "{}({})", func.name(), arg),
        }
    }
}

/// Parenthesizes compound expressions
struct Grouped<'a>(&'a Expr);

impl fmt::Display for Grouped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Expr::Add(_) | Expr::Mul(_) => write!(f, "({})", self.0),
            Expr::Const(c) if *c < 0.0 => write!(f, "({})", self.0),
            Expr::Pow(_, exp) if exp.as_const() != Some(0.5) => write!(f, "({})", self.0),
            other => write!(f, "{}", other),
        }
    }
}

/// If `term` carries a negative leading coefficient, the same term with it flipped
pub(crate) fn negated(term: &Expr) -> Option<Expr> {
    match term {
        Expr::Const(c) if *c < 0.0 => Some(Expr::Const(-c)),
        Expr::Mul(factors) => match factors.first() {
            Some(Expr::Const(c)) if *c < 0.0 => {
                let mut flipped = factors.clone();
                flipped[0] = Expr::Const(-c);
                if flipped[0].is_one() {
                    flipped.remove(0);
                }
                Some(match flipped.len() {
                    1 => flipped.remove(0),
                    _ => Expr::Mul(flipped),
                })
            }
            _ => None,
        },
        _ => None,
    }
}
