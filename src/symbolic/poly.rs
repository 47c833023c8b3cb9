//! Dense univariate polynomials with `f64` coefficients

use super::expr::{small_integer, Expr, Variable};

/// Coefficients in ascending order of degree; trailing zeros are trimmed
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

impl Polynomial {
    pub fn new(mut coeffs: Vec<f64>) -> Self {
        while coeffs.last() == Some(&0.0) {
            coeffs.pop();
        }
        Self { coeffs }
    }

    pub fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    pub fn constant(c: f64) -> Self {
        Self::new(vec![c])
    }

    pub fn one() -> Self {
        Self::constant(1.0)
    }

    /// `t + offset`
    pub fn shifted_identity(offset: f64) -> Self {
        Self::new(vec![offset, 1.0])
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Degree of the polynomial; the zero polynomial reports 0
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    pub fn coeff(&self, power: usize) -> f64 {
        self.coeffs.get(power).copied().unwrap_or(0.0)
    }

    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    pub fn leading(&self) -> f64 {
        self.coeffs.last().copied().unwrap_or(0.0)
    }

    pub fn eval(&self, t: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, c| acc * t + c)
    }

    pub fn add(&self, other: &Self) -> Self {
        let n = self.coeffs.len().max(other.coeffs.len());
        Self::new((0..n).map(|i| self.coeff(i) + other.coeff(i)).collect())
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.scale(-1.0))
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.coeffs.iter().map(|c| c * factor).collect())
    }

    pub fn mul(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let mut out = vec![0.0; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in other.coeffs.iter().enumerate() {
                out[i + j] += a * b;
            }
        }
        Self::new(out)
    }

    pub fn powi(&self, n: u32) -> Self {
        (0..n).fold(Self::one(), |acc, _| acc.mul(self))
    }

    pub fn derivative(&self) -> Self {
        Self::new(
            self.coeffs
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, c)| c * i as f64)
                .collect(),
        )
    }

    /// Antiderivative with zero constant term
    pub fn integral(&self) -> Self {
        let mut out = vec![0.0];
        out.extend(
            self.coeffs
                .iter()
                .enumerate()
                .map(|(i, c)| c / (i as f64 + 1.0)),
        );
        Self::new(out)
    }

    /// Long division: `self = quotient * divisor + remainder`, `deg remainder < deg divisor`.
    /// Returns `None` for a zero divisor.
    pub fn div_rem(&self, divisor: &Self) -> Option<(Self, Self)> {
        if divisor.is_zero() {
            return None;
        }
        let d = divisor.degree();
        if self.is_zero() || self.degree() < d {
            return Some((Self::zero(), self.clone()));
        }

        let lead = divisor.leading();
        let mut rem = self.coeffs.clone();
        let mut quot = vec![0.0; self.degree() - d + 1];
        for k in (0..quot.len()).rev() {
            let q = rem[k + d] / lead;
            quot[k] = q;
            for (j, c) in divisor.coeffs.iter().enumerate() {
                rem[k + j] -= q * c;
            }
        }
        rem.truncate(d);
        Some((Self::new(quot), Self::new(rem)))
    }

    /// Read a polynomial in `var` out of an expression, if it is one
    pub fn from_expr(expr: &Expr, var: Variable) -> Option<Self> {
        match expr {
            Expr::Const(c) => Some(Self::constant(*c)),
            Expr::Var(v) if *v == var => Some(Self::new(vec![0.0, 1.0])),
            Expr::Var(_) => None,
            Expr::Add(terms) => terms
                .iter()
                .try_fold(Self::zero(), |acc, e| Some(acc.add(&Self::from_expr(e, var)?))),
            Expr::Mul(factors) => factors
                .iter()
                .try_fold(Self::one(), |acc, e| Some(acc.mul(&Self::from_expr(e, var)?))),
            Expr::Pow(base, exp) => {
                let n = small_integer(exp.as_const()?)?;
                if !(0..=64).contains(&n) {
                    return None;
                }
                Some(Self::from_expr(base, var)?.powi(n as u32))
            }
            Expr::Call(..) => None,
        }
    }

    /// Expression form, highest degree first
    pub fn to_expr(&self, var: Variable) -> Expr {
        let terms: Vec<Expr> = self
            .coeffs
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, c)| **c != 0.0)
            .map(|(i, c)| match i {
                0 => Expr::Const(*c),
                1 => Expr::Mul(vec![Expr::Const(*c), Expr::Var(var)]),
                _ => Expr::Mul(vec![Expr::Const(*c), Expr::Var(var).powf(i as f64)]),
            })
            .collect();
        Expr::Add(terms).simplified()
    }
}
