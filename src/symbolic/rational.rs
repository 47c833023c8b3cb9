//! Rational functions over linear factors and their partial-fraction decomposition
//!
//! A rational function here is `N(t) / Π (t + a_i)^m_i`. The decomposition is
//!
//! ```text
//! N / D = Q(t) + Σ_i Σ_{k=1..m_i} A_ik / (t + a_i)^k
//! ```
//!
//! where `Q` is the polynomial quotient. The `A_ik` are found by matching the
//! coefficients of `R = N - Q·D` against `Σ A_ik · D / (t + a_i)^k`, a square linear
//! system of size `deg D`.

use nalgebra::{DMatrix, DVector};

use super::expr::{small_integer, Expr, Variable};
use super::poly::Polynomial;
use crate::error::CalculusError;

/// Decomposition coefficients below this magnitude are treated as exact zeros
const COEFFICIENT_EPSILON: f64 = 1e-12;

/// Relative distance below which two factor offsets are the same pole
const OFFSET_TOLERANCE: f64 = 1e-8;

fn same_offset(a: f64, b: f64) -> bool {
    (a - b).abs() <= OFFSET_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

/// `(t + offset)^multiplicity`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFactor {
    pub offset: f64,
    pub multiplicity: u32,
}

impl LinearFactor {
    pub fn polynomial(&self) -> Polynomial {
        Polynomial::shifted_identity(self.offset).powi(self.multiplicity)
    }

    /// The pole, `-offset`
    pub fn root(&self) -> f64 {
        -self.offset
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RationalFunction {
    numerator: Polynomial,
    denominator: Vec<LinearFactor>,
    var: Variable,
}

impl RationalFunction {
    /// Build from a numerator and linear factors. Factors whose offsets agree to
    /// within a relative `1e-8` are merged into one repeated factor at the first offset.
    pub fn new(numerator: Polynomial, factors: Vec<LinearFactor>, var: Variable) -> Self {
        let mut denominator: Vec<LinearFactor> = Vec::with_capacity(factors.len());
        for factor in factors {
            match denominator
                .iter_mut()
                .find(|f| same_offset(f.offset, factor.offset))
            {
                Some(existing) => existing.multiplicity += factor.multiplicity,
                None => denominator.push(factor),
            }
        }
        Self {
            numerator,
            denominator,
            var,
        }
    }

    /// Recognize a simplified product of polynomials and negative integer powers of
    /// linear polynomials. Returns `None` for anything else, including expressions
    /// without a denominator.
    pub fn from_expr(expr: &Expr, var: Variable) -> Option<Self> {
        let factors: Vec<&Expr> = match expr {
            Expr::Mul(factors) => factors.iter().collect(),
            other => vec![other],
        };

        let mut numerator = Polynomial::one();
        let mut denominator = Vec::new();
        for factor in factors {
            if let Expr::Pow(base, exp) = factor {
                let power = exp.as_const().and_then(small_integer);
                if let Some(n) = power.filter(|n| *n < 0) {
                    let linear = Polynomial::from_expr(base, var)?;
                    if linear.degree() != 1 {
                        return None;
                    }
                    // (s·t + c)^n = s^n · (t + c/s)^n
                    let slope = linear.coeff(1);
                    numerator = numerator.scale(slope.powi(n));
                    denominator.push(LinearFactor {
                        offset: linear.coeff(0) / slope,
                        multiplicity: n.unsigned_abs(),
                    });
                    continue;
                }
            }
            numerator = numerator.mul(&Polynomial::from_expr(factor, var)?);
        }

        if denominator.is_empty() {
            return None;
        }
        Some(Self::new(numerator, denominator, var))
    }

    pub fn numerator(&self) -> &Polynomial {
        &self.numerator
    }

    pub fn factors(&self) -> &[LinearFactor] {
        &self.denominator
    }

    pub fn denominator_polynomial(&self) -> Polynomial {
        self.denominator
            .iter()
            .fold(Polynomial::one(), |acc, f| acc.mul(&f.polynomial()))
    }

    pub fn eval(&self, t: f64) -> f64 {
        self.numerator.eval(t) / self.denominator_polynomial().eval(t)
    }

    pub fn to_expr(&self) -> Expr {
        let mut factors = vec![self.numerator.to_expr(self.var)];
        for factor in &self.denominator {
            factors.push(
                Polynomial::shifted_identity(factor.offset)
                    .to_expr(self.var)
                    .powf(-(factor.multiplicity as f64)),
            );
        }
        Expr::Mul(factors).simplified()
    }

    /// Equality as rational functions, by cross-multiplication
    pub fn equivalent(&self, other: &Self, tolerance: f64) -> bool {
        let lhs = self.numerator.mul(&other.denominator_polynomial());
        let rhs = other.numerator.mul(&self.denominator_polynomial());
        let n = lhs.coeffs().len().max(rhs.coeffs().len());
        let magnitude = (0..n)
            .map(|i| lhs.coeff(i).abs().max(rhs.coeff(i).abs()))
            .fold(1.0, f64::max);
        (0..n).all(|i| (lhs.coeff(i) - rhs.coeff(i)).abs() <= tolerance * magnitude)
    }

    /// Numerators `D / (t + a)^k` for every unknown, in factor order
    fn basis(&self) -> Vec<(LinearFactor, u32, Polynomial)> {
        let mut basis = Vec::new();
        for (i, factor) in self.denominator.iter().enumerate() {
            let others = self
                .denominator
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .fold(Polynomial::one(), |acc, (_, f)| acc.mul(&f.polynomial()));
            for k in 1..=factor.multiplicity {
                let own = Polynomial::shifted_identity(factor.offset).powi(factor.multiplicity - k);
                basis.push((*factor, k, others.mul(&own)));
            }
        }
        basis
    }

    pub fn decompose(&self) -> Result<PartialFractions, CalculusError> {
        let denominator = self.denominator_polynomial();
        let (quotient, remainder) = self
            .numerator
            .div_rem(&denominator)
            .ok_or_else(|| CalculusError::integration(self.to_expr(), "zero denominator"))?;

        let basis = self.basis();
        let n = denominator.degree();
        let matrix = DMatrix::from_fn(n, n, |row, col| basis[col].2.coeff(row));
        let rhs = DVector::from_fn(n, |row, _| remainder.coeff(row));
        let solution = matrix.lu().solve(&rhs).ok_or_else(|| {
            CalculusError::integration(self.to_expr(), "singular partial-fraction system")
        })?;

        let terms = basis
            .iter()
            .zip(solution.iter())
            .filter(|(_, c)| c.abs() >= COEFFICIENT_EPSILON)
            .map(|((factor, k, _), c)| PartialFractionTerm {
                coefficient: *c,
                offset: factor.offset,
                power: *k,
            })
            .collect();

        Ok(PartialFractions {
            polynomial: quotient,
            terms,
            denominator: self.denominator.clone(),
            var: self.var,
        })
    }
}

/// `coefficient / (t + offset)^power`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartialFractionTerm {
    pub coefficient: f64,
    pub offset: f64,
    pub power: u32,
}

impl PartialFractionTerm {
    fn to_expr(self, var: Variable) -> Expr {
        Expr::Mul(vec![
            Expr::Const(self.coefficient),
            Polynomial::shifted_identity(self.offset)
                .to_expr(var)
                .powf(-(self.power as f64)),
        ])
    }

    fn antiderivative(self, var: Variable) -> Expr {
        let base = Polynomial::shifted_identity(self.offset).to_expr(var);
        if self.power == 1 {
            Expr::Mul(vec![Expr::Const(self.coefficient), base.ln()])
        } else {
            let lifted = 1.0 - self.power as f64;
            Expr::Mul(vec![
                Expr::Const(self.coefficient / lifted),
                base.powf(lifted),
            ])
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartialFractions {
    pub polynomial: Polynomial,
    pub terms: Vec<PartialFractionTerm>,
    denominator: Vec<LinearFactor>,
    var: Variable,
}

impl PartialFractions {
    /// Sum of the polynomial part and the simple fractions, in factor order
    pub fn to_expr(&self) -> Expr {
        let mut parts = vec![self.polynomial.to_expr(self.var)];
        parts.extend(self.terms.iter().map(|term| term.to_expr(self.var)));
        Expr::Add(parts).simplified()
    }

    /// Combine the terms back over the common denominator
    pub fn recombine(&self) -> RationalFunction {
        let common = RationalFunction::new(Polynomial::zero(), self.denominator.clone(), self.var);
        let mut numerator = self.polynomial.mul(&common.denominator_polynomial());
        for (factor, k, basis) in common.basis() {
            let coefficient = self
                .terms
                .iter()
                .find(|term| term.offset == factor.offset && term.power == k)
                .map_or(0.0, |term| term.coefficient);
            numerator = numerator.add(&basis.scale(coefficient));
        }
        RationalFunction::new(numerator, self.denominator.clone(), self.var)
    }

    /// Term-by-term antiderivative: log terms for simple poles, power terms otherwise
    pub fn antiderivative(&self) -> Expr {
        let mut parts = vec![self.polynomial.integral().to_expr(self.var)];
        parts.extend(self.terms.iter().map(|term| term.antiderivative(self.var)));
        Expr::Add(parts).simplified()
    }
}
