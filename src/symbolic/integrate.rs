//! Closed-form integration for the expression families used by the catalog
//!
//! # Rules
//!
//! ```text
//! ∫ c dt              = c·t
//! ∫ (a·t + b)^n dt    = (a·t + b)^(n+1) / ((n+1)·a)        n ≠ -1
//! ∫ (a·t + b)^-1 dt   = ln(a·t + b) / a
//! ∫ P(t)·e^u dt       = e^u · Σ_j (-1)^j P^(j)(t) / a^(j+1)   u = a·t + b
//! ∫ N(t)/D(t) dt      = partial fractions, then the rules above
//! ∫ √(q·u² + k) dt    = u·√(q·u² + k)/2 + k/(2√q)·asinh(√(q/k)·u)   u = t + r/(2q)
//! ```
//!
//! plus linearity. The `ln` rule drops the absolute value: every linear base the
//! catalog produces is positive on `t >= 0`.

use super::expr::{Expr, Func, Variable};
use super::poly::Polynomial;
use super::rational::RationalFunction;
use super::simplify::simplify;
use crate::error::CalculusError;

/// Antiderivative with zero integration constant
pub fn antiderivative(expr: &Expr, var: Variable) -> Result<Expr, CalculusError> {
    let expr = simplify(expr);
    integrate(&expr, var)
        .map(|e| simplify(&e))
        .ok_or_else(|| CalculusError::integration(&expr, "no closed-form rule applies"))
}

/// `F(upper) - F(lower)` for the closed-form antiderivative `F`
pub fn definite_integral(
    expr: &Expr,
    var: Variable,
    lower: f64,
    upper: f64,
) -> Result<f64, CalculusError> {
    let f = antiderivative(expr, var)?;
    let at_upper = finite_at(&f, upper)?;
    let at_lower = finite_at(&f, lower)?;
    Ok(at_upper - at_lower)
}

fn finite_at(f: &Expr, t: f64) -> Result<f64, CalculusError> {
    let value = f.eval(t);
    if value.is_finite() {
        Ok(value)
    } else {
        tracing::error!(t, value, antiderivative = %f, "antiderivative is not finite");
        Err(CalculusError::NumericDomainError { at: t, value })
    }
}

fn integrate(expr: &Expr, var: Variable) -> Option<Expr> {
    if !expr.contains_var(var) {
        return Some(Expr::Mul(vec![expr.clone(), Expr::Var(var)]));
    }
    match expr {
        Expr::Var(_) => Some(Expr::Mul(vec![
            Expr::Const(0.5),
            Expr::Var(var).powf(2.0),
        ])),
        Expr::Add(terms) => terms
            .iter()
            .map(|term| integrate(term, var))
            .collect::<Option<Vec<_>>>()
            .map(Expr::Add),
        Expr::Mul(factors) => {
            let (mut constant, varying): (Vec<Expr>, Vec<Expr>) =
                factors.iter().cloned().partition(|f| !f.contains_var(var));
            if constant.is_empty() {
                return integrate_product(expr, &varying, var);
            }
            let rest = match <[Expr; 1]>::try_from(varying) {
                Ok([single]) => single,
                Err(varying) => Expr::Mul(varying),
            };
            constant.push(integrate(&rest, var)?);
            Some(Expr::Mul(constant))
        }
        Expr::Pow(base, exp) if !exp.contains_var(var) => {
            integrate_power(expr, base, exp.as_const()?, var)
        }
        Expr::Call(Func::Exp, arg) => {
            let slope = linear_slope(arg, var)?;
            Some(Expr::Mul(vec![Expr::Const(1.0 / slope), expr.clone()]))
        }
        _ => None,
    }
}

/// Slope `a` when `expr` is `a·t + b` with `a ≠ 0`
fn linear_slope(expr: &Expr, var: Variable) -> Option<f64> {
    let p = Polynomial::from_expr(expr, var)?;
    (p.degree() == 1).then(|| p.coeff(1))
}

fn integrate_power(expr: &Expr, base: &Expr, n: f64, var: Variable) -> Option<Expr> {
    if let Some(p) = Polynomial::from_expr(base, var) {
        match p.degree() {
            1 => {
                let slope = p.coeff(1);
                return Some(if n == -1.0 {
                    Expr::Mul(vec![Expr::Const(1.0 / slope), base.clone().ln()])
                } else {
                    Expr::Mul(vec![
                        Expr::Const(1.0 / ((n + 1.0) * slope)),
                        base.clone().powf(n + 1.0),
                    ])
                });
            }
            2 if n == 0.5 => return sqrt_of_quadratic(base, &p, var),
            _ => {}
        }
    }
    integrate_rational(expr, var)
}

fn integrate_rational(expr: &Expr, var: Variable) -> Option<Expr> {
    let rational = RationalFunction::from_expr(expr, var)?;
    match rational.decompose() {
        Ok(fractions) => Some(fractions.antiderivative()),
        Err(err) => {
            tracing::debug!(%err, "partial fractions unavailable");
            None
        }
    }
}

/// `∫ √(q·t² + r·t + p) dt` after completing the square
fn sqrt_of_quadratic(radicand: &Expr, p: &Polynomial, var: Variable) -> Option<Expr> {
    let q = p.coeff(2);
    if q <= 0.0 {
        return None;
    }
    let shift = p.coeff(1) / (2.0 * q);
    let k = p.coeff(0) - q * shift * shift;
    if k <= 0.0 {
        return None;
    }

    let u = Polynomial::shifted_identity(shift).to_expr(var);
    Some(Expr::Add(vec![
        Expr::Mul(vec![Expr::Const(0.5), u.clone(), radicand.clone().sqrt()]),
        Expr::Mul(vec![
            Expr::Const(k / (2.0 * q.sqrt())),
            Expr::Mul(vec![Expr::Const((q / k).sqrt()), u]).asinh(),
        ]),
    ]))
}

/// Products without constant factors: rational functions, or a polynomial times
/// one exponential of a linear argument (integration by parts, closed form).
fn integrate_product(expr: &Expr, factors: &[Expr], var: Variable) -> Option<Expr> {
    if let Some(result) = integrate_rational(expr, var) {
        return Some(result);
    }

    let (exps, others): (Vec<&Expr>, Vec<&Expr>) = factors
        .iter()
        .partition(|f| matches!(f, Expr::Call(Func::Exp, _)));
    let [exponential] = exps.as_slice() else {
        return None;
    };
    let Expr::Call(_, arg) = exponential else {
        return None;
    };
    let a = linear_slope(arg, var)?;
    let poly = Polynomial::from_expr(&Expr::Mul(others.into_iter().cloned().collect()), var)?;

    let mut antiderivative = Polynomial::zero();
    let mut derivative = poly;
    let mut sign = 1.0;
    let mut j = 1;
    while !derivative.is_zero() {
        antiderivative = antiderivative.add(&derivative.scale(sign / a.powi(j)));
        derivative = derivative.derivative();
        sign = -sign;
        j += 1;
    }

    Some(Expr::Mul(vec![
        antiderivative.to_expr(var),
        (*exponential).clone(),
    ]))
}
