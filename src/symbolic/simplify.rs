//! Algebraic simplification into canonical form
//!
//! The rules are the ones the catalog needs and nothing more: constant folding,
//! flattening, collecting like terms and powers, and pushing constant exponents
//! through products and nested powers. Rewrites such as `(x^a)^b = x^(ab)` assume
//! non-negative bases, which holds on the time domain `t >= 0` for every model.

use super::expr::{small_integer, Expr, Func};

pub fn simplify(expr: &Expr) -> Expr {
    match expr {
        Expr::Const(_) | Expr::Var(_) => expr.clone(),
        Expr::Add(terms) => simplify_sum(terms.iter().map(simplify).collect()),
        Expr::Mul(factors) => simplify_product(factors.iter().map(simplify).collect()),
        Expr::Pow(base, exp) => simplify_power(simplify(base), simplify(exp)),
        Expr::Call(func, arg) => simplify_call(*func, simplify(arg)),
    }
}

/// Sum of already simplified terms
fn simplify_sum(terms: Vec<Expr>) -> Expr {
    let mut constant = 0.0;
    // (term without coefficient, accumulated coefficient), in order of first appearance
    let mut collected: Vec<(Expr, f64)> = Vec::new();

    for term in flatten_sum(terms) {
        match term {
            Expr::Const(c) => constant += c,
            other => {
                let (coeff, rest) = split_coefficient(other);
                match collected.iter_mut().find(|(r, _)| *r == rest) {
                    Some(entry) => entry.1 += coeff,
                    None => collected.push((rest, coeff)),
                }
            }
        }
    }

    let mut out: Vec<Expr> = collected
        .into_iter()
        .filter(|(_, coeff)| *coeff != 0.0)
        .map(|(rest, coeff)| scale(rest, coeff))
        .collect();
    if constant != 0.0 {
        out.push(Expr::Const(constant));
    }

    match out.len() {
        0 => Expr::zero(),
        1 => out.remove(0),
        _ => Expr::Add(out),
    }
}

fn flatten_sum(terms: Vec<Expr>) -> Vec<Expr> {
    let mut flat = Vec::with_capacity(terms.len());
    for term in terms {
        match term {
            Expr::Add(inner) => flat.extend(inner),
            other => flat.push(other),
        }
    }
    flat
}

/// Product of already simplified factors
fn simplify_product(factors: Vec<Expr>) -> Expr {
    let mut coeff = 1.0;
    // (base, exponent), in order of first appearance
    let mut powers: Vec<(Expr, Expr)> = Vec::new();

    for factor in flatten_product(factors) {
        match factor {
            Expr::Const(c) => coeff *= c,
            Expr::Pow(base, exp) => push_power(&mut powers, *base, *exp),
            other => push_power(&mut powers, other, Expr::one()),
        }
    }

    if coeff == 0.0 {
        return Expr::zero();
    }

    let mut out = Vec::with_capacity(powers.len() + 1);
    for (base, exp) in powers {
        match simplify_power(base, exp) {
            Expr::Const(c) => coeff *= c,
            Expr::Mul(inner) => {
                for factor in inner {
                    match factor {
                        Expr::Const(c) => coeff *= c,
                        other => out.push(other),
                    }
                }
            }
            other => out.push(other),
        }
    }

    if coeff == 0.0 {
        return Expr::zero();
    }
    if out.is_empty() {
        return Expr::Const(coeff);
    }
    if coeff != 1.0 {
        out.insert(0, Expr::Const(coeff));
    }
    match out.len() {
        1 => out.remove(0),
        _ => Expr::Mul(out),
    }
}

fn flatten_product(factors: Vec<Expr>) -> Vec<Expr> {
    let mut flat = Vec::with_capacity(factors.len());
    for factor in factors {
        match factor {
            Expr::Mul(inner) => flat.extend(inner),
            other => flat.push(other),
        }
    }
    flat
}

fn push_power(powers: &mut Vec<(Expr, Expr)>, base: Expr, exp: Expr) {
    match powers.iter_mut().find(|(b, _)| *b == base) {
        Some(entry) => {
            let existing = std::mem::replace(&mut entry.1, Expr::zero());
            entry.1 = simplify_sum(vec![existing, exp]);
        }
        None => powers.push((base, exp)),
    }
}

fn simplify_power(base: Expr, exp: Expr) -> Expr {
    let Some(e) = exp.as_const() else {
        return Expr::Pow(Box::new(base), Box::new(exp));
    };
    if e == 0.0 {
        return Expr::one();
    }
    if e == 1.0 {
        return base;
    }

    match base {
        Expr::Const(b) => {
            if b == 1.0 {
                return Expr::one();
            }
            let value = b.powf(e);
            if value.is_finite() && (b >= 0.0 || small_integer(e).is_some()) {
                Expr::Const(value)
            } else {
                Expr::Pow(Box::new(Expr::Const(b)), Box::new(exp))
            }
        }
        Expr::Pow(inner, inner_exp) => match inner_exp.as_const() {
            Some(ie) => simplify_power(*inner, Expr::Const(ie * e)),
            None => Expr::Pow(Box::new(Expr::Pow(inner, inner_exp)), Box::new(exp)),
        },
        Expr::Mul(factors) if distributes(&factors, e) => simplify_product(
            factors
                .into_iter()
                .map(|f| Expr::Pow(Box::new(f), Box::new(Expr::Const(e))))
                .collect(),
        ),
        other => Expr::Pow(Box::new(other), Box::new(exp)),
    }
}

/// `(a*b)^e = a^e * b^e` is safe for integer `e`, or when every constant factor is
/// non-negative (the remaining factors are non-negative on the time domain).
fn distributes(factors: &[Expr], e: f64) -> bool {
    small_integer(e).is_some()
        || factors
            .iter()
            .all(|f| f.as_const().map_or(true, |c| c >= 0.0))
}

fn simplify_call(func: Func, arg: Expr) -> Expr {
    match (func, arg.as_const()) {
        (_, Some(c)) if func.apply(c).is_finite() => Expr::Const(func.apply(c)),
        // ln(exp(x)) = x
        (Func::Ln, None) => match arg {
            Expr::Call(Func::Exp, inner) => *inner,
            other => Expr::Call(Func::Ln, Box::new(other)),
        },
        _ => Expr::Call(func, Box::new(arg)),
    }
}

/// Split a simplified term into its numeric coefficient and the remaining factors
pub(crate) fn split_coefficient(term: Expr) -> (f64, Expr) {
    match term {
        Expr::Mul(mut factors) => match factors.first() {
            Some(Expr::Const(c)) => {
                let c = *c;
                factors.remove(0);
                let rest = match factors.len() {
                    1 => factors.remove(0),
                    _ => Expr::Mul(factors),
                };
                (c, rest)
            }
            _ => (1.0, Expr::Mul(factors)),
        },
        other => (1.0, other),
    }
}

fn scale(rest: Expr, coeff: f64) -> Expr {
    if coeff == 1.0 {
        return rest;
    }
    match rest {
        Expr::Mul(mut factors) => {
            factors.insert(0, Expr::Const(coeff));
            Expr::Mul(factors)
        }
        other => Expr::Mul(vec![Expr::Const(coeff), other]),
    }
}
