//! Symbolic differentiation

use super::expr::{Expr, Func, Variable};
use super::simplify::simplify;

/// Derivative of `expr` with respect to `var`, simplified
pub fn differentiate(expr: &Expr, var: Variable) -> Expr {
    simplify(&derive(expr, var))
}

fn derive(expr: &Expr, var: Variable) -> Expr {
    if !expr.contains_var(var) {
        return Expr::zero();
    }
    match expr {
        Expr::Const(_) => Expr::zero(),
        Expr::Var(v) => {
            if *v == var {
                Expr::one()
            } else {
                Expr::zero()
            }
        }
        Expr::Add(terms) => Expr::Add(terms.iter().map(|e| derive(e, var)).collect()),
        // product rule, one term per factor
        Expr::Mul(factors) => Expr::Add(
            (0..factors.len())
                .map(|i| {
                    let mut term = factors.clone();
                    term[i] = derive(&factors[i], var);
                    Expr::Mul(term)
                })
                .collect(),
        ),
        Expr::Pow(base, exp) => {
            let pow = expr.clone();
            match (base.contains_var(var), exp.contains_var(var)) {
                // d(u^n) = n·u^(n-1)·u'
                (true, false) => Expr::Mul(vec![
                    (**exp).clone(),
                    (**base).clone().pow(Expr::Add(vec![(**exp).clone(), Expr::Const(-1.0)])),
                    derive(base, var),
                ]),
                // d(a^v) = a^v·ln(a)·v'
                (false, true) => Expr::Mul(vec![pow, (**base).clone().ln(), derive(exp, var)]),
                // d(u^v) = u^v·(v'·ln(u) + v·u'/u)
                _ => Expr::Mul(vec![
                    pow,
                    Expr::Add(vec![
                        Expr::Mul(vec![derive(exp, var), (**base).clone().ln()]),
                        Expr::Mul(vec![
                            (**exp).clone(),
                            derive(base, var),
                            (**base).clone().recip(),
                        ]),
                    ]),
                ]),
            }
        }
        Expr::Call(func, arg) => {
            let inner = derive(arg, var);
            let outer = match func {
                Func::Exp => expr.clone(),
                Func::Ln => (**arg).clone().recip(),
                Func::Asinh => Expr::Add(vec![(**arg).clone().powf(2.0), Expr::one()]).powf(-0.5),
            };
            Expr::Mul(vec![outer, inner])
        }
    }
}
