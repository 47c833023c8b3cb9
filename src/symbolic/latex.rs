//! LaTeX rendering of simplified expressions

use super::expr::{format_number, negated, Expr, Func};

/// Render `expr` as a LaTeX math fragment (no surrounding `$`)
pub fn to_latex(expr: &Expr) -> String {
    match expr {
        Expr::Const(c) => number(*c),
        Expr::Var(v) => v.name().to_string(),
        Expr::Add(terms) => sum(terms),
        Expr::Mul(factors) => product(factors),
        Expr::Pow(_, exp) if exp.as_const().is_some_and(|e| e < 0.0) => {
            product(std::slice::from_ref(expr))
        }
        Expr::Pow(base, exp) => power(base, exp),
        Expr::Call(func, arg) => call(*func, arg),
    }
}

fn number(c: f64) -> String {
    if c == std::f64::consts::PI {
        r"\pi".to_string()
    } else {
        format_number(c)
    }
}

fn sum(terms: &[Expr]) -> String {
    let mut out = String::new();
    for (i, term) in terms.iter().enumerate() {
        match (i, negated(term)) {
            (0, Some(pos)) => out.push_str(&format!("-{}", to_latex(&pos))),
            (0, None) => out.push_str(&to_latex(term)),
            (_, Some(pos)) => out.push_str(&format!(" - {}", to_latex(&pos))),
            (_, None) => out.push_str(&format!(" + {}", to_latex(term))),
        }
    }
    out
}

fn product(factors: &[Expr]) -> String {
    let (coeff, rest) = match factors.split_first() {
        Some((Expr::Const(c), rest)) => (*c, rest),
        _ => (1.0, factors),
    };

    let mut numerator: Vec<&Expr> = Vec::new();
    let mut denominator: Vec<Expr> = Vec::new();
    for factor in rest {
        match factor {
            Expr::Pow(base, exp) => match exp.as_const() {
                Some(e) if e < 0.0 => denominator.push(if e == -1.0 {
                    (**base).clone()
                } else {
                    Expr::Pow(base.clone(), Box::new(Expr::Const(-e)))
                }),
                _ => numerator.push(factor),
            },
            other => numerator.push(other),
        }
    }

    let mut top: Vec<String> = Vec::new();
    if coeff.abs() != 1.0 {
        top.push(number(coeff.abs()));
    }
    let grouped = numerator.len() + top.len() > 1;
    top.extend(numerator.iter().map(|f| factor(f, grouped)));
    let top = if top.is_empty() {
        "1".to_string()
    } else {
        top.join(" ")
    };

    let sign = if coeff < 0.0 { "-" } else { "" };
    if denominator.is_empty() {
        return format!("{sign}{top}");
    }
    let grouped = denominator.len() > 1;
    let bottom: Vec<String> = denominator.iter().map(|f| factor(f, grouped)).collect();
    format!(r"{sign}\frac{{{top}}}{{{}}}", bottom.join(" "))
}

/// A factor inside a product; sums are parenthesized when they share the product
fn factor(expr: &Expr, grouped: bool) -> String {
    match expr {
        Expr::Add(_) if grouped => paren(&to_latex(expr)),
        _ => to_latex(expr),
    }
}

fn power(base: &Expr, exp: &Expr) -> String {
    if exp.as_const() == Some(0.5) {
        return format!(r"\sqrt{{{}}}", to_latex(base));
    }
    let base = match base {
        Expr::Var(_) => to_latex(base),
        Expr::Const(c) if *c >= 0.0 => to_latex(base),
        _ => paren(&to_latex(base)),
    };
    format!("{base}^{{{}}}", to_latex(exp))
}

fn call(func: Func, arg: &Expr) -> String {
    let arg = to_latex(arg);
    match func {
        Func::Exp => format!("e^{{{arg}}}"),
        Func::Ln => format!(r"\ln{{\left({arg} \right)}}"),
        Func::Asinh => format!(r"\operatorname{{asinh}}{{\left({arg} \right)}}"),
    }
}

fn paren(inner: &str) -> String {
    format!(r"\left({inner}\right)")
}
