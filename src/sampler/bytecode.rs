//! Stack-machine compilation of expressions for repeated numeric evaluation

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::symbolic::expr::{power, small_integer, Expr, Func};

/// Arrays at least this long are evaluated on the rayon pool
const PARALLEL_THRESHOLD: usize = 4096;

/// Stack machine instruction set for compiled expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Opcode {
    // stack and constants
    PushConst(f64),
    LoadT,

    // arithmetic
    Add,
    Mul,
    Recip,
    Powi(i32),
    Powf(f64),
    Sqrt,
    /// base and exponent both on the stack
    Pow,

    // elementary functions
    Exp,
    Ln,
    Asinh,
}

/// An expression compiled to bytecode, callable at any `t`
///
/// Evaluation follows the same operation order and power special cases as
/// [`Expr::eval`], so both agree bit for bit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericFunction {
    code: Vec<Opcode>,
    stack_depth: usize,
}

/// Compile `expr` into a [`NumericFunction`]; every variable reads `t`
pub fn to_numeric_function(expr: &Expr) -> NumericFunction {
    let mut code = Vec::new();
    let stack_depth = emit(expr, &mut code);
    NumericFunction { code, stack_depth }
}

/// Emit code for `expr` and return the stack depth it needs
fn emit(expr: &Expr, code: &mut Vec<Opcode>) -> usize {
    match expr {
        Expr::Const(c) => {
            code.push(Opcode::PushConst(*c));
            1
        }
        Expr::Var(_) => {
            code.push(Opcode::LoadT);
            1
        }
        Expr::Add(terms) => emit_fold(terms, 0.0, Opcode::Add, code),
        Expr::Mul(factors) => emit_fold(factors, 1.0, Opcode::Mul, code),
        Expr::Pow(base, exp) => {
            let depth = emit(base, code);
            match exp.as_const() {
                Some(e) if e == 0.5 => code.push(Opcode::Sqrt),
                Some(e) if e == -1.0 => code.push(Opcode::Recip),
                Some(e) => match small_integer(e) {
                    Some(n) => code.push(Opcode::Powi(n)),
                    None => code.push(Opcode::Powf(e)),
                },
                None => {
                    let exp_depth = emit(exp, code);
                    code.push(Opcode::Pow);
                    return depth.max(exp_depth + 1);
                }
            }
            depth
        }
        Expr::Call(func, arg) => {
            let depth = emit(arg, code);
            code.push(match func {
                Func::Exp => Opcode::Exp,
                Func::Ln => Opcode::Ln,
                Func::Asinh => Opcode::Asinh,
            });
            depth
        }
    }
}

fn emit_fold(items: &[Expr], identity: f64, op: Opcode, code: &mut Vec<Opcode>) -> usize {
    let Some((first, rest)) = items.split_first() else {
        code.push(Opcode::PushConst(identity));
        return 1;
    };
    let mut depth = emit(first, code);
    for item in rest {
        depth = depth.max(emit(item, code) + 1);
        code.push(op.clone());
    }
    depth
}

impl NumericFunction {
    pub fn code(&self) -> &[Opcode] {
        &self.code
    }

    pub fn stack_depth(&self) -> usize {
        self.stack_depth
    }

    pub fn call(&self, t: f64) -> f64 {
        let mut stack: Vec<f64> = Vec::with_capacity(self.stack_depth);
        for op in &self.code {
            match op {
                Opcode::PushConst(v) => stack.push(*v),
                Opcode::LoadT => stack.push(t),
                Opcode::Add => {
                    let b = stack.pop().unwrap_or(0.0);
                    let a = stack.pop().unwrap_or(0.0);
                    stack.push(a + b);
                }
                Opcode::Mul => {
                    let b = stack.pop().unwrap_or(0.0);
                    let a = stack.pop().unwrap_or(0.0);
                    stack.push(a * b);
                }
                Opcode::Pow => {
                    let b = stack.pop().unwrap_or(0.0);
                    let a = stack.pop().unwrap_or(0.0);
                    stack.push(power(a, b));
                }
                unary => {
                    let a = stack.pop().unwrap_or(0.0);
                    stack.push(match unary {
                        Opcode::Recip => 1.0 / a,
                        Opcode::Powi(n) => a.powi(*n),
                        Opcode::Powf(e) => a.powf(*e),
                        Opcode::Sqrt => a.sqrt(),
                        Opcode::Exp => a.exp(),
                        Opcode::Ln => a.ln(),
                        Opcode::Asinh => a.asinh(),
                        _ => f64::NAN,
                    });
                }
            }
        }
        stack.pop().unwrap_or(f64::NAN)
    }

    /// Evaluate at every point of `ts`; large arrays are split across threads
    pub fn eval_array(&self, ts: &Array1<f64>) -> Array1<f64> {
        let mut out = ts.clone();
        if out.len() >= PARALLEL_THRESHOLD {
            out.par_mapv_inplace(|t| self.call(t));
        } else {
            out.mapv_inplace(|t| self.call(t));
        }
        out
    }
}
