//! Symbolic expressions in one variable
//!
//! Closed-form calculus over a small expression language: simplification,
//! differentiation, integration, partial fractions and rendering as plain text
//! or LaTeX.

pub mod diff;
pub mod expr;
pub mod integrate;
pub mod latex;
pub mod poly;
pub mod rational;
pub mod simplify;

pub use diff::differentiate;
pub use expr::{format_number, Expr, Func, Variable, TIME};
pub use integrate::{antiderivative, definite_integral};
pub use latex::to_latex;
pub use poly::Polynomial;
pub use rational::{LinearFactor, PartialFractionTerm, PartialFractions, RationalFunction};
pub use simplify::simplify;
