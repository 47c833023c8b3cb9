//! Closed-form and numeric integration of hospital operations models
//!
//! Four parametrized families of functions of time are evaluated exactly, through
//! a small symbolic engine, and approximately, through left Riemann sums over a
//! compiled form of the same expression.
//!
//! ```ignore
//! use hospital_calculus::prelude::*;
//!
//! let request = EvaluationRequest::defaults(ModelKind::ArrivalRate);
//! let result = evaluate_request(&request, &EvaluationOptions::default())?;
//! println!("{}", result.summary()); // 178.15 patients in 8h
//! ```

pub mod catalog;
pub mod error;
pub mod evaluator;
pub mod pipeline;
pub mod record;
pub mod sampler;
pub mod symbolic;

pub use error::CalculusError;

pub mod prelude {
    pub use crate::catalog::{Model, ModelKind, ParameterSet, ParameterSpec};
    pub use crate::error::CalculusError;
    pub use crate::evaluator::{
        antiderivative, auxiliary, definite_integral, derivative, integrand,
        partial_fraction_decompose, render,
    };
    pub use crate::pipeline::{
        convergence_table, evaluate, evaluate_request, EvaluationOptions, EvaluationRequest,
        EvaluationResult,
    };
    pub use crate::record::{
        record_evaluation, CsvRecorder, MemoryRecorder, Record, RecordError, ResultRecorder,
    };
    pub use crate::sampler::{
        riemann_left_sum, riemann_partition, sample, to_numeric_function, NumericFunction,
        RiemannSum, SampleSeries, Univariate,
    };
    pub use crate::symbolic::{Expr, Variable, TIME};
}
