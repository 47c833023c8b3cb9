//! Request/response interface over the catalog, evaluator and sampler
//!
//! A request names a model family, its parameters, an interval and a rectangle
//! count. The result carries the exact value, the left Riemann approximation, the
//! rendered expressions and the series needed to plot the integrand and its bars.

mod cache;
mod options;

pub use cache::clear_cache;
pub use options::EvaluationOptions;

use serde::{Deserialize, Serialize};

use crate::catalog::{Model, ModelKind, ParameterSet};
use crate::error::CalculusError;
use crate::evaluator;
use crate::sampler::{self, ConvergencePoint, RiemannSum, SampleSeries};
use crate::symbolic::to_latex;

// ============================================================================
// Request & result
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub kind: ModelKind,
    pub parameters: ParameterSet,
    pub lower_bound: f64,
    pub upper_bound: f64,
    /// Rectangle count for the Riemann approximation
    pub resolution: usize,
}

impl EvaluationRequest {
    pub fn new(
        kind: ModelKind,
        parameters: ParameterSet,
        lower_bound: f64,
        upper_bound: f64,
        resolution: usize,
    ) -> Self {
        Self {
            kind,
            parameters,
            lower_bound,
            upper_bound,
            resolution,
        }
    }

    /// Default parameters over `[0, default horizon]`
    pub fn defaults(kind: ModelKind) -> Self {
        Self::new(
            kind,
            ParameterSet::defaults(kind),
            0.0,
            kind.default_upper_bound(),
            kind.default_resolution(),
        )
    }

    pub fn with_parameter(mut self, name: &str, value: f64) -> Self {
        self.parameters.set(name, value);
        self
    }

    pub fn with_bounds(mut self, lower_bound: f64, upper_bound: f64) -> Self {
        self.lower_bound = lower_bound;
        self.upper_bound = upper_bound;
        self
    }

    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub kind: ModelKind,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub exact_value: f64,
    pub approx_value: f64,
    /// LaTeX of the model expression
    pub rendered_expression: String,
    /// LaTeX of the derivative, decomposition or volume integrand
    pub auxiliary_expression: Option<String>,
    /// The integrand sampled over the interval
    pub series: SampleSeries,
    pub rectangles: RiemannSum,
}

impl EvaluationResult {
    pub fn abs_error(&self) -> f64 {
        (self.exact_value - self.approx_value).abs()
    }

    /// One-line result as stored in the log
    pub fn summary(&self) -> String {
        match self.kind {
            ModelKind::ArrivalRate => {
                format!("{:.2} patients in {}h", self.exact_value, self.upper_bound)
            }
            ModelKind::RouteCurve => format!("{:.2} km", self.exact_value),
            ModelKind::ConcentrationRational => format!("{:.2} mg·h/L", self.exact_value),
            ModelKind::RadiusProfile => format!("{:.2} m3", self.exact_value),
        }
    }

    pub fn category(&self) -> &'static str {
        self.kind.category()
    }
}

// ============================================================================
// Evaluation
// ============================================================================

/// Evaluate with default [`EvaluationOptions`]
pub fn evaluate(
    kind: ModelKind,
    parameters: &ParameterSet,
    lower_bound: f64,
    upper_bound: f64,
    resolution: usize,
) -> Result<EvaluationResult, CalculusError> {
    let request = EvaluationRequest::new(kind, parameters.clone(), lower_bound, upper_bound, resolution);
    evaluate_request(&request, &EvaluationOptions::default())
}

pub fn evaluate_request(
    request: &EvaluationRequest,
    options: &EvaluationOptions,
) -> Result<EvaluationResult, CalculusError> {
    tracing::debug!(
        kind = %request.kind,
        lower = request.lower_bound,
        upper = request.upper_bound,
        resolution = request.resolution,
        "evaluating model"
    );

    if request.resolution > options.max_resolution {
        return Err(CalculusError::invalid(
            "resolution",
            request.resolution,
            "exceeds the configured maximum",
        ));
    }
    if options.sample_points > options.max_sample_points {
        return Err(CalculusError::invalid(
            "sample_points",
            options.sample_points,
            "exceeds the configured maximum",
        ));
    }

    let model = Model::build(request.kind, &request.parameters)?;
    let exact_value = exact_value(&model, request, options)?;

    let integrand = sampler::to_numeric_function(&evaluator::integrand(&model));
    let rectangles = sampler::riemann_partition(
        &integrand,
        request.lower_bound,
        request.upper_bound,
        request.resolution,
    )?;
    let series = sampler::sample(
        &integrand,
        request.lower_bound,
        request.upper_bound,
        options.sample_points,
    )?;

    let auxiliary_expression = evaluator::auxiliary(&model)?.map(|expr| to_latex(&expr));

    let result = EvaluationResult {
        kind: request.kind,
        lower_bound: request.lower_bound,
        upper_bound: request.upper_bound,
        exact_value,
        approx_value: rectangles.area,
        rendered_expression: evaluator::render(&model),
        auxiliary_expression,
        series,
        rectangles,
    };
    tracing::debug!(
        kind = %result.kind,
        exact = result.exact_value,
        approx = result.approx_value,
        "evaluation finished"
    );
    Ok(result)
}

/// Left-sum error at each rectangle count, against the exact value
pub fn convergence_table(
    request: &EvaluationRequest,
    counts: &[usize],
) -> Result<Vec<ConvergencePoint>, CalculusError> {
    let model = Model::build(request.kind, &request.parameters)?;
    let exact = exact_value(&model, request, &EvaluationOptions::default())?;
    let integrand = sampler::to_numeric_function(&evaluator::integrand(&model));
    sampler::convergence(
        &integrand,
        request.lower_bound,
        request.upper_bound,
        exact,
        counts,
    )
}

fn exact_value(
    model: &Model,
    request: &EvaluationRequest,
    options: &EvaluationOptions,
) -> Result<f64, CalculusError> {
    let (lower, upper) = (request.lower_bound, request.upper_bound);
    if options.use_cache {
        if let Some(value) = cache::get_entry(request.kind, &request.parameters, lower, upper) {
            tracing::debug!(kind = %request.kind, "exact value cache hit");
            return Ok(value);
        }
    }
    let value = evaluator::definite_integral(model, lower, upper)?;
    if options.use_cache {
        cache::insert_entry(request.kind, &request.parameters, lower, upper, value);
    }
    Ok(value)
}
