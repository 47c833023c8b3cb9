use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::Univariate;
use crate::error::CalculusError;
use crate::evaluator::check_bounds;

/// Hard cap on rectangle counts, whatever the runtime options allow
pub const MAX_PARTITIONS: usize = 10_000_000;

/// Geometry of a left Riemann sum, one bar per sub-interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiemannSum {
    pub width: f64,
    pub left_endpoints: Vec<f64>,
    pub heights: Vec<f64>,
    pub area: f64,
}

impl RiemannSum {
    pub fn rect_count(&self) -> usize {
        self.heights.len()
    }
}

/// One row of a convergence table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergencePoint {
    pub rect_count: usize,
    pub approx: f64,
    pub abs_error: f64,
}

fn check_partition(rect_count: usize) -> Result<(), CalculusError> {
    if rect_count == 0 {
        return Err(CalculusError::invalid("rect_count", rect_count, "must be at least 1"));
    }
    if rect_count > MAX_PARTITIONS {
        return Err(CalculusError::invalid(
            "rect_count",
            rect_count,
            "exceeds the partition limit",
        ));
    }
    Ok(())
}

fn height<F: Univariate + ?Sized>(f: &F, t: f64) -> Result<f64, CalculusError> {
    let value = f.value(t);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalculusError::NumericDomainError { at: t, value })
    }
}

/// `dx · Σ_{i<n} f(lower + i·dx)` with `dx = (upper - lower) / n`
///
/// The sum runs sequentially in index order so the result is reproducible.
pub fn riemann_left_sum<F: Univariate + ?Sized>(
    f: &F,
    lower: f64,
    upper: f64,
    rect_count: usize,
) -> Result<f64, CalculusError> {
    check_bounds(lower, upper)?;
    check_partition(rect_count)?;
    let dx = (upper - lower) / rect_count as f64;
    let mut sum = 0.0;
    for i in 0..rect_count {
        sum += height(f, lower + i as f64 * dx)?;
    }
    Ok(dx * sum)
}

/// The bars behind [`riemann_left_sum`]; `area` equals its result exactly
pub fn riemann_partition<F: Univariate + ?Sized>(
    f: &F,
    lower: f64,
    upper: f64,
    rect_count: usize,
) -> Result<RiemannSum, CalculusError> {
    check_bounds(lower, upper)?;
    check_partition(rect_count)?;
    let dx = (upper - lower) / rect_count as f64;
    let mut left_endpoints = Vec::with_capacity(rect_count);
    let mut heights = Vec::with_capacity(rect_count);
    let mut sum = 0.0;
    for i in 0..rect_count {
        let t = lower + i as f64 * dx;
        let y = height(f, t)?;
        sum += y;
        left_endpoints.push(t);
        heights.push(y);
    }
    Ok(RiemannSum {
        width: dx,
        left_endpoints,
        heights,
        area: dx * sum,
    })
}

/// Left sums for each count in `counts`, computed in parallel, in input order
pub fn convergence<F: Univariate + ?Sized>(
    f: &F,
    lower: f64,
    upper: f64,
    exact: f64,
    counts: &[usize],
) -> Result<Vec<ConvergencePoint>, CalculusError> {
    counts
        .par_iter()
        .map(|&rect_count| {
            let approx = riemann_left_sum(f, lower, upper, rect_count)?;
            Ok::<_, CalculusError>(ConvergencePoint {
                rect_count,
                approx,
                abs_error: (approx - exact).abs(),
            })
        })
        .collect()
}

/// `start, 2·start, 4·start, ...`, `steps` entries, stopping early on overflow
pub fn doubling_counts(start: usize, steps: usize) -> Vec<usize> {
    std::iter::successors(Some(start), |n| n.checked_mul(2))
        .take(steps)
        .collect()
}
