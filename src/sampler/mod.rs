//! Numeric evaluation: compiled functions, plot series and Riemann sums

mod bytecode;
mod riemann;

pub use bytecode::{to_numeric_function, NumericFunction, Opcode};
pub use riemann::{
    convergence, doubling_counts, riemann_left_sum, riemann_partition, ConvergencePoint,
    RiemannSum, MAX_PARTITIONS,
};

/// Hard cap on sample counts, whatever the runtime options allow
pub const MAX_SAMPLES: usize = 10_000_000;

use std::fs::File;
use std::io::Write;
use std::path::Path;

use ndarray::{Array1, Zip};
use serde::{Deserialize, Serialize};

use crate::error::CalculusError;
use crate::evaluator::check_bounds;

/// A real function of one variable that can be shared across threads
pub trait Univariate: Sync {
    fn value(&self, t: f64) -> f64;
}

impl<F> Univariate for F
where
    F: Fn(f64) -> f64 + Sync,
{
    fn value(&self, t: f64) -> f64 {
        self(t)
    }
}

impl Univariate for NumericFunction {
    fn value(&self, t: f64) -> f64 {
        self.call(t)
    }
}

/// Evenly spaced `(x, y)` samples of a function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

#[derive(Serialize)]
struct SampleRow {
    x: f64,
    y: f64,
}

impl SampleSeries {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// Write the series as CSV with an `x,y` header
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), CalculusError> {
        let mut writer = csv::Writer::from_writer(writer);
        for (x, y) in self.points() {
            writer.serialize(SampleRow { x, y })?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_csv_path(&self, path: impl AsRef<Path>) -> Result<(), CalculusError> {
        self.write_csv(File::create(path)?)
    }
}

/// `count` evenly spaced samples over `[lower, upper]`, both ends included.
/// A single sample sits at `lower`.
pub fn sample<F: Univariate + ?Sized>(
    f: &F,
    lower: f64,
    upper: f64,
    count: usize,
) -> Result<SampleSeries, CalculusError> {
    check_bounds(lower, upper)?;
    if count == 0 {
        return Err(CalculusError::invalid("count", count, "must be at least 1"));
    }
    if count > MAX_SAMPLES {
        return Err(CalculusError::invalid("count", count, "exceeds the sample limit"));
    }

    let mut x = Array1::linspace(lower, upper, count);
    if count == 1 {
        x[0] = lower;
    } else {
        x[count - 1] = upper;
    }

    let y: Array1<f64> = if count >= 4096 {
        Zip::from(&x).par_map_collect(|&t| f.value(t))
    } else {
        x.mapv(|t| f.value(t))
    };
    if let Some((at, value)) = x.iter().zip(y.iter()).find(|(_, y)| !y.is_finite()) {
        return Err(CalculusError::NumericDomainError {
            at: *at,
            value: *value,
        });
    }

    Ok(SampleSeries {
        x: x.to_vec(),
        y: y.to_vec(),
    })
}
