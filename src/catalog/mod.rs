//! The four parametrized model families
//!
//! | Kind                    | Expression                        | Constraints              |
//! |-------------------------|-----------------------------------|--------------------------|
//! | `ArrivalRate`           | `I · t · e^(-t / k)`              | `I > 0`, `k > 0`         |
//! | `RouteCurve`            | `c · t²`                          | `c > 0`                  |
//! | `ConcentrationRational` | `(A·t + B) / ((t + p1)(t + p2))`  | `p1 > 0`, `p2 > 0`       |
//! | `RadiusProfile`         | `√(t + a)`                        | `a >= 0`                 |
//!
//! Models are immutable and always hold their expression in simplified form.

mod params;

pub use params::{ParameterSet, ParameterSpec};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CalculusError;
use crate::symbolic::{Expr, Variable, TIME};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    /// Patient arrivals per hour
    ArrivalRate,
    /// Ambulance route profile; evaluated by arc length
    RouteCurve,
    /// Drug concentration over time
    ConcentrationRational,
    /// Tank radius by height; evaluated by volume of revolution
    RadiusProfile,
}

impl ModelKind {
    pub const ALL: [ModelKind; 4] = [
        ModelKind::ArrivalRate,
        ModelKind::RouteCurve,
        ModelKind::ConcentrationRational,
        ModelKind::RadiusProfile,
    ];

    pub fn parameters(&self) -> &'static [ParameterSpec] {
        match self {
            ModelKind::ArrivalRate => params::ARRIVAL_RATE,
            ModelKind::RouteCurve => params::ROUTE_CURVE,
            ModelKind::ConcentrationRational => params::CONCENTRATION_RATIONAL,
            ModelKind::RadiusProfile => params::RADIUS_PROFILE,
        }
    }

    /// Category under which results of this kind are logged
    pub fn category(&self) -> &'static str {
        match self {
            ModelKind::ArrivalRate => "Patient flow",
            ModelKind::RouteCurve => "Ambulance route",
            ModelKind::ConcentrationRational => "Drug kinetics",
            ModelKind::RadiusProfile => "Tank volume",
        }
    }

    /// Default horizon: hours of operation, travel time, or tank height
    pub fn default_upper_bound(&self) -> f64 {
        match self {
            ModelKind::ArrivalRate => 8.0,
            ModelKind::RouteCurve => 3.0,
            ModelKind::ConcentrationRational => 10.0,
            ModelKind::RadiusProfile => 4.0,
        }
    }

    /// Default rectangle count for the Riemann approximation
    pub fn default_resolution(&self) -> usize {
        20
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelKind::ArrivalRate => "ArrivalRate",
            ModelKind::RouteCurve => "RouteCurve",
            ModelKind::ConcentrationRational => "ConcentrationRational",
            ModelKind::RadiusProfile => "RadiusProfile",
        };
        write!(f, "{name}")
    }
}

/// A validated model expression tagged with its family
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    kind: ModelKind,
    var: Variable,
    expr: Expr,
}

impl Model {
    /// `intensity · t · e^(-t / decay_constant)`
    pub fn arrival_rate(var: Variable, intensity: f64, decay_constant: f64) -> Result<Self, CalculusError> {
        positive("intensity", intensity)?;
        positive("decay_constant", decay_constant)?;
        let t = Expr::var(var);
        let expr = Expr::constant(intensity) * t.clone() * (Expr::constant(-1.0 / decay_constant) * t).exp();
        Ok(Self::from_parts(ModelKind::ArrivalRate, var, expr))
    }

    /// `curvature · t²`
    pub fn route_curve(var: Variable, curvature: f64) -> Result<Self, CalculusError> {
        positive("curvature", curvature)?;
        let expr = Expr::constant(curvature) * Expr::var(var).powf(2.0);
        Ok(Self::from_parts(ModelKind::RouteCurve, var, expr))
    }

    /// `(slope·t + intercept) / ((t + pole_offset_1)(t + pole_offset_2))`
    pub fn concentration_rational(
        var: Variable,
        numerator_slope: f64,
        numerator_intercept: f64,
        pole_offset_1: f64,
        pole_offset_2: f64,
    ) -> Result<Self, CalculusError> {
        finite("numerator_slope", numerator_slope)?;
        finite("numerator_intercept", numerator_intercept)?;
        positive("pole_offset_1", pole_offset_1)?;
        positive("pole_offset_2", pole_offset_2)?;
        let t = Expr::var(var);
        let numerator = Expr::constant(numerator_slope) * t.clone() + Expr::constant(numerator_intercept);
        let denominator =
            (t.clone() + Expr::constant(pole_offset_1)) * (t + Expr::constant(pole_offset_2));
        Ok(Self::from_parts(
            ModelKind::ConcentrationRational,
            var,
            numerator / denominator,
        ))
    }

    /// `√(t + offset)`
    pub fn radius_profile(var: Variable, offset: f64) -> Result<Self, CalculusError> {
        finite("offset", offset)?;
        if offset < 0.0 {
            return Err(CalculusError::invalid("offset", offset, "must be non-negative"));
        }
        let expr = (Expr::var(var) + Expr::constant(offset)).sqrt();
        Ok(Self::from_parts(ModelKind::RadiusProfile, var, expr))
    }

    /// Build a model of `kind` over [`TIME`] from named parameters
    pub fn build(kind: ModelKind, params: &ParameterSet) -> Result<Self, CalculusError> {
        Self::build_with(kind, TIME, params)
    }

    pub fn build_with(kind: ModelKind, var: Variable, params: &ParameterSet) -> Result<Self, CalculusError> {
        match kind {
            ModelKind::ArrivalRate => Self::arrival_rate(
                var,
                params.require("intensity")?,
                params.require("decay_constant")?,
            ),
            ModelKind::RouteCurve => Self::route_curve(var, params.require("curvature")?),
            ModelKind::ConcentrationRational => Self::concentration_rational(
                var,
                params.require("numerator_slope")?,
                params.require("numerator_intercept")?,
                params.require("pole_offset_1")?,
                params.require("pole_offset_2")?,
            ),
            ModelKind::RadiusProfile => Self::radius_profile(var, params.require("offset")?),
        }
    }

    /// Wrap a derived expression; the kind is carried over from the source model
    pub(crate) fn from_parts(kind: ModelKind, var: Variable, expr: Expr) -> Self {
        Self {
            kind,
            var,
            expr: expr.simplified(),
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn var(&self) -> Variable {
        self.var
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn eval(&self, t: f64) -> f64 {
        self.expr.eval(t)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

fn finite(name: &str, value: f64) -> Result<(), CalculusError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CalculusError::invalid(name, value, "must be finite"))
    }
}

fn positive(name: &str, value: f64) -> Result<(), CalculusError> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(CalculusError::invalid(name, value, "must be positive"))
    }
}
