//! Named model parameters and their metadata

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ModelKind;
use crate::error::CalculusError;

/// Static description of one model parameter
///
/// `min`/`max` are the slider range a dashboard would offer. They are hints only;
/// the enforced constraints are the domain checks done by the model constructors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub unit: &'static str,
    pub default: f64,
    pub min: f64,
    pub max: f64,
}

pub(crate) const ARRIVAL_RATE: &[ParameterSpec] = &[
    ParameterSpec {
        name: "intensity",
        description: "Peak arrival intensity",
        unit: "patients/h",
        default: 15.0,
        min: 1.0,
        max: 50.0,
    },
    ParameterSpec {
        name: "decay_constant",
        description: "Time constant of the arrival decay",
        unit: "h",
        default: 5.0,
        min: 0.5,
        max: 24.0,
    },
];

pub(crate) const ROUTE_CURVE: &[ParameterSpec] = &[ParameterSpec {
    name: "curvature",
    description: "Quadratic route coefficient",
    unit: "km/h²",
    default: 0.4,
    min: 0.1,
    max: 2.0,
}];

pub(crate) const CONCENTRATION_RATIONAL: &[ParameterSpec] = &[
    ParameterSpec {
        name: "numerator_slope",
        description: "Slope of the numerator polynomial",
        unit: "mg/L",
        default: 3.0,
        min: -10.0,
        max: 10.0,
    },
    ParameterSpec {
        name: "numerator_intercept",
        description: "Intercept of the numerator polynomial",
        unit: "mg·h/L",
        default: 2.0,
        min: -10.0,
        max: 10.0,
    },
    ParameterSpec {
        name: "pole_offset_1",
        description: "Offset of the first denominator factor",
        unit: "h",
        default: 1.0,
        min: 0.1,
        max: 10.0,
    },
    ParameterSpec {
        name: "pole_offset_2",
        description: "Offset of the second denominator factor",
        unit: "h",
        default: 3.0,
        min: 0.1,
        max: 10.0,
    },
];

pub(crate) const RADIUS_PROFILE: &[ParameterSpec] = &[ParameterSpec {
    name: "offset",
    description: "Radius offset, r(t) = sqrt(t + offset)",
    unit: "m²",
    default: 2.0,
    min: 0.0,
    max: 10.0,
}];

/// Parameter values by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet(BTreeMap<String, f64>);

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every parameter of `kind` at its default value
    pub fn defaults(kind: ModelKind) -> Self {
        kind.parameters()
            .iter()
            .fold(Self::new(), |set, spec| set.with(spec.name, spec.default))
    }

    /// Builder-style insert
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: f64) {
        self.0.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// A present, finite value for `name`
    pub fn require(&self, name: &str) -> Result<f64, CalculusError> {
        match self.get(name) {
            Some(value) if value.is_finite() => Ok(value),
            Some(value) => Err(CalculusError::invalid(name, value, "must be finite")),
            None => Err(CalculusError::invalid(name, "missing", "parameter is required")),
        }
    }
}

impl<'a> FromIterator<(&'a str, f64)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |set, (name, value)| set.with(name, value))
    }
}
