//! Exact evaluation of catalog models
//!
//! Every model has an *integrand*, the quantity whose integral is reported:
//!
//! - `ArrivalRate`: the rate itself (patients)
//! - `RouteCurve`: the arc-length element `√(1 + f′(t)²)` (km)
//! - `ConcentrationRational`: the concentration itself (area under the curve)
//! - `RadiusProfile`: the disc area `π·r(t)²` (volume of revolution)

use crate::catalog::{Model, ModelKind};
use crate::error::CalculusError;
use crate::symbolic::{self, Expr, RationalFunction};

/// Deterministic LaTeX of the model expression
pub fn render(model: &Model) -> String {
    symbolic::to_latex(model.expr())
}

/// Exact integral of the model's integrand over `[lower, upper]`
pub fn definite_integral(model: &Model, lower: f64, upper: f64) -> Result<f64, CalculusError> {
    check_bounds(lower, upper)?;
    let integrand = integrand(model);
    let value = symbolic::definite_integral(&integrand, model.var(), lower, upper)?;
    if !value.is_finite() {
        return Err(CalculusError::NumericDomainError { at: upper, value });
    }
    Ok(value)
}

/// Closed-form antiderivative of the model's integrand
pub fn antiderivative(model: &Model) -> Result<Expr, CalculusError> {
    symbolic::antiderivative(&integrand(model), model.var())
}

/// Symbolic derivative, simplified, tagged with the same kind
pub fn derivative(model: &Model) -> Model {
    Model::from_parts(
        model.kind(),
        model.var(),
        symbolic::differentiate(model.expr(), model.var()),
    )
}

/// Partial-fraction form of a `ConcentrationRational` model
pub fn partial_fraction_decompose(model: &Model) -> Result<Model, CalculusError> {
    if model.kind() != ModelKind::ConcentrationRational {
        return Err(CalculusError::UnsupportedOperation {
            operation: "partial_fraction_decompose",
            kind: model.kind(),
        });
    }
    // a zero numerator cancels the whole fraction
    if model.expr().is_zero() {
        return Ok(model.clone());
    }
    let rational = RationalFunction::from_expr(model.expr(), model.var()).ok_or_else(|| {
        CalculusError::integration(model.expr(), "not a ratio of polynomials over linear factors")
    })?;
    let fractions = rational.decompose()?;
    Ok(Model::from_parts(model.kind(), model.var(), fractions.to_expr()))
}

/// The expression whose integral [`definite_integral`] reports
pub fn integrand(model: &Model) -> Expr {
    let f = model.expr().clone();
    match model.kind() {
        ModelKind::ArrivalRate | ModelKind::ConcentrationRational => f,
        ModelKind::RouteCurve => {
            let slope = symbolic::differentiate(&f, model.var());
            (Expr::one() + slope.powf(2.0)).sqrt().simplified()
        }
        ModelKind::RadiusProfile => {
            (Expr::constant(std::f64::consts::PI) * f.powf(2.0)).simplified()
        }
    }
}

/// The auxiliary transform shown next to the model, if its family has one
pub fn auxiliary(model: &Model) -> Result<Option<Expr>, CalculusError> {
    Ok(match model.kind() {
        ModelKind::ArrivalRate => None,
        ModelKind::RouteCurve => Some(derivative(model).expr().clone()),
        ModelKind::ConcentrationRational => Some(partial_fraction_decompose(model)?.expr().clone()),
        ModelKind::RadiusProfile => Some(integrand(model)),
    })
}

/// `0 <= lower < upper`, both finite
pub(crate) fn check_bounds(lower: f64, upper: f64) -> Result<(), CalculusError> {
    if !lower.is_finite() || lower < 0.0 {
        return Err(CalculusError::invalid("lower_bound", lower, "must be finite and non-negative"));
    }
    if !upper.is_finite() {
        return Err(CalculusError::invalid("upper_bound", upper, "must be finite"));
    }
    if upper <= lower {
        return Err(CalculusError::invalid(
            "upper_bound",
            upper,
            "must be greater than the lower bound",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ParameterSet;
    use crate::symbolic::TIME;
    use approx::assert_relative_eq;

    #[test]
    fn test_arrival_rate_integral() {
        let model = Model::arrival_rate(TIME, 15.0, 5.0).unwrap();
        let value = definite_integral(&model, 0.0, 8.0).unwrap();
        assert_relative_eq!(value, 75.0 * (5.0 - 13.0 * (-1.6f64).exp()), epsilon = 1e-9);
        assert_relative_eq!(value, 178.15, epsilon = 0.01);
    }

    #[test]
    fn test_volume_of_revolution() {
        let model = Model::radius_profile(TIME, 1.0).unwrap();
        let value = definite_integral(&model, 0.0, 5.0).unwrap();
        assert_relative_eq!(value, 17.5 * std::f64::consts::PI, epsilon = 1e-9);
    }

    #[test]
    fn test_route_derivative() {
        let model = Model::route_curve(TIME, 0.4).unwrap();
        let d = derivative(&model);
        assert_eq!(d.kind(), ModelKind::RouteCurve);
        assert_eq!(render(&d), "0.8 t");
    }

    #[test]
    fn test_decomposition() {
        let model = Model::build(
            ModelKind::ConcentrationRational,
            &ParameterSet::defaults(ModelKind::ConcentrationRational),
        )
        .unwrap();
        let pf = partial_fraction_decompose(&model).unwrap();
        assert_eq!(render(&pf), r"-\frac{0.5}{t + 1} + \frac{3.5}{t + 3}");
        for t in [0.0, 1.0, 4.5] {
            assert_relative_eq!(pf.eval(t), model.eval(t), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_decomposition_requires_rational_model() {
        let model = Model::route_curve(TIME, 0.4).unwrap();
        assert!(matches!(
            partial_fraction_decompose(&model),
            Err(CalculusError::UnsupportedOperation { kind: ModelKind::RouteCurve, .. })
        ));
    }

    #[test]
    fn test_zero_numerator_decomposes_to_zero() {
        let model = Model::concentration_rational(TIME, 0.0, 0.0, 1.0, 3.0).unwrap();
        let pf = partial_fraction_decompose(&model).unwrap();
        assert!(pf.expr().is_zero());
        assert_eq!(definite_integral(&model, 0.0, 1.0).unwrap(), 0.0);
    }

    #[test]
    fn test_auxiliary_expressions() {
        let route = Model::route_curve(TIME, 0.4).unwrap();
        assert!(auxiliary(&route).unwrap().is_some());
        let arrival = Model::arrival_rate(TIME, 15.0, 5.0).unwrap();
        assert!(auxiliary(&arrival).unwrap().is_none());
        let radius = Model::radius_profile(TIME, 2.0).unwrap();
        let volume = auxiliary(&radius).unwrap().unwrap();
        assert_eq!(symbolic::to_latex(&volume), r"\pi \left(t + 2\right)");
    }

    #[test]
    fn test_bounds_are_checked() {
        let model = Model::route_curve(TIME, 0.4).unwrap();
        assert!(definite_integral(&model, 3.0, 3.0).unwrap_err().is_invalid_input());
        assert!(definite_integral(&model, -1.0, 3.0).unwrap_err().is_invalid_input());
        assert!(definite_integral(&model, 0.0, f64::INFINITY).unwrap_err().is_invalid_input());
    }
}
