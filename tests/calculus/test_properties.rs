//! Numeric properties of the exact and approximate integrals
//!
//! Exact values are checked against known closed forms and against an
//! independent composite Simpson rule; Riemann sums are checked for their
//! defining identities and for convergence.

use approx::assert_relative_eq;
use hospital_calculus::prelude::*;
use hospital_calculus::sampler::{convergence, doubling_counts};
use hospital_calculus::symbolic::{PartialFractions, RationalFunction};
use rand::Rng;

/// Composite Simpson rule, `n` even
fn simpson(f: impl Fn(f64) -> f64, a: f64, b: f64, n: usize) -> f64 {
    let h = (b - a) / n as f64;
    let mut sum = f(a) + f(b);
    for i in 1..n {
        let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += weight * f(a + i as f64 * h);
    }
    sum * h / 3.0
}

fn model(kind: ModelKind, params: &[(&str, f64)]) -> Model {
    Model::build(kind, &params.iter().copied().collect()).unwrap()
}

#[test]
fn test_arrival_rate_closed_form() {
    let m = model(
        ModelKind::ArrivalRate,
        &[("intensity", 15.0), ("decay_constant", 5.0)],
    );
    let exact = definite_integral(&m, 0.0, 8.0).unwrap();
    // I·k·[k - (t + k)·e^(-t/k)] between 0 and 8
    let closed = |t: f64| 15.0 * 5.0 * (5.0 - (t + 5.0) * (-t / 5.0).exp());
    assert_relative_eq!(exact, closed(8.0) - closed(0.0), epsilon = 1e-9);
    assert_relative_eq!(exact, 178.1509, epsilon = 1e-3);
}

#[test]
fn test_route_arc_length_matches_numeric_integration() {
    let m = model(ModelKind::RouteCurve, &[("curvature", 0.5)]);
    let exact = definite_integral(&m, 0.0, 3.0).unwrap();
    let numeric = simpson(|t| (1.0 + t * t).sqrt(), 0.0, 3.0, 2000);
    assert!((exact - numeric).abs() < 1e-6, "{exact} vs {numeric}");
}

#[test]
fn test_tank_volume() {
    let m = model(ModelKind::RadiusProfile, &[("offset", 1.0)]);
    let exact = definite_integral(&m, 0.0, 5.0).unwrap();
    assert_relative_eq!(exact, 17.5 * std::f64::consts::PI, epsilon = 1e-9);
    assert_relative_eq!(exact, 54.98, epsilon = 5e-3);
}

#[test]
fn test_single_rectangle_is_width_times_left_value() {
    for kind in ModelKind::ALL {
        let m = Model::build(kind, &ParameterSet::defaults(kind)).unwrap();
        let f = to_numeric_function(&integrand(&m));
        let h = kind.default_upper_bound();
        assert_eq!(riemann_left_sum(&f, 0.0, h, 1).unwrap(), h * f.call(0.0));
    }
}

#[test]
fn test_riemann_sums_converge_monotonically_for_increasing_integrands() {
    for kind in [ModelKind::RouteCurve, ModelKind::RadiusProfile] {
        let m = Model::build(kind, &ParameterSet::defaults(kind)).unwrap();
        let upper = kind.default_upper_bound();
        let exact = definite_integral(&m, 0.0, upper).unwrap();
        let f = to_numeric_function(&integrand(&m));
        let table = convergence(&f, 0.0, upper, exact, &doubling_counts(4, 10)).unwrap();
        for pair in table.windows(2) {
            assert!(
                pair[1].abs_error <= pair[0].abs_error,
                "{kind}: error grew from {} to {}",
                pair[0].abs_error,
                pair[1].abs_error
            );
        }
        // left sums of increasing functions underestimate
        assert!(table.iter().all(|p| p.approx <= exact));
    }
}

#[test]
fn test_arrival_convergence_reaches_exact_value() {
    let request = EvaluationRequest::defaults(ModelKind::ArrivalRate);
    let table = convergence_table(&request, &doubling_counts(20, 12)).unwrap();
    let last = table.last().unwrap();
    assert!(last.abs_error < 1e-2);
    assert!(last.abs_error < table[0].abs_error);
}

#[test]
fn test_random_parameters_match_simpson() {
    let mut rng = rand::rng();
    for _ in 0..50 {
        for kind in ModelKind::ALL {
            let params: ParameterSet = kind
                .parameters()
                .iter()
                .map(|spec| (spec.name, rng.random_range(spec.min..=spec.max)))
                .collect();
            let m = Model::build(kind, &params).unwrap();
            let upper = rng.random_range(0.5..12.0);
            let exact = definite_integral(&m, 0.0, upper).unwrap();
            let f = to_numeric_function(&integrand(&m));
            let numeric = simpson(|t| f.call(t), 0.0, upper, 4000);
            assert_relative_eq!(exact, numeric, epsilon = 1e-6, max_relative = 1e-6);
        }
    }
}

#[test]
fn test_nearly_coincident_poles_match_simpson() {
    for p1 in [1.0, 3.0, 7.5] {
        for eps in [1e-12, 1e-14] {
            let m = Model::concentration_rational(TIME, 3.0, 2.0, p1, p1 * (1.0 + eps)).unwrap();
            let exact = definite_integral(&m, 0.0, 10.0).unwrap();
            let f = to_numeric_function(&integrand(&m));
            let numeric = simpson(|t| f.call(t), 0.0, 10.0, 4000);
            assert_relative_eq!(exact, numeric, epsilon = 1e-6, max_relative = 1e-6);
        }
    }
}

#[test]
fn test_compiled_function_agrees_with_tree() {
    let mut rng = rand::rng();
    for kind in ModelKind::ALL {
        let m = Model::build(kind, &ParameterSet::defaults(kind)).unwrap();
        let expr = integrand(&m);
        let f = to_numeric_function(&expr);
        for _ in 0..100 {
            let t = rng.random_range(0.0..20.0);
            assert_eq!(f.call(t), expr.eval(t));
        }
    }
}

#[test]
fn test_partial_fraction_round_trip() {
    let mut rng = rand::rng();
    for _ in 0..25 {
        let a = rng.random_range(-10.0..10.0);
        let b = rng.random_range(-10.0..10.0);
        let p1 = rng.random_range(0.1..10.0);
        // every fifth case has a repeated factor
        let p2 = if rng.random_range(0..5) == 0 {
            p1
        } else {
            rng.random_range(0.1..10.0)
        };
        let m = Model::concentration_rational(TIME, a, b, p1, p2).unwrap();
        let original = RationalFunction::from_expr(m.expr(), TIME).unwrap();
        let fractions: PartialFractions = original.decompose().unwrap();
        assert!(fractions.recombine().equivalent(&original, 1e-9));

        let decomposed = partial_fraction_decompose(&m).unwrap();
        for t in [0.0, 0.7, 3.0, 9.5] {
            assert_relative_eq!(decomposed.eval(t), m.eval(t), epsilon = 1e-9, max_relative = 1e-9);
        }
    }
}

#[test]
fn test_antiderivative_differentiates_back() {
    for kind in ModelKind::ALL {
        let m = Model::build(kind, &ParameterSet::defaults(kind)).unwrap();
        let big_f = antiderivative(&m).unwrap();
        let back = hospital_calculus::symbolic::differentiate(&big_f, TIME);
        let f = integrand(&m);
        for t in [0.0, 0.5, 2.0, 3.5] {
            assert_relative_eq!(back.eval(t), f.eval(t), epsilon = 1e-9, max_relative = 1e-9);
        }
    }
}
