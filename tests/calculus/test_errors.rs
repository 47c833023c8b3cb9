//! Input validation and error reporting

use hospital_calculus::prelude::*;
use rand::Rng;

fn arrival(intensity: f64, decay_constant: f64) -> ParameterSet {
    ParameterSet::new()
        .with("intensity", intensity)
        .with("decay_constant", decay_constant)
}

#[test]
fn test_zero_decay_constant() {
    let err = evaluate(ModelKind::ArrivalRate, &arrival(15.0, 0.0), 0.0, 8.0, 20).unwrap_err();
    match err {
        CalculusError::InvalidParameter { param, .. } => assert_eq!(param, "decay_constant"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_zero_rectangles() {
    let err = evaluate(ModelKind::ArrivalRate, &arrival(15.0, 5.0), 0.0, 8.0, 0).unwrap_err();
    match err {
        CalculusError::InvalidParameter { param, .. } => assert_eq!(param, "rect_count"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_sample_points_above_hard_cap() {
    let options = EvaluationOptions::default()
        .with_max_sample_points(usize::MAX)
        .with_sample_points(usize::MAX / 8);
    let request = EvaluationRequest::defaults(ModelKind::ArrivalRate);
    let err = evaluate_request(&request, &options.with_cache(false)).unwrap_err();
    match err {
        CalculusError::InvalidParameter { param, .. } => assert_eq!(param, "count"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_negative_pole_offset() {
    let params = ParameterSet::defaults(ModelKind::ConcentrationRational).with("pole_offset_1", -1.0);
    let err = evaluate(ModelKind::ConcentrationRational, &params, 0.0, 10.0, 20).unwrap_err();
    match err {
        CalculusError::InvalidParameter { param, value, .. } => {
            assert_eq!(param, "pole_offset_1");
            assert_eq!(value, "-1");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_error_messages() {
    let err = Model::route_curve(TIME, -2.0).unwrap_err();
    assert_eq!(err.to_string(), "Invalid parameter: curvature = -2 (must be positive)");

    let m = Model::arrival_rate(TIME, 15.0, 5.0).unwrap();
    let err = partial_fraction_decompose(&m).unwrap_err();
    assert_eq!(
        err.to_string(),
        "partial_fraction_decompose is not defined for ArrivalRate models"
    );
}

#[test]
fn test_bad_intervals() {
    let params = ParameterSet::defaults(ModelKind::RouteCurve);
    for (lower, upper) in [(3.0, 3.0), (4.0, 3.0), (-1.0, 3.0), (0.0, f64::NAN)] {
        let err = evaluate(ModelKind::RouteCurve, &params, lower, upper, 20).unwrap_err();
        assert!(err.is_invalid_input(), "[{lower}, {upper}] gave {err:?}");
    }
}

#[test]
fn test_missing_and_non_finite_parameters() {
    let err = evaluate(ModelKind::RadiusProfile, &ParameterSet::new(), 0.0, 4.0, 20).unwrap_err();
    assert!(err.is_invalid_input());
    let params = ParameterSet::new().with("offset", f64::INFINITY);
    let err = evaluate(ModelKind::RadiusProfile, &params, 0.0, 4.0, 20).unwrap_err();
    assert!(err.is_invalid_input());
}

#[test]
fn test_valid_inputs_never_fail() {
    let mut rng = rand::rng();
    for _ in 0..40 {
        for kind in ModelKind::ALL {
            let params: ParameterSet = kind
                .parameters()
                .iter()
                .map(|spec| (spec.name, rng.random_range(spec.min..=spec.max)))
                .collect();
            let lower = rng.random_range(0.0..2.0);
            let upper = lower + rng.random_range(0.1..10.0);
            let resolution = rng.random_range(1..200);
            let result = evaluate(kind, &params, lower, upper, resolution);
            assert!(result.is_ok(), "{kind} {params:?}: {:?}", result.err());
        }
    }
}
