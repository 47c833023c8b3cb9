//! Request/response behaviour, configuration loading and series export

use approx::assert_relative_eq;
use hospital_calculus::prelude::*;
use std::io::Write;

#[test]
fn test_request_from_json() {
    let json = r#"{
        "kind": "RadiusProfile",
        "parameters": { "offset": 1.0 },
        "lower_bound": 0.0,
        "upper_bound": 5.0,
        "resolution": 50
    }"#;
    let request: EvaluationRequest = serde_json::from_str(json).unwrap();
    let result = evaluate_request(&request, &EvaluationOptions::default()).unwrap();
    assert_relative_eq!(result.exact_value, 17.5 * std::f64::consts::PI, epsilon = 1e-9);
    assert_eq!(result.summary(), "54.98 m3");
    assert_eq!(result.category(), "Tank volume");
    assert_eq!(result.rectangles.rect_count(), 50);
}

#[test]
fn test_result_serializes() {
    let result = evaluate_request(
        &EvaluationRequest::defaults(ModelKind::RouteCurve),
        &EvaluationOptions::default().with_sample_points(5),
    )
    .unwrap();
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["kind"], "RouteCurve");
    assert_eq!(value["series"]["x"].as_array().unwrap().len(), 5);
    let back: EvaluationResult = serde_json::from_value(value).unwrap();
    assert_eq!(back, result);
}

#[test]
fn test_series_and_bars_describe_the_integrand() {
    let request = EvaluationRequest::defaults(ModelKind::ArrivalRate);
    let result = evaluate_request(&request, &EvaluationOptions::default()).unwrap();
    let m = Model::build(request.kind, &request.parameters).unwrap();
    for (x, y) in result.series.points() {
        assert_eq!(y, m.eval(x));
    }
    assert_eq!(result.series.x[0], 0.0);
    assert_eq!(*result.series.x.last().unwrap(), 8.0);
    assert_relative_eq!(result.rectangles.width, 0.4, epsilon = 1e-12);
    assert_eq!(result.approx_value, result.rectangles.area);
}

#[test]
fn test_options_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, r#"{{ "sample_points": 32, "use_cache": false }}"#).unwrap();
    let options = EvaluationOptions::from_path(file.path()).unwrap();
    assert_eq!(options.sample_points, 32);
    assert!(!options.use_cache);

    let result =
        evaluate_request(&EvaluationRequest::defaults(ModelKind::RadiusProfile), &options).unwrap();
    assert_eq!(result.series.len(), 32);
}

#[test]
fn test_missing_options_file() {
    let err = EvaluationOptions::from_path("/nonexistent/options.json").unwrap_err();
    assert!(matches!(err, CalculusError::Io(_)));
}

#[test]
fn test_series_csv_export() {
    let result = evaluate_request(
        &EvaluationRequest::defaults(ModelKind::RadiusProfile),
        &EvaluationOptions::default().with_sample_points(3),
    )
    .unwrap();
    let file = tempfile::NamedTempFile::new().unwrap();
    result.series.write_csv_path(file.path()).unwrap();

    let mut reader = csv::Reader::from_path(file.path()).unwrap();
    let rows: Vec<(f64, f64)> = reader.deserialize().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].0, 0.0);
    assert_relative_eq!(rows[0].1, 2.0 * std::f64::consts::PI, epsilon = 1e-12);
    assert_eq!(rows[2].0, 4.0);
}
