//! Golden LaTeX output for the default models and their transforms

use hospital_calculus::prelude::*;

fn default_model(kind: ModelKind) -> Model {
    Model::build(kind, &ParameterSet::defaults(kind)).unwrap()
}

#[test]
fn test_arrival_rate() {
    assert_eq!(render(&default_model(ModelKind::ArrivalRate)), "15 t e^{-0.2 t}");
}

#[test]
fn test_route_curve_and_derivative() {
    let m = default_model(ModelKind::RouteCurve);
    assert_eq!(render(&m), "0.4 t^{2}");
    assert_eq!(render(&derivative(&m)), "0.8 t");
}

#[test]
fn test_concentration_and_decomposition() {
    let m = default_model(ModelKind::ConcentrationRational);
    assert_eq!(
        render(&m),
        r"\frac{3 t + 2}{\left(t + 1\right) \left(t + 3\right)}"
    );
    assert_eq!(
        render(&partial_fraction_decompose(&m).unwrap()),
        r"-\frac{0.5}{t + 1} + \frac{3.5}{t + 3}"
    );
}

#[test]
fn test_radius_profile_and_volume_integrand() {
    let m = default_model(ModelKind::RadiusProfile);
    assert_eq!(render(&m), r"\sqrt{t + 2}");
    assert_eq!(
        hospital_calculus::symbolic::to_latex(&integrand(&m)),
        r"\pi \left(t + 2\right)"
    );
}

#[test]
fn test_non_integer_constants_are_rounded() {
    let m = Model::arrival_rate(TIME, 12.5, 3.0).unwrap();
    assert_eq!(render(&m), "12.5 t e^{-0.3333 t}");
}

#[test]
fn test_render_is_deterministic() {
    for kind in ModelKind::ALL {
        let first = render(&default_model(kind));
        let second = render(&default_model(kind));
        assert_eq!(first, second);
    }
}
