//! 사각/원형 크리스탈 정밀도 회귀 테스트. 기준 용기 C = 2.62 m, t = 5 mm (n = 21).
use portalevel_precision::agent::Agent;
use portalevel_precision::config::Config;
use portalevel_precision::sensor::{
    circular_amplitude_difference, circular_precision, circular_precision_with,
    rectangular_amplitude_difference, rectangular_precision, PrecisionError,
};
use portalevel_precision::solver::SolverOptions;

const R_G: f64 = 0.996751447224324;
const R_L: f64 = 0.96941482;
const N: u32 = 21;

fn assert_close(label: &str, actual: f64, expected: f64, tol: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tol,
        "{label} expected {expected:.9} got {actual:.9} (diff {diff:.3e}, tol {tol})"
    );
}

#[test]
fn rectangular_co2_reference() {
    let l = rectangular_precision(20.0, R_G, R_L, N, 133.0).expect("rectangular");
    let expected = 20.0 * R_G.powi(21) / (2.0 * 133.0 * (R_G.powi(21) - R_L.powi(21)));
    assert_close("L", l, expected, 1e-12);
    assert_close("L", l, 0.169982, 1e-6);
    assert!(l > 0.0 && l < 10.0);
}

#[test]
fn rectangular_inverse_reproduces_inverse_snr() {
    let l = rectangular_precision(20.0, R_G, R_L, N, 133.0).unwrap();
    let da = rectangular_amplitude_difference(l, 20.0, R_G, R_L, N).unwrap();
    assert_close("ΔÂ", da, 1.0 / 133.0, 1e-12);
}

#[test]
fn circular_co2_reference_round_trip() {
    let p = circular_precision(15.0, R_G, R_L, N, 100.0).expect("circular");
    assert_close("p", p, 0.133177, 1e-5);
    let da = circular_amplitude_difference(p, 15.0, R_G, R_L, N).unwrap();
    assert_close("ΔÂ", da, 0.01, 1e-6);
}

#[test]
fn catalog_agents_reference_values() {
    let expected = [
        (Agent::Co2, 0.169982, 0.133177),
        (Agent::Novec1230, 0.096340, 0.075477),
        (Agent::Fm200, 0.100365, 0.078631),
    ];
    for (agent, rect, circ) in expected {
        let r = agent.reflectivity();
        let l = rectangular_precision(20.0, r.steel_gas, r.steel_liquid, N, 133.0).unwrap();
        let p = circular_precision(15.0, r.steel_gas, r.steel_liquid, N, 100.0).unwrap();
        assert_close(agent.code(), l, rect, 1e-5);
        assert_close(agent.code(), p, circ, 1e-5);
    }
}

#[test]
fn single_reflection_circular_root_is_far_from_centre() {
    // n = 1 이면 구분 인자가 작아 근이 d/2 쪽으로 이동한다 (고정 초기값 0.5 로는 멀다)
    let p = circular_precision(15.0, R_G, R_L, 1, 100.0).unwrap();
    assert_close("p", p, 2.178845, 1e-5);
    let da = circular_amplitude_difference(p, 15.0, R_G, R_L, 1).unwrap();
    assert_close("ΔÂ", da, 0.01, 1e-6);
}

#[test]
fn looser_snr_gives_larger_precision_bound() {
    let mut prev_rect = 0.0;
    let mut prev_circ = 0.0;
    for snr in [400.0, 200.0, 133.0, 100.0, 50.0] {
        let rect = rectangular_precision(20.0, R_G, R_L, N, snr).unwrap();
        let circ = circular_precision(15.0, R_G, R_L, N, snr).unwrap();
        assert!(rect > prev_rect, "snr={snr}");
        assert!(circ > prev_circ, "snr={snr}");
        prev_rect = rect;
        prev_circ = circ;
    }
}

#[test]
fn indistinguishable_coefficients_raise_division_by_zero() {
    let err = rectangular_precision(20.0, 0.98, 0.98, N, 133.0).unwrap_err();
    assert!(matches!(err, PrecisionError::DivisionByZero { n: 21, .. }), "{err:?}");
    let err = circular_precision(15.0, 0.98, 0.98, N, 100.0).unwrap_err();
    assert!(matches!(err, PrecisionError::DivisionByZero { .. }));
}

#[test]
fn precision_diverges_as_liquid_approaches_gas() {
    let mut prev = 0.0;
    for gap in [1e-2, 1e-3, 1e-4, 1e-5, 1e-6] {
        let l = rectangular_precision(20.0, 0.99, 0.99 - gap, N, 133.0).unwrap();
        assert!(l > prev * 5.0, "gap={gap} l={l}");
        prev = l;
    }
    assert!(prev > 1e3);
}

#[test]
fn offset_beyond_crystal_half_is_domain_error() {
    let err = rectangular_amplitude_difference(10.5, 20.0, R_G, R_L, N).unwrap_err();
    assert_eq!(err.parameter(), Some("offset_mm"));
    let err = circular_amplitude_difference(-7.6, 15.0, R_G, R_L, N).unwrap_err();
    assert_eq!(err.parameter(), Some("offset_mm"));
    assert!(circular_amplitude_difference(7.5, 15.0, R_G, R_L, N).is_ok());
}

#[test]
fn circular_amplitude_is_odd_and_saturates_at_edge() {
    let ratio = (R_G.powi(21) - R_L.powi(21)) / R_G.powi(21);
    let up = circular_amplitude_difference(3.0, 15.0, R_G, R_L, N).unwrap();
    let down = circular_amplitude_difference(-3.0, 15.0, R_G, R_L, N).unwrap();
    assert_close("odd", up, -down, 1e-12);
    let edge = circular_amplitude_difference(7.5, 15.0, R_G, R_L, N).unwrap();
    assert_close("edge", edge, ratio, 1e-12);
}

#[test]
fn unreachable_snr_is_domain_error() {
    // n = 1 에서 구분 인자 ≈ 0.0274 < 1/20
    let err = circular_precision(15.0, R_G, R_L, 1, 20.0).unwrap_err();
    assert_eq!(err.parameter(), Some("snr"));
}

#[test]
fn starved_solver_reports_convergence_failure() {
    let opts = SolverOptions {
        abs_tolerance: 0.0,
        x_tolerance: 0.0,
        max_iterations: 1,
    };
    let err = circular_precision_with(15.0, R_G, R_L, N, 100.0, &opts).unwrap_err();
    assert!(
        matches!(err, PrecisionError::NumericalConvergence { iterations: 1, .. }),
        "{err:?}"
    );
}

#[test]
fn solver_options_from_config_are_checked() {
    let cfg: Config = toml::from_str("[solver]\nabs_tolerance = 0.005\n").unwrap();
    let err = circular_precision_with(15.0, R_G, R_L, N, 100.0, &cfg.solver).unwrap_err();
    assert_eq!(err.parameter(), Some("abs_tolerance"), "{err:?}");

    let negative = SolverOptions {
        abs_tolerance: -1.0,
        x_tolerance: -1.0,
        max_iterations: 100,
    };
    let err = circular_precision_with(15.0, R_G, R_L, N, 100.0, &negative).unwrap_err();
    assert_eq!(err.parameter(), Some("abs_tolerance"), "{err:?}");

    let no_iterations = SolverOptions {
        max_iterations: 0,
        ..SolverOptions::default()
    };
    let err = circular_precision_with(15.0, R_G, R_L, N, 100.0, &no_iterations).unwrap_err();
    assert_eq!(err.parameter(), Some("max_iterations"));

    let tightest = SolverOptions {
        abs_tolerance: 1e-6,
        ..SolverOptions::default()
    };
    let p = circular_precision_with(15.0, R_G, R_L, N, 100.0, &tightest).unwrap();
    let a = circular_amplitude_difference(p, 15.0, R_G, R_L, N).unwrap();
    assert!((a - 0.01).abs() <= 1e-6, "a={a}");
}

#[test]
fn invalid_inputs_name_the_parameter() {
    let cases = [
        (rectangular_precision(0.0, R_G, R_L, N, 133.0), "height_mm"),
        (rectangular_precision(20.0, R_G, R_L, N, 0.0), "snr"),
        (rectangular_precision(20.0, 1.5, R_L, N, 133.0), "r_g"),
        (rectangular_precision(20.0, R_G, -0.1, N, 133.0), "r_l"),
        (rectangular_precision(20.0, R_G, R_L, 0, 133.0), "n"),
        (circular_precision(-1.0, R_G, R_L, N, 100.0), "diameter_mm"),
    ];
    for (result, parameter) in cases {
        assert_eq!(result.unwrap_err().parameter(), Some(parameter));
    }
}
