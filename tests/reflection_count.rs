//! 접선 반사 횟수 회귀 테스트.
use portalevel_precision::sensor::{reflection_count, VesselGeometry};

#[test]
fn reference_vessel_has_21_reflections() {
    // r = 2.62/(2π) ≈ 0.4170 m, t = 5 mm → π / acos(0.98801) ≈ 20.27 → 21
    let geometry = VesselGeometry::new(2.62, 5.0).expect("geometry");
    assert!((geometry.radius_m() - 0.41699).abs() < 1e-4);
    assert!((0.5 * geometry.reflection_angle_rad().unwrap() - 0.1550).abs() < 1e-3);
    assert_eq!(geometry.reflection_count().unwrap(), 21);
    assert_eq!(reflection_count(2.62, 5.0).unwrap(), 21);
}

#[test]
fn wall_thicker_than_radius_is_domain_error() {
    // C = 0.25 m → r ≈ 39.8 mm
    let err = reflection_count(0.25, 40.0).unwrap_err();
    assert_eq!(err.parameter(), Some("wall_thickness_mm"));
    assert!(VesselGeometry::new(0.25, 40.0).is_err());
}

#[test]
fn wall_equal_to_radius_is_rejected() {
    let c = 2.0 * std::f64::consts::PI * 0.1; // r = 100 mm
    assert!(reflection_count(c, 100.0).is_err());
    assert!(reflection_count(c, 99.0).is_ok());
}

#[test]
fn non_positive_inputs_are_rejected() {
    assert_eq!(
        reflection_count(0.0, 5.0).unwrap_err().parameter(),
        Some("circumference_m")
    );
    assert_eq!(
        reflection_count(2.62, 0.0).unwrap_err().parameter(),
        Some("wall_thickness_mm")
    );
    assert!(reflection_count(f64::NAN, 5.0).is_err());
}

#[test]
fn near_radius_wall_needs_only_a_few_reflections() {
    // t → r 이면 acos → π/2, n → 2
    let c = 2.0 * std::f64::consts::PI * 0.1;
    assert_eq!(reflection_count(c, 99.99).unwrap(), 3);
}

#[test]
fn thicker_walls_never_add_reflections() {
    let mut previous = u32::MAX;
    for step in 1..=400 {
        let t = step as f64 * 0.1;
        let n = reflection_count(2.62, t).unwrap();
        assert!(n >= 1);
        assert!(n <= previous, "t={t} n={n} prev={previous}");
        previous = n;
    }
}
