//! 초음파 액위 센서(Portalevel) 정밀도 모델 모음.
//! 반사 횟수 추정, 사각/원형 크리스탈 진폭차 모델과 역산으로 구성한다.

pub mod circular;
pub mod crystal;
pub mod error;
pub mod geometry;
pub mod rectangular;

pub use circular::{circular_amplitude_difference, circular_precision, circular_precision_with};
pub use crystal::{CrystalShape, CrystalSpec};
pub use error::PrecisionError;
pub use geometry::{reflection_count, VesselGeometry, CIRCUMFERENCE_RANGE_M, WALL_THICKNESS_RANGE_MM};
pub use rectangular::{rectangular_amplitude_difference, rectangular_precision};

use crate::agent::AgentReflectivity;

/// R_g^n - R_l^n 가 R_g^n 대비 이 값보다 작으면 구분 불가로 본다.
pub(crate) const DISCRIMINATION_EPSILON: f64 = 1e-12;

/// 두 크리스탈 모델이 공유하는 입력 검증 후 구분 인자 (R_g^n - R_l^n) / R_g^n 를 돌려준다.
pub(crate) fn discrimination(r_g: f64, r_l: f64, n: u32) -> Result<f64, PrecisionError> {
    let reflectivity = AgentReflectivity::new("custom", r_g, r_l)?;
    if n == 0 {
        return Err(PrecisionError::domain(
            "n",
            0.0,
            "반사 횟수는 1 이상이어야 합니다",
        ));
    }
    let ratio = reflectivity.amplitude_ratio(n);
    if !ratio.is_finite() || ratio.abs() < DISCRIMINATION_EPSILON {
        return Err(PrecisionError::DivisionByZero { r_g, r_l, n });
    }
    Ok(ratio)
}

pub(crate) fn check_positive(parameter: &'static str, value: f64) -> Result<(), PrecisionError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PrecisionError::domain(
            parameter,
            value,
            "0보다 큰 유한한 값이어야 합니다",
        ))
    }
}
