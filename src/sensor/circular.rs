//! 원형 크리스탈 진폭차 모델. 역함수가 닫힌 형태로 없어 수치적으로 근을 찾는다.

use std::f64::consts::PI;

use super::{check_positive, discrimination, PrecisionError};
use crate::solver::{self, SolverOptions};

/// 원형 크리스탈의 현(chord) 면적 비율 항 [π - 2·acos(x) + 2x·√(1 - x²)] / π, x = 2p/d.
fn segment_fraction(x: f64) -> f64 {
    (PI - 2.0 * x.acos() + 2.0 * x * (1.0 - x * x).sqrt()) / PI
}

/// 액위가 중심에서 `offset_mm` 만큼 움직였을 때의 정규화 진폭차.
///
/// ΔÂ = (R_g^n - R_l^n) / (π·R_g^n) · [π - 2·acos(2p/d) + (4p/d)·√(1 - 4p²/d²)]
pub fn circular_amplitude_difference(
    offset_mm: f64,
    diameter_mm: f64,
    r_g: f64,
    r_l: f64,
    n: u32,
) -> Result<f64, PrecisionError> {
    check_positive("diameter_mm", diameter_mm)?;
    let x = 2.0 * offset_mm / diameter_mm;
    if !x.is_finite() || x.abs() > 1.0 {
        return Err(PrecisionError::domain(
            "offset_mm",
            offset_mm,
            "2p/d 가 [-1, 1] 을 벗어납니다",
        ));
    }
    let ratio = discrimination(r_g, r_l, n)?;
    Ok(ratio * segment_fraction(x))
}

/// 기본 허용오차로 원형 크리스탈 정밀도 [mm]를 구한다.
pub fn circular_precision(
    diameter_mm: f64,
    r_g: f64,
    r_l: f64,
    n: u32,
    snr: f64,
) -> Result<f64, PrecisionError> {
    circular_precision_with(diameter_mm, r_g, r_l, n, snr, &SolverOptions::default())
}

/// ΔÂ(p) = 1/SNR 의 근 p [mm]를 [0, d/2] 구간 안에서 Brent 방법으로 찾는다.
///
/// ΔÂ 는 p 에 대해 홀함수이고 [0, d/2] 에서 단조 증가하므로 근은 유일하다.
/// d/2 에서도 1/SNR 에 못 미치면 이 크리스탈로는 요구 SNR 을 만족할 수 없다.
pub fn circular_precision_with(
    diameter_mm: f64,
    r_g: f64,
    r_l: f64,
    n: u32,
    snr: f64,
    opts: &SolverOptions,
) -> Result<f64, PrecisionError> {
    check_positive("diameter_mm", diameter_mm)?;
    check_positive("snr", snr)?;
    opts.validate()?;
    let ratio = discrimination(r_g, r_l, n)?.abs();
    let target = 1.0 / snr;
    if ratio < target {
        return Err(PrecisionError::domain(
            "snr",
            snr,
            "크리스탈 전체가 잠겨도 1/SNR 진폭차에 도달하지 못합니다",
        ));
    }

    let half = 0.5 * diameter_mm;
    // 반올림으로 |x| 가 1을 살짝 넘는 경우를 막기 위해 클램프
    let f = |p: f64| ratio * segment_fraction((p / half).clamp(-1.0, 1.0)) - target;
    let root = solver::brent(f, 0.0, half, opts)?;
    Ok(root.x.abs())
}
