//! 사각 크리스탈 진폭차 모델. 닫힌 형태의 역산이 존재한다.

use super::{check_positive, discrimination, PrecisionError};

/// 액위가 크리스탈 중심에서 `offset_mm` 만큼 움직였을 때의 정규화 진폭차.
///
/// ΔÂ_L = (2L / h) · (R_g^n - R_l^n) / R_g^n
pub fn rectangular_amplitude_difference(
    offset_mm: f64,
    height_mm: f64,
    r_g: f64,
    r_l: f64,
    n: u32,
) -> Result<f64, PrecisionError> {
    check_positive("height_mm", height_mm)?;
    if !offset_mm.is_finite() || offset_mm.abs() > 0.5 * height_mm {
        return Err(PrecisionError::domain(
            "offset_mm",
            offset_mm,
            "액위 오프셋이 크리스탈 높이의 절반을 넘습니다",
        ));
    }
    let ratio = discrimination(r_g, r_l, n)?;
    Ok(2.0 * offset_mm / height_mm * ratio)
}

/// ΔÂ_L = 1/SNR 을 L에 대해 푼 정밀도 [mm].
///
/// L = h · R_g^n / (2 · SNR · (R_g^n - R_l^n)). 물리적으로 0에 대해 대칭이므로 크기만 돌려준다.
pub fn rectangular_precision(
    height_mm: f64,
    r_g: f64,
    r_l: f64,
    n: u32,
    snr: f64,
) -> Result<f64, PrecisionError> {
    check_positive("height_mm", height_mm)?;
    check_positive("snr", snr)?;
    let ratio = discrimination(r_g, r_l, n)?;
    Ok((height_mm / (2.0 * snr * ratio)).abs())
}
