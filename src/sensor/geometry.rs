use std::f64::consts::PI;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::PrecisionError;

/// 사용자 입력 원주 범위 [m].
pub const CIRCUMFERENCE_RANGE_M: RangeInclusive<f64> = 0.25..=5.0;
/// 사용자 입력 벽 두께 범위 [mm].
pub const WALL_THICKNESS_RANGE_MM: RangeInclusive<f64> = 0.1..=40.0;

/// 원통형 용기의 원주와 벽 두께.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VesselGeometry {
    /// 원주 [m]
    pub circumference_m: f64,
    /// 벽 두께 [mm]
    pub wall_thickness_mm: f64,
}

impl VesselGeometry {
    /// 벽 두께가 반경보다 작은지 검증한 뒤 생성한다.
    pub fn new(circumference_m: f64, wall_thickness_mm: f64) -> Result<Self, PrecisionError> {
        let geometry = Self {
            circumference_m,
            wall_thickness_mm,
        };
        geometry.cos_half_angle()?;
        Ok(geometry)
    }

    pub fn radius_m(&self) -> f64 {
        self.circumference_m / (2.0 * PI)
    }

    pub fn wall_thickness_m(&self) -> f64 {
        self.wall_thickness_mm / 1000.0
    }

    /// 연속한 접선 반사 사이 각도 θ = 2·arccos((r - t) / r) [rad].
    pub fn reflection_angle_rad(&self) -> Result<f64, PrecisionError> {
        Ok(2.0 * self.cos_half_angle()?.acos())
    }

    /// 신호가 관 벽을 한 바퀴 도는 동안의 접선 반사 횟수. 부분 반사도 1회로 올림한다.
    pub fn reflection_count(&self) -> Result<u32, PrecisionError> {
        let half_angle = self.cos_half_angle()?.acos();
        let count = (PI / half_angle).ceil();
        if !count.is_finite() || count > u32::MAX as f64 {
            return Err(PrecisionError::domain(
                "wall_thickness_mm",
                self.wall_thickness_mm,
                "벽이 너무 얇아 반사 횟수를 표현할 수 없습니다",
            ));
        }
        Ok((count as u32).max(1))
    }

    /// (r - t) / r. 0 < t < r 를 벗어나면 arccos 정의역 밖이다.
    fn cos_half_angle(&self) -> Result<f64, PrecisionError> {
        if !(self.circumference_m.is_finite() && self.circumference_m > 0.0) {
            return Err(PrecisionError::domain(
                "circumference_m",
                self.circumference_m,
                "원주는 0보다 커야 합니다",
            ));
        }
        if !(self.wall_thickness_mm.is_finite() && self.wall_thickness_mm > 0.0) {
            return Err(PrecisionError::domain(
                "wall_thickness_mm",
                self.wall_thickness_mm,
                "벽 두께는 0보다 커야 합니다",
            ));
        }
        let r = self.radius_m();
        let t = self.wall_thickness_m();
        if t >= r {
            return Err(PrecisionError::domain(
                "wall_thickness_mm",
                self.wall_thickness_mm,
                "벽 두께가 용기 반경 이상입니다",
            ));
        }
        Ok((r - t) / r)
    }
}

/// 원주 [m]와 벽 두께 [mm]로 접선 반사 횟수를 계산한다.
pub fn reflection_count(circumference_m: f64, wall_thickness_mm: f64) -> Result<u32, PrecisionError> {
    VesselGeometry {
        circumference_m,
        wall_thickness_mm,
    }
    .reflection_count()
}
