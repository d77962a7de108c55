use serde::{Deserialize, Serialize};

use super::{check_positive, PrecisionError};

/// 압전 크리스탈 면의 형상.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrystalShape {
    Rectangular,
    Circular,
}

impl CrystalShape {
    pub fn code(&self) -> &'static str {
        match self {
            CrystalShape::Rectangular => "rectangular",
            CrystalShape::Circular => "circular",
        }
    }
}

impl std::str::FromStr for CrystalShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rectangular" | "rect" | "r" => Ok(CrystalShape::Rectangular),
            "circular" | "circle" | "c" => Ok(CrystalShape::Circular),
            other => Err(format!("알 수 없는 크리스탈 형상: {other}")),
        }
    }
}

/// 크리스탈 형상과 특성 치수(mm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum CrystalSpec {
    /// 폭은 물리 모델의 일부이지만 정밀도 식에는 쓰이지 않는다.
    Rectangular { height_mm: f64, width_mm: f64 },
    Circular { diameter_mm: f64 },
}

impl CrystalSpec {
    pub fn rectangular(height_mm: f64, width_mm: f64) -> Result<Self, PrecisionError> {
        check_positive("height_mm", height_mm)?;
        check_positive("width_mm", width_mm)?;
        Ok(CrystalSpec::Rectangular {
            height_mm,
            width_mm,
        })
    }

    pub fn circular(diameter_mm: f64) -> Result<Self, PrecisionError> {
        check_positive("diameter_mm", diameter_mm)?;
        Ok(CrystalSpec::Circular { diameter_mm })
    }

    pub fn shape(&self) -> CrystalShape {
        match self {
            CrystalSpec::Rectangular { .. } => CrystalShape::Rectangular,
            CrystalSpec::Circular { .. } => CrystalShape::Circular,
        }
    }

    /// 사각형은 높이, 원형은 지름.
    pub fn characteristic_mm(&self) -> f64 {
        match *self {
            CrystalSpec::Rectangular { height_mm, .. } => height_mm,
            CrystalSpec::Circular { diameter_mm } => diameter_mm,
        }
    }

    /// 액위 오프셋이 가질 수 있는 최대 절댓값.
    pub fn half_extent_mm(&self) -> f64 {
        0.5 * self.characteristic_mm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_shape_names_and_aliases() {
        assert_eq!("Rectangular".parse::<CrystalShape>(), Ok(CrystalShape::Rectangular));
        assert_eq!(" rect ".parse::<CrystalShape>(), Ok(CrystalShape::Rectangular));
        assert_eq!("circle".parse::<CrystalShape>(), Ok(CrystalShape::Circular));
        assert!("hexagon".parse::<CrystalShape>().is_err());
        for shape in [CrystalShape::Rectangular, CrystalShape::Circular] {
            assert_eq!(shape.code().parse::<CrystalShape>(), Ok(shape));
        }
    }

    #[test]
    fn half_extent_follows_characteristic_dimension() {
        let rect = CrystalSpec::rectangular(20.0, 10.0).unwrap();
        assert_eq!(rect.shape(), CrystalShape::Rectangular);
        assert_eq!(rect.half_extent_mm(), 10.0);
        let circ = CrystalSpec::circular(15.0).unwrap();
        assert_eq!(circ.half_extent_mm(), 7.5);
        assert_eq!(
            CrystalSpec::rectangular(20.0, 0.0).unwrap_err().parameter(),
            Some("width_mm")
        );
    }
}
