use crate::solver::SolverError;

/// 정밀도 계산 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Clone, PartialEq)]
pub enum PrecisionError {
    /// 물리적 전제 조건을 벗어난 입력 (벽 두께 ≥ 반경, 액위 오프셋 초과 등)
    Domain {
        parameter: &'static str,
        value: f64,
        reason: &'static str,
    },
    /// 기체/액체 반사계수를 n회 반사 후 구분할 수 없어 역산이 정의되지 않음
    DivisionByZero { r_g: f64, r_l: f64, n: u32 },
    /// 원형 크리스탈 근 찾기가 반복 한도 안에 수렴하지 않음
    NumericalConvergence { iterations: usize, residual: f64 },
}

impl PrecisionError {
    pub(crate) fn domain(parameter: &'static str, value: f64, reason: &'static str) -> Self {
        PrecisionError::Domain {
            parameter,
            value,
            reason,
        }
    }

    /// 오류의 원인이 된 입력 이름. 도메인 오류가 아니면 `None`.
    pub fn parameter(&self) -> Option<&'static str> {
        match self {
            PrecisionError::Domain { parameter, .. } => Some(parameter),
            _ => None,
        }
    }
}

impl std::fmt::Display for PrecisionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrecisionError::Domain {
                parameter,
                value,
                reason,
            } => write!(f, "입력 범위 오류: {parameter}={value} ({reason})"),
            PrecisionError::DivisionByZero { r_g, r_l, n } => write!(
                f,
                "반사계수 구분 불가: R_g={r_g}, R_l={r_l}, n={n} 에서 R_g^n - R_l^n 이 0에 가깝습니다"
            ),
            PrecisionError::NumericalConvergence {
                iterations,
                residual,
            } => write!(
                f,
                "수치 해석 수렴 실패: {iterations}회 반복 후 잔차 {residual:.3e}"
            ),
        }
    }
}

impl std::error::Error for PrecisionError {}

impl From<SolverError> for PrecisionError {
    fn from(value: SolverError) -> Self {
        match value {
            SolverError::NoConvergence {
                iterations,
                residual,
            } => PrecisionError::NumericalConvergence {
                iterations,
                residual,
            },
            SolverError::NotBracketed { f_lower, f_upper } => PrecisionError::domain(
                "bracket",
                f_lower * f_upper,
                "구간 양 끝의 부호가 같아 근을 가둘 수 없습니다",
            ),
            SolverError::InvalidOption {
                parameter,
                value,
                reason,
            } => PrecisionError::domain(parameter, value, reason),
        }
    }
}
