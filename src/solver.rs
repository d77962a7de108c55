//! 미분 없이 구간을 가둬 근을 찾는 Brent 방법.
//! 원형 크리스탈 정밀도처럼 닫힌 역함수가 없는 단일 변수 방정식에 사용한다.

use serde::{Deserialize, Serialize};

/// 근 찾기 허용오차와 반복 한도.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// 함수값(정규화 진폭 공간) 기준 허용 잔차
    pub abs_tolerance: f64,
    /// 변수(mm) 기준 구간 폭 허용오차
    pub x_tolerance: f64,
    /// 최대 반복 횟수
    pub max_iterations: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            abs_tolerance: 1e-9,
            x_tolerance: 1e-12,
            max_iterations: 100,
        }
    }
}

/// 정규화 진폭 공간에서 허용하는 최대 잔차.
pub const MAX_ABS_TOLERANCE: f64 = 1e-6;

impl SolverOptions {
    /// 허용오차는 유한한 0 이상 값, 잔차 허용오차는 [`MAX_ABS_TOLERANCE`] 이하, 반복은 1회 이상.
    pub fn validate(&self) -> Result<(), SolverError> {
        let tolerances = [
            ("abs_tolerance", self.abs_tolerance),
            ("x_tolerance", self.x_tolerance),
        ];
        for (parameter, value) in tolerances {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SolverError::InvalidOption {
                    parameter,
                    value,
                    reason: "허용오차는 0 이상의 유한한 값이어야 합니다",
                });
            }
        }
        if self.abs_tolerance > MAX_ABS_TOLERANCE {
            return Err(SolverError::InvalidOption {
                parameter: "abs_tolerance",
                value: self.abs_tolerance,
                reason: "잔차 허용오차는 1e-6 이하여야 합니다",
            });
        }
        if self.max_iterations == 0 {
            return Err(SolverError::InvalidOption {
                parameter: "max_iterations",
                value: 0.0,
                reason: "최대 반복 횟수는 1 이상이어야 합니다",
            });
        }
        Ok(())
    }
}

/// 수렴한 근.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Root {
    pub x: f64,
    /// |f(x)|
    pub residual: f64,
    pub iterations: usize,
}

/// 근 찾기 실패 사유.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// 구간 양 끝의 함수값 부호가 같음
    NotBracketed { f_lower: f64, f_upper: f64 },
    /// 반복 한도 초과
    NoConvergence { iterations: usize, residual: f64 },
    /// 허용오차/반복 설정이 잘못됨
    InvalidOption {
        parameter: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::NotBracketed { f_lower, f_upper } => {
                write!(f, "근이 구간에 없음: f(a)={f_lower}, f(b)={f_upper}")
            }
            SolverError::NoConvergence {
                iterations,
                residual,
            } => write!(f, "{iterations}회 반복 후 미수렴 (잔차 {residual:.3e})"),
            SolverError::InvalidOption {
                parameter,
                value,
                reason,
            } => write!(f, "근 찾기 설정 오류: {parameter}={value} ({reason})"),
        }
    }
}

impl std::error::Error for SolverError {}

/// [lower, upper] 안에서 f(x) = 0 의 근을 Brent 방법으로 찾는다.
///
/// 역2차 보간/할선법을 시도하고, 보간 결과가 구간을 벗어나거나 충분히 줄지 않으면
/// 이분법으로 물러난다. 매 단계 근은 [b, c] 안에 갇혀 있으므로 f의 정의역 밖을
/// 평가하지 않는다.
pub fn brent<F>(f: F, lower: f64, upper: f64, opts: &SolverOptions) -> Result<Root, SolverError>
where
    F: Fn(f64) -> f64,
{
    opts.validate()?;
    let mut a = lower;
    let mut b = upper;
    let mut fa = f(a);
    let mut fb = f(b);

    if fa == 0.0 {
        return Ok(Root {
            x: a,
            residual: 0.0,
            iterations: 0,
        });
    }
    if fb == 0.0 {
        return Ok(Root {
            x: b,
            residual: 0.0,
            iterations: 0,
        });
    }
    if fa.signum() == fb.signum() {
        return Err(SolverError::NotBracketed {
            f_lower: fa,
            f_upper: fb,
        });
    }

    let mut c = a;
    let mut fc = fa;
    let mut d = b - a;
    let mut e = d;

    for iteration in 1..=opts.max_iterations {
        if fb.signum() == fc.signum() {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        // b가 항상 최선의 추정값이 되도록 유지
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * opts.x_tolerance;
        let m = 0.5 * (c - b);
        if fb.abs() <= opts.abs_tolerance || m.abs() <= tol {
            return Ok(Root {
                x: b,
                residual: fb.abs(),
                iterations: iteration,
            });
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * m * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * m * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            } else {
                p = -p;
            }
            if 2.0 * p < (3.0 * m * q - (tol * q).abs()).min((e * q).abs()) {
                e = d;
                d = p / q;
            } else {
                d = m;
                e = m;
            }
        } else {
            d = m;
            e = m;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(m) };
        fb = f(b);
    }

    Err(SolverError::NoConvergence {
        iterations: opts.max_iterations,
        residual: fb.abs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_quadratic_root() {
        let root = brent(|x| x * x - 4.0, 1.0, 3.0, &SolverOptions::default()).unwrap();
        assert!((root.x - 2.0).abs() < 1e-9, "x={}", root.x);
        assert!(root.iterations < 20);
    }

    #[test]
    fn finds_root_with_reversed_bracket() {
        let root = brent(|x| 2.0 * x - 6.0, 5.0, 0.0, &SolverOptions::default()).unwrap();
        assert!((root.x - 3.0).abs() < 1e-9);
    }

    #[test]
    fn endpoint_root_returns_immediately() {
        let root = brent(|x| x, 0.0, 1.0, &SolverOptions::default()).unwrap();
        assert_eq!(root.x, 0.0);
        assert_eq!(root.iterations, 0);
    }

    #[test]
    fn rejects_unbracketed_interval() {
        let err = brent(|x| x * x + 1.0, 1.0, 3.0, &SolverOptions::default()).unwrap_err();
        assert!(matches!(err, SolverError::NotBracketed { .. }));
    }

    #[test]
    fn rejects_invalid_options_before_solving() {
        let cases = [
            (
                SolverOptions {
                    abs_tolerance: -1.0,
                    ..SolverOptions::default()
                },
                "abs_tolerance",
            ),
            (
                SolverOptions {
                    abs_tolerance: 0.005,
                    ..SolverOptions::default()
                },
                "abs_tolerance",
            ),
            (
                SolverOptions {
                    x_tolerance: f64::NAN,
                    ..SolverOptions::default()
                },
                "x_tolerance",
            ),
            (
                SolverOptions {
                    max_iterations: 0,
                    ..SolverOptions::default()
                },
                "max_iterations",
            ),
        ];
        for (opts, expected) in cases {
            match brent(|x| x - 0.5, 0.0, 1.0, &opts) {
                Err(SolverError::InvalidOption { parameter, .. }) => assert_eq!(parameter, expected),
                other => panic!("{expected}: unexpected {other:?}"),
            }
        }
        assert!(SolverOptions::default().validate().is_ok());
    }

    #[test]
    fn reports_exhausted_iteration_budget() {
        let opts = SolverOptions {
            abs_tolerance: 0.0,
            x_tolerance: 0.0,
            max_iterations: 2,
        };
        let err = brent(|x: f64| x.powi(3) - 0.3, 0.0, 1.0, &opts).unwrap_err();
        match err {
            SolverError::NoConvergence { iterations, .. } => assert_eq!(iterations, 2),
            other => panic!("unexpected {other:?}"),
        }
    }
}
