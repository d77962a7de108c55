//! 약제 × 크리스탈 형상 정밀도 표, 벽 두께 스윕, 진폭차 프로파일을 구성한다.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::agent::{Agent, AgentReflectivity};
use crate::sensor::{
    circular_amplitude_difference, circular_precision_with, rectangular_amplitude_difference,
    rectangular_precision, CrystalShape, CrystalSpec, PrecisionError, VesselGeometry,
};
use crate::solver::SolverOptions;

/// 스윕 점/프로파일 샘플 개수 상한.
pub const MAX_SAMPLES: usize = 10_000;

/// 크리스탈 치수와 요구 SNR 의 조합.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrystalPreset {
    pub snr: f64,
    pub crystal: CrystalSpec,
}

impl CrystalPreset {
    /// 사각 크리스탈 기본값: 높이 20 mm, SNR 133.
    pub fn rectangular_default() -> Self {
        Self {
            crystal: CrystalSpec::Rectangular {
                height_mm: 20.0,
                width_mm: 10.0,
            },
            snr: 133.0,
        }
    }

    /// 원형 크리스탈 기본값: 지름 15 mm, SNR 100.
    pub fn circular_default() -> Self {
        Self {
            crystal: CrystalSpec::Circular { diameter_mm: 15.0 },
            snr: 100.0,
        }
    }

    pub fn defaults() -> [CrystalPreset; 2] {
        [Self::rectangular_default(), Self::circular_default()]
    }
}

/// 크리스탈 형상에 맞는 정밀도 식으로 계산한다.
pub fn precision_for(
    crystal: &CrystalSpec,
    reflectivity: &AgentReflectivity,
    n: u32,
    snr: f64,
    opts: &SolverOptions,
) -> Result<f64, PrecisionError> {
    let (r_g, r_l) = (reflectivity.steel_gas, reflectivity.steel_liquid);
    match *crystal {
        CrystalSpec::Rectangular { height_mm, .. } => rectangular_precision(height_mm, r_g, r_l, n, snr),
        CrystalSpec::Circular { diameter_mm } => {
            circular_precision_with(diameter_mm, r_g, r_l, n, snr, opts)
        }
    }
}

/// 크리스탈 형상에 맞는 진폭차 식으로 계산한다.
pub fn amplitude_difference_for(
    crystal: &CrystalSpec,
    reflectivity: &AgentReflectivity,
    n: u32,
    offset_mm: f64,
) -> Result<f64, PrecisionError> {
    let (r_g, r_l) = (reflectivity.steel_gas, reflectivity.steel_liquid);
    match *crystal {
        CrystalSpec::Rectangular { height_mm, .. } => {
            rectangular_amplitude_difference(offset_mm, height_mm, r_g, r_l, n)
        }
        CrystalSpec::Circular { diameter_mm } => {
            circular_amplitude_difference(offset_mm, diameter_mm, r_g, r_l, n)
        }
    }
}

/// 표의 한 칸.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecisionCell {
    pub agent: Agent,
    /// ± 정밀도 [mm]
    pub precision_mm: f64,
    /// 경고/주의 메시지
    pub warnings: Vec<String>,
}

/// 크리스탈 프리셋 하나에 대한 약제별 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecisionRow {
    pub preset: CrystalPreset,
    pub cells: Vec<PrecisionCell>,
}

/// 정밀도 표 전체.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecisionTable {
    pub reflection_count: u32,
    pub geometry: VesselGeometry,
    pub rows: Vec<PrecisionRow>,
}

impl PrecisionTable {
    pub fn cell(&self, shape: CrystalShape, agent: Agent) -> Option<&PrecisionCell> {
        self.rows
            .iter()
            .find(|row| row.preset.crystal.shape() == shape)?
            .cells
            .iter()
            .find(|cell| cell.agent == agent)
    }

    /// 행=크리스탈, 열=약제 형태의 CSV.
    pub fn to_csv(&self) -> String {
        let mut out = String::from("crystal,dimension_mm,snr");
        for agent in Agent::ALL {
            out.push(',');
            out.push_str(agent.code());
        }
        out.push('\n');
        for row in &self.rows {
            // String 에 대한 fmt::Write 는 실패하지 않는다
            let _ = write!(
                out,
                "{},{},{}",
                row.preset.crystal.shape().code(),
                row.preset.crystal.characteristic_mm(),
                row.preset.snr
            );
            for agent in Agent::ALL {
                out.push(',');
                if let Some(cell) = row.cells.iter().find(|c| c.agent == agent) {
                    let _ = write!(out, "{:.4}", cell.precision_mm);
                }
            }
            out.push('\n');
        }
        out
    }
}

/// 기본 프리셋(사각 20 mm/SNR 133, 원형 15 mm/SNR 100)으로 정밀도 표를 만든다.
pub fn build_precision_table(
    circumference_m: f64,
    wall_thickness_mm: f64,
) -> Result<PrecisionTable, PrecisionError> {
    let geometry = VesselGeometry::new(circumference_m, wall_thickness_mm)?;
    build_precision_table_with(geometry, &CrystalPreset::defaults(), &SolverOptions::default())
}

/// 반사 횟수를 한 번 계산하고 프리셋 × 약제 조합마다 정밀도를 구한다.
pub fn build_precision_table_with(
    geometry: VesselGeometry,
    presets: &[CrystalPreset],
    opts: &SolverOptions,
) -> Result<PrecisionTable, PrecisionError> {
    let n = geometry.reflection_count()?;
    let mut rows = Vec::with_capacity(presets.len());
    for preset in presets {
        let mut cells = Vec::with_capacity(Agent::ALL.len());
        for agent in Agent::ALL {
            let precision_mm = precision_for(
                &preset.crystal,
                &agent.reflectivity(),
                n,
                preset.snr,
                opts,
            )?;
            let mut warnings = Vec::new();
            let half = preset.crystal.half_extent_mm();
            if precision_mm > half {
                warnings.push(format!(
                    "정밀도 {precision_mm:.3} mm 가 크리스탈 반치수 {half:.3} mm 보다 큽니다"
                ));
            }
            cells.push(PrecisionCell {
                agent,
                precision_mm,
                warnings,
            });
        }
        rows.push(PrecisionRow {
            preset: *preset,
            cells,
        });
    }
    Ok(PrecisionTable {
        geometry,
        reflection_count: n,
        rows,
    })
}

/// 벽 두께 스윕의 한 점. 기하가 유효하지 않은 점은 오류를 그대로 담는다.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    pub wall_thickness_mm: f64,
    /// (반사 횟수, 정밀도 mm)
    pub outcome: Result<(u32, f64), PrecisionError>,
}

/// 원주를 고정하고 벽 두께를 `from_mm`..=`to_mm` 에서 `steps` 개 점으로 나눠 정밀도를 구한다.
pub fn sweep_wall_thickness(
    circumference_m: f64,
    agent: Agent,
    preset: &CrystalPreset,
    from_mm: f64,
    to_mm: f64,
    steps: usize,
    opts: &SolverOptions,
) -> Result<Vec<SweepPoint>, PrecisionError> {
    if !(2..=MAX_SAMPLES).contains(&steps) {
        return Err(PrecisionError::domain(
            "steps",
            steps as f64,
            "스윕 점은 2개 이상 10000개 이하여야 합니다",
        ));
    }
    if !(from_mm.is_finite() && to_mm.is_finite()) {
        return Err(PrecisionError::domain(
            "from_mm",
            from_mm,
            "스윕 범위는 유한해야 합니다",
        ));
    }
    let reflectivity = agent.reflectivity();
    let step = (to_mm - from_mm) / (steps - 1) as f64;
    let points = (0..steps)
        .map(|i| {
            let wall_thickness_mm = from_mm + step * i as f64;
            let outcome = VesselGeometry::new(circumference_m, wall_thickness_mm)
                .and_then(|g| g.reflection_count())
                .and_then(|n| {
                    precision_for(&preset.crystal, &reflectivity, n, preset.snr, opts)
                        .map(|p| (n, p))
                });
            SweepPoint {
                wall_thickness_mm,
                outcome,
            }
        })
        .collect();
    Ok(points)
}

/// 액위 오프셋 [-반치수, +반치수] 구간을 `samples` 개로 나눈 (오프셋 mm, ΔÂ) 목록.
pub fn amplitude_profile(
    crystal: &CrystalSpec,
    reflectivity: &AgentReflectivity,
    n: u32,
    samples: usize,
) -> Result<Vec<(f64, f64)>, PrecisionError> {
    if !(2..=MAX_SAMPLES).contains(&samples) {
        return Err(PrecisionError::domain(
            "samples",
            samples as f64,
            "샘플은 2개 이상 10000개 이하여야 합니다",
        ));
    }
    let half = crystal.half_extent_mm();
    let step = 2.0 * half / (samples - 1) as f64;
    (0..samples)
        .map(|i| {
            // 마지막 점이 반올림으로 +half 를 넘지 않게 한다
            let offset = (-half + step * i as f64).min(half);
            amplitude_difference_for(crystal, reflectivity, n, offset).map(|a| (offset, a))
        })
        .collect()
}
