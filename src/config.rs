use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::report::CrystalPreset;
use crate::sensor::{CrystalSpec, PrecisionError, VesselGeometry};
use crate::solver::{SolverError, SolverOptions};

/// 기본 설정 파일 이름.
pub const CONFIG_FILE: &str = "config.toml";

/// 용기 기본 치수.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VesselDefaults {
    pub circumference_m: f64,
    pub wall_thickness_mm: f64,
}

impl Default for VesselDefaults {
    fn default() -> Self {
        Self {
            circumference_m: 2.62,
            wall_thickness_mm: 5.0,
        }
    }
}

/// 사각 크리스탈 기본값.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RectangularDefaults {
    pub height_mm: f64,
    pub width_mm: f64,
    pub snr: f64,
}

impl Default for RectangularDefaults {
    fn default() -> Self {
        Self {
            height_mm: 20.0,
            width_mm: 10.0,
            snr: 133.0,
        }
    }
}

/// 원형 크리스탈 기본값.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CircularDefaults {
    pub diameter_mm: f64,
    pub snr: f64,
}

impl Default for CircularDefaults {
    fn default() -> Self {
        Self {
            diameter_mm: 15.0,
            snr: 100.0,
        }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// "auto", "ko", "en"
    pub language: String,
    pub vessel: VesselDefaults,
    pub rectangular: RectangularDefaults,
    pub circular: CircularDefaults,
    pub solver: SolverOptions,
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".into(),
            vessel: VesselDefaults::default(),
            rectangular: RectangularDefaults::default(),
            circular: CircularDefaults::default(),
            solver: SolverOptions::default(),
            path: None,
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum ConfigError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// TOML 역직렬화 오류
    Serde(toml::de::Error),
    /// TOML 직렬화 오류
    Serialize(toml::ser::Error),
    /// [solver] 값 오류
    Solver(SolverError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "파일 입출력 오류: {e}"),
            ConfigError::Serde(e) => write!(f, "설정 파싱 오류: {e}"),
            ConfigError::Serialize(e) => write!(f, "설정 직렬화 오류: {e}"),
            ConfigError::Solver(e) => write!(f, "[solver] 설정 오류: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Serde(value)
    }
}

impl From<SolverError> for ConfigError {
    fn from(value: SolverError) -> Self {
        ConfigError::Solver(value)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(value: toml::ser::Error) -> Self {
        ConfigError::Serialize(value)
    }
}

/// config.toml을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default() -> Result<Config, ConfigError> {
    load_from(Path::new(CONFIG_FILE))
}

/// 지정 경로의 설정을 로드한다. 파일이 없으면 기본값으로 새로 만든다.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let mut cfg = if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg = toml::from_str::<Config>(&content)?;
        cfg.solver.validate()?;
        cfg
    } else {
        let cfg = Config::default();
        write_config(&cfg, path)?;
        cfg
    };
    cfg.path = Some(path.to_path_buf());
    Ok(cfg)
}

fn write_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(cfg)?;
    fs::write(path, content)?;
    Ok(())
}

impl Config {
    /// 설정을 읽어온 경로(없으면 config.toml)에 저장한다.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = self
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
        write_config(self, &path)
    }

    pub fn geometry(&self) -> Result<VesselGeometry, PrecisionError> {
        VesselGeometry::new(self.vessel.circumference_m, self.vessel.wall_thickness_mm)
    }

    /// 설정값으로 구성한 (사각, 원형) 크리스탈 프리셋.
    pub fn presets(&self) -> Result<[CrystalPreset; 2], PrecisionError> {
        Ok([
            CrystalPreset {
                crystal: CrystalSpec::rectangular(self.rectangular.height_mm, self.rectangular.width_mm)?,
                snr: self.rectangular.snr,
            },
            CrystalPreset {
                crystal: CrystalSpec::circular(self.circular.diameter_mm)?,
                snr: self.circular.snr,
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrips_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.vessel.circumference_m, 2.62);
        assert_eq!(back.rectangular.snr, 133.0);
        assert_eq!(back.circular.diameter_mm, 15.0);
        assert_eq!(back.solver, SolverOptions::default());
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let cfg: Config = toml::from_str("[vessel]\nwall_thickness_mm = 8.0\n").unwrap();
        assert_eq!(cfg.vessel.wall_thickness_mm, 8.0);
        assert_eq!(cfg.vessel.circumference_m, 2.62);
        assert_eq!(cfg.language, "auto");
        assert_eq!(cfg.solver.max_iterations, 100);
    }

    #[test]
    fn presets_follow_config_values() {
        let mut cfg = Config::default();
        cfg.circular.diameter_mm = 25.0;
        let [rect, circ] = cfg.presets().unwrap();
        assert_eq!(rect.crystal.characteristic_mm(), 20.0);
        assert_eq!(circ.crystal.characteristic_mm(), 25.0);
        assert_eq!(circ.snr, 100.0);
    }

    #[test]
    fn load_from_rejects_loose_solver_tolerance() {
        let dir = std::env::temp_dir().join(format!("portalevel_solver_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[solver]\nabs_tolerance = 0.005\n").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(
            matches!(
                err,
                ConfigError::Solver(SolverError::InvalidOption {
                    parameter: "abs_tolerance",
                    ..
                })
            ),
            "{err:?}"
        );
        fs::write(&path, "[solver]\nmax_iterations = 0\n").unwrap();
        assert!(matches!(load_from(&path), Err(ConfigError::Solver(_))));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn load_from_creates_missing_file() {
        let dir = std::env::temp_dir().join(format!("portalevel_cfg_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let _ = fs::remove_file(&path);
        let cfg = load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.vessel.wall_thickness_mm, 5.0);
        fs::remove_dir_all(&dir).unwrap();
    }
}
