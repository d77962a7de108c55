use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::agent::{Agent, UnknownAgent};
use crate::config::Config;
use crate::i18n::{self, Translator};
use crate::report::{self, CrystalPreset};
use crate::sensor::{CrystalShape, CrystalSpec, PrecisionError, VesselGeometry};
use crate::ui_cli::{self, MenuChoice};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum AppError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// 설정 저장/로드 오류
    Config(crate::config::ConfigError),
    /// 정밀도 계산 오류
    Precision(PrecisionError),
    /// 결과 직렬화 오류
    Serialize(toml::ser::Error),
    /// 입력 해석 오류
    Parse(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Io(e) => write!(f, "입출력 오류: {e}"),
            AppError::Config(e) => write!(f, "설정 오류: {e}"),
            AppError::Precision(e) => write!(f, "정밀도 계산 오류: {e}"),
            AppError::Serialize(e) => write!(f, "결과 직렬화 오류: {e}"),
            AppError::Parse(msg) => write!(f, "입력 오류: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        AppError::Io(value)
    }
}

impl From<crate::config::ConfigError> for AppError {
    fn from(value: crate::config::ConfigError) -> Self {
        AppError::Config(value)
    }
}

impl From<PrecisionError> for AppError {
    fn from(value: PrecisionError) -> Self {
        AppError::Precision(value)
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(value: toml::ser::Error) -> Self {
        AppError::Serialize(value)
    }
}

impl From<UnknownAgent> for AppError {
    fn from(value: UnknownAgent) -> Self {
        AppError::Parse(value.to_string())
    }
}

#[derive(Parser, Debug)]
#[command(name = "portalevel_precision_cli")]
#[command(version)]
#[command(about = "Ultrasonic liquid-level sensor precision limits for cylindrical vessels", long_about = None)]
pub struct Cli {
    /// UI language (auto, ko, en)
    #[arg(short = 'L', long, global = true)]
    pub lang: Option<String>,

    /// Configuration file (default: ./config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// 측정 용기 치수. 생략하면 설정 파일 값을 쓴다.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct GeometryArgs {
    /// Vessel circumference (m)
    #[arg(short = 'c', long)]
    pub circumference: Option<f64>,

    /// Wall thickness (mm)
    #[arg(short = 't', long)]
    pub wall_thickness: Option<f64>,
}

/// 약제와 크리스탈 선택.
#[derive(clap::Args, Debug, Clone)]
pub struct CrystalArgs {
    /// Stored agent (co2, novec1230, fm200)
    #[arg(short = 'a', long)]
    pub agent: String,

    /// Crystal shape
    #[arg(short = 's', long, value_enum)]
    pub shape: ShapeArg,

    /// Crystal height (rectangular) or diameter (circular) in mm
    #[arg(short = 'd', long)]
    pub dimension: Option<f64>,

    /// Required signal-to-noise ratio
    #[arg(long)]
    pub snr: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Precision table: crystal presets x agents
    Table {
        #[command(flatten)]
        geometry: GeometryArgs,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Number of tangential reflections around the pipe wall
    Reflections {
        #[command(flatten)]
        geometry: GeometryArgs,
    },
    /// Precision of one crystal/agent combination
    Precision {
        #[command(flatten)]
        crystal: CrystalArgs,

        #[command(flatten)]
        geometry: GeometryArgs,
    },
    /// Normalized amplitude difference at a liquid level offset
    Amplitude {
        #[command(flatten)]
        crystal: CrystalArgs,

        /// Liquid level offset from the crystal centre (mm)
        #[arg(long, allow_negative_numbers = true)]
        offset: f64,

        #[command(flatten)]
        geometry: GeometryArgs,
    },
    /// Precision over a range of wall thicknesses
    Sweep {
        #[command(flatten)]
        crystal: CrystalArgs,

        /// Vessel circumference (m)
        #[arg(short = 'c', long)]
        circumference: Option<f64>,

        /// First wall thickness (mm)
        #[arg(long, default_value = "1.0")]
        from: f64,

        /// Last wall thickness (mm)
        #[arg(long, default_value = "40.0")]
        to: f64,

        /// Number of points
        #[arg(long, default_value = "14")]
        steps: usize,
    },
    /// Amplitude difference over the full crystal face
    Profile {
        #[command(flatten)]
        crystal: CrystalArgs,

        /// Number of samples
        #[arg(long, default_value = "21")]
        samples: usize,

        #[command(flatten)]
        geometry: GeometryArgs,
    },
    /// List supported agents and reflection coefficients
    Agents,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ShapeArg {
    Rectangular,
    Circular,
}

impl From<ShapeArg> for CrystalShape {
    fn from(value: ShapeArg) -> Self {
        match value {
            ShapeArg::Rectangular => CrystalShape::Rectangular,
            ShapeArg::Circular => CrystalShape::Circular,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Csv,
    Toml,
}

impl GeometryArgs {
    /// 인자가 없으면 설정 파일의 용기 치수로 채운다.
    pub fn resolve(&self, cfg: &Config) -> Result<VesselGeometry, PrecisionError> {
        VesselGeometry::new(
            self.circumference.unwrap_or(cfg.vessel.circumference_m),
            self.wall_thickness.unwrap_or(cfg.vessel.wall_thickness_mm),
        )
    }
}

impl CrystalArgs {
    pub fn agent(&self) -> Result<Agent, AppError> {
        Ok(self.agent.parse::<Agent>()?)
    }

    /// 형상별 설정 프리셋에 치수/SNR 인자를 덮어쓴다.
    pub fn preset(&self, cfg: &Config) -> Result<CrystalPreset, PrecisionError> {
        preset_for(cfg, self.shape.into(), self.dimension, self.snr)
    }
}

/// 설정 파일 값을 기본으로, 주어진 치수/SNR 로 덮어쓴 크리스탈 프리셋.
pub fn preset_for(
    cfg: &Config,
    shape: CrystalShape,
    dimension_mm: Option<f64>,
    snr: Option<f64>,
) -> Result<CrystalPreset, PrecisionError> {
    match shape {
        CrystalShape::Rectangular => Ok(CrystalPreset {
            crystal: CrystalSpec::rectangular(
                dimension_mm.unwrap_or(cfg.rectangular.height_mm),
                cfg.rectangular.width_mm,
            )?,
            snr: snr.unwrap_or(cfg.rectangular.snr),
        }),
        CrystalShape::Circular => Ok(CrystalPreset {
            crystal: CrystalSpec::circular(dimension_mm.unwrap_or(cfg.circular.diameter_mm))?,
            snr: snr.unwrap_or(cfg.circular.snr),
        }),
    }
}

/// 서브커맨드를 실행한다. 서브커맨드가 없으면 대화형 메뉴로 들어간다.
pub fn run(command: Option<Command>, config: &mut Config, tr: &Translator) -> Result<(), AppError> {
    let Some(command) = command else {
        return run_interactive(config, tr);
    };
    let opts = config.solver;
    match command {
        Command::Table { geometry, format } => {
            let geometry = geometry.resolve(config)?;
            let table = report::build_precision_table_with(geometry, &config.presets()?, &opts)?;
            match format {
                OutputFormat::Table => ui_cli::print_table(tr, &table),
                OutputFormat::Csv => print!("{}", table.to_csv()),
                OutputFormat::Toml => print!("{}", toml::to_string_pretty(&table)?),
            }
        }
        Command::Reflections { geometry } => {
            let geometry = geometry.resolve(config)?;
            ui_cli::print_reflections(tr, &geometry)?;
        }
        Command::Precision { crystal, geometry } => {
            let agent = crystal.agent()?;
            let preset = crystal.preset(config)?;
            let n = geometry.resolve(config)?.reflection_count()?;
            let precision =
                report::precision_for(&preset.crystal, &agent.reflectivity(), n, preset.snr, &opts)?;
            ui_cli::print_precision(tr, agent, &preset, n, precision);
        }
        Command::Amplitude {
            crystal,
            offset,
            geometry,
        } => {
            let agent = crystal.agent()?;
            let preset = crystal.preset(config)?;
            let n = geometry.resolve(config)?.reflection_count()?;
            let amplitude =
                report::amplitude_difference_for(&preset.crystal, &agent.reflectivity(), n, offset)?;
            ui_cli::print_amplitude(tr, offset, amplitude, preset.snr);
        }
        Command::Sweep {
            crystal,
            circumference,
            from,
            to,
            steps,
        } => {
            let agent = crystal.agent()?;
            let preset = crystal.preset(config)?;
            let circumference = circumference.unwrap_or(config.vessel.circumference_m);
            let points =
                report::sweep_wall_thickness(circumference, agent, &preset, from, to, steps, &opts)?;
            ui_cli::print_sweep(tr, &points);
        }
        Command::Profile {
            crystal,
            samples,
            geometry,
        } => {
            let agent = crystal.agent()?;
            let preset = crystal.preset(config)?;
            let n = geometry.resolve(config)?.reflection_count()?;
            let profile =
                report::amplitude_profile(&preset.crystal, &agent.reflectivity(), n, samples)?;
            println!("offset_mm,amplitude_difference");
            for (offset, amplitude) in profile {
                println!("{offset:.4},{amplitude:.6}");
            }
        }
        Command::Agents => ui_cli::print_agents(),
    }
    Ok(())
}

/// 대화형 메뉴 루프를 실행한다.
fn run_interactive(config: &mut Config, tr: &Translator) -> Result<(), AppError> {
    loop {
        let result = match ui_cli::main_menu(tr)? {
            MenuChoice::Table => ui_cli::handle_table(tr, config),
            MenuChoice::Reflections => ui_cli::handle_reflections(tr, config),
            MenuChoice::Precision => ui_cli::handle_precision(tr, config),
            MenuChoice::Amplitude => ui_cli::handle_amplitude(tr, config),
            MenuChoice::Sweep => ui_cli::handle_sweep(tr, config),
            MenuChoice::Settings => {
                ui_cli::handle_settings(tr, config)?;
                config.save()?;
                println!("{}", tr.t(i18n::keys::SETTINGS_SAVED));
                Ok(())
            }
            MenuChoice::Exit => {
                println!("{}", tr.t(i18n::keys::APP_EXIT));
                break;
            }
        };
        // 계산 오류는 메뉴를 빠져나가지 않고 보여준 뒤 계속한다
        match result {
            Ok(()) => {}
            Err(AppError::Precision(e)) => {
                println!("{}: {e}", tr.t(i18n::keys::ERROR_PREFIX));
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_table_with_geometry() {
        let cli = Cli::try_parse_from([
            "portalevel_precision_cli",
            "table",
            "-c",
            "2.62",
            "-t",
            "5",
            "--format",
            "csv",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Table { geometry, format }) => {
                assert_eq!(geometry.circumference, Some(2.62));
                assert_eq!(geometry.wall_thickness, Some(5.0));
                assert_eq!(format, OutputFormat::Csv);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["portalevel_precision_cli", "--lang", "ko"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.lang.as_deref(), Some("ko"));
    }

    #[test]
    fn precision_args_override_config_preset() {
        let cli = Cli::try_parse_from([
            "portalevel_precision_cli",
            "precision",
            "--agent",
            "fm200",
            "--shape",
            "circular",
            "--dimension",
            "12",
        ])
        .unwrap();
        let Some(Command::Precision { crystal, geometry }) = cli.command else {
            panic!("expected precision");
        };
        let cfg = Config::default();
        let preset = crystal.preset(&cfg).unwrap();
        assert_eq!(preset.crystal, CrystalSpec::Circular { diameter_mm: 12.0 });
        assert_eq!(preset.snr, 100.0);
        assert_eq!(crystal.agent().unwrap(), Agent::Fm200);
        assert_eq!(geometry.resolve(&cfg).unwrap().circumference_m, 2.62);
    }

    #[test]
    fn negative_offset_is_accepted() {
        let cli = Cli::try_parse_from([
            "portalevel_precision_cli",
            "amplitude",
            "-a",
            "co2",
            "-s",
            "rectangular",
            "--offset",
            "-2.5",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Command::Amplitude { offset, .. }) if offset == -2.5));
    }
}
