use std::io::{self, Write};

use crate::agent::Agent;
use crate::app::{preset_for, AppError};
use crate::config::Config;
use crate::i18n::{keys, Translator};
use crate::report::{self, CrystalPreset, PrecisionTable, SweepPoint};
use crate::sensor::{CrystalShape, VesselGeometry};

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Table,
    Reflections,
    Precision,
    Amplitude,
    Sweep,
    Settings,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    println!("\n=== {} ===", tr.t(keys::APP_TITLE));
    for key in [
        keys::MAIN_MENU_TABLE,
        keys::MAIN_MENU_REFLECTIONS,
        keys::MAIN_MENU_PRECISION,
        keys::MAIN_MENU_AMPLITUDE,
        keys::MAIN_MENU_SWEEP,
        keys::MAIN_MENU_SETTINGS,
        keys::MAIN_MENU_EXIT,
    ] {
        println!("{}", tr.t(key));
    }
    loop {
        let sel = read_line(tr.t(keys::PROMPT_MENU_SELECT))?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::Table),
            "2" => return Ok(MenuChoice::Reflections),
            "3" => return Ok(MenuChoice::Precision),
            "4" => return Ok(MenuChoice::Amplitude),
            "5" => return Ok(MenuChoice::Sweep),
            "6" => return Ok(MenuChoice::Settings),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

/// 정밀도 표 메뉴를 처리한다.
pub fn handle_table(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    let geometry = read_geometry(tr, cfg)?;
    let table = report::build_precision_table_with(geometry, &cfg.presets()?, &cfg.solver)?;
    print_table(tr, &table);
    Ok(())
}

/// 반사 횟수 메뉴를 처리한다.
pub fn handle_reflections(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    let geometry = read_geometry(tr, cfg)?;
    print_reflections(tr, &geometry)
}

/// 단일 크리스탈/약제 정밀도 메뉴를 처리한다.
pub fn handle_precision(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    let geometry = read_geometry(tr, cfg)?;
    let agent = read_agent(tr)?;
    let preset = preset_for(cfg, read_shape(tr)?, None, None)?;
    let n = geometry.reflection_count()?;
    let precision =
        report::precision_for(&preset.crystal, &agent.reflectivity(), n, preset.snr, &cfg.solver)?;
    print_precision(tr, agent, &preset, n, precision);
    Ok(())
}

/// 액위 오프셋 진폭차 메뉴를 처리한다.
pub fn handle_amplitude(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    let geometry = read_geometry(tr, cfg)?;
    let agent = read_agent(tr)?;
    let preset = preset_for(cfg, read_shape(tr)?, None, None)?;
    let half = preset.crystal.half_extent_mm();
    let offset = read_f64_or(tr, &format!("{} (±{half:.2})", tr.t(keys::PROMPT_OFFSET)), 0.0)?;
    let n = geometry.reflection_count()?;
    let amplitude =
        report::amplitude_difference_for(&preset.crystal, &agent.reflectivity(), n, offset)?;
    print_amplitude(tr, offset, amplitude, preset.snr);
    Ok(())
}

/// 벽 두께 스윕 메뉴를 처리한다.
pub fn handle_sweep(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    let circumference = read_f64_or(
        tr,
        tr.t(keys::PROMPT_CIRCUMFERENCE),
        cfg.vessel.circumference_m,
    )?;
    let agent = read_agent(tr)?;
    let preset = preset_for(cfg, read_shape(tr)?, None, None)?;
    let from = read_f64_or(tr, tr.t(keys::PROMPT_SWEEP_FROM), 1.0)?;
    let to = read_f64_or(tr, tr.t(keys::PROMPT_SWEEP_TO), 40.0)?;
    let steps = read_f64_or(tr, tr.t(keys::PROMPT_SWEEP_STEPS), 14.0)?.max(0.0) as usize;
    let points =
        report::sweep_wall_thickness(circumference, agent, &preset, from, to, steps, &cfg.solver)?;
    print_sweep(tr, &points);
    Ok(())
}

/// 설정 메뉴를 처리한다.
pub fn handle_settings(tr: &Translator, cfg: &mut Config) -> Result<(), AppError> {
    println!("\n{}", tr.t(keys::SETTINGS_HEADING));
    cfg.vessel.circumference_m = read_f64_or(
        tr,
        tr.t(keys::PROMPT_CIRCUMFERENCE),
        cfg.vessel.circumference_m,
    )?;
    cfg.vessel.wall_thickness_mm = read_f64_or(
        tr,
        tr.t(keys::PROMPT_WALL_THICKNESS),
        cfg.vessel.wall_thickness_mm,
    )?;
    let lang = read_line(&format!(
        "{} [{} → {}]: ",
        tr.t(keys::SETTINGS_LANGUAGE),
        cfg.language,
        tr.language().as_code()
    ))?;
    if !lang.trim().is_empty() {
        cfg.language = lang.trim().to_lowercase();
    }
    Ok(())
}

/// 정밀도 표를 출력한다. 행=크리스탈, 열=약제.
pub fn print_table(tr: &Translator, table: &PrecisionTable) {
    println!(
        "\nC = {:.3} m, t = {:.2} mm, {} n = {}",
        table.geometry.circumference_m,
        table.geometry.wall_thickness_mm,
        tr.t(keys::RESULT_REFLECTIONS),
        table.reflection_count
    );
    print!("{:<22}", tr.t(keys::TABLE_CRYSTAL));
    for agent in Agent::ALL {
        print!("{:>14}", agent.label());
    }
    println!();
    let mut notes = Vec::new();
    for row in &table.rows {
        print!("{:<22}", preset_label(tr, &row.preset));
        for cell in &row.cells {
            print!("{:>14}", format!("±{:.4}", cell.precision_mm));
            notes.extend(cell.warnings.iter().map(|w| format!("{}: {w}", cell.agent)));
        }
        println!();
    }
    for note in notes {
        println!("{}: {note}", tr.t(keys::TABLE_WARNINGS));
    }
}

pub fn print_reflections(tr: &Translator, geometry: &VesselGeometry) -> Result<(), AppError> {
    let n = geometry.reflection_count()?;
    let theta = geometry.reflection_angle_rad()?;
    println!(
        "r = {:.4} m, θ = {:.4} rad ({:.2}°), {} = {n}",
        geometry.radius_m(),
        theta,
        theta.to_degrees(),
        tr.t(keys::RESULT_REFLECTIONS)
    );
    Ok(())
}

pub fn print_precision(tr: &Translator, agent: Agent, preset: &CrystalPreset, n: u32, precision_mm: f64) {
    println!(
        "{agent}, {}, SNR {}, n = {n}: {} ±{precision_mm:.4} mm",
        preset_label(tr, preset),
        preset.snr,
        tr.t(keys::RESULT_PRECISION)
    );
}

pub fn print_amplitude(tr: &Translator, offset_mm: f64, amplitude: f64, snr: f64) {
    println!(
        "L = {offset_mm:.3} mm: {} ΔÂ = {amplitude:.6} (1/SNR = {:.6})",
        tr.t(keys::RESULT_AMPLITUDE),
        1.0 / snr
    );
}

pub fn print_sweep(tr: &Translator, points: &[SweepPoint]) {
    println!("{:>10} {:>6} {:>12}", "t [mm]", "n", "± [mm]");
    for point in points {
        match &point.outcome {
            Ok((n, precision)) => {
                println!("{:>10.2} {n:>6} {precision:>12.4}", point.wall_thickness_mm)
            }
            Err(e) => println!(
                "{:>10.2} {:>6} {:>12}  ({e})",
                point.wall_thickness_mm,
                "-",
                tr.t(keys::RESULT_OUT_OF_RANGE)
            ),
        }
    }
}

pub fn print_agents() {
    println!("{:<12} {:<12} {:>18} {:>18}", "code", "name", "R_g", "R_l");
    for agent in Agent::ALL {
        let r = agent.reflectivity();
        println!(
            "{:<12} {:<12} {:>18.15} {:>18.15}",
            agent.code(),
            r.name,
            r.steel_gas,
            r.steel_liquid
        );
    }
}

fn preset_label(tr: &Translator, preset: &CrystalPreset) -> String {
    match preset.crystal.shape() {
        CrystalShape::Rectangular => format!(
            "{} h={}mm",
            tr.t(keys::TABLE_RECTANGULAR),
            preset.crystal.characteristic_mm()
        ),
        CrystalShape::Circular => format!(
            "{} d={}mm",
            tr.t(keys::TABLE_CIRCULAR),
            preset.crystal.characteristic_mm()
        ),
    }
}

fn read_geometry(tr: &Translator, cfg: &Config) -> Result<VesselGeometry, AppError> {
    let c = read_f64_or(tr, tr.t(keys::PROMPT_CIRCUMFERENCE), cfg.vessel.circumference_m)?;
    let t = read_f64_or(tr, tr.t(keys::PROMPT_WALL_THICKNESS), cfg.vessel.wall_thickness_mm)?;
    Ok(VesselGeometry::new(c, t)?)
}

fn read_agent(tr: &Translator) -> Result<Agent, AppError> {
    loop {
        let sel = read_line(tr.t(keys::PROMPT_AGENT))?;
        match sel.trim() {
            "1" => return Ok(Agent::Co2),
            "2" => return Ok(Agent::Novec1230),
            "3" => return Ok(Agent::Fm200),
            other => match other.parse::<Agent>() {
                Ok(agent) => return Ok(agent),
                Err(_) => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
            },
        }
    }
}

fn read_shape(tr: &Translator) -> Result<CrystalShape, AppError> {
    loop {
        let sel = read_line(tr.t(keys::PROMPT_SHAPE))?;
        match sel.trim() {
            "1" => return Ok(CrystalShape::Rectangular),
            "2" => return Ok(CrystalShape::Circular),
            other => match other.parse::<CrystalShape>() {
                Ok(shape) => return Ok(shape),
                Err(_) => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
            },
        }
    }
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush().map_err(AppError::Io)?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).map_err(AppError::Io)?;
    Ok(buf)
}

/// 빈 입력이면 기본값을 돌려준다.
fn read_f64_or(tr: &Translator, label: &str, default: f64) -> Result<f64, AppError> {
    let prompt = format!("{label} [{default}, {}]: ", tr.t(keys::HINT_KEEP_DEFAULT));
    loop {
        let s = read_line(&prompt)?;
        let s = s.trim();
        if s.is_empty() {
            return Ok(default);
        }
        match s.parse::<f64>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}
