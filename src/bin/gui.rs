#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 데스크톱 GUI 진입점. 슬라이더로 용기/크리스탈을 바꾸면 즉시 다시 계산한다.

use eframe::{egui, App, Frame};
use rfd::FileDialog;
use std::{env, fs, path::Path};
use portalevel_precision::{
    agent::Agent,
    app::preset_for,
    config,
    i18n::{self, keys},
    report::{self, PrecisionTable},
    sensor::{CrystalShape, PrecisionError, VesselGeometry, CIRCUMFERENCE_RANGE_M, WALL_THICKNESS_RANGE_MM},
};

fn main() -> Result<(), eframe::Error> {
    // CLI 언어 옵션 처리: --lang xx 또는 --lang=xx (xx: auto/ko/en)
    let mut cli_lang: Option<String> = None;
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let a = &args[i];
        if let Some(val) = a.strip_prefix("--lang=") {
            cli_lang = Some(val.to_string());
        } else if (a == "--lang" || a == "-L") && i + 1 < args.len() {
            cli_lang = Some(args[i + 1].clone());
            i += 1;
        }
        i += 1;
    }

    let app_cfg = match config::load_or_default() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("config.toml 로드 실패, 기본값 사용: {e}");
            config::Config::default()
        }
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(egui::vec2(820.0, 640.0)),
        ..Default::default()
    };
    eframe::run_native(
        "Portalevel Precision",
        options,
        Box::new(move |cc| {
            if let Err(e) = setup_fonts(&cc.egui_ctx) {
                eprintln!("Font error: {e}");
            }
            Box::new(GuiApp::new(app_cfg, cli_lang.as_deref()))
        }),
    )
}

/// 공통: 바이너리 폰트 바이트를 egui에 등록.
fn apply_font_bytes(ctx: &egui::Context, bytes: Vec<u8>, name: &str) {
    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert(name.to_string(), egui::FontData::from_owned(bytes));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .insert(0, name.to_string());
    }
    ctx.set_fonts(fonts);
}

/// 한글 표시용 폰트를 찾는다. assets/fonts → Windows/Linux/macOS 시스템 폰트 순.
/// 모두 실패하면 egui 기본 폰트를 유지하고 Err를 반환한다.
fn setup_fonts(ctx: &egui::Context) -> Result<(), String> {
    let mut candidates = vec![
        "assets/fonts/malgun.ttf".to_string(),
        "/usr/share/fonts/truetype/nanum/NanumGothic.ttf".to_string(),
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc".to_string(),
        "/System/Library/Fonts/AppleSDGothicNeo.ttc".to_string(),
    ];
    if let Some(windir) = env::var_os("WINDIR") {
        let fonts = Path::new(&windir).join("Fonts");
        for name in ["malgun.ttf", "gulim.ttc"] {
            candidates.push(fonts.join(name).display().to_string());
        }
    }
    for cand in candidates {
        let p = Path::new(&cand);
        if p.exists() {
            let bytes = fs::read(p).map_err(|e| format!("Failed to read font ({cand}): {e}"))?;
            apply_font_bytes(ctx, bytes, "korean_font");
            return Ok(());
        }
    }
    Err("Korean font not found, using default font.".into())
}

struct GuiApp {
    config: config::Config,
    tr: i18n::Translator,
    lang_input: String,
    status: Option<String>,
    show_settings: bool,
    // 용기
    circumference_m: f64,
    wall_thickness_mm: f64,
    // 크리스탈/약제
    agent: Agent,
    shape: CrystalShape,
    rect_height_mm: f64,
    rect_snr: f64,
    circ_diameter_mm: f64,
    circ_snr: f64,
    offset_mm: f64,
}

/// 현재 입력으로 계산한 화면 표시값.
struct Evaluation {
    reflection_count: u32,
    precision_mm: Result<f64, PrecisionError>,
    amplitude: Result<f64, PrecisionError>,
    table: Result<PrecisionTable, PrecisionError>,
}

impl GuiApp {
    fn new(config: config::Config, cli_lang: Option<&str>) -> Self {
        let resolved = i18n::resolve_language(cli_lang, Some(config.language.as_str()));
        Self {
            tr: i18n::Translator::new_with_pack(&resolved, None),
            lang_input: config.language.clone(),
            status: None,
            show_settings: false,
            circumference_m: config.vessel.circumference_m,
            wall_thickness_mm: config.vessel.wall_thickness_mm,
            agent: Agent::Co2,
            shape: CrystalShape::Rectangular,
            rect_height_mm: config.rectangular.height_mm,
            rect_snr: config.rectangular.snr,
            circ_diameter_mm: config.circular.diameter_mm,
            circ_snr: config.circular.snr,
            offset_mm: 0.0,
            config,
        }
    }

    /// 슬라이더 값을 설정에 반영한다. 표/프리셋 계산은 항상 이 설정을 거친다.
    fn sync_config(&mut self) {
        self.config.vessel.circumference_m = self.circumference_m;
        self.config.vessel.wall_thickness_mm = self.wall_thickness_mm;
        self.config.rectangular.height_mm = self.rect_height_mm;
        self.config.rectangular.snr = self.rect_snr;
        self.config.circular.diameter_mm = self.circ_diameter_mm;
        self.config.circular.snr = self.circ_snr;
    }

    fn half_extent_mm(&self) -> f64 {
        match self.shape {
            CrystalShape::Rectangular => 0.5 * self.rect_height_mm,
            CrystalShape::Circular => 0.5 * self.circ_diameter_mm,
        }
    }

    fn evaluate(&self) -> Result<Evaluation, PrecisionError> {
        let geometry = VesselGeometry::new(self.circumference_m, self.wall_thickness_mm)?;
        let n = geometry.reflection_count()?;
        let preset = preset_for(&self.config, self.shape, None, None)?;
        let reflectivity = self.agent.reflectivity();
        let opts = self.config.solver;
        Ok(Evaluation {
            reflection_count: n,
            precision_mm: report::precision_for(&preset.crystal, &reflectivity, n, preset.snr, &opts),
            amplitude: report::amplitude_difference_for(&preset.crystal, &reflectivity, n, self.offset_mm),
            table: self
                .config
                .presets()
                .and_then(|presets| report::build_precision_table_with(geometry, &presets, &opts)),
        })
    }

    fn ui_inputs(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        ui.heading(tr.t(keys::GUI_VESSEL));
        egui::Grid::new("vessel_grid").num_columns(2).show(ui, |ui| {
            ui.label(tr.t(keys::PROMPT_CIRCUMFERENCE));
            ui.add(egui::Slider::new(&mut self.circumference_m, CIRCUMFERENCE_RANGE_M).suffix(" m"));
            ui.end_row();
            ui.label(tr.t(keys::PROMPT_WALL_THICKNESS));
            ui.add(egui::Slider::new(&mut self.wall_thickness_mm, WALL_THICKNESS_RANGE_MM).suffix(" mm"));
            ui.end_row();
        });

        ui.separator();
        ui.heading(tr.t(keys::GUI_CRYSTAL));
        egui::Grid::new("crystal_grid").num_columns(2).show(ui, |ui| {
            ui.label("Agent");
            egui::ComboBox::from_id_source("agent_choice")
                .selected_text(self.agent.label())
                .show_ui(ui, |ui| {
                    for agent in Agent::ALL {
                        ui.selectable_value(&mut self.agent, agent, agent.label());
                    }
                });
            ui.end_row();

            ui.label(tr.t(keys::TABLE_CRYSTAL));
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.shape, CrystalShape::Rectangular, tr.t(keys::TABLE_RECTANGULAR));
                ui.selectable_value(&mut self.shape, CrystalShape::Circular, tr.t(keys::TABLE_CIRCULAR));
            });
            ui.end_row();

            match self.shape {
                CrystalShape::Rectangular => {
                    ui.label("h [mm]");
                    ui.add(egui::DragValue::new(&mut self.rect_height_mm).speed(0.5).clamp_range(1.0..=100.0));
                    ui.end_row();
                    ui.label("SNR");
                    ui.add(egui::DragValue::new(&mut self.rect_snr).speed(1.0).clamp_range(1.0..=10_000.0));
                    ui.end_row();
                }
                CrystalShape::Circular => {
                    ui.label("d [mm]");
                    ui.add(egui::DragValue::new(&mut self.circ_diameter_mm).speed(0.5).clamp_range(1.0..=100.0));
                    ui.end_row();
                    ui.label("SNR");
                    ui.add(egui::DragValue::new(&mut self.circ_snr).speed(1.0).clamp_range(1.0..=10_000.0));
                    ui.end_row();
                }
            }

            // 오프셋은 크리스탈 반치수 안으로 제한
            let half = self.half_extent_mm();
            self.offset_mm = self.offset_mm.clamp(-half, half);
            ui.label(tr.t(keys::PROMPT_OFFSET));
            ui.add(egui::Slider::new(&mut self.offset_mm, -half..=half).suffix(" mm"));
            ui.end_row();
        });
    }

    fn ui_results(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        ui.heading(tr.t(keys::GUI_RESULT));
        let eval = match self.evaluate() {
            Ok(eval) => eval,
            Err(e) => {
                ui.colored_label(egui::Color32::RED, format!("{}: {e}", tr.t(keys::ERROR_PREFIX)));
                return;
            }
        };
        ui.label(format!("{}: {}", tr.t(keys::RESULT_REFLECTIONS), eval.reflection_count));
        match &eval.precision_mm {
            Ok(p) => ui.label(format!("{}: ±{p:.4} mm", tr.t(keys::RESULT_PRECISION))),
            Err(e) => ui.colored_label(egui::Color32::RED, e.to_string()),
        };
        match &eval.amplitude {
            Ok(a) => ui.label(format!("{}: ΔÂ = {a:.6}", tr.t(keys::RESULT_AMPLITUDE))),
            Err(e) => ui.colored_label(egui::Color32::RED, e.to_string()),
        };

        ui.separator();
        ui.heading(tr.t(keys::GUI_TABLE));
        match &eval.table {
            Ok(table) => {
                egui::Grid::new("precision_table").striped(true).show(ui, |ui| {
                    ui.strong(tr.t(keys::TABLE_CRYSTAL));
                    for agent in Agent::ALL {
                        ui.strong(agent.label());
                    }
                    ui.end_row();
                    for row in &table.rows {
                        let shape = match row.preset.crystal.shape() {
                            CrystalShape::Rectangular => tr.t(keys::TABLE_RECTANGULAR),
                            CrystalShape::Circular => tr.t(keys::TABLE_CIRCULAR),
                        };
                        ui.label(format!(
                            "{shape} {} mm / SNR {}",
                            row.preset.crystal.characteristic_mm(),
                            row.preset.snr
                        ));
                        for cell in &row.cells {
                            let text = format!("±{:.4}", cell.precision_mm);
                            if cell.warnings.is_empty() {
                                ui.label(text);
                            } else {
                                ui.colored_label(egui::Color32::YELLOW, text)
                                    .on_hover_text(cell.warnings.join("\n"));
                            }
                        }
                        ui.end_row();
                    }
                });
                if ui.button(tr.t(keys::GUI_EXPORT_CSV)).clicked() {
                    self.status = Some(export_csv(table, tr.t(keys::GUI_EXPORTED)));
                }
            }
            Err(e) => {
                ui.colored_label(egui::Color32::RED, e.to_string());
            }
        }
        if let Some(msg) = &self.status {
            ui.small(msg.as_str());
        }
    }
}

/// 저장 대화상자로 표를 CSV 로 내보낸다. 취소하면 빈 메시지.
fn export_csv(table: &PrecisionTable, saved_label: &str) -> String {
    let Some(path) = FileDialog::new()
        .add_filter("CSV", &["csv"])
        .set_file_name("portalevel_precision.csv")
        .save_file()
    else {
        return String::new();
    };
    match fs::write(&path, table.to_csv()) {
        Ok(()) => format!("{saved_label}: {}", path.display()),
        Err(e) => {
            eprintln!("CSV export failed: {e}");
            format!("CSV export failed: {e}")
        }
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let tr = self.tr.clone();
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(tr.t(keys::APP_TITLE));
                ui.separator();
                if ui.button(tr.t(keys::GUI_SETTINGS)).clicked() {
                    self.show_settings = true;
                }
            });
        });

        if self.show_settings {
            let mut save_clicked = false;
            egui::Window::new(tr.t(keys::GUI_SETTINGS))
                .collapsible(false)
                .resizable(false)
                .open(&mut self.show_settings)
                .show(ctx, |ui| {
                    ui.label(tr.t(keys::SETTINGS_LANGUAGE));
                    egui::ComboBox::from_id_source("lang_choice")
                        .selected_text(&self.lang_input)
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut self.lang_input, "auto".into(), "auto");
                            ui.selectable_value(&mut self.lang_input, "ko".into(), "한국어");
                            ui.selectable_value(&mut self.lang_input, "en".into(), "English");
                        });
                    if ui.button(tr.t(keys::GUI_SAVE)).clicked() {
                        save_clicked = true;
                    }
                });
            if save_clicked {
                self.config.language = self.lang_input.clone();
                let resolved = i18n::resolve_language(None, Some(self.config.language.as_str()));
                self.tr = i18n::Translator::new_with_pack(&resolved, None);
                self.status = Some(match self.config.save() {
                    Ok(()) => self.tr.t(keys::SETTINGS_SAVED).to_string(),
                    Err(e) => {
                        eprintln!("Save error: {e}");
                        format!("Save error: {e}")
                    }
                });
            }
        }

        egui::SidePanel::left("inputs")
            .resizable(true)
            .default_width(360.0)
            .show(ctx, |ui| {
                self.ui_inputs(ui);
            });
        self.sync_config();

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| self.ui_results(ui));
        });
    }
}
