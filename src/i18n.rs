use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";
    pub const APP_TITLE: &str = "general.app_title";

    pub const MAIN_MENU_TABLE: &str = "main_menu.table";
    pub const MAIN_MENU_REFLECTIONS: &str = "main_menu.reflections";
    pub const MAIN_MENU_PRECISION: &str = "main_menu.precision";
    pub const MAIN_MENU_AMPLITUDE: &str = "main_menu.amplitude";
    pub const MAIN_MENU_SWEEP: &str = "main_menu.sweep";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";
    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";

    pub const PROMPT_CIRCUMFERENCE: &str = "prompt.circumference";
    pub const PROMPT_WALL_THICKNESS: &str = "prompt.wall_thickness";
    pub const PROMPT_AGENT: &str = "prompt.agent";
    pub const PROMPT_SHAPE: &str = "prompt.shape";
    pub const PROMPT_OFFSET: &str = "prompt.offset";
    pub const PROMPT_SWEEP_FROM: &str = "prompt.sweep_from";
    pub const PROMPT_SWEEP_TO: &str = "prompt.sweep_to";
    pub const PROMPT_SWEEP_STEPS: &str = "prompt.sweep_steps";
    pub const HINT_KEEP_DEFAULT: &str = "prompt.keep_default";

    pub const RESULT_REFLECTIONS: &str = "result.reflections";
    pub const RESULT_PRECISION: &str = "result.precision";
    pub const RESULT_AMPLITUDE: &str = "result.amplitude";
    pub const RESULT_OUT_OF_RANGE: &str = "result.out_of_range";

    pub const TABLE_CRYSTAL: &str = "table.crystal";
    pub const TABLE_RECTANGULAR: &str = "table.rectangular";
    pub const TABLE_CIRCULAR: &str = "table.circular";
    pub const TABLE_WARNINGS: &str = "table.warnings";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_LANGUAGE: &str = "settings.language";
    pub const SETTINGS_SAVED: &str = "settings.saved";

    pub const GUI_VESSEL: &str = "gui.vessel";
    pub const GUI_CRYSTAL: &str = "gui.crystal";
    pub const GUI_RESULT: &str = "gui.result";
    pub const GUI_TABLE: &str = "gui.table";
    pub const GUI_EXPORT_CSV: &str = "gui.export_csv";
    pub const GUI_EXPORTED: &str = "gui.exported";
    pub const GUI_SETTINGS: &str = "gui.settings";
    pub const GUI_SAVE: &str = "gui.save";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Ko,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        if code.to_lowercase().starts_with("ko") {
            Language::Ko
        } else {
            Language::En
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(ko/en)에 따라 번역기를 생성한다. 알 수 없는 코드는 en으로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code));
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    /// 번역을 가져온다. 언어팩 > 내장 문자열 > 키 순으로 찾는다.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        if let Some(v) = self.overrides.as_ref().and_then(|m| m.get(key)) {
            return v;
        }
        let built_in = match self.lang {
            Language::Ko => ko(key),
            Language::En => en(key),
        };
        built_in.unwrap_or(key)
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: Option<&str>, config_lang: Option<&str>) -> String {
    cli_arg
        .and_then(normalize_lang)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        other if other.starts_with("ko") => Some("ko".into()),
        other if other.starts_with("en") => Some("en".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    get_locale()
        .and_then(|loc| normalize_locale_string(&loc))
        .or_else(|| {
            ["LC_ALL", "LANG"]
                .iter()
                .filter_map(|var| std::env::var(var).ok())
                .find_map(|loc| normalize_locale_string(&loc))
        })
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    normalize_lang(&lang)
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 또는 [section] 아래 key = "value".
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let path = Path::new(dir).join(format!("{lang}.toml"));
    let content = fs::read_to_string(path).ok()?;
    parse_toml_to_map(&content)
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.clone());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    walk("", &value, &mut map);
    Some(map)
}

fn ko(key: &str) -> Option<&'static str> {
    use keys::*;
    let s = match key {
        ERROR_PREFIX => "오류",
        APP_EXIT => "프로그램을 종료합니다.",
        APP_TITLE => "Portalevel 정밀도 계산기",
        MAIN_MENU_TABLE => "1) 약제별 정밀도 표",
        MAIN_MENU_REFLECTIONS => "2) 반사 횟수 계산",
        MAIN_MENU_PRECISION => "3) 크리스탈 정밀도 계산",
        MAIN_MENU_AMPLITUDE => "4) 액위 오프셋 진폭차",
        MAIN_MENU_SWEEP => "5) 벽 두께 스윕",
        MAIN_MENU_SETTINGS => "6) 설정",
        MAIN_MENU_EXIT => "0) 종료",
        PROMPT_MENU_SELECT => "메뉴 선택: ",
        INVALID_SELECTION_RETRY => "잘못된 입력입니다. 다시 선택하세요.",
        ERROR_INVALID_NUMBER => "숫자를 입력하세요.",
        PROMPT_CIRCUMFERENCE => "용기 원주 [m]",
        PROMPT_WALL_THICKNESS => "벽 두께 [mm]",
        PROMPT_AGENT => "약제 (1=CO2 2=Novec 1230 3=FM-200): ",
        PROMPT_SHAPE => "크리스탈 (1=사각 2=원형): ",
        PROMPT_OFFSET => "액위 오프셋 [mm]",
        PROMPT_SWEEP_FROM => "시작 벽 두께 [mm]",
        PROMPT_SWEEP_TO => "끝 벽 두께 [mm]",
        PROMPT_SWEEP_STEPS => "점 개수",
        HINT_KEEP_DEFAULT => "엔터=기본값",
        RESULT_REFLECTIONS => "접선 반사 횟수",
        RESULT_PRECISION => "정밀도",
        RESULT_AMPLITUDE => "정규화 진폭차",
        RESULT_OUT_OF_RANGE => "계산 불가",
        TABLE_CRYSTAL => "크리스탈",
        TABLE_RECTANGULAR => "사각",
        TABLE_CIRCULAR => "원형",
        TABLE_WARNINGS => "주의",
        SETTINGS_HEADING => "-- 설정 --",
        SETTINGS_LANGUAGE => "언어 (auto/ko/en)",
        SETTINGS_SAVED => "설정이 저장되었습니다.",
        GUI_VESSEL => "용기",
        GUI_CRYSTAL => "크리스탈",
        GUI_RESULT => "결과",
        GUI_TABLE => "약제별 정밀도 표 [± mm]",
        GUI_EXPORT_CSV => "CSV 내보내기",
        GUI_EXPORTED => "저장했습니다",
        GUI_SETTINGS => "설정",
        GUI_SAVE => "설정 저장",
        _ => return None,
    };
    Some(s)
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    let s = match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Exiting.",
        APP_TITLE => "Portalevel Precision Toolbox",
        MAIN_MENU_TABLE => "1) Precision table by agent",
        MAIN_MENU_REFLECTIONS => "2) Reflection count",
        MAIN_MENU_PRECISION => "3) Crystal precision",
        MAIN_MENU_AMPLITUDE => "4) Amplitude difference at level offset",
        MAIN_MENU_SWEEP => "5) Wall thickness sweep",
        MAIN_MENU_SETTINGS => "6) Settings",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select menu: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please choose again.",
        ERROR_INVALID_NUMBER => "Please enter a number.",
        PROMPT_CIRCUMFERENCE => "Vessel circumference [m]",
        PROMPT_WALL_THICKNESS => "Wall thickness [mm]",
        PROMPT_AGENT => "Agent (1=CO2 2=Novec 1230 3=FM-200): ",
        PROMPT_SHAPE => "Crystal (1=rectangular 2=circular): ",
        PROMPT_OFFSET => "Liquid level offset [mm]",
        PROMPT_SWEEP_FROM => "Start wall thickness [mm]",
        PROMPT_SWEEP_TO => "End wall thickness [mm]",
        PROMPT_SWEEP_STEPS => "Number of points",
        HINT_KEEP_DEFAULT => "enter=default",
        RESULT_REFLECTIONS => "Tangential reflections",
        RESULT_PRECISION => "Precision",
        RESULT_AMPLITUDE => "Normalized amplitude difference",
        RESULT_OUT_OF_RANGE => "n/a",
        TABLE_CRYSTAL => "Crystal",
        TABLE_RECTANGULAR => "Rectangular",
        TABLE_CIRCULAR => "Circular",
        TABLE_WARNINGS => "Note",
        SETTINGS_HEADING => "-- Settings --",
        SETTINGS_LANGUAGE => "Language (auto/ko/en)",
        SETTINGS_SAVED => "Settings saved.",
        GUI_VESSEL => "Vessel",
        GUI_CRYSTAL => "Crystal",
        GUI_RESULT => "Result",
        GUI_TABLE => "Precision by agent [± mm]",
        GUI_EXPORT_CSV => "Export CSV",
        GUI_EXPORTED => "Saved",
        GUI_SETTINGS => "Settings",
        GUI_SAVE => "Save settings",
        _ => return None,
    };
    Some(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flag_wins_over_config() {
        assert_eq!(resolve_language(Some("ko-KR"), Some("en")), "ko");
        assert_eq!(resolve_language(Some("auto"), Some("en-us")), "en");
    }

    #[test]
    fn translator_reports_active_language_code() {
        assert_eq!(Translator::new("ko-KR").language().as_code(), "ko");
        assert_eq!(Translator::new("fr").language().as_code(), "en");
    }

    #[test]
    fn unknown_key_falls_back_to_key() {
        let tr = Translator::new("en");
        assert_eq!(tr.t("no.such.key"), "no.such.key");
        assert_eq!(tr.t(keys::RESULT_PRECISION), "Precision");
    }

    #[test]
    fn every_korean_key_has_english_text() {
        use keys::*;
        for key in [
            ERROR_PREFIX,
            APP_TITLE,
            MAIN_MENU_TABLE,
            PROMPT_AGENT,
            RESULT_REFLECTIONS,
            TABLE_CIRCULAR,
            GUI_EXPORT_CSV,
        ] {
            assert!(ko(key).is_some(), "{key}");
            assert!(en(key).is_some(), "{key}");
        }
    }

    #[test]
    fn nested_pack_flattens_keys() {
        let map = parse_toml_to_map("[result]\nprecision = \"Genauigkeit\"\n").unwrap();
        assert_eq!(map.get("result.precision").map(String::as_str), Some("Genauigkeit"));
    }
}
