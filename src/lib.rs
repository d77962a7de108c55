//! 초음파 액위 센서 정밀도 계산 로직을 라이브러리로 분리하여 CLI 뿐 아니라 GUI 에서도 같은 식을 쓴다.

pub mod agent;
pub mod app;
pub mod config;
pub mod i18n;
pub mod report;
pub mod sensor;
pub mod solver;
pub mod ui_cli;

pub use agent::{Agent, AgentReflectivity};
pub use report::{build_precision_table, PrecisionTable};
pub use sensor::{
    circular_precision, rectangular_precision, reflection_count, CrystalShape, CrystalSpec,
    PrecisionError, VesselGeometry,
};
