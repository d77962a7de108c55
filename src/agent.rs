//! 저장 약제(가스/액체 쌍)별 강철 계면 반사계수 카탈로그.
//! 값은 강철 벽(Z ≈ 45.53 MRayl) 기준 강도 반사계수이며 참고용이다.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::sensor::PrecisionError;

/// 지원하는 저장 약제.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Agent {
    Co2,
    Novec1230,
    Fm200,
}

/// 강철-기체, 강철-액체 반사계수 쌍.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgentReflectivity {
    pub name: &'static str,
    /// 강철-기체 계면 반사계수 R_g
    pub steel_gas: f64,
    /// 강철-액체 계면 반사계수 R_l
    pub steel_liquid: f64,
}

const CO2: AgentReflectivity = AgentReflectivity {
    name: "CO2",
    steel_gas: 0.996751447224324,
    steel_liquid: 0.96941482,
};

const NOVEC_1230: AgentReflectivity = AgentReflectivity {
    name: "Novec 1230",
    steel_gas: 0.999095950,
    steel_liquid: 0.929505271,
};

const FM_200: AgentReflectivity = AgentReflectivity {
    name: "FM-200",
    steel_gas: 0.999095950,
    steel_liquid: 0.935423387,
};

impl Agent {
    pub const ALL: [Agent; 3] = [Agent::Co2, Agent::Novec1230, Agent::Fm200];

    pub fn reflectivity(&self) -> AgentReflectivity {
        match self {
            Agent::Co2 => CO2,
            Agent::Novec1230 => NOVEC_1230,
            Agent::Fm200 => FM_200,
        }
    }

    /// 화면 표시용 이름.
    pub fn label(&self) -> &'static str {
        self.reflectivity().name
    }

    /// CLI/설정 파일에서 쓰는 코드.
    pub fn code(&self) -> &'static str {
        match self {
            Agent::Co2 => "co2",
            Agent::Novec1230 => "novec1230",
            Agent::Fm200 => "fm200",
        }
    }
}

impl std::fmt::Display for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// 알 수 없는 약제 이름.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAgent(pub String);

impl std::fmt::Display for UnknownAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "알 수 없는 약제: {} (co2, novec1230, fm200)", self.0)
    }
}

impl std::error::Error for UnknownAgent {}

impl FromStr for Agent {
    type Err = UnknownAgent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "co2" => Ok(Agent::Co2),
            "novec1230" | "novec" | "fk51112" => Ok(Agent::Novec1230),
            "fm200" | "hfc227ea" => Ok(Agent::Fm200),
            _ => Err(UnknownAgent(s.to_string())),
        }
    }
}

impl AgentReflectivity {
    /// 사용자 정의 반사계수 쌍. 두 값 모두 (0, 1] 범위여야 한다.
    pub fn new(
        name: &'static str,
        steel_gas: f64,
        steel_liquid: f64,
    ) -> Result<Self, PrecisionError> {
        check_coefficient("r_g", steel_gas)?;
        check_coefficient("r_l", steel_liquid)?;
        Ok(Self {
            name,
            steel_gas,
            steel_liquid,
        })
    }

    /// 음향 임피던스(Rayl)로부터 반사계수 쌍을 만든다.
    pub fn from_impedances(
        name: &'static str,
        z_wall: f64,
        z_gas: f64,
        z_liquid: f64,
    ) -> Result<Self, PrecisionError> {
        for (parameter, z) in [("z_wall", z_wall), ("z_gas", z_gas), ("z_liquid", z_liquid)] {
            if !(z.is_finite() && z > 0.0) {
                return Err(PrecisionError::domain(
                    parameter,
                    z,
                    "음향 임피던스는 0보다 커야 합니다",
                ));
            }
        }
        Self::new(
            name,
            intensity_reflection_coefficient(z_wall, z_gas),
            intensity_reflection_coefficient(z_wall, z_liquid),
        )
    }

    /// n회 반사 후 기체/액체 진폭 구분 인자 (R_g^n - R_l^n) / R_g^n.
    pub fn amplitude_ratio(&self, n: u32) -> f64 {
        let (gas, liquid) = self.attenuated(n);
        (gas - liquid) / gas
    }

    /// n회 반사 후 (R_g^n, R_l^n).
    pub fn attenuated(&self, n: u32) -> (f64, f64) {
        let n = n as i32;
        (self.steel_gas.powi(n), self.steel_liquid.powi(n))
    }
}

fn check_coefficient(parameter: &'static str, value: f64) -> Result<(), PrecisionError> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(PrecisionError::domain(
            parameter,
            value,
            "반사계수는 (0, 1] 범위여야 합니다",
        ))
    }
}

/// 두 매질 계면의 강도 반사계수 ((Z1 - Z2) / (Z1 + Z2))².
pub fn intensity_reflection_coefficient(z1: f64, z2: f64) -> f64 {
    let r = (z1 - z2) / (z1 + z2);
    r * r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_agent_aliases() {
        assert_eq!("CO2".parse::<Agent>().unwrap(), Agent::Co2);
        assert_eq!("Novec-1230".parse::<Agent>().unwrap(), Agent::Novec1230);
        assert_eq!("fm_200".parse::<Agent>().unwrap(), Agent::Fm200);
        assert_eq!("HFC-227ea".parse::<Agent>().unwrap(), Agent::Fm200);
        assert!("halon".parse::<Agent>().is_err());
    }

    #[test]
    fn code_roundtrips_through_from_str() {
        for agent in Agent::ALL {
            assert_eq!(agent.code().parse::<Agent>().unwrap(), agent);
        }
    }

    #[test]
    fn catalog_liquid_reflects_less_than_gas() {
        for agent in Agent::ALL {
            let r = agent.reflectivity();
            assert!(r.steel_liquid < r.steel_gas, "{agent}");
            assert!(r.steel_gas <= 1.0 && r.steel_liquid > 0.0);
        }
    }

    #[test]
    fn impedances_reproduce_co2_pair() {
        // 강철 7850 kg/m³ × 5800 m/s, CO2 기체상/액체상 임피던스
        let r = AgentReflectivity::from_impedances("CO2", 7850.0 * 5800.0, 37_060.0, 353_700.0)
            .unwrap();
        let co2 = Agent::Co2.reflectivity();
        assert!((r.steel_gas - co2.steel_gas).abs() < 1e-4, "{}", r.steel_gas);
        assert!((r.steel_liquid - co2.steel_liquid).abs() < 1e-3, "{}", r.steel_liquid);
    }

    #[test]
    fn rejects_coefficient_out_of_range() {
        let err = AgentReflectivity::new("bad", 1.2, 0.5).unwrap_err();
        assert_eq!(err.parameter(), Some("r_g"));
        assert!(AgentReflectivity::new("bad", 0.9, 0.0).is_err());
    }
}
