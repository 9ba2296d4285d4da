use std::fmt;

use serde::{Deserialize, Serialize};

/// Flight status as reported by oracles.
///
/// The numeric codes are part of the caller-facing surface and must not
/// change: `Unknown=0, OnTime=10, LateAirline=20, LateWeather=30,
/// LateTechnical=40, LateOther=50`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightStatus {
    Unknown,
    OnTime,
    LateAirline,
    LateWeather,
    LateTechnical,
    LateOther,
}

impl FlightStatus {
    pub fn code(&self) -> u8 {
        match self {
            FlightStatus::Unknown => 0,
            FlightStatus::OnTime => 10,
            FlightStatus::LateAirline => 20,
            FlightStatus::LateWeather => 30,
            FlightStatus::LateTechnical => 40,
            FlightStatus::LateOther => 50,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(FlightStatus::Unknown),
            10 => Some(FlightStatus::OnTime),
            20 => Some(FlightStatus::LateAirline),
            30 => Some(FlightStatus::LateWeather),
            40 => Some(FlightStatus::LateTechnical),
            50 => Some(FlightStatus::LateOther),
            _ => None,
        }
    }

    /// Only an airline-caused delay obligates a payout.
    pub fn is_payable(&self) -> bool {
        matches!(self, FlightStatus::LateAirline)
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightStatus::Unknown => write!(f, "unknown"),
            FlightStatus::OnTime => write!(f, "on-time"),
            FlightStatus::LateAirline => write!(f, "late-airline"),
            FlightStatus::LateWeather => write!(f, "late-weather"),
            FlightStatus::LateTechnical => write!(f, "late-technical"),
            FlightStatus::LateOther => write!(f, "late-other"),
        }
    }
}
