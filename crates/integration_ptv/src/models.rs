//! PTV transport modes and enumerated query values

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::query::Scalar;

/// Transport mode as numbered by the Timetable API (`route_type`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RouteType {
    /// Metropolitan train
    Train,
    /// Tram
    Tram,
    /// Metropolitan and regional bus
    Bus,
    /// V/Line regional train and coach
    VLine,
    /// Night network bus
    NightBus,
}

impl RouteType {
    /// All route types in numeric order
    pub const ALL: [Self; 5] = [
        Self::Train,
        Self::Tram,
        Self::Bus,
        Self::VLine,
        Self::NightBus,
    ];

    /// Numeric identifier used in paths and query strings
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Train => 0,
            Self::Tram => 1,
            Self::Bus => 2,
            Self::VLine => 3,
            Self::NightBus => 4,
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Train => "Train",
            Self::Tram => "Tram",
            Self::Bus => "Bus",
            Self::VLine => "V/Line",
            Self::NightBus => "Night Bus",
        }
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<u8> for RouteType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|rt| rt.id() == value)
            .ok_or_else(|| format!("Unknown route type {value}; expected 0-4"))
    }
}

impl From<RouteType> for u8 {
    fn from(value: RouteType) -> Self {
        value.id()
    }
}

impl From<RouteType> for Scalar {
    fn from(value: RouteType) -> Self {
        Self::Integer(i64::from(value.id()))
    }
}

impl FromStr for RouteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(id) = s.parse::<u8>() {
            return Self::try_from(id);
        }

        let normalized: String = s
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "train" => Ok(Self::Train),
            "tram" => Ok(Self::Tram),
            "bus" => Ok(Self::Bus),
            "vline" => Ok(Self::VLine),
            "nightbus" => Ok(Self::NightBus),
            _ => Err(format!(
                "Unknown route type '{s}'. Supported: train, tram, bus, vline, night-bus or 0-4."
            )),
        }
    }
}

/// Related objects the API can embed in a response (`expand`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expand {
    /// Every related object
    All,
    /// Stops
    Stop,
    /// Routes
    Route,
    /// Runs
    Run,
    /// Directions
    Direction,
    /// Disruptions
    Disruption,
    /// Live vehicle positions
    VehiclePosition,
    /// Vehicle descriptors
    VehicleDescriptor,
    /// Nothing
    None,
}

impl Expand {
    /// Wire value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Stop => "Stop",
            Self::Route => "Route",
            Self::Run => "Run",
            Self::Direction => "Direction",
            Self::Disruption => "Disruption",
            Self::VehiclePosition => "VehiclePosition",
            Self::VehicleDescriptor => "VehicleDescriptor",
            Self::None => "None",
        }
    }
}

impl From<Expand> for Scalar {
    fn from(value: Expand) -> Self {
        Self::Text(value.as_str().to_string())
    }
}

/// Disruption lifecycle filter (`disruption_status`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisruptionStatus {
    /// In effect now
    Current,
    /// Scheduled for the future
    Planned,
}

impl DisruptionStatus {
    /// Wire value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Planned => "planned",
        }
    }
}

impl From<DisruptionStatus> for Scalar {
    fn from(value: DisruptionStatus) -> Self {
        Self::Text(value.as_str().to_string())
    }
}
