//! Closed classification sets for lanes and boundaries.
//!
//! Every set carries an explicit `Unknown` member. Ground truth must never
//! contain it, but the type system cannot express that, so the validator
//! reports it instead.

use serde::{Deserialize, Serialize};

/// Coarse lane type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneType {
    #[default]
    Unknown,
    Other,
    Driving,
    Nondriving,
    Intersection,
}

/// Fine-grained lane purpose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneSubtype {
    #[default]
    Unknown,
    Other,
    Normal,
    Biking,
    Sidewalk,
    Parking,
    Stop,
    Restricted,
    Border,
    Shoulder,
    Exit,
    Entry,
    Onramp,
    Offramp,
    Connectingramp,
    Emergency,
    Hov,
}

/// Structural surroundings of a lane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneFraming {
    #[default]
    Unknown,
    Open,
    Tunnel,
    Bridge,
}

/// Physical kind of a boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryType {
    #[default]
    Unknown,
    Other,
    NoLine,
    SolidLine,
    DashedLine,
    BottsDots,
    RoadEdge,
    SnowEdge,
    GrassEdge,
    GravelEdge,
    SoilEdge,
    GuardRail,
    Curb,
    Structure,
    Barrier,
    SoundBarrier,
}

impl BoundaryType {
    /// Painted markings, as opposed to physical edges.
    pub fn is_marking(&self) -> bool {
        matches!(self, Self::SolidLine | Self::DashedLine | Self::BottsDots)
    }
}

/// Marking colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryColor {
    #[default]
    Unknown,
    Other,
    None,
    White,
    Yellow,
    Red,
    Blue,
    Green,
    Violet,
    Orange,
}

/// Which side of a lane a boundary reference sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundarySide {
    Left,
    Right,
    /// Markings inside the lane that bound neither side (e.g. chevrons).
    Free,
}

impl std::fmt::Display for BoundarySide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Free => "free",
        })
    }
}
