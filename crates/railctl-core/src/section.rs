//! Fixed topology of the Chandanpur (CDAE) – Saktigarh (SKG) section.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// A station on the section, declared in line order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Station {
    Chandanpur,
    Porabazar,
    Belmuri,
    #[serde(rename = "Dhaniakhali Halt")]
    DhaniakhaliHalt,
    Sibaichandi,
    Hajigarh,
    Gurap,
    Jhapandanga,
    Jaugram,
    Nabagram,
    Masagram,
    Chanchai,
    #[serde(rename = "Palla Road")]
    PallaRoad,
    Saktigarh,
}

impl Station {
    pub const ALL: [Station; 14] = [
        Station::Chandanpur,
        Station::Porabazar,
        Station::Belmuri,
        Station::DhaniakhaliHalt,
        Station::Sibaichandi,
        Station::Hajigarh,
        Station::Gurap,
        Station::Jhapandanga,
        Station::Jaugram,
        Station::Nabagram,
        Station::Masagram,
        Station::Chanchai,
        Station::PallaRoad,
        Station::Saktigarh,
    ];

    /// Stations a train may be looped or stabled at when planning.
    pub const LOOP_STATIONS: [Station; 4] = [
        Station::Chandanpur,
        Station::Masagram,
        Station::Gurap,
        Station::Saktigarh,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Chandanpur => "Chandanpur",
            Self::Porabazar => "Porabazar",
            Self::Belmuri => "Belmuri",
            Self::DhaniakhaliHalt => "Dhaniakhali Halt",
            Self::Sibaichandi => "Sibaichandi",
            Self::Hajigarh => "Hajigarh",
            Self::Gurap => "Gurap",
            Self::Jhapandanga => "Jhapandanga",
            Self::Jaugram => "Jaugram",
            Self::Nabagram => "Nabagram",
            Self::Masagram => "Masagram",
            Self::Chanchai => "Chanchai",
            Self::PallaRoad => "Palla Road",
            Self::Saktigarh => "Saktigarh",
        }
    }

    /// Station code shown next to the terminal stations.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Chandanpur => Some("CDAE"),
            Self::Saktigarh => Some("SKG"),
            _ => None,
        }
    }

    /// Number of loop lines at this station (loops are numbered from 1).
    pub fn loop_count(&self) -> u32 {
        match self {
            Self::Chandanpur => 3,
            Self::Masagram => 2,
            Self::Gurap => 1,
            _ => 0,
        }
    }

    pub fn is_loop_station(&self) -> bool {
        Self::LOOP_STATIONS.contains(self)
    }

    /// First station (in line order) whose name occurs in `text`, ignoring case.
    pub fn find_in_text(text: &str) -> Option<Station> {
        let haystack = text.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|s| haystack.contains(&s.name().to_lowercase()))
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Station {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|st| st.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownStation(wanted.to_string()))
    }
}

/// One of the three running lines through the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Line {
    #[serde(rename = "Up Main")]
    UpMain,
    #[serde(rename = "Down Main")]
    DownMain,
    Reverse,
}

impl Line {
    pub const ALL: [Line; 3] = [Line::UpMain, Line::DownMain, Line::Reverse];

    pub fn name(&self) -> &'static str {
        match self {
            Self::UpMain => "Up Main",
            Self::DownMain => "Down Main",
            Self::Reverse => "Reverse",
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Line {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|l| l.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownLine(wanted.to_string()))
    }
}

/// Occupancy status of a line, station or loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Free,
    Occupied,
    Blocked,
    Maintenance,
}

impl Status {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Occupied => "Occupied",
            Self::Blocked => "Blocked",
            Self::Maintenance => "Maintenance",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Status {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "occupied" => Ok(Self::Occupied),
            "blocked" => Ok(Self::Blocked),
            "maintenance" => Ok(Self::Maintenance),
            other => Err(CoreError::UnknownStatus(other.to_string())),
        }
    }
}
