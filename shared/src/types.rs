//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// GPS coordinates in decimal degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsCoordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Land-cover classes relevant to surface temperature differentials.
///
/// Codes follow the ESA WorldCover v200 classification scheme.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LandCoverClass {
    TreeCover,
    BuiltUp,
    Water,
}

impl LandCoverClass {
    /// ESA WorldCover class code for raster masking
    pub fn code(&self) -> u8 {
        match self {
            LandCoverClass::TreeCover => 10,
            LandCoverClass::BuiltUp => 50,
            LandCoverClass::Water => 80,
        }
    }
}
