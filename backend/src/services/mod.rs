//! Business services for the HeatLens backend

pub mod analysis;
pub mod planning;
pub mod pollen;
pub mod solar;
