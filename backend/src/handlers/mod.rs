//! HTTP handlers for the HeatLens API

pub mod aerial;
pub mod analysis;
pub mod health;
pub mod heat;
pub mod planning;
pub mod pollen;
pub mod solar;

pub use aerial::*;
pub use analysis::*;
pub use health::*;
pub use heat::*;
pub use planning::*;
pub use pollen::*;
pub use solar::*;
