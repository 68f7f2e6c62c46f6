//! Domain models for urban heat analysis

mod planting;
mod zone;

pub use planting::*;
pub use zone::*;
