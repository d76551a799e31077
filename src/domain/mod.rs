pub mod lead;
pub mod lead_quality;

pub use lead::*;
