pub mod droid;
pub mod field_extractor;
#[cfg(test)]
pub mod fixture;
pub mod lead_collector;
pub mod lead_generation;
pub mod maps_layout;
pub mod pagination;
pub mod surface;
pub mod wait;

pub use droid::*;
pub use field_extractor::*;
pub use lead_collector::*;
pub use lead_generation::*;
pub use maps_layout::*;
pub use pagination::*;
pub use surface::*;
pub use wait::*;
