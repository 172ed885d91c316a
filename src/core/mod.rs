pub mod geo;
pub mod sample;

pub use geo::distance_km;
pub use sample::{Route, Sample};
