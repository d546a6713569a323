use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use serde_with;

pub mod api;
pub mod image;
pub mod map_position;
pub mod marker;
pub mod session;

pub trait ExampleData {
    fn example_data() -> Self;
}

/// A coordinate pair in the order the map library hands them out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}
