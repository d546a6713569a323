use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{session::SessionHash, LngLat};

/// The last viewed camera state of a session. There is at most one per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MapPosition {
    pub session_hash: SessionHash,
    pub center_longitude: f64,
    pub center_latitude: f64,
    pub zoom_level: f64,
    pub updated_at: DateTime<Utc>,
}

impl MapPosition {
    pub fn center(&self) -> LngLat {
        LngLat::new(self.center_longitude, self.center_latitude)
    }
}
