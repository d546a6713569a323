use chrono::{DateTime, TimeZone as _, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{session::SessionHash, ExampleData, LngLat};

/// A pin on the map, owned by exactly one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Marker {
    pub id: Id<Marker>,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    pub picture_url: Option<String>,
    pub session_hash: SessionHash,
    pub created_at: DateTime<Utc>,
}

impl HasId for Marker {
    type IdType = i32;
}

impl Marker {
    pub fn lng_lat(&self) -> LngLat {
        LngLat::new(self.longitude, self.latitude)
    }
}

impl ExampleData for Marker {
    fn example_data() -> Self {
        Self {
            id: Id::new(1),
            latitude: 54.323,
            longitude: 10.139,
            description: "meet here".to_owned(),
            picture_url: Some("https://i.ibb.co/example/pier.jpg".to_owned()),
            session_hash: SessionHash::from_storage(
                "Zq3v-_x8Yb2Qm9TnLk4Wp7Rs1Dh6Fg0JcVe5Ua2Xo".to_owned(),
            ),
            created_at: Utc
                .with_ymd_and_hms(2025, 5, 15, 12, 0, 0)
                .single()
                .unwrap_or_default(),
        }
    }
}
