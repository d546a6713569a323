use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::marker::Marker;

/// A picture attached to a marker. Every marker holds at most one picture, so
/// the image id is the id of the marker carrying it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Image {
    pub id: Id<Image>,
    pub marker_id: Id<Marker>,
    pub url: String,
}

impl HasId for Image {
    type IdType = i32;
}

impl Image {
    pub fn of_marker(marker_id: Id<Marker>, url: String) -> Self {
        Self {
            id: Id::new(marker_id.raw()),
            marker_id,
            url,
        }
    }
}
