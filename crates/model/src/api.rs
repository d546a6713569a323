//! JSON bodies exchanged between the web server and the front end.
//!
//! Every response is wrapped in an [`Envelope`]: `success` tells whether the
//! call worked, failures carry a message in `error`. The HTTP status is not
//! used to signal failure.

use serde::{Deserialize, Serialize};
use utility::id::Id;

use crate::{
    image::Image, map_position::MapPosition, marker::Marker, session::SessionHash,
};

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub error: Option<String>,
    #[serde(flatten)]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    pub fn failure<S: Into<String>>(message: S) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            data: None,
        }
    }
}

// - responses -

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionHashPayload {
    pub session_hash: SessionHash,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerList {
    pub markers: Vec<Marker>,
    pub map_position: Option<MapPosition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerPayload {
    pub marker: Marker,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPositionPayload {
    pub map_position: MapPosition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagePayload {
    pub image: Image,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedPayload {
    pub id: i32,
}

// - requests -

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkersQuery {
    pub session_hash: String,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub description: Option<String>,
    pub picture_url: Option<String>,
    pub session_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveMapPosition {
    pub session_hash: String,
    pub center_longitude: f64,
    pub center_latitude: f64,
    pub zoom_level: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachImage {
    pub marker_id: Id<Marker>,
    pub image_url: String,
    pub session_hash: String,
}

/// Body of `POST /api/markers`. The variant is picked by the fields present,
/// most specific first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreateRequest {
    AttachImage(AttachImage),
    SaveMapPosition(SaveMapPosition),
    CreateMarker(NewMarker),
}

/// Body of `PUT /api/markers`. Absent fields keep their stored value.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMarker {
    pub id: Id<Marker>,
    pub session_hash: String,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub picture_url: Option<String>,
}

impl UpdateMarker {
    pub fn new(id: Id<Marker>, session_hash: &SessionHash) -> Self {
        Self {
            id,
            session_hash: session_hash.to_string(),
            description: None,
            latitude: None,
            longitude: None,
            picture_url: None,
        }
    }

    pub fn description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn picture_url<S: Into<String>>(mut self, picture_url: S) -> Self {
        self.picture_url = Some(picture_url.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteMarker {
    pub id: Id<Marker>,
    pub session_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveImage {
    pub image_id: Id<Image>,
    pub session_hash: String,
}

/// Body of `DELETE /api/markers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeleteRequest {
    RemoveImage(RemoveImage),
    DeleteMarker(DeleteMarker),
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const HASH: &str = "Zq3v-_x8Yb2Qm9TnLk4Wp7Rs1Dh6Fg0JcVe5Ua2Xo";

    #[test]
    fn post_body_is_disambiguated_by_fields() {
        let marker: CreateRequest = serde_json::from_value(json!({
            "latitude": 10.0,
            "longitude": 20.0,
            "description": "",
            "session_hash": HASH,
        }))
        .unwrap();
        assert!(matches!(marker, CreateRequest::CreateMarker(_)));

        let position: CreateRequest = serde_json::from_value(json!({
            "session_hash": HASH,
            "center_longitude": 10.1,
            "center_latitude": 54.3,
            "zoom_level": 12,
        }))
        .unwrap();
        assert!(matches!(position, CreateRequest::SaveMapPosition(_)));

        let image: CreateRequest = serde_json::from_value(json!({
            "marker_id": 4,
            "image_url": "https://i.ibb.co/x.png",
            "session_hash": HASH,
        }))
        .unwrap();
        assert!(matches!(image, CreateRequest::AttachImage(_)));
    }

    #[test]
    fn post_body_without_known_shape_is_rejected() {
        let result = serde_json::from_value::<CreateRequest>(json!({
            "session_hash": HASH,
        }));
        assert!(result.is_err());
    }

    #[test]
    fn delete_body_is_disambiguated_by_fields() {
        let marker: DeleteRequest =
            serde_json::from_value(json!({ "id": 3, "session_hash": HASH })).unwrap();
        assert!(matches!(marker, DeleteRequest::DeleteMarker(_)));

        let image: DeleteRequest =
            serde_json::from_value(json!({ "image_id": 3, "session_hash": HASH }))
                .unwrap();
        assert!(matches!(image, DeleteRequest::RemoveImage(_)));
    }

    #[test]
    fn failure_envelope_shape() {
        let value = serde_json::to_value(Envelope::<DeletedPayload>::failure("nope")).unwrap();
        assert_eq!(value, json!({ "success": false, "error": "nope" }));
    }

    #[test]
    fn marker_list_keeps_null_map_position() {
        let value = serde_json::to_value(Envelope::ok(MarkerList {
            markers: vec![],
            map_position: None,
        }))
        .unwrap();
        assert_eq!(
            value,
            json!({ "success": true, "markers": [], "mapPosition": null })
        );
    }

    #[test]
    fn envelope_parses_both_outcomes() {
        let ok: Envelope<DeletedPayload> =
            serde_json::from_value(json!({ "success": true, "id": 9 })).unwrap();
        assert!(ok.success);
        assert_eq!(ok.data.unwrap().id, 9);

        let failed: Envelope<DeletedPayload> =
            serde_json::from_value(json!({ "success": false, "error": "gone" }))
                .unwrap();
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("gone"));
    }

    #[test]
    fn update_only_sends_given_fields() {
        let hash = SessionHash::parse(HASH).unwrap();
        let value =
            serde_json::to_value(UpdateMarker::new(Id::new(5), &hash).description("x"))
                .unwrap();
        assert_eq!(
            value,
            json!({ "id": 5, "session_hash": HASH, "description": "x" })
        );
    }
}
