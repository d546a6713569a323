use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use map_markers::database::Database;
use model::api::{
    CreateRequest, DeleteRequest, DeletedPayload, ImagePayload, MapPositionPayload,
    MarkerList, MarkerPayload, MarkersQuery, UpdateMarker,
};
use serde::Serialize;

use crate::{
    common::{success, ApiError, ApiResult},
    WebState,
};

/// Answer to `POST /api/markers`, shaped after the request that was sent.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Created {
    Marker(MarkerPayload),
    MapPosition(MapPositionPayload),
    Image(ImagePayload),
}

pub(crate) async fn list<D: Database + 'static>(
    State(WebState { marker_client }): State<WebState<D>>,
    query: Result<Query<MarkersQuery>, QueryRejection>,
) -> ApiResult<MarkerList> {
    const CONTEXT: &str = "Failed to fetch markers";
    let Query(query) = query.map_err(|why| ApiError::query_rejection(CONTEXT, why))?;
    marker_client
        .list_markers(&query.session_hash)
        .await
        .map_err(|why| ApiError::request(CONTEXT, why))
        .and_then(success)
}

pub(crate) async fn create<D: Database + 'static>(
    State(WebState { marker_client }): State<WebState<D>>,
    body: Result<Json<CreateRequest>, JsonRejection>,
) -> ApiResult<Created> {
    let Json(body) =
        body.map_err(|why| ApiError::json_rejection("Failed to read request", why))?;
    match body {
        CreateRequest::CreateMarker(new_marker) => marker_client
            .create_marker(new_marker)
            .await
            .map(|marker| {
                log::debug!("created marker {}", marker.id);
                Created::Marker(MarkerPayload { marker })
            })
            .map_err(|why| ApiError::request("Failed to save marker", why)),
        CreateRequest::SaveMapPosition(position) => marker_client
            .save_map_position(position)
            .await
            .map(|map_position| Created::MapPosition(MapPositionPayload { map_position }))
            .map_err(|why| ApiError::request("Failed to save map position", why)),
        CreateRequest::AttachImage(attach) => marker_client
            .attach_image(attach)
            .await
            .map(|image| Created::Image(ImagePayload { image }))
            .map_err(|why| ApiError::request("Failed to save image", why)),
    }
    .and_then(success)
}

pub(crate) async fn update<D: Database + 'static>(
    State(WebState { marker_client }): State<WebState<D>>,
    body: Result<Json<UpdateMarker>, JsonRejection>,
) -> ApiResult<MarkerPayload> {
    const CONTEXT: &str = "Failed to update marker";
    let Json(update) = body.map_err(|why| ApiError::json_rejection(CONTEXT, why))?;
    marker_client
        .update_marker(update)
        .await
        .map(|marker| MarkerPayload { marker })
        .map_err(|why| ApiError::request(CONTEXT, why))
        .and_then(success)
}

pub(crate) async fn delete<D: Database + 'static>(
    State(WebState { marker_client }): State<WebState<D>>,
    body: Result<Json<DeleteRequest>, JsonRejection>,
) -> ApiResult<DeletedPayload> {
    let Json(body) =
        body.map_err(|why| ApiError::json_rejection("Failed to read request", why))?;
    match body {
        DeleteRequest::DeleteMarker(delete) => marker_client
            .delete_marker(delete)
            .await
            .map(|id| DeletedPayload { id: id.raw() })
            .map_err(|why| ApiError::request("Failed to delete marker", why)),
        DeleteRequest::RemoveImage(remove) => marker_client
            .remove_image(remove)
            .await
            .map(|id| DeletedPayload { id: id.raw() })
            .map_err(|why| ApiError::request("Failed to delete image", why)),
    }
    .and_then(success)
}

#[cfg(test)]
mod tests {
    use map_markers::memory::MemoryDatabase;
    use model::{
        api::{AttachImage, DeleteMarker, Envelope, NewMarker, RemoveImage, SaveMapPosition},
        session::SessionHash,
    };
    use serde_json::{json, Value};
    use utility::id::Id;

    use super::*;
    use crate::{api::session::generate_session_hash, common::INACCESSIBLE_MARKER};

    fn state() -> WebState<MemoryDatabase> {
        WebState::new(MemoryDatabase::new())
    }

    async fn new_hash(state: &WebState<MemoryDatabase>) -> SessionHash {
        generate_session_hash(State(state.clone()))
            .await
            .unwrap()
            .0
            .data
            .unwrap()
            .session_hash
    }

    async fn list_for(
        state: &WebState<MemoryDatabase>,
        hash: &SessionHash,
    ) -> MarkerList {
        list(
            State(state.clone()),
            Ok(Query(MarkersQuery {
                session_hash: hash.to_string(),
            })),
        )
        .await
        .unwrap()
        .0
        .data
        .unwrap()
    }

    async fn create_marker(
        state: &WebState<MemoryDatabase>,
        hash: &SessionHash,
        latitude: f64,
        longitude: f64,
    ) -> model::marker::Marker {
        let body = CreateRequest::CreateMarker(NewMarker {
            latitude,
            longitude,
            description: None,
            picture_url: None,
            session_hash: hash.to_string(),
        });
        match create(State(state.clone()), Ok(Json(body)))
            .await
            .unwrap()
            .0
            .data
            .unwrap()
        {
            Created::Marker(payload) => payload.marker,
            other => panic!("unexpected payload {:?}", other),
        }
    }

    fn error_text<T>(result: ApiResult<T>) -> String {
        match result {
            Ok(_) => panic!("expected a failure"),
            Err(why) => why.message.unwrap_or_default(),
        }
    }

    #[tokio::test]
    async fn end_to_end_scenario() {
        let state = state();
        let hash = new_hash(&state).await;

        let marker = create_marker(&state, &hash, 10.0, 20.0).await;
        let listed = list_for(&state, &hash).await;
        assert_eq!(listed.markers.len(), 1);
        assert_eq!(listed.markers[0].id, marker.id);
        assert_eq!((listed.markers[0].latitude, listed.markers[0].longitude), (10.0, 20.0));
        assert!(listed.map_position.is_none());

        let updated = update(
            State(state.clone()),
            Ok(Json(UpdateMarker::new(marker.id, &hash).description("x"))),
        )
        .await
        .unwrap()
        .0
        .data
        .unwrap();
        assert_eq!(updated.marker.description, "x");

        let listed = list_for(&state, &hash).await;
        assert_eq!(listed.markers[0].description, "x");
        assert_eq!((listed.markers[0].latitude, listed.markers[0].longitude), (10.0, 20.0));

        let deleted = delete(
            State(state.clone()),
            Ok(Json(DeleteRequest::DeleteMarker(DeleteMarker {
                id: marker.id,
                session_hash: hash.to_string(),
            }))),
        )
        .await
        .unwrap()
        .0
        .data
        .unwrap();
        assert_eq!(deleted.id, marker.id.raw());
        assert!(list_for(&state, &hash).await.markers.is_empty());
    }

    #[tokio::test]
    async fn markers_are_invisible_to_other_sessions() {
        let state = state();
        let mine = new_hash(&state).await;
        let theirs = new_hash(&state).await;

        create_marker(&state, &mine, 1.0, 2.0).await;
        assert_eq!(list_for(&state, &mine).await.markers.len(), 1);
        assert!(list_for(&state, &theirs).await.markers.is_empty());
    }

    #[tokio::test]
    async fn wrong_session_reads_like_wrong_id() {
        let state = state();
        let mine = new_hash(&state).await;
        let theirs = new_hash(&state).await;
        let marker = create_marker(&state, &mine, 1.0, 2.0).await;

        let foreign = error_text(
            update(
                State(state.clone()),
                Ok(Json(UpdateMarker::new(marker.id, &theirs).description("x"))),
            )
            .await,
        );
        let missing = error_text(
            update(
                State(state.clone()),
                Ok(Json(
                    UpdateMarker::new(Id::new(marker.id.raw() + 1000), &mine).description("x"),
                )),
            )
            .await,
        );
        assert_eq!(foreign, missing);
        assert!(foreign.contains(INACCESSIBLE_MARKER));

        let foreign_delete = error_text(
            delete(
                State(state.clone()),
                Ok(Json(DeleteRequest::DeleteMarker(DeleteMarker {
                    id: marker.id,
                    session_hash: theirs.to_string(),
                }))),
            )
            .await,
        );
        let missing_delete = error_text(
            delete(
                State(state.clone()),
                Ok(Json(DeleteRequest::DeleteMarker(DeleteMarker {
                    id: Id::new(marker.id.raw() + 1000),
                    session_hash: mine.to_string(),
                }))),
            )
            .await,
        );
        assert_eq!(foreign_delete, missing_delete);
    }

    #[tokio::test]
    async fn map_position_is_returned_with_markers() {
        let state = state();
        let hash = new_hash(&state).await;

        for zoom_level in [4.0, 9.5] {
            let body = CreateRequest::SaveMapPosition(SaveMapPosition {
                session_hash: hash.to_string(),
                center_longitude: 10.1,
                center_latitude: 54.3,
                zoom_level,
            });
            let created = create(State(state.clone()), Ok(Json(body)))
                .await
                .unwrap()
                .0
                .data
                .unwrap();
            assert!(matches!(created, Created::MapPosition(_)));
        }

        let position = list_for(&state, &hash).await.map_position.unwrap();
        assert_eq!(position.zoom_level, 9.5);
        assert_eq!(position.center_latitude, 54.3);
    }

    #[tokio::test]
    async fn image_attach_and_remove() {
        let state = state();
        let hash = new_hash(&state).await;
        let marker = create_marker(&state, &hash, 1.0, 2.0).await;

        let body = CreateRequest::AttachImage(AttachImage {
            marker_id: marker.id,
            image_url: "https://i.ibb.co/abc/pier.png".to_owned(),
            session_hash: hash.to_string(),
        });
        let image = match create(State(state.clone()), Ok(Json(body)))
            .await
            .unwrap()
            .0
            .data
            .unwrap()
        {
            Created::Image(payload) => payload.image,
            other => panic!("unexpected payload {:?}", other),
        };
        assert_eq!(image.url, "https://i.ibb.co/abc/pier.png");

        delete(
            State(state.clone()),
            Ok(Json(DeleteRequest::RemoveImage(RemoveImage {
                image_id: image.id,
                session_hash: hash.to_string(),
            }))),
        )
        .await
        .unwrap();
        assert_eq!(list_for(&state, &hash).await.markers[0].picture_url, None);
    }

    #[tokio::test]
    async fn invalid_session_hash_fails_in_body() {
        let state = state();
        let text = error_text(
            list(
                State(state),
                Ok(Query(MarkersQuery {
                    session_hash: "abc".to_owned(),
                })),
            )
            .await,
        );
        assert!(text.starts_with("Failed to fetch markers: invalid session hash"));
    }

    #[tokio::test]
    async fn database_failure_is_reported_in_body() {
        let database = MemoryDatabase::new();
        let state = WebState::new(database.clone());
        let hash = new_hash(&state).await;
        database.set_unavailable(true);

        let text = error_text(
            list(
                State(state),
                Ok(Query(MarkersQuery {
                    session_hash: hash.to_string(),
                })),
            )
            .await,
        );
        assert!(text.starts_with("Failed to fetch markers:"));
    }

    #[test]
    fn created_payload_serializes_flat() {
        let marker = <model::marker::Marker as model::ExampleData>::example_data();
        let value: Value = serde_json::to_value(Envelope::ok(Created::Marker(MarkerPayload {
            marker: marker.clone(),
        })))
        .unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["marker"]["id"], json!(marker.id.raw()));
        assert_eq!(value["marker"]["description"], json!("meet here"));
    }
}
