use axum::{response::IntoResponse, routing::get, Json, Router};
use map_markers::database::Database;
use model::marker::Marker;
use serde_json::json;

pub mod markers;
pub mod session;

use crate::{
    common::{method_not_allowed, route_not_found, schema},
    WebState,
};

pub fn routes<D: Database + 'static>(state: WebState<D>) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route(
            "/generate-session-hash",
            get(session::generate_session_hash::<D>).fallback(method_not_allowed),
        )
        .route(
            "/markers",
            get(markers::list::<D>)
                .post(markers::create::<D>)
                .put(markers::update::<D>)
                .delete(markers::delete::<D>)
                .fallback(method_not_allowed),
        )
        .route("/markers/schema", get(schema::<Marker>))
        .with_state(state)
        .fallback(route_not_found)
}

async fn ping() -> impl IntoResponse {
    Json(json!({
        "message": "pong!"
    }))
}
